// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns an escape into a color.  Points that escape are colored by
//! hue, driven by how long they took and how far out they ended up;
//! points that never escape get one fixed interior color.

use crate::escape::Escape;

/// An 8-bit color with alpha.  Alpha is always opaque and is never
/// written to the image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// The color of points that did not escape before the cap.
pub const INTERIOR: Rgba = Rgba {
    r: 15,
    g: 255,
    b: 255,
    a: 255,
};

// Iterations are divided by this to drive the hue.
const HUE_DIVISOR: f64 = 800.0;

/// Map an escape to its color.
pub fn paint(escape: Escape) -> Rgba {
    if escape.escaped() {
        let hue = (escape.iterations as f64) / HUE_DIVISOR * escape.magnitude;
        hsl_to_rgb(hue, 1.0, 0.5)
    } else {
        INTERIOR
    }
}

/// The usual six-sector hue function.  `t` is wrapped once into range;
/// hues more than a full turn away fall through to `p`.
fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 { t + 1.0 } else { t };
    let t = if t > 1.0 { t - 1.0 } else { t };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Convert hue, saturation and lightness, each nominally in [0, 1],
/// to an opaque 8-bit color.  Channels are truncated, not rounded.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgba {
    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    };
    Rgba {
        r: (r * 255.0) as u8,
        g: (g * 255.0) as u8,
        b: (b * 255.0) as u8,
        a: 255,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(c: Rgba) -> (u8, u8, u8) {
        (c.r, c.g, c.b)
    }

    #[test]
    fn primaries_and_gray() {
        assert_eq!(rgb(hsl_to_rgb(0.0, 0.0, 0.5)), (127, 127, 127));
        assert_eq!(rgb(hsl_to_rgb(0.0, 1.0, 0.5)), (255, 0, 0));
        assert_eq!(rgb(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5)), (0, 255, 0));
        assert_eq!(rgb(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5)), (0, 0, 255));
    }

    #[test]
    fn hues_past_a_full_turn_wrap_once() {
        // red lands at 1.533, wrapped to 0.533; green at 0.2; blue at 0.867
        assert_eq!(rgb(hsl_to_rgb(1.2, 1.0, 0.5)), (204, 255, 0));
    }

    #[test]
    fn hues_several_turns_out_fall_through_to_p() {
        // hue = 1500 / 800 * 5 = 9.375
        let escape = Escape {
            iterations: 1500,
            magnitude: 5.0,
        };
        assert_eq!(rgb(paint(escape)), (0, 0, 0));
    }

    #[test]
    fn lightness_extremes() {
        assert_eq!(rgb(hsl_to_rgb(0.25, 1.0, 0.0)), (0, 0, 0));
        assert_eq!(rgb(hsl_to_rgb(0.25, 1.0, 1.0)), (255, 255, 255));
    }

    #[test]
    fn alpha_is_opaque() {
        assert_eq!(hsl_to_rgb(0.7, 0.3, 0.2).a, 255);
        assert_eq!(INTERIOR.a, 255);
    }

    #[test]
    fn interior_points_get_the_interior_color() {
        let escape = Escape {
            iterations: 50,
            magnitude: 0.37,
        };
        assert_eq!(paint(escape), INTERIOR);
        assert_eq!(rgb(INTERIOR), (15, 255, 255));
    }

    #[test]
    fn escaped_points_are_colored_by_hue() {
        // hue = 1/800 * 5.44, deep in the red sector
        let escape = Escape {
            iterations: 1,
            magnitude: 5.44,
        };
        assert_eq!(rgb(paint(escape)), (255, 10, 0));
    }
}
