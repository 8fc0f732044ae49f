// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Supersampling.  Each pixel is evaluated once per jitter offset and
//! the resulting colors are averaged channel by channel.

use crate::color::paint;
use crate::escape::escape_time;
use crate::jitter::JitterTable;
use crate::planes::{Pixel, RenderSpec};

/// The averaged RGB color of one pixel.
pub fn render_pixel(spec: &RenderSpec, jitter: &JitterTable, pixel: Pixel) -> [u8; 3] {
    let mut sums = [0_u32; 3];
    for offset in jitter.iter() {
        let point = spec.sample_to_point(pixel, *offset);
        let color = paint(escape_time(point, spec.iterations()));
        sums[0] += u32::from(color.r);
        sums[1] += u32::from(color.g);
        sums[2] += u32::from(color.b);
    }
    let count = jitter.len() as f64;
    [
        (f64::from(sums[0]) / count) as u8,
        (f64::from(sums[1]) / count) as u8,
        (f64::from(sums[2]) / count) as u8,
    ]
}

/// Render row `y` of the image into `row`, which must hold exactly
/// one RGB row.
pub fn render_row(spec: &RenderSpec, jitter: &JitterTable, y: usize, row: &mut [u8]) {
    debug_assert_eq!(row.len(), spec.row_bytes());
    for (x, rgb) in row.chunks_mut(3).enumerate() {
        rgb.copy_from_slice(&render_pixel(spec, jitter, Pixel(x, y)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::INTERIOR;
    use num::Complex;

    fn spec(samples: usize) -> RenderSpec {
        RenderSpec::new(Complex::new(-2.0, -1.2), 2.5, 4, 2, 50, samples).unwrap()
    }

    #[test]
    fn single_sample_is_the_plain_color() {
        let jitter = JitterTable::from_offsets(vec![0.0]).unwrap();
        // (-0.75, 0.05) is inside the set.
        assert_eq!(
            render_pixel(&spec(1), &jitter, Pixel(1, 1)),
            [INTERIOR.r, INTERIOR.g, INTERIOR.b]
        );
        assert_eq!(render_pixel(&spec(1), &jitter, Pixel(0, 0)), [255, 10, 0]);
    }

    #[test]
    fn repeated_offsets_average_to_the_same_color() {
        let one = JitterTable::from_offsets(vec![0.0]).unwrap();
        let many = JitterTable::from_offsets(vec![0.0; 7]).unwrap();
        for x in 0..4 {
            for y in 0..2 {
                assert_eq!(
                    render_pixel(&spec(1), &one, Pixel(x, y)),
                    render_pixel(&spec(7), &many, Pixel(x, y))
                );
            }
        }
    }

    #[test]
    fn mean_is_truncated() {
        // One interior sample (15, 255, 255) and one escaped sample.
        let jitter = JitterTable::from_offsets(vec![0.0, 0.5]).unwrap();
        assert_eq!(render_pixel(&spec(2), &jitter, Pixel(1, 0)), [135, 162, 127]);
    }

    #[test]
    fn rows_are_filled_left_to_right() {
        let jitter = JitterTable::from_offsets(vec![0.0]).unwrap();
        let mut row = vec![0_u8; 12];
        render_row(&spec(1), &jitter, 1, &mut row);
        assert_eq!(row, vec![255, 7, 0, 15, 255, 255, 255, 92, 0, 255, 88, 0]);
    }
}
