// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The classic escape-time iterator.

use num::Complex;

/// Squared escape radius.
const ESCAPE_NORM_SQR: f64 = 4.0;

/// How a point left (or failed to leave) the circle of radius two.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Escape {
    /// The step at which the point escaped, or the cap if it never did.
    pub iterations: usize,
    /// The squared magnitude seen by the last escape check.
    pub magnitude: f64,
}

impl Escape {
    /// True if the point left the circle before the cap.
    pub fn escaped(&self) -> bool {
        self.magnitude > ESCAPE_NORM_SQR
    }
}

/// Iterate z = z*z + c from zero, checking the squared magnitude
/// before every update.  If the point never escapes, the magnitude
/// returned is the one checked on the last step, which is one update
/// behind the final value of z.
pub fn escape_time(point: Complex<f64>, limit: usize) -> Escape {
    let (mut x, mut y) = (0.0_f64, 0.0_f64);
    let mut magnitude = 0.0_f64;
    for i in 0..limit {
        let (xx, yy, xy) = (x * x, y * y, x * y);
        magnitude = xx + yy;
        if magnitude > ESCAPE_NORM_SQR {
            return Escape {
                iterations: i,
                magnitude,
            };
        }
        x = xx - yy + point.re;
        y = 2.0 * xy + point.im;
    }
    Escape {
        iterations: limit,
        magnitude,
    }
}
