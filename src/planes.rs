// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the RenderSpec struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0
//! (the image) and a window on the complex plane whose lower corner
//! is `origin` and whose height is `scale`.  The width of the window
//! is `scale` stretched by the aspect ratio of the image.

use crate::errors::RenderError;
use num::Complex;

/// The largest number of jitter samples taken for a single pixel.
pub const MAX_SAMPLES: usize = 100;

/// Describes the x, y of a pixel in the image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The parameters of one render.  Once built, this object is never
/// mutated; every worker borrows the same copy.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSpec {
    origin: Complex<f64>,
    scale: f64,
    width: usize,
    height: usize,
    // Width over height, computed once so every sample uses the same
    // value.
    ratio: f64,
    iterations: usize,
    samples: usize,
}

impl RenderSpec {
    /// Constructor.  Takes the corner of the window on the complex
    /// plane, the scale mapping the image onto that window, the size
    /// of the image in pixels, the iteration cap and the number of
    /// samples taken per pixel.
    pub fn new(
        origin: Complex<f64>,
        scale: f64,
        width: usize,
        height: usize,
        iterations: usize,
        samples: usize,
    ) -> Result<RenderSpec, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::invalid(format!(
                "the image must be at least 1x1 pixels, not {}x{}",
                width, height
            )));
        }

        if !(origin.re.is_finite() && origin.im.is_finite() && scale.is_finite()) {
            return Err(RenderError::invalid(
                "the origin and scale must be finite numbers",
            ));
        }

        if iterations == 0 {
            return Err(RenderError::invalid("the iteration cap must be positive"));
        }

        if samples == 0 || samples > MAX_SAMPLES {
            return Err(RenderError::invalid(format!(
                "the sample count must be between 1 and {}, not {}",
                MAX_SAMPLES, samples
            )));
        }

        Ok(RenderSpec {
            origin,
            scale,
            width,
            height,
            ratio: (width as f64) / (height as f64),
            iterations,
            samples,
        })
    }

    /// The lower corner of the window on the complex plane.
    pub fn origin(&self) -> Complex<f64> {
        self.origin
    }

    /// Complex-plane height of the window.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Width over height.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// The iteration cap handed to the escape evaluator.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Samples taken per pixel.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// The number of bytes in one RGB row of the image.
    pub fn row_bytes(&self) -> usize {
        self.width * 3
    }

    /// Given a pixel and a sub-pixel offset in [0, 1), return the
    /// point on the complex plane that the sample lands on.  The same
    /// offset is applied to both axes.
    pub fn sample_to_point(&self, pixel: Pixel, offset: f64) -> Complex<f64> {
        Complex::new(
            self.scale * self.ratio * (((pixel.0 as f64) + offset) / (self.width as f64))
                + self.origin.re,
            self.scale * (((pixel.1 as f64) + offset) / (self.height as f64)) + self.origin.im,
        )
    }
}
