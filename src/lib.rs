#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Supersampled Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points on the complex plane that
//! never run off to infinity when repeatedly squared and added back
//! to themselves.  The points that do run off are colored by how fast
//! they leave, and the image is what you get when you paint the
//! boundary between the two.
//!
//! That boundary is infinitely detailed, so a single sample per pixel
//! produces a noisy, aliased image.  This renderer takes several
//! samples per pixel, each shifted by a small sub-pixel offset, and
//! averages their colors.  The offsets are drawn once and reused for
//! every pixel, which keeps the output independent of how the rows
//! were split up among threads.
//!
//! Rows are handed out to a fixed pool of threads a band at a time
//! from one shared cursor, and each thread writes its band straight
//! into the image buffer.

pub mod color;
pub mod config;
pub mod distributor;
pub mod errors;
pub mod escape;
pub mod jitter;
pub mod pixel;
pub mod pixmap;
pub mod planes;
pub mod render;

pub use config::Config;
pub use errors::RenderError;
pub use jitter::{JitterTable, Lcg};
pub use planes::{Pixel, RenderSpec};
pub use render::Renderer;
