// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render settings and their defaults.  The defaults frame a small
//! spiral near (-0.5557506, -0.5556) at a scale of one billionth.

use crate::distributor::DEFAULT_CHUNK;
use crate::errors::RenderError;
use crate::jitter::{JitterTable, Lcg};
use crate::planes::RenderSpec;
use crate::render::Renderer;
use log::debug;
use num::Complex;
use rand::SeedableRng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Lower corner of the default window.
pub const DEFAULT_ORIGIN: (f64, f64) = (-0.555_750_6, -0.555_60);
/// Height of the default window on the complex plane.
pub const DEFAULT_SCALE: f64 = 0.000_000_001;
/// Default image size.
pub const DEFAULT_SIZE: (usize, usize) = (512, 512);
/// Default iteration cap.
pub const DEFAULT_ITERATIONS: usize = 1500;
/// Default samples per pixel.
pub const DEFAULT_SAMPLES: usize = 50;

/// Everything needed to set up a render.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Lower corner of the window on the complex plane.
    pub origin: Complex<f64>,
    /// Height of the window on the complex plane.
    pub scale: f64,
    /// Image width and height in pixels.
    pub size: (usize, usize),
    /// Iteration cap.
    pub iterations: usize,
    /// Samples per pixel.
    pub samples: usize,
    /// Worker threads, counting the calling thread.
    pub threads: usize,
    /// Rows handed out per claim.
    pub chunk: usize,
    /// Seed for the jitter generator; the clock when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            origin: Complex::new(DEFAULT_ORIGIN.0, DEFAULT_ORIGIN.1),
            scale: DEFAULT_SCALE,
            size: DEFAULT_SIZE,
            iterations: DEFAULT_ITERATIONS,
            samples: DEFAULT_SAMPLES,
            threads: num_cpus::get(),
            chunk: DEFAULT_CHUNK,
            seed: None,
        }
    }
}

impl Config {
    /// The validated render parameters.
    pub fn spec(&self) -> Result<RenderSpec, RenderError> {
        RenderSpec::new(
            self.origin,
            self.scale,
            self.size.0,
            self.size.1,
            self.iterations,
            self.samples,
        )
    }

    /// The configured seed, or the current Unix time in seconds.
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or(0)
        })
    }

    /// Seed the generator, draw the jitter table and build a renderer.
    pub fn renderer(&self) -> Result<Renderer, RenderError> {
        let spec = self.spec()?;
        let seed = self.seed();
        debug!("seeding jitter with {}", seed);
        let mut rng = Lcg::seed_from_u64(seed);
        let jitter = JitterTable::generate(&mut rng, spec.samples())?;
        Renderer::new(spec, jitter, self.threads)?.with_chunk(self.chunk)
    }
}
