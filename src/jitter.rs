// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sub-pixel jitter.  One table of offsets is generated before the
//! render starts and every pixel in the image is sampled at the same
//! offsets, so the output does not depend on which thread rendered
//! which row.

use crate::errors::RenderError;
use crate::planes::MAX_SAMPLES;
use rand::SeedableRng;
use std::ops::Deref;

const MULTIPLIER: u64 = 1_103_515_245;
const INCREMENT: u64 = 12_345;
// Draws are 15 bits wide.
const DRAW_RANGE: u64 = 32_768;

/// A small linear congruential generator.  It is fast, reproducible
/// for a given seed, and entirely unsuitable for anything but picking
/// sample positions.
#[derive(Clone, Debug, PartialEq)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    fn step(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT);
        self.state
    }

    /// The next 15-bit draw.
    pub fn draw(&mut self) -> u64 {
        (self.step() / 65_536) % DRAW_RANGE
    }

    /// The next draw scaled into [0, 1).
    pub fn next_unit(&mut self) -> f64 {
        (self.draw() as f64) / (DRAW_RANGE as f64)
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Lcg {
            state: u64::from_le_bytes(seed),
        }
    }

    fn seed_from_u64(state: u64) -> Self {
        Lcg { state }
    }
}

/// The offsets every pixel is sampled at, each in [0, 1).
#[derive(Clone, Debug, PartialEq)]
pub struct JitterTable(Vec<f64>);

impl JitterTable {
    /// Draw `samples` offsets from the generator.
    pub fn generate(rng: &mut Lcg, samples: usize) -> Result<JitterTable, RenderError> {
        check_len(samples)?;
        Ok(JitterTable((0..samples).map(|_| rng.next_unit()).collect()))
    }

    /// Use a fixed set of offsets, e.g. a single 0.0 to sample only the
    /// corner of every pixel.
    pub fn from_offsets(offsets: Vec<f64>) -> Result<JitterTable, RenderError> {
        check_len(offsets.len())?;
        if let Some(bad) = offsets.iter().find(|o| !(**o >= 0.0 && **o < 1.0)) {
            return Err(RenderError::invalid(format!(
                "jitter offset {} is outside [0, 1)",
                bad
            )));
        }
        Ok(JitterTable(offsets))
    }
}

fn check_len(samples: usize) -> Result<(), RenderError> {
    if samples == 0 || samples > MAX_SAMPLES {
        return Err(RenderError::invalid(format!(
            "a jitter table holds between 1 and {} offsets, not {}",
            MAX_SAMPLES, samples
        )));
    }
    Ok(())
}

impl Deref for JitterTable {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}
