// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Renderer owns everything a render needs and runs it, either on
//! the calling thread alone or across a fixed pool of scoped threads
//! that share one row cursor.

use crate::distributor::{RowCursor, DEFAULT_CHUNK};
use crate::errors::RenderError;
use crate::jitter::JitterTable;
use crate::pixel::render_row;
use crate::planes::RenderSpec;
use crossbeam::thread::ScopedJoinHandle;
use log::{debug, info};
use std::time::Instant;

/// The parameters by which an image is rendered.  Once set, this
/// object should not be mutable.
#[derive(Debug)]
pub struct Renderer {
    spec: RenderSpec,
    jitter: JitterTable,
    threads: usize,
    chunk: usize,
}

impl Renderer {
    /// Requires the render parameters, the jitter table (exactly one
    /// offset per sample) and the total number of worker threads,
    /// including the calling thread.
    pub fn new(spec: RenderSpec, jitter: JitterTable, threads: usize) -> Result<Self, RenderError> {
        if jitter.len() != spec.samples() {
            return Err(RenderError::invalid(format!(
                "{} samples per pixel need {} jitter offsets, got {}",
                spec.samples(),
                spec.samples(),
                jitter.len()
            )));
        }
        if threads == 0 {
            return Err(RenderError::invalid("at least one worker thread is required"));
        }
        Ok(Renderer {
            spec,
            jitter,
            threads,
            chunk: DEFAULT_CHUNK,
        })
    }

    /// Hand out rows `chunk` at a time instead of the default.
    pub fn with_chunk(mut self, chunk: usize) -> Result<Self, RenderError> {
        if chunk == 0 {
            return Err(RenderError::invalid("the row chunk must be at least one row"));
        }
        self.chunk = chunk;
        Ok(self)
    }

    /// The render parameters.
    pub fn spec(&self) -> &RenderSpec {
        &self.spec
    }

    /// The offsets every pixel is sampled at.
    pub fn jitter(&self) -> &JitterTable {
        &self.jitter
    }

    /// The main function for single-threaded renders: every row, in
    /// order, on the calling thread.
    pub fn render_single(&self) -> Result<Vec<u8>, RenderError> {
        let mut pixels = allocate(&self.spec)?;
        for (y, row) in pixels.chunks_mut(self.spec.row_bytes()).enumerate() {
            render_row(&self.spec, &self.jitter, y, row);
        }
        Ok(pixels)
    }

    /// The multi-threaded render.  Spawns `threads - 1` workers, works
    /// the cursor on the calling thread as well, and returns once
    /// every worker has been joined.
    pub fn render(&self) -> Result<Vec<u8>, RenderError> {
        let started = Instant::now();
        let mut pixels = allocate(&self.spec)?;
        let rows = {
            let cursor = RowCursor::new(&mut pixels, self.spec.row_bytes(), self.chunk)?;
            self.run_workers(&cursor)?
        };
        info!(
            "{}/{} rows (100%) on {} threads in {:.2?}",
            rows,
            self.spec.height(),
            self.threads,
            started.elapsed()
        );
        Ok(pixels)
    }

    fn run_workers(&self, cursor: &RowCursor) -> Result<usize, RenderError> {
        let (spec, jitter) = (&self.spec, &self.jitter);
        let work = move || {
            cursor.drain(|y, row| {
                render_row(spec, jitter, y, row);
            })
        };

        let outcome = crossbeam::scope(|spawner| -> Result<usize, RenderError> {
            let mut handles: Vec<ScopedJoinHandle<Result<usize, RenderError>>> =
                Vec::with_capacity(self.threads - 1);
            for worker in 1..self.threads {
                let handle = spawner
                    .builder()
                    .name(format!("mandel-worker-{}", worker))
                    .spawn(move |_| -> Result<usize, RenderError> {
                        let rows = work()?;
                        debug!("worker {} rendered {} rows", worker, rows);
                        Ok(rows)
                    })
                    .map_err(|cause| RenderError::ThreadCreation { worker, cause })?;
                handles.push(handle);
            }

            let mut rows = work()?;
            debug!("worker 0 rendered {} rows", rows);
            for handle in handles {
                rows += handle.join().map_err(|_| RenderError::WorkerPanicked)??;
            }
            Ok(rows)
        });

        match outcome {
            Ok(rows) => rows,
            Err(_) => Err(RenderError::WorkerPanicked),
        }
    }
}

/// Allocate a zeroed RGB buffer for the image, failing instead of
/// aborting when the memory is not there.
fn allocate(spec: &RenderSpec) -> Result<Vec<u8>, RenderError> {
    let bytes = spec
        .width()
        .checked_mul(3)
        .and_then(|row_bytes| row_bytes.checked_mul(spec.height()))
        .ok_or(RenderError::Allocation {
            bytes: usize::max_value(),
        })?;
    let mut pixels: Vec<u8> = Vec::new();
    pixels
        .try_reserve_exact(bytes)
        .map_err(|_| RenderError::Allocation { bytes })?;
    pixels.resize(bytes, 0);
    debug!("allocated {} bytes for a {}x{} image", bytes, spec.width(), spec.height());
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jitter::Lcg;
    use num::Complex;
    use rand::SeedableRng;

    fn spec(width: usize, height: usize, samples: usize) -> RenderSpec {
        RenderSpec::new(Complex::new(-2.0, -1.2), 2.5, width, height, 64, samples).unwrap()
    }

    #[test]
    fn jitter_length_must_match_samples() {
        let jitter = JitterTable::from_offsets(vec![0.0, 0.5]).unwrap();
        assert!(Renderer::new(spec(4, 2, 3), jitter.clone(), 2).is_err());
        assert!(Renderer::new(spec(4, 2, 2), jitter, 2).is_ok());
    }

    #[test]
    fn zero_threads_and_zero_chunks_are_rejected() {
        let jitter = JitterTable::from_offsets(vec![0.0]).unwrap();
        assert!(Renderer::new(spec(4, 2, 1), jitter.clone(), 0).is_err());
        let renderer = Renderer::new(spec(4, 2, 1), jitter, 1).unwrap();
        assert!(renderer.with_chunk(0).is_err());
    }

    #[test]
    fn buffer_is_width_by_height_by_three() {
        let jitter = JitterTable::from_offsets(vec![0.0]).unwrap();
        let renderer = Renderer::new(spec(7, 5, 1), jitter, 3).unwrap();
        assert_eq!(renderer.render().unwrap().len(), 7 * 5 * 3);
        assert_eq!(renderer.render_single().unwrap().len(), 7 * 5 * 3);
    }

    #[test]
    fn thread_count_does_not_change_the_image() {
        let jitter = JitterTable::generate(&mut Lcg::seed_from_u64(99), 4).unwrap();
        let reference = Renderer::new(spec(23, 17, 4), jitter.clone(), 1)
            .unwrap()
            .render_single()
            .unwrap();
        for threads in 1..6 {
            for chunk in &[1, 3, 8, 40] {
                let image = Renderer::new(spec(23, 17, 4), jitter.clone(), threads)
                    .unwrap()
                    .with_chunk(*chunk)
                    .unwrap()
                    .render()
                    .unwrap();
                assert_eq!(image, reference, "threads {} chunk {}", threads, chunk);
            }
        }
    }

    #[test]
    fn chunks_taller_than_the_image_still_render() {
        let jitter = JitterTable::from_offsets(vec![0.0]).unwrap();
        let reference = Renderer::new(spec(4, 2, 1), jitter.clone(), 1)
            .unwrap()
            .render_single()
            .unwrap();
        for chunk in &[usize::max_value() / 2, usize::max_value()] {
            let image = Renderer::new(spec(4, 2, 1), jitter.clone(), 2)
                .unwrap()
                .with_chunk(*chunk)
                .unwrap()
                .render()
                .unwrap();
            assert_eq!(image, reference);
        }
    }

    #[test]
    fn oversized_images_fail_to_allocate() {
        let huge = RenderSpec::new(
            Complex::new(0.0, 0.0),
            1.0,
            usize::max_value() / 2,
            3,
            1,
            1,
        )
        .unwrap();
        match allocate(&huge) {
            Err(RenderError::Allocation { .. }) => (),
            other => panic!("expected an allocation failure, got {:?}", other.map(|v| v.len())),
        }
    }
}
