// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Hands out the image to the workers a band of rows at a time.
//!
//! The cursor is a mutex around an iterator of mutable slices of the
//! image buffer, each slice `chunk` rows tall.  A worker holds the
//! lock only long enough to pull the next band out of the iterator;
//! after that the band is its own, and the borrow checker guarantees
//! nobody else can touch it.

use crate::errors::RenderError;
use log::trace;
use std::iter::Enumerate;
use std::slice::ChunksMut;
use std::sync::Mutex;

/// The default number of rows handed out per claim.  More than eight
/// doesn't seem to improve performance.
pub const DEFAULT_CHUNK: usize = 8;

/// A run of consecutive rows claimed by one worker.
#[derive(Debug)]
pub struct RowBand<'a> {
    first_row: usize,
    row_bytes: usize,
    full: bool,
    pixels: &'a mut [u8],
}

impl<'a> RowBand<'a> {
    /// Index of the first row in the band.
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// The number of rows in the band.
    pub fn len(&self) -> usize {
        self.pixels.len() / self.row_bytes
    }

    /// True if the band holds no rows.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// True if the band ran off the bottom of the image, which means
    /// there is nothing left to claim after it.
    pub fn is_last(&self) -> bool {
        !self.full
    }

    /// Each row index paired with the bytes of that row.
    pub fn rows(&mut self) -> impl Iterator<Item = (usize, &mut [u8])> {
        let first_row = self.first_row;
        self.pixels
            .chunks_mut(self.row_bytes)
            .enumerate()
            .map(move |(i, row)| (first_row + i, row))
    }
}

/// The shared cursor over an image buffer.
pub struct RowCursor<'a> {
    bands: Mutex<Enumerate<ChunksMut<'a, u8>>>,
    row_bytes: usize,
    chunk: usize,
}

impl<'a> RowCursor<'a> {
    /// Split `pixels`, an image whose rows are `row_bytes` long, into
    /// bands of `chunk` rows.
    pub fn new(pixels: &'a mut [u8], row_bytes: usize, chunk: usize) -> Result<Self, RenderError> {
        if row_bytes == 0 || chunk == 0 {
            return Err(RenderError::invalid(format!(
                "rows of {} bytes cannot be handed out {} at a time",
                row_bytes, chunk
            )));
        }
        if pixels.len() % row_bytes != 0 {
            return Err(RenderError::invalid(format!(
                "a buffer of {} bytes is not a whole number of {}-byte rows",
                pixels.len(),
                row_bytes
            )));
        }
        // A band taller than the image is just the whole image.
        let band_bytes = row_bytes.saturating_mul(chunk);
        Ok(RowCursor {
            bands: Mutex::new(pixels.chunks_mut(band_bytes).enumerate()),
            row_bytes,
            chunk,
        })
    }

    /// Claim the next band, or `None` once the image is exhausted.
    pub fn claim(&self) -> Result<Option<RowBand<'a>>, RenderError> {
        let next = {
            self.bands
                .lock()
                .map_err(|_| RenderError::Synchronization)?
                .next()
        };
        Ok(next.map(|(index, pixels)| {
            let band = RowBand {
                first_row: index * self.chunk,
                row_bytes: self.row_bytes,
                full: pixels.len() == self.row_bytes.saturating_mul(self.chunk),
                pixels,
            };
            trace!("claimed rows {}..{}", band.first_row, band.first_row + band.len());
            band
        }))
    }

    /// The worker loop: keep claiming bands and handing each row to
    /// `render` until the image runs out.  Returns the number of rows
    /// this worker rendered.
    pub fn drain<F>(&self, mut render: F) -> Result<usize, RenderError>
    where
        F: FnMut(usize, &mut [u8]),
    {
        let mut rendered = 0;
        while let Some(mut band) = self.claim()? {
            for (row, pixels) in band.rows() {
                render(row, pixels);
                rendered += 1;
            }
            if band.is_last() {
                break;
            }
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_consecutive() {
        let mut pixels = vec![0_u8; 6 * 20];
        let cursor = RowCursor::new(&mut pixels, 6, 8).unwrap();
        let first = cursor.claim().unwrap().unwrap();
        let second = cursor.claim().unwrap().unwrap();
        let third = cursor.claim().unwrap().unwrap();
        assert_eq!((first.first_row(), first.len()), (0, 8));
        assert_eq!((second.first_row(), second.len()), (8, 8));
        assert_eq!((third.first_row(), third.len()), (16, 4));
        assert!(!second.is_last());
        assert!(third.is_last());
        assert!(cursor.claim().unwrap().is_none());
    }

    #[test]
    fn exact_multiples_end_with_nothing() {
        let mut pixels = vec![0_u8; 3 * 16];
        let cursor = RowCursor::new(&mut pixels, 3, 8).unwrap();
        assert!(!cursor.claim().unwrap().unwrap().is_last());
        assert!(!cursor.claim().unwrap().unwrap().is_last());
        assert!(cursor.claim().unwrap().is_none());
    }

    #[test]
    fn drain_visits_every_row_once() {
        let mut pixels = vec![0_u8; 3 * 13];
        {
            let cursor = RowCursor::new(&mut pixels, 3, 4).unwrap();
            let rendered = cursor
                .drain(|row, bytes| {
                    for b in bytes.iter_mut() {
                        *b += row as u8 + 1;
                    }
                })
                .unwrap();
            assert_eq!(rendered, 13);
        }
        for (row, bytes) in pixels.chunks(3).enumerate() {
            assert_eq!(bytes, &[row as u8 + 1; 3][..]);
        }
    }

    #[test]
    fn huge_chunks_hand_out_one_band() {
        let mut pixels = vec![0_u8; 3 * 5];
        let cursor = RowCursor::new(&mut pixels, 3, usize::max_value()).unwrap();
        let band = cursor.claim().unwrap().unwrap();
        assert_eq!((band.first_row(), band.len()), (0, 5));
        assert!(band.is_last());
        assert!(cursor.claim().unwrap().is_none());
    }

    #[test]
    fn bad_geometry_is_rejected() {
        let mut pixels = vec![0_u8; 10];
        assert!(RowCursor::new(&mut pixels, 0, 8).is_err());
        assert!(RowCursor::new(&mut pixels, 3, 8).is_err());
        assert!(RowCursor::new(&mut pixels, 5, 0).is_err());
    }
}
