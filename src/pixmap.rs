// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing the finished image.  The native format is a binary
//! pixmap (P6); a `.png` path gets the same pixels as a PNG instead.

use crate::errors::RenderError;
use image::png::PNGEncoder;
use image::ColorType;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// The largest value of a channel.
pub const MAX_CHANNEL: u8 = 255;

/// Write a P6 header followed by the raw RGB bytes.
pub fn write_pixmap<W: Write>(
    writer: &mut W,
    pixels: &[u8],
    bounds: (usize, usize),
) -> io::Result<()> {
    if pixels.len() != bounds.0 * bounds.1 * 3 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} bytes is not a {}x{} RGB image",
                pixels.len(),
                bounds.0,
                bounds.1
            ),
        ));
    }
    write!(writer, "P6\n{} {}\n{}\n", bounds.0, bounds.1, MAX_CHANNEL)?;
    writer.write_all(pixels)?;
    writer.flush()
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

fn encode(path: &Path, pixels: &[u8], bounds: (usize, usize)) -> io::Result<()> {
    let mut output = BufWriter::new(File::create(path)?);
    if is_png(path) {
        PNGEncoder::new(&mut output).encode(
            pixels,
            bounds.0 as u32,
            bounds.1 as u32,
            ColorType::RGB(8),
        )?;
        output.flush()
    } else {
        write_pixmap(&mut output, pixels, bounds)
    }
}

/// Write the image to `path`, choosing the format by extension.
pub fn write_image(path: &Path, pixels: &[u8], bounds: (usize, usize)) -> Result<(), RenderError> {
    encode(path, pixels, bounds).map_err(|cause| RenderError::FileWrite {
        path: path.display().to_string(),
        cause,
    })?;
    info!("wrote {}x{} image to {}", bounds.0, bounds.1, path.display());
    Ok(())
}
