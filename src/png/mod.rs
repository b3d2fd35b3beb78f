//! Holds all the tools for decoding PNG data.
//!
//! ## Automated PNG Decoding
//! If you don't need full control over the decoding process there's functions
//! provided that will take a PNG data stream and just give you the pixels in a
//! [`Bitmap`] of RGBA8 values (along with the width and height).
//!
//! * [`decode_png`] uses the default [`PngDecodeConfig`].
//! * [`decode_png_with_config`] lets you pick the limits.
//! * [`decode_png_with`] lets you supply the zlib inflate step yourself, and
//!   is the only one available without the `miniz_oxide` feature.
//! * [`decode_png_file`] reads a file first (needs `std`).
//! * [`read_header`] just gets the image's header info.
//!
//! ## Decoding a PNG Yourself
//! The general format of a PNG is that the information is stored in "chunks".
//! There's four "critical" chunk types:
//! * **Header** - This has all the important information about the image's
//!   dimensions, pixel format, and if the image is interlaced or not.
//! * **Palette** - If an image uses indexed color it will have a palette of
//!   what index values map to what `RGB8` values.
//! * **Image Data** - One or more chunks of compressed data. All of the
//!   compressed data forms a single zlib data stream.
//! * **End** - The last chunk, lets you know you had the full PNG and your data
//!   wasn't truncated accidentally.
//!
//! After the header and before the image data there are also zero or more
//! "ancillary" chunks. The only one that matters for decoding to RGBA8 is the
//! transparency chunk, the rest are skipped.
//!
//! The stages, each of which you can call on your own:
//! 1. [`RawPngChunkIter`] splits the bytes into [`RawPngChunk`] values, and
//!    each chunk's CRC can be checked with [`RawPngChunk::verify_crc`].
//! 2. [`ChunkReader`] (or [`read_chunks`], which does steps 1 and 2) checks
//!    the chunk order and collects a [`PngChunks`].
//! 3. The concatenated image data gets zlib decompressed.
//! 4. [`unfilter_scanlines`] undoes the per-row filtering, in place.
//! 5. [`assemble_pixels`] turns the rows into RGBA8 pixels.
//!
//! Interlaced images are not supported.

use core::fmt::{Debug, Display, Write};

use alloc::vec::Vec;
use pixel_formats::r8g8b8a8_Srgb;

use crate::{Bitmap, PngError};

mod crc32;
pub use crc32::*;

mod raw_chunk;
pub use raw_chunk::*;

mod ihdr;
pub use ihdr::*;

mod plte;
pub use plte::*;

mod trns;
pub use trns::*;

mod config;
pub use config::*;

mod reader;
pub use reader::*;

mod unfilter;
pub use unfilter::*;

mod assemble;
pub use assemble::*;

#[cfg(test)]
mod tests;

/// The first eight bytes of every PNG.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the PNG's initial 8 bytes are correct.
#[inline]
#[must_use]
pub fn is_png_signature_correct(bytes: &[u8]) -> bool {
  bytes.starts_with(&PNG_SIGNATURE)
}

/// Reads only the signature and the header chunk.
///
/// The header's CRC is checked, nothing past the header is looked at.
pub fn read_header(bytes: &[u8]) -> Result<Header, PngError> {
  if !is_png_signature_correct(bytes) {
    return Err(PngError::NotAPng);
  }
  let chunk =
    RawPngChunkIter::new(bytes).next().ok_or(PngError::HeaderChunkMissing { found: None })??;
  chunk.verify_crc()?;
  if chunk.chunk_type != ChunkType::IHDR {
    return Err(PngError::HeaderChunkMissing { found: Some(chunk.chunk_type) });
  }
  Header::parse(chunk.data)
}

/// Decodes PNG bytes using a zlib inflate function that you provide.
///
/// The `inflate` function gets the concatenated image data (a full zlib
/// stream, header and checksum included) and the number of decompressed
/// bytes the header calls for. It should return the decompressed bytes, and
/// it doesn't need to produce more than one byte past the expected count:
/// any output beyond the expected count is an error either way.
pub fn decode_png_with<F>(
  bytes: &[u8], config: &PngDecodeConfig, inflate: F,
) -> Result<Bitmap, PngError>
where
  F: FnOnce(&[u8], usize) -> Result<Vec<u8>, PngError>,
{
  let chunks = read_chunks(bytes, *config)?;
  let header = chunks.header;
  if header.is_interlaced() {
    return Err(PngError::InterlaceNotSupported);
  }
  let expected = header.filtered_image_len()?;
  log::debug!(
    "{} bytes of compressed data in {} IDAT chunks, expecting {expected} bytes",
    chunks.image_data.len(),
    chunks.image_data_chunks
  );
  let decompressed = inflate(&chunks.image_data, expected)?;
  log::debug!("decompressed to {} bytes", decompressed.len());
  let scanlines = unfilter_scanlines(&header, decompressed)?;
  assemble_pixels(&header, chunks.palette, chunks.transparency, &scanlines)
}

/// Inflates a zlib stream with `miniz_oxide`, expecting `expected` bytes of
/// output.
///
/// Output is capped at `expected + 1` bytes. A stream that would go past the
/// cap gives [`PngError::TrailingImageData`] without inflating the rest.
#[cfg(feature = "miniz_oxide")]
#[cfg_attr(docs_rs, doc(cfg(feature = "miniz_oxide")))]
pub fn inflate_zlib(data: &[u8], expected: usize) -> Result<Vec<u8>, PngError> {
  use miniz_oxide::inflate::{decompress_to_vec_zlib_with_limit, TINFLStatus};
  let limit = expected.saturating_add(1);
  decompress_to_vec_zlib_with_limit(data, limit).map_err(|e| match e.status {
    TINFLStatus::HasMoreOutput => {
      log::debug!("zlib stream inflates past {limit} bytes");
      PngError::TrailingImageData { expected, actual: limit }
    }
    status => {
      log::debug!("zlib inflate failed: {status:?}");
      PngError::DecompressionError
    }
  })
}

/// Decodes PNG bytes with the given settings.
#[cfg(feature = "miniz_oxide")]
#[cfg_attr(docs_rs, doc(cfg(feature = "miniz_oxide")))]
#[inline]
pub fn decode_png_with_config(bytes: &[u8], config: &PngDecodeConfig) -> Result<Bitmap, PngError> {
  decode_png_with(bytes, config, inflate_zlib)
}

/// Decodes PNG bytes with the default settings.
#[cfg(feature = "miniz_oxide")]
#[cfg_attr(docs_rs, doc(cfg(feature = "miniz_oxide")))]
#[inline]
pub fn decode_png(bytes: &[u8]) -> Result<Bitmap, PngError> {
  decode_png_with_config(bytes, &PngDecodeConfig::default())
}

/// Reads the whole file at `path` and decodes it with the default settings.
#[cfg(all(feature = "std", feature = "miniz_oxide"))]
#[cfg_attr(docs_rs, doc(cfg(all(feature = "std", feature = "miniz_oxide"))))]
pub fn decode_png_file<P: AsRef<std::path::Path>>(path: P) -> Result<Bitmap, PngError> {
  let path = path.as_ref();
  let bytes = std::fs::read(path)?;
  log::debug!("read {} bytes from {}", bytes.len(), path.display());
  decode_png(&bytes)
}
