use super::*;

use crate::samples::{rescale, split_samples};

/// How to turn one row of raw samples into RGBA8 pixels.
///
/// This gets picked once per image, so the per-pixel loops don't need to
/// branch on the color model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout<'b> {
  Grayscale { bit_depth: BitDepth, key: Option<u16> },
  Truecolor { bit_depth: BitDepth, key: Option<[u16; 3]> },
  Indexed { bit_depth: BitDepth, palette: Palette<'b>, alpha_by_index: &'b [u8] },
  GrayscaleAlpha { bit_depth: BitDepth },
  TruecolorAlpha { bit_depth: BitDepth },
}
impl<'b> PixelLayout<'b> {
  /// Picks the layout for an image.
  ///
  /// A key that doesn't match the color model is ignored, as is a palette for
  /// anything other than indexed color. An indexed image without a palette
  /// gets an empty one, so every pixel will be out of range.
  #[must_use]
  pub fn new(
    header: &Header, palette: Option<Palette<'b>>, transparency: Option<TransparencyKey<'b>>,
  ) -> Self {
    let bit_depth = header.bit_depth;
    match header.color_model {
      ColorModel::Grayscale => {
        let key = match transparency {
          Some(TransparencyKey::Grayscale { key }) => Some(key),
          _ => None,
        };
        Self::Grayscale { bit_depth, key }
      }
      ColorModel::Truecolor => {
        let key = match transparency {
          Some(TransparencyKey::Truecolor { key }) => Some(key),
          _ => None,
        };
        Self::Truecolor { bit_depth, key }
      }
      ColorModel::Indexed => {
        let alpha_by_index = match transparency {
          Some(TransparencyKey::Indexed { alpha_by_index }) => alpha_by_index,
          _ => &[],
        };
        Self::Indexed { bit_depth, palette: palette.unwrap_or(Palette(&[])), alpha_by_index }
      }
      ColorModel::GrayscaleAlpha => Self::GrayscaleAlpha { bit_depth },
      ColorModel::TruecolorAlpha => Self::TruecolorAlpha { bit_depth },
    }
  }

  /// Appends `width` pixels made from `row` to `out`.
  ///
  /// Padding samples at the end of a packed row are ignored. The row must be
  /// at least as long as the header's stride.
  pub fn push_row(
    &self, row: &[u8], width: usize, out: &mut Vec<r8g8b8a8_Srgb>,
  ) -> Result<(), PngError> {
    match *self {
      Self::Grayscale { bit_depth, key } => {
        out.extend(row_samples(row, bit_depth).take(width).map(|s| {
          let y = rescale(s, bit_depth);
          let a = if key == Some(s) { 0 } else { 255 };
          r8g8b8a8_Srgb { r: y, g: y, b: y, a }
        }));
      }
      Self::Truecolor { bit_depth, key } => {
        let size = pixel_bytes(3, bit_depth);
        out.extend(row.chunks_exact(size).take(width).map(|px| {
          let rgb = [0, 1, 2].map(|i| channel(px, i, bit_depth));
          let [r, g, b] = rgb.map(|s| rescale(s, bit_depth));
          let a = if key == Some(rgb) { 0 } else { 255 };
          r8g8b8a8_Srgb { r, g, b, a }
        }));
      }
      Self::Indexed { bit_depth, palette, alpha_by_index } => {
        for s in row_samples(row, bit_depth).take(width) {
          let index = s as u8;
          let [r, g, b] = palette
            .get(index)
            .ok_or(PngError::PaletteLookupOutOfRange { index, palette_len: palette.len() })?;
          let a = alpha_by_index.get(usize::from(index)).copied().unwrap_or(255);
          out.push(r8g8b8a8_Srgb { r, g, b, a });
        }
      }
      Self::GrayscaleAlpha { bit_depth } => {
        let size = pixel_bytes(2, bit_depth);
        out.extend(row.chunks_exact(size).take(width).map(|px| {
          let y = rescale(channel(px, 0, bit_depth), bit_depth);
          let a = rescale(channel(px, 1, bit_depth), bit_depth);
          r8g8b8a8_Srgb { r: y, g: y, b: y, a }
        }));
      }
      Self::TruecolorAlpha { bit_depth } => {
        let size = pixel_bytes(4, bit_depth);
        out.extend(row.chunks_exact(size).take(width).map(|px| {
          let [r, g, b, a] = [0, 1, 2, 3].map(|i| rescale(channel(px, i, bit_depth), bit_depth));
          r8g8b8a8_Srgb { r, g, b, a }
        }));
      }
    }
    Ok(())
  }
}

/// Bytes per pixel for the whole-byte depths.
#[inline]
const fn pixel_bytes(channels: usize, bit_depth: BitDepth) -> usize {
  match bit_depth {
    BitDepth::Sixteen => channels * 2,
    _ => channels,
  }
}

/// Channel `i` of a pixel in native form. 16-bit samples are big-endian.
#[inline]
fn channel(px: &[u8], i: usize, bit_depth: BitDepth) -> u16 {
  match bit_depth {
    BitDepth::Sixteen => u16::from_be_bytes([px[2 * i], px[2 * i + 1]]),
    _ => u16::from(px[i]),
  }
}

/// Every sample in a row, in native form, including any padding samples at
/// the end.
fn row_samples(row: &[u8], bit_depth: BitDepth) -> impl Iterator<Item = u16> + '_ {
  let (packed, wide) = if bit_depth == BitDepth::Sixteen {
    (None, Some(row.chunks_exact(2).map(|p| u16::from_be_bytes([p[0], p[1]]))))
  } else {
    (Some(row.iter().flat_map(move |&b| split_samples(b, bit_depth)).map(u16::from)), None)
  };
  packed.into_iter().flatten().chain(wide.into_iter().flatten())
}

/// Builds the final image out of reconstructed scanlines.
pub fn assemble_pixels(
  header: &Header, palette: Option<Palette<'_>>, transparency: Option<TransparencyKey<'_>>,
  scanlines: &Scanlines,
) -> Result<Bitmap, PngError> {
  let layout = PixelLayout::new(header, palette, transparency);
  let width = header.width as usize;
  let count = usize::try_from(u64::from(header.width) * u64::from(header.height))?;
  let mut pixels: Vec<r8g8b8a8_Srgb> = Vec::new();
  pixels.try_reserve_exact(count)?;
  for row in scanlines.rows().take(header.height as usize) {
    layout.push_row(row, width, &mut pixels)?;
  }
  debug_assert_eq!(pixels.len(), count);
  Ok(Bitmap { width: header.width, height: header.height, pixels })
}
