use super::*;

/// Transparency
///
/// The format of the `tRNS` data depends on the color model:
/// * Indexed: one alpha byte per palette entry. There can be fewer alpha
///   entries than palette entries, the missing ones are fully opaque.
/// * Grayscale: one big-endian `u16` sample value that's fully transparent.
/// * Truecolor: three big-endian `u16` values, an RGB color that's fully
///   transparent.
///
/// Keys are compared against the native samples, before any rescaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransparencyKey<'b> {
  Indexed { alpha_by_index: &'b [u8] },
  Grayscale { key: u16 },
  Truecolor { key: [u16; 3] },
}
impl<'b> TransparencyKey<'b> {
  /// Parses `tRNS` chunk data for an image with the given color model.
  ///
  /// Indexed images check the entry count against `palette`, and no palette
  /// counts as a palette of length 0.
  pub fn parse(
    data: &'b [u8], palette: Option<Palette<'_>>, color_model: ColorModel,
  ) -> Result<Self, PngError> {
    match color_model {
      ColorModel::Indexed => {
        let palette_len = palette.map_or(0, |p| p.len());
        if data.len() > palette_len {
          return Err(PngError::TransparencyExceedsPalette { entries: data.len(), palette_len });
        }
        Ok(Self::Indexed { alpha_by_index: data })
      }
      ColorModel::Grayscale => match *data {
        [y0, y1] => Ok(Self::Grayscale { key: u16::from_be_bytes([y0, y1]) }),
        _ => Err(PngError::InvalidTransparencyLength {
          color_model,
          expected: 2,
          actual: data.len(),
        }),
      },
      ColorModel::Truecolor => match *data {
        [r0, r1, g0, g1, b0, b1] => Ok(Self::Truecolor {
          key: [
            u16::from_be_bytes([r0, r1]),
            u16::from_be_bytes([g0, g1]),
            u16::from_be_bytes([b0, b1]),
          ],
        }),
        _ => Err(PngError::InvalidTransparencyLength {
          color_model,
          expected: 6,
          actual: data.len(),
        }),
      },
      ColorModel::GrayscaleAlpha | ColorModel::TruecolorAlpha => {
        Err(PngError::UnexpectedTransparency { color_model })
      }
    }
  }
}
