use super::*;

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ColorModel {
  /// Greyscale
  Grayscale = 0,
  /// Red, Green, Blue
  Truecolor = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data. There may optionally be a transparency
  /// chunk.
  Indexed = 3,
  /// Greyscale + Alpha
  GrayscaleAlpha = 4,
  /// Red, Green, Blue, Alpha
  TruecolorAlpha = 6,
}
impl ColorModel {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> u8 {
    match self {
      Self::Grayscale => 1,
      Self::Truecolor => 3,
      Self::Indexed => 1,
      Self::GrayscaleAlpha => 2,
      Self::TruecolorAlpha => 4,
    }
  }

  /// If the color model carries its own alpha channel.
  #[inline]
  #[must_use]
  pub const fn has_alpha(self) -> bool {
    matches!(self, Self::GrayscaleAlpha | Self::TruecolorAlpha)
  }
}
impl TryFrom<u8> for ColorModel {
  type Error = PngError;
  #[inline]
  fn try_from(code: u8) -> Result<Self, Self::Error> {
    Ok(match code {
      0 => Self::Grayscale,
      2 => Self::Truecolor,
      3 => Self::Indexed,
      4 => Self::GrayscaleAlpha,
      6 => Self::TruecolorAlpha,
      _ => return Err(PngError::InvalidColorModel { code }),
    })
  }
}

/// Bits per sample (or per palette index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum BitDepth {
  One = 1,
  Two = 2,
  Four = 4,
  Eight = 8,
  Sixteen = 16,
}
impl BitDepth {
  #[inline]
  #[must_use]
  pub const fn bits(self) -> u8 {
    self as u8
  }

  /// Checks the depth against the ones that the color model allows.
  #[inline]
  pub const fn for_color_model(bit_depth: u8, color_model: ColorModel) -> Result<Self, PngError> {
    let depth = match bit_depth {
      1 => Self::One,
      2 => Self::Two,
      4 => Self::Four,
      8 => Self::Eight,
      16 => Self::Sixteen,
      _ => return Err(PngError::InvalidBitDepth { color_model, bit_depth }),
    };
    let legal = match color_model {
      ColorModel::Grayscale => true,
      ColorModel::Indexed => !matches!(depth, Self::Sixteen),
      ColorModel::Truecolor | ColorModel::GrayscaleAlpha | ColorModel::TruecolorAlpha => {
        matches!(depth, Self::Eight | Self::Sixteen)
      }
    };
    if legal {
      Ok(depth)
    } else {
      Err(PngError::InvalidBitDepth { color_model, bit_depth })
    }
  }
}

/// How the scanlines are ordered in the image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum InterlaceMethod {
  None = 0,
  /// Please don't make new interlaced images, they're terrible.
  Adam7 = 1,
}

/// Image Header
///
/// Always the first chunk of the image. Once parsed it can't hold an illegal
/// combination of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Header {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  pub bit_depth: BitDepth,
  pub color_model: ColorModel,
  /// Always 0 (zlib)
  pub compression_method: u8,
  /// Always 0 (the five adaptive filters)
  pub filter_method: u8,
  pub interlace_method: InterlaceMethod,
}
impl Header {
  /// Parses the 13 bytes of `IHDR` chunk data.
  ///
  /// Problems are checked in a fixed order, and the first one found is the
  /// error returned: length, dimensions, compression, filter, color model, bit
  /// depth, interlace.
  pub fn parse(data: &[u8]) -> Result<Self, PngError> {
    #[rustfmt::skip]
    let [
      w0, w1, w2, w3,
      h0, h1, h2, h3,
      bit_depth, color_code, compression_method, filter_method, interlace_method,
    ] = *data else {
      return Err(PngError::MalformedHeader { len: data.len() });
    };
    let width = u32::from_be_bytes([w0, w1, w2, w3]);
    let height = u32::from_be_bytes([h0, h1, h2, h3]);
    if width == 0 || height == 0 {
      return Err(PngError::ImageDimensionsZero);
    }
    if compression_method != 0 {
      return Err(PngError::UnsupportedCompression { method: compression_method });
    }
    if filter_method != 0 {
      return Err(PngError::UnsupportedFilter { method: filter_method });
    }
    let color_model = ColorModel::try_from(color_code)?;
    let bit_depth = BitDepth::for_color_model(bit_depth, color_model)?;
    let interlace_method = match interlace_method {
      0 => InterlaceMethod::None,
      1 => InterlaceMethod::Adam7,
      method => return Err(PngError::InvalidInterlaceMethod { method }),
    };
    Ok(Self {
      width,
      height,
      bit_depth,
      color_model,
      compression_method,
      filter_method,
      interlace_method,
    })
  }

  /// Bits used by a single pixel (at most 64).
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> u32 {
    (self.bit_depth.bits() as u32) * (self.color_model.channel_count() as u32)
  }

  /// Bytes in one unfiltered row, not counting the filter byte.
  ///
  /// When pixels are less than 8 bits it's possible to end up with a partial
  /// byte at the end of the row, so this rounds up.
  #[inline]
  pub fn stride(&self) -> Result<usize, PngError> {
    let bits = (self.width as u64) * u64::from(self.bits_per_pixel());
    Ok(usize::try_from(bits.div_ceil(8))?)
  }

  /// The byte distance back to the "left" byte when unfiltering.
  ///
  /// This is the whole-byte size of a pixel, or 1 for sub-byte pixels.
  #[inline]
  #[must_use]
  pub const fn filter_distance(&self) -> usize {
    let bytes = self.bits_per_pixel().div_ceil(8) as usize;
    if bytes == 0 {
      1
    } else {
      bytes
    }
  }

  /// Bytes of decompressed image data that the header calls for: each row is
  /// a filter byte plus the row's pixel bytes.
  #[inline]
  pub fn filtered_image_len(&self) -> Result<usize, PngError> {
    let row = self.stride()?.checked_add(1).ok_or(PngError::CheckedMath)?;
    row.checked_mul(self.height as usize).ok_or(PngError::CheckedMath)
  }

  /// If the image is Adam7 interlaced.
  #[inline]
  #[must_use]
  pub const fn is_interlaced(&self) -> bool {
    matches!(self.interlace_method, InterlaceMethod::Adam7)
  }
}
