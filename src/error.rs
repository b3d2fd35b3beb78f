use core::{
  fmt::{self, Display},
  num::TryFromIntError,
};

use crate::png::{ChunkType, ColorModel};

/// An error from the `pngdec` crate.
///
/// Every error is fatal to the decode that produced it: there's no partial
/// image and no retry. Where it makes sense the variant carries the chunk type,
/// the byte offset of the chunk within the input, and the expected versus
/// actual values, so that a corrupt file can be diagnosed from the error alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngError {
  /// The first eight bytes aren't the PNG signature.
  NotAPng,

  /// The input ended partway through a chunk.
  UnexpectedEndOfInput {
    /// Offset of the chunk that was cut off.
    offset: usize,
  },

  /// A chunk declared a length above `2^31 - 1`.
  ChunkTooLong {
    /// Type of the oversized chunk.
    chunk: ChunkType,
    /// Offset of the chunk's length field.
    offset: usize,
    /// The declared length.
    len: u32,
  },

  /// The recomputed CRC of a chunk doesn't match the declared one.
  ChecksumMismatch {
    /// Type of the corrupt chunk.
    chunk: ChunkType,
    /// Offset of the chunk's length field.
    offset: usize,
    /// The CRC stored after the chunk data.
    declared: u32,
    /// The CRC computed over the type and data.
    actual: u32,
  },

  /// The first chunk wasn't `IHDR` (or there were no chunks at all).
  HeaderChunkMissing {
    /// The chunk found in first position, if any.
    found: Option<ChunkType>,
  },

  /// A second `IHDR` chunk.
  DuplicateHeader { offset: usize },

  /// A second `PLTE` chunk.
  DuplicatePalette { offset: usize },

  /// An indexed image had `IDAT` or `tRNS` before its `PLTE`.
  PaletteNotYetSeen { chunk: ChunkType, offset: usize },

  /// `PLTE` in a grayscale image.
  UnexpectedPalette { color_model: ColorModel },

  /// `tRNS` in an image that already has an alpha channel.
  UnexpectedTransparency { color_model: ColorModel },

  /// `PLTE` or `tRNS` after the image data started.
  ChunkOutOfOrder { chunk: ChunkType, offset: usize },

  /// An unrecognized chunk with the critical bit set.
  UnknownCriticalChunk { chunk: ChunkType, offset: usize },

  /// No `IDAT` chunks were found.
  MissingImageData,

  /// The stream ended without `IEND` and the config requires one.
  MissingEndChunk,

  /// `IHDR` data wasn't exactly 13 bytes.
  MalformedHeader { len: usize },

  /// The declared width and/or height of this image is 0.
  ImageDimensionsZero,

  /// The image is larger than the decoder config allows.
  DimensionsTooLarge { width: u32, height: u32 },

  /// Compression method other than 0.
  UnsupportedCompression { method: u8 },

  /// Filter method other than 0.
  UnsupportedFilter { method: u8 },

  /// Color type code outside of `0, 2, 3, 4, 6`.
  InvalidColorModel { code: u8 },

  /// A bit depth that isn't allowed with the color model.
  InvalidBitDepth { color_model: ColorModel, bit_depth: u8 },

  /// Interlace method other than 0 or 1.
  InvalidInterlaceMethod { method: u8 },

  /// The image is Adam7 interlaced, which this decoder doesn't handle.
  InterlaceNotSupported,

  /// `PLTE` data isn't a whole number of entries, or has 0 or more than 256.
  InvalidPaletteLength { len: usize },

  /// `tRNS` data is the wrong size for a grayscale or truecolor key.
  InvalidTransparencyLength { color_model: ColorModel, expected: usize, actual: usize },

  /// Indexed `tRNS` has more entries than the palette.
  TransparencyExceedsPalette { entries: usize, palette_len: usize },

  /// The zlib stream couldn't be inflated.
  DecompressionError,

  /// Less decompressed data than the header calls for.
  TruncatedImageData { expected: usize, actual: usize },

  /// More decompressed data than the header calls for.
  ///
  /// Inflation stops one byte past the expected size, so `actual` is at most
  /// `expected + 1` even when the stream holds far more.
  TrailingImageData { expected: usize, actual: usize },

  /// A scanline started with a filter byte other than 0 through 4.
  UnknownFilterType { row: u32, filter: u8 },

  /// A pixel used a palette index past the end of the palette.
  PaletteLookupOutOfRange { index: u8, palette_len: usize },

  /// The allocator couldn't give us enough space.
  Alloc,

  /// A checked math operation failed.
  CheckedMath,

  /// Reading the input failed.
  #[cfg(feature = "std")]
  Io(std::io::ErrorKind),
}

impl Display for PngError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    use PngError::*;
    match *self {
      NotAPng => write!(f, "not a PNG: bad signature"),
      UnexpectedEndOfInput { offset } => {
        write!(f, "input ended inside the chunk at byte {offset}")
      }
      ChunkTooLong { chunk, offset, len } => {
        write!(f, "{chunk} chunk at byte {offset} declares length {len}, above 2^31-1")
      }
      ChecksumMismatch { chunk, offset, declared, actual } => write!(
        f,
        "{chunk} chunk at byte {offset}: declared CRC {declared:#010X}, computed {actual:#010X}"
      ),
      HeaderChunkMissing { found: Some(chunk) } => {
        write!(f, "first chunk must be IHDR, found {chunk}")
      }
      HeaderChunkMissing { found: None } => write!(f, "no IHDR chunk"),
      DuplicateHeader { offset } => write!(f, "second IHDR chunk at byte {offset}"),
      DuplicatePalette { offset } => write!(f, "second PLTE chunk at byte {offset}"),
      PaletteNotYetSeen { chunk, offset } => {
        write!(f, "{chunk} chunk at byte {offset} appears before PLTE in an indexed image")
      }
      UnexpectedPalette { color_model } => {
        write!(f, "PLTE chunk is not allowed with color model {color_model:?}")
      }
      UnexpectedTransparency { color_model } => {
        write!(f, "tRNS chunk is not allowed with color model {color_model:?}")
      }
      ChunkOutOfOrder { chunk, offset } => {
        write!(f, "{chunk} chunk at byte {offset} appears after IDAT")
      }
      UnknownCriticalChunk { chunk, offset } => {
        write!(f, "unknown critical chunk {chunk} at byte {offset}")
      }
      MissingImageData => write!(f, "no IDAT chunks"),
      MissingEndChunk => write!(f, "no IEND chunk"),
      MalformedHeader { len } => write!(f, "IHDR data is {len} bytes, expected 13"),
      ImageDimensionsZero => write!(f, "width and height must be non-zero"),
      DimensionsTooLarge { width, height } => {
        write!(f, "image dimensions {width}x{height} exceed the configured limit")
      }
      UnsupportedCompression { method } => write!(f, "unsupported compression method {method}"),
      UnsupportedFilter { method } => write!(f, "unsupported filter method {method}"),
      InvalidColorModel { code } => write!(f, "invalid color type {code}"),
      InvalidBitDepth { color_model, bit_depth } => {
        write!(f, "bit depth {bit_depth} is not allowed with color model {color_model:?}")
      }
      InvalidInterlaceMethod { method } => write!(f, "invalid interlace method {method}"),
      InterlaceNotSupported => write!(f, "interlaced images are not supported"),
      InvalidPaletteLength { len } => write!(f, "PLTE data length {len} is invalid"),
      InvalidTransparencyLength { color_model, expected, actual } => write!(
        f,
        "tRNS for {color_model:?} must be {expected} bytes, found {actual}"
      ),
      TransparencyExceedsPalette { entries, palette_len } => write!(
        f,
        "tRNS has {entries} entries but the palette only has {palette_len}"
      ),
      DecompressionError => write!(f, "image data is not a valid zlib stream"),
      TruncatedImageData { expected, actual } => {
        write!(f, "expected {expected} bytes of image data, found only {actual}")
      }
      TrailingImageData { expected, actual } => {
        write!(f, "expected {expected} bytes of image data, found {actual}")
      }
      UnknownFilterType { row, filter } => write!(f, "row {row} has unknown filter type {filter}"),
      PaletteLookupOutOfRange { index, palette_len } => {
        write!(f, "palette index {index} out of range for {palette_len} entries")
      }
      Alloc => write!(f, "allocation failed"),
      CheckedMath => write!(f, "image size arithmetic overflowed"),
      #[cfg(feature = "std")]
      Io(kind) => write!(f, "i/o error: {kind:?}"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for PngError {}

impl From<alloc::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
impl From<TryFromIntError> for PngError {
  #[inline]
  fn from(_: TryFromIntError) -> Self {
    Self::CheckedMath
  }
}
#[cfg(feature = "std")]
impl From<std::io::Error> for PngError {
  #[inline]
  fn from(e: std::io::Error) -> Self {
    Self::Io(e.kind())
  }
}

/// Shorthand for a result with a [`PngError`].
pub type PngResult<T> = Result<T, PngError>;
