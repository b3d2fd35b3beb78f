/// Settings for a full decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PngDecodeConfig {
  /// Images wider than this are rejected before any image data is touched.
  pub max_width: u32,
  /// Images taller than this are rejected before any image data is touched.
  pub max_height: u32,
  /// Fail with `MissingEndChunk` if the input ends without an `IEND`.
  pub require_end_chunk: bool,
}
impl Default for PngDecodeConfig {
  #[inline]
  fn default() -> Self {
    Self { max_width: 17_000, max_height: 17_000, require_end_chunk: false }
  }
}
impl PngDecodeConfig {
  /// No dimension limits.
  #[inline]
  #[must_use]
  pub const fn unlimited() -> Self {
    Self { max_width: u32::MAX, max_height: u32::MAX, require_end_chunk: false }
  }

  #[inline]
  #[must_use]
  pub const fn allows(&self, width: u32, height: u32) -> bool {
    width <= self.max_width && height <= self.max_height
  }
}
