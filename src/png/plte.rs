use super::*;

/// Palette
///
/// Between 1 and 256 RGB entries, borrowed from the chunk data. A pixel's
/// palette index is its position in the list.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Palette<'b>(pub(crate) &'b [[u8; 3]]);
impl<'b> Palette<'b> {
  /// Parses `PLTE` chunk data.
  #[inline]
  pub fn parse(data: &'b [u8]) -> Result<Self, PngError> {
    let bad_len = PngError::InvalidPaletteLength { len: data.len() };
    let entries: &[[u8; 3]] = bytemuck::try_cast_slice(data).map_err(|_| bad_len)?;
    if entries.is_empty() || entries.len() > 256 {
      return Err(bad_len);
    }
    Ok(Self(entries))
  }

  #[inline]
  #[must_use]
  pub const fn len(&self) -> usize {
    self.0.len()
  }

  /// Always `false` for a parsed palette.
  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  #[inline]
  #[must_use]
  pub fn get(&self, index: u8) -> Option<[u8; 3]> {
    self.0.get(usize::from(index)).copied()
  }
}
impl Debug for Palette<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "Palette({} entries)", self.0.len())
  }
}
