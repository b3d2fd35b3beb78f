use super::*;

/// The filter type byte at the start of each scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FilterType {
  None = 0,
  Sub = 1,
  Up = 2,
  Average = 3,
  Paeth = 4,
}
impl TryFrom<u8> for FilterType {
  type Error = u8;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      other => return Err(other),
    })
  }
}

/// Picks whichever of `a` (left), `b` (up), or `c` (up-left) is closest to
/// `a + b - c`.
#[inline]
#[must_use]
pub const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // The order of these tests is part of the format, ties must go a, b, c.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Undoes the Sub filter in place: each byte adds the reconstructed byte
/// `bpp` positions to its left.
#[inline]
pub fn recon_sub(row: &mut [u8], bpp: usize) {
  for i in bpp..row.len() {
    row[i] = row[i].wrapping_add(row[i - bpp]);
  }
}

/// Undoes the Up filter in place. The first row of an image has no previous
/// row, which acts like a row of zeroes.
#[inline]
pub fn recon_up(row: &mut [u8], prev: Option<&[u8]>) {
  if let Some(prev) = prev {
    row.iter_mut().zip(prev.iter().copied()).for_each(|(x, b)| *x = x.wrapping_add(b));
  }
}

/// Undoes the Average filter in place.
#[inline]
pub fn recon_average(row: &mut [u8], prev: Option<&[u8]>, bpp: usize) {
  for i in 0..row.len() {
    let a = if i >= bpp { row[i - bpp] } else { 0 };
    let b = prev.and_then(|p| p.get(i).copied()).unwrap_or(0);
    row[i] = row[i].wrapping_add(((u16::from(a) + u16::from(b)) / 2) as u8);
  }
}

/// Undoes the Paeth filter in place.
#[inline]
pub fn recon_paeth(row: &mut [u8], prev: Option<&[u8]>, bpp: usize) {
  for i in 0..row.len() {
    let a = if i >= bpp { row[i - bpp] } else { 0 };
    let (b, c) = match prev {
      Some(p) => (p.get(i).copied().unwrap_or(0), if i >= bpp { p[i - bpp] } else { 0 }),
      None => (0, 0),
    };
    row[i] = row[i].wrapping_add(paeth_predict(a, b, c));
  }
}

/// Reconstructed scanlines, still in the decompression buffer.
///
/// Each line keeps its leading filter byte (reset to 0) so that no second
/// buffer is needed, and [`rows`](Self::rows) skips over it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scanlines {
  data: Vec<u8>,
  stride: usize,
}
impl Scanlines {
  /// Bytes in each row.
  #[inline]
  #[must_use]
  pub const fn stride(&self) -> usize {
    self.stride
  }

  /// Iterates the raw rows, top to bottom, filter bytes removed.
  #[inline]
  pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
    self.data.chunks_exact(self.stride + 1).map(|line| &line[1..])
  }
}

/// Reverses the per-row filtering of decompressed image data, in place.
///
/// The data must be exactly the size that the header calls for. Rows are
/// processed top to bottom since each one can depend on the row above.
pub fn unfilter_scanlines(header: &Header, mut data: Vec<u8>) -> Result<Scanlines, PngError> {
  let stride = header.stride()?;
  let expected = header.filtered_image_len()?;
  let actual = data.len();
  if actual < expected {
    return Err(PngError::TruncatedImageData { expected, actual });
  }
  if actual > expected {
    return Err(PngError::TrailingImageData { expected, actual });
  }
  let bpp = header.filter_distance();
  let line_len = stride + 1;

  let mut prev: Option<&[u8]> = None;
  for (y, line) in data.chunks_exact_mut(line_len).enumerate() {
    let (f, row) = line.split_at_mut(1);
    let filter = FilterType::try_from(f[0])
      .map_err(|filter| PngError::UnknownFilterType { row: y as u32, filter })?;
    match filter {
      FilterType::None => (),
      FilterType::Sub => recon_sub(row, bpp),
      FilterType::Up => recon_up(row, prev),
      FilterType::Average => recon_average(row, prev, bpp),
      FilterType::Paeth => recon_paeth(row, prev, bpp),
    }
    f[0] = FilterType::None as u8;
    prev = Some(row);
  }

  Ok(Scanlines { data, stride })
}
