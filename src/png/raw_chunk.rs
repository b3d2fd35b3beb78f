use super::*;

/// A chunk's four byte ASCII type tag.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl ChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const tRNS: Self = Self(*b"tRNS");

  /// Critical chunks have bit 5 of the first byte clear (an uppercase first
  /// letter). A decoder that doesn't know a critical chunk can't go on.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    (self.0[0] & 0x20) == 0
  }

  /// The opposite of [`is_critical`](Self::is_critical): ancillary chunks can
  /// be skipped if unknown.
  #[inline]
  #[must_use]
  pub const fn is_ancillary(self) -> bool {
    !self.is_critical()
  }
}
impl Debug for ChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char(self.0[0] as char)?;
    f.write_char(self.0[1] as char)?;
    f.write_char(self.0[2] as char)?;
    f.write_char(self.0[3] as char)?;
    Ok(())
  }
}
impl Display for ChunkType {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    Debug::fmt(self, f)
  }
}

/// An unparsed chunk from a PNG.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawPngChunk<'b> {
  /// Byte offset of the chunk's length field within the full PNG bytes.
  pub offset: usize,
  pub chunk_type: ChunkType,
  pub data: &'b [u8],
  pub declared_crc: u32,
}
impl Debug for RawPngChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawPngChunk")
      .field("offset", &self.offset)
      .field("chunk_type", &self.chunk_type)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl RawPngChunk<'_> {
  /// The CRC of the chunk type and data, as computed from the bytes.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    png_crc_iter(self.chunk_type.0.iter().chain(self.data.iter()).copied())
  }

  /// Checks the declared CRC against the actual CRC.
  #[inline]
  pub fn verify_crc(&self) -> Result<(), PngError> {
    let actual = self.actual_crc();
    if actual == self.declared_crc {
      Ok(())
    } else {
      Err(PngError::ChecksumMismatch {
        chunk: self.chunk_type,
        offset: self.offset,
        declared: self.declared_crc,
        actual,
      })
    }
  }
}

/// Chunk lengths above this are invalid.
const MAX_CHUNK_LEN: u32 = (1 << 31) - 1;

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// * The iterator ends when the input runs out exactly at a chunk boundary.
/// * A chunk that's cut off partway gives a single error and then the
///   iterator is finished.
///
/// The iterator never panics, whatever bytes it's given.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawPngChunkIter<'b> {
  spare: &'b [u8],
  offset: usize,
}
impl<'b> RawPngChunkIter<'b> {
  /// Pass the full PNG bytes, it will skip the 8 signature bytes.
  ///
  /// The signature isn't checked here, use [`is_png_signature_correct`] for
  /// that.
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    match bytes {
      [_, _, _, _, _, _, _, _, rest @ ..] => Self { spare: rest, offset: PNG_SIGNATURE.len() },
      _ => Self { spare: &[], offset: bytes.len() },
    }
  }

  /// The bytes that haven't been turned into chunks yet.
  #[inline]
  #[must_use]
  pub const fn remaining(&self) -> &'b [u8] {
    self.spare
  }

  #[inline]
  fn cut_off(&mut self) -> Option<Result<RawPngChunk<'b>, PngError>> {
    let offset = self.offset;
    self.offset += self.spare.len();
    self.spare = &[];
    Some(Err(PngError::UnexpectedEndOfInput { offset }))
  }
}
impl<'b> Iterator for RawPngChunkIter<'b> {
  type Item = Result<RawPngChunk<'b>, PngError>;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.spare.is_empty() {
      return None;
    }
    let offset = self.offset;
    let (len, chunk_type, rest) = match self.spare {
      [l0, l1, l2, l3, t0, t1, t2, t3, rest @ ..] => {
        (u32::from_be_bytes([*l0, *l1, *l2, *l3]), ChunkType([*t0, *t1, *t2, *t3]), rest)
      }
      _ => return self.cut_off(),
    };
    if len > MAX_CHUNK_LEN {
      self.offset += self.spare.len();
      self.spare = &[];
      return Some(Err(PngError::ChunkTooLong { chunk: chunk_type, offset, len }));
    }
    let len = len as usize;
    if rest.len() < len + 4 {
      return self.cut_off();
    }
    let (data, rest) = rest.split_at(len);
    let (crc_bytes, rest) = rest.split_at(4);
    let declared_crc = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
    self.spare = rest;
    self.offset = offset + 12 + len;
    Some(Ok(RawPngChunk { offset, chunk_type, data, declared_crc }))
  }
}
