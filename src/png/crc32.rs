//! The CRC-32 used by PNG chunks.
//!
//! The lookup table is built at compile time, so there's nothing to
//! initialize at runtime and the table is shared read-only by every caller.

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = 0xEDB8_8320_u32 ^ (c >> 1);
      } else {
        c >>= 1;
      }
      //
      k += 1;
    }
    out[n] = c;
    //
    n += 1;
  }
  out
}

#[inline]
fn update_crc(mut crc: u32, iter: impl Iterator<Item = u8>) -> u32 {
  for byte in iter {
    let i = (crc ^ u32::from(byte)) as u8 as usize;
    crc = CRC_TABLE[i] ^ (crc >> 8);
  }
  crc
}

/// Computes the PNG CRC of all bytes from the iterator.
#[inline]
#[must_use]
pub fn png_crc_iter(iter: impl Iterator<Item = u8>) -> u32 {
  update_crc(u32::MAX, iter) ^ u32::MAX
}

/// Computes the PNG CRC of a byte slice.
///
/// ```
/// # use pngdec::png::png_crc;
/// assert_eq!(png_crc(b"IEND"), 0xAE42_6082);
/// ```
#[inline]
#[must_use]
pub fn png_crc(bytes: &[u8]) -> u32 {
  png_crc_iter(bytes.iter().copied())
}
