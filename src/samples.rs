//! Pure helpers for pulling samples out of packed bytes and changing their
//! bit depth.

use bitfrob::u8_replicate_bits;

use crate::png::BitDepth;

/// Splits a byte into `8 / bit_depth` samples, leftmost (most significant)
/// sample first.
///
/// Each sample is returned in the low bits of its own byte. With
/// [`BitDepth::Eight`] you just get the byte back.
///
/// ```
/// # use pngdec::{samples::split_samples, png::BitDepth};
/// let s: Vec<u8> = split_samples(0b0010_0101, BitDepth::Four).collect();
/// assert_eq!(s, [0b0010, 0b0101]);
/// ```
///
/// ## Panics
/// * If `bit_depth` is [`BitDepth::Sixteen`], a byte can't hold a whole
///   16-bit sample.
#[inline]
#[track_caller]
pub fn split_samples(byte: u8, bit_depth: BitDepth) -> impl Iterator<Item = u8> + Clone {
  let bits = u32::from(bit_depth.bits());
  assert!(bits <= 8, "can't split a byte into {bits}-bit samples");
  let mask = ((1_u16 << bits) - 1) as u8;
  let count = 8 / bits;
  (1..=count).map(move |n| (byte >> (8 - bits * n)) & mask)
}

/// Converts a sample of the given bit depth to an 8-bit intensity.
///
/// The result is `floor(sample * 255 / (2^bit_depth - 1))`. For depths below
/// 8 that's always exact, and is the same as replicating the sample's bit
/// pattern across the byte. For depth 16 it's `sample / 257`.
///
/// Bits of `sample` above the bit depth must be 0.
#[inline]
#[must_use]
pub fn rescale(sample: u16, bit_depth: BitDepth) -> u8 {
  match bit_depth {
    BitDepth::One | BitDepth::Two | BitDepth::Four => {
      u8_replicate_bits(bit_depth.bits() as u32, sample as u8)
    }
    BitDepth::Eight => sample as u8,
    BitDepth::Sixteen => (sample / 257) as u8,
  }
}
