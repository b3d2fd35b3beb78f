//! Provides the owned image type that decoding produces.

use alloc::vec::Vec;
use pixel_formats::r8g8b8a8_Srgb;

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
///
/// You don't ever need to call this function yourself, but it's how
/// [`Bitmap`] converts 2d coordinates into index values within its pixel
/// vector.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize).wrapping_mul(width as usize).wrapping_add(x as usize)
}

/// An owned direct-color image.
///
/// Pixels are row-major with the top row first. Decoding always yields
/// `width * height` pixels, but the fields are public, so if you put them
/// together weirdly the lookup methods will just return `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bitmap<P = r8g8b8a8_Srgb> {
  /// Width in pixels.
  pub width: u32,
  /// Height in pixels.
  pub height: u32,
  /// The pixel data.
  pub pixels: Vec<P>,
}
impl<P> Bitmap<P> {
  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<&P> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut P> {
    if x < self.width && y < self.height {
      self.pixels.get_mut(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// Iterates the rows of the image, top to bottom.
  #[inline]
  pub fn rows(&self) -> impl Iterator<Item = &[P]> + '_ {
    // `max(1)` keeps `chunks_exact` happy with a hand-built zero width bitmap.
    self.pixels.chunks_exact((self.width as usize).max(1)).take(self.height as usize)
  }
}
impl<P: bytemuck::Pod> Bitmap<P> {
  /// The pixel data as plain bytes, suitable for uploading to a texture.
  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.pixels)
  }
}
impl Bitmap<r8g8b8a8_Srgb> {
  /// Iterates the pixels packed as `0xRRGGBBAA` values.
  #[inline]
  pub fn packed_pixels(&self) -> impl Iterator<Item = u32> + '_ {
    self.pixels.iter().map(|p| u32::from_be_bytes([p.r, p.g, p.b, p.a]))
  }
}
