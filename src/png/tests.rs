use super::*;

fn ihdr(width: u32, height: u32, bit_depth: u8, color: u8) -> Vec<u8> {
  let mut v = Vec::new();
  v.extend_from_slice(&width.to_be_bytes());
  v.extend_from_slice(&height.to_be_bytes());
  v.extend_from_slice(&[bit_depth, color, 0, 0, 0]);
  v
}

fn zlib(filtered: &[u8]) -> Vec<u8> {
  miniz_oxide::deflate::compress_to_vec_zlib(filtered, 6)
}

/// Builds PNG bytes one chunk at a time, with correct CRCs.
struct PngBuilder(Vec<u8>);
impl PngBuilder {
  fn new() -> Self {
    Self(PNG_SIGNATURE.to_vec())
  }

  fn chunk(mut self, chunk_type: &[u8; 4], data: &[u8]) -> Self {
    self.0.extend_from_slice(&(data.len() as u32).to_be_bytes());
    self.0.extend_from_slice(chunk_type);
    self.0.extend_from_slice(data);
    let crc = png_crc_iter(chunk_type.iter().chain(data.iter()).copied());
    self.0.extend_from_slice(&crc.to_be_bytes());
    self
  }

  fn build(self) -> Vec<u8> {
    self.0
  }
}

/// A complete PNG with just header, image data, and end chunks.
fn simple_png(header: &[u8], filtered: &[u8]) -> Vec<u8> {
  PngBuilder::new()
    .chunk(b"IHDR", header)
    .chunk(b"IDAT", &zlib(filtered))
    .chunk(b"IEND", &[])
    .build()
}

fn decode(bytes: &[u8]) -> Result<Bitmap, PngError> {
  decode_with(bytes, &PngDecodeConfig::default())
}

fn decode_with(bytes: &[u8], config: &PngDecodeConfig) -> Result<Bitmap, PngError> {
  decode_png_with(bytes, config, |data, expected| {
    miniz_oxide::inflate::decompress_to_vec_zlib_with_limit(data, expected + 1)
      .map_err(|_| PngError::DecompressionError)
  })
}

fn rgba(r: u8, g: u8, b: u8, a: u8) -> r8g8b8a8_Srgb {
  r8g8b8a8_Srgb { r, g, b, a }
}

#[test]
fn test_decode_gray_1x1() {
  let bytes = simple_png(&ihdr(1, 1, 8, 0), &[0, 200]);
  let bitmap = decode(&bytes).unwrap();
  assert_eq!((bitmap.width, bitmap.height), (1, 1));
  assert_eq!(bitmap.pixels, [rgba(200, 200, 200, 255)]);
}

#[test]
fn test_decode_indexed_with_transparency() {
  let bytes = PngBuilder::new()
    .chunk(b"IHDR", &ihdr(1, 1, 8, 3))
    .chunk(b"PLTE", &[10, 20, 30])
    .chunk(b"tRNS", &[0])
    .chunk(b"IDAT", &zlib(&[0, 0]))
    .chunk(b"IEND", &[])
    .build();
  assert_eq!(decode(&bytes).unwrap().pixels, [rgba(10, 20, 30, 0)]);
}

#[test]
fn test_decode_checksum_mismatch() {
  let mut bytes = simple_png(&ihdr(1, 1, 8, 0), &[0, 200]);
  // flip a bit in the first byte of the IDAT data
  let idat_data = 33 + 8;
  bytes[idat_data] ^= 1;
  match decode(&bytes) {
    Err(PngError::ChecksumMismatch { chunk, offset, declared, actual }) => {
      assert_eq!(chunk, ChunkType::IDAT);
      assert_eq!(offset, 33);
      assert_ne!(declared, actual);
    }
    other => panic!("expected a checksum error, got {other:?}"),
  }
}

#[test]
fn test_decode_unknown_chunks() {
  let header = ihdr(1, 1, 8, 0);
  let data = zlib(&[0, 7]);
  let with_extra = |chunk_type: &[u8; 4]| {
    PngBuilder::new()
      .chunk(b"IHDR", &header)
      .chunk(chunk_type, &[1, 2])
      .chunk(b"IDAT", &data)
      .chunk(b"IEND", &[])
      .build()
  };
  assert_eq!(
    decode(&with_extra(b"ABCD")),
    Err(PngError::UnknownCriticalChunk { chunk: ChunkType(*b"ABCD"), offset: 33 })
  );
  assert_eq!(decode(&with_extra(b"aBCD")).unwrap().pixels, [rgba(7, 7, 7, 255)]);
}

#[test]
fn test_decode_structural_errors() {
  assert_eq!(decode(b"GIF89a.."), Err(PngError::NotAPng));
  assert_eq!(decode(&PNG_SIGNATURE), Err(PngError::HeaderChunkMissing { found: None }));

  let no_data = PngBuilder::new().chunk(b"IHDR", &ihdr(1, 1, 8, 0)).chunk(b"IEND", &[]).build();
  assert_eq!(decode(&no_data), Err(PngError::MissingImageData));

  let data_first =
    PngBuilder::new().chunk(b"IDAT", &zlib(&[0, 0])).chunk(b"IHDR", &ihdr(1, 1, 8, 0)).build();
  assert_eq!(
    decode(&data_first),
    Err(PngError::HeaderChunkMissing { found: Some(ChunkType::IDAT) })
  );

  let mut cut = simple_png(&ihdr(1, 1, 8, 0), &[0, 200]);
  cut.truncate(cut.len() - 3);
  let iend_offset = cut.len() - 9;
  assert_eq!(decode(&cut), Err(PngError::UnexpectedEndOfInput { offset: iend_offset }));

  let palette_late = PngBuilder::new()
    .chunk(b"IHDR", &ihdr(1, 1, 8, 2))
    .chunk(b"IDAT", &zlib(&[0, 0, 0, 0]))
    .chunk(b"PLTE", &[1, 2, 3])
    .chunk(b"IEND", &[])
    .build();
  assert!(matches!(
    decode(&palette_late),
    Err(PngError::ChunkOutOfOrder { chunk: ChunkType::PLTE, .. })
  ));

  let alpha_trns = PngBuilder::new()
    .chunk(b"IHDR", &ihdr(1, 1, 8, 4))
    .chunk(b"tRNS", &[0, 0])
    .chunk(b"IDAT", &zlib(&[0, 0, 0]))
    .build();
  assert_eq!(
    decode(&alpha_trns),
    Err(PngError::UnexpectedTransparency { color_model: ColorModel::GrayscaleAlpha })
  );
}

#[test]
fn test_decode_image_data_size_errors() {
  let short = simple_png(&ihdr(2, 2, 8, 0), &[0, 1, 2, 0, 3]);
  assert_eq!(decode(&short), Err(PngError::TruncatedImageData { expected: 6, actual: 5 }));
  let long = simple_png(&ihdr(2, 2, 8, 0), &[0, 1, 2, 0, 3, 4, 9]);
  assert_eq!(decode(&long), Err(PngError::TrailingImageData { expected: 6, actual: 7 }));
  let bad_filter = simple_png(&ihdr(2, 2, 8, 0), &[0, 1, 2, 7, 3, 4]);
  assert_eq!(decode(&bad_filter), Err(PngError::UnknownFilterType { row: 1, filter: 7 }));
  let not_zlib =
    PngBuilder::new().chunk(b"IHDR", &ihdr(1, 1, 8, 0)).chunk(b"IDAT", &[1, 2, 3, 4]).build();
  assert_eq!(decode(&not_zlib), Err(PngError::DecompressionError));
}

#[test]
fn test_decode_interlaced_is_rejected() {
  let mut header = ihdr(1, 1, 8, 0);
  header[12] = 1;
  let bytes = simple_png(&header, &[0, 0]);
  assert_eq!(read_header(&bytes).map(|h| h.is_interlaced()), Ok(true));
  assert_eq!(decode(&bytes), Err(PngError::InterlaceNotSupported));
}

#[test]
fn test_decode_split_image_data() {
  // 3x2 RGB, 8-bit, row 0 Sub filtered, row 1 Up filtered
  let filtered = [1, 10, 20, 30, 1, 1, 1, 1, 1, 1, 2, 5, 5, 5, 0, 0, 0, 250, 250, 250];
  let data = zlib(&filtered);
  let (a, b) = data.split_at(data.len() / 2);
  let bytes = PngBuilder::new()
    .chunk(b"IHDR", &ihdr(3, 2, 8, 2))
    .chunk(b"IDAT", a)
    .chunk(b"IDAT", &[])
    .chunk(b"IDAT", b)
    .chunk(b"IEND", &[])
    .build();
  let bitmap = decode(&bytes).unwrap();
  assert_eq!(
    bitmap.pixels,
    [
      rgba(10, 20, 30, 255),
      rgba(11, 21, 31, 255),
      rgba(12, 22, 32, 255),
      rgba(15, 25, 35, 255),
      rgba(11, 21, 31, 255),
      rgba(6, 16, 26, 255),
    ]
  );
}

#[test]
fn test_decode_sub_byte_gray_with_padding() {
  // 10x2 at 1 bit per pixel: 2 bytes per row, 6 padding bits
  let filtered = [0, 0b1010_1010, 0b1111_1111, 0, 0b0000_0000, 0b0100_0000];
  let bitmap = decode(&simple_png(&ihdr(10, 2, 1, 0), &filtered)).unwrap();
  let row0: Vec<u8> = bitmap.rows().next().unwrap().iter().map(|p| p.r).collect();
  assert_eq!(row0, [255, 0, 255, 0, 255, 0, 255, 0, 255, 255]);
  let row1: Vec<u8> = bitmap.rows().nth(1).unwrap().iter().map(|p| p.r).collect();
  assert_eq!(row1, [0, 0, 0, 0, 0, 0, 0, 0, 0, 255]);
  assert!(bitmap.pixels.iter().all(|p| p.a == 255));
}

#[test]
fn test_decode_sixteen_bit_gray_key() {
  let bytes = PngBuilder::new()
    .chunk(b"IHDR", &ihdr(2, 1, 16, 0))
    .chunk(b"tRNS", &[0x12, 0x34])
    .chunk(b"IDAT", &zlib(&[0, 0x12, 0x34, 0x12, 0x35]))
    .chunk(b"IEND", &[])
    .build();
  let bitmap = decode(&bytes).unwrap();
  assert_eq!(bitmap.pixels, [rgba(0x12, 0x12, 0x12, 0), rgba(0x12, 0x12, 0x12, 255)]);
}

#[test]
fn test_decode_truecolor_key() {
  let bytes = PngBuilder::new()
    .chunk(b"IHDR", &ihdr(2, 1, 8, 2))
    .chunk(b"tRNS", &[0, 1, 0, 2, 0, 3])
    .chunk(b"IDAT", &zlib(&[0, 1, 2, 3, 1, 2, 4]))
    .chunk(b"IEND", &[])
    .build();
  let bitmap = decode(&bytes).unwrap();
  assert_eq!(bitmap.pixels, [rgba(1, 2, 3, 0), rgba(1, 2, 4, 255)]);
}

#[test]
fn test_decode_indexed_out_of_range() {
  let bytes = PngBuilder::new()
    .chunk(b"IHDR", &ihdr(2, 1, 2, 3))
    .chunk(b"PLTE", &[9, 9, 9, 8, 8, 8])
    .chunk(b"IDAT", &zlib(&[0, 0b01_10_0000]))
    .chunk(b"IEND", &[])
    .build();
  assert_eq!(decode(&bytes), Err(PngError::PaletteLookupOutOfRange { index: 2, palette_len: 2 }));
}

#[test]
fn test_decode_end_chunk_handling() {
  let header = ihdr(1, 1, 8, 4);
  let data = zlib(&[0, 5, 6]);
  let mut after_end =
    PngBuilder::new().chunk(b"IHDR", &header).chunk(b"IDAT", &data).chunk(b"IEND", &[]).build();
  after_end.extend_from_slice(b"garbage that is not a chunk");
  assert_eq!(decode(&after_end).unwrap().pixels, [rgba(5, 5, 5, 6)]);

  let no_end = PngBuilder::new().chunk(b"IHDR", &header).chunk(b"IDAT", &data).build();
  assert!(decode(&no_end).is_ok());
  let strict = PngDecodeConfig { require_end_chunk: true, ..PngDecodeConfig::default() };
  assert_eq!(decode_with(&no_end, &strict), Err(PngError::MissingEndChunk));
}

#[test]
fn test_decode_dimension_limits() {
  let bytes = simple_png(&ihdr(3, 1, 8, 0), &[0, 1, 2, 3]);
  let small = PngDecodeConfig { max_width: 2, ..PngDecodeConfig::default() };
  assert_eq!(
    decode_with(&bytes, &small),
    Err(PngError::DimensionsTooLarge { width: 3, height: 1 })
  );
  assert!(decode_with(&bytes, &PngDecodeConfig::unlimited()).is_ok());
}

#[test]
fn test_read_header() {
  let bytes = simple_png(&ihdr(640, 480, 16, 6), &[]);
  let header = read_header(&bytes).unwrap();
  assert_eq!((header.width, header.height), (640, 480));
  assert_eq!(header.bit_depth, BitDepth::Sixteen);
  assert_eq!(header.color_model, ColorModel::TruecolorAlpha);
  assert_eq!(read_header(&bytes[..20]), Err(PngError::UnexpectedEndOfInput { offset: 8 }));
  assert_eq!(read_header(&[0; 40]), Err(PngError::NotAPng));
}

#[cfg(feature = "miniz_oxide")]
#[test]
fn test_decode_png_default_inflate() {
  let bytes = simple_png(&ihdr(1, 1, 8, 0), &[0, 42]);
  assert_eq!(decode_png(&bytes).unwrap().pixels, [rgba(42, 42, 42, 255)]);
}

#[cfg(feature = "miniz_oxide")]
#[test]
fn test_inflate_zlib_stops_one_past_expected() {
  let huge = zlib(&alloc::vec![0_u8; 1 << 20]);
  assert_eq!(inflate_zlib(&huge, 2), Err(PngError::TrailingImageData { expected: 2, actual: 3 }));
  assert_eq!(inflate_zlib(&zlib(&[0, 7]), 2), Ok(alloc::vec![0, 7]));
  assert_eq!(inflate_zlib(&zlib(&[0, 7, 9]), 2), Ok(alloc::vec![0, 7, 9]));
  assert_eq!(inflate_zlib(&[1, 2, 3, 4], 2), Err(PngError::DecompressionError));
}

#[cfg(feature = "miniz_oxide")]
#[test]
fn test_decode_huge_image_data_is_not_fully_inflated() {
  let bytes = simple_png(&ihdr(1, 1, 8, 0), &alloc::vec![0_u8; 1 << 20]);
  assert_eq!(decode_png(&bytes), Err(PngError::TrailingImageData { expected: 2, actual: 3 }));

  let mut seen_expected = None;
  let mut seen_len = None;
  let result = decode_png_with(&bytes, &PngDecodeConfig::default(), |data, expected| {
    seen_expected = Some(expected);
    let out = inflate_zlib(data, expected);
    seen_len = out.as_ref().ok().map(Vec::len);
    out
  });
  assert_eq!(result, Err(PngError::TrailingImageData { expected: 2, actual: 3 }));
  assert_eq!(seen_expected, Some(2));
  assert_eq!(seen_len, None);
}
