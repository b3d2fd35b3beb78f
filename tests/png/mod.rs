use pngdec::png::{decode_png_with, png_crc, PngDecodeConfig, RawPngChunkIter, PNG_SIGNATURE};
use pngdec::PngError;
use walkdir::WalkDir;

fn inflate(data: &[u8], expected: usize) -> Result<Vec<u8>, PngError> {
  miniz_oxide::inflate::decompress_to_vec_zlib_with_limit(data, expected.saturating_add(1))
    .map_err(|_| PngError::DecompressionError)
}

fn decode(bytes: &[u8]) -> Result<pngdec::Bitmap, PngError> {
  decode_png_with(bytes, &PngDecodeConfig::default(), inflate)
}

/// Every file under `tests/`, whatever it is.
fn all_test_files() -> impl Iterator<Item = (String, Vec<u8>)> {
  WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()).filter_map(|entry| {
    let name = entry.path().display().to_string();
    match std::fs::read(entry.path()) {
      Ok(v) => Some((name, v)),
      Err(e) => {
        println!("Error reading file {name}: {e:?}");
        None
      }
    }
  })
}

#[test]
fn test_RawPngChunkIter_no_panics() {
  // iter ALL files in the test folder, even non-png files shouldn't panic it.
  for (name, v) in all_test_files() {
    println!("{name}");
    for _ in RawPngChunkIter::new(&v) {
      //
    }
  }
  // even totally random data should never panic the iterator!
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    for _ in RawPngChunkIter::new(&v) {
      //
    }
  }
}

#[test]
fn test_decode_png_no_panics() {
  for (name, v) in all_test_files() {
    println!("{name}: {:?}", decode(&v).map(|b| (b.width, b.height)));
  }
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    assert!(decode(&v).is_err());
  }
}

#[test]
fn test_decode_random_bodies_after_a_valid_header_no_panics() {
  // The chunk stream passes CRC checks here, so the random bytes reach
  // inflate, unfiltering and pixel assembly.
  let mut ihdr_data = Vec::new();
  ihdr_data.extend_from_slice(&4_u32.to_be_bytes());
  ihdr_data.extend_from_slice(&4_u32.to_be_bytes());
  ihdr_data.extend_from_slice(&[8, 6, 0, 0, 0]);
  for _ in 0..20 {
    let mut filtered = super::rand_bytes(4 * 17);
    let idat = miniz_oxide::deflate::compress_to_vec_zlib(&filtered, 6);
    let mut bytes = PNG_SIGNATURE.to_vec();
    for (chunk_type, data) in [(b"IHDR", &ihdr_data[..]), (b"IDAT", &idat[..])] {
      bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
      bytes.extend_from_slice(chunk_type);
      bytes.extend_from_slice(data);
      let mut crc_input = chunk_type.to_vec();
      crc_input.extend_from_slice(data);
      bytes.extend_from_slice(&png_crc(&crc_input).to_be_bytes());
    }
    let _ = decode(&bytes);
    // and once more with every filter byte made legal
    for line in filtered.chunks_exact_mut(17) {
      line[0] %= 5;
    }
    let idat = miniz_oxide::deflate::compress_to_vec_zlib(&filtered, 6);
    let idat_start = 8 + 25;
    bytes.truncate(idat_start);
    bytes.extend_from_slice(&(idat.len() as u32).to_be_bytes());
    bytes.extend_from_slice(b"IDAT");
    bytes.extend_from_slice(&idat);
    let mut crc_input = b"IDAT".to_vec();
    crc_input.extend_from_slice(&idat);
    bytes.extend_from_slice(&png_crc(&crc_input).to_be_bytes());
    let bitmap = decode(&bytes).unwrap();
    assert_eq!(bitmap.pixels.len(), 16);
  }
}
