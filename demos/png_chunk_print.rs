use pngdec::png::{decode_png, RawPngChunkIter};

fn main() {
  let args: Vec<String> = std::env::args().collect();
  println!("ARGS: {args:?}");
  for file_arg in args[1..].iter() {
    let path = std::path::Path::new(file_arg);
    print!("Reading `{}`... ", path.display());
    let bytes = match std::fs::read(path) {
      Ok(bytes) => {
        println!("got {} bytes.", bytes.len());
        bytes
      }
      Err(e) => {
        println!("{e:?}");
        continue;
      }
    };
    for (n, raw_chunk) in RawPngChunkIter::new(&bytes).enumerate() {
      match raw_chunk {
        Ok(chunk) => {
          let crc = if chunk.verify_crc().is_ok() { "ok" } else { "BAD" };
          println!("{n}: {chunk:?} (crc {crc})");
        }
        Err(e) => println!("{n}: {e}"),
      }
    }
    match decode_png(&bytes) {
      Ok(bitmap) => println!("decoded: {}x{}", bitmap.width, bitmap.height),
      Err(e) => println!("decode failed: {e}"),
    }
  }
}
