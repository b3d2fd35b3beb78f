#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![forbid(unsafe_code)]

//! A crate for decoding PNG data into RGBA8 pixels.
//!
//! ```no_run
//! let bytes: &[u8] = unimplemented!("data from somewhere");
//! let bitmap = pngdec::png::decode_png(bytes).unwrap();
//! println!("{}x{}", bitmap.width, bitmap.height);
//! ```
//!
//! The work is done in stages (chunk reading, inflating, unfiltering, pixel
//! assembly) and each stage is public within the [`png`] module if you want
//! to drive the process yourself.
//!
//! ## Features
//! * `std` (default): the [`png::decode_png_file`] entry point and an impl of
//!   `std::error::Error` for [`PngError`].
//! * `miniz_oxide` (default): zlib inflation using `miniz_oxide`. Without it
//!   you have to supply your own inflate function to
//!   [`png::decode_png_with`].

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

pub mod bitmap;
pub use bitmap::*;

pub mod samples;

pub mod png;
