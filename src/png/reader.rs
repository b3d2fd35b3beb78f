use super::*;

/// Everything the decoder needs out of the chunk stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngChunks<'b> {
  pub header: Header,
  pub palette: Option<Palette<'b>>,
  pub transparency: Option<TransparencyKey<'b>>,
  /// All `IDAT` data, concatenated in stream order.
  pub image_data: Vec<u8>,
  /// How many `IDAT` chunks went into `image_data`.
  pub image_data_chunks: usize,
  /// If an `IEND` chunk was found.
  pub saw_end: bool,
}
impl<'b> PngChunks<'b> {
  #[inline]
  fn new(header: Header) -> Self {
    Self {
      header,
      palette: None,
      transparency: None,
      image_data: Vec::new(),
      image_data_chunks: 0,
      saw_end: false,
    }
  }

  fn accept(&mut self, chunk: RawPngChunk<'b>) -> Result<(), PngError> {
    let RawPngChunk { chunk_type, data, offset, .. } = chunk;
    let color_model = self.header.color_model;
    match chunk_type {
      ChunkType::IHDR => return Err(PngError::DuplicateHeader { offset }),
      ChunkType::PLTE => {
        if matches!(color_model, ColorModel::Grayscale | ColorModel::GrayscaleAlpha) {
          return Err(PngError::UnexpectedPalette { color_model });
        }
        if self.palette.is_some() {
          return Err(PngError::DuplicatePalette { offset });
        }
        if self.image_data_chunks > 0 {
          return Err(PngError::ChunkOutOfOrder { chunk: chunk_type, offset });
        }
        let palette = Palette::parse(data)?;
        log::debug!("palette with {} entries", palette.len());
        self.palette = Some(palette);
      }
      ChunkType::IDAT => {
        if color_model == ColorModel::Indexed && self.palette.is_none() {
          return Err(PngError::PaletteNotYetSeen { chunk: chunk_type, offset });
        }
        self.image_data.try_reserve(data.len())?;
        self.image_data.extend_from_slice(data);
        self.image_data_chunks += 1;
      }
      ChunkType::tRNS => {
        if color_model.has_alpha() {
          return Err(PngError::UnexpectedTransparency { color_model });
        }
        if color_model == ColorModel::Indexed && self.palette.is_none() {
          return Err(PngError::PaletteNotYetSeen { chunk: chunk_type, offset });
        }
        if self.image_data_chunks > 0 {
          return Err(PngError::ChunkOutOfOrder { chunk: chunk_type, offset });
        }
        self.transparency = Some(TransparencyKey::parse(data, self.palette, color_model)?);
      }
      ChunkType::IEND => self.saw_end = true,
      other if other.is_critical() => {
        return Err(PngError::UnknownCriticalChunk { chunk: other, offset })
      }
      other => log::trace!("skipping ancillary chunk {other} at byte {offset}"),
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReaderState<'b> {
  AwaitingHeader,
  Streaming(PngChunks<'b>),
  Done(PngChunks<'b>),
}

/// Walks a PNG chunk stream and collects the chunks that matter for decoding.
///
/// Feed it raw chunks (with their CRC already checked) in stream order, then
/// call [`finish`](Self::finish). The reader enforces which chunks may
/// appear, how often, and in what order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReader<'b> {
  state: ReaderState<'b>,
  config: PngDecodeConfig,
}
impl<'b> ChunkReader<'b> {
  #[inline]
  #[must_use]
  pub const fn new(config: PngDecodeConfig) -> Self {
    Self { state: ReaderState::AwaitingHeader, config }
  }

  /// If an `IEND` chunk has been fed in. Further chunks are an error.
  #[inline]
  #[must_use]
  pub const fn is_done(&self) -> bool {
    matches!(self.state, ReaderState::Done(_))
  }

  /// The parsed header, once the first chunk has been accepted.
  #[inline]
  #[must_use]
  pub fn header(&self) -> Option<&Header> {
    match &self.state {
      ReaderState::AwaitingHeader => None,
      ReaderState::Streaming(acc) | ReaderState::Done(acc) => Some(&acc.header),
    }
  }

  /// Interprets the next chunk of the stream.
  pub fn feed(&mut self, chunk: RawPngChunk<'b>) -> Result<(), PngError> {
    log::trace!(
      "chunk {} at byte {}, {} bytes of data",
      chunk.chunk_type,
      chunk.offset,
      chunk.data.len()
    );
    match &mut self.state {
      ReaderState::AwaitingHeader => {
        if chunk.chunk_type != ChunkType::IHDR {
          return Err(PngError::HeaderChunkMissing { found: Some(chunk.chunk_type) });
        }
        let header = Header::parse(chunk.data)?;
        log::debug!("{header:?}");
        if !self.config.allows(header.width, header.height) {
          return Err(PngError::DimensionsTooLarge { width: header.width, height: header.height });
        }
        self.state = ReaderState::Streaming(PngChunks::new(header));
      }
      ReaderState::Streaming(acc) => {
        acc.accept(chunk)?;
        if acc.saw_end {
          let header = acc.header;
          let acc = core::mem::replace(acc, PngChunks::new(header));
          self.state = ReaderState::Done(acc);
        }
      }
      ReaderState::Done(_) => {
        return Err(PngError::ChunkOutOfOrder { chunk: chunk.chunk_type, offset: chunk.offset })
      }
    }
    Ok(())
  }

  /// Ends the stream and hands back what was collected.
  pub fn finish(self) -> Result<PngChunks<'b>, PngError> {
    let acc = match self.state {
      ReaderState::AwaitingHeader => return Err(PngError::HeaderChunkMissing { found: None }),
      ReaderState::Streaming(acc) | ReaderState::Done(acc) => acc,
    };
    if !acc.saw_end {
      if self.config.require_end_chunk {
        return Err(PngError::MissingEndChunk);
      }
      log::warn!("no IEND chunk, continuing anyway");
    }
    if acc.image_data_chunks == 0 {
      return Err(PngError::MissingImageData);
    }
    Ok(acc)
  }
}

/// Runs the full chunk stream of `bytes` through a [`ChunkReader`].
///
/// This checks the signature, verifies every CRC before the chunk is looked
/// at, and stops at `IEND`. Anything after `IEND` is ignored.
pub fn read_chunks(bytes: &[u8], config: PngDecodeConfig) -> Result<PngChunks<'_>, PngError> {
  if !is_png_signature_correct(bytes) {
    return Err(PngError::NotAPng);
  }
  let mut reader = ChunkReader::new(config);
  let mut it = RawPngChunkIter::new(bytes);
  while let Some(chunk) = it.next() {
    let chunk = chunk?;
    chunk.verify_crc()?;
    reader.feed(chunk)?;
    if reader.is_done() {
      if !it.remaining().is_empty() {
        log::warn!("ignoring {} bytes after IEND", it.remaining().len());
      }
      break;
    }
  }
  reader.finish()
}
