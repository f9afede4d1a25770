// SPDX-License-Identifier: ISC
use std::io::{self, Read, Write};

#[cfg(feature = "encoder")]
use crate::{AutoFinish, AutoFinisher, compress_into, max_compressed_size};
use crate::{DEFAULT_CHUNK_SIZE, Error, MAX_OFFSET, Result, raw::decode_tokens};

/// Fills `buf` from `reader`, stopping early only at end of input.
fn read_chunk<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Compresses `reader` into `writer` chunk by chunk.
///
/// Input is read in chunks of `chunk_size` bytes (the final chunk may be
/// shorter). Each chunk is compressed on its own, with no back-references
/// into earlier chunks, and written out before the next read. An empty
/// reader produces no output.
///
/// Returns the number of encoded bytes written. Neither stream is closed.
///
/// # Example
///
/// ```
/// use lzf_codec::{DEFAULT_CHUNK_SIZE, compress_stream, decompress_stream};
///
/// let input = b"stream stream stream stream".repeat(1000);
/// let mut encoded = Vec::<u8>::new();
/// compress_stream(&mut input.as_slice(), &mut encoded, DEFAULT_CHUNK_SIZE).unwrap();
///
/// let mut decoded = Vec::<u8>::new();
/// decompress_stream(&mut encoded.as_slice(), &mut decoded, DEFAULT_CHUNK_SIZE).unwrap();
/// assert_eq!(decoded, input);
/// ```
#[cfg(feature = "encoder")]
pub fn compress_stream<R, W>(reader: &mut R, writer: &mut W, chunk_size: usize) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    if chunk_size == 0 {
        return Err(Error::InvalidParameter);
    }

    let mut chunk = vec![0u8; chunk_size];
    let mut encoded = vec![0u8; max_compressed_size(chunk_size)];
    let mut written = 0u64;

    loop {
        let n = read_chunk(reader, &mut chunk)?;
        if n == 0 {
            break;
        }

        let len = compress_into(&chunk[..n], &mut encoded)?;
        writer.write_all(&encoded[..len])?;
        written += len as u64;

        if n < chunk_size {
            break;
        }
    }

    writer.flush()?;
    Ok(written)
}

/// Decompresses `reader` into `writer`, reading `chunk_size` encoded bytes at
/// a time.
///
/// Accepts the concatenated output of [`compress_stream`] (or any raw token
/// stream). A token split across two reads is completed by the next read.
/// Any malformed token aborts the operation with
/// `Error::InvalidCompressedData`, as does a token left incomplete at end of
/// input.
///
/// Returns the number of decoded bytes written. Neither stream is closed.
pub fn decompress_stream<R, W>(reader: &mut R, writer: &mut W, chunk_size: usize) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    if chunk_size == 0 {
        return Err(Error::InvalidParameter);
    }

    let mut chunk = vec![0u8; chunk_size];
    let mut decoder = StreamDecoder::new();
    let mut decoded = Vec::new();
    let mut written = 0u64;

    loop {
        let n = read_chunk(reader, &mut chunk)?;
        if n == 0 {
            break;
        }

        decoded.clear();
        decoder.feed(&chunk[..n], &mut decoded)?;
        writer.write_all(&decoded)?;
        written += decoded.len() as u64;
    }

    decoder.finish()?;
    writer.flush()?;
    Ok(written)
}

/// Incremental token decoder.
///
/// Keeps the undecoded tail of the previous input (at most one partial
/// token) and the last `MAX_OFFSET` decoded bytes, which is all a
/// back-reference can reach.
struct StreamDecoder {
    pending: Vec<u8>,
    history: Vec<u8>,
}

impl StreamDecoder {
    fn new() -> Self {
        Self { pending: Vec::new(), history: Vec::with_capacity(2 * MAX_OFFSET) }
    }

    /// Decodes `input` after any carried-over bytes, appending new output to `out`.
    fn feed(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<()> {
        self.pending.extend_from_slice(input);

        let base = self.history.len();
        let consumed = decode_tokens(&self.pending, &mut self.history, usize::MAX)?;
        self.pending.drain(..consumed);
        out.extend_from_slice(&self.history[base..]);

        let excess = self.history.len().saturating_sub(MAX_OFFSET);
        self.history.drain(..excess);
        Ok(())
    }

    /// Fails if the input ended inside a token.
    fn finish(&self) -> Result<()> {
        if self.pending.is_empty() { Ok(()) } else { Err(Error::InvalidCompressedData) }
    }
}

/// Reader that decodes a raw LZF token stream.
///
/// Encoded bytes are pulled from the inner reader one chunk at a time and
/// decoded lazily as the caller reads.
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use lzf_codec::{LzfReader, compress};
///
/// let input = b"stream reader example";
/// let encoded = compress(input).unwrap();
/// let mut reader = LzfReader::new(encoded.as_slice());
///
/// let mut out = Vec::new();
/// reader.read_to_end(&mut out).unwrap();
/// assert_eq!(out, input);
/// ```
pub struct LzfReader<R: Read> {
    inner: R,
    decoder: StreamDecoder,
    in_buf: Vec<u8>,
    out_buf: Vec<u8>,
    out_pos: usize,
    finished: bool,
}

impl<R: Read> LzfReader<R> {
    /// Creates a reader that pulls `DEFAULT_CHUNK_SIZE` encoded bytes at a time.
    pub fn new(inner: R) -> Self {
        Self::with_chunk_size(inner, DEFAULT_CHUNK_SIZE)
    }

    /// Creates a reader with an explicit read size. Zero is treated as one.
    pub fn with_chunk_size(inner: R, chunk_size: usize) -> Self {
        Self {
            inner,
            decoder: StreamDecoder::new(),
            in_buf: vec![0u8; chunk_size.max(1)],
            out_buf: Vec::new(),
            out_pos: 0,
            finished: false,
        }
    }

    /// Unwraps the reader and returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Returns a shared reference to the underlying reader.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Returns a mutable reference to the underlying reader.
    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    fn load_next_chunk(&mut self) -> Result<()> {
        self.out_buf.clear();
        self.out_pos = 0;

        let n = read_chunk(&mut self.inner, &mut self.in_buf)?;
        if n == 0 {
            self.finished = true;
            return self.decoder.finish();
        }
        self.decoder.feed(&self.in_buf[..n], &mut self.out_buf)
    }
}

impl<R: Read> Read for LzfReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            if self.out_pos < self.out_buf.len() {
                let avail = &self.out_buf[self.out_pos..];
                let take = buf.len().min(avail.len());
                buf[..take].copy_from_slice(&avail[..take]);
                self.out_pos += take;
                return Ok(take);
            }

            if self.finished {
                return Ok(0);
            }
            self.load_next_chunk()?;
        }
    }
}

/// Writer that encodes into a raw LZF token stream.
///
/// Written data is cut into chunks of `chunk_size` bytes and each chunk is
/// compressed independently, so the output is byte-identical to
/// [`compress_stream`] over the same input.
#[cfg(feature = "encoder")]
pub struct LzfWriter<W: Write> {
    inner: W,
    chunk_size: usize,
    in_buf: Vec<u8>,
    comp_buf: Vec<u8>,
}

#[cfg(feature = "encoder")]
impl<W: Write> LzfWriter<W> {
    /// Creates a writer with `DEFAULT_CHUNK_SIZE` chunks.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            chunk_size: DEFAULT_CHUNK_SIZE,
            in_buf: Vec::with_capacity(DEFAULT_CHUNK_SIZE),
            comp_buf: vec![0u8; max_compressed_size(DEFAULT_CHUNK_SIZE)],
        }
    }

    /// Creates a writer with an explicit chunk size.
    ///
    /// Returns `Error::InvalidParameter` when `chunk_size` is zero.
    pub fn with_chunk_size(inner: W, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidParameter);
        }
        Ok(Self {
            inner,
            chunk_size,
            in_buf: Vec::with_capacity(chunk_size),
            comp_buf: vec![0u8; max_compressed_size(chunk_size)],
        })
    }

    /// Unwraps the writer and returns the underlying writer.
    ///
    /// Buffered input that has not formed a full chunk is discarded; call
    /// [`finish`](Self::finish) to keep it.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Returns a shared reference to the underlying writer.
    pub fn inner(&self) -> &W {
        &self.inner
    }

    /// Returns a mutable reference to the underlying writer.
    pub fn inner_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Encodes any buffered partial chunk, flushes, and returns the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.flush_pending()?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    /// Returns a wrapper that will call `finish()` on drop.
    ///
    /// This is useful for best-effort stream finalization in scopes with early
    /// returns.
    pub fn auto_finish(self) -> AutoFinisher<Self> {
        AutoFinisher(Some(self))
    }

    fn flush_pending(&mut self) -> Result<()> {
        if !self.in_buf.is_empty() {
            Self::write_chunk_into(&mut self.inner, &mut self.comp_buf, &self.in_buf)?;
            self.in_buf.clear();
        }
        Ok(())
    }

    fn write_chunk_into(inner: &mut W, comp_buf: &mut [u8], chunk: &[u8]) -> Result<()> {
        let len = compress_into(chunk, comp_buf)?;
        inner.write_all(&comp_buf[..len])?;
        Ok(())
    }
}

#[cfg(feature = "encoder")]
impl<W: Write> AutoFinish for LzfWriter<W> {
    fn finish_ignore_error(self) {
        let _ = self.finish();
    }
}

#[cfg(feature = "encoder")]
impl<W: Write> Write for LzfWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut input = buf;

        if !self.in_buf.is_empty() {
            let need = self.chunk_size - self.in_buf.len();
            let take = need.min(input.len());
            self.in_buf.extend_from_slice(&input[..take]);
            input = &input[take..];

            if self.in_buf.len() == self.chunk_size {
                Self::write_chunk_into(&mut self.inner, &mut self.comp_buf, &self.in_buf)?;
                self.in_buf.clear();
            }
        }

        let mut chunks = input.chunks_exact(self.chunk_size);
        for chunk in &mut chunks {
            Self::write_chunk_into(&mut self.inner, &mut self.comp_buf, chunk)?;
        }
        self.in_buf.extend_from_slice(chunks.remainder());

        Ok(buf.len())
    }

    /// Flushes the underlying writer.
    ///
    /// A partial chunk stays buffered: encoding it early would move the chunk
    /// boundaries away from those of [`compress_stream`].
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
