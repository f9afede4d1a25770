// SPDX-License-Identifier: ISC
use std::cell::RefCell;
use std::io::{self, Read, Write};
use std::rc::Rc;

use lzf_codec::{
    DEFAULT_CHUNK_SIZE, Error, LzfReader, LzfWriter, compress, compress_stream, decompress_stream,
};
use proptest::collection::vec;
use proptest::prelude::*;

fn pattern_data(size: usize) -> Vec<u8> {
    let mut out = vec![0u8; size];
    for (i, b) in out.iter_mut().enumerate() {
        *b = ((i * 17) ^ (i >> 3) ^ 0x5a) as u8;
    }
    out
}

fn encode_stream(input: &[u8], chunk_size: usize) -> Vec<u8> {
    let mut encoded = Vec::new();
    compress_stream(&mut &input[..], &mut encoded, chunk_size).expect("compress_stream");
    encoded
}

fn decode_stream(encoded: &[u8], chunk_size: usize) -> lzf_codec::Result<Vec<u8>> {
    let mut decoded = Vec::new();
    decompress_stream(&mut &encoded[..], &mut decoded, chunk_size)?;
    Ok(decoded)
}

/// Hands out at most `step` bytes per read.
struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.data.len().min(buf.len()).min(self.step);
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "source went away"))
    }
}

#[derive(Clone)]
struct SharedVecWriter(Rc<RefCell<Vec<u8>>>);

impl Write for SharedVecWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn stream_roundtrip_multi_chunk() {
    let input = pattern_data(3 * DEFAULT_CHUNK_SIZE + 1234);
    let encoded = encode_stream(&input, DEFAULT_CHUNK_SIZE);
    assert!(encoded.len() < input.len());

    let decoded = decode_stream(&encoded, DEFAULT_CHUNK_SIZE).expect("decompress_stream");
    assert_eq!(decoded, input);
}

#[test]
fn stream_chunks_are_compressed_independently() {
    let input = pattern_data(2 * DEFAULT_CHUNK_SIZE + 77);
    let encoded = encode_stream(&input, DEFAULT_CHUNK_SIZE);

    let mut expected = Vec::new();
    for chunk in input.chunks(DEFAULT_CHUNK_SIZE) {
        expected.extend(compress(chunk).expect("compress"));
    }
    assert_eq!(encoded, expected);
}

#[test]
fn short_reads_do_not_move_chunk_boundaries() {
    let input = pattern_data(20_000);
    let mut encoded = Vec::<u8>::new();
    compress_stream(&mut Trickle { data: &input, step: 1000 }, &mut encoded, DEFAULT_CHUNK_SIZE)
        .expect("compress_stream");
    assert_eq!(encoded, encode_stream(&input, DEFAULT_CHUNK_SIZE));
}

#[test]
fn empty_stream_roundtrip() {
    let mut encoded = Vec::<u8>::new();
    let written = compress_stream(&mut io::empty(), &mut encoded, DEFAULT_CHUNK_SIZE)
        .expect("compress_stream");
    assert_eq!(written, 0);
    assert!(encoded.is_empty());

    assert!(decode_stream(&[], DEFAULT_CHUNK_SIZE).expect("decompress_stream").is_empty());
}

#[test]
fn tokens_split_across_reads_are_carried_over() {
    let input = pattern_data(5000);
    let encoded = compress(&input).expect("compress");

    for read_size in [1usize, 2, 3, 5, 7, 31, 64, 4096] {
        let decoded = decode_stream(&encoded, read_size).expect("decompress_stream");
        assert_eq!(decoded, input, "read size {read_size}");
    }
}

#[test]
fn truncated_stream_is_rejected() {
    let input = pattern_data(20_000);
    let encoded = encode_stream(&input, DEFAULT_CHUNK_SIZE);

    let err = decode_stream(&encoded[..encoded.len() - 1], DEFAULT_CHUNK_SIZE)
        .expect_err("expected truncation error");
    assert!(matches!(err, Error::InvalidCompressedData));
}

#[test]
fn corrupt_chunk_aborts_stream() {
    let mut encoded = compress(b"hello").expect("compress");
    encoded.extend_from_slice(&[0x3f, 0xff]);
    encoded.extend(compress(b"never reached").expect("compress"));

    let mut decoded = Vec::<u8>::new();
    let err = decompress_stream(&mut encoded.as_slice(), &mut decoded, 4)
        .expect_err("expected corruption error");
    assert!(matches!(err, Error::InvalidCompressedData));
    assert!(!decoded.ends_with(b"never reached"));
}

#[test]
fn zero_chunk_size_is_rejected() {
    let mut sink = Vec::<u8>::new();
    let err = compress_stream(&mut &b"abc"[..], &mut sink, 0).expect_err("expected error");
    assert!(matches!(err, Error::InvalidParameter));
    let err = decompress_stream(&mut &b"abc"[..], &mut sink, 0).expect_err("expected error");
    assert!(matches!(err, Error::InvalidParameter));
    assert!(matches!(LzfWriter::with_chunk_size(Vec::<u8>::new(), 0), Err(Error::InvalidParameter)));
}

#[test]
fn io_errors_pass_through_unchanged() {
    let mut sink = Vec::<u8>::new();
    let err = compress_stream(&mut FailingReader, &mut sink, DEFAULT_CHUNK_SIZE)
        .expect_err("expected io error");
    match err {
        Error::Io(e) => {
            assert_eq!(e.kind(), io::ErrorKind::ConnectionReset);
            assert_eq!(e.to_string(), "source went away");
        }
        other => panic!("unexpected error {other:?}"),
    }

    let err = decompress_stream(&mut FailingReader, &mut sink, DEFAULT_CHUNK_SIZE)
        .expect_err("expected io error");
    assert!(matches!(err, Error::Io(e) if e.kind() == io::ErrorKind::ConnectionReset));
}

#[test]
fn writer_matches_compress_stream() {
    let input = pattern_data(50_000);

    let mut writer = LzfWriter::new(Vec::<u8>::new());
    for piece in input.chunks(3001) {
        writer.write_all(piece).expect("write");
    }
    let encoded = writer.finish().expect("finish");

    assert_eq!(encoded, encode_stream(&input, DEFAULT_CHUNK_SIZE));
}

#[test]
fn writer_reader_roundtrip() {
    let input = pattern_data(180_000);

    let mut writer = LzfWriter::with_chunk_size(Vec::<u8>::new(), 65536).expect("writer");
    writer.write_all(&input[..10_000]).expect("write 1");
    writer.write_all(&input[10_000..]).expect("write 2");
    let encoded = writer.finish().expect("finish");

    let mut reader = LzfReader::new(encoded.as_slice());
    let mut output = Vec::new();
    reader.read_to_end(&mut output).expect("read_to_end");

    assert_eq!(output, input);
}

#[test]
fn reader_handles_small_buffers() {
    let input = pattern_data(30_000);
    let encoded = encode_stream(&input, DEFAULT_CHUNK_SIZE);

    let mut reader = LzfReader::with_chunk_size(encoded.as_slice(), 100);
    let mut output = Vec::new();
    let mut chunk = [0u8; 7];

    loop {
        let n = reader.read(&mut chunk).expect("read");
        if n == 0 {
            break;
        }
        output.extend_from_slice(&chunk[..n]);
    }

    assert_eq!(output, input);
}

#[test]
fn reader_reports_invalid_data() {
    let mut reader = LzfReader::new(&[0x00, b'a', 0x20, 0x05][..]);
    let mut output = Vec::new();
    let err = reader.read_to_end(&mut output).expect_err("expected error");
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn auto_finish_flushes_on_drop() {
    let input = pattern_data(20_000);
    let shared = Rc::new(RefCell::new(Vec::<u8>::new()));

    {
        let sink = SharedVecWriter(shared.clone());
        let mut writer = LzfWriter::with_chunk_size(sink, 4096).expect("writer").auto_finish();
        writer.write_all(&input).expect("write");
        // no explicit finish()
    }

    let encoded = shared.borrow().clone();
    assert_eq!(decode_stream(&encoded, DEFAULT_CHUNK_SIZE).expect("decode"), input);
}

proptest! {
    #[test]
    fn prop_stream_roundtrip(
        input in vec(0u8..8, 0..20_000),
        chunk_size in 1usize..20_000,
        read_size in 1usize..300,
    ) {
        let encoded = encode_stream(&input, chunk_size);
        prop_assert_eq!(decode_stream(&encoded, read_size).unwrap(), input);
    }
}
