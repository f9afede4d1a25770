// SPDX-License-Identifier: ISC
use std::io::{Read, Write};

use lzf_codec::{Codec, CodecConfig, LzfReader, LzfWriter, Registry};

fn main() {
    let input = b"stream stream stream stream stream".repeat(512);

    let mut writer = LzfWriter::new(Vec::<u8>::new());
    writer.write_all(&input).expect("write");
    let encoded = writer.finish().expect("finish");

    let mut reader = LzfReader::new(encoded.as_slice());
    let mut decoded = Vec::new();
    reader.read_to_end(&mut decoded).expect("read");
    assert_eq!(decoded, input);

    let codec = Registry::with_defaults()
        .create("lzf", CodecConfig::default().with_disk("local"))
        .expect("codec");
    let mut via_codec = Vec::<u8>::new();
    codec.compress_stream(&mut input.as_slice(), &mut via_codec).expect("compress_stream");
    assert_eq!(via_codec, encoded);

    println!(
        "encoded={} decoded={} file=data.{}",
        encoded.len(),
        decoded.len(),
        codec.file_extension()
    );
}
