// SPDX-License-Identifier: ISC
use lzf_codec::{compress, decompress};

fn main() {
    let input = b"LZF LZF LZF LZF LZF";
    let compressed = compress(input).expect("compression failed");
    let restored = decompress(&compressed).expect("decompression failed");

    println!("in={} compressed={} out={}", input.len(), compressed.len(), restored.len());
    assert_eq!(&restored, input);
}
