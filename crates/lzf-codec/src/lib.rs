// SPDX-License-Identifier: ISC
//! Pluggable LZF compression codec.
//!
//! # Overview
//!
//! This crate provides:
//!
//! - Raw LZF token encode/decode over whole buffers (`compress`/`decompress`).
//! - Chunked streaming over `std::io` (`compress_stream`/`decompress_stream`)
//!   and the `LzfReader`/`LzfWriter` adapters built on the same chunking.
//! - A [`Codec`] trait and a name-based [`Registry`] so a host application can
//!   pick the algorithm from configuration.
//!
//! The encoded form is the bare token stream: there is no header, magic
//! number, or length prefix. Streaming compression encodes each chunk of
//! `chunk_size` input bytes on its own, so the output is the concatenation of
//! independent token streams, which decodes as a single stream.
//!
//! # Features
//!
//! - `encoder` (default): enables compression. Without it only decoding is
//!   available and [`LzfCodec`] reports `Error::ExtensionUnavailable`.
//! - `serde`: derives `Serialize`/`Deserialize` for [`CodecConfig`].
//!
//! # Examples
//!
//! Whole-buffer roundtrip:
//!
//! ```
//! use lzf_codec::{compress, decompress};
//!
//! let input = b"hello hello hello hello";
//! let compressed = compress(input).unwrap();
//! assert_eq!(decompress(&compressed).unwrap(), input);
//! ```
//!
//! Selecting the codec by name:
//!
//! ```
//! use lzf_codec::{CodecConfig, Registry};
//!
//! let codec = Registry::with_defaults().create("lzf", CodecConfig::default()).unwrap();
//! let mut encoded = Vec::<u8>::new();
//! codec.compress_stream(&mut &b"chunked chunked chunked"[..], &mut encoded).unwrap();
//! assert_eq!(codec.decompress(&encoded).unwrap(), b"chunked chunked chunked");
//! ```
//!
//! # Safety
//!
//! This crate forbids `unsafe` code.
//!
//! # License
//!
//! This repository uses file-level licensing:
//!
//! - `src/raw/encoder.rs`: `BSD-2-Clause` (derived from liblzf encoder logic).
//! - Remaining sources: `ISC`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod codec;
mod error;
mod raw;
mod registry;
mod stream;

pub use codec::{Codec, CodecConfig, LzfCodec};
/// Crate error and result types.
pub use error::{Error, Result};
#[cfg(feature = "encoder")]
#[cfg_attr(docsrs, doc(cfg(feature = "encoder")))]
/// Raw LZF encoder APIs.
pub use raw::{compress, compress_into};
/// Raw LZF decoder APIs.
pub use raw::{decompress, decompress_into, decompress_into_vec};
pub use registry::{CodecConstructor, Registry};
/// Chunked LZF stream reader.
pub use stream::LzfReader;
#[cfg(feature = "encoder")]
#[cfg_attr(docsrs, doc(cfg(feature = "encoder")))]
/// Chunked LZF stream writer.
pub use stream::LzfWriter;
#[cfg(feature = "encoder")]
#[cfg_attr(docsrs, doc(cfg(feature = "encoder")))]
/// Chunked stream compression.
pub use stream::compress_stream;
/// Chunked stream decompression.
pub use stream::decompress_stream;

/// Maximum literal run size in the LZF format.
pub const MAX_LITERAL_LEN: usize = 1 << 5;

/// Maximum back-reference distance in the LZF format.
pub const MAX_OFFSET: usize = 1 << 13;

/// Maximum match length in the LZF format.
pub const MAX_MATCH_LEN: usize = (1 << 8) + (1 << 3);

/// Read size used by the streaming APIs unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Computes a guaranteed upper bound for compressed output size.
#[inline]
pub const fn max_compressed_size(input_len: usize) -> usize {
    ((input_len * 33) >> 5) + 1
}

/// Internal trait used by [`AutoFinisher`] to finalize streams on drop.
#[doc(hidden)]
pub trait AutoFinish {
    /// Finalizes the wrapped stream and ignores any returned error.
    fn finish_ignore_error(self);
}

/// Wrapper that attempts to finish the wrapped writer on drop.
///
/// Useful when early returns or panics would otherwise skip the explicit
/// `finish()` call and lose the last partial chunk.
pub struct AutoFinisher<T: AutoFinish>(pub(crate) Option<T>);

impl<T: AutoFinish> Drop for AutoFinisher<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.0.take() {
            inner.finish_ignore_error();
        }
    }
}

impl<T: AutoFinish> core::ops::Deref for AutoFinisher<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref().expect("AutoFinisher: inner value missing")
    }
}

impl<T: AutoFinish> core::ops::DerefMut for AutoFinisher<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut().expect("AutoFinisher: inner value missing")
    }
}

impl<T: AutoFinish + std::io::Write> std::io::Write for AutoFinisher<T> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        std::io::Write::write(&mut **self, buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::Write::flush(&mut **self)
    }
}
