// SPDX-License-Identifier: ISC
//! Pluggable codec interface and the LZF implementation of it.
use std::io::{Read, Write};

use crate::{DEFAULT_CHUNK_SIZE, Error, Result};

/// Configuration handed to a codec when it is created.
///
/// `disk` is an opaque storage identifier owned by the host application; the
/// codec stores it and hands it back through [`Codec::config`] but never
/// interprets it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodecConfig {
    /// Storage disk the host writes encoded files to.
    pub disk: Option<String>,
    /// Read size used by the streaming operations.
    pub chunk_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { disk: None, chunk_size: DEFAULT_CHUNK_SIZE }
    }
}

impl CodecConfig {
    /// Returns a copy of this configuration with `disk` set.
    pub fn with_disk(mut self, disk: impl Into<String>) -> Self {
        self.disk = Some(disk.into());
        self
    }

    /// Returns a copy of this configuration with `chunk_size` set.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

/// A compression algorithm that can be selected by name at runtime.
///
/// Implementations hold only immutable configuration, so one instance may be
/// shared between threads and used for any number of concurrent calls.
pub trait Codec: Send + Sync {
    /// Registry name of the codec.
    fn name(&self) -> &'static str;

    /// Compresses a whole buffer.
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Decompresses a whole buffer.
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Compresses `input` into `output` in chunks of the configured size.
    ///
    /// Returns the number of bytes written.
    fn compress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64>;

    /// Decompresses `input` into `output` in chunks of the configured size.
    ///
    /// Returns the number of bytes written.
    fn decompress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64>;

    /// Internal mode identifiers this codec understands.
    fn supported_algorithms(&self) -> &'static [u32];

    /// Mode identifier used when the caller does not pick one.
    fn default_encoding(&self) -> u32 {
        0
    }

    /// Conventional file extension for encoded data, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Configuration the codec was created with.
    fn config(&self) -> &CodecConfig;
}

/// LZF [`Codec`].
///
/// Whole-buffer calls go straight to [`compress`](crate::compress) and
/// [`decompress`](crate::decompress); stream calls use the configured chunk
/// size. Without the `encoder` feature every compress call fails with
/// `Error::ExtensionUnavailable`.
#[derive(Clone, Debug, Default)]
pub struct LzfCodec {
    config: CodecConfig,
}

impl LzfCodec {
    /// Registry name.
    pub const NAME: &'static str = "lzf";

    /// Creates a codec, rejecting a zero chunk size.
    pub fn new(config: CodecConfig) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(Error::InvalidParameter);
        }
        Ok(Self { config })
    }
}

impl Codec for LzfCodec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[cfg(feature = "encoder")]
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        crate::compress(input)
    }

    #[cfg(not(feature = "encoder"))]
    fn compress(&self, _input: &[u8]) -> Result<Vec<u8>> {
        Err(Error::ExtensionUnavailable)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        crate::decompress(input)
    }

    #[cfg(feature = "encoder")]
    fn compress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64> {
        crate::compress_stream(input, output, self.config.chunk_size)
    }

    #[cfg(not(feature = "encoder"))]
    fn compress_stream(&self, _input: &mut dyn Read, _output: &mut dyn Write) -> Result<u64> {
        Err(Error::ExtensionUnavailable)
    }

    fn decompress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64> {
        crate::decompress_stream(input, output, self.config.chunk_size)
    }

    fn supported_algorithms(&self) -> &'static [u32] {
        &[0]
    }

    fn file_extension(&self) -> &'static str {
        "lzf"
    }

    fn config(&self) -> &CodecConfig {
        &self.config
    }
}
