// SPDX-License-Identifier: ISC
use std::io;

use thiserror::Error;

/// Result type used by this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for LZF encode/decode operations.
///
/// The variants are shared by the raw token APIs, the streaming helpers and
/// adapters, and the [`Codec`](crate::Codec) registry.
#[derive(Debug, Error)]
pub enum Error {
    /// The compressor is not available in this build (`encoder` feature off).
    #[error("LZF compressor is not available in this build")]
    ExtensionUnavailable,
    /// The input could not be compressed (empty input).
    #[error("failed to compress input")]
    CompressionFailure,
    /// The token stream is malformed or truncated.
    #[error("invalid compressed data")]
    InvalidCompressedData,
    /// Output buffer is too small for the requested operation.
    #[error("output buffer too small")]
    OutputTooSmall,
    /// Configuration is invalid.
    #[error("invalid parameter")]
    InvalidParameter,
    /// No codec is registered under the requested name.
    #[error("unknown codec: {0}")]
    UnknownCodec(String),
    /// Error reported by a caller-supplied reader or writer.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<Error> for io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Io(err) => err,
            Error::InvalidCompressedData => io::Error::new(io::ErrorKind::InvalidData, value),
            Error::InvalidParameter => io::Error::new(io::ErrorKind::InvalidInput, value),
            other => io::Error::other(other),
        }
    }
}
