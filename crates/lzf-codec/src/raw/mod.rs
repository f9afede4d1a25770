// SPDX-License-Identifier: ISC
//! Raw (unframed) LZF token encoder/decoder.
//!
//! The encoded form is the token stream itself, with no header or length
//! prefix.
mod decoder;
#[cfg(feature = "encoder")]
mod encoder;

pub(crate) use decoder::decode_tokens;
pub use decoder::{decompress, decompress_into, decompress_into_vec};
#[cfg(feature = "encoder")]
pub use encoder::{compress, compress_into};
