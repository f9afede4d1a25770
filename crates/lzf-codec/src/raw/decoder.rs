// SPDX-License-Identifier: ISC
use crate::{Error, Result};

/// Decodes every complete token of `input`, appending to `output`.
///
/// Back-references may reach into bytes already present in `output`, which
/// lets the streaming decoder seed it with history from earlier reads.
/// Decoding stops in front of a token that is cut off by the end of `input`;
/// the return value is the number of input bytes consumed, so a caller
/// holding the whole stream treats `consumed != input.len()` as truncation.
///
/// Fails with `Error::OutputTooSmall` if `output` would grow past `limit`.
pub(crate) fn decode_tokens(input: &[u8], output: &mut Vec<u8>, limit: usize) -> Result<usize> {
    let mut ip = 0usize;

    while ip < input.len() {
        let ctrl = input[ip];

        if ctrl < 32 {
            let len = usize::from(ctrl) + 1;
            let start = ip + 1;
            if input.len() - start < len {
                break;
            }
            if output.len() + len > limit {
                return Err(Error::OutputTooSmall);
            }
            output.extend_from_slice(&input[start..start + len]);
            ip = start + len;
            continue;
        }

        let mut cursor = ip + 1;
        let mut len = usize::from(ctrl >> 5);
        if len == 7 {
            let Some(&extra) = input.get(cursor) else { break };
            len += usize::from(extra);
            cursor += 1;
        }
        let Some(&off_lo) = input.get(cursor) else { break };
        cursor += 1;

        let distance = ((usize::from(ctrl & 0x1f) << 8) | usize::from(off_lo)) + 1;
        let copy_len = len + 2;
        if distance > output.len() {
            return Err(Error::InvalidCompressedData);
        }
        if output.len() + copy_len > limit {
            return Err(Error::OutputTooSmall);
        }

        let src = output.len() - distance;
        if distance >= copy_len {
            output.extend_from_within(src..src + copy_len);
        } else {
            // Overlapping reference: each copied byte may be one this token wrote.
            output.reserve(copy_len);
            for i in src..src + copy_len {
                let byte = output[i];
                output.push(byte);
            }
        }
        ip = cursor;
    }

    Ok(ip)
}

/// Decompresses a raw LZF token stream into a fresh `Vec<u8>`.
///
/// Empty input decodes to empty output.
///
/// Returns `Error::InvalidCompressedData` when a back-reference points before
/// the start of the output or the stream ends in the middle of a token.
///
/// # Example
///
/// ```
/// use lzf_codec::{compress, decompress};
///
/// let compressed = compress(b"Hello, World!").unwrap();
/// assert_eq!(decompress(&compressed).unwrap(), b"Hello, World!");
/// assert!(decompress(b"").unwrap().is_empty());
/// ```
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len().saturating_mul(2));
    let consumed = decode_tokens(input, &mut output, usize::MAX)?;
    if consumed != input.len() {
        return Err(Error::InvalidCompressedData);
    }
    Ok(output)
}

/// Decompresses raw LZF `input` into `output`.
///
/// Returns the number of bytes written to `output`.
///
/// Returns:
/// - `Error::InvalidCompressedData` when the token stream is malformed.
/// - `Error::OutputTooSmall` when `output` is too small for the decoded data.
pub fn decompress_into(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let mut decoded = Vec::with_capacity(output.len());
    let consumed = decode_tokens(input, &mut decoded, output.len())?;
    if consumed != input.len() {
        return Err(Error::InvalidCompressedData);
    }
    output[..decoded.len()].copy_from_slice(&decoded);
    Ok(decoded.len())
}

/// Decompresses raw LZF `input` into a fresh `Vec<u8>` of `output_len` bytes.
///
/// Returns `Error::InvalidCompressedData` if the stream decodes to a length
/// different from `output_len`.
pub fn decompress_into_vec(input: &[u8], output_len: usize) -> Result<Vec<u8>> {
    let mut output = vec![0u8; output_len];
    let written = decompress_into(input, &mut output).map_err(|err| match err {
        Error::OutputTooSmall => Error::InvalidCompressedData,
        other => other,
    })?;
    if written != output_len {
        return Err(Error::InvalidCompressedData);
    }
    Ok(output)
}
