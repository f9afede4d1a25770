// SPDX-License-Identifier: BSD-2-Clause
// Token layout and hashing follow liblzf by Stefan Traby and Marc Lehmann.

use crate::{Error, MAX_LITERAL_LEN, MAX_MATCH_LEN, MAX_OFFSET, Result, max_compressed_size};

const HASH_LOG: usize = 14;
const HASH_SIZE: usize = 1 << HASH_LOG;
const WINDOW_MASK: usize = MAX_OFFSET - 1;

#[inline]
fn hash3(input: &[u8], index: usize) -> usize {
    let v = (u32::from(input[index]) << 16)
        | (u32::from(input[index + 1]) << 8)
        | u32::from(input[index + 2]);
    ((v.wrapping_mul(0x1e35_a7bd) >> (32 - HASH_LOG - 8)) as usize) & (HASH_SIZE - 1)
}

/// Per-call match index.
///
/// `head` maps a hash to the newest position with that hash, `prev` links each
/// position in the window to the previous one sharing its hash. Both store
/// `position + 1` so that zero means "none".
struct HashChain {
    head: Vec<u32>,
    prev: Vec<u32>,
}

impl HashChain {
    fn new() -> Self {
        Self { head: vec![0u32; HASH_SIZE], prev: vec![0u32; MAX_OFFSET] }
    }

    #[inline]
    fn insert(&mut self, input: &[u8], pos: usize) {
        let h = hash3(input, pos);
        self.prev[pos & WINDOW_MASK] = self.head[h];
        self.head[h] = (pos + 1) as u32;
    }

    /// Returns `(distance, length)` of the longest match for `pos`.
    ///
    /// Candidates are visited newest first and only a strictly longer match
    /// replaces the current best, so ties resolve to the smallest distance.
    fn longest_match(&self, input: &[u8], pos: usize) -> Option<(usize, usize)> {
        let max_len = (input.len() - pos).min(MAX_MATCH_LEN);
        let mut best: Option<(usize, usize)> = None;
        let mut link = self.head[hash3(input, pos)] as usize;

        while link != 0 {
            let candidate = link - 1;
            let distance = pos - candidate;
            if distance > MAX_OFFSET {
                break;
            }

            if input[candidate..candidate + 3] == input[pos..pos + 3] {
                let mut len = 3usize;
                while len < max_len && input[candidate + len] == input[pos + len] {
                    len += 1;
                }
                if best.is_none_or(|(_, best_len)| len > best_len) {
                    best = Some((distance, len));
                    if len == max_len {
                        break;
                    }
                }
            }

            link = self.prev[candidate & WINDOW_MASK] as usize;
        }

        best
    }
}

#[inline]
fn emit_literals(literals: &[u8], out: &mut [u8], op: &mut usize) -> Result<()> {
    for run in literals.chunks(MAX_LITERAL_LEN) {
        let needed = 1 + run.len();
        if *op + needed > out.len() {
            return Err(Error::OutputTooSmall);
        }

        out[*op] = (run.len() - 1) as u8;
        out[*op + 1..*op + needed].copy_from_slice(run);
        *op += needed;
    }
    Ok(())
}

#[inline]
fn emit_backref(out: &mut [u8], op: &mut usize, distance: usize, len: usize) -> Result<()> {
    debug_assert!((1..=MAX_OFFSET).contains(&distance));
    debug_assert!((3..=MAX_MATCH_LEN).contains(&len));

    let off = distance - 1;
    let l = len - 2;
    let needed = if l < 7 { 2 } else { 3 };
    if *op + needed > out.len() {
        return Err(Error::OutputTooSmall);
    }

    if l < 7 {
        out[*op] = ((l as u8) << 5) | ((off >> 8) as u8);
        *op += 1;
    } else {
        out[*op] = (7u8 << 5) | ((off >> 8) as u8);
        out[*op + 1] = (l - 7) as u8;
        *op += 2;
    }

    out[*op] = (off & 0xff) as u8;
    *op += 1;
    Ok(())
}

/// Compresses `input` into `output` as a raw LZF token stream.
///
/// Returns the number of bytes written.
///
/// Returns:
/// - `Error::CompressionFailure` when `input` is empty.
/// - `Error::OutputTooSmall` when `output` cannot hold the token stream.
///
/// A buffer of `max_compressed_size(input.len())` bytes is always large
/// enough.
pub fn compress_into(input: &[u8], output: &mut [u8]) -> Result<usize> {
    if input.is_empty() {
        return Err(Error::CompressionFailure);
    }

    let mut chain = HashChain::new();
    let mut op = 0usize;
    let mut anchor = 0usize;
    let mut pos = 0usize;

    while pos + 2 < input.len() {
        let found = chain.longest_match(input, pos);
        chain.insert(input, pos);

        let Some((distance, len)) = found else {
            pos += 1;
            continue;
        };

        emit_literals(&input[anchor..pos], output, &mut op)?;
        emit_backref(output, &mut op, distance, len)?;

        let end = pos + len;
        let mut scan = pos + 1;
        while scan < end && scan + 2 < input.len() {
            chain.insert(input, scan);
            scan += 1;
        }

        pos = end;
        anchor = pos;
    }

    emit_literals(&input[anchor..], output, &mut op)?;
    Ok(op)
}

/// Compresses `input` into a freshly allocated raw LZF token stream.
///
/// The result is always the encoded form, even when it is not shorter than
/// `input`. Empty input fails with `Error::CompressionFailure`.
///
/// # Example
///
/// ```
/// use lzf_codec::{compress, decompress};
///
/// let input = vec![b'a'; 1000];
/// let compressed = compress(&input).unwrap();
/// assert!(compressed.len() < input.len());
/// assert_eq!(decompress(&compressed).unwrap(), input);
/// ```
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = vec![0u8; max_compressed_size(input.len())];
    let written = compress_into(input, &mut output)?;
    output.truncate(written);
    Ok(output)
}
