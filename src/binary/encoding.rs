// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives: varint, strings, front compression.
//!
//! Nothing fancy here, just the classics done right. Varint for integers that
//! are usually small. Front compression for the sorted term dictionary.
//! `ByteReader` wraps the decoding side so every failure names the block it
//! happened in.
//!
//! # References
//!
//! - **Varint (LEB128)**: Little-endian base-128 variable-length integer encoding.
//!   See: DWARF4 specification §7.6 "Variable Length Data", and
//!   Google Protocol Buffers encoding: <https://protobuf.dev/programming-guides/encoding/>
//!
//! - **Front Compression**: Incremental encoding for sorted string sequences.
//!   Witten, Moffat, Bell (1999): "Managing Gigabytes", §3.3 "Front Coding".

use std::io;

use super::header::MAX_VARINT_BYTES;
use crate::error::{Block, Error, Result};

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        } else {
            buf.push(byte | 0x80);
        }
    }
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
///
/// Returns an error if:
/// - Buffer is empty
/// - Varint exceeds MAX_VARINT_BYTES (malformed/malicious input)
pub fn decode_varint(bytes: &[u8]) -> io::Result<(u64, usize)> {
    if bytes.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "empty buffer for varint",
        ));
    }

    let mut result: u64 = 0;
    let mut shift = 0;
    let mut i = 0;

    while i < bytes.len() && i < MAX_VARINT_BYTES {
        let byte = bytes[i];
        result |= ((byte & 0x7F) as u64) << shift;
        i += 1;
        if byte & 0x80 == 0 {
            return Ok((result, i));
        }
        shift += 7;
    }

    if i >= MAX_VARINT_BYTES {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "varint exceeds maximum length",
        ))
    } else {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "incomplete varint"))
    }
}

/// Length-prefixed UTF-8 string.
pub fn encode_str(s: &str, buf: &mut Vec<u8>) {
    encode_varint(s.len() as u64, buf);
    buf.extend_from_slice(s.as_bytes());
}

pub fn encode_f64(value: f64, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&value.to_le_bytes());
}

// ============================================================================
// READER
// ============================================================================

/// Cursor over one block. Errors come back as `Error::Corrupt` for that block:
/// the checksum already passed, so running out of bytes here means the writer
/// produced garbage, not that the download was cut.
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    block: Block,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8], block: Block) -> Self {
        Self { bytes, pos: 0, block }
    }

    pub fn block(&self) -> Block {
        self.block
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn corrupt(&self, reason: impl Into<String>) -> Error {
        Error::corrupt(self.block, reason)
    }

    pub fn varint(&mut self) -> Result<u64> {
        let (value, consumed) = decode_varint(&self.bytes[self.pos..])
            .map_err(|e| self.corrupt(format!("{} at offset {}", e, self.pos)))?;
        self.pos += consumed;
        Ok(value)
    }

    pub fn varint_u32(&mut self, what: &str) -> Result<u32> {
        let value = self.varint()?;
        u32::try_from(value).map_err(|_| self.corrupt(format!("{} {} out of range", what, value)))
    }

    pub fn varint_usize(&mut self, what: &str) -> Result<usize> {
        let value = self.varint()?;
        usize::try_from(value).map_err(|_| self.corrupt(format!("{} {} out of range", what, value)))
    }

    /// Read an element count, rejecting counts that can't possibly fit in the
    /// remaining bytes (each element takes at least `min_size` bytes).
    pub fn count(&mut self, what: &str, min_size: usize) -> Result<usize> {
        let count = self.varint_usize(what)?;
        if count.saturating_mul(min_size.max(1)) > self.remaining() {
            return Err(self.corrupt(format!(
                "{} count {} exceeds available bytes {}",
                what,
                count,
                self.remaining()
            )));
        }
        Ok(count)
    }

    pub fn u8(&mut self) -> Result<u8> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| self.corrupt("unexpected end of block"))?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn f64(&mut self) -> Result<f64> {
        let raw = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(raw);
        Ok(f64::from_le_bytes(buf))
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                self.corrupt(format!(
                    "need {} bytes at offset {}, block has {}",
                    len,
                    self.pos,
                    self.bytes.len()
                ))
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn string(&mut self) -> Result<String> {
        let len = self.varint_usize("string length")?;
        let raw = self.take(len)?;
        std::str::from_utf8(raw)
            .map(str::to_string)
            .map_err(|e| self.corrupt(format!("invalid UTF-8: {}", e)))
    }

    /// Split off the next `len` bytes as their own reader.
    pub fn sub_reader(&mut self, len: usize) -> Result<ByteReader<'a>> {
        let block = self.block;
        Ok(ByteReader::new(self.take(len)?, block))
    }
}

// ============================================================================
// DICTIONARY ENCODING (front compression)
// ============================================================================

/// Calculate the common prefix length between two byte slices.
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Encode a sorted term list with front compression.
///
/// Format: [count: varint] then per term
/// [shared_prefix_len: varint][suffix_len: varint][suffix: bytes]
///
/// Example:
/// - "config"     -> [0][6]["config"]
/// - "configure"  -> [6][3]["ure"]
/// - "confirm"    -> [4][3]["irm"]
pub fn encode_dictionary<'a>(terms: impl ExactSizeIterator<Item = &'a str>, out: &mut Vec<u8>) {
    encode_varint(terms.len() as u64, out);
    let mut prev: &[u8] = &[];
    for term in terms {
        let bytes = term.as_bytes();
        let shared = common_prefix_len(prev, bytes);
        let suffix = &bytes[shared..];

        encode_varint(shared as u64, out);
        encode_varint(suffix.len() as u64, out);
        out.extend_from_slice(suffix);

        prev = bytes;
    }
}

/// Decode a front-coded dictionary, checking strict codepoint order.
pub fn decode_dictionary(reader: &mut ByteReader<'_>) -> Result<Vec<String>> {
    let count = reader.count("term", 2)?;
    let mut terms: Vec<String> = Vec::with_capacity(count);
    let mut prev: Vec<u8> = Vec::new();

    for i in 0..count {
        let shared = reader.varint_usize("shared prefix")?;
        if shared > prev.len() {
            return Err(reader.corrupt(format!(
                "term {}: shared prefix {} longer than previous term ({})",
                i,
                shared,
                prev.len()
            )));
        }
        let suffix_len = reader.varint_usize("suffix length")?;
        let suffix = reader.take(suffix_len)?;

        let mut term_bytes = prev[..shared].to_vec();
        term_bytes.extend_from_slice(suffix);
        let term = String::from_utf8(term_bytes)
            .map_err(|e| reader.corrupt(format!("term {}: invalid UTF-8: {}", i, e)))?;

        if terms.last().is_some_and(|last| last.as_str() >= term.as_str()) {
            return Err(reader.corrupt(format!("term {} out of order", i)));
        }
        prev.clear();
        prev.extend_from_slice(term.as_bytes());
        terms.push(term);
    }

    Ok(terms)
}
