// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Postings block encoding.
//!
//! Postings are the heart of an inverted index: for each term, which sections
//! contain it, how often per field, and where. Sections are referenced by
//! their ordinal in the (id-sorted) section block, and since posting lists are
//! sorted by id the ordinals ascend, so we delta-encode them. Positions ascend
//! too and get the same treatment.
//!
//! Block format, one list per dictionary term in dictionary order:
//!
//! ```text
//! list    := count:varint posting{count}
//! posting := ordinal_delta:varint title_tf:varint heading_tf:varint body_tf:varint
//!            position_count:varint position_delta:varint{position_count}
//! ```
//!
//! The first ordinal/position of a list is stored as-is (delta from zero).
//!
//! # References
//!
//! - **Delta Encoding for Postings**: Zobel & Moffat (2006): "Inverted Files
//!   for Text Search Engines", ACM Computing Surveys.

use super::encoding::{encode_varint, ByteReader};
use crate::error::Result;
use crate::types::{FieldFreqs, PerField, Posting};

/// A decoded posting before ordinals are resolved to section ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPosting {
    pub ordinal: u32,
    pub freqs: FieldFreqs,
    pub positions: Vec<u32>,
}

/// Encode one posting list. `ordinal` maps a posting to its section ordinal.
pub fn encode_posting_list(
    postings: &[Posting],
    ordinal: impl Fn(&Posting) -> u32,
    buf: &mut Vec<u8>,
) {
    encode_varint(postings.len() as u64, buf);

    let mut prev_ordinal = 0u32;
    for posting in postings {
        let ord = ordinal(posting);
        encode_varint((ord - prev_ordinal) as u64, buf);
        prev_ordinal = ord;

        for tf in posting.freqs.0 {
            encode_varint(tf as u64, buf);
        }

        encode_varint(posting.positions.len() as u64, buf);
        let mut prev_pos = 0u32;
        for &pos in &posting.positions {
            encode_varint((pos - prev_pos) as u64, buf);
            prev_pos = pos;
        }
    }
}

/// Decode one posting list, validating order and ordinal range.
pub fn decode_posting_list(reader: &mut ByteReader<'_>, section_count: u32) -> Result<Vec<RawPosting>> {
    // a posting takes at least 5 bytes (ordinal, three tfs, position count)
    let count = reader.count("posting", 5)?;
    if count == 0 {
        return Err(reader.corrupt("empty posting list"));
    }

    let mut list = Vec::with_capacity(count);
    let mut ordinal = 0u32;
    for i in 0..count {
        let delta = reader.varint_u32("ordinal delta")?;
        if i > 0 && delta == 0 {
            return Err(reader.corrupt("posting list not strictly ascending"));
        }
        ordinal = ordinal
            .checked_add(delta)
            .filter(|&o| o < section_count)
            .ok_or_else(|| reader.corrupt(format!("section ordinal out of range ({} sections)", section_count)))?;

        let freqs = PerField([
            reader.varint_u32("title tf")?,
            reader.varint_u32("heading tf")?,
            reader.varint_u32("body tf")?,
        ]);

        let n = reader.count("position", 1)?;
        let mut positions = Vec::with_capacity(n);
        let mut pos = 0u32;
        for j in 0..n {
            let d = reader.varint_u32("position delta")?;
            if j > 0 && d == 0 {
                return Err(reader.corrupt("positions not strictly ascending"));
            }
            pos = pos
                .checked_add(d)
                .ok_or_else(|| reader.corrupt("position overflow"))?;
            positions.push(pos);
        }
        let total: u64 = freqs.0.iter().map(|&f| f as u64).sum();
        if total == 0 || total != n as u64 {
            return Err(reader.corrupt(format!(
                "posting {} has {} positions but term frequency {}",
                i, n, total
            )));
        }

        list.push(RawPosting {
            ordinal,
            freqs,
            positions,
        });
    }
    Ok(list)
}
