// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary artifact format for docsift indexes.
//!
//! Two goals pull against each other: the artifact must be small (it ships to
//! every visitor) and it must be byte-for-byte reproducible (it's content
//! addressed, and CI diffs it). Small comes from front-coded terms and
//! delta+varint postings, which also give brotli repetitive patterns to chew
//! on. Reproducible comes from having no hash maps anywhere on the write
//! path and no clock reads: the build timestamp is an input.
//!
//! # Security Considerations
//!
//! Artifacts are fetched over the network and parsed on the client:
//! - CRC32 footer detects corruption/truncation before any block is parsed
//! - All counts are checked against the bytes that remain before allocating
//! - Ordinals, sort order and stats are cross-checked after decode
//! - Varint decoder has maximum iteration limits
//!
//! # Format Overview (1.0)
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER (46 bytes + locale)                                 │
//! │   magic: [u8; 4] = "DSFT"                                  │
//! │   major: u16, minor: u16, header_len: u32                  │
//! │   built_at: u64                                            │
//! │   dictionary_len, postings_len, sections_len, stats_len    │
//! │   term_count: u32, section_count: u32                      │
//! │   locale_len: u16, locale: [u8]                            │
//! ├────────────────────────────────────────────────────────────┤
//! │ 1. DICTIONARY (front-compressed, codepoint order)          │
//! ├────────────────────────────────────────────────────────────┤
//! │ 2. POSTINGS (delta+varint, one list per term)              │
//! ├────────────────────────────────────────────────────────────┤
//! │ 3. SECTIONS (length-prefixed records, id order)            │
//! ├────────────────────────────────────────────────────────────┤
//! │ 4. STATS (totals, field weights, bm25, stopwords)          │
//! ├────────────────────────────────────────────────────────────┤
//! │ (blocks from newer minor versions, skipped)                │
//! ├────────────────────────────────────────────────────────────┤
//! │ FOOTER (8 bytes): crc32 + magic "TFSD"                     │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Forward compatibility within a major version: readers skip unknown header
//! bytes (via `header_len`), unknown trailing fields in a section record (each
//! record is length-prefixed), unknown trailing stats fields, and unknown
//! blocks after the stats block.

mod encoding;
mod header;
mod postings;

pub use encoding::{decode_varint, encode_varint, ByteReader};
pub use header::{
    BlockOffsets, Footer, Header, FOOTER_MAGIC, MAGIC, MAX_FILE_SIZE, MAX_SECTION_COUNT,
    MAX_TERM_COUNT, MAX_VARINT_BYTES, VERSION_MAJOR, VERSION_MINOR,
};
pub use postings::RawPosting;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use encoding::{decode_dictionary, encode_dictionary, encode_f64, encode_str};
use postings::{decode_posting_list, encode_posting_list};

use crate::config::{Bm25Params, FieldWeights, IndexSettings};
use crate::error::{Block, Error, Result};
use crate::index::InvertedIndex;
use crate::types::{GlobalStats, PerField, Posting, SectionId, SectionMeta};
use crate::utils::floor_char_boundary;

/// Longest locale tag stored in the header.
const MAX_LOCALE_LEN: usize = 255;

// ============================================================================
// ENCODING
// ============================================================================

/// Serialize an index. Identical indexes give identical bytes.
pub fn encode_index(index: &InvertedIndex) -> Vec<u8> {
    let ordinals: HashMap<&SectionId, u32> = index
        .sections
        .keys()
        .enumerate()
        .map(|(i, id)| (id, i as u32))
        .collect();

    let mut dictionary = Vec::new();
    encode_dictionary(index.terms.keys().map(String::as_str), &mut dictionary);

    let mut postings = Vec::new();
    for list in index.terms.values() {
        // every posting refers to a section in the table (index invariant)
        encode_posting_list(
            list,
            |p: &Posting| ordinals.get(&p.section).copied().unwrap_or_default(),
            &mut postings,
        );
    }

    let mut sections = Vec::new();
    encode_varint(index.sections.len() as u64, &mut sections);
    let mut record = Vec::new();
    for meta in index.sections.values() {
        record.clear();
        encode_section(meta, &mut record);
        encode_varint(record.len() as u64, &mut sections);
        sections.extend_from_slice(&record);
    }

    let mut stats = Vec::new();
    encode_stats(&index.stats, &index.settings, &mut stats);

    let locale = &index.locale[..floor_char_boundary(&index.locale, MAX_LOCALE_LEN)];
    let header = Header {
        major: VERSION_MAJOR,
        minor: VERSION_MINOR,
        header_len: Header::encoded_len(locale) as u32,
        built_at: index.built_at,
        dictionary_len: dictionary.len() as u32,
        postings_len: postings.len() as u32,
        sections_len: sections.len() as u32,
        stats_len: stats.len() as u32,
        term_count: index.terms.len() as u32,
        section_count: index.sections.len() as u32,
        locale: locale.to_string(),
    };

    let total = header.header_len as usize
        + dictionary.len()
        + postings.len()
        + sections.len()
        + stats.len()
        + Footer::SIZE;
    let mut out = Vec::with_capacity(total);
    header.write(&mut out);
    out.extend_from_slice(&dictionary);
    out.extend_from_slice(&postings);
    out.extend_from_slice(&sections);
    out.extend_from_slice(&stats);
    Footer {
        crc32: Footer::compute_crc32(&out),
    }
    .write(&mut out);
    out
}

fn encode_section(meta: &SectionMeta, buf: &mut Vec<u8>) {
    encode_str(meta.id.as_str(), buf);
    encode_str(&meta.url, buf);
    encode_str(&meta.anchor, buf);
    encode_str(&meta.heading, buf);
    encode_str(&meta.doc_title, buf);
    encode_varint(meta.breadcrumb.len() as u64, buf);
    for crumb in &meta.breadcrumb {
        encode_str(crumb, buf);
    }
    buf.push(meta.level);
    encode_str(&meta.locale, buf);
    encode_varint(meta.doc_order as u64, buf);
    encode_varint(meta.position as u64, buf);
    for len in meta.field_lens.0 {
        encode_varint(len as u64, buf);
    }
    encode_varint(meta.source_range.start as u64, buf);
    encode_varint(meta.source_range.end as u64, buf);
    encode_str(&meta.body, buf);
}

fn encode_stats(stats: &GlobalStats, settings: &IndexSettings, buf: &mut Vec<u8>) {
    encode_varint(stats.section_count as u64, buf);
    encode_varint(stats.doc_count as u64, buf);
    for total in stats.total_lens.0 {
        encode_varint(total, buf);
    }
    encode_f64(settings.weights.title, buf);
    encode_f64(settings.weights.heading, buf);
    encode_f64(settings.weights.body, buf);
    encode_f64(settings.bm25.k1, buf);
    encode_f64(settings.bm25.b, buf);
    encode_varint(settings.stopwords.len() as u64, buf);
    for word in settings.stopwords.iter() {
        encode_str(word, buf);
    }
}

// ============================================================================
// DECODING
// ============================================================================

/// Check magic, version and checksum, and parse the header.
///
/// Cheap: touches the blocks only to checksum them.
pub fn read_header(bytes: &[u8]) -> Result<Header> {
    if bytes.len() > MAX_FILE_SIZE {
        return Err(Error::corrupt(
            Block::Header,
            format!("artifact is {} bytes, limit is {}", bytes.len(), MAX_FILE_SIZE),
        ));
    }
    Header::check_version(bytes)?;
    let footer = Footer::read(bytes)?;
    let content = &bytes[..bytes.len() - Footer::SIZE];
    footer.verify(content)?;

    let header = Header::read(content)?;
    let end = header.block_offsets().end();
    if end > content.len() {
        return Err(Error::corrupt(
            Block::Header,
            format!("blocks end at {} but content is {} bytes", end, content.len()),
        ));
    }
    Ok(header)
}

/// Parse and validate a complete artifact. All or nothing.
pub fn decode_index(bytes: &[u8]) -> Result<InvertedIndex> {
    let header = read_header(bytes)?;
    let offsets = header.block_offsets();
    let block = |range: (usize, usize)| offsets.slice(bytes, range).unwrap_or_default();

    let dictionary_bytes = block(offsets.dictionary);
    let postings_bytes = block(offsets.postings);
    let sections_bytes = block(offsets.sections);
    let stats_bytes = block(offsets.stats);
    let term_count = header.term_count;
    let section_count = header.section_count;

    let decode_dict = || decode_dictionary_block(dictionary_bytes);
    let decode_postings = || decode_postings_block(postings_bytes, term_count, section_count);
    let decode_sections = || decode_sections_block(sections_bytes);
    let decode_stats = || decode_stats_block(stats_bytes);

    #[cfg(feature = "parallel")]
    let (terms, (lists, (sections, stats))) = rayon::join(decode_dict, || {
        rayon::join(decode_postings, || rayon::join(decode_sections, decode_stats))
    });

    #[cfg(not(feature = "parallel"))]
    let (terms, (lists, (sections, stats))) =
        (decode_dict(), (decode_postings(), (decode_sections(), decode_stats())));

    let terms = terms?;
    let lists = lists?;
    let sections = sections?;
    let (stats, settings) = stats?;

    if terms.len() != term_count as usize {
        return Err(Error::corrupt(
            Block::Dictionary,
            format!("{} terms, header says {}", terms.len(), term_count),
        ));
    }
    if sections.len() != section_count as usize {
        return Err(Error::corrupt(
            Block::Sections,
            format!("{} sections, header says {}", sections.len(), section_count),
        ));
    }
    check_stats(&stats, &sections)?;

    let ids: Vec<SectionId> = sections.iter().map(|m| m.id.clone()).collect();
    let terms: BTreeMap<String, Vec<Posting>> = terms
        .into_iter()
        .zip(lists)
        .map(|(term, raw)| {
            let list = raw
                .into_iter()
                .map(|p| Posting {
                    section: ids[p.ordinal as usize].clone(),
                    freqs: p.freqs,
                    positions: p.positions,
                })
                .collect();
            (term, list)
        })
        .collect();

    Ok(InvertedIndex {
        settings,
        locale: header.locale,
        built_at: header.built_at,
        sections: sections.into_iter().map(|m| (m.id.clone(), m)).collect(),
        terms,
        stats,
    })
}

fn decode_dictionary_block(bytes: &[u8]) -> Result<Vec<String>> {
    let mut reader = ByteReader::new(bytes, Block::Dictionary);
    let terms = decode_dictionary(&mut reader)?;
    if !reader.is_empty() {
        return Err(reader.corrupt(format!("{} trailing bytes", reader.remaining())));
    }
    Ok(terms)
}

fn decode_postings_block(bytes: &[u8], term_count: u32, section_count: u32) -> Result<Vec<Vec<RawPosting>>> {
    let mut reader = ByteReader::new(bytes, Block::Postings);
    let mut lists = Vec::with_capacity((term_count as usize).min(bytes.len()));
    for _ in 0..term_count {
        lists.push(decode_posting_list(&mut reader, section_count)?);
    }
    if !reader.is_empty() {
        return Err(reader.corrupt(format!("{} trailing bytes", reader.remaining())));
    }
    Ok(lists)
}

fn decode_sections_block(bytes: &[u8]) -> Result<Vec<SectionMeta>> {
    let mut reader = ByteReader::new(bytes, Block::Sections);
    let count = reader.count("section", 1)?;
    let mut sections: Vec<SectionMeta> = Vec::with_capacity(count);
    for i in 0..count {
        let len = reader.varint_usize("record length")?;
        let mut record = reader.sub_reader(len)?;
        let meta = decode_section(&mut record)?;
        // anything left in `record` belongs to a newer minor version

        if meta.id != SectionId::new(&meta.url, &meta.anchor) {
            return Err(reader.corrupt(format!("section {}: id does not match url and anchor", i)));
        }
        if sections.last().is_some_and(|prev| prev.id >= meta.id) {
            return Err(reader.corrupt(format!("section {} out of order", i)));
        }
        sections.push(meta);
    }
    if !reader.is_empty() {
        return Err(reader.corrupt(format!("{} trailing bytes", reader.remaining())));
    }
    Ok(sections)
}

fn decode_section(r: &mut ByteReader<'_>) -> Result<SectionMeta> {
    let id = SectionId::from_raw(&r.string()?);
    let url = r.string()?;
    let anchor = r.string()?;
    let heading = r.string()?;
    let doc_title = r.string()?;
    let crumbs = r.count("breadcrumb", 1)?;
    let breadcrumb = (0..crumbs).map(|_| r.string()).collect::<Result<Vec<_>>>()?;
    let level = r.u8()?;
    let locale = r.string()?;
    let doc_order = r.varint_u32("doc order")?;
    let position = r.varint_u32("section position")?;
    let field_lens = PerField([
        r.varint_u32("title length")?,
        r.varint_u32("heading length")?,
        r.varint_u32("body length")?,
    ]);
    let start = r.varint_usize("source start")?;
    let end = r.varint_usize("source end")?;
    if start > end {
        return Err(r.corrupt(format!("source range {}..{} is reversed", start, end)));
    }
    let body = r.string()?;
    Ok(SectionMeta {
        id,
        url,
        anchor,
        heading,
        doc_title,
        breadcrumb,
        level,
        locale,
        doc_order,
        position,
        field_lens,
        source_range: start..end,
        body,
    })
}

fn decode_stats_block(bytes: &[u8]) -> Result<(GlobalStats, IndexSettings)> {
    let mut r = ByteReader::new(bytes, Block::Stats);
    let section_count = r.varint_u32("section count")?;
    let doc_count = r.varint_u32("document count")?;
    let total_lens = PerField([r.varint()?, r.varint()?, r.varint()?]);
    let weights = FieldWeights {
        title: r.f64()?,
        heading: r.f64()?,
        body: r.f64()?,
    };
    let bm25 = Bm25Params {
        k1: r.f64()?,
        b: r.f64()?,
    };
    let n = r.count("stopword", 1)?;
    let stopwords = (0..n).map(|_| r.string()).collect::<Result<BTreeSet<_>>>()?;
    // trailing stats fields belong to a newer minor version

    let finite = [weights.title, weights.heading, weights.body, bm25.k1, bm25.b]
        .iter()
        .all(|v| v.is_finite());
    if !finite {
        return Err(r.corrupt("non-finite scoring parameter"));
    }

    Ok((
        GlobalStats {
            section_count,
            doc_count,
            total_lens,
        },
        IndexSettings {
            weights,
            bm25,
            stopwords: Arc::new(stopwords),
        },
    ))
}

/// Stats must be the exact sums over the section table.
fn check_stats(stats: &GlobalStats, sections: &[SectionMeta]) -> Result<()> {
    let mut expected = GlobalStats {
        section_count: sections.len() as u32,
        ..GlobalStats::default()
    };
    let mut urls = BTreeSet::new();
    for meta in sections {
        urls.insert(meta.url.as_str());
        for (total, len) in expected.total_lens.0.iter_mut().zip(meta.field_lens.0) {
            *total += len as u64;
        }
    }
    expected.doc_count = urls.len() as u32;
    if *stats != expected {
        return Err(Error::corrupt(
            Block::Stats,
            format!("totals {:?} disagree with section table {:?}", stats, expected),
        ));
    }
    Ok(())
}
