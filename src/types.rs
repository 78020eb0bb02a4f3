// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a search index.
//!
//! Documents, sections, postings and the metadata that travels with them.
//! Everything the index stores is keyed by `SectionId`, which is derived from
//! the page URL and the heading anchor. That makes it a stable identity: the
//! same heading on the same page gets the same id no matter what order the
//! build visited pages in.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **PostingList**: sorted strictly ascending by `SectionId`. Intersection
//!   is a sorted merge, so one out-of-order entry silently drops results.
//!
//! - **Posting.positions**: sorted strictly ascending. Phrase checks binary
//!   search them.
//!
//! - **GlobalStats**: `section_count` and `total_lens` are the exact sums over
//!   the section table. They are integers so an incrementally patched index
//!   and a fresh build agree to the bit.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Stable section identity: `"{url}#{anchor}"`.
///
/// Cheap to clone (shared string), ordered by codepoint, which is also the
/// order postings lists are sorted in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionId(Arc<str>);

impl SectionId {
    pub fn new(url: &str, anchor: &str) -> Self {
        SectionId(Arc::from(format!("{}#{}", url, anchor)))
    }

    /// Wrap an already-formatted id (used when decoding artifacts).
    pub fn from_raw(raw: &str) -> Self {
        SectionId(Arc::from(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for SectionId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SectionId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(SectionId::from_raw(&raw))
    }
}

// =============================================================================
// FIELDS
// =============================================================================

/// Which part of a section a token came from.
///
/// Title is the section's own heading, Heading is the breadcrumb of enclosing
/// headings (page title first), Body is the text under the heading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Title,
    Heading,
    Body,
}

impl FieldType {
    pub const ALL: [FieldType; 3] = [FieldType::Title, FieldType::Heading, FieldType::Body];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            FieldType::Title => 0,
            FieldType::Heading => 1,
            FieldType::Body => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Title => "title",
            FieldType::Heading => "heading",
            FieldType::Body => "body",
        }
    }
}

/// One counter per field, indexed by `FieldType::index()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerField<T>(pub [T; 3]);

impl<T: Copy> PerField<T> {
    #[inline]
    pub fn get(&self, field: FieldType) -> T {
        self.0[field.index()]
    }
}

impl<T> PerField<T> {
    #[inline]
    pub fn get_mut(&mut self, field: FieldType) -> &mut T {
        &mut self.0[field.index()]
    }
}

/// Term frequency per field within one section.
pub type FieldFreqs = PerField<u32>;

/// Token count per field within one section.
pub type FieldLengths = PerField<u32>;

// =============================================================================
// POSTINGS
// =============================================================================

/// Occurrences of one term in one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub section: SectionId,
    pub freqs: FieldFreqs,
    /// Section-relative token positions, strictly ascending.
    pub positions: Vec<u32>,
}

impl Posting {
    pub fn total_freq(&self) -> u32 {
        self.freqs.0.iter().sum()
    }
}

/// Postings for one term, sorted ascending by section id.
pub type PostingList = Vec<Posting>;

// =============================================================================
// DOCUMENTS
// =============================================================================

/// A page split into sections, ready for indexing.
///
/// Produced by the extractor from a rendered page. `order` is the page's
/// position in site navigation and breaks score ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub url: String,
    pub locale: String,
    pub title: String,
    pub order: u32,
    pub sections: Vec<Section>,
}

/// An addressable heading plus the text beneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub anchor: String,
    /// 0 for the lead section before the first heading, else 1-6.
    pub level: u8,
    pub heading: String,
    /// Enclosing heading texts, outermost first (page title leads).
    pub breadcrumb: Vec<String>,
    pub body: String,
    /// Byte range of this section in the rendered source.
    pub source_range: Range<usize>,
}

/// Everything the query side needs to know about a section.
///
/// Stored in the artifact's section block, one record per section, in
/// `SectionId` order.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionMeta {
    pub id: SectionId,
    pub url: String,
    pub anchor: String,
    pub heading: String,
    pub doc_title: String,
    pub breadcrumb: Vec<String>,
    pub level: u8,
    pub locale: String,
    pub doc_order: u32,
    /// Index of the section within its document.
    pub position: u32,
    pub field_lens: FieldLengths,
    pub source_range: Range<usize>,
    pub body: String,
}

impl SectionMeta {
    pub fn from_section(doc: &Document, position: usize, section: &Section) -> Self {
        Self {
            id: section.id.clone(),
            url: doc.url.clone(),
            anchor: section.anchor.clone(),
            heading: section.heading.clone(),
            doc_title: doc.title.clone(),
            breadcrumb: section.breadcrumb.clone(),
            level: section.level,
            locale: doc.locale.clone(),
            doc_order: doc.order,
            position: position as u32,
            field_lens: FieldLengths::default(),
            source_range: section.source_range.clone(),
            body: section.body.clone(),
        }
    }

    /// Navigation order key: earlier pages first, then earlier sections.
    #[inline]
    pub fn nav_key(&self) -> (u32, u32) {
        (self.doc_order, self.position)
    }
}

/// Corpus-wide numbers BM25 needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalStats {
    pub section_count: u32,
    pub doc_count: u32,
    pub total_lens: PerField<u64>,
}

impl GlobalStats {
    /// Average token count of a field over all sections (0 when empty).
    pub fn avg_len(&self, field: FieldType) -> f64 {
        if self.section_count == 0 {
            0.0
        } else {
            self.total_lens.get(field) as f64 / self.section_count as f64
        }
    }
}
