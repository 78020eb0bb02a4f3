// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The in-memory inverted index.
//!
//! `InvertedIndex` is one immutable-once-published snapshot: term dictionary,
//! posting lists, section table and corpus stats. The builder produces one
//! from documents, the binary codec round-trips it, and the updater patches a
//! private copy before the engine swaps it in.
//!
//! Builder and updater share `analyze_section`, so a section indexed by either
//! path yields exactly the same postings. That is the whole trick behind
//! "incremental update equals full rebuild".
//!
//! # Invariants
//!
//! 1. **SORTED_POSTINGS**: every posting list is strictly ascending by section id
//! 2. **NON_EMPTY**: every dictionary term has at least one posting
//! 3. **KNOWN_SECTIONS**: every posting refers to a section in the table
//! 4. **EXACT_STATS**: `stats` equals the sums over the section table

pub mod builder;
pub mod update;

use std::collections::BTreeMap;

use crate::config::IndexSettings;
use crate::tokenize::{Locale, Tokenizer};
use crate::types::{
    FieldFreqs, FieldLengths, FieldType, GlobalStats, Posting, PostingList, SectionId, SectionMeta,
};

pub use builder::{build_index, IndexBuilder};
pub use update::UpdateSummary;

/// A complete search index snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct InvertedIndex {
    pub(crate) settings: IndexSettings,
    pub(crate) locale: String,
    pub(crate) built_at: u64,
    pub(crate) sections: BTreeMap<SectionId, SectionMeta>,
    pub(crate) terms: BTreeMap<String, PostingList>,
    pub(crate) stats: GlobalStats,
}

impl InvertedIndex {
    /// An index with no sections.
    pub fn empty(settings: IndexSettings, locale: impl Into<String>, built_at: u64) -> Self {
        Self {
            settings,
            locale: locale.into(),
            built_at,
            sections: BTreeMap::new(),
            terms: BTreeMap::new(),
            stats: GlobalStats::default(),
        }
    }

    pub fn settings(&self) -> &IndexSettings {
        &self.settings
    }

    /// Default locale of the site this index was built for.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Build timestamp (seconds since the epoch, as supplied to the builder).
    pub fn built_at(&self) -> u64 {
        self.built_at
    }

    pub fn set_built_at(&mut self, built_at: u64) {
        self.built_at = built_at;
    }

    pub fn stats(&self) -> &GlobalStats {
        &self.stats
    }

    /// Tokenizer configured exactly like the one that built this index.
    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(self.settings.stopwords.clone())
    }

    pub fn section(&self, id: &SectionId) -> Option<&SectionMeta> {
        self.sections.get(id)
    }

    /// Sections in id order.
    pub fn sections(&self) -> impl Iterator<Item = &SectionMeta> {
        self.sections.values()
    }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    /// Dictionary terms in sorted order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of sections containing `term`.
    pub fn doc_freq(&self, term: &str) -> usize {
        self.terms.get(term).map_or(0, Vec::len)
    }

    /// Ids of every section belonging to the page at `url`.
    pub fn document_sections(&self, url: &str) -> Vec<SectionId> {
        let prefix = format!("{}#", url);
        self.sections
            .range(SectionId::from_raw(&prefix)..)
            .take_while(|(id, _)| id.as_str().starts_with(&prefix))
            .filter(|(_, meta)| meta.url == url)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn has_document(&self, url: &str) -> bool {
        !self.document_sections(url).is_empty()
    }
}

// =============================================================================
// SECTION ANALYSIS (shared by builder and updater)
// =============================================================================

/// Terms of one section with per-field frequencies and positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SectionTerms {
    pub lens: FieldLengths,
    pub terms: BTreeMap<String, TermOccurrences>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TermOccurrences {
    pub freqs: FieldFreqs,
    pub positions: Vec<u32>,
}

impl SectionTerms {
    pub fn into_postings(self, id: &SectionId) -> impl Iterator<Item = (String, Posting)> + '_ {
        self.terms.into_iter().map(move |(term, occ)| {
            (
                term,
                Posting {
                    section: id.clone(),
                    freqs: occ.freqs,
                    positions: occ.positions,
                },
            )
        })
    }
}

/// Tokenize the title, heading and body fields of a section.
///
/// Positions continue across fields with a one-position gap, so a phrase can
/// never match across a field boundary.
pub(crate) fn analyze_section(tokenizer: &Tokenizer, meta: &SectionMeta) -> SectionTerms {
    let locale = Locale::from_hint(Some(&meta.locale));
    let breadcrumb = meta.breadcrumb.join("\n");
    let fields = [
        (FieldType::Title, meta.heading.as_str()),
        (FieldType::Heading, breadcrumb.as_str()),
        (FieldType::Body, meta.body.as_str()),
    ];

    let mut out = SectionTerms::default();
    let mut tokens = Vec::new();
    let mut next = 0u32;
    for (field, text) in fields {
        tokens.clear();
        next = tokenizer.tokenize_into(text, locale, next, &mut tokens) + 1;
        *out.lens.get_mut(field) = tokens.len() as u32;
        for token in tokens.drain(..) {
            let occ = out.terms.entry(token.term).or_default();
            *occ.freqs.get_mut(field) += 1;
            occ.positions.push(token.position);
        }
    }
    out
}
