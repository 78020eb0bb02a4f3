// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Full index build: documents in, snapshot out.
//!
//! Map-reduce like the rest of the pipeline. Sections are analyzed
//! independently (in parallel with the `parallel` feature), then merged in
//! section-id order. Merging in id order means every posting list comes out
//! sorted without a sort pass, and the result doesn't depend on the order
//! documents were handed in.

use std::collections::BTreeSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{analyze_section, InvertedIndex, SectionTerms};
use crate::config::IndexSettings;
use crate::error::{Error, Result};
use crate::types::{Document, GlobalStats, SectionMeta};

/// Configures and runs a full build.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    settings: IndexSettings,
    locale: String,
    built_at: u64,
}

impl IndexBuilder {
    pub fn new(settings: IndexSettings) -> Self {
        Self {
            settings,
            locale: "en".to_string(),
            built_at: 0,
        }
    }

    /// Site default locale recorded in the artifact header.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Build timestamp recorded in the artifact header. Never read from the
    /// clock here; identical inputs must give identical artifacts.
    pub fn built_at(mut self, built_at: u64) -> Self {
        self.built_at = built_at;
        self
    }

    pub fn build(self, documents: &[Document]) -> Result<InvertedIndex> {
        let metas = collect_sections(documents)?;
        let tokenizer = crate::tokenize::Tokenizer::new(self.settings.stopwords.clone());

        #[cfg(feature = "parallel")]
        let analyzed: Vec<(SectionMeta, SectionTerms)> = metas
            .into_par_iter()
            .map(|meta| {
                let terms = analyze_section(&tokenizer, &meta);
                (meta, terms)
            })
            .collect();

        #[cfg(not(feature = "parallel"))]
        let analyzed: Vec<(SectionMeta, SectionTerms)> = metas
            .into_iter()
            .map(|meta| {
                let terms = analyze_section(&tokenizer, &meta);
                (meta, terms)
            })
            .collect();

        let mut index = InvertedIndex::empty(self.settings, self.locale, self.built_at);
        let mut urls = BTreeSet::new();
        for (mut meta, analysis) in analyzed {
            meta.field_lens = analysis.lens;
            urls.insert(meta.url.clone());
            add_lens(&mut index.stats, &meta);
            let id = meta.id.clone();
            for (term, posting) in analysis.into_postings(&id) {
                index.terms.entry(term).or_default().push(posting);
            }
            index.sections.insert(id, meta);
        }
        index.stats.doc_count = urls.len() as u32;

        tracing::info!(
            documents = documents.len(),
            sections = index.sections.len(),
            terms = index.terms.len(),
            "built index"
        );
        Ok(index)
    }
}

/// Build an index from documents with the given settings.
pub fn build_index(
    documents: &[Document],
    settings: IndexSettings,
    built_at: u64,
) -> Result<InvertedIndex> {
    IndexBuilder::new(settings).built_at(built_at).build(documents)
}

/// Flatten documents into section metadata sorted by id, rejecting
/// duplicate pages and duplicate section ids.
fn collect_sections(documents: &[Document]) -> Result<Vec<SectionMeta>> {
    let mut urls = BTreeSet::new();
    for doc in documents {
        if !urls.insert(doc.url.as_str()) {
            return Err(Error::DuplicateDocument(doc.url.clone()));
        }
    }

    let mut metas: Vec<SectionMeta> = documents
        .iter()
        .flat_map(|doc| {
            doc.sections
                .iter()
                .enumerate()
                .map(move |(i, section)| SectionMeta::from_section(doc, i, section))
        })
        .collect();
    metas.sort_by(|a, b| a.id.cmp(&b.id));
    if let Some(pair) = metas.windows(2).find(|w| w[0].id == w[1].id) {
        return Err(Error::DuplicateSection(pair[0].id.to_string()));
    }
    Ok(metas)
}

pub(crate) fn add_lens(stats: &mut GlobalStats, meta: &SectionMeta) {
    stats.section_count += 1;
    for (total, len) in stats.total_lens.0.iter_mut().zip(meta.field_lens.0) {
        *total += len as u64;
    }
}

pub(crate) fn sub_lens(stats: &mut GlobalStats, meta: &SectionMeta) {
    stats.section_count = stats.section_count.saturating_sub(1);
    for (total, len) in stats.total_lens.0.iter_mut().zip(meta.field_lens.0) {
        *total = total.saturating_sub(len as u64);
    }
}
