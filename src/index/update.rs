// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Incremental updates: patch one page without a full rebuild.
//!
//! The old sections of a page are found by id, their postings removed (the
//! postings are recomputed from the stored section text, which is exactly what
//! the builder indexed), then the new sections are analyzed and inserted.
//! Sections whose metadata didn't change are left alone, so their postings are
//! never touched.
//!
//! These methods mutate in place. Atomicity comes from the caller working on a
//! private clone of the published snapshot (see `engine::IndexWriter`).

use std::collections::BTreeSet;

use super::builder::{add_lens, sub_lens};
use super::{analyze_section, InvertedIndex};
use crate::error::{Error, Result};
use crate::types::{Document, SectionId, SectionMeta};

/// What an update did, for logging and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub removed: usize,
    pub inserted: usize,
    pub unchanged: usize,
}

impl UpdateSummary {
    pub fn merge(&mut self, other: UpdateSummary) {
        self.removed += other.removed;
        self.inserted += other.inserted;
        self.unchanged += other.unchanged;
    }
}

impl InvertedIndex {
    /// Replace a page's sections with the document's current content.
    ///
    /// A page the index hasn't seen is inserted. A document with no sections
    /// removes the page.
    pub fn update_document(&mut self, doc: &Document) -> Result<UpdateSummary> {
        let mut incoming: Vec<SectionMeta> = doc
            .sections
            .iter()
            .enumerate()
            .map(|(i, section)| SectionMeta::from_section(doc, i, section))
            .collect();
        let mut seen = BTreeSet::new();
        for meta in &incoming {
            if !seen.insert(&meta.id) {
                return Err(Error::DuplicateSection(meta.id.to_string()));
            }
        }

        let had_document = self.has_document(&doc.url);
        let tokenizer = self.tokenizer();
        let mut summary = UpdateSummary::default();

        let incoming_ids: BTreeSet<SectionId> = incoming.iter().map(|m| m.id.clone()).collect();
        for id in self.document_sections(&doc.url) {
            if !incoming_ids.contains(&id) {
                self.remove_section(&id);
                summary.removed += 1;
            }
        }

        for meta in incoming.iter_mut() {
            let analysis = analyze_section(&tokenizer, meta);
            meta.field_lens = analysis.lens;
            if self.sections.get(&meta.id) == Some(&*meta) {
                summary.unchanged += 1;
                continue;
            }
            if self.sections.contains_key(&meta.id) {
                self.remove_section(&meta.id);
                summary.removed += 1;
            }

            let id = meta.id.clone();
            add_lens(&mut self.stats, meta);
            for (term, posting) in analysis.into_postings(&id) {
                let list = self.terms.entry(term).or_default();
                match list.binary_search_by(|p| p.section.cmp(&id)) {
                    Ok(i) => list[i] = posting,
                    Err(i) => list.insert(i, posting),
                }
            }
            self.sections.insert(id, meta.clone());
            summary.inserted += 1;
        }

        let has_document = !incoming.is_empty();
        match (had_document, has_document) {
            (false, true) => self.stats.doc_count += 1,
            (true, false) => self.stats.doc_count = self.stats.doc_count.saturating_sub(1),
            _ => {}
        }

        tracing::debug!(
            url = %doc.url,
            removed = summary.removed,
            inserted = summary.inserted,
            unchanged = summary.unchanged,
            "updated document"
        );
        Ok(summary)
    }

    /// Drop every section of the page at `url`. Unknown pages are a no-op.
    pub fn remove_document(&mut self, url: &str) -> UpdateSummary {
        let ids = self.document_sections(url);
        if !ids.is_empty() {
            self.stats.doc_count = self.stats.doc_count.saturating_sub(1);
        }
        for id in &ids {
            self.remove_section(id);
        }
        tracing::debug!(url, removed = ids.len(), "removed document");
        UpdateSummary {
            removed: ids.len(),
            ..UpdateSummary::default()
        }
    }

    /// Remove one section: its postings, its stats contribution, its metadata.
    fn remove_section(&mut self, id: &SectionId) {
        let Some(meta) = self.sections.remove(id) else {
            return;
        };
        let analysis = analyze_section(&self.tokenizer(), &meta);
        for term in analysis.terms.keys() {
            let Some(list) = self.terms.get_mut(term) else {
                continue;
            };
            if let Ok(i) = list.binary_search_by(|p| p.section.cmp(id)) {
                list.remove(i);
            }
            if list.is_empty() {
                self.terms.remove(term);
            }
        }
        sub_lens(&mut self.stats, &meta);
    }
}
