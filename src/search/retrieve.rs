// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Candidate retrieval: sorted-merge intersection of posting lists.
//!
//! Each required query term resolves to a group of dictionary terms. Usually
//! that's just the term itself; a lone CJK character expands to every bigram
//! containing it. A section is a candidate when every group has a posting for
//! it.
//!
//! Posting lists are sorted by section id, so intersection walks the smallest
//! group and advances one cursor per list in the other groups. Nothing is ever
//! looked up twice, and cancellation is polled every `CANCEL_CHECK_INTERVAL`
//! postings.

use super::cancel::QueryHandle;
use super::query::{ParsedQuery, Phrase};
use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::types::{Posting, SectionId};

/// Postings visited between cancellation checks.
pub const CANCEL_CHECK_INTERVAL: usize = 256;

/// Dictionary terms that satisfy one required query term.
#[derive(Debug, Clone)]
pub struct TermGroup<'a> {
    pub query_term: String,
    pub alternatives: Vec<(&'a str, &'a [Posting])>,
}

impl TermGroup<'_> {
    fn size(&self) -> usize {
        self.alternatives.iter().map(|(_, list)| list.len()).sum()
    }
}

/// A section matching every group, with the postings that matched.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub section: &'a SectionId,
    /// One entry per group (query term order), each non-empty.
    pub hits: Vec<Vec<(&'a str, &'a Posting)>>,
}

impl<'a> Candidate<'a> {
    /// Posting for an exact dictionary term, if it matched here.
    pub fn posting(&self, term: &str) -> Option<&'a Posting> {
        self.hits
            .iter()
            .flatten()
            .find(|(t, _)| *t == term)
            .map(|(_, p)| *p)
    }

    /// Matched dictionary terms, deduplicated, in query order.
    pub fn matched_terms(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for (term, _) in self.hits.iter().flatten() {
            if !out.iter().any(|t| t == term) {
                out.push(term.to_string());
            }
        }
        out
    }
}

/// Resolve each query term against the dictionary.
pub fn resolve_groups<'a>(index: &'a InvertedIndex, query: &ParsedQuery) -> Vec<TermGroup<'a>> {
    query
        .terms
        .iter()
        .map(|qt| {
            let mut alternatives = Vec::new();
            if let Some((term, list)) = index.terms.get_key_value(&qt.term) {
                alternatives.push((term.as_str(), list.as_slice()));
            }
            if qt.is_cjk_unigram() {
                if let Some(c) = qt.term.chars().next() {
                    alternatives.extend(
                        index
                            .terms
                            .iter()
                            .filter(|(term, _)| term.len() > qt.term.len() && term.contains(c))
                            .map(|(term, list)| (term.as_str(), list.as_slice())),
                    );
                }
            }
            TermGroup {
                query_term: qt.term.clone(),
                alternatives,
            }
        })
        .collect()
}

/// Intersect all groups. Returns candidates in section-id order.
pub fn intersect<'a>(groups: &[TermGroup<'a>], handle: &QueryHandle) -> Result<Vec<Candidate<'a>>> {
    if groups.is_empty() || groups.iter().any(|g| g.alternatives.is_empty()) {
        return Ok(Vec::new());
    }

    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by_key(|&g| groups[g].size());
    let driver = &groups[order[0]];

    let mut driver_ids: Vec<&'a SectionId> = driver
        .alternatives
        .iter()
        .flat_map(|&(_, list)| list.iter().map(|p| &p.section))
        .collect();
    if driver.alternatives.len() > 1 {
        driver_ids.sort();
        driver_ids.dedup();
    }

    let mut cursors: Vec<Vec<usize>> = groups.iter().map(|g| vec![0; g.alternatives.len()]).collect();
    let mut visited = 0usize;
    let mut next_check = 0usize;
    let mut out = Vec::new();

    'candidates: for id in driver_ids {
        if visited >= next_check {
            if handle.is_cancelled() {
                return Err(Error::Cancelled);
            }
            next_check = visited + CANCEL_CHECK_INTERVAL;
        }

        let mut hits: Vec<Vec<(&'a str, &'a Posting)>> = vec![Vec::new(); groups.len()];
        for &g in &order {
            for (alt, &(term, list)) in groups[g].alternatives.iter().enumerate() {
                let cursor = &mut cursors[g][alt];
                while *cursor < list.len() && list[*cursor].section < *id {
                    *cursor += 1;
                    visited += 1;
                }
                if let Some(posting) = list.get(*cursor).filter(|p| p.section == *id) {
                    hits[g].push((term, posting));
                }
            }
            if hits[g].is_empty() {
                continue 'candidates;
            }
        }
        visited += 1;
        out.push(Candidate { section: id, hits });
    }
    Ok(out)
}

/// Whether the phrase's tokens appear at their relative offsets.
pub fn matches_phrase(candidate: &Candidate<'_>, phrase: &Phrase) -> bool {
    let mut lists = Vec::with_capacity(phrase.terms.len());
    for (term, offset) in &phrase.terms {
        match candidate.posting(term) {
            Some(posting) => lists.push((&posting.positions, *offset)),
            None => return false,
        }
    }
    let Some(((first, _), rest)) = lists.split_first() else {
        return true;
    };
    first.iter().any(|&start| {
        rest.iter()
            .all(|(positions, offset)| positions.binary_search(&(start + offset)).is_ok())
    })
}
