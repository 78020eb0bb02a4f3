// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query execution: parse, retrieve, score, rank, snippet.
//!
//! Everything here works against one `InvertedIndex` snapshot borrowed for
//! the duration of the query. The engine handle decides which snapshot that
//! is; this module never sees the swap.

pub mod cancel;
pub mod query;
pub mod retrieve;
pub mod snippet;

use std::collections::BTreeSet;

use serde::Serialize;

pub use cancel::{QueryGenerations, QueryHandle};
pub use query::{parse_query, ParsedQuery, Phrase, QueryTerm};
pub use snippet::Snippet;

use crate::config::QueryOptions;
use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::scoring::{top_k, Ranked, Scorer};
use crate::tokenize::Locale;
use crate::types::SectionId;

/// One ranked section, ready to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultHit {
    pub section_id: SectionId,
    pub score: f64,
    pub matched_terms: Vec<String>,
    pub snippet: Snippet,
    /// The section's heading.
    pub title: String,
    pub doc_title: String,
    pub url: String,
    pub anchor: String,
    pub breadcrumb: Vec<String>,
}

impl ResultHit {
    /// Link target: `url#anchor`, or the bare url for a lead section.
    pub fn href(&self) -> String {
        if self.anchor.is_empty() {
            self.url.clone()
        } else {
            format!("{}#{}", self.url, self.anchor)
        }
    }
}

/// Outcome of one query.
///
/// Never an error: a cancelled query comes back with `cancelled` set, and an
/// internal failure with an empty hit list and a `diagnostic`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub hits: Vec<ResultHit>,
    pub cancelled: bool,
    /// The query was cut to the configured maximum length.
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl SearchResponse {
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Run a query to completion or cancellation.
///
/// Returns `Err(Error::Cancelled)` when `handle` is superseded mid-query, and
/// `Err(Error::Internal)` if the snapshot is inconsistent.
pub fn execute(
    index: &InvertedIndex,
    raw: &str,
    locale: Option<&str>,
    options: &QueryOptions,
    handle: &QueryHandle,
) -> Result<SearchResponse> {
    let locale = Locale::from_hint(locale);
    let tokenizer = index.tokenizer();
    let parsed = parse_query(raw, &tokenizer, locale, options.max_query_chars);
    if parsed.is_empty() {
        return Ok(SearchResponse {
            truncated: parsed.truncated,
            ..SearchResponse::empty(parsed.text)
        });
    }

    let groups = retrieve::resolve_groups(index, &parsed);
    let candidates = retrieve::intersect(&groups, handle)?;
    let scorer = Scorer::new(index.stats(), index.settings());
    let idfs: Vec<Vec<f64>> = groups
        .iter()
        .map(|g| g.alternatives.iter().map(|(_, list)| scorer.idf(list.len())).collect())
        .collect();

    let mut ranked = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        if handle.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if !parsed.phrases.iter().all(|p| retrieve::matches_phrase(candidate, p)) {
            continue;
        }
        let meta = index.section(candidate.section).ok_or_else(|| {
            Error::Internal(format!("posting for unknown section {}", candidate.section))
        })?;

        // each required term contributes its best-scoring dictionary match
        let mut score = 0.0;
        for (g, hits) in candidate.hits.iter().enumerate() {
            let best = hits
                .iter()
                .map(|(term, posting)| {
                    let alt = groups[g]
                        .alternatives
                        .iter()
                        .position(|(t, _)| t == term)
                        .unwrap_or(0);
                    scorer.term_score(posting, meta, idfs[g][alt])
                })
                .fold(0.0, f64::max);
            score += best;
        }

        ranked.push(Ranked {
            meta,
            score,
            matched_terms: candidate.matched_terms(),
        });
    }

    let total = ranked.len();
    let best = top_k(ranked, options.top_k);

    let mut hits = Vec::with_capacity(best.len());
    for r in best {
        if handle.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let terms: BTreeSet<String> = r.matched_terms.iter().cloned().collect();
        let snippet = snippet::make_snippet(
            &r.meta.body,
            &terms,
            &tokenizer,
            Locale::from_hint(Some(&r.meta.locale)),
            options.snippet_window,
        );
        hits.push(ResultHit {
            section_id: r.meta.id.clone(),
            score: r.score,
            matched_terms: r.matched_terms,
            snippet,
            title: r.meta.heading.clone(),
            doc_title: r.meta.doc_title.clone(),
            url: r.meta.url.clone(),
            anchor: r.meta.anchor.clone(),
            breadcrumb: r.meta.breadcrumb.clone(),
        });
    }

    tracing::debug!(
        query = %parsed.text,
        terms = parsed.terms.len(),
        phrases = parsed.phrases.len(),
        candidates = candidates.len(),
        matched = total,
        returned = hits.len(),
        "executed query"
    );

    Ok(SearchResponse {
        query: parsed.text,
        hits,
        cancelled: false,
        truncated: parsed.truncated,
        diagnostic: None,
    })
}
