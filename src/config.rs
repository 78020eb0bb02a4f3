// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tunables for indexing and querying.
//!
//! `SearchConfig` is what users write in the manifest's `search` object. It
//! splits into two halves: `IndexSettings` (baked into the artifact, since the
//! query side must tokenize and score exactly like the builder did) and
//! `QueryOptions` (runtime-only knobs like top-K and snippet width).
//!
//! Translations are carried alongside but never read by indexing or ranking.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tokenize::stopwords::DEFAULT_STOPWORDS;
use crate::types::FieldType;

/// Locale → key → UI string. Passed through to the UI untouched.
pub type Translations = BTreeMap<String, BTreeMap<String, String>>;

/// Relative importance of each field in the combined score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldWeights {
    pub title: f64,
    pub heading: f64,
    pub body: f64,
}

impl FieldWeights {
    pub fn get(&self, field: FieldType) -> f64 {
        match field {
            FieldType::Title => self.title,
            FieldType::Heading => self.heading,
            FieldType::Body => self.body,
        }
    }
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 3.0,
            heading: 2.0,
            body: 1.0,
        }
    }
}

/// BM25 saturation (`k1`) and length normalization (`b`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

/// User-facing configuration, deserialized from the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    pub field_weights: FieldWeights,
    pub bm25: Bm25Params,
    pub stopwords: Vec<String>,
    pub top_k: usize,
    /// Snippet width in bytes of source text.
    pub snippet_window: usize,
    /// Queries longer than this (in chars) are truncated.
    pub max_query_chars: usize,
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            field_weights: FieldWeights::default(),
            bm25: Bm25Params::default(),
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            top_k: 20,
            snippet_window: 160,
            max_query_chars: 256,
            debounce_ms: 120,
        }
    }
}

impl SearchConfig {
    /// Reject configurations that would break the ranking contract.
    ///
    /// Field weights must satisfy title > heading > body > 0, and the BM25
    /// constants must be in their meaningful ranges.
    pub fn validate(&self) -> Result<()> {
        let w = &self.field_weights;
        if !(w.title > w.heading && w.heading > w.body && w.body > 0.0) {
            return Err(Error::Config(format!(
                "field weights must satisfy title > heading > body > 0 (got {} / {} / {})",
                w.title, w.heading, w.body
            )));
        }
        if !(self.bm25.k1 >= 0.0 && self.bm25.k1.is_finite()) {
            return Err(Error::Config(format!("bm25.k1 must be >= 0 (got {})", self.bm25.k1)));
        }
        if !(0.0..=1.0).contains(&self.bm25.b) {
            return Err(Error::Config(format!("bm25.b must be in [0, 1] (got {})", self.bm25.b)));
        }
        if self.top_k == 0 {
            return Err(Error::Config("topK must be at least 1".to_string()));
        }
        if self.max_query_chars == 0 {
            return Err(Error::Config("maxQueryChars must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn index_settings(&self) -> IndexSettings {
        IndexSettings {
            weights: self.field_weights,
            bm25: self.bm25,
            stopwords: Arc::new(
                self.stopwords
                    .iter()
                    .map(|s| crate::utils::fold(s.trim()))
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
        }
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            top_k: self.top_k,
            snippet_window: self.snippet_window,
            max_query_chars: self.max_query_chars,
        }
    }
}

/// Settings that shape the index itself and travel inside the artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSettings {
    pub weights: FieldWeights,
    pub bm25: Bm25Params,
    pub stopwords: Arc<BTreeSet<String>>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        SearchConfig::default().index_settings()
    }
}

/// Runtime-only query knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub top_k: usize,
    pub snippet_window: usize,
    pub max_query_chars: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        SearchConfig::default().query_options()
    }
}
