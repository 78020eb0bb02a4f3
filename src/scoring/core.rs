// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind search ranking: BM25 per field, weighted and summed.
//!
//! Each field (title, heading, body) gets its own BM25 term-frequency
//! saturation and length normalization against that field's average length,
//! then the three are combined with the field weights and multiplied by the
//! term's IDF. That's BM25F without the shared saturation, which keeps a long
//! body from drowning out a short title.
//!
//! ```text
//! idf(t)       = ln(1 + (N - df + 0.5) / (df + 0.5))
//! bm25_f(t, s) = tf * (k1 + 1) / (tf + k1 * (1 - b + b * len_f / avg_f))
//! score(t, s)  = idf(t) * Σ_f weight_f * bm25_f(t, s)
//! ```
//!
//! # Key Invariant: More Field Matches Never Score Lower
//!
//! IDF is strictly positive (the `1 +` inside the log), every weight is
//! positive, and each field term is non-negative. So two sections with
//! identical bodies differ only in their title/heading terms, and the one that
//! also matches in its title scores strictly higher.

use crate::config::{Bm25Params, IndexSettings};
use crate::types::{FieldType, GlobalStats, Posting, SectionMeta};

/// Inverse document frequency over sections.
#[inline]
pub fn idf(section_count: u32, doc_freq: usize) -> f64 {
    let n = section_count as f64;
    let df = doc_freq as f64;
    (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
}

/// Saturated, length-normalized term frequency for one field.
#[inline]
pub fn field_bm25(tf: u32, len: u32, avg_len: f64, params: Bm25Params) -> f64 {
    if tf == 0 {
        return 0.0;
    }
    let tf = tf as f64;
    let norm = if avg_len > 0.0 {
        1.0 - params.b + params.b * (len as f64 / avg_len)
    } else {
        1.0
    };
    tf * (params.k1 + 1.0) / (tf + params.k1 * norm)
}

/// Scores postings against one snapshot's stats and settings.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    stats: &'a GlobalStats,
    settings: &'a IndexSettings,
    avg_lens: [f64; 3],
}

impl<'a> Scorer<'a> {
    pub fn new(stats: &'a GlobalStats, settings: &'a IndexSettings) -> Self {
        let avg_lens = FieldType::ALL.map(|f| stats.avg_len(f));
        Self {
            stats,
            settings,
            avg_lens,
        }
    }

    pub fn idf(&self, doc_freq: usize) -> f64 {
        idf(self.stats.section_count, doc_freq)
    }

    /// Contribution of one term to one section's score.
    pub fn term_score(&self, posting: &Posting, meta: &SectionMeta, idf: f64) -> f64 {
        let weighted: f64 = FieldType::ALL
            .iter()
            .map(|&field| {
                self.settings.weights.get(field)
                    * field_bm25(
                        posting.freqs.get(field),
                        meta.field_lens.get(field),
                        self.avg_lens[field.index()],
                        self.settings.bm25,
                    )
            })
            .sum();
        idf * weighted
    }
}
