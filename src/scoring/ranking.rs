// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: how scored sections get sorted.
//!
//! Score first, higher wins. Equal scores fall back to navigation order: the
//! page that comes first in the sidebar wins, then the section that comes
//! first on its page. Section id is the last resort so the order is total and
//! never depends on hash or thread scheduling.

use std::cmp::Ordering;

use crate::types::SectionMeta;

/// A section with its combined score.
#[derive(Debug, Clone)]
pub struct Ranked<'a> {
    pub meta: &'a SectionMeta,
    pub score: f64,
    pub matched_terms: Vec<String>,
}

/// Compare two ranked sections.
///
/// Sort order:
/// 1. **Score** - descending
/// 2. **Navigation order** - (document order, section position), ascending
/// 3. **Section id** - ascending, for absolute determinism
pub fn compare_ranked(a: &Ranked<'_>, b: &Ranked<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.meta.nav_key().cmp(&b.meta.nav_key()))
        .then_with(|| a.meta.id.cmp(&b.meta.id))
}

/// Keep the best `k` in rank order.
pub fn top_k(mut ranked: Vec<Ranked<'_>>, k: usize) -> Vec<Ranked<'_>> {
    if k == 0 {
        return Vec::new();
    }
    if ranked.len() > k {
        ranked.select_nth_unstable_by(k - 1, compare_ranked);
        ranked.truncate(k);
    }
    ranked.sort_by(compare_ranked);
    ranked
}
