// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for query parsing and execution.
//!
//! Throws arbitrary strings (emoji, RTL text, lone combining marks, unbalanced
//! quotes, megabyte-long input) at the query engine over a small bilingual
//! index. It must never panic, and every response must respect the ranking
//! and truncation contracts.

#![no_main]

use std::sync::OnceLock;

use docsift::config::QueryOptions;
use docsift::search::parse_query;
use docsift::testing::sample_index;
use docsift::{IndexHandle, Locale};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|query: &str| {
    static HANDLE: OnceLock<IndexHandle> = OnceLock::new();
    let handle = HANDLE.get_or_init(|| IndexHandle::new(sample_index(), QueryOptions::default()));
    let options = handle.options();

    let parsed = parse_query(query, &handle.snapshot().tokenizer(), Locale::Generic, options.max_query_chars);
    assert!(parsed.text.chars().count() <= options.max_query_chars);

    for locale in [None, Some("zh-CN"), Some("en")] {
        let response = handle.search(query, locale);

        // INVARIANT: searches never fail and never exceed top-K
        assert!(response.diagnostic.is_none());
        assert!(!response.cancelled);
        assert!(response.hits.len() <= options.top_k);

        // INVARIANT: scores descend and highlights stay inside the snippet
        for pair in response.hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for hit in &response.hits {
            for range in &hit.snippet.highlights {
                assert!(hit.snippet.text.get(range.clone()).is_some());
            }
        }
    }
});
