// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Incremental updates against a full rebuild.
//!
//! The fuzzer picks a page of the sample site and rewrites its sections with
//! arbitrary text. Patching the built index must produce exactly the index a
//! rebuild over the edited site produces.

#![no_main]

use arbitrary::Arbitrary;
use docsift::build_index;
use docsift::config::IndexSettings;
use docsift::testing::{make_section, sample_docs, SAMPLE_BUILT_AT};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Edit {
    page: u8,
    sections: Vec<(String, String)>,
}

fuzz_target!(|edit: Edit| {
    let docs = sample_docs();
    let target = edit.page as usize % docs.len();
    let url = docs[target].url.clone();

    let mut edited = docs[target].clone();
    edited.sections = edit
        .sections
        .iter()
        .take(8)
        .enumerate()
        .map(|(i, (heading, body))| make_section(&url, &format!("s{}", i), heading, body))
        .collect();

    let Ok(mut index) = build_index(&docs, IndexSettings::default(), SAMPLE_BUILT_AT) else {
        return;
    };
    index.update_document(&edited).expect("anchors are unique");

    let mut expected = docs;
    expected[target] = edited;
    let rebuilt = build_index(&expected, IndexSettings::default(), SAMPLE_BUILT_AT).expect("rebuild");
    assert_eq!(index, rebuilt);
});
