// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Page loading and extraction.
//!
//! Reading and parsing one JSON file per page is the slow part of a build on
//! a big site, and it's embarrassingly parallel: `par_iter()` over the
//! manifest's file list. Each page's navigation order is its position in that
//! list, so the result doesn't depend on which thread finished first.

use std::fs;
use std::path::Path;

#[cfg(feature = "parallel")]
use indicatif::ProgressBar;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicUsize, Ordering};

use super::document::Page;
use super::extract::extract_document;
use super::manifest::InputManifest;
use crate::error::{Error, Result};
use crate::types::Document;

/// Read one page file and split it into sections.
pub fn load_page(path: &Path, order: u32, default_locale: &str) -> Result<Document> {
    let content = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let page: Page = serde_json::from_str(&content).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(extract_document(&page, order, default_locale))
}

/// Load every page listed in the manifest. The first failure aborts the build.
#[cfg(feature = "parallel")]
pub fn load_documents(input_dir: &Path, manifest: &InputManifest) -> Result<Vec<Document>> {
    manifest
        .documents
        .par_iter()
        .enumerate()
        .map(|(order, file)| load_page(&input_dir.join(file), order as u32, &manifest.locale))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub fn load_documents(input_dir: &Path, manifest: &InputManifest) -> Result<Vec<Document>> {
    manifest
        .documents
        .iter()
        .enumerate()
        .map(|(order, file)| load_page(&input_dir.join(file), order as u32, &manifest.locale))
        .collect()
}

/// Load every page with progress reporting.
#[cfg(feature = "parallel")]
pub fn load_documents_with_progress(
    input_dir: &Path,
    manifest: &InputManifest,
    progress: &ProgressBar,
) -> Result<Vec<Document>> {
    let counter = AtomicUsize::new(0);
    let total = manifest.documents.len();

    manifest
        .documents
        .par_iter()
        .enumerate()
        .map(|(order, file)| {
            let doc = load_page(&input_dir.join(file), order as u32, &manifest.locale)?;

            let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
            progress.set_position(count as u64);
            if count % 10 == 0 || count == total {
                progress.set_message(format!("{}/{}", count, total));
            }

            Ok(doc)
        })
        .collect()
}

/// Non-parallel fallback (no progress).
#[cfg(not(feature = "parallel"))]
pub fn load_documents_with_progress(input_dir: &Path, manifest: &InputManifest) -> Result<Vec<Document>> {
    load_documents(input_dir, manifest)
}
