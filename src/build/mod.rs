// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk build pipeline: manifest + page JSON in, `.docsift` artifact out.
//!
//! ```text
//! input/manifest.json ─┐
//! input/*.json ────────┼─▶ load + extract (parallel) ─▶ IndexBuilder ─▶ encode ─▶ index-{crc}.docsift
//!                      └─▶ translations ─────────────────────────────────────────▶ translations.json
//! ```
//!
//! The artifact name carries its CRC32 so a changed index gets a new URL and
//! caches never serve a stale one.

pub mod document;
pub mod extract;
pub mod manifest;
pub mod parallel;

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::binary::{encode_index, Footer};
use crate::engine::{Change, IndexHandle};
use crate::error::{Error, Result};
use crate::index::{IndexBuilder, InvertedIndex, UpdateSummary};

pub use document::{Page, PageNode};
pub use extract::{extract_document, slugify};
pub use manifest::{InputManifest, MANIFEST_VERSION};
pub use parallel::{load_documents, load_page};

/// Artifact file extension.
pub const EXTENSION: &str = "docsift";

/// Build timestamp from `SOURCE_DATE_EPOCH`, or 0 so builds stay reproducible.
pub fn source_date_epoch() -> u64 {
    std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

/// What `run_build` wrote.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub index_path: PathBuf,
    pub translations_path: Option<PathBuf>,
    pub documents: usize,
    pub sections: usize,
    pub terms: usize,
    pub bytes: usize,
}

/// What `run_update` wrote.
#[derive(Debug, Clone)]
pub struct UpdateOutput {
    pub index_path: PathBuf,
    pub summary: UpdateSummary,
    pub sections: usize,
    pub bytes: usize,
}

#[cfg(feature = "parallel")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━╸")
}

pub fn read_manifest(input_dir: &Path) -> Result<InputManifest> {
    let path = input_dir.join("manifest.json");
    let content = fs::read_to_string(&path).map_err(|source| Error::Read {
        path: path.clone(),
        source,
    })?;
    let manifest: InputManifest =
        serde_json::from_str(&content).map_err(|source| Error::Json { path, source })?;
    if manifest.version == 0 || manifest.version > MANIFEST_VERSION {
        return Err(Error::Config(format!(
            "manifest version {} not supported (expected 1..={})",
            manifest.version, MANIFEST_VERSION
        )));
    }
    manifest.search.validate()?;
    Ok(manifest)
}

/// Load every page and build the in-memory index.
pub fn build_from_dir(input_dir: &Path, built_at: u64) -> Result<(InputManifest, InvertedIndex)> {
    let manifest = read_manifest(input_dir)?;

    #[cfg(feature = "parallel")]
    let documents = {
        let multi = MultiProgress::new();
        let load_pb = multi.add(ProgressBar::new(manifest.documents.len() as u64));
        load_pb.set_style(create_progress_style());
        load_pb.set_prefix("Loading");
        load_pb.set_message("pages...");
        let documents = parallel::load_documents_with_progress(input_dir, &manifest, &load_pb)?;
        load_pb.finish_with_message(format!("loaded {} pages", documents.len()));
        documents
    };
    #[cfg(not(feature = "parallel"))]
    let documents = parallel::load_documents_with_progress(input_dir, &manifest)?;

    let index = IndexBuilder::new(manifest.search.index_settings())
        .locale(manifest.locale.clone())
        .built_at(built_at)
        .build(&documents)?;
    Ok((manifest, index))
}

/// Write artifact bytes as `index-{crc32}.docsift` in `output_dir`.
pub fn write_artifact(output_dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|source| Error::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let hash = format!("{:08x}", Footer::compute_crc32(bytes));
    let path = output_dir.join(format!("index-{}.{}", hash, EXTENSION));
    fs::write(&path, bytes).map_err(|source| Error::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

pub fn run_build(input_dir: &Path, output_dir: &Path, built_at: u64) -> Result<BuildOutput> {
    let (manifest, index) = build_from_dir(input_dir, built_at)?;
    let bytes = encode_index(&index);
    let index_path = write_artifact(output_dir, &bytes)?;

    let translations_path = if manifest.translations.is_empty() {
        None
    } else {
        let path = output_dir.join("translations.json");
        let json = serde_json::to_vec_pretty(&manifest.translations).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;
        Some(path)
    };

    tracing::info!(
        path = %index_path.display(),
        documents = index.stats().doc_count,
        sections = index.section_count(),
        terms = index.term_count(),
        bytes = bytes.len(),
        "wrote index"
    );

    Ok(BuildOutput {
        index_path,
        translations_path,
        documents: index.stats().doc_count as usize,
        sections: index.section_count(),
        terms: index.term_count(),
        bytes: bytes.len(),
    })
}

/// Patch an existing artifact with re-rendered pages and removed urls.
///
/// `pages` are page files relative to `input_dir`; their navigation order is
/// their position in the manifest (pages the manifest doesn't list go last).
/// The result is written next to the old artifact under its new hash.
pub fn run_update(
    artifact: &Path,
    input_dir: &Path,
    pages: &[String],
    removed: &[String],
    built_at: u64,
) -> Result<UpdateOutput> {
    let manifest = read_manifest(input_dir)?;
    let bytes = fs::read(artifact).map_err(|source| Error::Read {
        path: artifact.to_path_buf(),
        source,
    })?;
    let handle = IndexHandle::load(&bytes, manifest.search.query_options())?;
    if handle.snapshot().settings() != &manifest.search.index_settings() {
        tracing::warn!("search config differs from the artifact's; keeping the artifact's settings (rebuild to apply)");
    }

    let mut changes = Vec::with_capacity(pages.len() + removed.len());
    for url in removed {
        changes.push(Change::Remove(url.clone()));
    }
    for (i, file) in pages.iter().enumerate() {
        let order = manifest
            .documents
            .iter()
            .position(|d| d == file)
            .unwrap_or(manifest.documents.len() + i);
        let doc = load_page(&input_dir.join(file), order as u32, &manifest.locale)?;
        changes.push(Change::Upsert(doc));
    }

    let summary = handle.writer()?.apply_at(&changes, built_at)?;

    let index = handle.snapshot();
    let out = encode_index(&index);
    let output_dir = artifact.parent().unwrap_or_else(|| Path::new("."));
    let index_path = write_artifact(output_dir, &out)?;

    Ok(UpdateOutput {
        index_path,
        summary,
        sections: index.section_count(),
        bytes: out.len(),
    })
}
