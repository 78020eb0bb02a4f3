// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The runtime handle: one published snapshot, many readers, one writer.
//!
//! ```text
//!   readers ──load()──▶ ArcSwap<InvertedIndex> ◀──store()── IndexWriter
//!                          (current snapshot)        (clone, patch, swap)
//! ```
//!
//! A query loads the current `Arc` once and runs against it to completion, so
//! it never observes a half-applied update. Writers patch a private clone and
//! publish it with a single pointer swap; the old snapshot is freed when the
//! last query holding it finishes.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::{Mutex, MutexGuard};

use crate::binary::decode_index;
use crate::config::QueryOptions;
use crate::error::{Error, Result};
use crate::index::{InvertedIndex, UpdateSummary};
use crate::search::{self, SearchResponse};
use crate::types::Document;
use crate::utils::truncate_chars;

pub use crate::search::{QueryGenerations, QueryHandle};

struct Shared {
    current: ArcSwap<InvertedIndex>,
    writer: Mutex<()>,
    options: QueryOptions,
}

/// Shared handle to a live index. Cloning is cheap; all clones see the same
/// snapshot.
#[derive(Clone)]
pub struct IndexHandle {
    inner: Arc<Shared>,
}

impl fmt::Debug for IndexHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.inner.current.load();
        f.debug_struct("IndexHandle")
            .field("sections", &snapshot.section_count())
            .field("terms", &snapshot.term_count())
            .field("built_at", &snapshot.built_at())
            .field("options", &self.inner.options)
            .finish()
    }
}

impl IndexHandle {
    pub fn new(index: InvertedIndex, options: QueryOptions) -> Self {
        Self {
            inner: Arc::new(Shared {
                current: ArcSwap::from_pointee(index),
                writer: Mutex::new(()),
                options,
            }),
        }
    }

    /// Decode an artifact into a fresh handle. All-or-nothing.
    pub fn load(bytes: &[u8], options: QueryOptions) -> Result<Self> {
        let index = decode_index(bytes)?;
        tracing::info!(
            sections = index.section_count(),
            terms = index.term_count(),
            bytes = bytes.len(),
            "loaded index"
        );
        Ok(Self::new(index, options))
    }

    /// The snapshot queries should run against right now.
    pub fn snapshot(&self) -> Arc<InvertedIndex> {
        self.inner.current.load_full()
    }

    pub fn options(&self) -> &QueryOptions {
        &self.inner.options
    }

    /// One-shot search that nothing else can cancel.
    pub fn search(&self, query: &str, locale: Option<&str>) -> SearchResponse {
        self.search_with(query, locale, &QueryHandle::detached())
    }

    /// Search under a cancellable handle.
    ///
    /// Never fails: cancellation sets `cancelled`, anything else is logged and
    /// reported through `diagnostic` with no hits.
    pub fn search_with(&self, query: &str, locale: Option<&str>, handle: &QueryHandle) -> SearchResponse {
        let snapshot = self.inner.current.load();
        let options = &self.inner.options;
        match search::execute(&snapshot, query, locale, options, handle) {
            Ok(response) => response,
            Err(Error::Cancelled) => SearchResponse {
                cancelled: true,
                ..SearchResponse::empty(truncate_chars(query, options.max_query_chars))
            },
            Err(e) => {
                tracing::warn!(query, error = %e, "query failed; returning no results");
                SearchResponse {
                    diagnostic: Some(e.to_string()),
                    ..SearchResponse::empty(truncate_chars(query, options.max_query_chars))
                }
            }
        }
    }

    /// Replace the snapshot with a newly downloaded artifact.
    ///
    /// On any decode error the current snapshot stays in service.
    pub fn reload(&self, bytes: &[u8]) -> Result<()> {
        let _guard = self.inner.writer.try_lock().ok_or(Error::WriterBusy)?;
        match decode_index(bytes) {
            Ok(index) => {
                tracing::info!(
                    sections = index.section_count(),
                    terms = index.term_count(),
                    built_at = index.built_at(),
                    "swapped in reloaded index"
                );
                self.inner.current.store(Arc::new(index));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "reload rejected; keeping current index");
                Err(e)
            }
        }
    }

    /// Claim the single writer slot.
    pub fn writer(&self) -> Result<IndexWriter<'_>> {
        let guard = self.inner.writer.try_lock().ok_or(Error::WriterBusy)?;
        Ok(IndexWriter {
            shared: &self.inner,
            _guard: guard,
        })
    }
}

/// One change in a batch passed to [`IndexWriter::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Upsert(Document),
    Remove(String),
}

/// Exclusive write access. Each call publishes a new snapshot or, on error,
/// nothing at all.
pub struct IndexWriter<'a> {
    shared: &'a Shared,
    _guard: MutexGuard<'a, ()>,
}

impl IndexWriter<'_> {
    pub fn update_document(&mut self, doc: &Document) -> Result<UpdateSummary> {
        self.commit(|index| index.update_document(doc))
    }

    pub fn remove_document(&mut self, url: &str) -> Result<UpdateSummary> {
        self.commit(|index| Ok(index.remove_document(url)))
    }

    /// Apply a batch as one swap. If any change fails, none are published.
    pub fn apply(&mut self, changes: &[Change]) -> Result<UpdateSummary> {
        self.commit(|index| apply_changes(index, changes))
    }

    /// Like [`apply`](Self::apply), stamping the new snapshot with `built_at`
    /// in the same swap.
    pub fn apply_at(&mut self, changes: &[Change], built_at: u64) -> Result<UpdateSummary> {
        self.commit(|index| {
            let summary = apply_changes(index, changes)?;
            index.set_built_at(built_at);
            Ok(summary)
        })
    }

    fn commit(
        &mut self,
        patch: impl FnOnce(&mut InvertedIndex) -> Result<UpdateSummary>,
    ) -> Result<UpdateSummary> {
        // only the writer stores, so nobody can publish between this load and our store
        let mut next = InvertedIndex::clone(&self.shared.current.load());
        let summary = patch(&mut next)?;
        tracing::info!(
            removed = summary.removed,
            inserted = summary.inserted,
            unchanged = summary.unchanged,
            sections = next.section_count(),
            "published updated index"
        );
        self.shared.current.store(Arc::new(next));
        Ok(summary)
    }
}

fn apply_changes(index: &mut InvertedIndex, changes: &[Change]) -> Result<UpdateSummary> {
    let mut summary = UpdateSummary::default();
    for change in changes {
        let step = match change {
            Change::Upsert(doc) => index.update_document(doc)?,
            Change::Remove(url) => index.remove_document(url),
        };
        summary.merge(step);
    }
    Ok(summary)
}

/// Decode an artifact with default query options.
pub fn load_index(bytes: &[u8]) -> Result<IndexHandle> {
    IndexHandle::load(bytes, QueryOptions::default())
}

pub fn search(handle: &IndexHandle, query: &str, locale: Option<&str>) -> SearchResponse {
    handle.search(query, locale)
}

/// Cancel an in-flight query. Harmless on finished or superseded handles.
pub fn cancel(query: &QueryHandle) {
    query.cancel();
}
