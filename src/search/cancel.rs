// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Cooperative cancellation by generation counter.
//!
//! A session owns one counter. Starting a query bumps it and hands the query a
//! `QueryHandle` remembering the generation it started at. The query polls
//! `is_cancelled()` between batches of work; as soon as anyone bumps the
//! counter again (a newer keystroke, or an explicit `cancel`) the old query
//! sees the mismatch and stops.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Per-session generation counter.
#[derive(Debug, Clone, Default)]
pub struct QueryGenerations {
    counter: Arc<AtomicU64>,
}

impl QueryGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede everything in flight and start a new generation.
    pub fn begin(&self) -> QueryHandle {
        let generation = self.counter.fetch_add(1, Ordering::AcqRel) + 1;
        QueryHandle {
            counter: Arc::clone(&self.counter),
            generation,
        }
    }

    /// Supersede everything in flight without starting anything.
    pub fn invalidate(&self) {
        self.counter.fetch_add(1, Ordering::AcqRel);
    }

    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }
}

/// Ticket for one query. Cheap to clone and send to a worker thread.
#[derive(Debug, Clone)]
pub struct QueryHandle {
    counter: Arc<AtomicU64>,
    generation: u64,
}

impl QueryHandle {
    /// A handle nobody else can cancel (one-shot searches, the CLI).
    pub fn detached() -> Self {
        QueryGenerations::new().begin()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.counter.load(Ordering::Acquire) != self.generation
    }

    /// Cancel this query. A no-op if it was already superseded, so cancelling
    /// a stale handle never disturbs a newer query.
    pub fn cancel(&self) {
        let _ = self.counter.compare_exchange(
            self.generation,
            self.generation + 1,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}
