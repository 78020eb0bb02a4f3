// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Interactive search session: debounce, supersede, navigate.
//!
//! ```text
//!            on_input          debounce elapsed         deliver
//!   Idle ──────────────▶ Typing ──────────────▶ Querying ──────────▶ Displaying
//!    ▲                     ▲                                            │
//!    │                     └──────────────── on_input ──────────────────┤
//!    └──────────────────────── close / Escape (emits Closed) ───────────┘
//! ```
//!
//! The controller never reads the clock. Callers pass `Instant`s in, so tests
//! can step time exactly and a UI can drive it from its own timer.
//!
//! Queries either run inline via [`SearchSession::tick`], or leave the session
//! as a [`PendingQuery`] (see [`SearchSession::dispatch`]) to run on a worker
//! and come back through [`SearchSession::deliver`]. Every keystroke bumps the
//! generation counter, so a result computed for an older query string is
//! dropped on delivery and a running one stops at its next cancellation check.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{SearchConfig, Translations};
use crate::engine::IndexHandle;
use crate::search::{QueryGenerations, QueryHandle, ResultHit, SearchResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Typing,
    Querying,
    Displaying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
}

/// Something the UI must act on.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Enter on a hit: navigate to it.
    Selected(ResultHit),
    /// The session closed and was reset to `Idle`.
    Closed,
}

/// A query that left the session to run elsewhere.
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub query: String,
    pub locale: Option<String>,
    pub handle: QueryHandle,
}

impl PendingQuery {
    pub fn run(&self, index: &IndexHandle) -> SearchResponse {
        index.search_with(&self.query, self.locale.as_deref(), &self.handle)
    }

    pub fn generation(&self) -> u64 {
        self.handle.generation()
    }
}

pub struct SearchSession {
    index: IndexHandle,
    generations: QueryGenerations,
    debounce: Duration,
    locale: Option<String>,
    translations: Arc<Translations>,

    state: SessionState,
    query: String,
    last_input: Option<Instant>,
    response: Option<SearchResponse>,
    selected: usize,
}

impl SearchSession {
    pub fn new(index: IndexHandle, debounce: Duration) -> Self {
        Self {
            index,
            generations: QueryGenerations::new(),
            debounce,
            locale: None,
            translations: Arc::default(),
            state: SessionState::Idle,
            query: String::new(),
            last_input: None,
            response: None,
            selected: 0,
        }
    }

    pub fn from_config(index: IndexHandle, config: &SearchConfig) -> Self {
        Self::new(index, Duration::from_millis(config.debounce_ms))
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_translations(mut self, translations: Arc<Translations>) -> Self {
        self.translations = translations;
        self
    }

    /// UI strings for the session's locale, falling back to the `root` entry.
    pub fn ui_strings(&self) -> Option<&std::collections::BTreeMap<String, String>> {
        self.locale
            .as_deref()
            .and_then(|l| self.translations.get(l))
            .or_else(|| self.translations.get("root"))
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn response(&self) -> Option<&SearchResponse> {
        self.response.as_ref()
    }

    pub fn hits(&self) -> &[ResultHit] {
        self.response.as_ref().map_or(&[], |r| r.hits.as_slice())
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.hits().is_empty()).then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&ResultHit> {
        self.hits().get(self.selected)
    }

    /// A keystroke. Supersedes whatever is in flight and restarts the debounce.
    pub fn on_input(&mut self, text: &str, now: Instant) {
        self.generations.invalidate();
        self.query = text.to_string();
        self.last_input = Some(now);
        self.state = SessionState::Typing;
    }

    /// When the pending query becomes due, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            SessionState::Typing => self.last_input.map(|t| t + self.debounce),
            _ => None,
        }
    }

    fn is_due(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }

    /// Start the query if the debounce has elapsed and hand it out.
    pub fn dispatch(&mut self, now: Instant) -> Option<PendingQuery> {
        if !self.is_due(now) {
            return None;
        }
        self.state = SessionState::Querying;
        Some(PendingQuery {
            query: self.query.clone(),
            locale: self.locale.clone(),
            handle: self.generations.begin(),
        })
    }

    /// Accept a finished query. Returns false (and changes nothing) if a newer
    /// keystroke superseded it.
    pub fn deliver(&mut self, generation: u64, response: SearchResponse) -> bool {
        if self.state != SessionState::Querying
            || generation != self.generations.current()
            || response.cancelled
        {
            tracing::debug!(
                generation,
                current = self.generations.current(),
                "dropping stale search result"
            );
            return false;
        }
        self.response = Some(response);
        self.selected = 0;
        self.state = SessionState::Displaying;
        true
    }

    /// Run the query inline once the debounce elapses. Returns true when new
    /// results are on display.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.dispatch(now) {
            Some(pending) => {
                let response = pending.run(&self.index);
                self.deliver(pending.generation(), response)
            }
            None => false,
        }
    }

    /// Keyboard navigation over the current hits. Never re-queries.
    pub fn navigate(&mut self, key: Key) -> Option<SessionEvent> {
        let count = self.hits().len();
        match key {
            Key::Escape => Some(self.close()),
            Key::Up if count > 0 => {
                self.selected = (self.selected + count - 1) % count;
                None
            }
            Key::Down if count > 0 => {
                self.selected = (self.selected + 1) % count;
                None
            }
            Key::Enter => self.selected().cloned().map(SessionEvent::Selected),
            Key::Up | Key::Down => None,
        }
    }

    /// Discard everything and go back to `Idle`.
    pub fn close(&mut self) -> SessionEvent {
        self.generations.invalidate();
        self.state = SessionState::Idle;
        self.query.clear();
        self.last_input = None;
        self.response = None;
        self.selected = 0;
        SessionEvent::Closed
    }
}
