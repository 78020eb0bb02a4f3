// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Offline full-text search for documentation sites with mixed CJK and Latin
//! content.
//!
//! Pages are split into sections at build time, tokenized (Latin words,
//! overlapping CJK bigrams) and written into a compact inverted-index
//! artifact. At run time the artifact is loaded once and queried entirely
//! in-process: BM25 over three weighted fields, AND semantics, quoted phrases,
//! highlighted snippets.
//!
//! # Architecture
//!
//! ```text
//!  build time                                    run time
//! ┌──────────┐   ┌──────────┐   ┌─────────┐      ┌─────────┐   ┌──────────┐
//! │ extract  │──▶│ tokenize │──▶│  index  │─┐ ┌─▶│ engine  │◀─▶│ session  │
//! │ (pages → │   │ (bigrams,│   │ builder │ │ │  │ (ArcSwap│   │ debounce,│
//! │ sections)│   │  words)  │   │ updater │ │ │  │ writer) │   │ navigate)│
//! └──────────┘   └──────────┘   └─────────┘ │ │  └────┬────┘   └──────────┘
//!                                           ▼ │       ▼
//!                                    ┌──────────┐ ┌──────────┐
//!                                    │  binary  │ │  search  │
//!                                    │ .docsift │ │ scoring  │
//!                                    └──────────┘ └──────────┘
//! ```
//!
//! # Quick start
//!
//! ```
//! use docsift::{build_index, IndexSettings};
//! use docsift::testing::sample_docs;
//!
//! let index = build_index(&sample_docs(), IndexSettings::default(), 0).unwrap();
//! let bytes = docsift::binary::encode_index(&index);
//!
//! let handle = docsift::load_index(&bytes).unwrap();
//! let response = docsift::search(&handle, "install", None);
//! assert!(!response.hits.is_empty());
//! ```

pub mod binary;
pub mod build;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod scoring;
pub mod search;
pub mod session;
pub mod testing;
pub mod tokenize;
pub mod types;
pub mod utils;

pub use config::{IndexSettings, QueryOptions, SearchConfig, Translations};
pub use engine::{cancel, load_index, search, Change, IndexHandle, IndexWriter};
pub use error::{Error, Result};
pub use index::{build_index, IndexBuilder, InvertedIndex, UpdateSummary};
pub use search::{QueryGenerations, QueryHandle, ResultHit, SearchResponse, Snippet};
pub use session::{Key, SearchSession, SessionEvent, SessionState};
pub use tokenize::{Locale, ScriptClass, Token, Tokenizer};
pub use types::{Document, FieldType, Posting, Section, SectionId, SectionMeta};
