// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! One error type for the whole crate.
//!
//! Artifact loading is the main producer. Every way a `.docsift` file can be
//! wrong maps to a distinct variant so the CLI (and tests) can tell a
//! truncated download from a file written by a newer major version.

use std::io;
use std::path::PathBuf;

/// Which artifact block a decode error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Header,
    Dictionary,
    Postings,
    Sections,
    Stats,
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Block::Header => "header",
            Block::Dictionary => "dictionary",
            Block::Postings => "postings",
            Block::Sections => "sections",
            Block::Stats => "stats",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid magic bytes: expected DSFT, got {0:?}")]
    BadMagic([u8; 4]),

    #[error("artifact truncated: {0}")]
    Truncated(String),

    #[error("checksum mismatch: footer says {expected:08x}, content hashes to {actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("unsupported format version {major}.{minor} (this build reads {supported}.x)")]
    UnsupportedVersion {
        major: u16,
        minor: u16,
        supported: u16,
    },

    #[error("corrupt {block} block: {reason}")]
    Corrupt { block: Block, reason: String },

    #[error("duplicate document url {0}")]
    DuplicateDocument(String),

    #[error("duplicate section id {0}")]
    DuplicateSection(String),

    #[error("another writer already holds this index")]
    WriterBusy,

    #[error("query superseded by a newer generation")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn corrupt(block: Block, reason: impl Into<String>) -> Self {
        Error::Corrupt {
            block,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
