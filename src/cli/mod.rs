// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the docsift command-line interface.
//!
//! Four subcommands: `index` builds an artifact from a page directory,
//! `update` patches one in place of a full rebuild, `inspect` examines a
//! `.docsift` file, and `search` queries it.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "docsift",
    about = "Offline full-text search indexes for documentation sites",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a search index from a directory of page JSON files
    Index {
        /// Input directory containing manifest.json and page files
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the .docsift file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Patch an existing index with changed pages
    ///
    /// Writes the patched index next to the old one under its new hash. The
    /// result is identical to a full rebuild of the same content.
    Update {
        /// Existing .docsift file
        file: PathBuf,

        /// Input directory containing manifest.json and page files
        #[arg(short, long)]
        input: PathBuf,

        /// Page file (relative to the input directory) to re-index; repeatable
        #[arg(short, long = "page")]
        pages: Vec<String>,

        /// Page url to drop from the index; repeatable
        #[arg(short, long = "remove")]
        removed: Vec<String>,
    },

    /// Inspect a .docsift file structure
    Inspect {
        /// Path to .docsift file
        file: PathBuf,

        /// How many of the most frequent terms to list
        #[arg(long, default_value = "10")]
        top_terms: usize,
    },

    /// Search a .docsift file and display results
    Search {
        /// Path to .docsift file
        file: PathBuf,

        /// Search query (quote phrases: '"quick start"')
        query: String,

        /// Maximum number of results to return
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Locale hint for query tokenization
        #[arg(long)]
        locale: Option<String>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },
}
