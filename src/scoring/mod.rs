// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: how search results get their numbers and their order.
//!
//! BM25 per field, weighted so a title hit counts more than a heading hit,
//! which counts more than a body hit. Ties go to whichever section comes first
//! in the site navigation.

mod core;
pub mod ranking;

pub use core::*;
pub use ranking::{compare_ranked, top_k, Ranked};
