// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build-time page input: what the site generator hands us per rendered page.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// One rendered page as a flat sequence of heading and text nodes.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub url: String,
    #[serde(default)]
    pub locale: Option<String>,
    /// Page title (front-matter or `<title>`). Falls back to the first h1.
    #[serde(default)]
    pub title: Option<String>,
    pub nodes: Vec<PageNode>,
}

/// A node of the rendered text tree, in document order.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageNode {
    Heading {
        level: u8,
        text: String,
        #[serde(default)]
        anchor: Option<String>,
        range: Range<usize>,
    },
    Text {
        text: String,
        range: Range<usize>,
    },
}
