// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Snippets: a short window of section text around the densest cluster of
//! matches, with highlight spans.
//!
//! Highlights come from re-tokenizing the body with the index tokenizer and
//! keeping tokens whose term matched. Overlapping spans (adjacent CJK bigrams
//! share a character) merge into one. The window is at most `window` bytes,
//! snapped to char boundaries so we never cut a multi-byte character.

use std::collections::BTreeSet;
use std::ops::Range;

use serde::Serialize;

use crate::tokenize::{Locale, Tokenizer};
use crate::utils::floor_char_boundary;

const ELLIPSIS: &str = "…";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub text: String,
    /// Byte ranges into `text`, sorted, non-overlapping.
    pub highlights: Vec<Range<usize>>,
    pub truncated_start: bool,
    pub truncated_end: bool,
}

impl Snippet {
    /// Render with highlight markers and ellipses, e.g. `render("<mark>", "</mark>")`.
    pub fn render(&self, open: &str, close: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + self.highlights.len() * (open.len() + close.len()) + 6);
        if self.truncated_start {
            out.push_str(ELLIPSIS);
        }
        let mut last = 0;
        for span in &self.highlights {
            out.push_str(&self.text[last..span.start]);
            out.push_str(open);
            out.push_str(&self.text[span.clone()]);
            out.push_str(close);
            last = span.end;
        }
        out.push_str(&self.text[last..]);
        if self.truncated_end {
            out.push_str(ELLIPSIS);
        }
        out
    }
}

/// Byte spans of tokens in `text` whose term is in `terms`, merged.
pub fn highlight_spans(
    text: &str,
    terms: &BTreeSet<String>,
    tokenizer: &Tokenizer,
    locale: Locale,
) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();
    for token in tokenizer.tokenize(text, locale) {
        if !terms.contains(&token.term) {
            continue;
        }
        match spans.last_mut() {
            Some(last) if token.start <= last.end => last.end = last.end.max(token.end),
            _ => spans.push(token.start..token.end),
        }
    }
    spans
}

/// Build a snippet of at most `window` bytes of `text`.
pub fn make_snippet(
    text: &str,
    terms: &BTreeSet<String>,
    tokenizer: &Tokenizer,
    locale: Locale,
    window: usize,
) -> Snippet {
    let spans = highlight_spans(text, terms, tokenizer, locale);
    let (start, end) = choose_window(text, &spans, window);

    // spans reaching past the window are clipped to it
    let highlights = spans
        .iter()
        .filter(|s| s.end > start && s.start < end)
        .map(|s| s.start.max(start) - start..s.end.min(end) - start)
        .collect();

    Snippet {
        // newline → space keeps byte offsets intact
        text: text[start..end].replace(['\n', '\r', '\t'], " "),
        highlights,
        truncated_start: start > 0,
        truncated_end: end < text.len(),
    }
}

/// Pick the window covering the most spans, centered on that cluster.
fn choose_window(text: &str, spans: &[Range<usize>], window: usize) -> (usize, usize) {
    if text.len() <= window {
        return (0, text.len());
    }
    if spans.is_empty() {
        return (0, floor_char_boundary(text, window));
    }

    let mut best = (0usize, 0usize); // (first span, count)
    let mut j = 0;
    for i in 0..spans.len() {
        j = j.max(i);
        while j < spans.len() && spans[j].end <= spans[i].start + window {
            j += 1;
        }
        let count = j - i;
        if count > best.1 {
            best = (i, count);
        }
    }

    let (first, count) = best;
    let cluster_start = spans[first].start;
    let cluster_end = spans[first + count.max(1) - 1].end.max(cluster_start);
    let slack = window.saturating_sub(cluster_end - cluster_start);
    let start = cluster_start
        .saturating_sub(slack / 2)
        .min(text.len() - window);
    let start = floor_char_boundary(text, start);
    let end = floor_char_boundary(text, start + window);
    (start, end)
}
