// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Script-aware tokenization shared by the indexer and the query parser.
//!
//! Text is cut into runs of one script class. Each class has its own rule:
//!
//! | Class  | Rule                                                   |
//! |--------|--------------------------------------------------------|
//! | CJK    | overlapping bigrams; a lone codepoint becomes a unigram |
//! | Latin  | split at whitespace/punctuation, folded               |
//! | Symbol | one token per run                                      |
//! | Other  | whitespace split, edge punctuation trimmed, lowercased |
//!
//! A run never crosses a class boundary, so "Go语言" is `go` + `语言`.
//!
//! Stopwords are tokenized and indexed like any other word. Only the query
//! parser treats them specially: it drops them from a query that has other
//! terms, and since positions still count them, a phrase with a stopword in
//! the middle keeps the same relative offsets as the indexed text.

pub mod script;
pub mod stopwords;

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

pub use script::ScriptClass;
use script::{classify, CharKind};

use crate::utils::fold;

/// A normalized token with its location in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub term: String,
    /// Byte offset of the first source character.
    pub start: usize,
    /// Byte offset one past the last source character.
    pub end: usize,
    pub script: ScriptClass,
    pub position: u32,
}

/// Language rules selected from a locale hint.
///
/// All locales currently share one rule set; the hint is parsed so callers can
/// pass whatever the UI has, and anything unrecognized lands on `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    Chinese,
    Japanese,
    Korean,
    English,
    Generic,
}

impl Locale {
    pub fn from_hint(hint: Option<&str>) -> Self {
        let Some(hint) = hint else {
            return Locale::Generic;
        };
        let primary = hint
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match primary.as_str() {
            "zh" => Locale::Chinese,
            "ja" => Locale::Japanese,
            "ko" => Locale::Korean,
            "en" => Locale::English,
            _ => Locale::Generic,
        }
    }
}

/// Tokenizer configured with a stopword list.
///
/// Cheap to clone; the stopword set is shared.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stopwords: Arc<BTreeSet<String>>,
}

impl Tokenizer {
    pub fn new(stopwords: Arc<BTreeSet<String>>) -> Self {
        Self { stopwords }
    }

    pub fn is_stopword(&self, term: &str) -> bool {
        self.stopwords.contains(term)
    }

    /// Stopword lists are Latin; CJK terms never match one.
    pub fn is_stopword_token(&self, token: &Token) -> bool {
        token.script == ScriptClass::Latin && self.is_stopword(&token.term)
    }

    /// Tokenize `text`, numbering positions from zero.
    pub fn tokenize(&self, text: &str, locale: Locale) -> Vec<Token> {
        let mut tokens = Vec::new();
        self.tokenize_into(text, locale, 0, &mut tokens);
        tokens
    }

    /// Tokenize `text` appending to `out`, numbering positions from `base`.
    ///
    /// Returns the next free position (one past the last position used).
    pub fn tokenize_into(&self, text: &str, _locale: Locale, base: u32, out: &mut Vec<Token>) -> u32 {
        let mut position = base;
        for run in runs(text) {
            let slice = &text[run.start..run.end];
            match run.class {
                ScriptClass::Cjk => {
                    position = emit_cjk(slice, run.start, position, out);
                }
                ScriptClass::Latin => {
                    let term = fold(slice);
                    if term.is_empty() {
                        continue;
                    }
                    out.push(Token {
                        term,
                        start: run.start,
                        end: run.end,
                        script: ScriptClass::Latin,
                        position,
                    });
                    position += 1;
                }
                ScriptClass::Symbol => {
                    out.push(Token {
                        term: slice.to_string(),
                        start: run.start,
                        end: run.end,
                        script: ScriptClass::Symbol,
                        position,
                    });
                    position += 1;
                }
                ScriptClass::Other => {
                    let trimmed = slice.trim_end_matches(|c| classify(c) == CharKind::Punctuation);
                    if trimmed.is_empty() {
                        continue;
                    }
                    out.push(Token {
                        term: trimmed.to_lowercase(),
                        start: run.start,
                        end: run.start + trimmed.len(),
                        script: ScriptClass::Other,
                        position,
                    });
                    position += 1;
                }
            }
        }
        position
    }
}

fn emit_cjk(slice: &str, offset: usize, mut position: u32, out: &mut Vec<Token>) -> u32 {
    let chars: Vec<(usize, char)> = slice.char_indices().collect();
    let end_of = |i: usize| chars.get(i + 1).map(|(b, _)| *b).unwrap_or(slice.len());

    if chars.len() == 1 {
        out.push(Token {
            term: slice.to_string(),
            start: offset,
            end: offset + slice.len(),
            script: ScriptClass::Cjk,
            position,
        });
        return position + 1;
    }

    for i in 0..chars.len() - 1 {
        let start = chars[i].0;
        let end = end_of(i + 1);
        out.push(Token {
            term: slice[start..end].to_string(),
            start: offset + start,
            end: offset + end,
            script: ScriptClass::Cjk,
            position,
        });
        position += 1;
    }
    position
}

/// A maximal run of one script class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    class: ScriptClass,
    start: usize,
    end: usize,
}

/// Split text into script runs.
///
/// Whitespace always ends a run. Punctuation ends a run except inside
/// `Other` runs, where only whitespace separates (no script-specific rules).
/// Combining marks extend the open run; a run cannot start with one.
fn runs(text: &str) -> Vec<Run> {
    let mut out = Vec::new();
    let mut current: Option<Run> = None;

    for (i, c) in text.char_indices() {
        let end = i + c.len_utf8();
        match classify(c) {
            CharKind::Whitespace => {
                out.extend(current.take());
            }
            CharKind::Punctuation => match current.as_mut() {
                Some(run) if run.class == ScriptClass::Other => run.end = end,
                _ => out.extend(current.take()),
            },
            CharKind::Mark => {
                if let Some(run) = current.as_mut() {
                    run.end = end;
                }
            }
            CharKind::Script(class) => match current.as_mut() {
                Some(run) if run.class == class => run.end = end,
                _ => {
                    out.extend(current.take());
                    current = Some(Run { class, start: i, end });
                }
            },
        }
    }
    out.extend(current);
    out
}
