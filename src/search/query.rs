// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query parsing: raw input → required terms and phrase constraints.
//!
//! Every term is required (implicit AND). Text inside a pair of double quotes
//! is additionally a phrase: its tokens must appear at the same relative
//! positions in one section. Quotes pair left to right; an odd one out is just
//! a character, and the tokenizer drops it like any other punctuation.
//!
//! Curly quotes (`“` `”`) count as quotes too, since that's what CJK input
//! methods produce.
//!
//! Stopwords are dropped when the query has at least one other term. A query
//! made only of stopwords ("it is") searches for them as written.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::tokenize::{Locale, ScriptClass, Token, Tokenizer};
use crate::utils::truncate_chars;

/// One required term, as the tokenizer produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryTerm {
    pub term: String,
    pub script: ScriptClass,
}

impl QueryTerm {
    /// A lone CJK codepoint. The index stores bigrams, so such a term matches
    /// every dictionary term containing the character.
    pub fn is_cjk_unigram(&self) -> bool {
        self.script == ScriptClass::Cjk && self.term.chars().count() == 1
    }
}

/// Tokens that must appear at fixed offsets from each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phrase {
    pub text: String,
    /// (term, offset from the first token)
    pub terms: Vec<(String, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParsedQuery {
    /// Query text after truncation.
    pub text: String,
    pub terms: Vec<QueryTerm>,
    pub phrases: Vec<Phrase>,
    pub truncated: bool,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\u{201C}' | '\u{201D}')
}

/// Parse a raw query.
pub fn parse_query(raw: &str, tokenizer: &Tokenizer, locale: Locale, max_chars: usize) -> ParsedQuery {
    let text = truncate_chars(raw, max_chars);
    let truncated = text.len() < raw.len();

    let quotes: Vec<usize> = text
        .char_indices()
        .filter(|(_, c)| is_quote(*c))
        .map(|(i, _)| i)
        .collect();
    // pairs of (open, close) byte offsets; an unpaired last quote stays literal
    let pairs: Vec<(usize, usize)> = quotes.chunks_exact(2).map(|p| (p[0], p[1])).collect();

    let mut tokens = tokenizer.tokenize(text, locale);
    if tokens.iter().any(|t| !tokenizer.is_stopword_token(t)) {
        tokens.retain(|t| !tokenizer.is_stopword_token(t));
    }

    let mut seen = BTreeSet::new();
    let mut terms = Vec::new();
    for token in &tokens {
        if seen.insert(token.term.as_str()) {
            terms.push(QueryTerm {
                term: token.term.clone(),
                script: token.script,
            });
        }
    }

    let phrases = pairs
        .iter()
        .filter_map(|&(open, close)| {
            let inside: Vec<&Token> = tokens
                .iter()
                .filter(|t| t.start > open && t.end <= close)
                .collect();
            let first = inside.first()?.position;
            Some(Phrase {
                text: text[open..close].trim_start_matches(is_quote).to_string(),
                terms: inside
                    .iter()
                    .map(|t| (t.term.clone(), t.position - first))
                    .collect(),
            })
        })
        // a one-token phrase is just a term
        .filter(|p| p.terms.len() > 1)
        .collect();

    ParsedQuery {
        text: text.to_string(),
        terms,
        phrases,
        truncated,
    }
}
