// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Character classification by script.
//!
//! The tokenizer only needs to know four things about a character: is it part
//! of a CJK run (bigrammed), a Latin/digit run (word split), a symbol run, or
//! some other script we have no rules for (whitespace split). Everything else
//! is a separator.

use serde::{Deserialize, Serialize};

/// Script class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptClass {
    /// Han, Kana, Hangul. Indexed as overlapping bigrams.
    Cjk,
    /// Latin letters and digits (including full-width forms).
    Latin,
    /// Emoji, math, currency and other non-letter symbols.
    Symbol,
    /// Letters from scripts without specific rules; whitespace-split.
    Other,
}

/// What a character does to the run it appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharKind {
    Whitespace,
    Punctuation,
    /// Combining mark: extends whatever run is open.
    Mark,
    Script(ScriptClass),
}

pub(crate) fn classify(c: char) -> CharKind {
    if c.is_whitespace() {
        CharKind::Whitespace
    } else if crate::utils::is_combining_mark(c) {
        CharKind::Mark
    } else if is_cjk(c) {
        CharKind::Script(ScriptClass::Cjk)
    } else if is_latin(c) {
        CharKind::Script(ScriptClass::Latin)
    } else if is_punctuation(c) {
        CharKind::Punctuation
    } else if c.is_alphabetic() {
        CharKind::Script(ScriptClass::Other)
    } else if c.is_control() {
        CharKind::Whitespace
    } else {
        CharKind::Script(ScriptClass::Symbol)
    }
}

/// Han ideographs, Hiragana, Katakana and Hangul.
pub fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3400}'..='\u{4DBF}' |   // CJK Unified Ideographs Extension A
        '\u{4E00}'..='\u{9FFF}' |   // CJK Unified Ideographs
        '\u{F900}'..='\u{FAFF}' |   // CJK Compatibility Ideographs
        '\u{20000}'..='\u{2A6DF}' | // CJK Unified Ideographs Extension B
        '\u{2A700}'..='\u{2EBEF}' | // Extensions C-F
        '\u{3040}'..='\u{309F}' |   // Hiragana
        '\u{30A0}'..='\u{30FA}' |   // Katakana (without the middle dot)
        '\u{30FC}'..='\u{30FF}' |   // Katakana prolonged sound mark, iteration marks
        '\u{31F0}'..='\u{31FF}' |   // Katakana Phonetic Extensions
        '\u{3005}' |                // Ideographic iteration mark
        '\u{1100}'..='\u{11FF}' |   // Hangul Jamo
        '\u{3130}'..='\u{318F}' |   // Hangul Compatibility Jamo
        '\u{AC00}'..='\u{D7AF}'     // Hangul Syllables
    )
}

/// ASCII alphanumerics, Latin letters with diacritics, full-width forms, digits.
pub fn is_latin(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c,
            '\u{00C0}'..='\u{00D6}' |   // Latin-1 letters (skip ×)
            '\u{00D8}'..='\u{00F6}' |   // (skip ÷)
            '\u{00F8}'..='\u{024F}' |   // Latin-1 tail, Extended-A, Extended-B
            '\u{1E00}'..='\u{1EFF}' |   // Latin Extended Additional
            '\u{FF10}'..='\u{FF19}' |   // Full-width digits
            '\u{FF21}'..='\u{FF3A}' |   // Full-width upper
            '\u{FF41}'..='\u{FF5A}'     // Full-width lower
        )
        || c.is_numeric() && !is_cjk(c)
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(c,
            '\u{00A1}'..='\u{00BF}' |   // Latin-1 punctuation and signs
            '\u{2000}'..='\u{206F}' |   // General Punctuation
            '\u{3000}'..='\u{3004}' |   // CJK Symbols and Punctuation (partial)
            '\u{3006}'..='\u{303F}' |
            '\u{30FB}' |                // Katakana middle dot
            '\u{FE30}'..='\u{FE4F}' |   // CJK Compatibility Forms
            '\u{FF01}'..='\u{FF0F}' |   // Full-width punctuation
            '\u{FF1A}'..='\u{FF20}' |
            '\u{FF3B}'..='\u{FF40}' |
            '\u{FF5B}'..='\u{FF65}'
        )
}
