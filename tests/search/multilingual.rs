//! Mixed Chinese/English content and scripts without special rules.

use super::common::{handle, ids, page, sample_docs};
use docsift::{Locale, ScriptClass, Tokenizer};

fn terms(text: &str) -> Vec<String> {
    Tokenizer::default()
        .tokenize(text, Locale::Chinese)
        .into_iter()
        .map(|t| t.term)
        .collect()
}

#[test]
fn test_mixed_script_run_splits_at_boundary() {
    assert_eq!(terms("Go语言编程指南"), vec!["go", "语言", "言编", "编程", "程指", "指南"]);
}

#[test]
fn test_bigrams_cover_every_codepoint() {
    let text = "使用npm安装VitePress";
    let tokens = Tokenizer::default().tokenize(text, Locale::Chinese);
    let cjk: String = text.chars().filter(|c| !c.is_ascii()).collect();
    for c in cjk.chars() {
        assert!(
            tokens.iter().any(|t| t.script == ScriptClass::Cjk && t.term.contains(c)),
            "{} not covered",
            c
        );
    }
}

#[test]
fn test_single_cjk_char_run_is_unigram() {
    assert_eq!(terms("用 a 站"), vec!["用", "a", "站"]);
}

#[test]
fn test_chinese_query_finds_chinese_section() {
    let index = handle(&sample_docs());
    assert_eq!(ids(&index.search("配置文件", Some("zh-CN"))), vec!["/zh/guide/start#config"]);
}

#[test]
fn test_single_character_query_expands() {
    let index = handle(&sample_docs());
    let response = index.search("装", Some("zh-CN"));
    assert_eq!(ids(&response), vec!["/zh/guide/start#install"]);
    assert!(response.hits[0].matched_terms.iter().all(|t| t.contains('装')));
}

#[test]
fn test_mixed_query() {
    let index = handle(&sample_docs());
    assert_eq!(ids(&index.search("npm 安装", None)), vec!["/zh/guide/start#install"]);
    assert_eq!(ids(&index.search("VitePress", None)), vec!["/zh/guide/start#install"]);
}

#[test]
fn test_cjk_snippet_highlights_merge() {
    let index = handle(&sample_docs());
    let response = index.search("配置文件", Some("zh-CN"));
    let snippet = &response.hits[0].snippet;
    let highlighted: Vec<&str> = snippet.highlights.iter().map(|r| &snippet.text[r.clone()]).collect();
    assert!(highlighted.contains(&"配置文件"));
}

#[test]
fn test_kana_and_hangul_are_bigrammed() {
    assert_eq!(terms("カタカナ"), vec!["カタ", "タカ", "カナ"]);
    assert_eq!(terms("한국어"), vec!["한국", "국어"]);
}

#[test]
fn test_other_scripts_split_on_whitespace() {
    let tokens = Tokenizer::default().tokenize("Привет, мир", Locale::Generic);
    let got: Vec<(&str, ScriptClass)> = tokens.iter().map(|t| (t.term.as_str(), t.script)).collect();
    assert_eq!(got, vec![("привет", ScriptClass::Other), ("мир", ScriptClass::Other)]);

    let index = handle(&[page("/ru", 0, &[("hi", "Привет", "Привет, мир")])]);
    assert_eq!(ids(&index.search("мир", Some("ru"))), vec!["/ru#hi"]);
}

#[test]
#[cfg(feature = "unicode-normalization")]
fn test_full_width_latin_folds() {
    assert_eq!(terms("ＲＵＳＴ"), vec!["rust"]);
}
