//! Core retrieval correctness: recall, AND semantics, degenerate queries.

use super::common::{handle, ids, page, sample_docs};
use docsift::Locale;

#[test]
fn test_every_body_term_finds_its_section() {
    let docs = sample_docs();
    let index = handle(&docs);
    let tokenizer = index.snapshot().tokenizer();

    for doc in &docs {
        for section in &doc.sections {
            for token in tokenizer.tokenize(&section.body, Locale::from_hint(Some(&doc.locale))) {
                let response = index.search(&token.term, Some(&doc.locale));
                assert!(
                    ids(&response).contains(&section.id.to_string()),
                    "term {:?} did not find {}",
                    token.term,
                    section.id
                );
            }
        }
    }
}

#[test]
fn test_terms_are_anded() {
    let index = handle(&[page(
        "/guide",
        0,
        &[
            ("a", "Setup", "install the server locally"),
            ("b", "Deploy", "deploy the server to production"),
        ],
    )]);

    assert_eq!(ids(&index.search("server", None)).len(), 2);
    assert_eq!(ids(&index.search("server install", None)), vec!["/guide#a"]);
    assert_eq!(ids(&index.search("install production", None)), Vec::<String>::new());
}

#[test]
fn test_repeated_terms_count_once() {
    let index = handle(&sample_docs());
    let once = index.search("install", None);
    let twice = index.search("install install INSTALL", None);
    assert_eq!(ids(&once), ids(&twice));
    assert_eq!(once.hits[0].score, twice.hits[0].score);
}

#[test]
fn test_empty_query_is_empty_without_error() {
    let index = handle(&sample_docs());
    for query in ["", "   ", "\t\n", "?!", "\"\""] {
        let response = index.search(query, None);
        assert!(response.is_empty(), "query {:?} returned hits", query);
        assert!(response.diagnostic.is_none());
        assert!(!response.cancelled);
    }
}

#[test]
fn test_stopword_only_queries_still_find_text() {
    let index = handle(&[
        page("/zen", 0, &[("x", "Zen", "it is what it is")]),
        page("/misc", 1, &[("y", "Misc", "what happened")]),
    ]);
    assert_eq!(ids(&index.search("it", None)), vec!["/zen#x"]);
    assert_eq!(ids(&index.search("it is", None)), vec!["/zen#x"]);
    assert_eq!(ids(&index.search("\"it is\"", None)), vec!["/zen#x"]);
}

#[test]
fn test_stopwords_beside_other_terms_are_ignored() {
    let index = handle(&[page("/cli", 0, &[("x", "CLI", "install globally")])]);
    // "the" is absent from the section but dropped from the query
    assert_eq!(ids(&index.search("install the cli", None)), vec!["/cli#x"]);
}

#[test]
fn test_case_folds() {
    let index = handle(&[page("/cfg", 0, &[("opts", "Options", "Set BaseURL first")])]);
    assert_eq!(ids(&index.search("baseurl", None)), vec!["/cfg#opts"]);
    assert_eq!(ids(&index.search("OPTIONS", None)), vec!["/cfg#opts"]);
}

#[test]
#[cfg(feature = "unicode-normalization")]
fn test_diacritics_fold() {
    let index = handle(&[page("/fr", 0, &[("cafe", "Café", "Le café est prêt")])]);
    assert_eq!(ids(&index.search("CAFE", None)), vec!["/fr#cafe"]);
    assert_eq!(ids(&index.search("pret", None)), vec!["/fr#cafe"]);
}

#[test]
fn test_unmatched_quote_is_literal() {
    let index = handle(&sample_docs());
    let response = index.search("\"install", None);
    assert!(!response.is_empty());
    assert!(response.diagnostic.is_none());
}

#[test]
fn test_overlong_query_is_truncated() {
    let index = handle(&sample_docs());
    let query = format!("install {}", "x".repeat(400));
    let response = index.search(&query, None);
    assert!(response.truncated);
    assert_eq!(response.query.chars().count(), 256);
    // the surviving prefix still requires the long token, which matches nothing
    assert!(response.is_empty());
}

#[test]
fn test_unknown_locale_falls_back() {
    let index = handle(&sample_docs());
    let generic = index.search("install", None);
    let unknown = index.search("install", Some("tlh-Piqd"));
    assert_eq!(ids(&generic), ids(&unknown));
}

#[test]
fn test_hits_carry_navigation_fields() {
    let index = handle(&sample_docs());
    let response = index.search("theme", None);
    let hit = response
        .hits
        .iter()
        .find(|h| h.section_id.as_str() == "/guide/theme#custom")
        .expect("theme section must match");
    assert_eq!(hit.url, "/guide/theme");
    assert_eq!(hit.anchor, "custom");
    assert_eq!(hit.title, "Custom Theme");
    assert_eq!(hit.href(), "/guide/theme#custom");
    assert!(hit.matched_terms.contains(&"theme".to_string()));
    assert!(!hit.snippet.highlights.is_empty());
}
