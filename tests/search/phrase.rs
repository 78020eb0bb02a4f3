//! Quoted phrase semantics.

use super::common::{handle, ids, page};

fn index() -> docsift::IndexHandle {
    handle(&[
        page(
            "/guide",
            0,
            &[
                ("a", "Intro", "A quick start for the impatient"),
                ("b", "Later", "Start quickly, or start quick and slow"),
                ("c", "Split", "quick notes. start here"),
            ],
        ),
        page("/field", 1, &[("d", "Quick", "start the engine")]),
    ])
}

#[test]
fn test_phrase_requires_adjacency() {
    let index = index();
    assert_eq!(ids(&index.search("quick start", None)).len(), 4);
    assert_eq!(ids(&index.search("\"quick start\"", None)), vec!["/guide#a"]);
}

#[test]
fn test_phrase_order_matters() {
    let index = index();
    assert_eq!(ids(&index.search("\"start quick\"", None)), vec!["/guide#b"]);
}

#[test]
fn test_phrase_never_spans_fields() {
    // "Quick" is the heading and "start" opens the body: adjacent text, different fields
    let index = index();
    assert!(!ids(&index.search("\"quick start\"", None)).contains(&"/field#d".to_string()));
}

#[test]
fn test_punctuation_does_not_break_adjacency() {
    // positions ignore punctuation, so "notes. start" is adjacent
    let index = index();
    assert_eq!(ids(&index.search("\"notes start\"", None)), vec!["/guide#c"]);
}

#[test]
fn test_stopwords_keep_their_slot() {
    let index = handle(&[page(
        "/cli",
        0,
        &[("x", "CLI", "install the cli globally"), ("y", "Other", "install cli tools")],
    )]);
    assert_eq!(ids(&index.search("\"install the cli\"", None)), vec!["/cli#x"]);
    assert_eq!(ids(&index.search("\"install cli\"", None)), vec!["/cli#y"]);
}

#[test]
fn test_phrase_combines_with_terms() {
    let index = index();
    assert_eq!(ids(&index.search("\"quick start\" impatient", None)), vec!["/guide#a"]);
    assert!(index.search("\"quick start\" slow", None).is_empty());
}

#[test]
fn test_smart_quotes_delimit_phrases() {
    let index = index();
    assert_eq!(ids(&index.search("“quick start”", None)), vec!["/guide#a"]);
}

#[test]
fn test_cjk_phrase() {
    let index = handle(&[
        page("/zh/a", 0, &[("x", "指南", "编程指南")]),
        page("/zh/b", 1, &[("y", "其他", "指南编程")]),
    ]);
    assert_eq!(ids(&index.search("\"编程指南\"", Some("zh-CN"))), vec!["/zh/a#x"]);
}
