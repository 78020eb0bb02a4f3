//! Ranking: field weights, length normalization, tie-breaks, top-K.

use super::common::{build, handle, ids, page};
use docsift::build::extract_document;
use docsift::config::QueryOptions;
use docsift::testing::make_page;
use docsift::IndexHandle;

#[test]
fn test_title_match_ranks_strictly_higher() {
    let index = handle(&[
        page("/a", 1, &[("x", "Overview", "alpha setup steps")]),
        page("/b", 0, &[("y", "Alpha", "alpha setup steps")]),
    ]);
    let response = index.search("alpha", None);
    assert_eq!(ids(&response), vec!["/b#y", "/a#x"]);
    assert!(response.hits[0].score > response.hits[1].score);
}

#[test]
fn test_breadcrumb_match_beats_body_only() {
    // both pages mention "plugins" once in the body; only one sits under a
    // "Plugins" heading
    let nested = extract_document(
        &make_page("/api", "API", &[(2, "Plugins", ""), (3, "Hooks", "hooks for plugins")]),
        0,
        "en",
    );
    let flat = extract_document(&make_page("/misc", "Misc", &[(2, "Hooks", "hooks for plugins")]), 1, "en");
    let index = handle(&[nested, flat]);
    let response = index.search("hooks plugins", None);
    assert_eq!(ids(&response), vec!["/api#hooks", "/misc#hooks"]);
}

#[test]
fn test_shorter_body_ranks_higher() {
    let long = format!("config {}", "filler words here ".repeat(30));
    let index = handle(&[
        page("/a", 0, &[("long", "Notes", &long)]),
        page("/b", 1, &[("short", "Notes", "config only")]),
    ]);
    assert_eq!(ids(&index.search("config", None)), vec!["/b#short", "/a#long"]);
}

#[test]
fn test_ties_break_by_navigation_order() {
    // ids sort /a < /b but /b comes first in navigation
    let index = handle(&[
        page("/a", 1, &[("s", "Same", "identical body text")]),
        page("/b", 0, &[("s", "Same", "identical body text")]),
    ]);
    let response = index.search("identical", None);
    assert_eq!(response.hits[0].score, response.hits[1].score);
    assert_eq!(ids(&response), vec!["/b#s", "/a#s"]);
}

#[test]
fn test_ties_within_page_follow_section_order() {
    let index = handle(&[page(
        "/p",
        0,
        &[("z", "Same", "repeated text"), ("a", "Same", "repeated text")],
    )]);
    assert_eq!(ids(&index.search("repeated", None)), vec!["/p#z", "/p#a"]);
}

#[test]
fn test_top_k_keeps_best() {
    let docs: Vec<_> = (0..30)
        .map(|i| {
            let body = format!("widget {}", "padding ".repeat(i));
            page(&format!("/p{:02}", i), i as u32, &[("w", "Widgets", &body)])
        })
        .collect();
    let options = QueryOptions {
        top_k: 5,
        ..QueryOptions::default()
    };
    let index = IndexHandle::new(build(&docs), options);
    let response = index.search("widget", None);
    assert_eq!(ids(&response), vec!["/p00#w", "/p01#w", "/p02#w", "/p03#w", "/p04#w"]);
}

#[test]
fn test_scores_are_descending() {
    let index = handle(&docsift::testing::sample_docs());
    let response = index.search("config", None);
    assert!(response.hits.len() >= 2);
    for pair in response.hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}
