//! Generation-based cancellation.

use std::thread;

use super::common::{build, handle, page, sample_docs};
use docsift::config::QueryOptions;
use docsift::{cancel, IndexHandle, QueryGenerations, QueryHandle};

fn large_index() -> IndexHandle {
    let docs: Vec<_> = (0..2_000)
        .map(|i| {
            page(
                &format!("/docs/p{:04}", i),
                i,
                &[
                    ("a", "Routing", "shared routing words appear on every page"),
                    ("b", "Markdown", "markdown extensions and shared words"),
                ],
            )
        })
        .collect();
    IndexHandle::new(build(&docs), QueryOptions::default())
}

#[test]
fn test_superseded_query_reports_cancelled() {
    let index = handle(&sample_docs());
    let generations = QueryGenerations::new();
    let old = generations.begin();
    let _new = generations.begin();

    let response = index.search_with("install", None, &old);
    assert!(response.cancelled);
    assert!(response.hits.is_empty());
    assert!(response.diagnostic.is_none());
}

#[test]
fn test_current_query_runs_to_completion() {
    let index = handle(&sample_docs());
    let generations = QueryGenerations::new();
    let _old = generations.begin();
    let current = generations.begin();

    let response = index.search_with("install", None, &current);
    assert!(!response.cancelled);
    assert!(!response.hits.is_empty());
}

#[test]
fn test_explicit_cancel() {
    let index = handle(&sample_docs());
    let query = QueryGenerations::new().begin();
    cancel(&query);
    assert!(index.search_with("config", None, &query).cancelled);
}

#[test]
fn test_cancelling_a_stale_handle_is_harmless() {
    let index = handle(&sample_docs());
    let generations = QueryGenerations::new();
    let stale = generations.begin();
    let current = generations.begin();

    cancel(&stale);
    cancel(&stale);
    assert!(!current.is_cancelled());
    assert!(!index.search_with("config", None, &current).cancelled);
}

#[test]
fn test_queries_with_no_candidates_finish_empty() {
    // nothing to cancel: the query ends before any check
    let index = handle(&sample_docs());
    let query = QueryHandle::detached();
    cancel(&query);
    let response = index.search_with("zzzz", None, &query);
    assert!(response.hits.is_empty());
    assert!(response.diagnostic.is_none());
}

#[test]
fn test_cancel_from_another_thread_is_all_or_nothing() {
    let index = large_index();
    let full = index.search("shared words", None);
    assert!(!full.cancelled);
    assert_eq!(full.hits.len(), QueryOptions::default().top_k);

    for _ in 0..20 {
        let generations = QueryGenerations::new();
        let query = generations.begin();
        let response = thread::scope(|s| {
            let worker = s.spawn(|| index.search_with("shared words", None, &query));
            s.spawn(|| generations.invalidate());
            worker.join().unwrap()
        });
        if response.cancelled {
            assert!(response.hits.is_empty());
        } else {
            assert_eq!(response.hits, full.hits);
        }
    }
}

#[test]
fn test_cancellation_does_not_disturb_other_sessions() {
    let index = large_index();
    let a = QueryGenerations::new();
    let b = QueryGenerations::new();
    let qa = a.begin();
    let qb = b.begin();
    a.invalidate();

    assert!(index.search_with("routing", None, &qa).cancelled);
    let response = index.search_with("routing", None, &qb);
    assert!(!response.cancelled);
    assert!(!response.hits.is_empty());
}
