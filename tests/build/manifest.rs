//! Manifest reading and validation.

use std::fs;
use std::path::Path;

use docsift::build::read_manifest;
use docsift::Error;
use tempfile::TempDir;

fn with_manifest(json: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("manifest.json"), json).unwrap();
    dir
}

#[test]
fn test_missing_manifest_is_read_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(read_manifest(dir.path()), Err(Error::Read { .. })));
}

#[test]
fn test_malformed_manifest_is_json_error() {
    let dir = with_manifest("{\"version\": 1, \"documents\": [");
    match read_manifest(dir.path()) {
        Err(Error::Json { path, .. }) => assert_eq!(path, dir.path().join("manifest.json")),
        other => panic!("expected a JSON error, got {:?}", other),
    }
}

#[test]
fn test_version_zero_rejected() {
    let dir = with_manifest(r#"{"version": 0, "documents": []}"#);
    assert!(matches!(read_manifest(dir.path()), Err(Error::Config(_))));
}

#[test]
fn test_inverted_field_weights_rejected() {
    let dir = with_manifest(
        r#"{"version": 1, "documents": [], "search": {"fieldWeights": {"title": 1, "heading": 2, "body": 3}}}"#,
    );
    match read_manifest(dir.path()) {
        Err(Error::Config(message)) => assert!(message.contains("title > heading > body")),
        other => panic!("expected a config error, got {:?}", other),
    }
}

#[test]
fn test_bm25_out_of_range_rejected() {
    let dir = with_manifest(r#"{"version": 1, "documents": [], "search": {"bm25": {"k1": 1.2, "b": 1.5}}}"#);
    assert!(matches!(read_manifest(dir.path()), Err(Error::Config(_))));
}

#[test]
fn test_partial_search_config_keeps_defaults() {
    let dir = with_manifest(r#"{"version": 1, "documents": ["a.json"], "search": {"topK": 3}}"#);
    let manifest = read_manifest(dir.path()).unwrap();
    assert_eq!(manifest.search.top_k, 3);
    assert_eq!(manifest.search.debounce_ms, 120);
    assert!(manifest.search.stopwords.iter().any(|w| w == "the"));
    assert_eq!(manifest.documents, vec!["a.json"]);
}

#[test]
fn test_custom_stopwords_reach_index_settings() {
    let dir = with_manifest(r#"{"version": 1, "documents": [], "search": {"stopwords": ["Foo", "bar"]}}"#);
    let settings = read_manifest(Path::new(dir.path())).unwrap().search.index_settings();
    assert!(settings.stopwords.contains("bar"));
    assert!(!settings.stopwords.contains("the"));
}
