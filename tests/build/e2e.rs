//! End-to-end tests for the build workflow.

use std::fs;
use std::path::Path;

use docsift::binary::{decode_index, encode_index};
use docsift::build::{build_from_dir, run_build, run_update, Page};
use docsift::testing::make_page;
use docsift::{load_index, search, Error};
use tempfile::TempDir;

fn write_page(dir: &Path, file: &str, page: &Page) {
    fs::write(dir.join(file), serde_json::to_string(page).unwrap()).unwrap();
}

/// A two-language site: English guide, Chinese guide, and an API page.
fn write_site(dir: &Path) {
    write_page(
        dir,
        "guide.json",
        &make_page(
            "/guide/start",
            "Getting Started",
            &[
                (2, "Install", "Install the CLI with npm."),
                (2, "Configuration", "Edit the config file to change the theme."),
            ],
        ),
    );
    let mut zh = make_page(
        "/zh/guide/start",
        "快速开始",
        &[(2, "安装", "使用 npm 安装 VitePress。"), (2, "配置", "编辑配置文件。")],
    );
    zh.locale = Some("zh-CN".to_string());
    write_page(dir, "zh.json", &zh);
    write_page(
        dir,
        "api.json",
        &make_page("/api", "API", &[(2, "Plugins", ""), (3, "Hooks", "hooks run after config loads")]),
    );
    fs::write(
        dir.join("manifest.json"),
        r#"{
            "version": 1,
            "documents": ["guide.json", "zh.json", "api.json"],
            "search": {"topK": 5},
            "translations": {"zh-CN": {"buttonText": "搜索文档"}}
        }"#,
    )
    .unwrap();
}

#[test]
fn test_build_then_search() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_site(input.path());

    let built = run_build(input.path(), &output.path().join("dist"), 0).unwrap();
    assert_eq!(built.documents, 3);
    assert!(built.index_path.starts_with(output.path().join("dist")));
    let translations = fs::read_to_string(built.translations_path.unwrap()).unwrap();
    assert!(translations.contains("搜索文档"));

    let handle = load_index(&fs::read(&built.index_path).unwrap()).unwrap();
    let response = search(&handle, "配置文件", Some("zh-CN"));
    assert_eq!(response.hits[0].href(), "/zh/guide/start#配置");

    let response = search(&handle, "hooks", None);
    assert_eq!(response.hits[0].breadcrumb, vec!["API", "Plugins"]);
}

#[test]
fn test_rebuilds_are_byte_identical() {
    let input = TempDir::new().unwrap();
    write_site(input.path());
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    let a = run_build(input.path(), first.path(), 42).unwrap();
    let b = run_build(input.path(), second.path(), 42).unwrap();
    assert_eq!(a.index_path.file_name(), b.index_path.file_name());
    assert_eq!(fs::read(a.index_path).unwrap(), fs::read(b.index_path).unwrap());
}

#[test]
fn test_update_equals_rebuild() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_site(input.path());
    let built = run_build(input.path(), output.path(), 0).unwrap();

    // re-render one page with new content
    write_page(
        input.path(),
        "guide.json",
        &make_page(
            "/guide/start",
            "Getting Started",
            &[
                (2, "Install", "Install the CLI with yarn."),
                (2, "Configuration", "Edit the config file to change the theme."),
            ],
        ),
    );
    let updated = run_update(&built.index_path, input.path(), &["guide.json".to_string()], &[], 0).unwrap();
    assert_eq!(updated.summary.inserted, 1);
    assert_eq!(updated.summary.unchanged, 1);
    assert_ne!(updated.index_path, built.index_path);

    let (_, rebuilt) = build_from_dir(input.path(), 0).unwrap();
    assert_eq!(fs::read(&updated.index_path).unwrap(), encode_index(&rebuilt));

    let handle = load_index(&fs::read(&updated.index_path).unwrap()).unwrap();
    assert!(search(&handle, "yarn", None).hits.iter().any(|h| h.anchor == "install"));
    assert!(!search(&handle, "npm", None)
        .hits
        .iter()
        .any(|h| h.url == "/guide/start"));
}

#[test]
fn test_update_failure_writes_nothing() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_site(input.path());
    let built = run_build(input.path(), output.path(), 0).unwrap();

    let result = run_update(&built.index_path, input.path(), &["missing.json".to_string()], &[], 0);
    assert!(matches!(result, Err(Error::Read { .. })));
    let artifacts: Vec<_> = fs::read_dir(output.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|x| x == "docsift"))
        .collect();
    assert_eq!(artifacts.len(), 1);
}

#[test]
fn test_missing_page_fails_build() {
    let input = TempDir::new().unwrap();
    write_site(input.path());
    fs::remove_file(input.path().join("api.json")).unwrap();
    let output = TempDir::new().unwrap();
    match run_build(input.path(), output.path(), 0) {
        Err(Error::Read { path, .. }) => assert!(path.ends_with("api.json")),
        other => panic!("expected a read error, got {:?}", other.map(|o| o.index_path)),
    }
}

#[test]
fn test_artifact_keeps_manifest_locale_and_timestamp() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_site(input.path());
    let built = run_build(input.path(), output.path(), 1_700_000_000).unwrap();
    let index = decode_index(&fs::read(built.index_path).unwrap()).unwrap();
    assert_eq!(index.locale(), "en");
    assert_eq!(index.built_at(), 1_700_000_000);
}

#[test]
fn test_repeated_headings_build() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_page(
        input.path(),
        "tutorial.json",
        &make_page(
            "/tutorial",
            "Tutorial",
            &[
                (2, "Step", "create the project"),
                (2, "Step", "add a theme"),
                (2, "Step 1", "deploy the site"),
            ],
        ),
    );
    fs::write(
        input.path().join("manifest.json"),
        r#"{"version": 1, "documents": ["tutorial.json"]}"#,
    )
    .unwrap();

    let built = run_build(input.path(), output.path(), 0).unwrap();
    let handle = load_index(&fs::read(&built.index_path).unwrap()).unwrap();
    let hit = &search(&handle, "deploy", None).hits[0];
    assert_eq!(hit.href(), "/tutorial#step-1-1");
    assert_eq!(search(&handle, "theme", None).hits[0].anchor, "step-1");
}
