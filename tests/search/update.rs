//! Incremental updates must land exactly where a full rebuild would.

use super::common::{assert_index_well_formed, build, handle, ids, make_section, page, sample_docs};
use docsift::binary::encode_index;
use docsift::{Change, Document, SectionId, UpdateSummary};

fn getting_started(docs: &[Document]) -> Document {
    docs.iter()
        .find(|d| d.url == "/guide/getting-started")
        .cloned()
        .unwrap()
}

#[test]
fn test_edited_section_matches_rebuild() {
    let docs = sample_docs();
    let mut index = build(&docs);

    let mut edited = getting_started(&docs);
    edited.sections[0].body = "Install the CLI with yarn instead.".to_string();
    let summary = index.update_document(&edited).unwrap();
    assert_eq!(
        summary,
        UpdateSummary {
            removed: 1,
            inserted: 1,
            unchanged: 1
        }
    );

    let mut expected = docs.clone();
    expected[0] = edited;
    let rebuilt = build(&expected);
    assert_eq!(index, rebuilt);
    assert_eq!(encode_index(&index), encode_index(&rebuilt));
    assert_index_well_formed(&index);
}

#[test]
fn test_removed_content_is_no_longer_found() {
    let docs = sample_docs();
    let index = handle(&docs);
    let target = "/guide/getting-started#install";
    assert!(ids(&index.search("npm", None)).contains(&target.to_string()));

    let mut edited = getting_started(&docs);
    edited.sections[0].body = "Install the CLI.".to_string();
    index.writer().unwrap().update_document(&edited).unwrap();

    assert!(!ids(&index.search("npm", None)).contains(&target.to_string()));
    assert!(ids(&index.search("npm", None)).contains(&"/zh/guide/start#install".to_string()));
}

#[test]
fn test_unrelated_postings_are_untouched() {
    let docs = sample_docs();
    let before = build(&docs);
    let mut after = before.clone();

    let mut edited = getting_started(&docs);
    edited.sections[1].body = "Edit the settings file.".to_string();
    after.update_document(&edited).unwrap();

    // every posting for a section outside the edited page is unchanged
    let other = SectionId::new("/guide/theme", "custom");
    for term in before.terms() {
        let old = before.postings(term).unwrap().iter().find(|p| p.section == other);
        let new = after
            .postings(term)
            .and_then(|list| list.iter().find(|p| p.section == other));
        assert_eq!(old, new, "posting for {:?} changed", term);
    }
    assert_eq!(before.section(&other), after.section(&other));
}

#[test]
fn test_scores_match_rebuild_after_update() {
    let docs = sample_docs();
    let updated = handle(&docs);
    let mut edited = getting_started(&docs);
    edited.sections.push(make_section(
        "/guide/getting-started",
        "deploy",
        "Deploy",
        "Deploy the site with the theme config.",
    ));
    updated.writer().unwrap().update_document(&edited).unwrap();

    let mut expected = docs.clone();
    expected[0] = edited;
    let rebuilt = handle(&expected);

    for query in ["theme", "config", "deploy", "site"] {
        assert_eq!(updated.search(query, None), rebuilt.search(query, None), "query {:?}", query);
    }
}

#[test]
fn test_unseen_document_is_inserted() {
    let docs = sample_docs();
    let mut index = build(&docs);
    let fresh = page("/guide/faq", 3, &[("cache", "Caching", "Clear the cache when stuck")]);

    let summary = index.update_document(&fresh).unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.removed, 0);
    assert!(index.has_document("/guide/faq"));

    let mut expected = docs;
    expected.push(fresh);
    assert_eq!(index, build(&expected));
}

#[test]
fn test_remove_document_matches_rebuild() {
    let docs = sample_docs();
    let mut index = build(&docs);
    let summary = index.remove_document("/guide/theme");
    assert_eq!(summary.removed, 1);
    assert!(!index.has_document("/guide/theme"));

    let remaining: Vec<Document> = docs.into_iter().filter(|d| d.url != "/guide/theme").collect();
    assert_eq!(index, build(&remaining));
    assert_index_well_formed(&index);
}

#[test]
fn test_empty_document_removes_page() {
    let docs = sample_docs();
    let mut index = build(&docs);
    let mut emptied = getting_started(&docs);
    emptied.sections.clear();
    index.update_document(&emptied).unwrap();
    assert!(!index.has_document("/guide/getting-started"));
    assert_eq!(index.stats().doc_count, 2);
}

#[test]
fn test_unchanged_document_is_a_no_op() {
    let docs = sample_docs();
    let mut index = build(&docs);
    let before = index.clone();
    let summary = index.update_document(&docs[1]).unwrap();
    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.inserted, 0);
    assert_eq!(index, before);
}

#[test]
fn test_batch_applies_through_writer() {
    let docs = sample_docs();
    let index = handle(&docs);
    let fresh = page("/guide/faq", 3, &[("cache", "Caching", "Clear the cache when stuck")]);

    let summary = index
        .writer()
        .unwrap()
        .apply(&[
            Change::Upsert(fresh.clone()),
            Change::Remove("/guide/theme".to_string()),
        ])
        .unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.removed, 1);

    let mut expected: Vec<Document> = docs.into_iter().filter(|d| d.url != "/guide/theme").collect();
    expected.push(fresh);
    assert_eq!(*index.snapshot(), build(&expected));
}
