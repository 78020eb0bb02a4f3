//! Reproducible artifacts and stable results.

use super::common::{build, ids, page, sample_docs};
use docsift::binary::{decode_index, encode_index};
use docsift::config::{IndexSettings, QueryOptions};
use docsift::{build_index, IndexHandle};

#[test]
fn test_identical_content_gives_identical_bytes() {
    let a = encode_index(&build(&sample_docs()));
    let b = encode_index(&build(&sample_docs()));
    assert_eq!(a, b);
}

#[test]
fn test_input_order_does_not_matter() {
    let docs = sample_docs();
    let mut reversed = docs.clone();
    reversed.reverse();
    assert_eq!(encode_index(&build(&docs)), encode_index(&build(&reversed)));
}

#[test]
fn test_build_timestamp_is_an_input() {
    let docs = sample_docs();
    let early = build_index(&docs, IndexSettings::default(), 1).unwrap();
    let late = build_index(&docs, IndexSettings::default(), 2).unwrap();
    assert_ne!(encode_index(&early), encode_index(&late));

    let mut patched = late.clone();
    patched.set_built_at(1);
    assert_eq!(encode_index(&early), encode_index(&patched));
}

#[test]
fn test_decoded_index_searches_like_the_original() {
    let index = build(&sample_docs());
    let decoded = decode_index(&encode_index(&index)).unwrap();
    assert_eq!(index, decoded);

    let before = IndexHandle::new(index, QueryOptions::default());
    let after = IndexHandle::new(decoded, QueryOptions::default());
    for query in ["install", "config theme", "配置", "\"dev server\"", "npm 安装"] {
        assert_eq!(before.search(query, None), after.search(query, None), "query {:?}", query);
    }
}

#[test]
fn test_repeated_queries_agree() {
    let docs: Vec<_> = (0..20)
        .map(|i| {
            page(
                &format!("/p{}", i),
                i,
                &[("s", "Same Heading", "every page says the same thing about caching")],
            )
        })
        .collect();
    let index = IndexHandle::new(build(&docs), QueryOptions::default());
    let first = index.search("caching", None);
    for _ in 0..5 {
        assert_eq!(ids(&index.search("caching", None)), ids(&first));
    }
}

#[test]
fn test_reencoding_a_decoded_artifact_is_stable() {
    let bytes = encode_index(&build(&sample_docs()));
    let again = encode_index(&decode_index(&bytes).unwrap());
    assert_eq!(bytes, again);
}
