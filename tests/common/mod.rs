//! Shared test utilities and fixtures.

#![allow(dead_code)]

use docsift::config::{IndexSettings, QueryOptions};
use docsift::{build_index, Document, IndexHandle, InvertedIndex, SearchResponse};

// Re-export canonical test utilities from docsift::testing
pub use docsift::testing::{make_doc, make_meta, make_page, make_section, sample_docs, sample_index};

pub fn build(docs: &[Document]) -> InvertedIndex {
    build_index(docs, IndexSettings::default(), 0).expect("test docs must build")
}

pub fn handle(docs: &[Document]) -> IndexHandle {
    IndexHandle::new(build(docs), QueryOptions::default())
}

/// Section ids of the hits, in rank order.
pub fn ids(response: &SearchResponse) -> Vec<String> {
    response.hits.iter().map(|h| h.section_id.to_string()).collect()
}

/// One page with one section per `(anchor, heading, body)`.
pub fn page(url: &str, order: u32, sections: &[(&str, &str, &str)]) -> Document {
    make_doc(
        url,
        order,
        sections
            .iter()
            .map(|(anchor, heading, body)| make_section(url, anchor, heading, body))
            .collect(),
    )
}

/// Check the structural invariants every index must satisfy.
pub fn assert_index_well_formed(index: &InvertedIndex) {
    let terms: Vec<&str> = index.terms().collect();
    assert!(terms.windows(2).all(|w| w[0] < w[1]), "dictionary must be sorted");

    for term in &terms {
        let list = index.postings(term).unwrap();
        assert!(!list.is_empty(), "term {:?} has an empty postings list", term);
        assert!(
            list.windows(2).all(|w| w[0].section < w[1].section),
            "postings for {:?} must be strictly sorted by section",
            term
        );
        for posting in list {
            assert!(index.section(&posting.section).is_some(), "dangling posting for {}", posting.section);
            assert!(posting.total_freq() > 0);
            assert_eq!(posting.total_freq() as usize, posting.positions.len());
            assert!(posting.positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    let stats = index.stats();
    assert_eq!(stats.section_count as usize, index.section_count());
    let mut totals = [0u64; 3];
    for meta in index.sections() {
        for (total, len) in totals.iter_mut().zip(meta.field_lens.0) {
            *total += len as u64;
        }
    }
    assert_eq!(totals, stats.total_lens.0);
}
