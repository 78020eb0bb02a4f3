// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use crate::build::document::{Page, PageNode};
use crate::config::IndexSettings;
use crate::index::{build_index, InvertedIndex};
use crate::types::{Document, FieldLengths, Section, SectionId, SectionMeta};

/// Timestamp baked into every sample artifact.
pub const SAMPLE_BUILT_AT: u64 = 1_700_000_000;

/// Create a level-2 section with no breadcrumb.
pub fn make_section(url: &str, anchor: &str, heading: &str, body: &str) -> Section {
    Section {
        id: SectionId::new(url, anchor),
        anchor: anchor.to_string(),
        level: 2,
        heading: heading.to_string(),
        breadcrumb: vec![],
        body: body.to_string(),
        source_range: 0..body.len(),
    }
}

/// Create an English document titled after its url.
pub fn make_doc(url: &str, order: u32, sections: Vec<Section>) -> Document {
    Document {
        url: url.to_string(),
        locale: "en".to_string(),
        title: url.to_string(),
        order,
        sections,
    }
}

/// Create section metadata directly, bypassing the builder.
pub fn make_meta(url: &str, anchor: &str, heading: &str, breadcrumb: &[&str], body: &str) -> SectionMeta {
    SectionMeta {
        id: SectionId::new(url, anchor),
        url: url.to_string(),
        anchor: anchor.to_string(),
        heading: heading.to_string(),
        doc_title: url.to_string(),
        breadcrumb: breadcrumb.iter().map(|s| s.to_string()).collect(),
        level: 2,
        locale: "en".to_string(),
        doc_order: 0,
        position: 0,
        field_lens: FieldLengths::default(),
        source_range: 0..body.len(),
        body: body.to_string(),
    }
}

/// Create a rendered page from (level, heading, body) triples.
///
/// Ranges are laid out as if headings and bodies were concatenated.
pub fn make_page(url: &str, title: &str, sections: &[(u8, &str, &str)]) -> Page {
    let mut nodes = Vec::new();
    let mut offset = 0;
    for &(level, heading, body) in sections {
        nodes.push(PageNode::Heading {
            level,
            text: heading.to_string(),
            anchor: None,
            range: offset..offset + heading.len(),
        });
        offset += heading.len() + 1;
        if !body.is_empty() {
            nodes.push(PageNode::Text {
                text: body.to_string(),
                range: offset..offset + body.len(),
            });
            offset += body.len() + 1;
        }
    }
    Page {
        url: url.to_string(),
        locale: None,
        title: Some(title.to_string()),
        nodes,
    }
}

/// A small bilingual docs site.
pub fn sample_docs() -> Vec<Document> {
    let zh = |mut doc: Document| {
        doc.locale = "zh-CN".to_string();
        doc
    };
    vec![
        make_doc(
            "/guide/getting-started",
            0,
            vec![
                make_section(
                    "/guide/getting-started",
                    "install",
                    "Install",
                    "Install the CLI with npm. Then run the dev server to preview the site.",
                ),
                make_section(
                    "/guide/getting-started",
                    "config",
                    "Configuration",
                    "Edit the config file to change the theme and the site title.",
                ),
            ],
        ),
        make_doc(
            "/guide/theme",
            1,
            vec![make_section(
                "/guide/theme",
                "custom",
                "Custom Theme",
                "Extend the default theme. The theme config lives in the config directory.",
            )],
        ),
        zh(make_doc(
            "/zh/guide/start",
            2,
            vec![
                make_section(
                    "/zh/guide/start",
                    "install",
                    "安装",
                    "使用 npm 安装 VitePress。运行开发服务器预览站点。",
                ),
                make_section(
                    "/zh/guide/start",
                    "config",
                    "配置",
                    "编辑配置文件修改主题和站点标题。",
                ),
            ],
        )),
    ]
}

/// The sample site built with default settings.
pub fn sample_index() -> InvertedIndex {
    match build_index(&sample_docs(), IndexSettings::default(), SAMPLE_BUILT_AT) {
        Ok(index) => index,
        Err(e) => panic!("sample docs must build: {}", e),
    }
}
