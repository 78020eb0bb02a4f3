// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Content extraction: rendered page → addressable sections.
//!
//! A section is a heading plus the text nodes that follow it until the next
//! heading. Text before the first heading becomes a lead section with an empty
//! anchor. Heading nesting is captured as a breadcrumb (page title first,
//! then each enclosing heading) rather than parent pointers, since that is
//! what both scoring and the result list need.
//!
//! Anchors come from the page when present. Missing anchors are slugified
//! from the heading text, and repeats get `-1`, `-2`... suffixes in document
//! order, so ids stay stable as long as the page structure does.

use std::collections::HashMap;

use super::document::{Page, PageNode};
use crate::types::{Document, Section, SectionId};

/// Text nodes accumulated under one heading.
struct PendingSection {
    anchor: String,
    level: u8,
    heading: String,
    breadcrumb: Vec<String>,
    body: Vec<String>,
    start: usize,
    end: usize,
}

impl PendingSection {
    fn finish(self, url: &str) -> Section {
        Section {
            id: SectionId::new(url, &self.anchor),
            anchor: self.anchor,
            level: self.level,
            heading: self.heading,
            breadcrumb: self.breadcrumb,
            body: self.body.join("\n"),
            source_range: self.start..self.end,
        }
    }
}

/// Split a page into sections.
///
/// `order` is the page's navigation position; `default_locale` applies when
/// the page doesn't carry one.
pub fn extract_document(page: &Page, order: u32, default_locale: &str) -> Document {
    let title = page_title(page);
    let mut sections = Vec::new();
    let mut stack: Vec<(u8, String)> = Vec::new();
    let mut seen_anchors: HashMap<String, usize> = HashMap::new();
    let mut current: Option<PendingSection> = None;

    for node in &page.nodes {
        match node {
            PageNode::Heading {
                level,
                text,
                anchor,
                range,
            } => {
                if let Some(done) = current.take() {
                    sections.push(done.finish(&page.url));
                }
                let level = (*level).clamp(1, 6);
                let heading = text.trim().to_string();

                while stack.last().is_some_and(|(l, _)| *l >= level) {
                    stack.pop();
                }
                let breadcrumb = breadcrumb(&title, &stack, &heading);
                stack.push((level, heading.clone()));

                let base = match anchor.as_deref().map(str::trim) {
                    Some(a) if !a.is_empty() => a.to_string(),
                    _ => slugify(&heading),
                };
                let anchor = dedupe_anchor(base, &mut seen_anchors);

                current = Some(PendingSection {
                    anchor,
                    level,
                    heading,
                    breadcrumb,
                    body: Vec::new(),
                    start: range.start,
                    end: range.end,
                });
            }
            PageNode::Text { text, range } => {
                if text.trim().is_empty() {
                    continue;
                }
                let section = current.get_or_insert_with(|| PendingSection {
                    anchor: String::new(),
                    level: 0,
                    heading: title.clone(),
                    breadcrumb: Vec::new(),
                    body: Vec::new(),
                    start: range.start,
                    end: range.end,
                });
                section.body.push(text.trim().to_string());
                section.start = section.start.min(range.start);
                section.end = section.end.max(range.end);
            }
        }
    }
    if let Some(done) = current.take() {
        sections.push(done.finish(&page.url));
    }

    Document {
        url: page.url.clone(),
        locale: page
            .locale
            .clone()
            .unwrap_or_else(|| default_locale.to_string()),
        title,
        order,
        sections,
    }
}

fn page_title(page: &Page) -> String {
    if let Some(title) = page.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }
    page.nodes
        .iter()
        .find_map(|node| match node {
            PageNode::Heading { level: 1, text, .. } if !text.trim().is_empty() => {
                Some(text.trim().to_string())
            }
            _ => None,
        })
        .unwrap_or_else(|| page.url.clone())
}

/// Page title followed by enclosing headings, without consecutive repeats
/// and without the section's own heading at the end.
fn breadcrumb(title: &str, stack: &[(u8, String)], own: &str) -> Vec<String> {
    let mut crumbs: Vec<String> = Vec::with_capacity(stack.len() + 1);
    for text in std::iter::once(title).chain(stack.iter().map(|(_, t)| t.as_str())) {
        if crumbs.last().map(String::as_str) != Some(text) {
            crumbs.push(text.to_string());
        }
    }
    if stack.is_empty() && crumbs.last().map(String::as_str) == Some(own) {
        crumbs.pop();
    }
    crumbs
}

/// Generated anchors are recorded too, so a later heading whose slug is
/// already taken by a suffix ("Step", "Step", "Step 1") bumps again.
fn dedupe_anchor(base: String, seen: &mut HashMap<String, usize>) -> String {
    let Some(&count) = seen.get(&base) else {
        seen.insert(base.clone(), 1);
        return base;
    };
    let mut n = count;
    let mut candidate = format!("{}-{}", base, n);
    while seen.contains_key(&candidate) {
        n += 1;
        candidate = format!("{}-{}", base, n);
    }
    seen.insert(base, n + 1);
    seen.insert(candidate.clone(), 1);
    candidate
}

/// Heading text → URL fragment: lowercase alphanumerics (CJK kept), dashes
/// for whitespace, everything else dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug.to_string()
    }
}
