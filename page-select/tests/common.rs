#![allow(dead_code)]
//! Shared helpers for `page-select` integration tests.

use page_select::*;

/// Text-only document, one page per entry, sized by text length.
pub fn text_document(texts: &[&str]) -> Document {
    texts
        .iter()
        .map(|text| PageFacts::new(text.len() as u64, ContentKind::Text, *text))
        .collect()
}

/// `count` pages whose text is `page N`.
pub fn numbered_document(count: usize) -> Document {
    (1..=count)
        .map(|n| PageFacts::new(1024, ContentKind::Text, format!("page {n}")))
        .collect()
}

/// Document whose pages contain `marker` at the given 1-based indices.
pub fn marked_document(count: usize, marks: &[(&str, &[usize])]) -> Document {
    (1..=count)
        .map(|n| {
            let text = marks
                .iter()
                .filter(|(_, pages)| pages.contains(&n))
                .map(|(marker, _)| *marker)
                .collect::<Vec<_>>()
                .join("\n");
            PageFacts::new(text.len() as u64, ContentKind::Text, text)
        })
        .collect()
}

pub fn respect_groups() -> SelectOptions {
    SelectOptions {
        grouping: GroupingMode::RespectGroups,
        ..Default::default()
    }
}

pub fn select_ok(expression: &str, doc: &Document, options: &SelectOptions) -> Vec<Vec<usize>> {
    select_pages(expression, doc, options)
        .unwrap_or_else(|err| panic!("selecting {expression:?} failed: {err}"))
        .page_groups()
}

pub fn select_err(expression: &str, doc: &Document, options: &SelectOptions) -> SelectError {
    match select_pages(expression, doc, options) {
        Ok(result) => panic!("expected error for {expression:?}, got: {result:?}"),
        Err(err) => err,
    }
}

pub fn as_range_error(err: &SelectError) -> &RangeError {
    match err {
        SelectError::Range(range) => range,
        other => panic!("expected RangeError, got: {other:?}"),
    }
}

pub fn as_syntax_error(err: &SelectError) -> &SyntaxError {
    match err {
        SelectError::Syntax(syntax) => syntax,
        other => panic!("expected SyntaxError, got: {other:?}"),
    }
}
