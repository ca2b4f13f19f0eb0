#![allow(dead_code)]
//! Shared helpers for `page-syntax` integration tests.

use page_syntax::*;

pub fn parse_ok(input: &str) -> Vec<Selector> {
    parse_selection(input)
        .unwrap()
        .into_iter()
        .map(|parsed| parsed.selector)
        .collect()
}

pub fn parse_one(input: &str) -> Selector {
    let mut selectors = parse_ok(input);
    assert_eq!(selectors.len(), 1, "expected one segment in {input:?}");
    selectors.remove(0)
}

pub fn parse_err(input: &str) -> SyntaxError {
    parse_selection(input).unwrap_err()
}

pub fn as_boolean(selector: &Selector) -> &Expr {
    match selector {
        Selector::BooleanMatch(expr) => expr,
        other => panic!("expected BooleanMatch, got: {other:?}"),
    }
}

pub fn as_and(expr: &Expr) -> (&Expr, &Expr) {
    match expr {
        Expr::And(left, right) => (left, right),
        other => panic!("expected And, got: {other:?}"),
    }
}

pub fn as_or(expr: &Expr) -> (&Expr, &Expr) {
    match expr {
        Expr::Or(left, right) => (left, right),
        other => panic!("expected Or, got: {other:?}"),
    }
}

pub fn as_not(expr: &Expr) -> &Expr {
    match expr {
        Expr::Not(inner) => inner,
        other => panic!("expected Not, got: {other:?}"),
    }
}

pub fn as_predicate(expr: &Expr) -> &Predicate {
    match expr {
        Expr::Predicate(predicate) => predicate,
        other => panic!("expected Predicate, got: {other:?}"),
    }
}

pub fn contains_is(expr: &Expr, expected: &str) {
    match as_predicate(expr) {
        Predicate::Contains { text, .. } => assert_eq!(text, expected),
        other => panic!("expected Contains, got: {other:?}"),
    }
}

pub fn as_range_pattern(selector: &Selector) -> (&Endpoint, &Endpoint) {
    match selector {
        Selector::RangePattern { start, end } => (start, end),
        other => panic!("expected RangePattern, got: {other:?}"),
    }
}

pub fn anchor_expr(endpoint: &Endpoint) -> &Expr {
    match &endpoint.anchor {
        Anchor::Matching(expr) => expr,
        other => panic!("expected Matching anchor, got: {other:?}"),
    }
}
