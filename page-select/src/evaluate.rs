use crate::{PageFacts, PageFactsProvider};
use memchr::memmem;
use page_syntax::{Expr, Predicate};
use rayon::prelude::*;

/// Evaluates `expr` against one page. Never fails: regexes are compiled while
/// parsing.
pub fn evaluate(expr: &Expr, page: &PageFacts) -> bool {
    match expr {
        Expr::Predicate(predicate) => predicate_matches(predicate, page),
        Expr::And(left, right) => evaluate(left, page) && evaluate(right, page),
        Expr::Or(left, right) => evaluate(left, page) || evaluate(right, page),
        Expr::Not(inner) => !evaluate(inner, page),
    }
}

pub fn predicate_matches(predicate: &Predicate, page: &PageFacts) -> bool {
    match predicate {
        Predicate::Contains {
            text,
            case_sensitive: true,
        } => memmem::find(page.text.as_bytes(), text.as_bytes()).is_some(),
        Predicate::Contains {
            text,
            case_sensitive: false,
        } => page.text.to_lowercase().contains(&text.to_lowercase()),
        Predicate::Regex(pattern) => pattern.is_match(&page.text),
        Predicate::LineStarts {
            text,
            case_sensitive,
        } => line_starts_with(&page.text, text, *case_sensitive),
        Predicate::Type(kind) => page.content_type == *kind,
        Predicate::Size(comparison) => comparison.matches(page.byte_size),
        Predicate::All => true,
        Predicate::EmptyPage => page.text.trim().is_empty(),
    }
}

fn line_starts_with(text: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        return text
            .lines()
            .any(|line| line.trim_start().starts_with(needle));
    }
    let needle = needle.to_lowercase();
    text.lines()
        .any(|line| line.trim_start().to_lowercase().starts_with(&needle))
}

/// Ascending 1-based indices of every page satisfying `expr`.
pub fn matching_pages<P: PageFactsProvider + ?Sized>(expr: &Expr, provider: &P) -> Vec<usize> {
    provider
        .pages()
        .par_iter()
        .enumerate()
        .filter(|(_, page)| evaluate(expr, page))
        .map(|(idx, _)| idx + 1)
        .collect()
}
