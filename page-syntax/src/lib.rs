//! # Page-selection expression parser
//!
//! `page-syntax` turns raw page-selection expressions into typed selectors so the
//! evaluator never has to guess what a piece of text means. Parsing runs in a
//! fixed order: [`page_segmentation::split_segments`] cuts the expression at
//! top-level commas, then every segment is tokenized and classified on its own.
//!
//! ## Example
//! ```
//! use page_syntax::{parse_selection, Expr, Predicate, Selector};
//!
//! let parsed = parse_selection("1-3, contains:\"A, B\" & !type:empty").unwrap();
//! assert_eq!(parsed.len(), 2);
//! assert_eq!(
//!     parsed[0].selector,
//!     Selector::NumericRange { start: Some(1), end: Some(3) }
//! );
//! let Selector::BooleanMatch(Expr::And(left, right)) = &parsed[1].selector else {
//!     panic!("expected a conjunction");
//! };
//! assert!(matches!(&**left, Expr::Predicate(Predicate::Contains { text, .. }) if text == "A, B"));
//! assert!(matches!(&**right, Expr::Not(_)));
//! ```

mod lexer;
mod parser;
mod selector;

pub use lexer::{Keyword, Token, TokenKind, tokenize};
pub use page_segmentation::{Segment, SegmentError, split_segments};
pub use parser::{parse_expression, parse_segment};

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Splits `expression` into segments and parses each one into a [`Selector`].
///
/// Segmentation finishes before any segment is looked at, and segments are
/// returned in their original order.
pub fn parse_selection(expression: &str) -> Result<Vec<ParsedSegment>, SyntaxError> {
    let segments = split_segments(expression).map_err(|err| SyntaxError {
        message: err.message,
        segment: expression.to_string(),
        position: err.position,
    })?;
    segments
        .into_iter()
        .map(|segment| {
            Ok(ParsedSegment {
                text: segment.text.to_string(),
                offset: segment.offset,
                selector: parse_segment(segment)?,
            })
        })
        .collect()
}

/// A segment together with the selector it parsed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSegment {
    pub text: String,
    pub offset: usize,
    pub selector: Selector,
}

/// Anything that resolves directly to a set of page indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `7`
    SinglePage(usize),
    /// `3-7`, `5..`, `:10`. Missing bounds default to the first/last page.
    NumericRange {
        start: Option<usize>,
        end: Option<usize>,
    },
    /// `5:20:3`, `::2`, `2::2`, `odd`, `even`.
    Stepped {
        start: Option<usize>,
        end: Option<usize>,
        step: usize,
    },
    /// `first 3`
    First(usize),
    /// `last 2`
    Last(usize),
    /// `all`
    All,
    /// Every page satisfying a boolean expression.
    BooleanMatch(Expr),
    /// `contains:'Chapter' to contains:'Summary'`
    RangePattern { start: Endpoint, end: Endpoint },
}

/// One side of a range pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub anchor: Anchor,
    /// Applied to every located page (`contains:'Index'-1`).
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    Page(usize),
    Matching(Expr),
}

/// Boolean structure over predicates.
///
/// Precedence is `!` over `&` over `|`, both binary operators associate to the
/// left, and parentheses override.
///
/// ```
/// use page_syntax::{parse_expression, Expr, Predicate};
/// let expr = parse_expression("!type:empty & all").unwrap();
/// let Expr::And(left, right) = expr else { panic!() };
/// assert!(matches!(*left, Expr::Not(_)));
/// assert_eq!(*right, Expr::Predicate(Predicate::All));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Predicate(Predicate),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    /// Repeated `!` prefixes collapse by parity, so `!!x` is just `x`.
    Not(Box<Expr>),
}

/// Leaf tests. Every variant is a pure function of one page's facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `contains:"text"`, `contains/i:"text"`
    Contains { text: String, case_sensitive: bool },
    /// `regex:"pattern"`. Compiled while parsing, so evaluation cannot fail.
    Regex(RegexPattern),
    /// `line-starts:"text"`: some line begins with `text` once leading
    /// whitespace is ignored.
    LineStarts { text: String, case_sensitive: bool },
    /// `type:text`
    Type(ContentKind),
    /// `size:<500KB`
    Size(SizeComparison),
    /// `all`
    All,
    /// `empty`: the page has no text besides whitespace.
    EmptyPage,
}

/// Page classification supplied alongside the page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Image,
    Mixed,
    Empty,
}

impl ContentKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "text" => Some(ContentKind::Text),
            "image" => Some(ContentKind::Image),
            "mixed" => Some(ContentKind::Mixed),
            "empty" => Some(ContentKind::Empty),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
            ContentKind::Mixed => "mixed",
            ContentKind::Empty => "empty",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Lt,
    Lte,
    Gt,
    Gte,
}

/// `size:` argument normalized to bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeComparison {
    pub op: ComparisonOp,
    pub bytes: u64,
}

impl SizeComparison {
    pub fn matches(&self, size: u64) -> bool {
        match self.op {
            ComparisonOp::Lt => size < self.bytes,
            ComparisonOp::Lte => size <= self.bytes,
            ComparisonOp::Gt => size > self.bytes,
            ComparisonOp::Gte => size >= self.bytes,
        }
    }
}

/// A compiled regular expression that still remembers how it was written.
#[derive(Clone)]
pub struct RegexPattern {
    source: String,
    case_insensitive: bool,
    regex: Regex,
}

impl RegexPattern {
    pub fn new(source: &str, case_insensitive: bool) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(Self {
            source: source.to_string(),
            case_insensitive,
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

impl PartialEq for RegexPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.case_insensitive == other.case_insensitive
    }
}

impl Eq for RegexPattern {}

impl fmt::Debug for RegexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegexPattern")
            .field("source", &self.source)
            .field("case_insensitive", &self.case_insensitive)
            .finish()
    }
}

/// Malformed expression: unterminated quote, unbalanced parenthesis, unknown
/// keyword, invalid regex, bad size literal, and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    /// Text of the segment the error was found in.
    pub segment: String,
    /// Byte offset into the full expression.
    pub position: usize,
}

impl SyntaxError {
    pub(crate) fn new(message: impl Into<String>, segment: &str, position: usize) -> Self {
        Self {
            message: message.into(),
            segment: segment.to_string(),
            position,
        }
    }

    /// Re-anchors an error found inside a segment onto the full expression.
    pub(crate) fn shifted(mut self, offset: usize) -> Self {
        self.position += offset;
        self
    }
}

impl From<SegmentError> for SyntaxError {
    fn from(err: SegmentError) -> Self {
        Self {
            message: err.message,
            segment: String::new(),
            position: err.position,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in `{}` (at byte {})",
            self.message, self.segment, self.position
        )
    }
}

impl std::error::Error for SyntaxError {}
