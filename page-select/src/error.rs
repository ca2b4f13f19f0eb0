use page_syntax::SyntaxError;
use thiserror::Error;

/// A well-formed selector that points outside the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("page {page} is out of range (1-{total})")]
    PageOutOfBounds { page: usize, total: usize },
    #[error("cannot select {count} pages out of {total}")]
    CountOutOfBounds { count: usize, total: usize },
    #[error("range {start}-{end} runs backwards")]
    InvertedRange { start: usize, end: usize },
    #[error("step must be at least 1")]
    ZeroStep,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Range(#[from] RangeError),
}
