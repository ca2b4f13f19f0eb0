//! Evaluates page-selection expressions against a document's page facts.
//!
//! The heavy lifting is split into small stages that can be used on their own:
//! [`evaluate()`] tests predicates, [`resolve()`] turns one selector into pages or
//! sections, [`match_ranges`] pairs `start to end` patterns, [`assemble`]
//! builds groups, [`split_at_boundaries`] re-partitions them and
//! [`filter_groups`] prunes the result. [`select_pages`] runs them in order.
mod boundary;
mod error;
mod evaluate;
mod facts;
mod filter;
mod group;
mod range_pattern;
mod resolve;
mod select;

pub use boundary::{split_at_boundaries, split_groups};
pub use error::{RangeError, SelectError};
pub use evaluate::{evaluate, matching_pages, predicate_matches};
pub use facts::{Document, PageFacts, PageFactsProvider};
pub use filter::{describe_filter_result, filter_groups, group_facts};
pub use group::{Group, GroupingMode, SelectionResult, assemble, explode};
pub use page_syntax::{ContentKind, SyntaxError};
pub use range_pattern::match_ranges;
pub use resolve::{Resolution, resolve};
pub use select::{SelectOptions, select_pages};
