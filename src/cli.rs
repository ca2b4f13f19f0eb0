use crate::expression::strip_outer_quotes;
use clap::Parser;
use page_select::{GroupingMode, SelectOptions};
use std::path::PathBuf;

/// Select pages from a document described by a JSON page-facts file.
#[derive(Parser, Debug)]
#[clap(version)]
pub struct Cli {
    /// JSON file holding the page facts (`[{"byte_size", "content_type", "text"}]`).
    pub facts: PathBuf,
    /// Page selection expression, e.g. `1-3,7`, `type:text & size:<500KB`,
    /// `contains:'Chapter' to contains:'Summary'` or `file:pages.txt`.
    #[clap(long, default_value = "all")]
    pub extract_pages: String,
    /// Keep only the matching groups (`1,3` or a boolean expression).
    #[clap(long)]
    pub filter_matches: Option<String>,
    /// Expression that starts a new group.
    #[clap(long)]
    pub group_start: Option<String>,
    /// Expression that ends the current group (the matching page is included).
    #[clap(long)]
    pub group_end: Option<String>,
    /// Keep ranges and pattern sections as separate groups.
    #[clap(long, conflicts_with = "separate_files")]
    pub respect_groups: bool,
    /// One group per selected page.
    #[clap(long)]
    pub separate_files: bool,
    /// Out-of-range selectors select nothing instead of failing.
    #[clap(long)]
    pub lenient: bool,
    /// Print the result as JSON.
    #[clap(long)]
    pub json: bool,
}

impl Cli {
    pub fn grouping(&self) -> GroupingMode {
        if self.separate_files {
            GroupingMode::SeparateFiles
        } else if self.respect_groups {
            GroupingMode::RespectGroups
        } else {
            GroupingMode::SingleDocument
        }
    }

    pub fn select_options(&self) -> SelectOptions {
        let flag = |value: &Option<String>| {
            value
                .as_deref()
                .map(|value| strip_outer_quotes(value).to_string())
        };
        SelectOptions {
            grouping: self.grouping(),
            group_start: flag(&self.group_start),
            group_end: flag(&self.group_end),
            filter: flag(&self.filter_matches),
            lenient: self.lenient,
        }
    }
}
