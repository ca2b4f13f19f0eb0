use crate::{
    GroupingMode, PageFactsProvider, SelectError, SelectionResult,
    boundary::split_groups,
    filter::{describe_filter_result, filter_groups},
    group::{assemble, explode},
    resolve::resolve,
};
use page_syntax::{parse_expression, parse_selection};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    pub grouping: GroupingMode,
    /// Boundary expression that opens a new group.
    pub group_start: Option<String>,
    /// Boundary expression that closes the open group (inclusive).
    pub group_end: Option<String>,
    /// Group filter criterion, applied after boundary splitting.
    pub filter: Option<String>,
    /// Treat out-of-range selectors as selecting nothing.
    pub lenient: bool,
}

/// Evaluates a page-selection expression against a document.
///
/// Segmentation runs once up front, then each segment is resolved on its own
/// and the results are assembled in segment order. Boundary splitting and
/// group filtering follow when configured; `SeparateFiles` explodes groups
/// last.
///
/// ```
/// use page_select::{select_pages, Document, GroupingMode, PageFacts, SelectOptions};
/// use page_syntax::ContentKind;
///
/// let doc: Document = (1..=12)
///     .map(|n| PageFacts::new(1, ContentKind::Text, format!("page {n}")))
///     .collect();
/// let options = SelectOptions {
///     grouping: GroupingMode::RespectGroups,
///     ..Default::default()
/// };
/// let result = select_pages("1-3,7,9-11", &doc, &options).unwrap();
/// assert_eq!(result.page_groups(), vec![vec![1, 2, 3], vec![7], vec![9, 10, 11]]);
/// ```
pub fn select_pages<P: PageFactsProvider + ?Sized>(
    expression: &str,
    provider: &P,
    options: &SelectOptions,
) -> Result<SelectionResult, SelectError> {
    let parsed = parse_selection(expression)?;
    let group_start = options
        .group_start
        .as_deref()
        .map(parse_expression)
        .transpose()?;
    let group_end = options
        .group_end
        .as_deref()
        .map(parse_expression)
        .transpose()?;

    let mut resolved = Vec::with_capacity(parsed.len());
    for segment in parsed {
        debug!(segment = %segment.text, selector = ?segment.selector, "resolving segment");
        match resolve(&segment.selector, provider) {
            Ok(resolution) => {
                if resolution.is_empty() {
                    debug!(segment = %segment.text, "segment matched nothing");
                }
                resolved.push((segment.text, resolution));
            }
            Err(err) if options.lenient => {
                warn!(segment = %segment.text, "ignoring selector: {err}");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let mut groups = assemble(&resolved, options.grouping);
    if group_start.is_some() || group_end.is_some() {
        let before = groups.len();
        groups = split_groups(
            groups,
            group_start.as_ref(),
            group_end.as_ref(),
            provider,
        );
        debug!(before, after = groups.len(), "boundary split applied");
    }
    if let Some(criterion) = options.filter.as_deref() {
        let before = groups.len();
        groups = filter_groups(groups, criterion, provider, options.lenient)?;
        info!("{}", describe_filter_result(before, groups.len(), criterion));
    }
    if options.grouping == GroupingMode::SeparateFiles {
        groups = explode(groups);
    }

    let result = SelectionResult::new(groups);
    if result.is_empty() {
        warn!(expression, "selection matched no pages");
    }
    Ok(result)
}
