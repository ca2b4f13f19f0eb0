use crate::{
    Document, Group, PageFacts, PageFactsProvider, SelectError,
    resolve::{Resolution, resolve},
};
use hashbrown::HashSet;
use itertools::Itertools;
use page_syntax::{ContentKind, Selector, SyntaxError, parse_selection};
use tracing::warn;

/// Keeps the groups selected by `criterion`, in their original order.
///
/// Numeric selectors address group positions (`1,3`, `2-4`, `last 1`). Boolean
/// selectors are evaluated against one synthetic page per group: texts joined
/// with newlines, sizes summed, and type `mixed` unless every member page
/// shares one type. A group survives when any segment selects it.
///
/// With `lenient` set, a segment that points past the last group is skipped
/// with a warning instead of failing the call.
pub fn filter_groups<P: PageFactsProvider + ?Sized>(
    groups: Vec<Group>,
    criterion: &str,
    provider: &P,
    lenient: bool,
) -> Result<Vec<Group>, SelectError> {
    let parsed = parse_selection(criterion)?;
    if groups.is_empty() {
        return Ok(groups);
    }
    let synthetic: Document = groups
        .iter()
        .map(|group| group_facts(group, provider))
        .collect();

    let mut keep = HashSet::new();
    for segment in &parsed {
        if matches!(segment.selector, Selector::RangePattern { .. }) {
            return Err(SyntaxError {
                message: "range patterns cannot be used to filter groups".to_string(),
                segment: segment.text.clone(),
                position: segment.offset,
            }
            .into());
        }
        match resolve(&segment.selector, &synthetic) {
            Ok(Resolution::Pages(positions)) => keep.extend(positions),
            Ok(Resolution::Spans(spans)) => keep.extend(spans.into_iter().flatten()),
            Err(err) if lenient => {
                warn!(segment = %segment.text, groups = groups.len(), "skipping group filter: {err}");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(groups
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| keep.contains(&(idx + 1)))
        .map(|(_, group)| group)
        .collect())
}

/// Collapses a group into one page so boolean criteria can test it.
pub fn group_facts<P: PageFactsProvider + ?Sized>(group: &Group, provider: &P) -> PageFacts {
    let members: Vec<&PageFacts> = group
        .pages
        .iter()
        .filter_map(|&index| provider.page(index))
        .collect();
    let content_type = match members
        .iter()
        .map(|page| page.content_type)
        .all_equal_value()
    {
        Ok(kind) => kind,
        Err(None) => ContentKind::Empty,
        Err(Some(_)) => ContentKind::Mixed,
    };
    PageFacts::new(
        members.iter().map(|page| page.byte_size).sum(),
        content_type,
        members.iter().map(|page| page.text.as_str()).join("\n"),
    )
}

/// One-line summary of a filter pass.
///
/// ```
/// use page_select::describe_filter_result;
/// assert_eq!(describe_filter_result(4, 4, "all"), "All 4 groups match filter");
/// assert_eq!(describe_filter_result(4, 0, "9"), "No groups match filter '9'");
/// assert_eq!(describe_filter_result(4, 2, "1,3"), "Filtered 4 groups to 2 using '1,3'");
/// ```
pub fn describe_filter_result(before: usize, after: usize, criteria: &str) -> String {
    if after == before {
        format!("All {before} groups match filter")
    } else if after == 0 {
        format!("No groups match filter '{criteria}'")
    } else {
        format!("Filtered {before} groups to {after} using '{criteria}'")
    }
}
