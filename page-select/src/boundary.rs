use crate::{Group, PageFactsProvider, evaluate::evaluate};
use page_syntax::Expr;
use rayon::prelude::*;
use tracing::debug;

/// Re-partitions `pages` (walked in order) into groups at boundary matches.
///
/// A page matching `start` opens a new group, closing any group that is still
/// open. A page matching `end` closes the open group and belongs to it. Any
/// other page seen while no group is open opens one, so pages ahead of the
/// first start or after an end are kept in groups of their own. A group still
/// open at the end is kept.
pub fn split_at_boundaries<P: PageFactsProvider + ?Sized>(
    pages: &[usize],
    start: Option<&Expr>,
    end: Option<&Expr>,
    provider: &P,
) -> Vec<Vec<usize>> {
    if start.is_none() && end.is_none() {
        return if pages.is_empty() {
            Vec::new()
        } else {
            vec![pages.to_vec()]
        };
    }

    let flags: Vec<(bool, bool)> = pages
        .par_iter()
        .map(|&index| {
            let Some(page) = provider.page(index) else {
                return (false, false);
            };
            (
                start.is_some_and(|expr| evaluate(expr, page)),
                end.is_some_and(|expr| evaluate(expr, page)),
            )
        })
        .collect();

    let mut groups = Vec::new();
    let mut current: Option<Vec<usize>> = None;
    for (&page, (is_start, is_end)) in pages.iter().zip(flags) {
        if is_start {
            if let Some(open) = current.take() {
                groups.push(open);
            }
            debug!(page, "group boundary opens");
        }
        current.get_or_insert_with(Vec::new).push(page);
        if is_end {
            debug!(page, "group boundary closes");
            groups.extend(current.take());
        }
    }
    groups.extend(current);
    groups
}

/// Applies [`split_at_boundaries`] inside each group, keeping group order.
pub fn split_groups<P: PageFactsProvider + ?Sized>(
    groups: Vec<Group>,
    start: Option<&Expr>,
    end: Option<&Expr>,
    provider: &P,
) -> Vec<Group> {
    groups
        .into_iter()
        .flat_map(|group| {
            split_at_boundaries(&group.pages, start, end, provider)
                .into_iter()
                .map(move |pages| Group::new(pages, group.source.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Document, PageFacts};
    use page_syntax::{ContentKind, parse_expression};

    fn document(texts: &[&str]) -> Document {
        Document::new(
            texts
                .iter()
                .map(|text| PageFacts::new(1, ContentKind::Text, *text))
                .collect(),
        )
    }

    fn split(texts: &[&str], start: Option<&str>, end: Option<&str>) -> Vec<Vec<usize>> {
        let doc = document(texts);
        let start = start.map(|s| parse_expression(s).unwrap());
        let end = end.map(|s| parse_expression(s).unwrap());
        let pages: Vec<usize> = (1..=texts.len()).collect();
        split_at_boundaries(&pages, start.as_ref(), end.as_ref(), &doc)
    }

    #[test]
    fn start_only_closes_before_next_start() {
        let texts = [
            "Chapter", "a", "b", "c", "d", "Chapter", "e", "f", "g", "h",
        ];
        assert_eq!(
            split(&texts, Some("contains:Chapter"), None),
            vec![vec![1, 2, 3, 4, 5], vec![6, 7, 8, 9, 10]]
        );
    }

    #[test]
    fn start_only_keeps_leading_pages_as_a_group() {
        let texts = ["cover", "toc", "Chapter", "a", "Chapter", "b"];
        assert_eq!(
            split(&texts, Some("contains:Chapter"), None),
            vec![vec![1, 2], vec![3, 4], vec![5, 6]]
        );
    }

    #[test]
    fn end_only_opens_immediately() {
        let texts = ["a", "End", "b", "c", "End", "d"];
        assert_eq!(
            split(&texts, None, Some("contains:End")),
            vec![vec![1, 2], vec![3, 4, 5], vec![6]]
        );
    }

    #[test]
    fn start_and_end_keep_pages_between_groups() {
        let texts = ["x", "Start", "a", "End", "y", "Start", "End", "z"];
        assert_eq!(
            split(&texts, Some("contains:Start"), Some("contains:End")),
            vec![vec![1], vec![2, 3, 4], vec![5], vec![6, 7], vec![8]]
        );
    }

    #[test]
    fn page_matching_both_is_a_single_page_group() {
        let texts = ["Start End", "a", "Start", "b"];
        assert_eq!(
            split(&texts, Some("contains:Start"), Some("contains:End")),
            vec![vec![1], vec![2], vec![3, 4]]
        );
    }

    #[test]
    fn neither_predicate_passes_through() {
        assert_eq!(split(&["a", "b"], None, None), vec![vec![1, 2]]);
        assert!(split(&[], None, None).is_empty());
    }

    #[test]
    fn split_groups_works_inside_each_group() {
        let doc = document(&["Chapter", "a", "Chapter", "b", "Chapter", "c"]);
        let start = parse_expression("contains:Chapter").unwrap();
        let groups = split_groups(
            vec![Group::new(vec![1, 2, 3, 4], "1-4"), Group::new(vec![5, 6], "5-6")],
            Some(&start),
            None,
            &doc,
        );
        let pages: Vec<_> = groups.iter().map(|group| group.pages.clone()).collect();
        assert_eq!(pages, vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
        assert_eq!(groups[1].source, "1-4");
    }
}
