use crate::{PageFactsProvider, RangeError, evaluate::matching_pages, resolve::check_page};
use page_syntax::{Anchor, Endpoint};
use std::ops::RangeInclusive;
use tracing::debug;

/// Finds every `start to end` section of the document.
///
/// Starts are visited in ascending order and each one takes the earliest end
/// at or after it that no earlier start has consumed. A start with no such end
/// is dropped. Endpoint offsets are applied to every located page before
/// pairing and the results are clamped to `1..=N`.
pub fn match_ranges<P: PageFactsProvider + ?Sized>(
    start: &Endpoint,
    end: &Endpoint,
    provider: &P,
) -> Result<Vec<RangeInclusive<usize>>, RangeError> {
    let starts = locate(start, provider)?;
    let ends = locate(end, provider)?;
    debug!(?starts, ?ends, "range pattern endpoints located");
    Ok(pair_sections(&starts, &ends))
}

fn locate<P: PageFactsProvider + ?Sized>(
    endpoint: &Endpoint,
    provider: &P,
) -> Result<Vec<usize>, RangeError> {
    let total = provider.page_count();
    let raw = match &endpoint.anchor {
        Anchor::Page(page) => {
            check_page(*page, total)?;
            vec![*page]
        }
        Anchor::Matching(expr) => matching_pages(expr, provider),
    };
    let mut located: Vec<usize> = raw
        .into_iter()
        .map(|page| shift_and_clamp(page, endpoint.offset, total))
        .collect();
    // Clamping can fold neighbours onto the same page.
    located.dedup();
    Ok(located)
}

fn shift_and_clamp(page: usize, offset: i64, total: usize) -> usize {
    let shifted = i64::try_from(page)
        .unwrap_or(i64::MAX)
        .saturating_add(offset);
    let clamped = shifted.clamp(1, i64::try_from(total).unwrap_or(i64::MAX));
    usize::try_from(clamped).unwrap_or(total)
}

/// Greedy earliest-start pairing over two ascending index lists.
///
/// `next_end` only moves forward: ends behind it are either consumed or lie
/// before every remaining start.
pub(crate) fn pair_sections(starts: &[usize], ends: &[usize]) -> Vec<RangeInclusive<usize>> {
    let mut sections = Vec::new();
    let mut next_end = 0;
    for &start in starts {
        while next_end < ends.len() && ends[next_end] < start {
            next_end += 1;
        }
        let Some(&end) = ends.get(next_end) else {
            debug!(start, "no end match at or after start, dropping it");
            continue;
        };
        next_end += 1;
        sections.push(start..=end);
    }
    sections
}
