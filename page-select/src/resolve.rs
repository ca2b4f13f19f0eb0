use crate::{PageFactsProvider, RangeError, evaluate::matching_pages, range_pattern::match_ranges};
use page_syntax::Selector;
use std::ops::RangeInclusive;

/// What a single selector produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Page indices in ascending order.
    Pages(Vec<usize>),
    /// Closed page intervals found by a range pattern, in discovery order.
    Spans(Vec<RangeInclusive<usize>>),
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        match self {
            Resolution::Pages(pages) => pages.is_empty(),
            Resolution::Spans(spans) => spans.is_empty(),
        }
    }
}

pub fn resolve<P: PageFactsProvider + ?Sized>(
    selector: &Selector,
    provider: &P,
) -> Result<Resolution, RangeError> {
    let total = provider.page_count();
    let pages = match selector {
        Selector::SinglePage(page) => {
            check_page(*page, total)?;
            vec![*page]
        }
        Selector::NumericRange { start, end } => {
            for page in start.iter().chain(end) {
                check_page(*page, total)?;
            }
            let lo = start.unwrap_or(1);
            let hi = end.unwrap_or(total);
            if let (Some(start), Some(end)) = (start, end) {
                if start > end {
                    return Err(RangeError::InvertedRange {
                        start: *start,
                        end: *end,
                    });
                }
            }
            (lo..=hi).collect()
        }
        Selector::Stepped { start, end, step } => stepped(*start, *end, *step, total)?,
        Selector::First(count) => {
            check_count(*count, total)?;
            (1..=*count).collect()
        }
        Selector::Last(count) => {
            check_count(*count, total)?;
            (total - count + 1..=total).collect()
        }
        Selector::All => (1..=total).collect(),
        Selector::BooleanMatch(expr) => matching_pages(expr, provider),
        Selector::RangePattern { start, end } => {
            return match_ranges(start, end, provider).map(Resolution::Spans);
        }
    };
    Ok(Resolution::Pages(pages))
}

// A start past the last page with an open end selects nothing, so `even` on a
// one-page document is empty rather than an error.
fn stepped(
    start: Option<usize>,
    end: Option<usize>,
    step: usize,
    total: usize,
) -> Result<Vec<usize>, RangeError> {
    if step == 0 {
        return Err(RangeError::ZeroStep);
    }
    if start == Some(0) {
        return Err(RangeError::PageOutOfBounds { page: 0, total });
    }
    if let Some(end) = end {
        check_page(end, total)?;
    }
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(RangeError::InvertedRange { start, end });
        }
    }
    let lo = start.unwrap_or(1);
    let hi = end.unwrap_or(total);
    Ok((lo..=hi).step_by(step).collect())
}

pub(crate) fn check_page(page: usize, total: usize) -> Result<(), RangeError> {
    if (1..=total).contains(&page) {
        Ok(())
    } else {
        Err(RangeError::PageOutOfBounds { page, total })
    }
}

fn check_count(count: usize, total: usize) -> Result<(), RangeError> {
    if (1..=total).contains(&count) {
        Ok(())
    } else {
        Err(RangeError::CountOutOfBounds { count, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Document, PageFacts};
    use page_syntax::{ContentKind, Segment, parse_segment};

    fn doc(pages: usize) -> Document {
        Document::new(
            (0..pages)
                .map(|_| PageFacts::new(100, ContentKind::Text, "text"))
                .collect(),
        )
    }

    fn pages(text: &str, total: usize) -> Result<Vec<usize>, RangeError> {
        let selector = parse_segment(Segment { text, offset: 0 }).unwrap();
        match resolve(&selector, &doc(total))? {
            Resolution::Pages(pages) => Ok(pages),
            other => panic!("expected pages, got: {other:?}"),
        }
    }

    #[test]
    fn resolves_numeric_selectors() {
        let cases: &[(&str, usize, &[usize])] = &[
            ("7", 10, &[7]),
            ("3-5", 10, &[3, 4, 5]),
            ("8-", 10, &[8, 9, 10]),
            ("-3", 10, &[1, 2, 3]),
            ("4..6", 10, &[4, 5, 6]),
            (":2", 10, &[1, 2]),
            ("5:20:3", 20, &[5, 8, 11, 14, 17, 20]),
            ("5:10:2", 10, &[5, 7, 9]),
            ("::2", 10, &[1, 3, 5, 7, 9]),
            ("2::2", 10, &[2, 4, 6, 8, 10]),
            ("odd", 5, &[1, 3, 5]),
            ("even", 5, &[2, 4]),
            ("even", 1, &[]),
            ("first 3", 10, &[1, 2, 3]),
            ("last 2", 10, &[9, 10]),
            ("last 10", 10, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]),
            ("all", 3, &[1, 2, 3]),
            ("all", 0, &[]),
            ("4-4", 10, &[4]),
        ];
        for (input, total, expected) in cases {
            assert_eq!(&pages(input, *total).unwrap(), expected, "input: {input}");
        }
    }

    #[test]
    fn reports_range_errors() {
        assert_eq!(
            pages("first 3", 2),
            Err(RangeError::CountOutOfBounds { count: 3, total: 2 })
        );
        assert_eq!(
            pages("last 0", 2),
            Err(RangeError::CountOutOfBounds { count: 0, total: 2 })
        );
        assert_eq!(
            pages("11", 10),
            Err(RangeError::PageOutOfBounds { page: 11, total: 10 })
        );
        assert_eq!(
            pages("0", 10),
            Err(RangeError::PageOutOfBounds { page: 0, total: 10 })
        );
        assert_eq!(
            pages("8-12", 10),
            Err(RangeError::PageOutOfBounds { page: 12, total: 10 })
        );
        assert_eq!(
            pages("7-3", 10),
            Err(RangeError::InvertedRange { start: 7, end: 3 })
        );
        assert_eq!(
            pages("1:30:2", 10),
            Err(RangeError::PageOutOfBounds { page: 30, total: 10 })
        );
    }

    #[test]
    fn boolean_selectors_scan_every_page() {
        let document = Document::new(vec![
            PageFacts::new(10, ContentKind::Text, "a"),
            PageFacts::new(10, ContentKind::Image, ""),
            PageFacts::new(10, ContentKind::Text, "b"),
        ]);
        let selector = parse_segment(Segment {
            text: "type:text",
            offset: 0,
        })
        .unwrap();
        assert_eq!(
            resolve(&selector, &document).unwrap(),
            Resolution::Pages(vec![1, 3])
        );
    }

    #[test]
    fn zero_step_is_rejected() {
        let selector = Selector::Stepped {
            start: Some(1),
            end: None,
            step: 0,
        };
        assert_eq!(resolve(&selector, &doc(5)), Err(RangeError::ZeroStep));
    }
}
