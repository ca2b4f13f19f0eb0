//! Top-level segmentation of page-selection expressions.
//!
//! `1-3,contains:"A, B",(type:text | type:mixed)` => `1-3`, `contains:"A, B"`,
//! `(type:text | type:mixed)`
//!
//! Segmentation only looks at quote state and parenthesis depth. It never asks
//! whether a piece of text is a boolean expression or a range pattern, so a
//! comma inside a quoted literal can never end a segment.
use std::fmt;

/// One comma-delimited piece of an expression, whitespace-trimmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<'s> {
    pub text: &'s str,
    /// Byte offset of `text` inside the original expression.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentError {
    pub message: String,
    pub position: usize,
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.position)
    }
}

impl std::error::Error for SegmentError {}

/// Splits `expression` on commas that sit outside quotes and parentheses.
///
/// Blank segments (`1,,3` or a trailing comma) are dropped. Fails when the
/// input ends while a quote is still open.
pub fn split_segments(expression: &str) -> Result<Vec<Segment<'_>>, SegmentError> {
    let mut segments = Vec::new();
    // (quote char, byte offset of the opening quote)
    let mut quote: Option<(char, usize)> = None;
    let mut depth = 0usize;
    let mut start = 0;

    let mut chars = expression.char_indices();
    while let Some((idx, ch)) = chars.next() {
        if let Some((open, _)) = quote {
            if ch == '\\' {
                // the escaped character can never close the literal
                chars.next();
            } else if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some((ch, idx)),
            '(' => depth += 1,
            // Unbalanced closers are the parser's problem, not ours.
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                push_segment(&mut segments, expression, start, idx);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if let Some((open, position)) = quote {
        return Err(SegmentError {
            message: format!("unterminated {open} quote"),
            position,
        });
    }
    push_segment(&mut segments, expression, start, expression.len());
    Ok(segments)
}

fn push_segment<'s>(segments: &mut Vec<Segment<'s>>, input: &'s str, start: usize, end: usize) {
    let raw = &input[start..end];
    let text = raw.trim();
    if text.is_empty() {
        return;
    }
    let leading = raw.len() - raw.trim_start().len();
    segments.push(Segment {
        text,
        offset: start + leading,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<&str> {
        split_segments(input)
            .unwrap()
            .into_iter()
            .map(|segment| segment.text)
            .collect()
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(texts("1-3,7,9-11"), vec!["1-3", "7", "9-11"]);
        assert_eq!(texts("all"), vec!["all"]);
        assert_eq!(
            texts("contains:\"A, B\",contains:\"C\""),
            vec!["contains:\"A, B\"", "contains:\"C\""]
        );
        assert_eq!(
            texts("contains:'x, y' to contains:'z', 4"),
            vec!["contains:'x, y' to contains:'z'", "4"]
        );
        assert_eq!(
            texts("(contains:\"a\" | type:image),5-6"),
            vec!["(contains:\"a\" | type:image)", "5-6"]
        );
    }

    #[test]
    fn test_split_segments_edge_cases() {
        // Empty string
        assert_eq!(texts(""), Vec::<&str>::new());

        // Only separators and whitespace
        assert_eq!(texts(" , ,, "), Vec::<&str>::new());

        // Trailing and doubled commas are dropped
        assert_eq!(texts("1,,3,"), vec!["1", "3"]);

        // Whitespace around segments is trimmed
        assert_eq!(texts("  1 ,\t2  "), vec!["1", "2"]);

        // The other quote style does not close the literal
        assert_eq!(
            texts("contains:\"it's, fine\",2"),
            vec!["contains:\"it's, fine\"", "2"]
        );

        // Escaped quotes stay inside the literal
        assert_eq!(
            texts(r#"contains:"say \", hi",2"#),
            vec![r#"contains:"say \", hi""#, "2"]
        );

        // Nested parentheses
        assert_eq!(
            texts("((type:text, 1)),2"),
            vec!["((type:text, 1))", "2"]
        );

        // Stray closer does not swallow later commas
        assert_eq!(texts("1),2"), vec!["1)", "2"]);

        // Unicode is kept intact
        assert_eq!(
            texts("contains:\"报告, 测试\",3"),
            vec!["contains:\"报告, 测试\"", "3"]
        );
    }

    #[test]
    fn test_segment_offsets_point_into_input() {
        let input = "1-3,  contains:'a'";
        let segments = split_segments(input).unwrap();
        assert_eq!(segments[0].offset, 0);
        assert_eq!(segments[1].offset, 6);
        assert_eq!(&input[segments[1].offset..], "contains:'a'");
    }

    #[test]
    fn test_unterminated_quote() {
        let err = split_segments("1,contains:\"abc").unwrap_err();
        assert_eq!(err.position, 11);
        assert!(err.message.contains("unterminated"));

        let err = split_segments("contains:'abc\\'").unwrap_err();
        assert_eq!(err.position, 9);
    }
}
