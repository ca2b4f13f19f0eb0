use crate::{
    Selector, SyntaxError,
    lexer::{Keyword, Token, TokenKind},
};

/// Numeric and keyword selectors: `7`, `3-7`, `5..`, `:10`, `5:20:3`, `::2`,
/// `odd`, `even`, `first 3`, `last-2`, `all`.
pub(crate) fn parse_page_selector(text: &str, tokens: &[Token]) -> Result<Selector, SyntaxError> {
    let kinds: Vec<&TokenKind> = tokens.iter().map(|token| &token.kind).collect();
    let number = |idx: usize| page_number(text, &tokens[idx]);

    let selector = match kinds.as_slice() {
        [TokenKind::Keyword(Keyword::All)] => Selector::All,
        [TokenKind::Keyword(Keyword::Odd)] => Selector::Stepped {
            start: None,
            end: None,
            step: 2,
        },
        [TokenKind::Keyword(Keyword::Even)] => Selector::Stepped {
            start: Some(2),
            end: None,
            step: 2,
        },
        [TokenKind::Keyword(Keyword::First), TokenKind::Number(_)] => Selector::First(number(1)?),
        [TokenKind::Keyword(Keyword::First), TokenKind::Dash, TokenKind::Number(_)] => {
            Selector::First(number(2)?)
        }
        [TokenKind::Keyword(Keyword::Last), TokenKind::Number(_)] => Selector::Last(number(1)?),
        [TokenKind::Keyword(Keyword::Last), TokenKind::Dash, TokenKind::Number(_)] => {
            Selector::Last(number(2)?)
        }
        [TokenKind::Number(_)] => Selector::SinglePage(number(0)?),
        [
            TokenKind::Number(_),
            TokenKind::Dash | TokenKind::DotDot,
            TokenKind::Number(_),
        ] => Selector::NumericRange {
            start: Some(number(0)?),
            end: Some(number(2)?),
        },
        [TokenKind::Number(_), TokenKind::Dash | TokenKind::DotDot] => Selector::NumericRange {
            start: Some(number(0)?),
            end: None,
        },
        [TokenKind::Dash | TokenKind::DotDot, TokenKind::Number(_)] => Selector::NumericRange {
            start: None,
            end: Some(number(1)?),
        },
        _ if kinds
            .iter()
            .any(|kind| matches!(kind, TokenKind::Colon | TokenKind::DoubleColon)) =>
        {
            parse_colon_fields(text, tokens)?
        }
        [TokenKind::Keyword(keyword @ (Keyword::First | Keyword::Last)), ..] => {
            return Err(SyntaxError::new(
                format!("`{keyword}` needs a page count, e.g. `{keyword} 3`"),
                text,
                tokens[0].span.start,
            ));
        }
        _ => {
            let culprit = tokens
                .iter()
                .find(|token| matches!(token.kind, TokenKind::Word(_)))
                .unwrap_or(&tokens[0]);
            let message = match &culprit.kind {
                TokenKind::Word(word) => format!("unknown keyword `{word}`"),
                _ => format!("unrecognized page selector `{text}`"),
            };
            return Err(SyntaxError::new(message, text, culprit.span.start));
        }
    };
    Ok(selector)
}

// `start:end:step` where every field is optional. `::` is two separators.
fn parse_colon_fields(text: &str, tokens: &[Token]) -> Result<Selector, SyntaxError> {
    let mut fields: Vec<Option<usize>> = vec![None];
    for token in tokens {
        match &token.kind {
            TokenKind::Number(_) => {
                let slot = fields
                    .last_mut()
                    .filter(|slot| slot.is_none())
                    .ok_or_else(|| {
                        SyntaxError::new("expected `:` between numbers", text, token.span.start)
                    })?;
                *slot = Some(page_number(text, token)?);
            }
            TokenKind::Colon => fields.push(None),
            TokenKind::DoubleColon => fields.extend([None, None]),
            _ => {
                return Err(SyntaxError::new(
                    format!("unexpected `{}` in stepped range", &text[token.span.clone()]),
                    text,
                    token.span.start,
                ));
            }
        }
        if fields.len() > 3 {
            return Err(SyntaxError::new(
                "a stepped range has at most three fields (start:end:step)",
                text,
                token.span.start,
            ));
        }
    }

    match fields.as_slice() {
        [start, end] => Ok(Selector::NumericRange {
            start: *start,
            end: *end,
        }),
        [start, end, step] => {
            let step = step.unwrap_or(1);
            if step == 0 {
                return Err(SyntaxError::new("step must be at least 1", text, 0));
            }
            Ok(Selector::Stepped {
                start: *start,
                end: *end,
                step,
            })
        }
        _ => Err(SyntaxError::new(
            format!("unrecognized page selector `{text}`"),
            text,
            0,
        )),
    }
}

fn page_number(text: &str, token: &Token) -> Result<usize, SyntaxError> {
    let raw = &text[token.span.clone()];
    if raw.contains('.') {
        return Err(SyntaxError::new(
            format!("page numbers must be whole numbers, got `{raw}`"),
            text,
            token.span.start,
        ));
    }
    raw.parse().map_err(|_| {
        SyntaxError::new(
            format!("page number `{raw}` is too large"),
            text,
            token.span.start,
        )
    })
}
