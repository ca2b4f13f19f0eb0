use crate::{
    Anchor, ContentKind, Endpoint, Expr, Predicate, RegexPattern, Selector, SizeComparison,
    SyntaxError,
    lexer::{Keyword, Token, TokenKind, tokenize},
    selector::parse_page_selector,
};
use page_segmentation::Segment;

/// Parses one segment produced by [`page_segmentation::split_segments`].
///
/// A top-level `to` makes the segment a range pattern. Boolean operators,
/// parentheses or a predicate keyword make it a boolean match. Everything else
/// is a numeric/keyword page selector and never reaches the boolean parser.
///
/// ```
/// use page_syntax::{parse_segment, Segment, Selector};
/// let selector = parse_segment(Segment { text: "5:20:3", offset: 0 }).unwrap();
/// assert_eq!(selector, Selector::Stepped { start: Some(5), end: Some(20), step: 3 });
/// ```
pub fn parse_segment(segment: Segment<'_>) -> Result<Selector, SyntaxError> {
    let tokens = tokenize(segment.text).map_err(|err| err.shifted(segment.offset))?;
    classify(segment.text, &tokens).map_err(|err| err.shifted(segment.offset))
}

/// Parses a standalone boolean expression, as used for group boundary
/// patterns.
///
/// ```
/// use page_syntax::{parse_expression, Expr, Predicate};
/// let expr = parse_expression("contains/i:'chapter'").unwrap();
/// assert_eq!(
///     expr,
///     Expr::Predicate(Predicate::Contains { text: "chapter".into(), case_sensitive: false })
/// );
/// ```
pub fn parse_expression(input: &str) -> Result<Expr, SyntaxError> {
    let text = input.trim();
    let leading = input.len() - input.trim_start().len();
    let tokens = tokenize(text).map_err(|err| err.shifted(leading))?;
    Cursor::new(text, &tokens)
        .parse_complete_expression()
        .map_err(|err| err.shifted(leading))
}

fn classify(text: &str, tokens: &[Token]) -> Result<Selector, SyntaxError> {
    if tokens.is_empty() {
        return Err(SyntaxError::new("empty selector", text, 0));
    }

    let separators = top_level_to(tokens);
    if let Some(&second) = separators.get(1) {
        return Err(SyntaxError::new(
            "a range pattern takes exactly one `to`",
            text,
            tokens[second].span.start,
        ));
    }
    if let Some(&split) = separators.first() {
        let to = &tokens[split];
        let (left, right) = (&tokens[..split], &tokens[split + 1..]);
        if left.is_empty() {
            return Err(SyntaxError::new(
                "missing start of range pattern",
                text,
                to.span.start,
            ));
        }
        if right.is_empty() {
            return Err(SyntaxError::new(
                "missing end of range pattern",
                text,
                to.span.end,
            ));
        }
        return Ok(Selector::RangePattern {
            start: parse_endpoint(text, left)?,
            end: parse_endpoint(text, right)?,
        });
    }

    if is_boolean(tokens) {
        let expr = Cursor::new(text, tokens).parse_complete_expression()?;
        return Ok(Selector::BooleanMatch(expr));
    }

    parse_page_selector(text, tokens)
}

fn top_level_to(tokens: &[Token]) -> Vec<usize> {
    let mut depth = 0usize;
    let mut found = Vec::new();
    for (idx, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth = depth.saturating_sub(1),
            TokenKind::Keyword(Keyword::To) if depth == 0 && !is_value_position(tokens, idx) => {
                found.push(idx)
            }
            _ => {}
        }
    }
    found
}

// A keyword right after `kw:` or `kw/i:` is the predicate's value.
fn is_value_position(tokens: &[Token], idx: usize) -> bool {
    idx.checked_sub(1)
        .and_then(|prev| tokens.get(prev))
        .is_some_and(|prev| {
            matches!(prev.kind, TokenKind::Colon | TokenKind::CaseInsensitive)
        })
}

fn is_boolean(tokens: &[Token]) -> bool {
    tokens.iter().any(|token| match token.kind {
        TokenKind::And
        | TokenKind::Or
        | TokenKind::Not
        | TokenKind::LParen
        | TokenKind::RParen => true,
        TokenKind::Keyword(keyword) => keyword.is_predicate(),
        _ => false,
    })
}

// `contains:'Index'-1`, `7+2`: a trailing signed integer is an offset as long
// as something is left over to anchor it.
fn parse_endpoint(text: &str, tokens: &[Token]) -> Result<Endpoint, SyntaxError> {
    let mut anchor_tokens = tokens;
    let mut offset = 0i64;
    if let [rest @ .., sign, number] = tokens {
        let signed = matches!(sign.kind, TokenKind::Dash | TokenKind::Plus);
        if let TokenKind::Number(raw) = &number.kind {
            if signed && !rest.is_empty() {
                let magnitude: i64 = raw.parse().map_err(|_| {
                    SyntaxError::new(format!("invalid offset `{raw}`"), text, number.span.start)
                })?;
                offset = if sign.kind == TokenKind::Dash {
                    -magnitude
                } else {
                    magnitude
                };
                anchor_tokens = rest;
            }
        }
    }

    let anchor = match anchor_tokens {
        [Token {
            kind: TokenKind::Number(raw),
            span,
        }] => Anchor::Page(raw.parse().map_err(|_| {
            SyntaxError::new(format!("invalid page number `{raw}`"), text, span.start)
        })?),
        _ => Anchor::Matching(Cursor::new(text, anchor_tokens).parse_complete_expression()?),
    };
    Ok(Endpoint { anchor, offset })
}

/// Recursive-descent parser over an already tokenized segment.
struct Cursor<'a> {
    text: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            text,
            tokens,
            pos: 0,
        }
    }

    fn parse_complete_expression(mut self) -> Result<Expr, SyntaxError> {
        if self.tokens.is_empty() {
            return Err(self.error("expected a predicate"));
        }
        let expr = self.parse_or()?;
        match self.peek() {
            None => Ok(expr),
            Some(TokenKind::RParen) => Err(self.error("unbalanced `)`")),
            Some(_) => Err(self.error("expected `&`, `|` or end of expression")),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&TokenKind::Or) {
            self.expect_operand("|")?;
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_not()?;
        while self.peek() == Some(&TokenKind::And) {
            self.expect_operand("&")?;
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // `!!!x` only wraps once when the parity is odd.
    fn parse_not(&mut self) -> Result<Expr, SyntaxError> {
        let mut negations = 0;
        while self.peek() == Some(&TokenKind::Not) {
            self.expect_operand("!")?;
            negations += 1;
        }
        let expr = self.parse_primary()?;
        if negations % 2 == 1 {
            Ok(Expr::Not(Box::new(expr)))
        } else {
            Ok(expr)
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let Some(kind) = self.peek().cloned() else {
            return Err(self.error("expected a predicate"));
        };
        match kind {
            TokenKind::LParen => {
                let open = self.pos;
                self.pos += 1;
                if self.peek() == Some(&TokenKind::RParen) {
                    return Err(self.error("empty parentheses"));
                }
                let expr = self.parse_or()?;
                if self.peek() != Some(&TokenKind::RParen) {
                    self.pos = open;
                    return Err(self.error("unclosed `(`"));
                }
                self.pos += 1;
                Ok(expr)
            }
            TokenKind::RParen => Err(self.error("unbalanced `)`")),
            TokenKind::And => Err(self.error("dangling `&`")),
            TokenKind::Or => Err(self.error("dangling `|`")),
            TokenKind::Keyword(keyword) => self.parse_predicate(keyword).map(Expr::Predicate),
            TokenKind::Word(word) => {
                Err(self.error(format!("unknown predicate keyword `{word}`")))
            }
            _ => Err(self.error(format!(
                "expected a predicate, found `{}`",
                self.current_text()
            ))),
        }
    }

    fn parse_predicate(&mut self, keyword: Keyword) -> Result<Predicate, SyntaxError> {
        match keyword {
            Keyword::All => {
                self.pos += 1;
                Ok(Predicate::All)
            }
            Keyword::Empty => {
                self.pos += 1;
                Ok(Predicate::EmptyPage)
            }
            Keyword::Contains => {
                self.pos += 1;
                let case_sensitive = !self.eat_case_suffix();
                let text = self.parse_text_argument(keyword)?;
                Ok(Predicate::Contains {
                    text,
                    case_sensitive,
                })
            }
            Keyword::LineStarts => {
                self.pos += 1;
                let case_sensitive = !self.eat_case_suffix();
                let text = self.parse_text_argument(keyword)?;
                Ok(Predicate::LineStarts {
                    text,
                    case_sensitive,
                })
            }
            Keyword::Regex => {
                self.pos += 1;
                let case_insensitive = self.eat_case_suffix();
                let value_pos = self.pos + 1;
                let source = self.parse_text_argument(keyword)?;
                RegexPattern::new(&source, case_insensitive)
                    .map(Predicate::Regex)
                    .map_err(|err| {
                        self.pos = value_pos;
                        self.error(format!("invalid regex: {err}"))
                    })
            }
            Keyword::Type => {
                self.pos += 1;
                self.reject_case_suffix(keyword)?;
                self.expect_colon(keyword)?;
                let name = self.value_text(keyword)?;
                let Some(kind) = ContentKind::from_name(name) else {
                    return Err(self.error(format!(
                        "unknown page type `{name}` (expected text, image, mixed or empty)"
                    )));
                };
                self.pos += 1;
                Ok(Predicate::Type(kind))
            }
            Keyword::Size => {
                self.pos += 1;
                self.reject_case_suffix(keyword)?;
                self.expect_colon(keyword)?;
                self.parse_size().map(Predicate::Size)
            }
            Keyword::First | Keyword::Last | Keyword::Odd | Keyword::Even | Keyword::To => {
                Err(self.error(format!(
                    "`{keyword}` cannot be used inside a boolean expression"
                )))
            }
        }
    }

    fn parse_text_argument(&mut self, keyword: Keyword) -> Result<String, SyntaxError> {
        self.expect_colon(keyword)?;
        let value = match self.peek() {
            Some(TokenKind::Quoted(value)) => value.clone(),
            Some(
                TokenKind::Word(_) | TokenKind::Number(_) | TokenKind::Keyword(_),
            ) => self.current_text().to_string(),
            _ => return Err(self.error(format!("`{keyword}:` needs a value"))),
        };
        if value.is_empty() {
            return Err(self.error(format!("`{keyword}:` needs a non-empty value")));
        }
        self.pos += 1;
        Ok(value)
    }

    fn parse_size(&mut self) -> Result<SizeComparison, SyntaxError> {
        let Some(TokenKind::Compare(op)) = self.peek().cloned() else {
            return Err(self.error("`size:` needs one of `<`, `<=`, `>`, `>=`"));
        };
        self.pos += 1;
        let Some(TokenKind::Number(raw)) = self.peek().cloned() else {
            return Err(self.error("`size:` needs a number"));
        };
        let number_pos = self.pos;
        self.pos += 1;
        let multiplier = match self.peek() {
            Some(TokenKind::Word(unit)) => {
                let multiplier = size_unit_multiplier(unit)
                    .ok_or_else(|| self.error(format!("invalid size unit `{unit}`")))?;
                self.pos += 1;
                multiplier
            }
            _ => 1,
        };
        match size_in_bytes(&raw, multiplier) {
            Some(bytes) => Ok(SizeComparison { op, bytes }),
            None => {
                self.pos = number_pos;
                Err(self.error(format!("invalid size `{raw}`")))
            }
        }
    }

    fn eat_case_suffix(&mut self) -> bool {
        if self.peek() == Some(&TokenKind::CaseInsensitive) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn reject_case_suffix(&self, keyword: Keyword) -> Result<(), SyntaxError> {
        if self.peek() == Some(&TokenKind::CaseInsensitive) {
            return Err(self.error(format!("`/i` is not supported on `{keyword}`")));
        }
        Ok(())
    }

    fn expect_colon(&mut self, keyword: Keyword) -> Result<(), SyntaxError> {
        if self.peek() != Some(&TokenKind::Colon) {
            return Err(self.error(format!("expected `:` after `{keyword}`")));
        }
        self.pos += 1;
        Ok(())
    }

    // `type:empty` lexes `empty` as a keyword, so match on the source text.
    fn value_text(&self, keyword: Keyword) -> Result<&'a str, SyntaxError> {
        match self.peek() {
            Some(TokenKind::Quoted(value)) => Ok(value.as_str()),
            Some(TokenKind::Word(_) | TokenKind::Keyword(_)) => Ok(self.current_text()),
            _ => Err(self.error(format!("`{keyword}:` needs a value"))),
        }
    }

    // Consumes a binary or prefix operator and checks something follows it.
    fn expect_operand(&mut self, operator: &str) -> Result<(), SyntaxError> {
        let at = self.pos;
        self.pos += 1;
        match self.peek() {
            None | Some(TokenKind::RParen | TokenKind::And | TokenKind::Or) => {
                self.pos = at;
                Err(self.error(format!("dangling `{operator}`")))
            }
            Some(_) => Ok(()),
        }
    }

    fn peek(&self) -> Option<&'a TokenKind> {
        self.tokens.get(self.pos).map(|token| &token.kind)
    }

    fn current_text(&self) -> &'a str {
        self.tokens
            .get(self.pos)
            .map(|token| &self.text[token.span.clone()])
            .unwrap_or("")
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        let position = match self.tokens.get(self.pos) {
            Some(token) => token.span.start,
            None => self
                .tokens
                .last()
                .map_or(self.text.len(), |token| token.span.end),
        };
        SyntaxError::new(message, self.text, position)
    }
}

fn size_unit_multiplier(unit: &str) -> Option<u64> {
    match unit.to_ascii_uppercase().as_str() {
        "B" => Some(1),
        "KB" => Some(1024),
        "MB" => Some(1024 * 1024),
        "GB" => Some(1024 * 1024 * 1024),
        _ => None,
    }
}

fn size_in_bytes(raw: &str, multiplier: u64) -> Option<u64> {
    if let Ok(whole) = raw.parse::<u64>() {
        return whole.checked_mul(multiplier);
    }
    let value: f64 = raw.parse().ok()?;
    let bytes = value * multiplier as f64;
    (bytes.is_finite() && bytes < u64::MAX as f64).then_some(bytes as u64)
}
