use crate::{ComparisonOp, SyntaxError};
use std::{fmt, ops::Range};

/// Lexical unit of a single segment. `span` is a byte range into that segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LParen,
    RParen,
    /// `&`
    And,
    /// `|`
    Or,
    /// `!`
    Not,
    Colon,
    /// `::`
    DoubleColon,
    Dash,
    /// `..`
    DotDot,
    Plus,
    /// `<`, `<=`, `>`, `>=`
    Compare(ComparisonOp),
    /// `/i` suffix on a predicate keyword.
    CaseInsensitive,
    /// Quoted literal with escapes already resolved.
    Quoted(String),
    /// Digits, optionally followed by a fractional part (`1.5`).
    Number(String),
    Keyword(Keyword),
    Word(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    First,
    Last,
    All,
    To,
    Type,
    Size,
    Contains,
    Regex,
    LineStarts,
    Odd,
    Even,
    Empty,
}

impl Keyword {
    fn from_word(word: &str) -> Option<Self> {
        let keyword = match word.to_ascii_lowercase().as_str() {
            "first" => Keyword::First,
            "last" => Keyword::Last,
            "all" => Keyword::All,
            "to" => Keyword::To,
            "type" => Keyword::Type,
            "size" => Keyword::Size,
            "contains" => Keyword::Contains,
            "regex" => Keyword::Regex,
            "line-starts" => Keyword::LineStarts,
            "odd" => Keyword::Odd,
            "even" => Keyword::Even,
            "empty" => Keyword::Empty,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn name(self) -> &'static str {
        match self {
            Keyword::First => "first",
            Keyword::Last => "last",
            Keyword::All => "all",
            Keyword::To => "to",
            Keyword::Type => "type",
            Keyword::Size => "size",
            Keyword::Contains => "contains",
            Keyword::Regex => "regex",
            Keyword::LineStarts => "line-starts",
            Keyword::Odd => "odd",
            Keyword::Even => "even",
            Keyword::Empty => "empty",
        }
    }

    /// Keywords that can only appear as (or inside) a boolean predicate.
    pub fn is_predicate(self) -> bool {
        matches!(
            self,
            Keyword::Contains
                | Keyword::Regex
                | Keyword::LineStarts
                | Keyword::Type
                | Keyword::Size
                | Keyword::Empty
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Converts one segment into a flat token stream.
///
/// ```
/// use page_syntax::{tokenize, Keyword, TokenKind};
/// let tokens = tokenize("first 3").unwrap();
/// assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::First));
/// assert_eq!(tokens[1].kind, TokenKind::Number("3".into()));
/// assert_eq!(tokens[1].span, 6..7);
/// ```
pub fn tokenize(segment: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(segment).run()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        while let Some(ch) = self.peek_char() {
            let start = self.pos;
            if ch.is_whitespace() {
                self.advance_char();
                continue;
            }
            let kind = match ch {
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '&' => self.single(TokenKind::And),
                '|' => self.single(TokenKind::Or),
                '!' => self.single(TokenKind::Not),
                '-' => self.single(TokenKind::Dash),
                '+' => self.single(TokenKind::Plus),
                ':' => {
                    self.advance_char();
                    if self.peek_char() == Some(':') {
                        self.advance_char();
                        TokenKind::DoubleColon
                    } else {
                        TokenKind::Colon
                    }
                }
                '.' => {
                    self.advance_char();
                    if self.peek_char() != Some('.') {
                        return Err(self.error_at("expected `..`", start));
                    }
                    self.advance_char();
                    TokenKind::DotDot
                }
                '<' | '>' => {
                    self.advance_char();
                    let inclusive = self.peek_char() == Some('=');
                    if inclusive {
                        self.advance_char();
                    }
                    TokenKind::Compare(match (ch, inclusive) {
                        ('<', false) => ComparisonOp::Lt,
                        ('<', true) => ComparisonOp::Lte,
                        ('>', false) => ComparisonOp::Gt,
                        _ => ComparisonOp::Gte,
                    })
                }
                '/' => self.case_insensitive_suffix()?,
                '"' | '\'' => self.quoted(ch)?,
                _ if ch.is_ascii_digit() => self.number(),
                _ if ch.is_alphabetic() || ch == '_' => self.word(),
                _ => {
                    return Err(self.error_at(format!("unrecognized character `{ch}`"), start));
                }
            };
            self.tokens.push(Token {
                kind,
                span: start..self.pos,
            });
        }
        Ok(self.tokens)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance_char();
        kind
    }

    fn case_insensitive_suffix(&mut self) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        self.advance_char();
        if matches!(self.peek_char(), Some('i' | 'I')) {
            self.advance_char();
            if !self
                .peek_char()
                .is_some_and(|next| next.is_alphanumeric() || next == '_')
            {
                return Ok(TokenKind::CaseInsensitive);
            }
        }
        Err(self.error_at("expected `/i`", start))
    }

    // Only the opening quote character and backslash itself can be escaped;
    // every other backslash pair stays as written so regex escapes survive.
    fn quoted(&mut self, open: char) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        self.advance_char();
        let mut value = String::new();
        while let Some(ch) = self.peek_char() {
            self.advance_char();
            if ch == open {
                return Ok(TokenKind::Quoted(value));
            }
            if ch == '\\' {
                match self.peek_char() {
                    Some(next) if next == open || next == '\\' => {
                        self.advance_char();
                        value.push(next);
                    }
                    _ => value.push('\\'),
                }
                continue;
            }
            value.push(ch);
        }
        Err(self.error_at(format!("unterminated {open} quote"), start))
    }

    fn number(&mut self) -> TokenKind {
        let start = self.pos;
        self.eat_digits();
        let rest = &self.input[self.pos..];
        let mut chars = rest.chars();
        if chars.next() == Some('.') && chars.next().is_some_and(|ch| ch.is_ascii_digit()) {
            self.advance_char();
            self.eat_digits();
        }
        TokenKind::Number(self.input[start..self.pos].to_string())
    }

    fn eat_digits(&mut self) {
        while self.peek_char().is_some_and(|ch| ch.is_ascii_digit()) {
            self.advance_char();
        }
    }

    // Words may contain inner hyphens (`line-starts`) but a hyphen followed by
    // a digit ends the word so `first-3` splits into `first`, `-`, `3`.
    fn word(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance_char();
                continue;
            }
            if ch == '-'
                && self.input[self.pos + 1..]
                    .chars()
                    .next()
                    .is_some_and(|next| next.is_alphabetic())
            {
                self.advance_char();
                continue;
            }
            break;
        }
        let text = &self.input[start..self.pos];
        match Keyword::from_word(text) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Word(text.to_string()),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance_char(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn error_at(&self, message: impl Into<String>, position: usize) -> SyntaxError {
        SyntaxError::new(message, self.input, position)
    }
}
