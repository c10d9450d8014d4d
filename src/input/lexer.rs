//! Lexer (tokenizer) for the input deck.

use crate::error::{HeatFilmError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A field label
    Label,
    /// A number, possibly with an SI suffix
    Number,
    /// Optional '=' between a label and its values
    Equals,
    Newline,
    Eof,
}

/// Lexer for tokenizing deck input.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;
        let token = |kind, text: String| Token {
            kind,
            text,
            line,
            column,
        };

        let Some(&ch) = self.chars.peek() else {
            return Ok(token(TokenKind::Eof, String::new()));
        };

        match ch {
            '\n' => {
                self.advance();
                Ok(token(TokenKind::Newline, "\n".to_string()))
            }
            '=' => {
                self.advance();
                Ok(token(TokenKind::Equals, "=".to_string()))
            }
            '-' | '+' | '.' | '0'..='9' => Ok(token(TokenKind::Number, self.read_number())),
            _ if ch.is_alphabetic() || ch == '_' => {
                Ok(token(TokenKind::Label, self.read_label()))
            }
            _ => Err(HeatFilmError::lexer(
                line,
                column,
                format!("unexpected character '{}'", ch),
            )),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consume the next character if it satisfies `pred`.
    fn take_if(&mut self, text: &mut String, pred: impl Fn(char) -> bool) -> bool {
        match self.chars.peek() {
            Some(&ch) if pred(ch) => {
                text.push(ch);
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else if ch == '#' || ch == ';' {
                while self.chars.peek().is_some_and(|&c| c != '\n') {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_label(&mut self) -> String {
        let mut text = String::new();
        while self.take_if(&mut text, |c| c.is_alphanumeric() || c == '_') {}
        text
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();
        self.take_if(&mut text, |c| c == '-' || c == '+');
        while self.take_if(&mut text, |c| c.is_ascii_digit()) {}
        if self.take_if(&mut text, |c| c == '.') {
            while self.take_if(&mut text, |c| c.is_ascii_digit()) {}
        }
        if self.take_if(&mut text, |c| c == 'e' || c == 'E') {
            self.take_if(&mut text, |c| c == '-' || c == '+');
            while self.take_if(&mut text, |c| c.is_ascii_digit()) {}
        }
        self.take_if(&mut text, |c| {
            matches!(c, 'p' | 'n' | 'u' | 'µ' | 'm' | 'k' | 'M' | 'G')
        });
        text
    }
}

/// Parse a number string with optional SI suffix.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let last = text.chars().last()?;
    let multiplier = match last {
        'p' => 1e-12,
        'n' => 1e-9,
        'u' | 'µ' => 1e-6,
        'm' => 1e-3,
        'k' => 1e3,
        'M' => 1e6,
        'G' => 1e9,
        _ => return text.parse::<f64>().ok(),
    };
    text[..text.len() - last.len_utf8()]
        .parse::<f64>()
        .ok()
        .map(|v| v * multiplier)
}
