//! Parser for the input deck.

use super::deck::{DeckEntry, InputDeck};
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::error::{HeatFilmError, Result};

/// Parser turning tokens into an [`InputDeck`].
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the whole deck.
    pub fn parse(&mut self) -> Result<InputDeck> {
        let mut deck = InputDeck::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Label => {
                    let entry = self.parse_entry()?;
                    if let Some(first) = deck.get(&entry.label) {
                        return Err(HeatFilmError::parse(
                            entry.line,
                            format!(
                                "duplicate field '{}' (first given at line {})",
                                entry.label, first.line
                            ),
                        ));
                    }
                    deck.entries.push(entry);
                }
                _ => {
                    return Err(HeatFilmError::parse(
                        self.current.line,
                        format!("expected a field label, got {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(deck)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn parse_entry(&mut self) -> Result<DeckEntry> {
        let label = self.current.text.to_lowercase();
        let line = self.current.line;
        self.advance()?;

        if self.current.kind == TokenKind::Equals {
            self.advance()?;
        }

        let mut values = Vec::new();
        while self.current.kind == TokenKind::Number {
            let text = &self.current.text;
            let value = parse_value(text).ok_or_else(|| {
                HeatFilmError::parse(line, format!("invalid number '{}' for '{}'", text, label))
            })?;
            values.push(value);
            self.advance()?;
        }

        match self.current.kind {
            TokenKind::Newline | TokenKind::Eof => {}
            _ => {
                return Err(HeatFilmError::parse(
                    line,
                    format!("unexpected {:?} after '{}'", self.current.text, label),
                ));
            }
        }

        if values.is_empty() {
            return Err(HeatFilmError::parse(
                line,
                format!("field '{}' has no value", label),
            ));
        }

        Ok(DeckEntry {
            label,
            values,
            line,
        })
    }
}
