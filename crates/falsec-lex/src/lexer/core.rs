//! Core lexer: main dispatch over the current byte.

use falsec_util::{FalseError, Span};

use crate::cursor::Cursor;
use crate::token::Token;

use super::operator;

/// Lexer for FALSE source.
///
/// Pull-driven and single-token-of-lookahead-free: each call to
/// [`Lexer::next_token`] advances the cursor past exactly one token (or
/// raises the first error encountered). There is no internal buffering.
pub struct Lexer<'a> {
    pub(super) cursor: Cursor<'a>,
    pub(super) token_start: usize,
    pub(super) token_start_line: u32,
    pub(super) token_start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, FalseError> {
        self.skip_whitespace()?;

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        let Some(byte) = self.cursor.current() else {
            return Ok(None);
        };

        let token = match byte {
            b'"' => {
                self.cursor.advance();
                self.lex_string()?
            }
            b'\'' => {
                self.cursor.advance();
                self.lex_char_literal()?
            }
            b'0'..=b'9' => self.lex_number()?,
            b'a'..=b'z' => self.lex_variable()?,
            _ => match operator::lookup(byte) {
                Some(kind) => {
                    self.cursor.advance();
                    Token::new(kind, self.token_span())
                }
                None => {
                    return Err(FalseError::InvalidCharacter {
                        ch: byte as char,
                        span: self.token_span(),
                    });
                }
            },
        };

        Ok(Some(token))
    }

    /// Skips whitespace and `{ ... }` comments, which may interleave freely.
    fn skip_whitespace(&mut self) -> Result<(), FalseError> {
        loop {
            match self.cursor.current() {
                Some(b) if is_whitespace(b) => self.cursor.advance(),
                Some(b'{') => {
                    self.token_start = self.cursor.position();
                    self.token_start_line = self.cursor.line();
                    self.token_start_column = self.cursor.column();
                    self.cursor.advance();
                    self.skip_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    pub(super) fn token_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }
}

/// Space, tab, newline, carriage return, form feed, or vertical tab.
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0c | 0x0b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn skips_all_whitespace_kinds() {
        let mut lexer = Lexer::new(" \t\r\n\x0b\x0c$");
        let tok = lexer.next_token().unwrap().unwrap();
        assert_eq!(tok.kind, TokenKind::Dup);
    }

    #[test]
    fn end_of_input_yields_none() {
        let mut lexer = Lexer::new("  ");
        assert_eq!(lexer.next_token().unwrap(), None);
    }

    #[test]
    fn unknown_byte_is_an_error() {
        let mut lexer = Lexer::new(")");
        assert!(lexer.next_token().is_err());
    }
}
