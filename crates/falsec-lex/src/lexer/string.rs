//! String (`"..."`) and character (`'X`) literal lexing.

use falsec_util::FalseError;

use super::core::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Called with the cursor positioned just after the opening `"`.
    pub(super) fn lex_string(&mut self) -> Result<Token, FalseError> {
        let mut bytes = Vec::new();
        loop {
            match self.cursor.current() {
                None => {
                    return Err(FalseError::UnterminatedString {
                        span: self.token_span(),
                    });
                }
                Some(b'"') => {
                    self.cursor.advance();
                    return Ok(Token::new(TokenKind::String(bytes), self.token_span()));
                }
                Some(b) => {
                    bytes.push(b);
                    self.cursor.advance();
                }
            }
        }
    }

    /// Called with the cursor positioned just after the opening `'`.
    pub(super) fn lex_char_literal(&mut self) -> Result<Token, FalseError> {
        match self.cursor.current() {
            None => Err(FalseError::ExpectedCharacter {
                span: self.token_span(),
            }),
            Some(b) => {
                self.cursor.advance();
                Ok(Token::new(TokenKind::Integer(b as i32), self.token_span()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::token::TokenKind;
    use crate::Lexer;

    #[test]
    fn string_literal_has_raw_bytes() {
        let mut lexer = Lexer::new("\"hi\"");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::String(b"hi".to_vec()));
    }

    #[test]
    fn unterminated_string_errors() {
        let mut lexer = Lexer::new("\"hi");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn char_literal_yields_code_unit() {
        let mut lexer = Lexer::new("'A");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Integer(b'A' as i32));
    }

    #[test]
    fn char_literal_with_nothing_after_errors() {
        let mut lexer = Lexer::new("'");
        assert!(lexer.next_token().is_err());
    }
}
