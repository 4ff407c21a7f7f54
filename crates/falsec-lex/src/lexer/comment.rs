//! `{ ... }` comment skipping. Comments do not nest.

use falsec_util::{FalseError, Span};

use super::core::Lexer;

impl<'a> Lexer<'a> {
    /// Called with the cursor positioned just after the opening `{`.
    pub(super) fn skip_comment(&mut self) -> Result<(), FalseError> {
        loop {
            match self.cursor.current() {
                None => {
                    return Err(FalseError::UnclosedComment {
                        span: Span::point(self.token_start, self.token_start_line, self.token_start_column),
                    });
                }
                Some(b'}') => {
                    self.cursor.advance();
                    return Ok(());
                }
                Some(_) => self.cursor.advance(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Lexer;
    use crate::token::TokenKind;

    #[test]
    fn comment_is_skipped() {
        let mut lexer = Lexer::new("{ this is a comment } $");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Dup);
    }

    #[test]
    fn unclosed_comment_errors() {
        let mut lexer = Lexer::new("{unterminated");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn comments_do_not_nest() {
        // the inner '{' is just a character inside the comment; the
        // comment ends at the first '}'.
        let mut lexer = Lexer::new("{ a { b } $");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Dup);
    }
}
