//! Recursive-descent parser over the lexer's token stream.

use falsec_lex::{Lexer, Token, TokenKind};
use falsec_util::{FalseError, Result, Span};

use crate::ast::AstNode;

/// Parses FALSE source into a top-level statement sequence.
///
/// Holds exactly one token of lookahead, pulled eagerly from the
/// lexer; `parse_statements` is the single recursive function used for
/// both the top-level sequence and every quotation body.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parses the whole program.
    ///
    /// A stray `]` with no matching `[` stops the top-level sequence
    /// without error, per the "at outermost depth this means input
    /// ends" rule — there is nothing further to parse.
    pub fn parse_program(&mut self) -> Result<Vec<AstNode>> {
        self.parse_statements()
    }

    fn parse_statements(&mut self) -> Result<Vec<AstNode>> {
        let mut nodes = Vec::new();
        loop {
            match &self.current {
                None => break,
                Some(tok) if tok.kind == TokenKind::CloseBracket => break,
                Some(_) => {
                    if let Some(node) = self.parse_statement()? {
                        nodes.push(node);
                    }
                }
            }
        }
        Ok(nodes)
    }

    /// Parses one statement, or `None` for a `Flush` token (recognized
    /// and discarded with no AST node emitted).
    fn parse_statement(&mut self) -> Result<Option<AstNode>> {
        let token = self.current.clone().expect("parse_statement called at end of input");

        let node = match token.kind {
            TokenKind::OpenBracket => {
                self.advance()?;
                let body = self.parse_statements()?;
                self.expect_close_bracket(token.span)?;
                AstNode::Quote(body)
            }
            TokenKind::CloseBracket => {
                unreachable!("parse_statements stops before consuming a CloseBracket")
            }
            TokenKind::Flush => {
                self.advance()?;
                return Ok(None);
            }
            TokenKind::Asm => return Err(self.parse_asm_error(token.span)),

            TokenKind::Variable(name) => {
                self.advance()?;
                AstNode::Variable(name)
            }
            TokenKind::String(text) => {
                self.advance()?;
                AstNode::String(text)
            }
            TokenKind::Integer(value) => {
                self.advance()?;
                AstNode::Integer(value)
            }

            TokenKind::GetVar => self.atom(AstNode::GetVar)?,
            TokenKind::SetVar => self.atom(AstNode::SetVar)?,
            TokenKind::Dup => self.atom(AstNode::Dup)?,
            TokenKind::Discard => self.atom(AstNode::Discard)?,
            TokenKind::Swap => self.atom(AstNode::Swap)?,
            TokenKind::Rotate => self.atom(AstNode::Rotate)?,
            TokenKind::Take => self.atom(AstNode::Take)?,
            TokenKind::Plus => self.atom(AstNode::Plus)?,
            TokenKind::Minus => self.atom(AstNode::Minus)?,
            TokenKind::Mul => self.atom(AstNode::Mul)?,
            TokenKind::Div => self.atom(AstNode::Div)?,
            TokenKind::Negate => self.atom(AstNode::Negate)?,
            TokenKind::BitAnd => self.atom(AstNode::BitAnd)?,
            TokenKind::BitOr => self.atom(AstNode::BitOr)?,
            TokenKind::BitInvert => self.atom(AstNode::BitInvert)?,
            TokenKind::Equal => self.atom(AstNode::Equal)?,
            TokenKind::GreaterThan => self.atom(AstNode::GreaterThan)?,
            TokenKind::Execute => self.atom(AstNode::Execute)?,
            TokenKind::ExecuteIf => self.atom(AstNode::ExecuteIf)?,
            TokenKind::While => self.atom(AstNode::While)?,
            TokenKind::Getc => self.atom(AstNode::Getc)?,
            TokenKind::Putc => self.atom(AstNode::Putc)?,
            TokenKind::PrintInt => self.atom(AstNode::PrintInt)?,
        };

        Ok(Some(node))
    }

    /// Advances past the current (payload-free) token and returns `node`.
    fn atom(&mut self, node: AstNode) -> Result<AstNode> {
        self.advance()?;
        Ok(node)
    }

    fn expect_close_bracket(&mut self, open_span: Span) -> Result<()> {
        match &self.current {
            Some(tok) if tok.kind == TokenKind::CloseBracket => {
                self.advance()?;
                Ok(())
            }
            _ => Err(FalseError::UnexpectedEof {
                context: format!(" inside quotation opened at {open_span}"),
            }),
        }
    }

    /// `Asm` is followed by an `Integer`; the whole form exists only to
    /// be rejected, distinguishing "well-formed but unsupported" from
    /// "malformed assembly directive".
    fn parse_asm_error(&mut self, asm_span: Span) -> FalseError {
        self.advance().ok();
        match &self.current {
            Some(tok) if matches!(tok.kind, TokenKind::Integer(_)) => {
                self.advance().ok();
                FalseError::AssemblyNotSupported { span: asm_span }
            }
            _ => FalseError::ExpectedShort { span: asm_span },
        }
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<AstNode> {
        Parser::new(source).unwrap().parse_program().unwrap()
    }

    #[test]
    fn parses_flat_arithmetic() {
        use AstNode::*;
        assert_eq!(parse("1 2 +"), vec![Integer(1), Integer(2), Plus]);
    }

    #[test]
    fn parses_a_quotation() {
        use AstNode::*;
        assert_eq!(parse("[ 1 . ]"), vec![Quote(vec![Integer(1), PrintInt])]);
    }

    #[test]
    fn parses_nested_quotations() {
        use AstNode::*;
        assert_eq!(
            parse("[ [ 1 ] ! ]"),
            vec![Quote(vec![Quote(vec![Integer(1)]), Execute])]
        );
    }

    #[test]
    fn flush_is_dropped() {
        use AstNode::*;
        assert_eq!(parse("1 B 2"), vec![Integer(1), Integer(2)]);
    }

    #[test]
    fn unclosed_quotation_is_an_error() {
        assert!(Parser::new("[ 1 .").unwrap().parse_program().is_err());
    }

    #[test]
    fn stray_close_bracket_at_top_level_ends_parsing_without_error() {
        use AstNode::*;
        assert_eq!(parse("1 ] 2"), vec![Integer(1)]);
    }

    #[test]
    fn asm_with_integer_reports_assembly_not_supported() {
        let err = Parser::new("`7").unwrap().parse_program().unwrap_err();
        assert!(matches!(err, FalseError::AssemblyNotSupported { .. }));
    }

    #[test]
    fn asm_without_integer_reports_expected_short() {
        let err = Parser::new("` .").unwrap().parse_program().unwrap_err();
        assert!(matches!(err, FalseError::ExpectedShort { .. }));
    }

    #[test]
    fn variable_and_literal_tokens_carry_their_payload() {
        use AstNode::*;
        assert_eq!(parse("a: \"hi\""), vec![Variable(b'a'), SetVar, String(b"hi".to_vec())]);
    }
}
