//! Lexical analysis for FALSE source.
//!
//! Turns a byte stream into a lazy sequence of [`token::Token`]s. The
//! lexer holds no lookahead buffer: each [`Lexer::next_token`] call
//! advances the cursor past exactly one token, or raises the first
//! error it encounters (spec §4.1).

pub mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        while let Some(tok) = lexer.next_token().unwrap() {
            out.push(tok.kind);
        }
        out
    }

    #[test]
    fn tokenizes_a_small_program() {
        use TokenKind::*;
        assert_eq!(
            kinds("10 a: a; ."),
            vec![Integer(10), Variable(b'a'), SetVar, Variable(b'a'), GetVar, PrintInt]
        );
    }

    #[test]
    fn hello_world_is_one_string_token() {
        use TokenKind::*;
        assert_eq!(kinds("\"Hello, World!\""), vec![String(b"Hello, World!".to_vec())]);
    }

    #[test]
    fn nested_brackets_tokenize_flat() {
        use TokenKind::*;
        assert_eq!(
            kinds("[ [ 1 ] ! ]"),
            vec![OpenBracket, OpenBracket, Integer(1), CloseBracket, Execute, CloseBracket]
        );
    }

    #[test]
    fn tokenization_is_total_for_well_formed_input() {
        // every token is produced and iteration terminates cleanly
        let mut lexer = Lexer::new("1 2 + . [ $ 0 > ] [ $ . 1 - ] #");
        let mut count = 0;
        while lexer.next_token().unwrap().is_some() {
            count += 1;
        }
        assert!(count > 0);
    }
}
