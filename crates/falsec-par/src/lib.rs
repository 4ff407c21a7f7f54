//! Syntactic analysis for FALSE: turns a [`falsec_lex::Lexer`] token
//! stream into the flat top-level [`ast::AstNode`] sequence the code
//! generator walks.
//!
//! The grammar is small enough that one token of lookahead and a
//! single recursive function (shared between the top-level sequence
//! and every quotation body) cover all of it:
//!
//! ```text
//! Program    := Statement*
//! Statement  := Atom | Quote
//! Quote      := '[' Statement* ']'
//! Atom       := Variable | String | Integer | one of the primitive op tokens
//! ```

pub mod ast;
mod parser;

pub use ast::AstNode;
pub use parser::Parser;
