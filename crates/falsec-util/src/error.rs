//! Error types shared across the compiler pipeline.
//!
//! Every phase (lexer, parser, code generator) reports failures through
//! the single [`FalseError`] enum so the driver only has to match on one
//! type regardless of which phase failed.

use thiserror::Error;

use crate::span::Span;

/// Unified compiler error.
///
/// All variants are fatal: the first one raised aborts the pipeline.
/// There is no error recovery and no batching.
#[derive(Debug, Error)]
pub enum FalseError {
    /// A byte the lexer does not recognize in the fixed symbol table.
    #[error("invalid character: {ch} (at {span})")]
    InvalidCharacter { ch: char, span: Span },

    /// `{` with no matching `}` before end-of-input.
    #[error("unclosed comment (starting at {span})")]
    UnclosedComment { span: Span },

    /// `'` with no following byte.
    #[error("expected a character (at {span})")]
    ExpectedCharacter { span: Span },

    /// `"` with no matching `"` before end-of-input.
    #[error("expected `\"` (string starting at {span})")]
    UnterminatedString { span: Span },

    /// The FALSE `` ` `` (inline assembly) opcode was used.
    #[error("assembly not supported (at {span})")]
    AssemblyNotSupported { span: Span },

    /// `` ` `` was not followed by an integer literal.
    #[error("syntax error: expected a short (at {span})")]
    ExpectedShort { span: Span },

    /// Source ended while a quotation or literal was still open.
    #[error("unexpected end of input while parsing{context}")]
    UnexpectedEof { context: String },

    /// An AST node reached code generation in a shape the generator
    /// does not know how to lower. This is a compiler bug, not a user
    /// error in the FALSE source.
    #[error("internal error: {0}")]
    Internal(String),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias used throughout the compiler.
pub type Result<T> = std::result::Result<T, FalseError>;
