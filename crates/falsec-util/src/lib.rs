//! Shared foundation types for the `falsec` compiler crates.
//!
//! This crate holds the pieces every compiler phase needs and none of
//! them should duplicate: the error taxonomy ([`error::FalseError`]) and
//! source location tracking ([`span::Span`]).

pub mod error;
pub mod span;

pub use error::{FalseError, Result};
pub use span::Span;
