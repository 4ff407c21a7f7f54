//! Codegen-internal error mapping.
//!
//! inkwell's builder operations return `Result<_, BuilderError>` only for
//! misuse that cannot arise from a well-formed AST (building into a
//! block that was never positioned, a malformed call signature). Such
//! failures are implementation bugs, not user-facing compiler errors,
//! so they collapse into a single internal variant rather than growing
//! their own taxonomy.

use falsec_util::FalseError;

pub(crate) trait OrInternal<T> {
    fn or_internal(self, what: &str) -> Result<T, FalseError>;
}

impl<T, E: std::fmt::Display> OrInternal<T> for Result<T, E> {
    fn or_internal(self, what: &str) -> Result<T, FalseError> {
        self.map_err(|e| FalseError::Internal(format!("{what}: {e}")))
    }
}
