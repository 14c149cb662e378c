use ariadne::Fmt;
use eqplot_error::{error_kind, EXPR};
use std::fmt;

/// A symbolic operation could not be carried out on the given expression.
///
/// This is usually not fatal: the caller drops whatever it was trying to compute, and carries on
/// with the information it has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicFailure {
    /// The operation that failed, such as `solve` or `limit`.
    pub operation: &'static str,

    /// A human-readable description of why the operation failed.
    pub reason: String,
}

impl SymbolicFailure {
    /// Creates a new failure for the given operation.
    pub fn new(operation: &'static str, reason: impl Into<String>) -> Self {
        Self {
            operation,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SymbolicFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.reason)
    }
}

impl std::error::Error for SymbolicFailure {}

error_kind!(SymbolicFailure, |this| {
    message: format!("could not {} this expression", this.operation),
    labels: [this.reason.as_str()],
    help: format!("the expression may not be a {}", "rational function".fg(EXPR)),
});
