pub mod kind;

/// A general parsing error.
///
/// Parsing errors share the span-carrying error type used by the rest of the workspace, so they
/// can be reported with the same `ariadne` machinery.
pub use eqplot_error::Error;
