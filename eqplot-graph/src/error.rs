//! Errors produced while analyzing and plotting an equation.

use ariadne::Fmt;
use eqplot_error::{error_kind, Error, EXPR};
use std::{fmt, io};

/// The bounds of one axis of the viewport are invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidViewport {
    /// The name of the axis, such as `x`.
    pub axis: String,

    /// The lower bound.
    pub min: f64,

    /// The upper bound.
    pub max: f64,
}

error_kind!(InvalidViewport, |this| {
    message: format!("invalid bounds for the {}-axis: ({}, {})", this.axis, this.min, this.max),
    labels: [],
    help: format!("the bounds must be {} with the lower bound first", "finite numbers".fg(EXPR)),
});

/// The independent and dependent variables have the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct IdenticalSymbols {
    /// The name given to both variables.
    pub name: String,
}

error_kind!(IdenticalSymbols, |this| {
    message: format!("both variables are named `{}`", this.name),
    labels: [],
    help: "the independent and dependent variables must have different names",
});

/// The sampling grid resolution is too small.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidResolution {
    /// The resolution that was given.
    pub resolution: usize,
}

error_kind!(InvalidResolution, |this| {
    message: format!("invalid grid resolution {}", this.resolution),
    labels: [],
    help: "the grid must have at least 2 samples along each axis",
});

/// The exclusion tolerance is not a positive number.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidTolerance {
    /// The tolerance that was given.
    pub tolerance: f64,
}

error_kind!(InvalidTolerance, |this| {
    message: format!("invalid exclusion tolerance {}", this.tolerance),
    labels: [],
    help: format!("the tolerance must be a {} number", "positive".fg(EXPR)),
});

/// The two coordinate lists of a data series have different lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthMismatch {
    /// The number of x-coordinates.
    pub xs: usize,

    /// The number of y-coordinates.
    pub ys: usize,
}

error_kind!(LengthMismatch, |this| {
    message: "x and y must have the same length",
    labels: [],
    help: format!("{} x-coordinates and {} y-coordinates were given", this.xs, this.ys),
});

/// A presenter could not render what it was given.
///
/// This never fails a plotting call: the render plan is still returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderUnavailable {
    /// Why the presenter is unavailable.
    pub reason: String,
}

impl RenderUnavailable {
    /// Creates a new error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl fmt::Display for RenderUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "rendering is unavailable: {}", self.reason)
    }
}

impl std::error::Error for RenderUnavailable {}

error_kind!(RenderUnavailable, |this| {
    message: "rendering is unavailable",
    labels: [],
    help: this.reason.as_str(),
});

/// An error that prevents an equation from being analyzed.
#[derive(Debug)]
pub enum PlotError {
    /// The equation could not be parsed. The spans point into the equation.
    Parse(Vec<Error>),

    /// The explicit exclusion condition could not be parsed. The spans point into the condition.
    Exclusion(Vec<Error>),

    /// The plot options are invalid.
    Config(Error),
}

impl PlotError {
    /// Returns the errors contained in this error.
    pub fn errors(&self) -> &[Error] {
        match self {
            Self::Parse(errs) | Self::Exclusion(errs) => errs,
            Self::Config(err) => std::slice::from_ref(err),
        }
    }

    /// Reports every contained error to stderr. `equation` and `exclusion` are the sources the
    /// spans point into.
    pub fn report_to_stderr(&self, equation: &str, exclusion: Option<&str>) -> io::Result<()> {
        let (src_id, input) = match self {
            Self::Exclusion(_) => ("exclude", exclusion.unwrap_or_default()),
            _ => ("input", equation),
        };
        for err in self.errors() {
            err.report_to_stderr(src_id, input)?;
        }
        Ok(())
    }
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Parse(errs) => write!(f, "could not parse the equation ({} error(s))", errs.len()),
            Self::Exclusion(errs) => {
                write!(f, "could not parse the exclusion condition ({} error(s))", errs.len())
            },
            Self::Config(_) => write!(f, "invalid plot options"),
        }
    }
}

impl std::error::Error for PlotError {}
