use ariadne::Fmt;
use eqplot_error::{error_kind, Error as SpannedError, EXPR};
use eqplot_graph::PlotError;

/// The command is not one of the known commands.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownCommand {
    /// The name of the command, without the leading `:`.
    pub name: String,
}

error_kind!(UnknownCommand, |this| {
    message: format!("unknown command `:{}`", this.name),
    labels: ["this command"],
    help: format!("type {} to list the commands", ":help".fg(EXPR)),
});

/// An argument to a command could not be understood.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidArgument {
    /// What the command expected.
    pub expected: &'static str,
}

error_kind!(InvalidArgument, |this| {
    message: "invalid argument",
    labels: [format!("expected {}", this.expected)],
});

/// Utility enum to package errors that can occur while reading a command or plotting.
#[derive(Debug)]
pub enum Error {
    /// The command could not be understood. The spans point into the command line.
    Command(SpannedError),

    /// The equation could not be plotted.
    Plot(PlotError),
}

impl Error {
    /// Report the errors in this [`Error`] to stderr.
    ///
    /// `input` is the equation or command line the spans point into, and `exclude` is the active
    /// exclusion condition, if any.
    pub fn report_to_stderr(&self, input: &str, exclude: Option<&str>) {
        let result = match self {
            Self::Command(err) => err.report_to_stderr("input", input),
            Self::Plot(err) => err.report_to_stderr(input, exclude),
        };
        if let Err(err) = result {
            eprintln!("could not report the error: {}", err);
        }
    }
}

impl From<SpannedError> for Error {
    fn from(err: SpannedError) -> Self {
        Self::Command(err)
    }
}

impl From<PlotError> for Error {
    fn from(err: PlotError) -> Self {
        Self::Plot(err)
    }
}
