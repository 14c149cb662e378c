//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.
//!
//! Every error produced while parsing an equation, validating plot options, or handing a plot off
//! to a presenter is a small struct implementing [`ErrorKind`]. The struct is wrapped in an
//! [`Error`] together with the regions of the source code it points at, and can then be rendered
//! to the terminal with [`ariadne`].

pub use ariadne;

use ariadne::{Color, Label, Report, ReportKind, Source};
use std::{fmt::Debug, io, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Creates a new error that is not associated with any region of the source code.
    pub fn spanless(kind: impl ErrorKind + 'static) -> Self {
        Self::new(Vec::new(), kind)
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Report this error to stderr.
    ///
    /// The `ariadne` crate's [`Report`] type actually does not have a `Display` implementation, so
    /// we can only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        self.build_report(src_id).eprint((src_id, Source::from(input)))
    }

    /// Renders the report for this error into a string, including any ANSI color codes.
    pub fn report_to_string(&self, src_id: &str, input: &str) -> io::Result<String> {
        let mut buf = Vec::new();
        self.build_report(src_id).write((src_id, Source::from(input)), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Builds a standard report with one label per span.
///
/// Labels are matched to spans in order. Spans without a matching label are still highlighted,
/// but carry no message. This is the function used by [`error_kind!`].
pub fn build_report<'a, 'r>(
    src_id: &'a str,
    spans: &[Range<usize>],
    message: String,
    labels: &[String],
    help: Option<String>,
) -> Report<'r, (&'a str, Range<usize>)> {
    let offset = spans.first().map_or(0, |span| span.start);
    let labels = spans
        .iter()
        .enumerate()
        .map(|(idx, span)| {
            let label = Label::new((src_id, span.clone())).with_color(EXPR);
            match labels.get(idx) {
                Some(message) => label.with_message(message),
                None => label,
            }
        });

    let mut builder = Report::build(ReportKind::Error, src_id, offset)
        .with_message(message)
        .with_labels(labels);
    if let Some(help) = help {
        builder.set_help(help);
    }
    builder.finish()
}

/// Implements [`ErrorKind`] for a type from a message, a list of labels, and optional help text.
///
/// The closure-like binding names the value the expressions may refer to.
///
/// ```
/// use eqplot_error::{error_kind, Error};
///
/// #[derive(Debug)]
/// struct UnknownSymbol {
///     name: String,
/// }
///
/// error_kind!(UnknownSymbol, |this| {
///     message: format!("unknown symbol `{}`", this.name),
///     labels: ["this symbol"],
///     help: "only the plotted variables and constants may be used",
/// });
///
/// let err = Error::new(vec![0..1], UnknownSymbol { name: "z".to_string() });
/// assert!(err.report_to_string("input", "z").is_ok());
/// ```
#[macro_export]
macro_rules! error_kind {
    (
        $ty:ty,
        |$this:ident| {
            message: $message:expr,
            labels: [$($label:expr),* $(,)?]
            $(, help: $help:expr)?
            $(,)?
        }
    ) => {
        impl $crate::ErrorKind for $ty {
            fn build_report<'a>(
                &self,
                src_id: &'a str,
                spans: &[::std::ops::Range<usize>],
            ) -> $crate::ariadne::Report<(&'a str, ::std::ops::Range<usize>)> {
                #[allow(unused_variables)]
                let $this = self;
                let labels: &[::std::string::String] = &[
                    $(::std::string::ToString::to_string(&$label)),*
                ];
                let help: ::std::option::Option<::std::string::String> = ::std::option::Option::None
                    $(.or(::std::option::Option::Some(::std::string::ToString::to_string(&$help))))?;
                $crate::build_report(
                    src_id,
                    spans,
                    ::std::string::ToString::to_string(&$message),
                    labels,
                    help,
                )
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Unbalanced {
        opening: bool,
    }

    error_kind!(Unbalanced, |this| {
        message: "unclosed parenthesis",
        labels: ["this parenthesis is not closed"],
        help: if this.opening {
            "add a closing parenthesis `)` somewhere after this"
        } else {
            "add an opening parenthesis `(` somewhere before this"
        },
    });

    #[derive(Debug)]
    struct Bare;

    error_kind!(Bare, |_this| {
        message: "something went wrong",
        labels: [],
    });

    fn render(err: &Error, input: &str) -> String {
        let raw = err.report_to_string("input", input).unwrap();
        String::from_utf8(strip_ansi_escapes::strip(raw.as_bytes())).unwrap()
    }

    #[test]
    fn report_contains_message_label_and_help() {
        let err = Error::new(vec![4..5], Unbalanced { opening: true });
        let out = render(&err, "y = (x + 1");

        assert!(out.contains("unclosed parenthesis"));
        assert!(out.contains("this parenthesis is not closed"));
        assert!(out.contains("add a closing parenthesis"));
    }

    #[test]
    fn spanless_report() {
        let err = Error::spanless(Bare);
        let out = render(&err, "x");

        assert!(out.contains("something went wrong"));
    }

    #[test]
    fn free_report_builder() {
        let report = build_report(
            "input",
            &[0..1, 4..5],
            "two equality operators".to_string(),
            &["first".to_string()],
            Some("use a single `=`".to_string()),
        );
        let mut buf = Vec::new();
        report.write(("input", Source::from("a = b = c")), &mut buf).unwrap();
        let out = String::from_utf8(strip_ansi_escapes::strip(&buf)).unwrap();

        assert!(out.contains("two equality operators"));
        assert!(out.contains("first"));
        assert!(out.contains("use a single `=`"));
    }
}
