use ariadne::Fmt;
use eqplot_error::{error_kind, EXPR};
use crate::tokenizer::TokenKind;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, PartialEq)]
pub struct UnexpectedEof;

error_kind!(UnexpectedEof, |_this| {
    message: "unexpected end of equation",
    labels: [format!("you might need to add another {} here", "expression".fg(EXPR))],
});

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedEof;

error_kind!(ExpectedEof, |_this| {
    message: "expected end of equation",
    labels: [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
});

/// An unexpected token was encountered.
#[derive(Debug, Clone, PartialEq)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

error_kind!(UnexpectedToken, |this| {
    message: "unexpected token",
    labels: [format!(
        "expected one of: {}",
        this.expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "),
    )],
    help: format!("found {:?}", this.found),
});

/// A character that is not part of the grammar was found.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownToken {
    /// The unrecognized text.
    pub lexeme: String,
}

error_kind!(UnknownToken, |this| {
    message: format!("unknown character `{}`", this.lexeme),
    labels: ["I don't know what this means"],
    help: "equations may only contain numbers, names, operators, and parentheses",
});

/// A parenthesis was not closed or opened.
#[derive(Debug, Clone, PartialEq)]
pub struct UnclosedParenthesis {
    /// Whether the parenthesis was an opening parenthesis `(`. Otherwise, the parenthesis was a
    /// closing parenthesis `)`.
    pub opening: bool,
}

error_kind!(UnclosedParenthesis, |this| {
    message: "unclosed parenthesis",
    labels: ["this parenthesis is not closed"],
    help: if this.opening {
        "add a closing parenthesis `)` somewhere after this"
    } else {
        "add an opening parenthesis `(` somewhere before this"
    },
});

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyParenthesis;

error_kind!(EmptyParenthesis, |_this| {
    message: "missing expression inside parenthesis",
    labels: ["add an expression here"],
});

/// A name that is neither a plotted variable, a constant, nor a function.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownSymbol {
    /// The name that could not be resolved.
    pub name: String,

    /// The names that are allowed in this position.
    pub allowed: Vec<String>,
}

error_kind!(UnknownSymbol, |this| {
    message: format!("unknown symbol `{}`", this.name),
    labels: ["this name is not defined"],
    help: if this.allowed.is_empty() {
        format!("only the constants {} may be used here", "`pi` and `e`".fg(EXPR))
    } else {
        format!(
            "use one of the variables {}, or the constants {}",
            this.allowed.iter().map(|s| format!("`{}`", s)).collect::<Vec<_>>().join(", ").fg(EXPR),
            "`pi` and `e`".fg(EXPR),
        )
    },
});

/// A function was called with the wrong number of arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct WrongArgumentCount {
    /// The name of the function.
    pub name: String,

    /// The number of arguments given.
    pub given: usize,

    /// The accepted number of arguments, in words.
    pub expected: &'static str,
}

error_kind!(WrongArgumentCount, |this| {
    message: format!("wrong number of arguments for `{}`", this.name),
    labels: [format!("{} argument(s) given here", this.given)],
    help: format!("`{}` takes {}", this.name, this.expected),
});

/// The equation contained more than one equality operator.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipleEquality;

error_kind!(MultipleEquality, |_this| {
    message: "too many equality operators",
    labels: ["first equality operator", "another equality operator"],
    help: format!("an equation must have {} `=` or `==`", "exactly one".fg(EXPR)),
});

/// A comparison or logical operator was used where an algebraic expression was expected.
#[derive(Debug, Clone, PartialEq)]
pub struct NotAlgebraic {
    /// The operator that was found, as written in the source.
    pub op: String,
}

error_kind!(NotAlgebraic, |this| {
    message: format!("`{}` cannot be used in an equation", this.op),
    labels: ["this operator produces a boolean"],
    help: "comparisons and logical operators are only allowed in exclusion conditions",
});
