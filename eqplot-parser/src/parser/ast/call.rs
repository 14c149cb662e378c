use crate::parser::{
    ast::{expr::Expr, literal::LitSym},
    fmt::Latex,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function call, such as `sqrt(3 - x)` or `sin x`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function to call.
    pub name: LitSym,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments, or [`None`] if the function was
    /// applied without parentheses.
    pub paren_span: Option<Range<usize>>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the accepted number of arguments for the function with the given name, as an
    /// inclusive range.
    pub fn arity(name: &str) -> (usize, usize) {
        match name {
            "log" => (1, 2),
            _ => (1, 1),
        }
    }
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        if let Some((last, args)) = self.args.split_last() {
            for arg in args {
                write!(f, "{}, ", arg)?;
            }
            write!(f, "{}", last)?;
        }
        write!(f, ")")
    }
}

impl Latex for Call {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let arg = |f: &mut fmt::Formatter, idx: usize| match self.args.get(idx) {
            Some(arg) => arg.innermost().fmt_latex(f),
            None => Ok(()),
        };

        match self.name.name.as_str() {
            "sqrt" => {
                write!(f, "\\sqrt{{")?;
                arg(f, 0)?;
                write!(f, "}}")
            },
            "cbrt" => {
                write!(f, "\\sqrt[3]{{")?;
                arg(f, 0)?;
                write!(f, "}}")
            },
            "abs" | "Abs" => {
                write!(f, "\\left|")?;
                arg(f, 0)?;
                write!(f, "\\right|")
            },
            "exp" => {
                write!(f, "e^{{")?;
                arg(f, 0)?;
                write!(f, "}}")
            },
            "log" if self.args.len() == 2 => {
                write!(f, "\\log_{{")?;
                arg(f, 1)?;
                write!(f, "}}\\left(")?;
                arg(f, 0)?;
                write!(f, "\\right)")
            },
            name => {
                match name {
                    "sin" | "cos" | "tan" | "sec" | "csc" | "cot"
                        | "sinh" | "cosh" | "tanh"
                        | "arcsin" | "arccos" | "arctan"
                        | "log" | "ln" => write!(f, "\\{}", name)?,
                    "asin" | "acos" | "atan" => write!(f, "\\arc{}", &name[1..])?,
                    _ => write!(f, "\\operatorname{{{}}}", name)?,
                }
                write!(f, "\\left(")?;
                for (idx, _) in self.args.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    arg(f, idx)?;
                }
                write!(f, "\\right)")
            },
        }
    }
}
