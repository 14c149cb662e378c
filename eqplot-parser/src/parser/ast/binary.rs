use crate::parser::{
    ast::expr::Expr,
    fmt::{ends_with_command, fmt_pow, starts_with_number, Latex},
    token::op::{BinOp, BinOpKind},
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary operation, such as `1 + 2`. Implicit multiplication, as in `2x`, is also represented
/// by this type, with [`BinOp::implicit`] set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary operation.
    pub lhs: Box<Expr>,

    /// The operator of the binary operation.
    pub op: BinOp,

    /// The right-hand side of the binary operation.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary operation was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Creates a binary operation spanning both of its operands.
    pub fn new(lhs: Expr, op: BinOp, rhs: Expr) -> Self {
        let span = lhs.span().start..rhs.span().end;
        Self {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span,
        }
    }

    /// Returns the span of the binary operation.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl std::fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.lhs.fmt(f)?;
        if !self.op.implicit {
            write!(f, "{}", self.op.kind.as_str())?;
        }
        self.rhs.fmt(f)
    }
}

impl Latex for BinOp {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            BinOpKind::Exp => write!(f, "^"),
            BinOpKind::Mul if self.implicit => Ok(()),
            BinOpKind::Mul => write!(f, " \\cdot "),
            BinOpKind::Div => write!(f, " / "),
            BinOpKind::Add => write!(f, "+"),
            BinOpKind::Sub => write!(f, "-"),
            BinOpKind::Greater => write!(f, " > "),
            BinOpKind::GreaterEq => write!(f, " \\geq "),
            BinOpKind::Less => write!(f, " < "),
            BinOpKind::LessEq => write!(f, " \\leq "),
            BinOpKind::Eq => write!(f, " = "),
            BinOpKind::NotEq => write!(f, " \\neq "),
            BinOpKind::And => write!(f, " \\land "),
            BinOpKind::Or => write!(f, " \\lor "),
        }
    }
}

impl Latex for Binary {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.kind {
            BinOpKind::Exp => fmt_pow(f, Some(&*self.lhs), Some(&*self.rhs)),
            BinOpKind::Div => {
                write!(f, "\\frac{{")?;
                self.lhs.innermost().fmt_latex(f)?;
                write!(f, "}}{{")?;
                self.rhs.innermost().fmt_latex(f)?;
                write!(f, "}}")
            },
            BinOpKind::Mul if self.op.implicit => {
                self.lhs.fmt_latex(f)?;
                if starts_with_number(&self.rhs) {
                    write!(f, " \\cdot ")?;
                } else if ends_with_command(&self.lhs) {
                    write!(f, " ")?;
                }
                self.rhs.fmt_latex(f)
            },
            _ => {
                self.lhs.fmt_latex(f)?;
                self.op.fmt_latex(f)?;
                self.rhs.fmt_latex(f)
            },
        }
    }
}
