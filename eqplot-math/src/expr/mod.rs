//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](eqplot_parser::parser::ast::expr::Expr) type from `eqplot_parser` mirrors the
//! source code of an equation, including parentheses and the exact operators used. It's
//! convenient for parsing and for echoing the equation back to the user, but not so much for
//! algebraic manipulation.
//!
//! This module defines [`SymExpr`], which recursively flattens the AST into a list of terms or
//! factors, depending on the operation, and normalizes the expression into a sum of products.
//! Subtraction is represented as addition of a term multiplied by `-1`, and division as
//! multiplication by a factor raised to the power of `-1`. All numbers are exact rationals.
//!
//! # Strict equality
//!
//! Deciding whether two expressions are mathematically equal is hard, since there are an infinite
//! number of ways to write the same expression (consider `x^2 + 2x + 1` and `(x + 1)^2`). The
//! [`PartialEq`] implementation for [`SymExpr`] instead implements **strict equality**: two
//! expressions are strictly equal if they have the same shape, and their terms / factors are
//! strictly equal in any order.
//!
//! Strict equality never reports false positives, and it does not depend on simplification, so
//! it can be used by the simplifier to decide which terms and factors can be combined.

mod iter;

use crate::primitive::{int, rational, rational_from_decimal};
use eqplot_error::Error;
use eqplot_parser::parser::{
    ast::{expr::Expr as AstExpr, literal::Literal},
    error::kind::NotAlgebraic,
    token::op::{BinOpKind, UnaryOpKind},
};
use rug::Rational;
use std::{
    collections::BTreeSet,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub},
};

pub use iter::ExprIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constant {
    /// The ratio of a circle's circumference to its diameter.
    Pi,

    /// Euler's number, the base of the natural logarithm.
    E,
}

impl Constant {
    /// Returns the constant with the given name, if any.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Self::Pi),
            "e" => Some(Self::E),
            _ => None,
        }
    }

    /// Returns the value of the constant as an [`f64`].
    pub fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
        }
    }

    /// Returns the name of the constant, as written in source code.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "e",
        }
    }
}

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primary {
    /// An exact rational number, such as `2`, `1/4`, or `0.001`.
    Number(Rational),

    /// A mathematical constant, such as `pi`.
    Const(Constant),

    /// A variable, such as `x` or `y`.
    Symbol(String),

    /// A function call, such as `sin(x)` or `abs(x - 2)`.
    Call(String, Vec<SymExpr>),
}

impl std::fmt::Display for Primary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(num) if *num.denom() == 1 => write!(f, "{}", num.numer()),
            Self::Number(num) => write!(f, "{}/{}", num.numer(), num.denom()),
            Self::Const(c) => write!(f, "{}", c.name()),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

/// A mathematical expression with information about its terms and factors.
///
/// This type should be distinguished from the AST produced by [`eqplot_parser`]. The main
/// difference is that this type **flattens** out the tree structure. For example, the expression
/// `x + (y + z)` is represented as a single [`SymExpr::Add`] node with _three_ children, `x`, `y`,
/// and `z`.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<SymExpr>),

    /// Multiple factors multiplied together.
    Mul(Vec<SymExpr>),

    /// An expression raised to a power.
    Exp(Box<SymExpr>, Box<SymExpr>),
}

impl SymExpr {
    /// Creates a number expression.
    pub fn number(n: impl Into<Rational>) -> Self {
        Self::Primary(Primary::Number(n.into()))
    }

    /// Creates an integer expression.
    pub fn int(n: i64) -> Self {
        Self::Primary(Primary::Number(rational(n)))
    }

    /// Creates a symbol expression.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    /// Creates a power expression. No simplification is done.
    pub fn pow(self, exp: SymExpr) -> Self {
        Self::Exp(Box::new(self), Box::new(exp))
    }

    /// Returns `1 / self`. No simplification is done.
    pub fn recip(self) -> Self {
        self.pow(Self::int(-1))
    }

    /// If the expression is a [`Primary::Number`], returns a reference to the contained number.
    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            Self::Primary(Primary::Number(num)) => Some(num),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Number`], returns the contained number.
    pub fn into_number(self) -> Option<Rational> {
        match self {
            Self::Primary(Primary::Number(num)) => Some(num),
            _ => None,
        }
    }

    /// Returns true if the expression is a [`Primary::Number`].
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Primary(Primary::Number(_)))
    }

    /// Returns true if the expression is the number zero.
    pub fn is_zero(&self) -> bool {
        self.as_number().map_or(false, |n| *n == 0)
    }

    /// Returns true if the expression is the number one.
    pub fn is_one(&self) -> bool {
        self.as_number().map_or(false, |n| *n == 1)
    }

    /// If the expression is an integer, returns it as an [`i64`].
    pub fn as_small_integer(&self) -> Option<i64> {
        let num = self.as_number()?;
        if *num.denom() == 1 {
            num.numer().to_i64()
        } else {
            None
        }
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// Returns true if the expression is exactly the given symbol.
    pub fn is_symbol(&self, name: &str) -> bool {
        self.as_symbol() == Some(name)
    }

    /// If the expression is a power with a negative numeric exponent, returns the base and the
    /// (positive) negated exponent.
    ///
    /// Such factors are the denominator of a fraction: `x^-2` is `1 / x^2`.
    pub fn as_reciprocal(&self) -> Option<(&SymExpr, Rational)> {
        if let Self::Exp(base, exp) = self {
            if let Some(exp) = exp.as_number() {
                if *exp < 0 {
                    return Some((base, -exp.clone()));
                }
            }
        }
        None
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`SymExpr::Add`] with zero / one term, or an
    /// [`SymExpr::Mul`] with zero / one factor. This function checks for these cases and
    /// simplifies the expression into the single term / factor, or an [`SymExpr::Primary`]
    /// containing the number 0 or 1.
    pub fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::int(0)
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::int(1)
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first), including the arguments of function calls.
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns the names of all variables that appear in the expression, in sorted order.
    /// Constants are not included.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        self.post_order_iter()
            .filter_map(SymExpr::as_symbol)
            .map(str::to_owned)
            .collect()
    }

    /// Returns true if the given variable appears anywhere in the expression.
    pub fn has_symbol(&self, name: &str) -> bool {
        self.post_order_iter().any(|expr| expr.is_symbol(name))
    }

    /// Replaces every occurrence of the variable `name` with `value`. No simplification is done.
    pub fn substitute(&self, name: &str, value: &SymExpr) -> SymExpr {
        match self {
            Self::Primary(Primary::Symbol(sym)) if sym == name => value.clone(),
            Self::Primary(Primary::Call(func, args)) => Self::Primary(Primary::Call(
                func.clone(),
                args.iter().map(|arg| arg.substitute(name, value)).collect(),
            )),
            Self::Primary(_) => self.clone(),
            Self::Add(terms) => terms.iter()
                .map(|term| term.substitute(name, value))
                .fold(Self::Add(Vec::new()), |acc, term| acc + term)
                .downgrade(),
            Self::Mul(factors) => factors.iter()
                .map(|factor| factor.substitute(name, value))
                .fold(Self::Mul(Vec::new()), |acc, factor| acc * factor)
                .downgrade(),
            Self::Exp(base, exp) => base.substitute(name, value).pow(exp.substitute(name, value)),
        }
    }

    /// Evaluates the expression numerically, looking up the value of each variable with the given
    /// function.
    ///
    /// Unknown variables, unknown functions, and domain errors (such as the logarithm of a
    /// negative number) produce `NaN`. Division by zero produces an infinity.
    pub fn eval_with(&self, lookup: &dyn Fn(&str) -> Option<f64>) -> f64 {
        match self {
            Self::Primary(Primary::Number(num)) => num.to_f64(),
            Self::Primary(Primary::Const(c)) => c.value(),
            Self::Primary(Primary::Symbol(sym)) => lookup(sym).unwrap_or(f64::NAN),
            Self::Primary(Primary::Call(name, args)) => {
                let args = args.iter().map(|arg| arg.eval_with(lookup)).collect::<Vec<_>>();
                crate::numeric::Func::from_name(name)
                    .map_or(f64::NAN, |func| func.apply(&args))
            },
            Self::Add(terms) => terms.iter().map(|term| term.eval_with(lookup)).sum(),
            Self::Mul(factors) => factors.iter().map(|factor| factor.eval_with(lookup)).product(),
            Self::Exp(base, exp) => match exp.as_small_integer() {
                Some(n) if i32::try_from(n).is_ok() => base.eval_with(lookup).powi(n as i32),
                _ => base.eval_with(lookup).powf(exp.eval_with(lookup)),
            },
        }
    }

    /// If the expression is a product with a negative numeric coefficient, returns the product
    /// with the coefficient negated.
    fn negated_term(&self) -> Option<SymExpr> {
        match self {
            Self::Primary(Primary::Number(num)) if *num < 0 => Some(Self::number(-num.clone())),
            Self::Mul(factors) => {
                let idx = factors.iter().position(|f| f.as_number().map_or(false, |n| *n < 0))?;
                let mut factors = factors.clone();
                let coeff = factors[idx].as_number().map(|n| -n.clone())?;
                if coeff == 1 {
                    factors.remove(idx);
                } else {
                    factors[idx] = Self::number(coeff);
                }
                Some(Self::Mul(factors).downgrade())
            },
            _ => None,
        }
    }

    /// Returns true if this expression must be wrapped in parentheses when it appears as a factor
    /// or base.
    fn needs_parens_in(&self, parent: &SymExpr) -> bool {
        match (self, parent) {
            (Self::Add(_), Self::Mul(_) | Self::Exp(..)) => true,
            (Self::Mul(_), Self::Exp(..)) => true,
            (Self::Exp(..), Self::Exp(..)) => true,
            (Self::Primary(Primary::Number(n)), Self::Exp(..)) => *n < 0 || *n.denom() != 1,
            (Self::Primary(Primary::Number(n)), Self::Mul(_)) => *n.denom() != 1,
            _ => false,
        }
    }
}

impl std::fmt::Display for SymExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                    for term in iter {
                        match term.negated_term() {
                            Some(negated @ Self::Add(_)) => write!(f, " - ({})", negated)?,
                            Some(negated) => write!(f, " - {}", negated)?,
                            None => write!(f, " + {}", term)?,
                        }
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let mut first = true;
                for factor in factors {
                    if first {
                        if factor.as_number().map_or(false, |n| *n == -1) && factors.len() > 1 {
                            write!(f, "-")?;
                            continue;
                        }
                    } else {
                        write!(f, " * ")?;
                    }
                    first = false;

                    if factor.needs_parens_in(self) {
                        write!(f, "({})", factor)?;
                    } else {
                        write!(f, "{}", factor)?;
                    }
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                if base.needs_parens_in(self) {
                    write!(f, "({})", base)?;
                } else {
                    write!(f, "{}", base)?;
                }
                write!(f, "^")?;
                if exp.needs_parens_in(self) || matches!(**exp, Self::Add(_) | Self::Mul(_)) {
                    write!(f, "({})", exp)
                } else {
                    write!(f, "{}", exp)
                }
            },
        }
    }
}

/// Checks if two expressions are **strictly** equal.
///
/// Two expressions are strictly equal if:
/// - They are the same type of expression (i.e. both [`SymExpr::Primary`], both
/// [`SymExpr::Add`], etc.).
/// - If both are [`SymExpr::Primary`], both expressions must have strictly equal values.
/// - If both are [`SymExpr::Add`] or [`SymExpr::Mul`], both expressions must have strictly equal
/// terms / factors, in any order.
/// - If both are [`SymExpr::Exp`], both expressions must have strictly equal base and exponent.
impl PartialEq for SymExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                if lhs.len() != rhs.len() {
                    return false;
                }

                // match every element of `lhs` to a distinct element of `rhs`
                let mut used = vec![false; rhs.len()];
                lhs.iter().all(|l| {
                    match rhs.iter().enumerate().position(|(idx, r)| !used[idx] && l == r) {
                        Some(idx) => {
                            used[idx] = true;
                            true
                        },
                        None => false,
                    }
                })
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

/// Adds two expressions, flattening nested sums. No simplification is done.
impl Add for SymExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), rhs) => {
                terms.push(rhs);
                Self::Add(terms)
            },
            (lhs, Self::Add(mut terms)) => {
                terms.insert(0, lhs);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

impl AddAssign for SymExpr {
    fn add_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::Add(Vec::new()));
        *self = lhs + rhs;
    }
}

/// Multiplies two expressions, flattening nested products. No simplification is done.
impl Mul for SymExpr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Mul(mut factors), Self::Mul(rhs_factors)) => {
                factors.extend(rhs_factors);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), rhs) => {
                factors.push(rhs);
                Self::Mul(factors)
            },
            (lhs, Self::Mul(mut factors)) => {
                factors.insert(0, lhs);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

impl MulAssign for SymExpr {
    fn mul_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::Mul(Vec::new()));
        *self = lhs * rhs;
    }
}

/// Negates the expression. Numbers are negated directly; anything else is multiplied by `-1`.
impl Neg for SymExpr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Number(num)) => Self::number(-num),
            expr => Self::int(-1) * expr,
        }
    }
}

impl Sub for SymExpr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

/// Converts a function call from the AST, normalizing the function name and rewriting functions
/// that are powers in disguise.
fn convert_call(name: &str, mut args: Vec<SymExpr>) -> SymExpr {
    let call = |name: &str, args: Vec<SymExpr>| SymExpr::Primary(Primary::Call(name.to_owned(), args));
    match (name, args.len()) {
        ("sqrt", 1) => args.remove(0).pow(SymExpr::number(rational((1, 2)))),
        ("cbrt", 1) => args.remove(0).pow(SymExpr::number(rational((1, 3)))),
        ("exp", 1) => SymExpr::Primary(Primary::Const(Constant::E)).pow(args.remove(0)),
        ("ln", _) => call("log", args),
        ("log", 2) => {
            let base = args.remove(1);
            call("log", args) * call("log", vec![base]).recip()
        },
        ("Abs", _) => call("abs", args),
        ("arcsin", _) => call("asin", args),
        ("arccos", _) => call("acos", args),
        ("arctan", _) => call("atan", args),
        (name, _) => call(name, args),
    }
}

impl TryFrom<&AstExpr> for SymExpr {
    type Error = Error;

    /// Converts an AST expression into a [`SymExpr`].
    ///
    /// Comparisons and logical operators have no algebraic meaning, and result in an error
    /// pointing at the operator.
    fn try_from(expr: &AstExpr) -> Result<Self, Self::Error> {
        match expr {
            AstExpr::Literal(Literal::Integer(lit)) => Ok(Self::number(rational_from_decimal(&lit.value))),
            AstExpr::Literal(Literal::Float(lit)) => Ok(Self::number(rational_from_decimal(&lit.value))),
            AstExpr::Literal(Literal::Symbol(sym)) => Ok(match Constant::from_name(&sym.name) {
                Some(c) => Self::Primary(Primary::Const(c)),
                None => Self::symbol(sym.name.as_str()),
            }),
            AstExpr::Paren(paren) => Self::try_from(paren.innermost()),
            AstExpr::Call(call) => {
                let args = call.args.iter()
                    .map(Self::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(convert_call(&call.name.name, args))
            },
            AstExpr::Unary(unary) => match unary.op.kind {
                UnaryOpKind::Neg => Ok(-Self::try_from(&*unary.operand)?),
                UnaryOpKind::Not => Err(Error::new(
                    vec![unary.op.span.clone()],
                    NotAlgebraic { op: "not".to_string() },
                )),
            },
            AstExpr::Binary(bin) => {
                let lhs = Self::try_from(&*bin.lhs)?;
                let rhs = Self::try_from(&*bin.rhs)?;
                match bin.op.kind {
                    BinOpKind::Exp => Ok(lhs.pow(rhs)),
                    BinOpKind::Mul => Ok(lhs * rhs),
                    BinOpKind::Div => Ok(lhs * rhs.recip()),
                    BinOpKind::Add => Ok(lhs + rhs),
                    BinOpKind::Sub => Ok(lhs - rhs),
                    kind => Err(Error::new(
                        vec![bin.op.span.clone()],
                        NotAlgebraic { op: kind.as_str().to_string() },
                    )),
                }
            },
        }
    }
}

impl From<Rational> for SymExpr {
    fn from(num: Rational) -> Self {
        Self::number(num)
    }
}

impl From<i64> for SymExpr {
    fn from(n: i64) -> Self {
        Self::number(int(n))
    }
}

#[cfg(test)]
mod tests {
    use eqplot_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> SymExpr {
        let ast = Parser::with_symbols(source, &["a", "b", "c", "t", "x", "y", "z"])
            .try_parse_full::<AstExpr>()
            .unwrap();
        SymExpr::try_from(&ast).unwrap()
    }

    #[test]
    fn flatten_sum() {
        assert_eq!(parse("x + (y + z)"), SymExpr::Add(vec![
            SymExpr::symbol("x"),
            SymExpr::symbol("y"),
            SymExpr::symbol("z"),
        ]));
    }

    #[test]
    fn subtraction_and_division() {
        assert_eq!(parse("a - b/c"), SymExpr::Add(vec![
            SymExpr::symbol("a"),
            SymExpr::Mul(vec![
                SymExpr::int(-1),
                SymExpr::symbol("b"),
                SymExpr::symbol("c").recip(),
            ]),
        ]));
    }

    #[test]
    fn strict_equality_ignores_order() {
        assert_eq!(parse("2xy"), parse("y * x * 2"));
        assert_ne!(parse("x * x"), parse("x * y"));
    }

    #[test]
    fn decimals_are_exact() {
        assert_eq!(parse("0.25"), SymExpr::number(rational((1, 4))));
    }

    #[test]
    fn constants() {
        assert_eq!(parse("pi"), SymExpr::Primary(Primary::Const(Constant::Pi)));
        assert!(parse("2pi").free_symbols().is_empty());
    }

    #[test]
    fn comparisons_are_rejected() {
        let ast = Parser::new("x < 1").try_parse_full::<AstExpr>().unwrap();
        let err = SymExpr::try_from(&ast).unwrap_err();
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn sqrt_is_half_power() {
        assert_eq!(parse("sqrt(x)"), SymExpr::symbol("x").pow(SymExpr::number(rational((1, 2)))));
    }

    #[test]
    fn free_symbols_inside_calls() {
        let symbols = parse("sin(t) + y^2").free_symbols();
        assert_eq!(symbols.into_iter().collect::<Vec<_>>(), vec!["t".to_string(), "y".to_string()]);
    }

    #[test]
    fn substitute_and_eval() {
        let expr = parse("x^2 + 3x - 1").substitute("x", &SymExpr::int(2));
        assert_eq!(expr.eval_with(&|_| None), 9.0);
    }

    #[test]
    fn display() {
        assert_eq!(parse("x - 2y").to_string(), "x - 2 * y");
        assert_eq!(parse("(x + 1)^2").to_string(), "(x + 1)^2");
    }

    #[test]
    fn display_subtracted_sum() {
        let sum = SymExpr::symbol("y") + SymExpr::symbol("z");
        assert_eq!((SymExpr::symbol("x") - sum.clone()).to_string(), "x - (y + z)");
        assert_eq!((-sum.clone()).to_string(), "-(y + z)");
        assert_eq!((SymExpr::symbol("x") - SymExpr::int(2) * sum).to_string(), "x - 2 * (y + z)");
    }
}
