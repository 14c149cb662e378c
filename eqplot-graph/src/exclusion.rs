//! Predicates over `(x, y)` marking the points kept out of the sampled grid.

use crate::error::InvalidTolerance;
use eqplot_error::Error;
use eqplot_math::{NumericExpr, SymExpr};
use eqplot_parser::parser::{
    ast::expr::Expr as AstExpr,
    token::op::{BinOpKind, UnaryOpKind},
    Parser,
};
use ndarray::{Array2, Zip};

/// A comparison between two numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Eq,
    NotEq,
}

impl Comparison {
    fn from_op(kind: BinOpKind) -> Option<Self> {
        Some(match kind {
            BinOpKind::Less => Self::Less,
            BinOpKind::LessEq => Self::LessEq,
            BinOpKind::Greater => Self::Greater,
            BinOpKind::GreaterEq => Self::GreaterEq,
            BinOpKind::Eq => Self::Eq,
            BinOpKind::NotEq => Self::NotEq,
            _ => return None,
        })
    }

    /// Compares two numbers. Any comparison involving `NaN` is false, except `!=`.
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Less => lhs < rhs,
            Self::LessEq => lhs <= rhs,
            Self::Greater => lhs > rhs,
            Self::GreaterEq => lhs >= rhs,
            Self::Eq => lhs == rhs,
            Self::NotEq => lhs != rhs,
        }
    }
}

/// A compiled boolean condition in two variables.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// A comparison between two numeric expressions.
    Compare(Comparison, NumericExpr, NumericExpr),

    /// Both conditions hold.
    And(Box<Condition>, Box<Condition>),

    /// Either condition holds.
    Or(Box<Condition>, Box<Condition>),

    /// The condition does not hold.
    Not(Box<Condition>),

    /// A numeric expression, which holds when it is finite and non-zero.
    Truthy(NumericExpr),
}

/// Compiles one side of a comparison.
fn compile_numeric(expr: &AstExpr, vars: &[&str]) -> Result<NumericExpr, Error> {
    let sym = SymExpr::try_from(expr)?;
    NumericExpr::compile(&sym, vars).map_err(|failure| Error::new(vec![expr.span()], failure))
}

impl Condition {
    /// Compiles a parsed condition over the given variables.
    pub fn compile(expr: &AstExpr, vars: &[&str]) -> Result<Self, Error> {
        match expr {
            AstExpr::Paren(paren) => Self::compile(paren.innermost(), vars),
            AstExpr::Unary(unary) if unary.op.kind == UnaryOpKind::Not => {
                Ok(Self::Not(Box::new(Self::compile(&unary.operand, vars)?)))
            },
            AstExpr::Binary(bin) => match bin.op.kind {
                BinOpKind::And => Ok(Self::And(
                    Box::new(Self::compile(&bin.lhs, vars)?),
                    Box::new(Self::compile(&bin.rhs, vars)?),
                )),
                BinOpKind::Or => Ok(Self::Or(
                    Box::new(Self::compile(&bin.lhs, vars)?),
                    Box::new(Self::compile(&bin.rhs, vars)?),
                )),
                kind => match Comparison::from_op(kind) {
                    Some(cmp) => Ok(Self::Compare(
                        cmp,
                        compile_numeric(&bin.lhs, vars)?,
                        compile_numeric(&bin.rhs, vars)?,
                    )),
                    None => Ok(Self::Truthy(compile_numeric(expr, vars)?)),
                },
            },
            _ => Ok(Self::Truthy(compile_numeric(expr, vars)?)),
        }
    }

    /// Evaluates the condition with the given variable values.
    pub fn eval(&self, args: &[f64]) -> bool {
        match self {
            Self::Compare(cmp, lhs, rhs) => cmp.holds(lhs.eval(args), rhs.eval(args)),
            Self::And(lhs, rhs) => lhs.eval(args) && rhs.eval(args),
            Self::Or(lhs, rhs) => lhs.eval(args) || rhs.eval(args),
            Self::Not(cond) => !cond.eval(args),
            Self::Truthy(expr) => {
                let value = expr.eval(args);
                value.is_finite() && value != 0.0
            },
        }
    }
}

/// Decides which points of the plane are kept out of the sampled grid.
#[derive(Clone, Debug, PartialEq)]
pub enum ExclusionPredicate {
    /// A condition written by the user, such as `abs(x - 2) < 0.001`.
    Explicit(Condition),

    /// The union of the vertical bands `|x - x0| < tol`. With no x-values, this excludes nothing.
    Near { xs: Vec<f64>, tol: f64 },
}

impl ExclusionPredicate {
    /// Parses and compiles an exclusion condition over the variables `x` and `y`.
    ///
    /// The returned errors carry spans into `source`.
    pub fn parse(source: &str, x: &str, y: &str) -> Result<Self, Vec<Error>> {
        let vars = [x, y];
        let ast = Parser::with_symbols(source, &vars).try_parse_full::<AstExpr>()?;
        Condition::compile(&ast, &vars)
            .map(Self::Explicit)
            .map_err(|err| vec![err])
    }

    /// Creates a predicate excluding a band of half-width `tol` around each of the x-values.
    pub fn near(xs: Vec<f64>, tol: f64) -> Result<Self, Error> {
        if !(tol.is_finite() && tol > 0.0) {
            return Err(Error::spanless(InvalidTolerance { tolerance: tol }));
        }
        Ok(Self::Near { xs, tol })
    }

    /// Returns true if the point is excluded.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            Self::Explicit(cond) => cond.eval(&[x, y]),
            Self::Near { xs, tol } => xs.iter().any(|x0| (x - x0).abs() < *tol),
        }
    }

    /// Evaluates the predicate at every point of a mesh. `x` and `y` must have the same shape.
    pub fn mask(&self, x: &Array2<f64>, y: &Array2<f64>) -> Array2<bool> {
        if let Self::Near { xs, .. } = self {
            if xs.is_empty() {
                return Array2::from_elem(x.raw_dim(), false);
            }
        }
        Zip::from(x).and(y).par_map_collect(|&x, &y| self.contains(x, y))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn near_band() {
        let predicate = ExclusionPredicate::near(vec![2.0], 1e-3).unwrap();
        assert!(predicate.contains(2.0, 17.0));
        assert!(predicate.contains(2.0005, 0.0));
        assert!(!predicate.contains(2.002, 0.0));
        assert!(!predicate.contains(1.998, 0.0));
        assert!(!predicate.contains(-2.0, 0.0));
    }

    #[test]
    fn band_edges_are_kept() {
        let predicate = ExclusionPredicate::near(vec![0.5], 0.25).unwrap();
        assert!(!predicate.contains(0.75, 0.0));
        assert!(!predicate.contains(0.25, 0.0));
        assert!(predicate.contains(0.625, 0.0));
        assert!(predicate.contains(0.375, 0.0));
    }

    #[test]
    fn union_of_bands() {
        let predicate = ExclusionPredicate::near(vec![-1.0, 0.5, 3.0], 0.25).unwrap();
        for x in [-1.125, -1.0, 0.5, 0.6875, 3.0, 3.125] {
            assert!(predicate.contains(x, 0.0), "x = {}", x);
        }
        for x in [-1.25, -0.75, 0.0, 0.75, 2.75, 3.25, 10.0] {
            assert!(!predicate.contains(x, 0.0), "x = {}", x);
        }
    }

    #[test]
    fn empty_band_excludes_nothing() {
        let predicate = ExclusionPredicate::near(Vec::new(), 1e-3).unwrap();
        assert!(!predicate.contains(0.0, 0.0));
    }

    #[test]
    fn invalid_tolerance() {
        assert!(ExclusionPredicate::near(vec![1.0], 0.0).is_err());
        assert!(ExclusionPredicate::near(vec![1.0], -1.0).is_err());
    }

    #[test]
    fn explicit_condition() {
        let predicate = ExclusionPredicate::parse("abs(x - 2) < 0.01 | y >= 3", "x", "y").unwrap();
        assert!(predicate.contains(2.005, 0.0));
        assert!(predicate.contains(0.0, 3.0));
        assert!(!predicate.contains(0.0, 0.0));
    }

    #[test]
    fn explicit_condition_with_not_and_and() {
        let predicate = ExclusionPredicate::parse("not (x > 0 && y > 0)", "x", "y").unwrap();
        assert!(!predicate.contains(1.0, 1.0));
        assert!(predicate.contains(-1.0, 1.0));
    }

    #[test]
    fn truthy_expression() {
        let predicate = ExclusionPredicate::parse("x - 1", "x", "y").unwrap();
        assert!(predicate.contains(0.0, 0.0));
        assert!(!predicate.contains(1.0, 0.0));
    }

    #[test]
    fn nan_is_not_excluded() {
        let predicate = ExclusionPredicate::parse("sqrt(x) < 1", "x", "y").unwrap();
        assert!(!predicate.contains(-1.0, 0.0));
        assert!(predicate.contains(0.25, 0.0));
    }

    #[test]
    fn unknown_symbol_in_condition() {
        let errs = ExclusionPredicate::parse("z < 1", "x", "y").unwrap_err();
        assert_eq!(errs[0].spans, vec![0..1]);
    }

    #[test]
    fn scientific_notation_in_condition() {
        let predicate = ExclusionPredicate::parse("abs(x) < 1e-3", "x", "y").unwrap();
        assert!(predicate.contains(0.0, 0.0));
        assert!(predicate.contains(5e-4, 0.0));
        assert!(!predicate.contains(0.002, 0.0));
    }

    #[test]
    fn mask_over_mesh() {
        let x = Array2::from_shape_fn((2, 3), |(_, j)| j as f64);
        let y = Array2::from_shape_fn((2, 3), |(i, _)| i as f64);
        let predicate = ExclusionPredicate::near(vec![1.0], 0.5).unwrap();
        let mask = predicate.mask(&x, &y);
        assert_eq!(mask, ndarray::array![[false, true, false], [false, true, false]]);
    }
}
