//! Limits of rational functions.

use crate::{
    error::SymbolicFailure,
    expr::SymExpr,
    fraction::together,
    poly::{split_polynomial_part, Poly},
    solve::Root,
};
use rug::Rational;

/// Relative tolerance below which a denominator evaluated at an approximated root is considered
/// to be zero.
const ZERO_TOLERANCE: f64 = 1e-9;

/// The limit of an expression as a variable approaches a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Limit {
    /// The limit exists and is a finite real number.
    Finite(f64),

    /// The expression diverges.
    Infinite,

    /// The limit does not exist, is not real, or could not be determined.
    Undefined,
}

impl Limit {
    /// Returns the value of the limit if it is finite.
    pub fn finite(self) -> Option<f64> {
        match self {
            Self::Finite(value) => Some(value),
            _ => None,
        }
    }

    fn from_ratio(num: f64, den: f64, den_is_zero: bool) -> Self {
        if den_is_zero || den == 0.0 {
            if num.is_finite() && num != 0.0 {
                Self::Infinite
            } else {
                Self::Undefined
            }
        } else {
            let value = num / den;
            if value.is_finite() {
                Self::Finite(value)
            } else if value.is_nan() {
                Self::Undefined
            } else {
                Self::Infinite
            }
        }
    }
}

/// Divides both polynomials by their greatest common divisor.
fn cancel(num: &Poly, den: &Poly) -> (Poly, Poly) {
    let g = num.gcd(den);
    if g.degree().map_or(true, |d| d == 0) {
        return (num.clone(), den.clone());
    }

    let divide = |p: &Poly| p.divrem(&g).map_or_else(|| p.clone(), |(quot, _)| quot);
    (divide(num), divide(den))
}

/// Evaluates the product of the non-polynomial factors numerically.
fn eval_factors(factors: &[SymExpr], var: &str, at: f64) -> f64 {
    factors.iter()
        .map(|factor| factor.eval_with(&|name| (name == var).then_some(at)))
        .product()
}

/// Computes the limit of `expr` as `var` approaches the root `at`.
///
/// The expression is combined into a single fraction, and the polynomial parts of its numerator
/// and denominator are cancelled by their greatest common divisor before evaluating. Any other
/// factors are evaluated numerically at the point. Limits at non-real points are
/// [`Limit::Undefined`].
///
/// Returns an error if the expression depends on a variable other than `var`.
pub fn limit(expr: &SymExpr, var: &str, at: &Root) -> Result<Limit, SymbolicFailure> {
    if let Some(other) = expr.free_symbols().into_iter().find(|sym| sym != var) {
        return Err(SymbolicFailure::new(
            "limit",
            format!("the expression also depends on {}", other),
        ));
    }

    let frac = together(expr);
    let (num, num_rest) = split_polynomial_part(&frac.num, var);
    let (den, den_rest) = split_polynomial_part(&frac.den, var);
    if num.is_zero() {
        return Ok(Limit::Finite(0.0));
    }
    let (num, den) = cancel(&num, &den);

    Ok(match at {
        Root::Rational(x0) => {
            let num_value: Rational = num.eval(x0);
            let den_value: Rational = den.eval(x0);
            let x0 = x0.to_f64();
            Limit::from_ratio(
                num_value.to_f64() * eval_factors(&num_rest, var, x0),
                den_value.to_f64() * eval_factors(&den_rest, var, x0),
                den_value == 0,
            )
        },
        Root::Real(x0) => {
            let den_value = den.eval_f64(*x0);
            let den_is_zero = den_value.abs() <= ZERO_TOLERANCE * den.magnitude(*x0);
            Limit::from_ratio(
                num.eval_f64(*x0) * eval_factors(&num_rest, var, *x0),
                den_value * eval_factors(&den_rest, var, *x0),
                den_is_zero,
            )
        },
        Root::Complex(_) => Limit::Undefined,
    })
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use eqplot_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use num_complex::Complex64;
    use pretty_assertions::assert_eq;
    use crate::primitive::rational;
    use super::*;

    fn parse(source: &str) -> SymExpr {
        let ast = Parser::with_symbols(source, &["x", "y"]).try_parse_full::<AstExpr>().unwrap();
        SymExpr::try_from(&ast).unwrap()
    }

    fn limit_at(source: &str, x0: i64) -> Limit {
        limit(&parse(source), "x", &Root::Rational(rational(x0))).unwrap()
    }

    #[test]
    fn removable_discontinuity() {
        assert_eq!(limit_at("(x^2 - 4)/(x - 2)", 2), Limit::Finite(4.0));
    }

    #[test]
    fn pole() {
        assert_eq!(limit_at("1/(x - 3)", 3), Limit::Infinite);
    }

    #[test]
    fn double_root_in_denominator() {
        assert_eq!(limit_at("(x - 1)/(x - 1)^2", 1), Limit::Infinite);
    }

    #[test]
    fn continuous_point() {
        assert_eq!(limit_at("x^2 + 1", 2), Limit::Finite(5.0));
    }

    #[test]
    fn irrational_point() {
        let expr = parse("(x^2 - 2)/(x^2 - 2)");
        let lim = limit(&expr, "x", &Root::Real(std::f64::consts::SQRT_2)).unwrap();
        assert_float_absolute_eq!(lim.finite().unwrap(), 1.0);
    }

    #[test]
    fn complex_point() {
        let lim = limit(&parse("1/(x^2 + 1)"), "x", &Root::Complex(Complex64::new(0.0, 1.0)));
        assert_eq!(lim.unwrap(), Limit::Undefined);
    }

    #[test]
    fn other_variable() {
        assert!(limit(&parse("y/(x - 1)"), "x", &Root::Rational(rational(1))).is_err());
    }
}
