//! The symbolic capability used by the equation analysis pipeline.
//!
//! The pipeline never manipulates [`SymExpr`] trees directly. It goes through the [`Symbolic`]
//! trait, so the normalizer and the classifier only depend on the set of operations below.

use crate::{
    error::SymbolicFailure,
    expr::SymExpr,
    fraction::{self, Fraction},
    limit::{self, Limit},
    numeric::NumericExpr,
    poly::{split_polynomial_part, Poly},
    simplify,
    solve::{self, poly_roots, Root, Solution},
};
use rug::Rational;
use std::collections::BTreeSet;

/// Operations on an algebraic expression.
pub trait Symbolic: Sized {
    /// Simplifies the expression.
    fn simplify(&self) -> Self;

    /// Combines the expression into a single fraction.
    fn together(&self) -> Fraction;

    /// Factors the numerator and denominator of the expression into linear factors with rational
    /// roots in the variable `var`, times an irreducible remainder.
    fn factor(&self, var: &str) -> Self;

    /// Returns the monic greatest common divisor of the polynomial parts of two expressions.
    fn gcd(&self, other: &Self, var: &str) -> Result<Self, SymbolicFailure>;

    /// Replaces every occurrence of `var` with `value`.
    fn substitute(&self, var: &str, value: &Self) -> Self;

    /// Solves `self = 0` for `var`.
    fn solve_for(&self, var: &str) -> Result<Vec<Root>, SymbolicFailure>;

    /// Solves `self = 0` for `var`, also reporting how many factors could not be solved.
    fn solve_partial(&self, var: &str) -> Result<Solution, SymbolicFailure>;

    /// Computes the limit of the expression as `var` approaches `at`.
    fn limit(&self, var: &str, at: &Root) -> Result<Limit, SymbolicFailure>;

    /// Returns the variables of the expression.
    fn free_symbols(&self) -> BTreeSet<String>;

    /// Returns true if `var` appears in the expression.
    fn has_symbol(&self, var: &str) -> bool;

    /// Evaluates the expression numerically. Variables missing from `values` evaluate to `NaN`.
    fn eval(&self, values: &[(&str, f64)]) -> f64;

    /// Compiles the expression for fast evaluation with the given variables.
    fn compile(&self, vars: &[&str]) -> Result<NumericExpr, SymbolicFailure>;
}

/// Writes a polynomial as a product of its leading coefficient, its linear factors with rational
/// roots, and what remains.
fn factor_poly(poly: &Poly, var: &str) -> SymExpr {
    let Some(degree) = poly.degree() else {
        return SymExpr::int(0);
    };
    if degree == 0 {
        return poly.to_expr(var);
    }

    let roots = match poly_roots(poly) {
        Ok(roots) => roots,
        Err(_) => return poly.to_expr(var),
    };

    let mut rest = poly.clone();
    let mut factors = vec![SymExpr::number(poly.leading())];
    for root in roots {
        let Root::Rational(root) = root else {
            continue;
        };
        let linear = Poly::linear_factor(&root);
        let mut multiplicity = 0;
        while let Some((quot, rem)) = rest.divrem(&linear) {
            if !rem.is_zero() {
                break;
            }
            rest = quot;
            multiplicity += 1;
        }

        let base = if root == 0 {
            SymExpr::symbol(var)
        } else {
            SymExpr::symbol(var) + SymExpr::number(Rational::from(-&root))
        };
        factors.push(match multiplicity {
            0 => continue,
            1 => base,
            m => base.pow(SymExpr::int(m)),
        });
    }

    if rest.degree().map_or(false, |d| d > 0) {
        factors.push(rest.monic().to_expr(var));
    }

    simplify::simplify(&SymExpr::Mul(factors).downgrade())
}

/// Factors one side of a fraction, or simplifies it if it is not a polynomial.
fn factor_side(expr: &SymExpr, var: &str) -> SymExpr {
    match Poly::from_expr(expr, var) {
        Ok(poly) => factor_poly(&poly, var),
        Err(_) => expr.clone(),
    }
}

impl Symbolic for SymExpr {
    fn simplify(&self) -> Self {
        simplify::simplify(self)
    }

    fn together(&self) -> Fraction {
        fraction::together(self)
    }

    fn factor(&self, var: &str) -> Self {
        let Fraction { num, den } = fraction::together(self);
        Fraction {
            num: factor_side(&num, var),
            den: factor_side(&den, var),
        }.into_expr()
    }

    fn gcd(&self, other: &Self, var: &str) -> Result<Self, SymbolicFailure> {
        let (a, _) = split_polynomial_part(self, var);
        let (b, _) = split_polynomial_part(other, var);
        let g = a.gcd(&b);
        if g.is_zero() {
            return Err(SymbolicFailure::new("gcd", "the gcd of two zero polynomials is undefined"));
        }
        Ok(g.to_expr(var))
    }

    fn substitute(&self, var: &str, value: &Self) -> Self {
        SymExpr::substitute(self, var, value)
    }

    fn solve_for(&self, var: &str) -> Result<Vec<Root>, SymbolicFailure> {
        solve::solve(self, var)
    }

    fn solve_partial(&self, var: &str) -> Result<Solution, SymbolicFailure> {
        solve::solve_partial(self, var)
    }

    fn limit(&self, var: &str, at: &Root) -> Result<Limit, SymbolicFailure> {
        limit::limit(self, var, at)
    }

    fn free_symbols(&self) -> BTreeSet<String> {
        SymExpr::free_symbols(self)
    }

    fn has_symbol(&self, var: &str) -> bool {
        SymExpr::has_symbol(self, var)
    }

    fn eval(&self, values: &[(&str, f64)]) -> f64 {
        self.eval_with(&|name| {
            values.iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| *value)
        })
    }

    fn compile(&self, vars: &[&str]) -> Result<NumericExpr, SymbolicFailure> {
        NumericExpr::compile(self, vars)
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use eqplot_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> SymExpr {
        let ast = Parser::with_symbols(source, &["x", "y"]).try_parse_full::<AstExpr>().unwrap();
        SymExpr::try_from(&ast).unwrap()
    }

    #[test]
    fn factor_difference_of_squares() {
        let factored = parse("x^2 - 4").factor("x");
        assert_eq!(factored, parse("(x - 2)(x + 2)").simplify());
    }

    #[test]
    fn factor_with_multiplicity_and_remainder() {
        let factored = parse("2x^4 - 4x^3 + 4x^2 - 8x").factor("x");
        assert_eq!(factored, parse("2x(x - 2)(x^2 + 2)").simplify());
    }

    #[test]
    fn factor_fraction() {
        let factored = parse("(x^2 - 1)/(x^2 - 2x + 1)").factor("x");
        let value = factored.eval(&[("x", 3.0)]);
        assert_float_absolute_eq!(value, 2.0);
    }

    #[test]
    fn gcd_of_numerator_and_denominator() {
        let g = parse("x^2 - 4").gcd(&parse("x - 2"), "x").unwrap();
        assert_eq!(g, parse("x - 2"));
    }

    #[test]
    fn eval_with_values() {
        assert_float_absolute_eq!(parse("2xy + 5y^2").eval(&[("x", 1.0), ("y", 2.0)]), 24.0);
        assert!(parse("x + y").eval(&[("x", 1.0)]).is_nan());
    }
}
