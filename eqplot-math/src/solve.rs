//! Finding the roots of polynomials and expressions.
//!
//! Roots are found exactly whenever possible. The rational root theorem finds every rational
//! root of a polynomial with rational coefficients; what is left is solved with the quadratic
//! formula, or numerically with the Durand-Kerner method for higher degrees.

use crate::{
    error::SymbolicFailure,
    expr::{Primary, SymExpr},
    fraction::together,
    poly::Poly,
    primitive::{int, rational},
    simplify::rules::power::eval_rational_power,
};
use log::{debug, warn};
use num_complex::Complex64;
use rug::{Integer, Rational};
use std::cmp::Ordering;

/// Constant terms and leading coefficients larger than this are not searched for rational roots.
const MAX_DIVISOR_SEARCH: u64 = 100_000_000;

/// Polynomials of higher degree than this are not solved numerically.
const MAX_NUMERIC_DEGREE: usize = 100;

/// Maximum number of Durand-Kerner iterations.
const MAX_ITERATIONS: usize = 1000;

/// A root of an equation in one variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Root {
    /// An exact rational root.
    Rational(Rational),

    /// An irrational real root, approximated numerically.
    Real(f64),

    /// A non-real root, approximated numerically.
    Complex(Complex64),
}

impl Root {
    /// Returns the root as an [`f64`] if it is real.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Rational(r) => Some(r.to_f64()),
            Self::Real(r) => Some(*r),
            Self::Complex(_) => None,
        }
    }

    /// Returns true if the root is real.
    pub fn is_real(&self) -> bool {
        !matches!(self, Self::Complex(_))
    }

    /// Returns true if both roots are the same point, up to floating point error for
    /// approximated roots.
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => a == b,
            (Self::Complex(a), Self::Complex(b)) => (a - b).norm() <= 1e-9 * a.norm().max(1.0),
            (a, b) => match (a.as_real(), b.as_real()) {
                (Some(a), Some(b)) => (a - b).abs() <= 1e-9 * a.abs().max(1.0),
                _ => false,
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Rational(_) => 0,
            Self::Real(_) => 1,
            Self::Complex(_) => 2,
        }
    }

    /// Orders rational roots first, then real roots, then complex roots, each in increasing
    /// order.
    fn cmp_for_display(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => a.cmp(b),
            (Self::Real(a), Self::Real(b)) => a.total_cmp(b),
            (Self::Complex(a), Self::Complex(b)) => a.re.total_cmp(&b.re)
                .then_with(|| a.im.total_cmp(&b.im)),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl std::fmt::Display for Root {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rational(r) if *r.denom() == 1 => write!(f, "{}", r.numer()),
            Self::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Self::Real(r) => write!(f, "{}", r),
            Self::Complex(c) if c.im < 0.0 => write!(f, "{} - {}i", c.re, -c.im),
            Self::Complex(c) => write!(f, "{} + {}i", c.re, c.im),
        }
    }
}

/// Returns the distinct positive divisors of `n`, which must be positive and small enough.
fn divisors(n: u64) -> Vec<u64> {
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            small.push(d);
            if d * d != n {
                large.push(n / d);
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    small
}

/// Finds the rational roots of a square-free polynomial with the rational root theorem, and
/// divides them out. Returns the roots found, and the remaining factor.
fn rational_roots(poly: &Poly) -> (Vec<Rational>, Poly) {
    let mut roots = Vec::new();
    let mut rest = poly.clone();

    // `0` is a root if there is no constant term
    if rest.coeffs().first().map_or(false, |c| *c == 0) {
        roots.push(rational(0));
        if let Some((quot, _)) = rest.divrem(&Poly::x()) {
            rest = quot;
        }
    }

    if rest.degree().map_or(true, |d| d == 0) {
        return (roots, rest);
    }

    let coeffs = rest.to_integer_coeffs();
    let (Some(constant), Some(leading)) = (coeffs.first(), coeffs.last()) else {
        return (roots, rest);
    };
    let bounded = |n: &Integer| n.clone().abs().to_u64().filter(|n| *n <= MAX_DIVISOR_SEARCH);
    let (Some(constant), Some(leading)) = (bounded(constant), bounded(leading)) else {
        debug!("coefficients of {} are too large for the rational root search", rest);
        return (roots, rest);
    };

    'search: for p in divisors(constant) {
        for q in divisors(leading) {
            for sign in [1i64, -1] {
                if rest.degree().map_or(true, |d| d == 0) {
                    break 'search;
                }

                let candidate = Rational::from((int(p) * sign, int(q)));
                if rest.eval(&candidate) == 0 {
                    if let Some((quot, _)) = rest.divrem(&Poly::linear_factor(&candidate)) {
                        rest = quot;
                    }
                    roots.push(candidate);
                }
            }
        }
    }

    (roots, rest)
}

/// Solves a quadratic polynomial with no rational roots.
fn quadratic_roots(poly: &Poly) -> Vec<Root> {
    let coeffs = poly.coeffs();
    let (c, b, a) = (&coeffs[0], &coeffs[1], &coeffs[2]);
    let disc = Rational::from(b * b) - Rational::from(a * c) * 4u32;

    if let Some(sqrt) = eval_rational_power(&disc, &rational((1, 2))) {
        let two_a = Rational::from(a * 2u32);
        return [-b.clone() - &sqrt, -b.clone() + sqrt]
            .into_iter()
            .map(|n| Root::Rational(n / &two_a))
            .collect();
    }

    let (a, b, c, disc) = (a.to_f64(), b.to_f64(), c.to_f64(), disc.to_f64());
    if disc < 0.0 {
        let re = -b / (2.0 * a);
        let im = (-disc).sqrt() / (2.0 * a).abs();
        vec![Root::Complex(Complex64::new(re, -im)), Root::Complex(Complex64::new(re, im))]
    } else {
        // avoid cancellation between `-b` and the square root
        let q = -0.5 * (b + b.signum() * disc.sqrt());
        vec![Root::Real(q / a), Root::Real(c / q)]
    }
}

/// Approximates the roots of a polynomial with the Durand-Kerner method.
fn numeric_roots(poly: &Poly) -> Result<Vec<Root>, SymbolicFailure> {
    let degree = poly.degree().unwrap_or(0);
    if degree > MAX_NUMERIC_DEGREE {
        return Err(SymbolicFailure::new(
            "solve",
            format!("a polynomial of degree {} is too large to solve numerically", degree),
        ));
    }

    let monic = poly.monic();
    let seed = Complex64::new(0.4, 0.9);
    let mut roots = (0..degree)
        .map(|k| seed.powu(k as u32))
        .collect::<Vec<_>>();

    for _ in 0..MAX_ITERATIONS {
        let mut max_change: f64 = 0.0;
        for i in 0..degree {
            let denom = (0..degree)
                .filter(|&j| j != i)
                .fold(Complex64::new(1.0, 0.0), |acc, j| acc * (roots[i] - roots[j]));
            let delta = monic.eval_complex(roots[i]) / denom;
            if delta.is_finite() {
                roots[i] -= delta;
                max_change = max_change.max(delta.norm() / roots[i].norm().max(1.0));
            }
        }
        if max_change < 1e-14 {
            break;
        }
    }

    Ok(roots.into_iter()
        .map(|z| {
            if z.im.abs() <= 1e-8 * z.norm().max(1.0) {
                Root::Real(z.re)
            } else {
                Root::Complex(z)
            }
        })
        .collect())
}

/// Finds every distinct root of a polynomial.
///
/// Rational roots are exact. Other roots are found with the quadratic formula, or approximated
/// numerically. The roots are ordered with [`Root::Rational`] first, then [`Root::Real`], then
/// [`Root::Complex`], each in increasing order.
pub fn poly_roots(poly: &Poly) -> Result<Vec<Root>, SymbolicFailure> {
    if poly.is_zero() {
        return Err(SymbolicFailure::new("solve", "every value is a solution of 0 = 0"));
    }

    let (found, rest) = rational_roots(&poly.square_free());
    let mut roots = found.into_iter().map(Root::Rational).collect::<Vec<_>>();

    match rest.degree() {
        None | Some(0) => (),
        Some(1) => {
            let coeffs = rest.coeffs();
            roots.push(Root::Rational(Rational::from(-&coeffs[0]) / &coeffs[1]));
        },
        Some(2) => roots.extend(quadratic_roots(&rest)),
        Some(_) => roots.extend(numeric_roots(&rest)?),
    }

    roots.sort_by(Root::cmp_for_display);
    Ok(roots)
}

/// Adds the roots of one factor to the list of roots, skipping duplicates.
fn merge_roots(roots: &mut Vec<Root>, new: Vec<Root>) {
    for root in new {
        if !roots.iter().any(|r| r.same_as(&root)) {
            roots.push(root);
        }
    }
}

/// Solves `factor = 0`, where `factor` contains no fractions.
fn factor_roots(factor: &SymExpr, var: &str) -> Result<Vec<Root>, SymbolicFailure> {
    if !factor.has_symbol(var) {
        return if factor.is_zero() {
            Err(SymbolicFailure::new("solve", "every value is a solution of 0 = 0"))
        } else {
            Ok(Vec::new())
        };
    }

    if let Ok(poly) = Poly::from_expr(factor, var) {
        return poly_roots(&poly);
    }

    match factor {
        // `base^n = 0` has the same roots as `base = 0` for positive `n`
        SymExpr::Exp(base, exp) if exp.as_number().map_or(false, |n| *n > 0) => {
            factor_roots(base, var)
        },
        SymExpr::Exp(_, exp) if exp.as_number().map_or(false, |n| *n < 0) => Ok(Vec::new()),
        SymExpr::Primary(Primary::Call(name, args)) if name == "abs" && args.len() == 1 => {
            factor_roots(&args[0], var)
        },
        SymExpr::Mul(factors) => {
            let mut roots = Vec::new();
            for factor in factors {
                merge_roots(&mut roots, factor_roots(factor, var)?);
            }
            Ok(roots)
        },
        _ => Err(SymbolicFailure::new(
            "solve",
            format!("cannot solve `{} = 0` for {}", factor, var),
        )),
    }
}

/// The roots found for an equation, along with the number of factors that could not be solved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Solution {
    /// The roots of the factors that could be solved, sorted and distinct.
    pub roots: Vec<Root>,

    /// The number of factors of the numerator whose roots could not be found.
    pub skipped: usize,
}

/// Solves `expr = 0` for the variable `var`, skipping the factors that cannot be solved.
///
/// The expression is first combined into a single fraction, and the roots of each factor of the
/// numerator are found separately. If no factor can be solved, an error is returned.
pub fn solve_partial(expr: &SymExpr, var: &str) -> Result<Solution, SymbolicFailure> {
    let num = together(expr).num;
    let factors = match &num {
        SymExpr::Mul(factors) => factors.as_slice(),
        num => std::slice::from_ref(num),
    };

    let mut solution = Solution::default();
    let mut last_failure = None;
    let mut solved_any = false;
    for factor in factors {
        match factor_roots(factor, var) {
            Ok(new) => {
                solved_any = true;
                merge_roots(&mut solution.roots, new);
            },
            Err(failure) => {
                warn!("skipping factor of {}: {}", num, failure);
                solution.skipped += 1;
                last_failure = Some(failure);
            },
        }
    }

    match last_failure {
        Some(failure) if !solved_any => Err(failure),
        _ => {
            solution.roots.sort_by(Root::cmp_for_display);
            Ok(solution)
        },
    }
}

/// Solves `expr = 0` for the variable `var`.
///
/// Factors that cannot be solved are skipped with a warning. Use [`solve_partial`] to find out
/// how many were skipped.
pub fn solve(expr: &SymExpr, var: &str) -> Result<Vec<Root>, SymbolicFailure> {
    solve_partial(expr, var).map(|solution| solution.roots)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use eqplot_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> SymExpr {
        let ast = Parser::with_symbols(source, &["x"]).try_parse_full::<AstExpr>().unwrap();
        SymExpr::try_from(&ast).unwrap()
    }

    fn roots(source: &str) -> Vec<Root> {
        solve(&parse(source), "x").unwrap()
    }

    #[test]
    fn linear() {
        assert_eq!(roots("x - 3"), vec![Root::Rational(rational(3))]);
        assert_eq!(roots("2x + 1"), vec![Root::Rational(rational((-1, 2)))]);
    }

    #[test]
    fn rational_roots_are_sorted_and_distinct() {
        assert_eq!(roots("(x - 2)^2 (x + 1) x"), vec![
            Root::Rational(rational(-1)),
            Root::Rational(rational(0)),
            Root::Rational(rational(2)),
        ]);
    }

    #[test]
    fn irrational_quadratic() {
        let found = roots("x^2 - 2");
        assert_eq!(found.len(), 2);
        assert_float_absolute_eq!(found[0].as_real().unwrap(), -std::f64::consts::SQRT_2);
        assert_float_absolute_eq!(found[1].as_real().unwrap(), std::f64::consts::SQRT_2);
    }

    #[test]
    fn complex_quadratic() {
        let found = roots("x^2 + 1");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|root| !root.is_real()));
    }

    #[test]
    fn cubic_with_irrational_roots() {
        let found = roots("x^3 - 3x + 1");
        assert_eq!(found.len(), 3);
        for root in found {
            let x = root.as_real().unwrap();
            assert_float_absolute_eq!(x * x * x - 3.0 * x + 1.0, 0.0, 1e-9);
        }
    }

    #[test]
    fn numerator_of_fraction() {
        assert_eq!(roots("(x - 1)/(x + 1)"), vec![Root::Rational(rational(1))]);
    }

    #[test]
    fn power_of_polynomial() {
        assert_eq!(roots("sqrt(x - 5)"), vec![Root::Rational(rational(5))]);
    }

    #[test]
    fn unsolvable() {
        assert!(solve(&parse("sin(x) - x/2"), "x").is_err());
    }

    #[test]
    fn unsolvable_factors_are_counted() {
        let solution = solve_partial(&parse("x sin(x) (x - 2)"), "x").unwrap();
        assert_eq!(solution.roots, vec![
            Root::Rational(rational(0)),
            Root::Rational(rational(2)),
        ]);
        assert_eq!(solution.skipped, 1);

        let solution = solve_partial(&parse("(x + 1)^2"), "x").unwrap();
        assert_eq!(solution.skipped, 0);
    }

    #[test]
    fn constant_has_no_roots() {
        assert_eq!(roots("5"), vec![]);
    }
}
