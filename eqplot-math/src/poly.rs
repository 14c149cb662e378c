//! Univariate polynomials with exact rational coefficients.
//!
//! A [`Poly`] is built from a [`SymExpr`] by fully expanding it in one variable. Every other
//! symbol, constant, or function call makes the conversion fail, so a successful conversion is a
//! proof that the expression is a polynomial with rational coefficients.

use crate::{
    error::SymbolicFailure,
    expr::{Primary, SymExpr},
    primitive::{int, rational},
};
use num_complex::Complex64;
use rug::{Integer, Rational};
use std::{fmt, ops::{Add, Mul, Neg, Sub}};

/// Largest exponent that is expanded when converting an expression into a polynomial.
pub const MAX_DEGREE: i64 = 128;

/// A univariate polynomial with [`Rational`] coefficients.
///
/// Coefficients are stored from the constant term upwards, with no trailing zeros, so the zero
/// polynomial has no coefficients at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    coeffs: Vec<Rational>,
}

impl Poly {
    /// Creates a polynomial from its coefficients, starting with the constant term.
    pub fn new(mut coeffs: Vec<Rational>) -> Self {
        while coeffs.last().map_or(false, |c| *c == 0) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// The constant polynomial `c`.
    pub fn constant(c: impl Into<Rational>) -> Self {
        Self::new(vec![c.into()])
    }

    /// The polynomial `x`.
    pub fn x() -> Self {
        Self::new(vec![rational(0), rational(1)])
    }

    /// The polynomial `x - root`.
    pub fn linear_factor(root: &Rational) -> Self {
        Self::new(vec![-root.clone(), rational(1)])
    }

    /// Returns the coefficients, starting with the constant term.
    pub fn coeffs(&self) -> &[Rational] {
        &self.coeffs
    }

    /// Returns true if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Returns the degree of the polynomial, or [`None`] for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Returns true if the polynomial is a non-zero constant.
    pub fn is_constant(&self) -> bool {
        self.degree() == Some(0)
    }

    /// Returns the leading coefficient, or zero for the zero polynomial.
    pub fn leading(&self) -> Rational {
        self.coeffs.last().cloned().unwrap_or_else(|| rational(0))
    }

    /// Multiplies every coefficient by `factor`.
    pub fn scale(&self, factor: &Rational) -> Self {
        Self::new(self.coeffs.iter().map(|c| Rational::from(c * factor)).collect())
    }

    /// Returns the polynomial divided by its leading coefficient.
    pub fn monic(&self) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        let inv = Rational::from(self.leading().recip_ref());
        self.scale(&inv)
    }

    /// Raises the polynomial to a non-negative integer power.
    pub fn pow(&self, mut exp: u32) -> Self {
        let mut result = Self::constant(1);
        let mut base = self.clone();
        while exp > 0 {
            if exp & 1 == 1 {
                result = &result * &base;
            }
            base = &base * &base;
            exp >>= 1;
        }
        result
    }

    /// Divides `self` by `divisor`, returning the quotient and remainder, or [`None`] if the
    /// divisor is zero.
    pub fn divrem(&self, divisor: &Self) -> Option<(Self, Self)> {
        let divisor_degree = divisor.degree()?;
        let lead = divisor.leading();
        let mut rem = self.coeffs.clone();
        let mut quot = vec![rational(0); self.coeffs.len().saturating_sub(divisor_degree)];

        while rem.len() > divisor_degree && !rem.is_empty() {
            let shift = rem.len() - 1 - divisor_degree;
            let factor = Rational::from(rem[rem.len() - 1].clone() / &lead);
            for (i, c) in divisor.coeffs.iter().enumerate() {
                rem[shift + i] -= Rational::from(&factor * c);
            }
            quot[shift] = factor;

            // the leading term is now exactly zero
            rem.pop();
            while rem.last().map_or(false, |c| *c == 0) {
                rem.pop();
            }
        }

        Some((Self::new(quot), Self::new(rem)))
    }

    /// Returns true if `divisor` divides `self` exactly.
    pub fn is_divisible_by(&self, divisor: &Self) -> bool {
        self.divrem(divisor).map_or(false, |(_, rem)| rem.is_zero())
    }

    /// Returns the monic greatest common divisor of two polynomials, computed with the Euclidean
    /// algorithm. The gcd of two zero polynomials is zero.
    pub fn gcd(&self, other: &Self) -> Self {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let rem = match a.divrem(&b) {
                Some((_, rem)) => rem,
                None => break,
            };
            a = b;
            // keep the coefficients small
            b = rem.monic();
        }
        a.monic()
    }

    /// Returns the derivative of the polynomial.
    pub fn derivative(&self) -> Self {
        Self::new(
            self.coeffs.iter()
                .enumerate()
                .skip(1)
                .map(|(k, c)| Rational::from(c * (k as u32)))
                .collect(),
        )
    }

    /// Returns the monic square-free part of the polynomial: the product of its distinct
    /// irreducible factors, each with multiplicity one.
    pub fn square_free(&self) -> Self {
        if self.degree().map_or(true, |d| d == 0) {
            return self.monic();
        }
        let g = self.gcd(&self.derivative());
        match self.divrem(&g) {
            Some((quot, _)) => quot.monic(),
            None => self.monic(),
        }
    }

    /// Returns the primitive integer polynomial with the same roots: the coefficients are
    /// multiplied by the lcm of their denominators, then divided by their gcd.
    pub fn to_integer_coeffs(&self) -> Vec<Integer> {
        let lcm = self.coeffs.iter()
            .fold(int(1), |acc, c| acc.lcm(c.denom()));
        let scaled = self.coeffs.iter()
            .map(|c| Integer::from(c.numer() * Integer::from(&lcm / c.denom())))
            .collect::<Vec<_>>();
        let gcd = scaled.iter().fold(int(0), |acc, c| acc.gcd(c));
        if gcd == 0 {
            return scaled;
        }
        scaled.into_iter().map(|c| Integer::from(c / &gcd)).collect()
    }

    /// Evaluates the polynomial exactly at a rational point.
    pub fn eval(&self, at: &Rational) -> Rational {
        self.coeffs.iter().rev().fold(rational(0), |acc, c| acc * at + c)
    }

    /// Evaluates the polynomial at a real point.
    pub fn eval_f64(&self, at: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * at + c.to_f64())
    }

    /// Evaluates the polynomial at a complex point.
    pub fn eval_complex(&self, at: Complex64) -> Complex64 {
        self.coeffs.iter().rev().fold(Complex64::new(0.0, 0.0), |acc, c| acc * at + c.to_f64())
    }

    /// Returns the sum of the absolute values of the coefficients, which bounds the magnitude of
    /// rounding errors when evaluating the polynomial in floating point.
    pub fn magnitude(&self, at: f64) -> f64 {
        let scale = at.abs().max(1.0);
        self.coeffs.iter()
            .enumerate()
            .map(|(k, c)| c.to_f64().abs() * scale.powi(k as i32))
            .sum()
    }

    /// Converts an expression into a polynomial in the variable `var`, expanding all products
    /// and integer powers.
    pub fn from_expr(expr: &SymExpr, var: &str) -> Result<Self, SymbolicFailure> {
        match expr {
            SymExpr::Primary(Primary::Number(num)) => Ok(Self::constant(num.clone())),
            SymExpr::Primary(Primary::Symbol(sym)) if sym == var => Ok(Self::x()),
            SymExpr::Primary(primary) => Err(SymbolicFailure::new(
                "expand",
                format!("`{}` is not a rational coefficient", primary),
            )),
            SymExpr::Add(terms) => terms.iter()
                .try_fold(Self::zero(), |acc, term| Ok(&acc + &Self::from_expr(term, var)?)),
            SymExpr::Mul(factors) => factors.iter()
                .try_fold(Self::constant(1), |acc, factor| Ok(&acc * &Self::from_expr(factor, var)?)),
            SymExpr::Exp(base, exp) => match exp.as_small_integer() {
                Some(k) if (0..=MAX_DEGREE).contains(&k) => {
                    Ok(Self::from_expr(base, var)?.pow(k as u32))
                },
                _ => Err(SymbolicFailure::new(
                    "expand",
                    format!("`{}` is not a polynomial in {}", expr, var),
                )),
            },
        }
    }

    /// Converts the polynomial back into an expression in the variable `var`, with the highest
    /// degree term first.
    pub fn to_expr(&self, var: &str) -> SymExpr {
        let terms = self.coeffs.iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| **c != 0)
            .map(|(k, c)| {
                let power = match k {
                    0 => return SymExpr::number(c.clone()),
                    1 => SymExpr::symbol(var),
                    k => SymExpr::symbol(var).pow(SymExpr::int(k as i64)),
                };
                if *c == 1 {
                    power
                } else {
                    SymExpr::number(c.clone()) * power
                }
            })
            .collect::<Vec<_>>();
        SymExpr::Add(terms).downgrade()
    }
}

/// Splits an expression into the product of a polynomial part and the remaining factors, which
/// are not polynomials in `var`.
///
/// `(x - 2) * sin(x) * (x + 1)` is split into `(x^2 - x - 2, [sin(x)])`.
pub fn split_polynomial_part(expr: &SymExpr, var: &str) -> (Poly, Vec<SymExpr>) {
    let factors = match expr {
        SymExpr::Mul(factors) => factors.as_slice(),
        expr => std::slice::from_ref(expr),
    };

    let mut poly = Poly::constant(1);
    let mut rest = Vec::new();
    for factor in factors {
        match Poly::from_expr(factor, var) {
            Ok(p) => poly = &poly * &p,
            Err(_) => rest.push(factor.clone()),
        }
    }
    (poly, rest)
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_expr("x"))
    }
}

impl Add for &Poly {
    type Output = Poly;

    fn add(self, rhs: Self) -> Poly {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        Poly::new(
            (0..len)
                .map(|i| {
                    let a = self.coeffs.get(i).cloned().unwrap_or_else(|| rational(0));
                    match rhs.coeffs.get(i) {
                        Some(b) => a + b,
                        None => a,
                    }
                })
                .collect(),
        )
    }
}

impl Neg for &Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        Poly::new(self.coeffs.iter().map(|c| Rational::from(-c)).collect())
    }
}

impl Sub for &Poly {
    type Output = Poly;

    fn sub(self, rhs: Self) -> Poly {
        self + &-rhs
    }
}

impl Mul for &Poly {
    type Output = Poly;

    fn mul(self, rhs: Self) -> Poly {
        if self.is_zero() || rhs.is_zero() {
            return Poly::zero();
        }

        let mut coeffs = vec![rational(0); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += Rational::from(a * b);
            }
        }
        Poly::new(coeffs)
    }
}

#[cfg(test)]
mod tests {
    use eqplot_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn poly(source: &str) -> Poly {
        let ast = Parser::with_symbols(source, &["x"]).try_parse_full::<AstExpr>().unwrap();
        Poly::from_expr(&SymExpr::try_from(&ast).unwrap(), "x").unwrap()
    }

    fn ints(coeffs: &[i64]) -> Poly {
        Poly::new(coeffs.iter().map(|&c| rational(c)).collect())
    }

    #[test]
    fn expand_product() {
        assert_eq!(poly("(x - 2)(x + 2)"), ints(&[-4, 0, 1]));
        assert_eq!(poly("(x + 1)^3"), ints(&[1, 3, 3, 1]));
    }

    #[test]
    fn not_a_polynomial() {
        let ast = Parser::with_symbols("1/x", &["x"]).try_parse_full::<AstExpr>().unwrap();
        assert!(Poly::from_expr(&SymExpr::try_from(&ast).unwrap(), "x").is_err());
    }

    #[test]
    fn division_with_remainder() {
        let (quot, rem) = poly("x^3 - 2x + 5").divrem(&poly("x - 1")).unwrap();
        assert_eq!(quot, ints(&[-1, 1, 1]));
        assert_eq!(rem, ints(&[4]));
        assert!(ints(&[1]).divrem(&Poly::zero()).is_none());
    }

    #[test]
    fn gcd_of_rational_function_parts() {
        let g = poly("x^2 - 4").gcd(&poly("x - 2"));
        assert_eq!(g, ints(&[-2, 1]));

        let g = poly("x^2 + 1").gcd(&poly("x - 3"));
        assert_eq!(g, ints(&[1]));
    }

    #[test]
    fn square_free_part() {
        assert_eq!(poly("(x - 1)^2 (x + 3)").square_free(), poly("(x - 1)(x + 3)"));
    }

    #[test]
    fn integer_coefficients() {
        let p = Poly::new(vec![rational((1, 2)), rational((-3, 4))]);
        assert_eq!(p.to_integer_coeffs(), vec![int(2), int(-3)]);
    }

    #[test]
    fn evaluate() {
        let p = poly("2x^2 - 3x + 1");
        assert_eq!(p.eval(&rational((1, 2))), rational(0));
        assert_eq!(p.eval_f64(2.0), 3.0);
    }

    #[test]
    fn split_non_polynomial_factors() {
        let ast = Parser::with_symbols("(x - 2) sin(x) (x + 1)", &["x"])
            .try_parse_full::<AstExpr>()
            .unwrap();
        let (p, rest) = split_polynomial_part(&SymExpr::try_from(&ast).unwrap(), "x");
        assert_eq!(p, ints(&[-2, -1, 1]));
        assert_eq!(rest.len(), 1);
    }
}
