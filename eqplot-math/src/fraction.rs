//! Combining an expression into a single fraction.

use crate::{
    expr::{Primary, SymExpr},
    simplify::simplify,
};
use rug::Rational;

/// An expression written as a single fraction, `num / den`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fraction {
    /// The numerator.
    pub num: SymExpr,

    /// The denominator. Function calls are never split, so a denominator hidden inside a call
    /// (as in `sin(1/x)`) is not part of it.
    pub den: SymExpr,
}

impl Fraction {
    /// Creates a fraction with a denominator of `1`.
    pub fn whole(num: SymExpr) -> Self {
        Self { num, den: SymExpr::int(1) }
    }

    /// Returns true if the denominator is the number `1`.
    pub fn is_whole(&self) -> bool {
        self.den.is_one()
    }

    /// Converts the fraction back into a single expression, `num * den^-1`.
    pub fn into_expr(self) -> SymExpr {
        if self.is_whole() {
            self.num
        } else {
            self.num * self.den.recip()
        }
    }

    fn mul(self, other: Self) -> Self {
        Self {
            num: self.num * other.num,
            den: self.den * other.den,
        }
    }

    fn pow(self, exp: &SymExpr) -> Self {
        if exp.is_one() {
            return self;
        }
        Self {
            num: self.num.pow(exp.clone()),
            den: self.den.pow(exp.clone()),
        }
    }
}

/// Rewrites the expression as a single fraction over a common denominator.
///
/// Sums are combined over the product of their distinct denominators, where two denominators are
/// the same if they are strictly equal. Powers with a negative numeric exponent move their base
/// across the fraction bar. Function calls are opaque.
///
/// The numerator and denominator are simplified, but not expanded or cancelled. For example,
/// `x + 1/(x - 2)` becomes `(x(x - 2) + 1) / (x - 2)`.
pub fn together(expr: &SymExpr) -> Fraction {
    let frac = inner_together(&simplify(expr));
    Fraction {
        num: simplify(&frac.num),
        den: simplify(&frac.den),
    }
}

fn inner_together(expr: &SymExpr) -> Fraction {
    match expr {
        SymExpr::Primary(_) => Fraction::whole(expr.clone()),
        SymExpr::Add(terms) => {
            let fracs = terms.iter().map(inner_together).collect::<Vec<_>>();

            let mut dens: Vec<SymExpr> = Vec::new();
            for frac in &fracs {
                for factor in den_factors(&frac.den) {
                    if !dens.contains(&factor) {
                        dens.push(factor);
                    }
                }
            }

            // each numerator is scaled by every common denominator factor missing from its own
            let num = fracs.into_iter()
                .map(|frac| {
                    let own = den_factors(&frac.den);
                    dens.iter()
                        .filter(|factor| !own.contains(*factor))
                        .cloned()
                        .fold(frac.num, |acc, factor| acc * factor)
                })
                .fold(SymExpr::Add(Vec::new()), |acc, term| acc + term)
                .downgrade();
            let den = SymExpr::Mul(dens).downgrade();
            Fraction { num, den }
        },
        SymExpr::Mul(factors) => factors.iter()
            .map(inner_together)
            .fold(Fraction::whole(SymExpr::int(1)), Fraction::mul),
        SymExpr::Exp(base, exp) => match exp.as_number() {
            Some(n) if *n < 0 => {
                let flipped = inner_together(base);
                let exp = SymExpr::number(Rational::from(-n));
                let Fraction { num, den } = flipped.pow(&exp);
                Fraction { num: den, den: num }
            },
            Some(_) => inner_together(base).pow(exp),
            None => Fraction::whole(expr.clone()),
        },
    }
}

/// Splits a denominator into its factors, ignoring the number `1`.
fn den_factors(den: &SymExpr) -> Vec<SymExpr> {
    match den {
        SymExpr::Mul(factors) => factors.iter().filter(|f| !f.is_one()).cloned().collect(),
        SymExpr::Primary(Primary::Number(n)) if *n == 1 => Vec::new(),
        den => vec![den.clone()],
    }
}

#[cfg(test)]
mod tests {
    use eqplot_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> SymExpr {
        let ast = Parser::with_symbols(source, &["x", "y"]).try_parse_full::<AstExpr>().unwrap();
        SymExpr::try_from(&ast).unwrap()
    }

    #[test]
    fn already_whole() {
        let frac = together(&parse("x^2 + 1"));
        assert!(frac.is_whole());
    }

    #[test]
    fn simple_quotient() {
        let frac = together(&parse("(x^2 - 4)/(x - 2)"));
        assert_eq!(frac.num, simplify(&parse("x^2 - 4")));
        assert_eq!(frac.den, simplify(&parse("x - 2")));
    }

    #[test]
    fn sum_over_common_denominator() {
        let frac = together(&parse("1/(x - 3) + 1/x"));
        assert_eq!(frac.den, simplify(&parse("(x - 3) x")));

        let value = |x: f64| frac.num.eval_with(&|_| Some(x)) / frac.den.eval_with(&|_| Some(x));
        assert_eq!(value(1.0), -1.0 / 2.0 + 1.0);
    }

    #[test]
    fn shared_denominator_is_not_repeated() {
        let frac = together(&parse("1/x + 2/x"));
        assert_eq!(frac.den, parse("x"));
    }

    #[test]
    fn nested_fraction() {
        let frac = together(&parse("1/(1/x + 1)"));
        assert_eq!(frac.num, parse("x"));
    }

    #[test]
    fn calls_are_opaque() {
        let frac = together(&parse("sin(1/x)"));
        assert!(frac.is_whole());
    }
}
