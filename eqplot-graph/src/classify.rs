//! Finds the holes and vertical asymptotes of a normalized equation.

use crate::normalize::NormalizedEquation;
use eqplot_math::{Fraction, Limit, Root, Solution, SymExpr, Symbolic};
use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A discontinuity of the graph of an equation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Singularity {
    /// A removable discontinuity. The graph approaches `(x0, y0)` but is not defined there.
    Hole { x0: f64, y0: f64 },

    /// A vertical asymptote at `x = x0`.
    Asymptote { x0: f64 },
}

impl Singularity {
    /// The x-value of the singularity.
    pub fn x0(&self) -> f64 {
        match self {
            Self::Hole { x0, .. } | Self::Asymptote { x0 } => *x0,
        }
    }
}

/// The result of classifying the singularities of an equation.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Classification {
    /// The holes and asymptotes found, in increasing order of `x0`.
    pub singularities: Vec<Singularity>,

    /// The x-values to keep out of the sampled grid. This includes every real root of the
    /// denominator, even when no marker is drawn for it.
    pub excluded_xs: Vec<f64>,

    /// The number of candidate roots that were discarded, because they were not real, or because
    /// a symbolic operation on them failed.
    pub dropped: usize,
}

impl Classification {
    /// Returns the `(x0, y0)` points of the holes.
    pub fn holes(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.singularities.iter().filter_map(|s| match s {
            Singularity::Hole { x0, y0 } => Some((*x0, *y0)),
            Singularity::Asymptote { .. } => None,
        })
    }

    /// Returns the x-values of the vertical asymptotes.
    pub fn asymptotes(&self) -> impl Iterator<Item = f64> + '_ {
        self.singularities.iter().filter_map(|s| match s {
            Singularity::Asymptote { x0 } => Some(*x0),
            Singularity::Hole { .. } => None,
        })
    }
}

/// Returns the denominator of the expression, if it is not constant and does not depend on
/// `y`.
fn nontrivial_denominator(expr: &SymExpr, x: &str, y: &str) -> Option<Fraction> {
    let fraction = expr.together();
    if fraction.den.has_symbol(y) {
        debug!("denominator `{}` depends on `{}`, nothing to exclude", fraction.den, y);
        return None;
    }
    if !fraction.den.has_symbol(x) {
        debug!("denominator `{}` is constant, nothing to exclude", fraction.den);
        return None;
    }
    Some(fraction)
}

/// Solves `den = 0` for `x`, keeping the real roots.
///
/// Non-real roots, factors that could not be solved, and failures are counted in `dropped`.
fn real_roots(den: &SymExpr, x: &str, dropped: &mut usize) -> Vec<Root> {
    let roots = match den.solve_partial(x) {
        Ok(Solution { roots, skipped }) => {
            if skipped > 0 {
                warn!("could not solve {} factors of `{}`", skipped, den);
                *dropped += skipped;
            }
            roots
        },
        Err(failure) => {
            warn!("could not find where `{}` vanishes: {}", den, failure);
            *dropped += 1;
            return Vec::new();
        },
    };

    roots.into_iter()
        .filter(|root| {
            if !root.is_real() {
                debug!("dropping non-real root {} of `{}`", root, den);
                *dropped += 1;
            }
            root.is_real()
        })
        .collect()
}

/// Classifies a real root of the denominator of `rhs`.
///
/// A root shared with the numerator is a hole if the limit there is finite. If the limit cannot be
/// taken, no marker is produced and the root is counted in `dropped`.
fn classify_root(
    rhs: &SymExpr,
    x: &str,
    root: &Root,
    is_shared: bool,
    dropped: &mut usize,
) -> Option<Singularity> {
    let x0 = root.as_real()?;
    if !is_shared {
        return Some(Singularity::Asymptote { x0 });
    }

    match rhs.limit(x, root) {
        Ok(Limit::Finite(y0)) => Some(Singularity::Hole { x0, y0 }),
        Ok(limit) => {
            debug!("limit at {} is {:?}, treating it as an asymptote", root, limit);
            Some(Singularity::Asymptote { x0 })
        },
        Err(failure) => {
            warn!("could not take the limit at {}: {}", root, failure);
            *dropped += 1;
            None
        },
    }
}

/// Classifies the real roots of the denominator of `rhs` in `y = rhs`.
///
/// Roots shared with the numerator are holes if the limit of `rhs` at that point is finite.
/// Every other root is an asymptote.
fn classify_function_graph(rhs: &SymExpr, x: &str, y: &str) -> Classification {
    let mut classification = Classification::default();
    let Some(Fraction { num, den }) = nontrivial_denominator(rhs, x, y) else {
        return classification;
    };

    let bad = real_roots(&den, x, &mut classification.dropped);
    let shared = match num.gcd(&den, x) {
        Ok(g) if g.has_symbol(x) => real_roots(&g, x, &mut classification.dropped),
        Ok(_) => Vec::new(),
        Err(failure) => {
            warn!("could not cancel `{}` against `{}`: {}", num, den, failure);
            classification.dropped += 1;
            Vec::new()
        },
    };

    for root in &bad {
        let Some(x0) = root.as_real() else {
            continue;
        };
        classification.excluded_xs.push(x0);

        let is_shared = shared.iter().any(|s| s.same_as(root));
        if let Some(singularity) = classify_root(rhs, x, root, is_shared, &mut classification.dropped) {
            debug!("classified x = {} as {:?}", x0, singularity);
            classification.singularities.push(singularity);
        }
    }

    classification.singularities.sort_by(|a, b| a.x0().total_cmp(&b.x0()));
    classification.excluded_xs.sort_by(f64::total_cmp);
    classification
}

/// Finds the x-values where the denominator of `lhs - rhs` vanishes. No markers are produced.
fn classify_relation(lhs: &SymExpr, rhs: &SymExpr, x: &str, y: &str) -> Classification {
    let mut classification = Classification::default();
    let relation = lhs.clone() - rhs.clone();
    let Some(Fraction { den, .. }) = nontrivial_denominator(&relation, x, y) else {
        return classification;
    };

    classification.excluded_xs = real_roots(&den, x, &mut classification.dropped)
        .iter()
        .filter_map(Root::as_real)
        .collect();
    classification.excluded_xs.sort_by(f64::total_cmp);
    debug!("excluding x in {:?} from the relation", classification.excluded_xs);
    classification
}

/// Classifies the singularities of an equation.
///
/// For an equation of the form `y = g(x)`, the real roots of the denominator of `g` become holes
/// or asymptotes. For any other relation, the real roots of the denominator of `lhs - rhs` are
/// only excluded. Symbolic failures never abort classification; the affected candidates are
/// dropped and counted.
pub fn classify(eq: &NormalizedEquation) -> Classification {
    let classification = if eq.is_function_graph() {
        classify_function_graph(eq.rhs(), eq.x(), eq.y())
    } else {
        classify_relation(eq.lhs(), eq.rhs(), eq.x(), eq.y())
    };

    if classification.dropped > 0 {
        warn!("dropped {} candidate singularities", classification.dropped);
    }
    classification
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use crate::normalize::normalize;
    use eqplot_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn classify_str(source: &str) -> Classification {
        classify(&normalize(source, "x", "y").unwrap())
    }

    #[test]
    fn removable_discontinuity() {
        let classification = classify_str("f(x) = (x^2-4)/(x-2)");
        assert_eq!(classification.holes().count(), 1);
        assert_eq!(classification.asymptotes().count(), 0);

        let (x0, y0) = classification.holes().next().unwrap();
        assert_float_absolute_eq!(x0, 2.0);
        assert_float_absolute_eq!(y0, 4.0);
        assert_eq!(classification.excluded_xs, vec![2.0]);
    }

    #[test]
    fn vertical_asymptote() {
        let classification = classify_str("g(x) = 1/(x-3)");
        assert_eq!(classification.singularities, vec![Singularity::Asymptote { x0: 3.0 }]);
        assert_eq!(classification.excluded_xs, vec![3.0]);
    }

    #[test]
    fn hole_and_asymptote() {
        let classification = classify_str("y = (x^2 - 1)/((x - 1)(x + 2))");
        assert_eq!(classification.singularities.len(), 2);
        assert_eq!(classification.singularities[0], Singularity::Asymptote { x0: -2.0 });
        match classification.singularities[1] {
            Singularity::Hole { x0, y0 } => {
                assert_float_absolute_eq!(x0, 1.0);
                assert_float_absolute_eq!(y0, 2.0 / 3.0);
            },
            other => panic!("expected a hole, got {:?}", other),
        }
    }

    #[test]
    fn double_root_is_asymptote() {
        let classification = classify_str("y = (x - 1)/(x - 1)^2");
        assert_eq!(classification.singularities, vec![Singularity::Asymptote { x0: 1.0 }]);
    }

    #[test]
    fn non_real_roots_are_dropped() {
        let classification = classify_str("y = 1/(x^2 + 1)");
        assert!(classification.singularities.is_empty());
        assert!(classification.excluded_xs.is_empty());
        assert_eq!(classification.dropped, 2);
    }

    #[test]
    fn failed_limit_is_dropped() {
        let rhs = SymExpr::try_from(
            &Parser::with_symbols("t/(x - 1)", &["x", "t"]).try_parse_full::<AstExpr>().unwrap(),
        ).unwrap();
        let root = Root::Rational(1.into());

        let mut dropped = 0;
        assert_eq!(classify_root(&rhs, "x", &root, true, &mut dropped), None);
        assert_eq!(dropped, 1);

        assert_eq!(
            classify_root(&rhs, "x", &root, false, &mut dropped),
            Some(Singularity::Asymptote { x0: 1.0 }),
        );
        assert_eq!(dropped, 1);
    }

    #[test]
    fn unsolvable_factor_is_dropped() {
        let classification = classify_str("y = 1/(x sin(x) (x - 2))");
        assert_eq!(classification.excluded_xs, vec![0.0, 2.0]);
        assert_eq!(classification.asymptotes().collect::<Vec<_>>(), vec![0.0, 2.0]);
        assert_eq!(classification.dropped, 1);
    }

    #[test]
    fn polynomial_has_no_singularities() {
        assert_eq!(classify_str("y = x^2 - 3x"), Classification::default());
    }

    #[test]
    fn implicit_relation_only_excludes() {
        let classification = classify_str("y^2 = 1/x");
        assert!(classification.singularities.is_empty());
        assert_eq!(classification.excluded_xs, vec![0.0]);
    }

    #[test]
    fn denominator_with_y_excludes_nothing() {
        assert_eq!(classify_str("x/y = 1"), Classification::default());
    }
}
