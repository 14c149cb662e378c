//! Simplification rules for expressions involving addition, including combining like terms.

use crate::{
    expr::SymExpr,
    primitive::rational,
    simplify::{rules::do_add, step::{Step, StepCollector}},
};
use rug::Rational;

/// `a+(b+c) = a+b+c`
pub fn flatten(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        if !terms.iter().any(|term| matches!(term, SymExpr::Add(_))) {
            return None;
        }

        let new_terms = terms.iter()
            .flat_map(|term| match term {
                SymExpr::Add(inner) => inner.clone(),
                term => vec![term.clone()],
            })
            .collect();
        Some(SymExpr::Add(new_terms).downgrade())
    })?;

    step_collector.push(Step::Flatten);
    Some(opt)
}

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        let new_terms = terms.iter()
            .filter(|term| !term.is_zero())
            .cloned()
            .collect::<Vec<_>>();

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(SymExpr::Add(new_terms).downgrade())
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::AddZero);
    Some(opt)
}

/// Splits a term into its rational coefficient and the remaining factors. If the term has no
/// numeric factor, the coefficient is 1.
///
/// - `5` -> `(5, 1)`
/// - `3*a` -> `(3, a)`
/// - `-1*a*b` -> `(-1, a*b)`
/// - `a` -> `(1, a)`
pub(crate) fn split_coefficient(expr: &SymExpr) -> (Rational, SymExpr) {
    if let Some(num) = expr.as_number() {
        return (num.clone(), SymExpr::int(1));
    }

    match expr {
        SymExpr::Mul(factors) => {
            let mut coeff = rational(1);
            let mut rest = Vec::with_capacity(factors.len());
            for factor in factors {
                match factor.as_number() {
                    Some(num) => coeff *= num,
                    None => rest.push(factor.clone()),
                }
            }
            (coeff, SymExpr::Mul(rest).downgrade())
        },
        _ => (rational(1), expr.clone()),
    }
}

/// Multiplies the remaining factors of a term by a coefficient.
pub(crate) fn with_coefficient(coeff: Rational, rest: SymExpr) -> SymExpr {
    if coeff == 0 {
        SymExpr::int(0)
    } else if rest.is_one() {
        SymExpr::number(coeff)
    } else if coeff == 1 {
        rest
    } else {
        SymExpr::number(coeff) * rest
    }
}

/// Combines like terms.
///
/// `a+a = 2a`
/// `2a+3a = 5a`
/// `1/2+1/3 = 5/6`
/// etc.
pub fn combine_like_terms(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        let mut groups: Vec<(Rational, SymExpr)> = Vec::with_capacity(terms.len());

        // this is O(n^2) worst case, due to scanning the groups for each term
        for term in terms {
            let (coeff, rest) = split_coefficient(term);
            match groups.iter_mut().find(|(_, other)| *other == rest) {
                Some((total, _)) => *total += coeff,
                None => groups.push((coeff, rest)),
            }
        }

        if groups.len() == terms.len() {
            return None;
        }

        let new_terms = groups.into_iter()
            .map(|(coeff, rest)| with_coefficient(coeff, rest))
            .collect();
        Some(SymExpr::Add(new_terms).downgrade())
    })?;

    step_collector.push(Step::CombineLikeTerms);
    Some(opt)
}

/// Applies all addition rules.
///
/// All addition rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    flatten(expr, step_collector)
        .or_else(|| add_zero(expr, step_collector))
        .or_else(|| combine_like_terms(expr, step_collector))
}
