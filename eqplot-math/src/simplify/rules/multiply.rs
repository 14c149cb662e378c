//! Simplification rules for expressions involving multiplication, including combining like
//! factors.

use crate::{
    expr::SymExpr,
    primitive::rational,
    simplify::{rules::do_multiply, step::{Step, StepCollector}},
};

/// `a*(b*c) = a*b*c`
pub fn flatten(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        if !factors.iter().any(|factor| matches!(factor, SymExpr::Mul(_))) {
            return None;
        }

        let new_factors = factors.iter()
            .flat_map(|factor| match factor {
                SymExpr::Mul(inner) => inner.clone(),
                factor => vec![factor.clone()],
            })
            .collect();
        Some(SymExpr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::Flatten);
    Some(opt)
}

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiply_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        if factors.iter().any(SymExpr::is_zero) {
            Some(SymExpr::int(0))
        } else {
            None
        }
    })?;

    step_collector.push(Step::MultiplyZero);
    Some(opt)
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let new_factors = factors.iter()
            .filter(|factor| !factor.is_one())
            .cloned()
            .collect::<Vec<_>>();

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(SymExpr::Mul(new_factors).downgrade())
        }
    })?;

    step_collector.push(Step::MultiplyOne);
    Some(opt)
}

/// Splits a factor into its base and exponent. If the factor is not a power, the exponent is 1.
fn split_power(expr: &SymExpr) -> (SymExpr, SymExpr) {
    match expr {
        SymExpr::Exp(base, exp) => ((**base).clone(), (**exp).clone()),
        _ => (expr.clone(), SymExpr::int(1)),
    }
}

/// Combines like factors, and multiplies numeric factors together.
///
/// `a*a = a^2`
/// `a^2*a^3 = a^5`
/// `a*a^-1 = a^0`
/// `2*3 = 6`
/// etc.
pub fn combine_like_factors(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let mut numbers = 0;
        let mut product = rational(1);
        let mut groups: Vec<(SymExpr, Vec<SymExpr>)> = Vec::with_capacity(factors.len());

        for factor in factors {
            if let Some(num) = factor.as_number() {
                numbers += 1;
                product *= num;
                continue;
            }

            let (base, exp) = split_power(factor);
            match groups.iter_mut().find(|(other, _)| *other == base) {
                Some((_, exps)) => exps.push(exp),
                None => groups.push((base, vec![exp])),
            }
        }

        if numbers <= 1 && groups.len() + numbers == factors.len() {
            return None;
        }

        let mut new_factors = Vec::with_capacity(groups.len() + 1);
        if numbers > 0 {
            new_factors.push(SymExpr::number(product));
        }
        for (base, mut exps) in groups {
            let exp = if exps.len() == 1 {
                exps.remove(0)
            } else if exps.iter().all(SymExpr::is_number) {
                let mut sum = rational(0);
                for exp in &exps {
                    if let Some(num) = exp.as_number() {
                        sum += num;
                    }
                }
                SymExpr::number(sum)
            } else {
                SymExpr::Add(exps)
            };

            if exp.is_one() {
                new_factors.push(base);
            } else {
                new_factors.push(base.pow(exp));
            }
        }

        Some(SymExpr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::CombineLikeFactors);
    Some(opt)
}

/// Applies all multiplication rules.
///
/// All multiplication rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    flatten(expr, step_collector)
        .or_else(|| multiply_zero(expr, step_collector))
        .or_else(|| multiply_one(expr, step_collector))
        .or_else(|| combine_like_factors(expr, step_collector))
}
