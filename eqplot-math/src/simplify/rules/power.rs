//! Simplification rules for power expressions.

use crate::{
    expr::SymExpr,
    simplify::{rules::do_power, step::{Step, StepCollector}},
};
use rug::{ops::Pow, Integer, Rational};

/// Largest integer exponent that is evaluated exactly.
const MAX_EXACT_EXPONENT: i64 = 256;

/// `a^0 = 1`
pub fn power_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |_, rhs| {
        if rhs.is_zero() {
            Some(SymExpr::int(1))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerZero);
    Some(opt)
}

/// `0^a = 0`, for positive numeric `a`
pub fn power_zero_left(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if lhs.is_zero() && rhs.as_number().map_or(false, |n| *n > 0) {
            Some(SymExpr::int(0))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerZeroLeft);
    Some(opt)
}

/// `1^a = 1`
pub fn power_one_left(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, _| {
        if lhs.is_one() {
            Some(SymExpr::int(1))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOneLeft);
    Some(opt)
}

/// `a^1 = a`
pub fn power_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if rhs.is_one() {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOne);
    Some(opt)
}

/// Returns the exact `n`-th root of a non-negative integer, if it exists.
fn exact_root(value: &Integer, n: u32) -> Option<Integer> {
    let root = value.clone().root(n);
    if Integer::from((&root).pow(n)) == *value {
        Some(root)
    } else {
        None
    }
}

/// Evaluates a rational number raised to a rational power, if the result is rational.
pub(crate) fn eval_rational_power(base: &Rational, exp: &Rational) -> Option<Rational> {
    let p = exp.numer().to_i64()?;
    let q = exp.denom().to_u32()?;
    if p.abs() > MAX_EXACT_EXPONENT || q > 64 {
        return None;
    }
    if *base == 0 && p <= 0 {
        return None;
    }

    let base = if q == 1 {
        base.clone()
    } else {
        // only principal roots of non-negative numbers are real
        if *base < 0 {
            return None;
        }
        let numer = exact_root(base.numer(), q)?;
        let denom = exact_root(base.denom(), q)?;
        Rational::from((numer, denom))
    };

    Some(base.pow(p as i32))
}

/// `2^3 = 8`
/// `(4/9)^(1/2) = 2/3`
pub fn evaluate_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let value = eval_rational_power(lhs.as_number()?, rhs.as_number()?)?;
        Some(SymExpr::number(value))
    })?;

    step_collector.push(Step::EvaluatePower);
    Some(opt)
}

/// `(a^b)^c = a^(b*c)`, for integer `c`
pub fn power_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        rhs.as_small_integer()?;
        if let SymExpr::Exp(base, exp) = lhs {
            let exp = match exp.as_number() {
                Some(num) => SymExpr::number(num.clone() * rhs.as_number()?),
                None => (**exp).clone() * rhs.clone(),
            };
            Some((**base).clone().pow(exp))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerPower);
    Some(opt)
}

/// `(a*b)^c = a^c*b^c`, for integer `c`
pub fn distribute_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        rhs.as_small_integer()?;
        if let SymExpr::Mul(factors) = lhs {
            Some(SymExpr::Mul(
                factors.iter()
                    .map(|factor| factor.clone().pow(rhs.clone()))
                    .collect(),
            ))
        } else {
            None
        }
    })?;

    step_collector.push(Step::DistributePower);
    Some(opt)
}

/// Applies all power rules.
///
/// All power rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    power_zero(expr, step_collector)
        .or_else(|| power_zero_left(expr, step_collector))
        .or_else(|| power_one_left(expr, step_collector))
        .or_else(|| power_one(expr, step_collector))
        .or_else(|| evaluate_power(expr, step_collector))
        .or_else(|| power_power(expr, step_collector))
        .or_else(|| distribute_power(expr, step_collector))
}
