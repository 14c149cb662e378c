//! Module to simplify expressions.
//!
//! This module provides the [`simplify`] function, which attempts to reduce the complexity of an
//! expression. It does this by repeatedly applying rewriting rules to the expression in multiple
//! passes, until no more rules apply.
//!
//! The simplifier never expands products of sums, so `(x + 1)(x - 1)` is left as is. Use
//! [`Poly`](crate::poly::Poly) to work with expanded polynomials.

pub mod rules;
pub mod step;

use crate::expr::{Primary, SymExpr};
use log::{log_enabled, trace, Level};
use step::{Step, StepCollector};

/// Base implementation of the simplification algorithm.
fn inner_simplify(
    expr: &SymExpr,
    step_collector: &mut dyn StepCollector<Step>,
) -> (SymExpr, bool) {
    let mut expr = expr.clone();
    let mut changed_at_least_once = false;

    loop {
        let mut changed_in_this_pass = false;

        // try to simplify this expression using all rules
        if let Some(new_expr) = rules::all(&expr, step_collector) {
            expr = new_expr;
            changed_in_this_pass = true;
            changed_at_least_once = true;
        }

        // then begin recursing into the expression's children
        match expr {
            SymExpr::Primary(Primary::Call(_, ref mut args)) => {
                for arg in args.iter_mut() {
                    let result = inner_simplify(arg, step_collector);
                    *arg = result.0;
                    changed_in_this_pass |= result.1;
                    changed_at_least_once |= result.1;
                }
            },
            SymExpr::Primary(_) => return (expr, changed_at_least_once),
            SymExpr::Add(ref mut terms) => {
                for term in terms.iter_mut() {
                    let result = inner_simplify(term, step_collector);
                    *term = result.0;
                    // use |= instead of = to not reset these variables to false if already true
                    changed_in_this_pass |= result.1;
                    changed_at_least_once |= result.1;
                }
            },
            SymExpr::Mul(ref mut factors) => {
                for factor in factors.iter_mut() {
                    let result = inner_simplify(factor, step_collector);
                    *factor = result.0;
                    changed_in_this_pass |= result.1;
                    changed_at_least_once |= result.1;
                }
            },
            SymExpr::Exp(ref mut lhs, ref mut rhs) => {
                let result_l = inner_simplify(lhs, step_collector);
                let result_r = inner_simplify(rhs, step_collector);

                **lhs = result_l.0;
                **rhs = result_r.0;
                changed_in_this_pass |= result_l.1 || result_r.1;
                changed_at_least_once |= result_l.1 || result_r.1;
            },
        }

        if !changed_in_this_pass {
            break;
        }
    }

    (expr, changed_at_least_once)
}

/// Simplify the given expression.
///
/// When trace logging is enabled, the steps taken by the simplifier are logged.
pub fn simplify(expr: &SymExpr) -> SymExpr {
    if !log_enabled!(Level::Trace) {
        return inner_simplify(expr, &mut ()).0;
    }

    let (simplified, steps) = simplify_with_steps(expr);
    if !steps.is_empty() {
        trace!("simplified `{}` to `{}` by {:?}", expr, simplified, steps);
    }
    simplified
}

/// Simplify the given expression. The steps taken by the simplifier are also collected and
/// returned, which is useful for debugging.
pub fn simplify_with_steps(expr: &SymExpr) -> (SymExpr, Vec<Step>) {
    let mut steps = Vec::new();
    let expr = inner_simplify(expr, &mut steps).0;
    (expr, steps)
}
