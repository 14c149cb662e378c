//! Symbolic manipulation of the expressions that make up an equation.
//!
//! The parser produces a syntax tree that mirrors the source code. This crate converts it into a
//! [`SymExpr`], a flattened sum-of-products representation with exact rational coefficients, and
//! provides the operations needed to analyze rational functions of one variable:
//!
//! - [`simplify`](simplify::simplify) an expression by rewriting rules,
//! - combine a sum of fractions into a single [`Fraction`] with [`together`](fraction::together),
//! - convert polynomial expressions into [`Poly`] and compute greatest common divisors,
//! - find the [`Root`]s of a polynomial equation exactly (rational roots) or numerically,
//! - evaluate the [`Limit`] of a rational function at a point,
//! - compile an expression into a [`NumericExpr`] for fast evaluation over a grid.
//!
//! All of these are exposed through the [`Symbolic`] trait.

pub mod error;
pub mod expr;
pub mod fraction;
pub mod limit;
pub mod numeric;
pub mod poly;
pub mod primitive;
pub mod simplify;
pub mod solve;
pub mod symbolic;

pub use error::SymbolicFailure;
pub use expr::{Constant, Primary, SymExpr};
pub use fraction::Fraction;
pub use limit::Limit;
pub use numeric::NumericExpr;
pub use poly::Poly;
pub use solve::{Root, Solution};
pub use symbolic::Symbolic;
