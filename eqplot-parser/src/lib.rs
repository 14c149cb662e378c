//! Tokenizer and parser for equations such as `2xy + 5y^2 = 4` or `f(x) = (x^2-4)/(x-2)`.
//!
//! The grammar is a small arithmetic language with implicit multiplication (`2x`, `(x+1)(x-1)`),
//! caret exponentiation (`x^2`, with `**` accepted as a synonym), calls to a fixed set of
//! mathematical functions, and the comparison / logical operators needed to write exclusion
//! conditions such as `abs(x - 2) < 0.001 | abs(x + 2) < 0.001`.
//!
//! ```
//! use eqplot_parser::parser::{ast::Expr, Parser};
//!
//! let expr = Parser::with_symbols("2xy + 5y^2", &["x", "y"])
//!     .try_parse_full::<Expr>()
//!     .unwrap();
//! assert_eq!(expr.to_string(), "2xy+5y^2");
//! ```

pub mod parser;
pub mod tokenizer;
