//! Turns an equation string into an implicit relation `F(x, y) = 0`.

use crate::error::IdenticalSymbols;
use eqplot_error::Error;
use eqplot_math::{SymExpr, Symbolic};
use eqplot_parser::{
    parser::{
        ast::expr::Expr as AstExpr,
        error::kind::MultipleEquality,
        fmt::Latex,
        is_function,
        Parser,
    },
    tokenizer::{tokenize_complete, Token, TokenKind},
};
use log::{debug, warn};

/// An equation rewritten as `f = lhs - rhs = 0`, in the two variables `x` and `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEquation {
    f: SymExpr,
    x: String,
    y: String,
    lhs: SymExpr,
    rhs: SymExpr,
    display_lhs: Option<String>,
    latex: String,
}

impl NormalizedEquation {
    /// The simplified relation `lhs - rhs`.
    pub fn f(&self) -> &SymExpr {
        &self.f
    }

    /// The name of the independent variable.
    pub fn x(&self) -> &str {
        &self.x
    }

    /// The name of the dependent variable.
    pub fn y(&self) -> &str {
        &self.y
    }

    /// The left side of the equation.
    pub fn lhs(&self) -> &SymExpr {
        &self.lhs
    }

    /// The right side of the equation.
    pub fn rhs(&self) -> &SymExpr {
        &self.rhs
    }

    /// The left side as written by the user, for a function-style equation such as
    /// `f(x) = x^2`.
    pub fn display_lhs(&self) -> Option<&str> {
        self.display_lhs.as_deref()
    }

    /// The equation in LaTeX, without surrounding `$`.
    pub fn latex(&self) -> &str {
        &self.latex
    }

    /// Returns true if the equation is `y = g(x)` for some `g` not involving `y`.
    pub fn is_function_graph(&self) -> bool {
        self.lhs.is_symbol(&self.y) && !self.rhs.has_symbol(&self.y)
    }
}

/// A function-style left side, such as `f(t)` in `f(t) = t^2`.
struct FunctionLhs<'a> {
    name: &'a str,
    var: &'a str,
}

/// Checks if the significant tokens before the equality operator are `name ( var )`.
///
/// Known functions are not matched, since `sin(x) = y` is a relation in `x` and `y`. Neither is
/// `f(y) = ...`, which would bind both variables to the same name.
fn function_lhs<'a>(lhs: &[Token<'a>], y: &str) -> Option<FunctionLhs<'a>> {
    let significant = lhs.iter()
        .filter(|token| !token.is_whitespace())
        .collect::<Vec<_>>();

    match significant.as_slice() {
        [name, open, var, close]
            if name.kind == TokenKind::Name
                && open.kind == TokenKind::OpenParen
                && var.kind == TokenKind::Name
                && close.kind == TokenKind::CloseParen
                && !is_function(name.lexeme)
                && var.lexeme != y => Some(FunctionLhs {
                    name: name.lexeme,
                    var: var.lexeme,
                }),
        _ => None,
    }
}

/// Parses one side of the equation into its AST and algebraic form.
fn parse_side(tokens: &[Token], x: &str, y: &str) -> Result<(AstExpr, SymExpr), Vec<Error>> {
    let ast = Parser::from_tokens(tokens, Some(&[x, y][..])).try_parse_full::<AstExpr>()?;
    let expr = SymExpr::try_from(&ast).map_err(|err| vec![err])?;
    Ok((ast, expr))
}

/// Normalizes an equation in the variables `x` and `y`.
///
/// The equation may be written as `lhs = rhs`, `lhs == rhs`, or `f(t) = rhs`, in which case the
/// independent variable is renamed to `t`. An expression without any equality operator is
/// understood as `expr = 0` if it involves `y`, and as `y = expr` otherwise.
///
/// All returned errors carry spans into `source`.
pub fn normalize(source: &str, x: &str, y: &str) -> Result<NormalizedEquation, Vec<Error>> {
    if x == y {
        return Err(vec![Error::spanless(IdenticalSymbols { name: x.to_string() })]);
    }

    let tokens = tokenize_complete(source);
    let equalities = tokens.iter()
        .enumerate()
        .filter(|(_, token)| token.kind.is_equality())
        .collect::<Vec<_>>();

    let (lhs, rhs, display_lhs, x, latex) = match equalities.as_slice() {
        [] => {
            let (ast, expr) = parse_side(&tokens, x, y)?;
            if expr.has_symbol(y) {
                let latex = format!("{} = 0", ast.as_display());
                (expr, SymExpr::int(0), None, x.to_string(), latex)
            } else {
                let latex = format!("{} = {}", y, ast.as_display());
                (SymExpr::symbol(y), expr, None, x.to_string(), latex)
            }
        },
        [(idx, _)] => {
            let (lhs_tokens, rhs_tokens) = (&tokens[..*idx], &tokens[idx + 1..]);
            match function_lhs(lhs_tokens, y) {
                Some(FunctionLhs { name, var }) => {
                    let display = format!("{}({})", name, var);
                    debug!("function-style equation: `{}` binds the independent variable `{}`", display, var);

                    let (ast, rhs, var) = match parse_side(rhs_tokens, var, y) {
                        Ok((ast, rhs)) => (ast, rhs, var),
                        Err(errs) if var != x => {
                            let (ast, rhs) = parse_side(rhs_tokens, x, y).map_err(|_| errs)?;
                            warn!("`{}` is written in terms of `{}` instead of `{}`", display, x, var);
                            (ast, rhs, x)
                        },
                        Err(errs) => return Err(errs),
                    };

                    let latex = format!("{} = {}", display, ast.as_display());
                    (SymExpr::symbol(y), rhs, Some(display), var.to_string(), latex)
                },
                None => {
                    let lhs = parse_side(lhs_tokens, x, y);
                    let rhs = parse_side(rhs_tokens, x, y);
                    let ((lhs_ast, lhs), (rhs_ast, rhs)) = match (lhs, rhs) {
                        (Ok(lhs), Ok(rhs)) => (lhs, rhs),
                        (lhs, rhs) => {
                            let errs = lhs.err().into_iter()
                                .chain(rhs.err())
                                .flatten()
                                .collect();
                            return Err(errs);
                        },
                    };
                    let latex = format!("{} = {}", lhs_ast.as_display(), rhs_ast.as_display());
                    (lhs, rhs, None, x.to_string(), latex)
                },
            }
        },
        [(_, first), (_, second), ..] => {
            return Err(vec![Error::new(
                vec![first.span.clone(), second.span.clone()],
                MultipleEquality,
            )]);
        },
    };

    let f = (lhs.clone() - rhs.clone()).simplify();
    debug!("normalized `{}` to `{} = 0`", source.trim(), f);

    Ok(NormalizedEquation {
        f,
        x,
        y: y.to_string(),
        lhs,
        rhs,
        display_lhs,
        latex,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn expr(source: &str, x: &str) -> SymExpr {
        let ast = Parser::with_symbols(source, &[x, "y"]).try_parse_full::<AstExpr>().unwrap();
        SymExpr::try_from(&ast).unwrap().simplify()
    }

    #[test]
    fn explicit_equation() {
        let eq = normalize("y = x", "x", "y").unwrap();
        assert!(eq.is_function_graph());
        assert_eq!(eq.f(), &expr("y - x", "x"));
        assert_eq!(eq.display_lhs(), None);
    }

    #[test]
    fn implicit_equation() {
        let eq = normalize("2xy + 5y^2 = 4", "x", "y").unwrap();
        assert!(!eq.is_function_graph());
        assert_eq!(eq.f().eval(&[("x", 0.0), ("y", 0.0)]), -4.0);
    }

    #[test]
    fn double_equals() {
        let eq = normalize("x^2 + y^2 == 1", "x", "y").unwrap();
        assert_eq!(eq.f(), &expr("x^2 + y^2 - 1", "x"));
    }

    #[test]
    fn function_style() {
        let eq = normalize("g(t) = t^2 - 1", "x", "y").unwrap();
        assert_eq!(eq.x(), "t");
        assert_eq!(eq.display_lhs(), Some("g(t)"));
        assert!(eq.lhs().is_symbol("y"));
        assert_eq!(eq.rhs(), &expr("t^2 - 1", "t"));
    }

    #[test]
    fn function_style_in_default_variable() {
        let eq = normalize("g(t) = x^2", "x", "y").unwrap();
        assert_eq!(eq.x(), "x");
        assert_eq!(eq.display_lhs(), Some("g(t)"));
    }

    #[test]
    fn known_function_is_not_function_style() {
        let eq = normalize("sin(x) = y", "x", "y").unwrap();
        assert_eq!(eq.x(), "x");
        assert_eq!(eq.display_lhs(), None);
    }

    #[test]
    fn bare_expression_without_y() {
        let eq = normalize("x^2 - 1", "x", "y").unwrap();
        assert!(eq.lhs().is_symbol("y"));
        assert!(eq.is_function_graph());
    }

    #[test]
    fn bare_expression_with_y() {
        let eq = normalize("x^2 + y^2 - 1", "x", "y").unwrap();
        assert!(eq.rhs().is_zero());
        assert_eq!(eq.latex(), "x^{2}+y^{2}-1 = 0");
    }

    #[test]
    fn multiple_equality() {
        let errs = normalize("y = x = 2", "x", "y").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].spans, vec![2..3, 6..7]);
    }

    #[test]
    fn unknown_symbol() {
        let errs = normalize("y = 2z", "x", "y").unwrap_err();
        assert_eq!(errs[0].spans, vec![5..6]);
    }

    #[test]
    fn errors_from_both_sides() {
        let errs = normalize("(y = x)", "x", "y").unwrap_err();
        assert!(errs.len() >= 2);
    }

    #[test]
    fn comparison_in_equation() {
        assert!(normalize("y = x < 2", "x", "y").is_err());
    }

    #[test]
    fn identical_symbols() {
        assert!(normalize("y = x", "y", "y").is_err());
    }
}
