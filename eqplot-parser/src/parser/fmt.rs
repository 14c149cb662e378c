use std::fmt::{Display, Formatter, Result};
use super::{
    ast::{expr::Expr, literal::Literal},
    token::op::BinOpKind,
};

/// A trait for types that can be formatted as LaTeX.
pub trait Latex {
    /// Format the value as LaTeX.
    fn fmt_latex(&self, f: &mut Formatter) -> Result;

    /// Wraps the value in a [`LatexFormatter`], which implements [`Display`].
    fn as_display(&self) -> LatexFormatter<'_, Self> {
        LatexFormatter(self)
    }
}

/// A wrapper type that implements [`Display`] for any type that implements [`Latex`].
pub struct LatexFormatter<'a, T: ?Sized>(&'a T);

impl<T: ?Sized> Display for LatexFormatter<'_, T>
where
    T: Latex,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        self.0.fmt_latex(f)
    }
}

/// Greek letter names that have a LaTeX command of the same name.
const GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi", "psi",
    "omega",
];

/// Formats a variable or constant name.
///
/// Greek letter names are written as their LaTeX command (`pi` becomes `\pi`), other
/// multi-letter names are set upright.
pub fn latex_symbol(f: &mut Formatter, name: &str) -> Result {
    if GREEK.contains(&name) {
        write!(f, "\\{}", name)
    } else if name.chars().count() > 1 {
        write!(f, "\\mathrm{{{}}}", name)
    } else {
        write!(f, "{}", name)
    }
}

/// Returns true if the LaTeX form of the expression ends with a control word such as `\pi`, in
/// which case juxtaposed letters must be separated from it by a space.
pub fn ends_with_command(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(Literal::Symbol(sym)) => GREEK.contains(&sym.name.as_str()),
        Expr::Binary(binary) if binary.op.kind != BinOpKind::Div
            && binary.op.kind != BinOpKind::Exp => ends_with_command(&binary.rhs),
        Expr::Unary(unary) => ends_with_command(&unary.operand),
        _ => false,
    }
}

/// Returns true if the LaTeX form of the expression starts with a digit, in which case a
/// juxtaposed product must be written with an explicit `\cdot`.
pub fn starts_with_number(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(Literal::Integer(_) | Literal::Float(_)) => true,
        Expr::Binary(binary) if binary.op.kind != BinOpKind::Div => starts_with_number(&binary.lhs),
        _ => false,
    }
}

/// Helper to format powers.
pub fn fmt_pow(f: &mut Formatter, left: Option<&Expr>, right: Option<&Expr>) -> Result {
    if let Some(left) = left {
        let left = left.innermost();
        let mut insert_with_paren = || {
            write!(f, "\\left(")?;
            left.fmt_latex(f)?;
            write!(f, "\\right)")
        };

        match left {
            Expr::Unary(_) => insert_with_paren(),
            // exp is the highest precedence binary operator, so every binary operation needs
            // parentheses as a base
            Expr::Binary(_) => insert_with_paren(),
            Expr::Literal(Literal::Float(float)) if float.value.contains(['e', 'E']) => insert_with_paren(),
            _ => left.fmt_latex(f),
        }?
    }
    write!(f, "^{{")?;
    if let Some(right) = right {
        right.innermost().fmt_latex(f)?;
    }
    write!(f, "}}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use crate::parser::Parser;

    fn latex(source: &str, symbols: &[&str]) -> String {
        let expr = Parser::with_symbols(source, symbols).try_parse_full::<Expr>().unwrap();
        expr.as_display().to_string()
    }

    #[test]
    fn fmt_display() {
        let mut parser = Parser::new("3x + 6");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        let fmt = format!("{}", expr);

        assert_eq!(fmt, "3x+6");
    }

    #[test]
    fn fmt_display_nested_power() {
        let mut parser = Parser::new("x^(3(x + 6))^9");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        let fmt = format!("{}", expr);

        assert_eq!(fmt, "x^(3(x+6))^9");
    }

    #[test]
    fn fmt_latex_sqrt() {
        assert_eq!(latex("sqrt(3x)^2", &["x"]), "\\sqrt{3x}^{2}");
    }

    #[test]
    fn fmt_latex_scientific() {
        assert_eq!(latex("2.5e-3x", &["x"]), "2.5\\times 10^{-3}x");
        assert_eq!(latex("1E+6", &["x"]), "1\\times 10^{6}");
        assert_eq!(latex("1e3^2", &["x"]), "\\left(1\\times 10^{3}\\right)^{2}");
    }

    #[test]
    fn fmt_latex_fractions() {
        assert_eq!(
            latex("1/x + 5/x^2 + 6/x^3", &["x"]),
            "\\frac{1}{x}+\\frac{5}{x^{2}}+\\frac{6}{x^{3}}",
        );
    }

    #[test]
    fn fmt_latex_rational_function() {
        assert_eq!(latex("(x^2 - 4)/(x - 2)", &["x"]), "\\frac{x^{2}-4}{x-2}");
    }

    #[test]
    fn fmt_latex_implicit_product() {
        assert_eq!(latex("2xy + 5y^2", &["x", "y"]), "2xy+5y^{2}");
    }

    #[test]
    fn fmt_latex_constant_before_variable() {
        assert_eq!(latex("2pix", &["x"]), "2\\pi x");
    }

    #[test]
    fn fmt_latex_power_of_sum() {
        assert_eq!(latex("(x + 1)^2", &["x"]), "\\left(x+1\\right)^{2}");
    }

    #[test]
    fn fmt_latex_functions() {
        assert_eq!(latex("sin(x) + abs(y)", &["x", "y"]), "\\sin\\left(x\\right)+\\left|y\\right|");
    }

    #[test]
    fn fmt_latex_comparison() {
        assert_eq!(latex("abs(x - 3) < 0.001", &["x"]), "\\left|x-3\\right| < 0.001");
    }
}
