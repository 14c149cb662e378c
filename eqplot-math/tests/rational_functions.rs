use assert_float_eq::*;
use eqplot_math::{Limit, Root, SymExpr, Symbolic};
use eqplot_parser::parser::{ast::Expr, Parser};
use pretty_assertions::assert_eq;

fn parse(source: &str) -> SymExpr {
    let ast = Parser::with_symbols(source, &["x", "y"]).try_parse_full::<Expr>().unwrap();
    SymExpr::try_from(&ast).unwrap()
}

fn real_roots(expr: &SymExpr) -> Vec<f64> {
    let mut roots = expr.solve_for("x")
        .unwrap()
        .iter()
        .filter_map(Root::as_real)
        .collect::<Vec<_>>();
    roots.sort_by(f64::total_cmp);
    roots
}

#[test]
fn removable_and_essential_singularities() {
    let fraction = parse("(x^2 - 1)/((x - 1)(x + 2))").together();
    assert_eq!(real_roots(&fraction.den), vec![-2.0, 1.0]);

    let shared = fraction.num.gcd(&fraction.den, "x").unwrap();
    assert_eq!(real_roots(&shared), vec![1.0]);

    let f = parse("(x^2 - 1)/((x - 1)(x + 2))");
    let at_one = f.limit("x", &Root::Rational(1.into())).unwrap();
    assert_float_absolute_eq!(at_one.finite().unwrap(), 2.0 / 3.0, 1e-12);
    assert_eq!(f.limit("x", &Root::Rational((-2).into())).unwrap(), Limit::Infinite);
}

#[test]
fn sum_of_fractions() {
    let fraction = parse("1/x + 1/(x - 1)").together();
    assert!(!fraction.is_whole());
    assert_eq!(real_roots(&fraction.den), vec![0.0, 1.0]);
    assert_float_absolute_eq!(fraction.into_expr().eval(&[("x", 2.0)]), 1.5, 1e-12);
}

#[test]
fn irrational_and_complex_roots() {
    let roots = parse("x^4 - 1").solve_for("x").unwrap();
    assert_eq!(roots.iter().filter(|root| root.is_real()).count(), 2);
    assert_eq!(roots.iter().filter(|root| !root.is_real()).count(), 2);

    let roots = real_roots(&parse("x^2 - 2"));
    assert_eq!(roots.len(), 2);
    assert_float_absolute_eq!(roots[0], -(2f64.sqrt()), 1e-9);
    assert_float_absolute_eq!(roots[1], 2f64.sqrt(), 1e-9);
}

#[test]
fn substitution_then_compilation() {
    let expr = parse("2xy + 5y^2 - 4").substitute("y", &parse("x + 1")).simplify();
    assert!(!expr.has_symbol("y"));

    let compiled = expr.compile(&["x"]).unwrap();
    assert_float_absolute_eq!(compiled.eval(&[0.0]), 1.0, 1e-12);
    assert_float_absolute_eq!(compiled.eval(&[1.0]), 20.0, 1e-12);
}

#[test]
fn domain_errors_are_nan() {
    let compiled = parse("sqrt(x) + 1/y").compile(&["x", "y"]).unwrap();
    assert!(compiled.eval(&[-1.0, 1.0]).is_nan());
    assert!(!compiled.eval(&[1.0, 0.0]).is_finite());
}
