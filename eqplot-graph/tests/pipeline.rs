use assert_float_eq::*;
use eqplot_graph::{
    analyze,
    equation_latex,
    exclusion::ExclusionPredicate,
    normalize::normalize,
    plot_data_points,
    plot_equation,
    DataPointOptions,
    GraphPoint,
    NullPresenter,
    PlotError,
    PlotOptions,
    RecordingPresenter,
    Title,
};
use eqplot_math::Symbolic;
use pretty_assertions::assert_eq;

fn options() -> PlotOptions {
    PlotOptions::default().resolution(101)
}

#[test]
fn identity_line() {
    let plan = analyze("y = x", &options()).unwrap();
    assert!(plan.holes.is_empty());
    assert!(plan.asymptote_xs.is_empty());
    assert!(!plan.contour_source.mask.iter().any(|&m| m));

    let segments = plan.contour();
    assert!(!segments.is_empty());
    for segment in segments {
        assert_float_absolute_eq!(segment.start.0, segment.start.1, 1e-9);
        assert_float_absolute_eq!(segment.end.0, segment.end.1, 1e-9);
    }
}

#[test]
fn implicit_relation() {
    let eq = normalize("2xy + 5y^2 = 4", "x", "y").unwrap();
    assert_eq!(eq.f().eval(&[("x", 0.0), ("y", 0.0)]), -4.0);

    // (x, y) = (2.75, 0.5) and (0, sqrt(0.8)) lie on the curve
    assert_float_absolute_eq!(eq.f().eval(&[("x", 2.75), ("y", 0.5)]), 0.0, 1e-12);
    assert_float_absolute_eq!(eq.f().eval(&[("x", 0.0), ("y", 0.8f64.sqrt())]), 0.0, 1e-12);

    let plan = analyze("2xy + 5y^2 = 4", &options()).unwrap();
    assert!(plan.holes.is_empty());
    assert!(plan.asymptote_xs.is_empty());
    for segment in plan.contour() {
        let GraphPoint(x, y) = segment.start;
        assert!((2.0 * x * y + 5.0 * y * y - 4.0).abs() < 0.5);
    }
}

#[test]
fn removable_discontinuity() {
    let plan = analyze("f(x) = (x^2-4)/(x-2)", &options()).unwrap();
    assert_eq!(plan.holes.len(), 1);
    assert_float_absolute_eq!(plan.holes[0].0, 2.0);
    assert_float_absolute_eq!(plan.holes[0].1, 4.0);
    assert!(plan.asymptote_xs.is_empty());
    assert_eq!(plan.title, Some(Title::Latex("f(x) = \\frac{x^{2}-4}{x-2}".to_string())));
}

#[test]
fn vertical_asymptote() {
    let plan = analyze("g(x) = 1/(x-3)", &options()).unwrap();
    assert!(plan.holes.is_empty());
    assert_eq!(plan.asymptote_xs, vec![3.0]);

    // no segment may bridge the two branches
    for segment in plan.contour() {
        let (a, b) = (segment.start.0 - 3.0, segment.end.0 - 3.0);
        assert!(a * b >= 0.0, "segment crosses the asymptote: {:?}", segment);
    }
}

#[test]
fn exclusion_band() {
    let predicate = ExclusionPredicate::near(vec![3.0], 1e-3).unwrap();
    assert!(predicate.contains(3.0, 0.0));
    assert!(!predicate.contains(3.002, 0.0));
    assert!(!predicate.contains(2.5, 0.0));

    let options = options().xlim(2.0, 4.0).resolution(2001);
    let plan = analyze("g(x) = 1/(x-3)", &options).unwrap();
    let grid = &plan.contour_source;
    assert!(grid.mask.iter().any(|&m| m));
    for (&x, &masked) in grid.x.iter().zip(grid.mask.iter()) {
        assert_eq!(masked, (x - 3.0).abs() < 1e-3, "x = {}", x);
    }
}

#[test]
fn scientific_notation_exclusion() {
    // column 5 of an 11-sample grid over [-5, 5] lies on x = 0
    let options = options().resolution(11).exclude("abs(x) < 1e-3");
    let plan = analyze("y = x", &options).unwrap();
    let grid = &plan.contour_source;
    assert_eq!(grid.mask.iter().filter(|&&m| m).count(), 11);
    assert!(grid.mask.column(5).iter().all(|&m| m));
}

#[test]
fn scientific_notation_constants() {
    let eq = normalize("y = 1e3", "x", "y").unwrap();
    assert_eq!(eq.f().eval(&[("x", 0.0), ("y", 0.0)]), -1000.0);

    let eq = normalize("y = 2.5e-3x + .5", "x", "y").unwrap();
    assert_float_absolute_eq!(eq.f().eval(&[("x", 4.0), ("y", 0.0)]), -0.51, 1e-12);
}

#[test]
fn reciprocal_never_panics() {
    let options = options().auto_exclude(false).resolution(11);
    let plan = analyze("y = 1/x", &options).unwrap();
    let grid = &plan.contour_source;
    assert!(grid.z.column(5).iter().all(|z| !z.is_finite()));

    for segment in plan.contour() {
        assert!(segment.start.0 * segment.end.0 >= 0.0);
        assert!(segment.start.0 != 0.0 || segment.end.0 != 0.0);
    }
}

#[test]
fn explicit_exclusion() {
    let options = options().exclude("abs(x - 1) < 0.5");
    let plan = analyze("y = x", &options).unwrap();
    assert!(plan.holes.is_empty());
    for segment in plan.contour() {
        assert!((segment.start.0 - 1.0).abs() >= 0.4);
    }
}

#[test]
fn deterministic() {
    let options = options().resolution(64);
    let a = analyze("y^2 = x^3 - x + 1/(x - 1)", &options).unwrap();
    let b = analyze("y^2 = x^3 - x + 1/(x - 1)", &options).unwrap();
    assert_eq!(
        a.contour_source.z.iter().map(|z| z.to_bits()).collect::<Vec<_>>(),
        b.contour_source.z.iter().map(|z| z.to_bits()).collect::<Vec<_>>(),
    );
    assert_eq!(a.contour_source.mask, b.contour_source.mask);
    assert_eq!(a.contour(), b.contour());
}

#[test]
fn presenter_receives_plan() {
    let mut presenter = RecordingPresenter::default();
    let outcome = plot_equation("y = x^2", &options().display_latex(true), &mut presenter).unwrap();
    assert!(outcome.presented);
    assert_eq!(presenter.titles, vec!["y = x^{2}".to_string()]);
    assert_eq!(presenter.plans, vec![outcome.plan.clone()]);
    assert_eq!(outcome.plan.title, None);
}

#[test]
fn unavailable_presenter_still_returns_plan() {
    let outcome = plot_equation("y = x^2", &options(), &mut NullPresenter).unwrap();
    assert!(!outcome.presented);
    assert_eq!(outcome.plan.title, Some(Title::Latex("y = x^{2}".to_string())));
}

#[test]
fn parse_errors() {
    match analyze("y = (x + 1", &options()) {
        Err(PlotError::Parse(errs)) => assert!(!errs.is_empty()),
        other => panic!("expected a parse error, got {:?}", other.map(|plan| plan.title)),
    }
    assert!(matches!(analyze("y = x = 1", &options()), Err(PlotError::Parse(_))));
    assert!(matches!(
        analyze("y = x", &options().exclude("x <")),
        Err(PlotError::Exclusion(_)),
    ));
}

#[test]
fn config_errors() {
    assert!(matches!(analyze("y = x", &options().xlim(1.0, 1.0)), Err(PlotError::Config(_))));
    assert!(matches!(analyze("y = x", &options().resolution(1)), Err(PlotError::Config(_))));
    assert!(matches!(analyze("y = x", &options().tolerance(-1.0)), Err(PlotError::Config(_))));
}

#[test]
fn latex_of_equation() {
    assert_eq!(equation_latex("2xy + 5y^2 = 4", &options()).unwrap(), "2xy+5y^{2} = 4");
    assert_eq!(equation_latex("g(t) = sin(t)", &options()).unwrap(), "g(t) = \\sin\\left(t\\right)");
}

#[test]
fn data_points() {
    let plan = plot_data_points(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0], &DataPointOptions::default()).unwrap();
    assert_eq!(plan.points().count(), 3);
    assert!(matches!(
        plot_data_points(&[0.0], &[], &DataPointOptions::default()),
        Err(PlotError::Config(_)),
    ));
}
