//! Turns equations into implicit curves ready to be drawn.
//!
//! An equation such as `2xy + 5y^2 = 4` or `f(x) = (x^2-4)/(x-2)` goes through the following
//! steps:
//!
//! 1. [`normalize`](normalize::normalize) rewrites it as a relation `F(x, y) = 0`.
//! 2. [`classify`](classify::classify) finds the holes and vertical asymptotes of the relation,
//!    unless an explicit exclusion condition is given.
//! 3. An [`ExclusionPredicate`] is built from the exclusion condition, or from the classified
//!    singularities.
//! 4. [`sample`](sample::sample) evaluates `F` over a grid, masking the excluded samples.
//! 5. A [`RenderPlan`] combines the grid, the singularities, and the styling of the plot, and is
//!    handed to a [`Presenter`].
//!
//! # Example
//!
//! ```
//! use eqplot_graph::{analyze, PlotOptions};
//!
//! let plan = analyze("f(x) = (x^2-4)/(x-2)", &PlotOptions::default().resolution(50)).unwrap();
//! assert_eq!(plan.holes.len(), 1);
//! assert!(plan.asymptote_xs.is_empty());
//! ```

pub mod classify;
pub mod contour;
pub mod error;
pub mod exclusion;
pub mod normalize;
pub mod opts;
pub mod plan;
pub mod point;
pub mod presenter;
pub mod sample;

pub use classify::{Classification, Singularity};
pub use error::PlotError;
pub use exclusion::ExclusionPredicate;
pub use normalize::NormalizedEquation;
pub use opts::{DataPointOptions, PlotOptions, RenderStyle};
pub use plan::{DataSeriesPlan, RenderPlan, Title};
pub use point::{GraphPoint, Viewport};
pub use presenter::{NullPresenter, Presenter, RecordingPresenter};

#[cfg(feature = "cairo")]
pub use presenter::CairoPresenter;

use eqplot_error::Error;
use eqplot_math::Symbolic;
use log::{debug, warn};

/// The result of plotting an equation.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotOutcome {
    /// The plan handed to the presenter.
    pub plan: RenderPlan,

    /// Whether the presenter rendered everything it was given.
    pub presented: bool,
}

/// Runs every step of the pipeline, keeping the normalized equation around for the presenter.
fn analyze_equation(
    equation: &str,
    options: &PlotOptions,
) -> Result<(NormalizedEquation, RenderPlan), PlotError> {
    options.validate().map_err(PlotError::Config)?;

    let eq = normalize::normalize(equation, &options.x_symbol, &options.y_symbol)
        .map_err(PlotError::Parse)?;

    let (predicate, classification) = match &options.exclude {
        Some(exclude) => {
            debug!("excluding points where `{}`", exclude);
            let predicate = ExclusionPredicate::parse(exclude, eq.x(), eq.y())
                .map_err(PlotError::Exclusion)?;
            (predicate, None)
        },
        None if options.auto_exclude => {
            let classification = classify::classify(&eq);
            let predicate = ExclusionPredicate::near(classification.excluded_xs.clone(), options.tolerance)
                .map_err(PlotError::Config)?;
            (predicate, Some(classification))
        },
        None => {
            let predicate = ExclusionPredicate::near(Vec::new(), options.tolerance)
                .map_err(PlotError::Config)?;
            (predicate, None)
        },
    };

    let f = eq.f()
        .compile(&[eq.x(), eq.y()])
        .map_err(|failure| PlotError::Parse(vec![Error::spanless(failure)]))?;
    let grid = sample::sample(&f, &options.viewport, options.resolution, &predicate)
        .map_err(PlotError::Config)?;

    let plan = RenderPlan::new(&eq, classification.as_ref(), grid, options);
    Ok((eq, plan))
}

/// Analyzes an equation and builds its [`RenderPlan`], without presenting it.
pub fn analyze(equation: &str, options: &PlotOptions) -> Result<RenderPlan, PlotError> {
    analyze_equation(equation, options).map(|(_, plan)| plan)
}

/// Analyzes an equation and hands the result to a presenter.
///
/// When [`PlotOptions::display_latex`] is set, the LaTeX form of the equation is handed to the
/// presenter first. A presenter that fails to render does not fail the call: the failure is
/// logged, and reported through [`PlotOutcome::presented`].
pub fn plot_equation(
    equation: &str,
    options: &PlotOptions,
    presenter: &mut dyn Presenter,
) -> Result<PlotOutcome, PlotError> {
    let (eq, plan) = analyze_equation(equation, options)?;
    let mut presented = true;

    if options.display_latex {
        if let Err(err) = presenter.render_title(eq.latex()) {
            warn!("could not display the title of `{}`: {}", equation, err);
            presented = false;
        }
    }

    if let Err(err) = presenter.render_plan(&plan) {
        warn!("could not render `{}`: {}", equation, err);
        presented = false;
    }

    Ok(PlotOutcome { plan, presented })
}

/// Builds the plan for a series of discrete data points.
///
/// Returns an error if `xs` and `ys` have different lengths.
pub fn plot_data_points(
    xs: &[f64],
    ys: &[f64],
    options: &DataPointOptions,
) -> Result<DataSeriesPlan, PlotError> {
    DataSeriesPlan::new(xs.to_vec(), ys.to_vec(), options).map_err(PlotError::Config)
}

/// Returns the equation in LaTeX, without surrounding `$`, such as `f(x) = x^{2}`.
pub fn equation_latex(equation: &str, options: &PlotOptions) -> Result<String, PlotError> {
    normalize::normalize(equation, &options.x_symbol, &options.y_symbol)
        .map(|eq| eq.latex().to_string())
        .map_err(PlotError::Parse)
}
