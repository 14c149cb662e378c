//! Declarative descriptions of a plot, handed to a [`Presenter`](crate::presenter::Presenter).

use crate::{
    classify::Classification,
    contour::ContourSegment,
    error::LengthMismatch,
    normalize::NormalizedEquation,
    opts::{DataPointOptions, Marker, PlotOptions, RenderStyle},
    point::{GraphPoint, Viewport},
    sample::SampleGrid,
};
use eqplot_error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The title of a plot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Title {
    /// Plain text.
    Plain(String),

    /// LaTeX math, without surrounding `$`.
    Latex(String),
}

/// Everything needed to draw the curve of an equation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderPlan {
    /// The sampled relation. The curve is its level set at [`RenderPlan::zero_level`].
    pub contour_source: SampleGrid,

    /// The level of the curve, always `0.0`.
    pub zero_level: f64,

    /// The points to mark with open circles.
    pub holes: Vec<GraphPoint<f64>>,

    /// The x-values at which to draw dashed vertical lines.
    pub asymptote_xs: Vec<f64>,

    /// The title of the plot, if any.
    pub title: Option<Title>,

    /// The `(horizontal, vertical)` axis labels.
    pub axis_labels: (String, String),

    /// The visible region of the graph.
    pub viewport: Viewport,

    /// Whether both axes use the same scale.
    pub equal_aspect: bool,

    /// Whether to draw the axis lines through the origin.
    pub show_axes: bool,

    /// The styling of the plot.
    pub style: RenderStyle,
}

impl RenderPlan {
    /// Builds the plan for an equation from its sampled grid and, if automatic exclusion ran,
    /// its classified singularities.
    pub fn new(
        eq: &NormalizedEquation,
        classification: Option<&Classification>,
        contour_source: SampleGrid,
        options: &PlotOptions,
    ) -> Self {
        let (holes, asymptote_xs): (Vec<_>, Vec<_>) = classification
            .map(|c| (c.holes().map(GraphPoint::from).collect(), c.asymptotes().collect()))
            .unwrap_or_default();

        Self {
            contour_source,
            zero_level: 0.0,
            holes,
            asymptote_xs,
            title: title_for(eq, options),
            axis_labels: (eq.x().to_string(), eq.y().to_string()),
            viewport: options.viewport,
            equal_aspect: options.equal_aspect,
            show_axes: options.show_axes,
            style: options.style,
        }
    }

    /// Extracts the segments of the curve.
    pub fn contour(&self) -> Vec<ContourSegment> {
        self.contour_source.zero_contour()
    }
}

/// Chooses the title of an equation plot.
///
/// When the LaTeX title is handed to the presenter separately, the plot itself is left
/// untitled. Otherwise, a plain-text title wins over the LaTeX title.
fn title_for(eq: &NormalizedEquation, options: &PlotOptions) -> Option<Title> {
    if options.display_latex {
        return None;
    }

    match &options.title {
        Some(title) => Some(Title::Plain(title.clone())),
        None if options.latex_title => Some(Title::Latex(eq.latex().to_string())),
        None => None,
    }
}

/// Everything needed to draw a series of discrete data points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataSeriesPlan {
    /// The x-coordinates of the points.
    pub xs: Vec<f64>,

    /// The y-coordinates of the points.
    pub ys: Vec<f64>,

    /// Whether consecutive points are joined by line segments.
    pub connect: bool,

    /// The marker drawn at each point of a connected series. Unconnected points use the
    /// presenter's default marker.
    pub marker: Option<Marker>,

    /// The title of the plot, if any.
    pub title: Option<Title>,

    /// The `(horizontal, vertical)` axis labels.
    pub axis_labels: (String, String),

    /// Whether to draw grid lines.
    pub show_grid: bool,

    /// A viewport fitting every finite point.
    pub viewport: Viewport,
}

impl DataSeriesPlan {
    /// Builds the plan for a series of points.
    ///
    /// Returns an error if `xs` and `ys` have different lengths.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, options: &DataPointOptions) -> Result<Self, Error> {
        if xs.len() != ys.len() {
            return Err(Error::spanless(LengthMismatch { xs: xs.len(), ys: ys.len() }));
        }

        let viewport = Viewport::around_points(xs.iter().zip(&ys).map(|(&x, &y)| GraphPoint(x, y)));
        Ok(Self {
            marker: options.connect.then_some(options.marker),
            connect: options.connect,
            title: options.title.clone().map(Title::Plain),
            axis_labels: options.axis_labels.clone(),
            show_grid: options.show_grid,
            viewport,
            xs,
            ys,
        })
    }

    /// Returns the points of the series.
    pub fn points(&self) -> impl Iterator<Item = GraphPoint<f64>> + '_ {
        self.xs.iter().zip(&self.ys).map(|(&x, &y)| GraphPoint(x, y))
    }
}

#[cfg(test)]
mod tests {
    use crate::{exclusion::ExclusionPredicate, normalize::normalize, sample::sample};
    use eqplot_math::Symbolic;
    use pretty_assertions::assert_eq;
    use super::*;

    fn plan(source: &str, options: &PlotOptions) -> RenderPlan {
        let eq = normalize(source, "x", "y").unwrap();
        let f = eq.f().compile(&["x", "y"]).unwrap();
        let nothing = ExclusionPredicate::near(Vec::new(), 1e-3).unwrap();
        let grid = sample(&f, &options.viewport, 5, &nothing).unwrap();
        RenderPlan::new(&eq, None, grid, options)
    }

    #[test]
    fn latex_title() {
        let plan = plan("f(x) = x^2", &PlotOptions::default());
        assert_eq!(plan.title, Some(Title::Latex("f(x) = x^{2}".to_string())));
        assert_eq!(plan.axis_labels, ("x".to_string(), "y".to_string()));
    }

    #[test]
    fn plain_title_wins() {
        let plan = plan("y = x", &PlotOptions::default().title("identity"));
        assert_eq!(plan.title, Some(Title::Plain("identity".to_string())));
    }

    #[test]
    fn no_title() {
        let plan = plan("y = x", &PlotOptions::default().latex_title(false));
        assert_eq!(plan.title, None);
    }

    #[test]
    fn display_latex_leaves_plot_untitled() {
        let plan = plan("y = x", &PlotOptions::default().display_latex(true).title("identity"));
        assert_eq!(plan.title, None);
    }

    #[test]
    fn data_series() {
        let options = DataPointOptions::default().title("samples");
        let plan = DataSeriesPlan::new(vec![0.0, 1.0, 2.0], vec![1.0, 3.0, 2.0], &options).unwrap();
        assert_eq!(plan.marker, Some(Marker::Circle));
        assert_eq!(plan.title, Some(Title::Plain("samples".to_string())));
        assert_eq!(plan.points().count(), 3);
        assert!(plan.viewport.contains(GraphPoint(2.0, 3.0)));
    }

    #[test]
    fn scatter_has_no_marker() {
        let options = DataPointOptions::default().connect(false).marker(Marker::Square);
        let plan = DataSeriesPlan::new(vec![0.0], vec![1.0], &options).unwrap();
        assert_eq!(plan.marker, None);
    }

    #[test]
    fn length_mismatch() {
        assert!(DataSeriesPlan::new(vec![0.0, 1.0], vec![1.0], &DataPointOptions::default()).is_err());
    }
}
