use crate::{
    error::{IdenticalSymbols, InvalidTolerance},
    point::Viewport,
    sample::validate_grid,
};
use eqplot_error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An RGB color, with each component in the range `0.0` to `1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color(pub f64, pub f64, pub f64);

impl Color {
    /// Creates a color from a `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self(
            ((hex >> 16) & 0xff) as f64 / 255.0,
            ((hex >> 8) & 0xff) as f64 / 255.0,
            (hex & 0xff) as f64 / 255.0,
        )
    }
}

/// How a line is stroked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// The style of a family of lines.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineStyleSpec {
    /// The color of the lines. [`None`] lets the presenter pick a color.
    pub color: Option<Color>,

    /// The width of the lines, in points.
    pub width: f64,

    /// The opacity of the lines, from `0.0` (transparent) to `1.0` (opaque).
    pub alpha: f64,

    /// Whether the lines are solid or dashed.
    pub style: LineStyle,
}

/// The styling used to draw an equation plot.
///
/// This is a plain value passed along with every [`RenderPlan`](crate::plan::RenderPlan);
/// nothing about the style of a plot is global.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderStyle {
    /// The zero-level curve.
    ///
    /// The default is a solid `#7b6cff` line of width `2.0`.
    pub curve: LineStyleSpec,

    /// The major grid lines.
    ///
    /// The default is a solid line of width `0.6` and opacity `0.6`.
    pub major_grid: LineStyleSpec,

    /// The minor grid lines.
    ///
    /// The default is a dashed line of width `0.4` and opacity `0.4`.
    pub minor_grid: LineStyleSpec,

    /// The axis lines through the origin.
    ///
    /// The default is a solid `#dddddd` line of width `1.2`.
    pub axes: LineStyleSpec,

    /// The vertical asymptote lines.
    ///
    /// The default is a dashed line of width `1.0` and opacity `0.6`.
    pub asymptote: LineStyleSpec,

    /// The diameter of the open circle drawn at each hole, in points. The default is `9.0`.
    pub hole_marker_size: f64,

    /// The width of the outline of each hole marker, in points. The default is `2.0`.
    pub hole_marker_edge_width: f64,

    /// The font size of the title, in points. The default is `12.0`.
    pub title_font_size: f64,

    /// The space between the title and the plot, in points. The default is `12.0`.
    pub title_pad: f64,

    /// The `(width, height)` of the figure, in inches. The default is `(6.0, 6.0)`.
    pub figure_size: (f64, f64),
}

impl Default for RenderStyle {
    fn default() -> RenderStyle {
        RenderStyle {
            curve: LineStyleSpec {
                color: Some(Color::from_hex(0x7b6cff)),
                width: 2.0,
                alpha: 1.0,
                style: LineStyle::Solid,
            },
            major_grid: LineStyleSpec {
                color: None,
                width: 0.6,
                alpha: 0.6,
                style: LineStyle::Solid,
            },
            minor_grid: LineStyleSpec {
                color: None,
                width: 0.4,
                alpha: 0.4,
                style: LineStyle::Dashed,
            },
            axes: LineStyleSpec {
                color: Some(Color::from_hex(0xdddddd)),
                width: 1.2,
                alpha: 1.0,
                style: LineStyle::Solid,
            },
            asymptote: LineStyleSpec {
                color: None,
                width: 1.0,
                alpha: 0.6,
                style: LineStyle::Dashed,
            },
            hole_marker_size: 9.0,
            hole_marker_edge_width: 2.0,
            title_font_size: 12.0,
            title_pad: 12.0,
            figure_size: (6.0, 6.0),
        }
    }
}

/// Options to use when analyzing and plotting an equation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlotOptions {
    /// The name of the independent variable, drawn on the horizontal axis. A function-style
    /// equation such as `g(t) = ...` replaces it.
    ///
    /// The default value is `"x"`.
    pub x_symbol: String,

    /// The name of the dependent variable, drawn on the vertical axis.
    ///
    /// The default value is `"y"`.
    pub y_symbol: String,

    /// A condition over the two variables, such as `abs(x - 2) < 0.01`. Points where it holds
    /// are left out of the curve. When set, no exclusion is derived automatically.
    ///
    /// The default value is [`None`].
    pub exclude: Option<String>,

    /// The visible region of the graph.
    ///
    /// The default value is `[-5, 5] × [-5, 5]`.
    pub viewport: Viewport,

    /// The number of samples along each axis of the grid.
    ///
    /// The default value is `600`.
    pub resolution: usize,

    /// The half-width of the band excluded around each automatically excluded x-value.
    ///
    /// The default value is `1e-3`.
    pub tolerance: f64,

    /// Whether to find holes and asymptotes, and exclude them from the curve.
    ///
    /// The default value is `true`.
    pub auto_exclude: bool,

    /// Whether to title the plot with the equation in LaTeX when no title is given.
    ///
    /// The default value is `true`.
    pub latex_title: bool,

    /// Whether to hand the equation in LaTeX to the presenter as a separate title. When set, the
    /// plot itself is not titled.
    ///
    /// The default value is `false`.
    pub display_latex: bool,

    /// Whether to draw the axis lines through the origin.
    ///
    /// The default value is `true`.
    pub show_axes: bool,

    /// Whether one unit has the same length on both axes.
    ///
    /// The default value is `true`.
    pub equal_aspect: bool,

    /// A plain-text title, which takes precedence over the LaTeX title.
    ///
    /// The default value is [`None`].
    pub title: Option<String>,

    /// The styling of the plot.
    pub style: RenderStyle,
}

/// The default options for a plot. Returns a [`PlotOptions`] with the following values:
///
/// - [`x_symbol`](PlotOptions::x_symbol): `"x"`
/// - [`y_symbol`](PlotOptions::y_symbol): `"y"`
/// - [`exclude`](PlotOptions::exclude): [`None`]
/// - [`viewport`](PlotOptions::viewport): `[-5, 5] × [-5, 5]`
/// - [`resolution`](PlotOptions::resolution): `600`
/// - [`tolerance`](PlotOptions::tolerance): `1e-3`
/// - [`auto_exclude`](PlotOptions::auto_exclude): `true`
/// - [`latex_title`](PlotOptions::latex_title): `true`
/// - [`display_latex`](PlotOptions::display_latex): `false`
/// - [`show_axes`](PlotOptions::show_axes): `true`
/// - [`equal_aspect`](PlotOptions::equal_aspect): `true`
/// - [`title`](PlotOptions::title): [`None`]
impl Default for PlotOptions {
    fn default() -> PlotOptions {
        PlotOptions {
            x_symbol: "x".to_string(),
            y_symbol: "y".to_string(),
            exclude: None,
            viewport: Viewport::default(),
            resolution: 600,
            tolerance: 1e-3,
            auto_exclude: true,
            latex_title: true,
            display_latex: false,
            show_axes: true,
            equal_aspect: true,
            title: None,
            style: RenderStyle::default(),
        }
    }
}

impl PlotOptions {
    /// Set the names of the independent and dependent variables. Returns an updated
    /// [`PlotOptions`] for chaining.
    pub fn symbols(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_symbol = x.into();
        self.y_symbol = y.into();
        self
    }

    /// Set the exclusion condition. Returns an updated [`PlotOptions`] for chaining.
    pub fn exclude(mut self, exclude: impl Into<String>) -> Self {
        self.exclude = Some(exclude.into());
        self
    }

    /// Set the bounds of the horizontal axis. Returns an updated [`PlotOptions`] for chaining.
    pub fn xlim(mut self, min: f64, max: f64) -> Self {
        self.viewport.x = (min, max);
        self
    }

    /// Set the bounds of the vertical axis. Returns an updated [`PlotOptions`] for chaining.
    pub fn ylim(mut self, min: f64, max: f64) -> Self {
        self.viewport.y = (min, max);
        self
    }

    /// Set the grid resolution. Returns an updated [`PlotOptions`] for chaining.
    pub fn resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the exclusion tolerance. Returns an updated [`PlotOptions`] for chaining.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set whether to derive exclusions automatically. Returns an updated [`PlotOptions`] for
    /// chaining.
    pub fn auto_exclude(mut self, auto_exclude: bool) -> Self {
        self.auto_exclude = auto_exclude;
        self
    }

    /// Set whether to use a LaTeX title. Returns an updated [`PlotOptions`] for chaining.
    pub fn latex_title(mut self, latex_title: bool) -> Self {
        self.latex_title = latex_title;
        self
    }

    /// Set whether to hand the LaTeX title to the presenter separately. Returns an updated
    /// [`PlotOptions`] for chaining.
    pub fn display_latex(mut self, display_latex: bool) -> Self {
        self.display_latex = display_latex;
        self
    }

    /// Set whether to draw the axis lines. Returns an updated [`PlotOptions`] for chaining.
    pub fn show_axes(mut self, show_axes: bool) -> Self {
        self.show_axes = show_axes;
        self
    }

    /// Set whether both axes use the same scale. Returns an updated [`PlotOptions`] for
    /// chaining.
    pub fn equal_aspect(mut self, equal_aspect: bool) -> Self {
        self.equal_aspect = equal_aspect;
        self
    }

    /// Set a plain-text title. Returns an updated [`PlotOptions`] for chaining.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the styling of the plot. Returns an updated [`PlotOptions`] for chaining.
    pub fn style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Checks that the options describe a valid plot.
    pub fn validate(&self) -> Result<(), Error> {
        if self.x_symbol == self.y_symbol {
            return Err(Error::spanless(IdenticalSymbols { name: self.x_symbol.clone() }));
        }

        validate_grid(&self.viewport, self.resolution)?;

        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::spanless(InvalidTolerance { tolerance: self.tolerance }));
        }

        Ok(())
    }
}

/// The marker drawn at each point of a data series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Marker {
    #[default]
    Circle,
    Square,
    Triangle,
    Cross,
    Plus,
    Dot,
}

/// Options to use when plotting discrete data points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataPointOptions {
    /// Whether to connect consecutive points with line segments. Unconnected points are drawn
    /// as a scatter plot, with the presenter's default marker.
    ///
    /// The default value is `true`.
    pub connect: bool,

    /// The marker drawn at each point of a connected series.
    ///
    /// The default value is [`Marker::Circle`].
    pub marker: Marker,

    /// The title of the plot.
    ///
    /// The default value is [`None`].
    pub title: Option<String>,

    /// The `(x, y)` axis labels.
    ///
    /// The default value is `("x", "y")`.
    pub axis_labels: (String, String),

    /// Whether to draw grid lines.
    ///
    /// The default value is `true`.
    pub show_grid: bool,
}

impl Default for DataPointOptions {
    fn default() -> DataPointOptions {
        DataPointOptions {
            connect: true,
            marker: Marker::default(),
            title: None,
            axis_labels: ("x".to_string(), "y".to_string()),
            show_grid: true,
        }
    }
}

impl DataPointOptions {
    /// Set whether to connect the points. Returns an updated [`DataPointOptions`] for chaining.
    pub fn connect(mut self, connect: bool) -> Self {
        self.connect = connect;
        self
    }

    /// Set the marker. Returns an updated [`DataPointOptions`] for chaining.
    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    /// Set the title. Returns an updated [`DataPointOptions`] for chaining.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the axis labels. Returns an updated [`DataPointOptions`] for chaining.
    pub fn axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.axis_labels = (x.into(), y.into());
        self
    }

    /// Set whether to draw grid lines. Returns an updated [`DataPointOptions`] for chaining.
    pub fn show_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = show_grid;
        self
    }
}
