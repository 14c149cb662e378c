use cairo::{Context, Error, FontSlant, FontWeight, Format, ImageSurface};
use crate::{
    error::RenderUnavailable,
    opts::{Color, LineStyle, LineStyleSpec},
    plan::{RenderPlan, Title},
    point::{CanvasPoint, GraphPoint, Viewport},
};
use std::{fs::File, path::PathBuf};
use super::{text_align::ShowTextAlign, Presenter};

/// The color of lines whose style does not set one.
const DEFAULT_LINE: Color = Color(0.5, 0.5, 0.5);

/// The color of asymptote lines whose style does not set one.
const DEFAULT_ASYMPTOTE: Color = Color(0.2, 0.2, 0.2);

/// The space around the plot area, in points.
const MARGIN: f64 = 36.0;

/// The font size of tick and axis labels, in points.
const LABEL_FONT_SIZE: f64 = 9.0;

/// Formats a number with at most 3 decimal places, without trailing zeros.
fn format_value(value: f64) -> String {
    let raw = format!("{:.3}", value);
    let trimmed = raw.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        s => s.to_string(),
    }
}

/// Returns a step of the form `1`, `2` or `5` times a power of ten, giving roughly `target`
/// steps over `range`.
fn nice_step(range: f64, target: f64) -> f64 {
    let raw = range / target;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = match raw / magnitude {
        r if r < 1.5 => 1.0,
        r if r < 3.5 => 2.0,
        r if r < 7.5 => 5.0,
        _ => 10.0,
    };
    step * magnitude
}

/// Returns the multiples of `step` within `[min, max]`.
fn multiples(min: f64, max: f64, step: f64) -> impl Iterator<Item = f64> {
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(move |k| k as f64 * step)
}

/// Maps graph units to canvas pixels.
#[derive(Clone, Copy, Debug)]
struct Transform {
    /// The visible region of the graph.
    viewport: Viewport,

    /// The top-left corner of the plot area, in pixels.
    corner: CanvasPoint<f64>,

    /// The number of pixels per graph unit along each axis.
    scale: (f64, f64),
}

impl Transform {
    /// Fits the viewport into the given plot area.
    fn new(viewport: Viewport, corner: CanvasPoint<f64>, size: (f64, f64), equal_aspect: bool) -> Self {
        let mut scale = (size.0 / viewport.width(), size.1 / viewport.height());
        let mut corner = corner;
        if equal_aspect {
            let s = scale.0.min(scale.1);
            corner.0 += (size.0 - viewport.width() * s) / 2.0;
            corner.1 += (size.1 - viewport.height() * s) / 2.0;
            scale = (s, s);
        }
        Self { viewport, corner, scale }
    }

    fn x_to_canvas(&self, x: f64) -> f64 {
        self.corner.0 + (x - self.viewport.x.0) * self.scale.0
    }

    fn y_to_canvas(&self, y: f64) -> f64 {
        self.corner.1 + (self.viewport.y.1 - y) * self.scale.1
    }

    fn to_canvas(&self, point: GraphPoint<f64>) -> CanvasPoint<f64> {
        CanvasPoint(self.x_to_canvas(point.0), self.y_to_canvas(point.1))
    }

    /// Returns the `(left, top, right, bottom)` edges of the plot area, in pixels.
    fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.x_to_canvas(self.viewport.x.0),
            self.y_to_canvas(self.viewport.y.1),
            self.x_to_canvas(self.viewport.x.1),
            self.y_to_canvas(self.viewport.y.0),
        )
    }
}

/// Draws [`RenderPlan`]s to PNG files with [`cairo`].
///
/// Cairo has no LaTeX typesetter: a LaTeX title is drawn as its source text, and
/// [`Presenter::render_title`] always reports that it is unavailable.
#[derive(Clone, Debug)]
pub struct CairoPresenter {
    /// The file to write each plot to.
    path: PathBuf,

    /// The resolution of the image. The size of the image is the figure size of the plan times
    /// this value.
    pixels_per_inch: f64,
}

impl CairoPresenter {
    /// Creates a presenter writing to the given file, at 100 pixels per inch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pixels_per_inch: 100.0,
        }
    }

    /// Set the resolution of the image. Returns an updated [`CairoPresenter`] for chaining.
    pub fn pixels_per_inch(mut self, pixels_per_inch: f64) -> Self {
        self.pixels_per_inch = pixels_per_inch;
        self
    }

    /// Converts a length in points to pixels.
    fn px(&self, points: f64) -> f64 {
        points * self.pixels_per_inch / 72.0
    }

    /// Sets the source and stroke parameters of the context from a line style.
    fn set_line(&self, context: &Context, spec: &LineStyleSpec, default: Color) {
        let Color(r, g, b) = spec.color.unwrap_or(default);
        context.set_source_rgba(r, g, b, spec.alpha);
        context.set_line_width(self.px(spec.width));
        match spec.style {
            LineStyle::Solid => context.set_dash(&[], 0.0),
            LineStyle::Dashed => context.set_dash(&[self.px(3.7), self.px(1.6)], 0.0),
        }
    }

    /// Creates an [`ImageSurface`] of the plan's figure size and draws the plot to it.
    pub fn draw(&self, plan: &RenderPlan) -> Result<ImageSurface, Error> {
        let style = &plan.style;
        let size = (
            (style.figure_size.0 * self.pixels_per_inch).round(),
            (style.figure_size.1 * self.pixels_per_inch).round(),
        );
        let surface = ImageSurface::create(Format::ARgb32, size.0 as i32, size.1 as i32)?;
        let context = Context::new(&surface)?;

        context.set_source_rgb(1.0, 1.0, 1.0);
        context.paint()?;
        context.select_font_face("sans-serif", FontSlant::Normal, FontWeight::Normal);

        let margin = self.px(MARGIN);
        let top = match plan.title {
            Some(_) => margin + self.px(style.title_font_size + style.title_pad),
            None => margin,
        };
        let transform = Transform::new(
            plan.viewport,
            CanvasPoint(margin, top),
            (size.0 - 2.0 * margin, size.1 - top - margin),
            plan.equal_aspect,
        );

        self.draw_grid(&context, plan, &transform)?;
        if plan.show_axes {
            self.draw_axes(&context, plan, &transform)?;
        }

        let (left, top, right, bottom) = transform.bounds();
        context.save()?;
        context.rectangle(left, top, right - left, bottom - top);
        context.clip();
        self.draw_curve(&context, plan, &transform)?;
        self.draw_asymptotes(&context, plan, &transform)?;
        self.draw_holes(&context, plan, &transform)?;
        context.restore()?;

        self.draw_labels(&context, plan, &transform)?;
        self.draw_title(&context, plan, &transform)?;

        Ok(surface)
    }

    /// Draw the major and minor grid lines.
    fn draw_grid(&self, context: &Context, plan: &RenderPlan, transform: &Transform) -> Result<(), Error> {
        let (left, top, right, bottom) = transform.bounds();
        let viewport = &plan.viewport;
        let major = (nice_step(viewport.width(), 5.0), nice_step(viewport.height(), 5.0));

        for (spec, step) in [
            (&plan.style.minor_grid, (major.0 / 5.0, major.1 / 5.0)),
            (&plan.style.major_grid, major),
        ] {
            self.set_line(context, spec, DEFAULT_LINE);
            for x in multiples(viewport.x.0, viewport.x.1, step.0) {
                let x = transform.x_to_canvas(x);
                context.move_to(x, top);
                context.line_to(x, bottom);
            }
            for y in multiples(viewport.y.0, viewport.y.1, step.1) {
                let y = transform.y_to_canvas(y);
                context.move_to(left, y);
                context.line_to(right, y);
            }
            context.stroke()?;
        }

        Ok(())
    }

    /// Draw the origin axes if they are visible.
    fn draw_axes(&self, context: &Context, plan: &RenderPlan, transform: &Transform) -> Result<(), Error> {
        let (left, top, right, bottom) = transform.bounds();
        self.set_line(context, &plan.style.axes, DEFAULT_LINE);

        // vertical axis (x = 0)
        if plan.viewport.x.0 <= 0.0 && plan.viewport.x.1 >= 0.0 {
            let x = transform.x_to_canvas(0.0);
            context.move_to(x, top);
            context.line_to(x, bottom);
        }

        // horizontal axis (y = 0)
        if plan.viewport.y.0 <= 0.0 && plan.viewport.y.1 >= 0.0 {
            let y = transform.y_to_canvas(0.0);
            context.move_to(left, y);
            context.line_to(right, y);
        }

        context.stroke()
    }

    /// Draw the zero-level curve.
    fn draw_curve(&self, context: &Context, plan: &RenderPlan, transform: &Transform) -> Result<(), Error> {
        self.set_line(context, &plan.style.curve, DEFAULT_LINE);
        for segment in plan.contour() {
            let start = transform.to_canvas(segment.start);
            let end = transform.to_canvas(segment.end);
            context.move_to(start.0, start.1);
            context.line_to(end.0, end.1);
        }
        context.stroke()
    }

    /// Draw a dashed vertical line at each asymptote.
    fn draw_asymptotes(&self, context: &Context, plan: &RenderPlan, transform: &Transform) -> Result<(), Error> {
        let (_, top, _, bottom) = transform.bounds();
        self.set_line(context, &plan.style.asymptote, DEFAULT_ASYMPTOTE);
        for &x in &plan.asymptote_xs {
            let x = transform.x_to_canvas(x);
            context.move_to(x, top);
            context.line_to(x, bottom);
        }
        context.stroke()
    }

    /// Draw an open circle at each hole, outlined in the color of the curve.
    fn draw_holes(&self, context: &Context, plan: &RenderPlan, transform: &Transform) -> Result<(), Error> {
        let style = &plan.style;
        let Color(r, g, b) = style.curve.color.unwrap_or(DEFAULT_LINE);
        let radius = self.px(style.hole_marker_size) / 2.0;
        context.set_dash(&[], 0.0);
        context.set_line_width(self.px(style.hole_marker_edge_width));

        for &hole in &plan.holes {
            let canvas = transform.to_canvas(hole);
            context.new_sub_path();
            context.arc(canvas.0, canvas.1, radius, 0.0, 2.0 * std::f64::consts::PI);
            context.set_source_rgb(1.0, 1.0, 1.0);
            context.fill_preserve()?;
            context.set_source_rgb(r, g, b);
            context.stroke()?;
        }

        Ok(())
    }

    /// Draw the tick values along the bottom and left edges, and the axis labels.
    fn draw_labels(&self, context: &Context, plan: &RenderPlan, transform: &Transform) -> Result<(), Error> {
        let (left, top, right, bottom) = transform.bounds();
        let viewport = &plan.viewport;
        let padding = self.px(4.0);

        context.set_source_rgb(0.0, 0.0, 0.0);
        context.set_font_size(self.px(LABEL_FONT_SIZE));

        for x in multiples(viewport.x.0, viewport.x.1, nice_step(viewport.width(), 5.0)) {
            context.show_text_align(
                &format_value(x),
                (transform.x_to_canvas(x), bottom + padding),
                (0.5, 1.0),
            )?;
        }
        for y in multiples(viewport.y.0, viewport.y.1, nice_step(viewport.height(), 5.0)) {
            context.show_text_align(
                &format_value(y),
                (left - padding, transform.y_to_canvas(y)),
                (1.0, 0.5),
            )?;
        }

        let (x_label, y_label) = &plan.axis_labels;
        let x_extents = context.text_extents(x_label)?;
        context.show_text_align(
            x_label,
            (right, bottom + 2.0 * padding + x_extents.height()),
            (1.0, 1.0),
        )?;
        context.show_text_align(y_label, (left - padding, top - padding), (1.0, 0.0))?;

        Ok(())
    }

    /// Draw the title centered above the plot area.
    fn draw_title(&self, context: &Context, plan: &RenderPlan, transform: &Transform) -> Result<(), Error> {
        let text = match &plan.title {
            Some(Title::Plain(text)) | Some(Title::Latex(text)) => text,
            None => return Ok(()),
        };

        let (left, top, right, _) = transform.bounds();
        context.set_source_rgb(0.0, 0.0, 0.0);
        context.set_font_size(self.px(plan.style.title_font_size));
        context.show_text_align(
            text,
            ((left + right) / 2.0, top - self.px(plan.style.title_pad)),
            (0.5, 0.0),
        )?;
        Ok(())
    }
}

impl Presenter for CairoPresenter {
    fn render_title(&mut self, _: &str) -> Result<(), RenderUnavailable> {
        Err(RenderUnavailable::new("the cairo renderer cannot typeset LaTeX"))
    }

    fn render_plan(&mut self, plan: &RenderPlan) -> Result<(), RenderUnavailable> {
        let surface = self.draw(plan)
            .map_err(|err| RenderUnavailable::new(err.to_string()))?;
        let mut file = File::create(&self.path)
            .map_err(|err| RenderUnavailable::new(format!("{}: {}", self.path.display(), err)))?;
        surface.write_to_png(&mut file)
            .map_err(|err| RenderUnavailable::new(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn value_labels() {
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(-3.0), "-3");
        assert_eq!(format_value(-0.0001), "0");
    }

    #[test]
    fn grid_steps() {
        assert_eq!(nice_step(10.0, 5.0), 2.0);
        assert_eq!(multiples(-5.0, 5.0, 2.0).collect::<Vec<_>>(), vec![-4.0, -2.0, 0.0, 2.0, 4.0]);
    }

    #[test]
    fn equal_aspect_transform() {
        let viewport = Viewport::new((0.0, 10.0), (0.0, 5.0));
        let transform = Transform::new(viewport, CanvasPoint(0.0, 0.0), (100.0, 100.0), true);
        assert_eq!(transform.scale, (10.0, 10.0));
        assert_eq!(transform.to_canvas(GraphPoint(0.0, 5.0)), CanvasPoint(0.0, 25.0));
    }
}
