#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A pair of `(x, y)` values in **graph** units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphPoint<T>(pub T, pub T);

impl<T> From<(T, T)> for GraphPoint<T> {
    fn from((x, y): (T, T)) -> GraphPoint<T> {
        GraphPoint(x, y)
    }
}

/// A pair of `(x, y)` values in **canvas** units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasPoint<T>(pub T, pub T);

impl<T> From<(T, T)> for CanvasPoint<T> {
    fn from((x, y): (T, T)) -> CanvasPoint<T> {
        CanvasPoint(x, y)
    }
}

/// The visible region of the graph, given as the closed `x` and `y` intervals.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewport {
    /// The `(min, max)` bounds of the horizontal axis.
    pub x: (f64, f64),

    /// The `(min, max)` bounds of the vertical axis.
    pub y: (f64, f64),
}

/// The default viewport is `[-5, 5] × [-5, 5]`.
impl Default for Viewport {
    fn default() -> Viewport {
        Viewport {
            x: (-5.0, 5.0),
            y: (-5.0, 5.0),
        }
    }
}

impl Viewport {
    /// Creates a viewport from the bounds of both axes.
    pub fn new(x: (f64, f64), y: (f64, f64)) -> Self {
        Self { x, y }
    }

    /// Returns the width of the viewport, in graph units.
    pub fn width(&self) -> f64 {
        self.x.1 - self.x.0
    }

    /// Returns the height of the viewport, in graph units.
    pub fn height(&self) -> f64 {
        self.y.1 - self.y.0
    }

    /// Returns true if the point lies inside the viewport, boundary included.
    pub fn contains(&self, point: GraphPoint<f64>) -> bool {
        (self.x.0..=self.x.1).contains(&point.0) && (self.y.0..=self.y.1).contains(&point.1)
    }

    /// Returns the smallest viewport containing all of the given points, with a margin of 10% of
    /// the largest extent on every side.
    ///
    /// Returns the default viewport if there are no finite points.
    pub fn around_points(points: impl IntoIterator<Item = GraphPoint<f64>>) -> Self {
        let mut bounds: Option<((f64, f64), (f64, f64))> = None;
        for GraphPoint(x, y) in points.into_iter().filter(|p| p.0.is_finite() && p.1.is_finite()) {
            bounds = Some(match bounds {
                Some(((x0, x1), (y0, y1))) => ((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y))),
                None => ((x, x), (y, y)),
            });
        }

        let Some(((x0, x1), (y0, y1))) = bounds else {
            return Self::default();
        };
        let margin = ((x1 - x0).max(y1 - y0) * 0.1).max(1.0);
        Self {
            x: (x0 - margin, x1 + margin),
            y: (y0 - margin, y1 + margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn viewport_around_points() {
        let viewport = Viewport::around_points([GraphPoint(0.0, 0.0), GraphPoint(20.0, 10.0)]);
        assert_eq!(viewport, Viewport::new((-2.0, 22.0), (-2.0, 12.0)));
        assert!(viewport.contains(GraphPoint(20.0, 10.0)));
    }

    #[test]
    fn viewport_without_points() {
        assert_eq!(Viewport::around_points([GraphPoint(f64::NAN, 1.0)]), Viewport::default());
    }
}
