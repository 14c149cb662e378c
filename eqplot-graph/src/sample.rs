//! Samples a relation `F(x, y)` over a rectangular grid.

use crate::{
    contour::{self, ContourSegment},
    error::{InvalidResolution, InvalidViewport},
    exclusion::ExclusionPredicate,
    point::Viewport,
};
use eqplot_error::Error;
use eqplot_math::NumericExpr;
use log::debug;
use ndarray::{Array1, Array2, Zip};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The values of a relation sampled over an `N × N` mesh.
///
/// All four arrays have the same shape. The row index follows `y` and the column index follows
/// `x`, so `x[[i, j]]` is the `j`-th x-value and `y[[i, j]]` is the `i`-th y-value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleGrid {
    /// The x-coordinate of each sample.
    pub x: Array2<f64>,

    /// The y-coordinate of each sample.
    pub y: Array2<f64>,

    /// The value of the relation at each sample. Points outside its domain are `NaN`.
    pub z: Array2<f64>,

    /// Samples where this is `true` are excluded from the contour.
    pub mask: Array2<bool>,
}

impl SampleGrid {
    /// Returns the number of samples along each axis.
    pub fn resolution(&self) -> usize {
        self.z.nrows()
    }

    /// Extracts the line segments approximating the curve `F(x, y) = 0`. Masked and non-finite
    /// samples never contribute to a segment.
    pub fn zero_contour(&self) -> Vec<ContourSegment> {
        contour::zero_contour(self)
    }
}

/// Checks that the viewport is finite and non-empty, and that the grid has at least two samples
/// along each axis.
pub fn validate_grid(viewport: &Viewport, resolution: usize) -> Result<(), Error> {
    for (axis, (min, max)) in [("x", viewport.x), ("y", viewport.y)] {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(Error::spanless(InvalidViewport { axis: axis.to_string(), min, max }));
        }
    }

    if resolution < 2 {
        return Err(Error::spanless(InvalidResolution { resolution }));
    }

    Ok(())
}

/// Builds the `(x, y)` mesh of the viewport, with `resolution` evenly spaced values along each
/// axis, bounds included.
pub fn meshgrid(viewport: &Viewport, resolution: usize) -> (Array2<f64>, Array2<f64>) {
    let xs = Array1::linspace(viewport.x.0, viewport.x.1, resolution);
    let ys = Array1::linspace(viewport.y.0, viewport.y.1, resolution);
    let shape = (resolution, resolution);
    (
        Array2::from_shape_fn(shape, |(_, j)| xs[j]),
        Array2::from_shape_fn(shape, |(i, _)| ys[i]),
    )
}

/// Samples `f`, compiled over the variables `[x, y]`, at every point of the mesh, and masks the
/// samples excluded by the predicate.
///
/// Samples are evaluated in parallel. Every sample is computed independently, so the result does
/// not depend on scheduling.
pub fn sample(
    f: &NumericExpr,
    viewport: &Viewport,
    resolution: usize,
    predicate: &ExclusionPredicate,
) -> Result<SampleGrid, Error> {
    validate_grid(viewport, resolution)?;
    debug!("sampling a {0}x{0} grid over {1:?}", resolution, viewport);

    let (x, y) = meshgrid(viewport, resolution);
    let mut z = Array2::<f64>::zeros((resolution, resolution));
    Zip::from(&mut z)
        .and(&x)
        .and(&y)
        .par_for_each(|z, &x, &y| *z = f.eval(&[x, y]));

    let mask = predicate.mask(&x, &y);
    debug!("{} of {} samples are masked", mask.iter().filter(|&&m| m).count(), mask.len());

    Ok(SampleGrid { x, y, z, mask })
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use eqplot_math::{SymExpr, Symbolic};
    use eqplot_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn compile(source: &str) -> NumericExpr {
        let ast = Parser::with_symbols(source, &["x", "y"]).try_parse_full::<AstExpr>().unwrap();
        SymExpr::try_from(&ast).unwrap().compile(&["x", "y"]).unwrap()
    }

    fn nothing() -> ExclusionPredicate {
        ExclusionPredicate::near(Vec::new(), 1e-3).unwrap()
    }

    #[test]
    fn mesh_layout() {
        let (x, y) = meshgrid(&Viewport::new((0.0, 2.0), (-1.0, 1.0)), 3);
        assert_eq!(x.row(0).to_vec(), vec![0.0, 1.0, 2.0]);
        assert_eq!(y.column(0).to_vec(), vec![-1.0, 0.0, 1.0]);
        assert_eq!(x[[2, 1]], 1.0);
        assert_eq!(y[[2, 1]], 1.0);
    }

    #[test]
    fn samples_relation() {
        let grid = sample(&compile("2xy + 5y^2 - 4"), &Viewport::default(), 11, &nothing()).unwrap();
        assert_eq!(grid.resolution(), 11);
        assert_float_absolute_eq!(grid.z[[5, 5]], -4.0);
        assert_float_absolute_eq!(grid.z[[10, 10]], 2.0 * 25.0 + 5.0 * 25.0 - 4.0);
    }

    #[test]
    fn division_by_zero_does_not_panic() {
        let grid = sample(&compile("1/x - y"), &Viewport::default(), 11, &nothing()).unwrap();
        assert!(grid.z.column(5).iter().all(|z| !z.is_finite()));
    }

    #[test]
    fn masks_excluded_columns() {
        let predicate = ExclusionPredicate::near(vec![0.0], 0.1).unwrap();
        let grid = sample(&compile("y - x"), &Viewport::default(), 11, &predicate).unwrap();
        assert!(grid.mask.column(5).iter().all(|&m| m));
        assert_eq!(grid.mask.iter().filter(|&&m| m).count(), 11);
    }

    #[test]
    fn invalid_viewport() {
        let viewport = Viewport::new((1.0, 1.0), (-1.0, 1.0));
        assert!(sample(&compile("y - x"), &viewport, 10, &nothing()).is_err());
        let viewport = Viewport::new((0.0, 1.0), (f64::NAN, 1.0));
        assert!(sample(&compile("y - x"), &viewport, 10, &nothing()).is_err());
    }

    #[test]
    fn invalid_resolution() {
        assert!(sample(&compile("y - x"), &Viewport::default(), 1, &nothing()).is_err());
    }

    #[test]
    fn deterministic() {
        let f = compile("sin(x) * y^3 - x/y");
        let a = sample(&f, &Viewport::default(), 64, &nothing()).unwrap();
        let b = sample(&f, &Viewport::default(), 64, &nothing()).unwrap();
        assert_eq!(
            a.z.iter().map(|z| z.to_bits()).collect::<Vec<_>>(),
            b.z.iter().map(|z| z.to_bits()).collect::<Vec<_>>(),
        );
    }
}
