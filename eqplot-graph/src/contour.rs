//! Marching squares over a [`SampleGrid`], extracting the zero-level curve.

use crate::{point::GraphPoint, sample::SampleGrid};
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A line segment of the zero-level curve, in graph units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContourSegment {
    pub start: GraphPoint<f64>,
    pub end: GraphPoint<f64>,
}

/// The four edges of a cell.
#[derive(Clone, Copy, Debug)]
enum Edge {
    Bottom,
    Right,
    Top,
    Left,
}

/// A corner of a cell: its position and sampled value.
#[derive(Clone, Copy, Debug)]
struct Corner {
    point: GraphPoint<f64>,
    z: f64,
}

/// Returns the point on the segment between two corners where the linear interpolation of `z`
/// is zero. The corners must have opposite signs.
fn crossing(a: Corner, b: Corner) -> GraphPoint<f64> {
    let t = a.z / (a.z - b.z);
    GraphPoint(
        a.point.0 + t * (b.point.0 - a.point.0),
        a.point.1 + t * (b.point.1 - a.point.1),
    )
}

/// Returns the pairs of edges joined by the curve in a cell, given which corners are on the
/// non-negative side (bit 0 is bottom-left, then counter-clockwise) and the average value at
/// the center, used to resolve saddles.
fn edge_pairs(case: u8, center: f64) -> &'static [(Edge, Edge)] {
    use Edge::*;
    match case {
        0 | 15 => &[],
        1 | 14 => &[(Left, Bottom)],
        2 | 13 => &[(Bottom, Right)],
        3 | 12 => &[(Left, Right)],
        4 | 11 => &[(Right, Top)],
        6 | 9 => &[(Bottom, Top)],
        7 | 8 => &[(Left, Top)],
        5 if center >= 0.0 => &[(Bottom, Right), (Left, Top)],
        5 => &[(Left, Bottom), (Right, Top)],
        10 if center >= 0.0 => &[(Left, Bottom), (Right, Top)],
        10 => &[(Bottom, Right), (Left, Top)],
        _ => &[],
    }
}

/// Extracts the segments of one cell, whose bottom-left sample is at `(i, j)`.
fn cell_segments(grid: &SampleGrid, i: usize, j: usize, out: &mut Vec<ContourSegment>) {
    let indices = [(i, j), (i, j + 1), (i + 1, j + 1), (i + 1, j)];
    if indices.iter().any(|&idx| grid.mask[idx] || !grid.z[idx].is_finite()) {
        return;
    }

    let [bl, br, tr, tl] = indices.map(|idx| Corner {
        point: GraphPoint(grid.x[idx], grid.y[idx]),
        z: grid.z[idx],
    });
    let case = [bl, br, tr, tl]
        .iter()
        .enumerate()
        .fold(0u8, |case, (bit, corner)| case | (u8::from(corner.z >= 0.0) << bit));
    let center = (bl.z + br.z + tr.z + tl.z) / 4.0;

    let point_on = |edge: Edge| match edge {
        Edge::Bottom => crossing(bl, br),
        Edge::Right => crossing(br, tr),
        Edge::Top => crossing(tl, tr),
        Edge::Left => crossing(bl, tl),
    };

    out.extend(edge_pairs(case, center).iter().map(|&(a, b)| ContourSegment {
        start: point_on(a),
        end: point_on(b),
    }));
}

/// Extracts the zero-level curve of a sampled grid as a list of line segments.
///
/// A cell contributes nothing if any of its corners is masked or not finite. Rows are processed
/// in parallel, and the segments are returned in row-major cell order.
pub fn zero_contour(grid: &SampleGrid) -> Vec<ContourSegment> {
    let (rows, cols) = grid.z.dim();
    if rows < 2 || cols < 2 {
        return Vec::new();
    }

    (0..rows - 1)
        .into_par_iter()
        .flat_map_iter(|i| {
            let mut segments = Vec::new();
            for j in 0..cols - 1 {
                cell_segments(grid, i, j, &mut segments);
            }
            segments
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use crate::{exclusion::ExclusionPredicate, point::Viewport, sample::sample};
    use eqplot_math::{NumericExpr, SymExpr, Symbolic};
    use eqplot_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use ndarray::{array, Array2};
    use super::*;

    fn compile(source: &str) -> NumericExpr {
        let ast = Parser::with_symbols(source, &["x", "y"]).try_parse_full::<AstExpr>().unwrap();
        SymExpr::try_from(&ast).unwrap().compile(&["x", "y"]).unwrap()
    }

    fn unit_cell(z: Array2<f64>, mask: Array2<bool>) -> SampleGrid {
        SampleGrid {
            x: array![[0.0, 1.0], [0.0, 1.0]],
            y: array![[0.0, 0.0], [1.0, 1.0]],
            z,
            mask,
        }
    }

    #[test]
    fn single_crossing() {
        let grid = unit_cell(array![[-1.0, 1.0], [-1.0, 1.0]], Array2::from_elem((2, 2), false));
        let segments = grid.zero_contour();
        assert_eq!(segments.len(), 1);

        let ContourSegment { start, end } = segments[0];
        assert_float_absolute_eq!(start.0, 0.5);
        assert_float_absolute_eq!(start.1, 0.0);
        assert_float_absolute_eq!(end.0, 0.5);
        assert_float_absolute_eq!(end.1, 1.0);
    }

    #[test]
    fn saddle_has_two_segments() {
        let grid = unit_cell(array![[1.0, -1.0], [-1.0, 1.0]], Array2::from_elem((2, 2), false));
        assert_eq!(grid.zero_contour().len(), 2);
    }

    #[test]
    fn masked_cell_is_skipped() {
        let grid = unit_cell(array![[-1.0, 1.0], [-1.0, 1.0]], array![[false, false], [true, false]]);
        assert!(grid.zero_contour().is_empty());
    }

    #[test]
    fn nan_cell_is_skipped() {
        let grid = unit_cell(array![[-1.0, f64::NAN], [-1.0, 1.0]], Array2::from_elem((2, 2), false));
        assert!(grid.zero_contour().is_empty());
    }

    #[test]
    fn points_lie_on_the_line() {
        let nothing = ExclusionPredicate::near(Vec::new(), 1e-3).unwrap();
        let grid = sample(&compile("y - x"), &Viewport::default(), 21, &nothing).unwrap();
        let segments = grid.zero_contour();
        assert!(!segments.is_empty());
        for ContourSegment { start, end } in segments {
            assert_float_absolute_eq!(start.0, start.1, 1e-9);
            assert_float_absolute_eq!(end.0, end.1, 1e-9);
        }
    }

    #[test]
    fn circle_stays_on_the_circle() {
        let nothing = ExclusionPredicate::near(Vec::new(), 1e-3).unwrap();
        let grid = sample(&compile("x^2 + y^2 - 4"), &Viewport::default(), 101, &nothing).unwrap();
        let segments = grid.zero_contour();
        assert!(segments.len() > 50);
        for ContourSegment { start, .. } in segments {
            assert_float_absolute_eq!(start.0.hypot(start.1), 2.0, 0.01);
        }
    }
}
