//! Cubic parametric polynomial sections built from a Bézier whose handles sit a third of the
//! chord along the start and end tangents.
use bezier_curve::f64::{CubicBezier, PointN};
use serde::{Deserialize, Serialize};

use crate::curve::{PlanViewSample, SolverVariant};
use crate::error::{PlanViewError, Result};
use crate::frame::Point2;

/// Monomial coefficients of one coordinate, `a + b p + c p^2 + d p^3`
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicPoly {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl CubicPoly {
    pub fn eval(&self, p: f64) -> f64 {
        self.a + p * (self.b + p * (self.c + p * self.d))
    }

    pub fn derivative(&self, p: f64) -> f64 {
        self.b + p * (2.0 * self.c + p * 3.0 * self.d)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamPolyCurve {
    pub u: CubicPoly,
    pub v: CubicPoly,
    pub length: f64,
    pub heading_end: f64,
    /// cumulative arc length at evenly spaced parameter values, the last entry is `length`
    arclen_table: Vec<f64>,
}

impl ParamPolyCurve {
    /// `end` and `heading_end` are in the section frame
    pub fn solve(
        end: Point2,
        heading_end: f64,
        samples: usize,
        tolerance: f64,
        epsilon: f64,
    ) -> Result<Self> {
        let chord = end.norm();
        if chord <= epsilon {
            return Err(PlanViewError::degenerate(
                SolverVariant::ParamPoly3,
                format!("chord length {chord:e}"),
            ));
        }
        let handle = chord / 3.0;
        let p0 = PointN::xy(0.0, 0.0);
        let p1 = PointN::xy(handle, 0.0);
        let p3 = PointN::xy(end.x, end.y);
        let p2 = p3 - PointN::xy(heading_end.cos(), heading_end.sin()) * handle;
        let bezier: CubicBezier<PointN<2>, 2> = CubicBezier::new(p0, p1, p2, p3);

        let [a, b, c, d] = bezier.polynomial_coefficients();
        let u = CubicPoly {
            a: a.x(),
            b: b.x(),
            c: c.x(),
            d: d.x(),
        };
        let v = CubicPoly {
            a: a.y(),
            b: b.y(),
            c: c.y(),
            d: d.y(),
        };

        let mut arclen_table = vec![0.0; samples.max(2)];
        bezier.arclen_table(&mut arclen_table, tolerance);
        let length = arclen_table[arclen_table.len() - 1];

        Ok(Self {
            u,
            v,
            length,
            heading_end,
            arclen_table,
        })
    }

    pub fn arclen_table(&self) -> &[f64] {
        &self.arclen_table
    }

    /// The normalized parameter is taken proportional to arc length, so positions are exact at
    /// both ends but drift from true arc length in between. Curvature is not tracked.
    pub fn sample(&self, s: f64) -> PlanViewSample {
        let p = if self.length > 0.0 {
            (s / self.length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let du = self.u.derivative(p);
        let dv = self.v.derivative(p);
        PlanViewSample {
            x: self.u.eval(p),
            y: self.v.eval(p),
            heading: dv.atan2(du),
            curvature: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn straight_poly_is_uniform() {
        let curve = ParamPolyCurve::solve(Point2::new(9.0, 0.0), 0.0, 100, 1e-10, 1e-9).unwrap();
        assert_abs_diff_eq!(curve.length, 9.0, epsilon = 1e-9);
        assert_abs_diff_eq!(curve.u.b, 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.u.c, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.v.d, 0.0, epsilon = 1e-12);
        let mid = curve.sample(4.5);
        assert_abs_diff_eq!(mid.x, 4.5, epsilon = 1e-9);
        assert_eq!(curve.arclen_table().len(), 100);
    }

    #[test]
    fn ends_are_exact() {
        let end = Point2::new(10.0, 4.0);
        let curve = ParamPolyCurve::solve(end, 0.8, 100, 1e-10, 1e-9).unwrap();
        let start = curve.sample(0.0);
        assert_abs_diff_eq!(start.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(start.heading, 0.0, epsilon = 1e-12);
        let last = curve.sample(curve.length);
        assert_abs_diff_eq!(last.x, end.x, epsilon = 1e-9);
        assert_abs_diff_eq!(last.y, end.y, epsilon = 1e-9);
        assert_abs_diff_eq!(last.heading, 0.8, epsilon = 1e-9);
        assert_eq!(last.curvature, 0.0);
        // longer than the chord, monotonic table
        assert!(curve.length > end.norm());
        assert!(curve.arclen_table().windows(2).all(|w| w[1] > w[0]));
        assert_eq!(curve.arclen_table().last().copied(), Some(curve.length));
    }

    #[test]
    fn coincident_points_are_degenerate() {
        assert!(ParamPolyCurve::solve(Point2::new(0.0, 0.0), 1.0, 100, 1e-10, 1e-9).is_err());
    }
}
