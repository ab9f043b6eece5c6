//! Clothoid sections, solved in the section frame by the fitting routines of clothoid_util.
use clothoid_curve::f64::{curvature_per_meter_float, Angle, Clothoid, Curvature, Length, Position};
use clothoid_util::{fit_forward, fit_hermite, FitOptions};
use uom::si::{angle::radian, curvature::radian_per_meter, length::meter};

use crate::curve::{PlanViewSample, SolverVariant};
use crate::error::{PlanViewError, Result};
use crate::frame::Point2;

#[derive(Debug, Clone, PartialEq)]
pub struct ClothoidCurve {
    clothoid: Clothoid,
    variant: SolverVariant,
    pub length: f64,
    pub heading_end: f64,
    pub curvature_start: f64,
    pub curvature_end: f64,
}

impl ClothoidCurve {
    /// Match the start tangent (heading 0 at the origin) and `heading_end` at `end`
    pub fn solve_hermite(
        end: Point2,
        heading_end: f64,
        options: &FitOptions,
        max_length: f64,
    ) -> Result<Self> {
        let clothoid = fit_hermite(
            &origin(),
            Angle::new::<radian>(0.0),
            &position(end),
            Angle::new::<radian>(heading_end),
            options,
        )
        .map_err(|err| PlanViewError::degenerate(SolverVariant::ClothoidHermite, err))?;
        Self::checked(clothoid, SolverVariant::ClothoidHermite, max_length)
    }

    /// Leave the origin along +x with `curvature_start` and pass through `end`
    pub fn solve_forward(
        end: Point2,
        curvature_start: f64,
        options: &FitOptions,
        max_length: f64,
    ) -> Result<Self> {
        let clothoid = fit_forward(
            &origin(),
            Angle::new::<radian>(0.0),
            Curvature::new::<radian_per_meter>(curvature_start),
            &position(end),
            options,
        )
        .map_err(|err| PlanViewError::degenerate(SolverVariant::ClothoidForward, err))?;
        Self::checked(clothoid, SolverVariant::ClothoidForward, max_length)
    }

    fn checked(clothoid: Clothoid, variant: SolverVariant, max_length: f64) -> Result<Self> {
        let length = clothoid.length.get::<meter>();
        if !length.is_finite() || length <= 0.0 {
            return Err(PlanViewError::degenerate(
                variant,
                format!("length {length}"),
            ));
        }
        // nearly colinear tangents send the spiral off towards infinity
        if length >= max_length {
            return Err(PlanViewError::degenerate(
                variant,
                format!("length {length:.3} exceeds {max_length}"),
            ));
        }
        Ok(Self {
            variant,
            length,
            heading_end: clothoid.end_theta().get::<radian>(),
            curvature_start: clothoid.curvature().get::<radian_per_meter>(),
            curvature_end: clothoid.end_curvature().get::<radian_per_meter>(),
            clothoid,
        })
    }

    pub fn variant(&self) -> SolverVariant {
        self.variant
    }

    /// rate of change of curvature along the curve, 1/m^2
    pub fn curvature_rate(&self) -> f64 {
        curvature_per_meter_float(self.clothoid.curvature_rate())
    }

    pub fn sample(&self, s: f64) -> PlanViewSample {
        let s = Length::new::<meter>(s);
        let [x, y] = self.clothoid.get_xy(s).as_array_meter();
        PlanViewSample {
            x,
            y,
            heading: self.clothoid.theta_at(s).get::<radian>(),
            curvature: self.clothoid.curvature_at(s).get::<radian_per_meter>(),
        }
    }
}

fn origin() -> Position {
    Position::from_array_meter([0.0, 0.0])
}

fn position(p: Point2) -> Position {
    Position::from_array_meter([p.x, p.y])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn hermite_quarter_turn() {
        let end = Point2::new(10.0, 10.0);
        let curve =
            ClothoidCurve::solve_hermite(end, FRAC_PI_2, &FitOptions::default(), 10_000.0)
                .unwrap();
        assert_eq!(curve.variant(), SolverVariant::ClothoidHermite);
        assert_abs_diff_eq!(curve.length, 5.0 * PI, epsilon = 1e-6);
        assert_abs_diff_eq!(curve.heading_end, FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(curve.curvature_rate(), 0.0, epsilon = 1e-6);

        let last = curve.sample(curve.length);
        assert_abs_diff_eq!(last.x, end.x, epsilon = 1e-6);
        assert_abs_diff_eq!(last.y, end.y, epsilon = 1e-6);
    }

    #[test]
    fn forward_keeps_curvature() {
        let end = Point2::new(12.0, 3.0);
        let curve =
            ClothoidCurve::solve_forward(end, 0.02, &FitOptions::default(), 10_000.0).unwrap();
        assert_abs_diff_eq!(curve.curvature_start, 0.02, epsilon = 1e-8);
        assert_abs_diff_eq!(
            curve.curvature_end,
            curve.curvature_start + curve.curvature_rate() * curve.length,
            epsilon = 1e-9
        );
        let last = curve.sample(curve.length);
        assert_abs_diff_eq!(last.x, end.x, epsilon = 1e-6);
        assert_abs_diff_eq!(last.y, end.y, epsilon = 1e-6);
    }

    #[test]
    fn length_guard() {
        let rv = ClothoidCurve::solve_hermite(
            Point2::new(20_000.0, 1.0),
            0.0,
            &FitOptions::default(),
            10_000.0,
        );
        assert!(matches!(
            rv,
            Err(PlanViewError::DegenerateGeometry {
                family: SolverVariant::ClothoidHermite,
                ..
            })
        ));
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let rv =
            ClothoidCurve::solve_forward(Point2::new(0.0, 0.0), 0.0, &FitOptions::default(), 1e4);
        assert!(rv.is_err());
    }
}
