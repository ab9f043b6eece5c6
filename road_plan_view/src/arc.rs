//! Circular arc tangent to the local +x axis at the origin and passing through the target.
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::curve::{PlanViewSample, SolverVariant};
use crate::error::{PlanViewError, Result};
use crate::frame::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcCurve {
    pub radius: f64,
    /// +1 turning left (counter-clockwise), -1 turning right
    pub turn_sign: f64,
    /// angle of the start point seen from the center
    pub offset_angle: f64,
    /// signed y of the center in the section frame
    pub lateral_offset: f64,
    /// signed sweep, also the heading change over the arc
    pub angle: f64,
    pub length: f64,
    /// the target needed more than half a turn, the sweep was limited to a half circle
    pub clamped: bool,
}

impl ArcCurve {
    /// `end` is in the section frame, the start is the origin with heading 0
    pub fn solve(end: Point2, epsilon: f64) -> Result<Self> {
        let chord = end.norm();
        if chord <= epsilon {
            return Err(PlanViewError::degenerate(
                SolverVariant::Arc,
                format!("chord length {chord:e}"),
            ));
        }

        // the center is where the start normal (x = 0) meets the chord's perpendicular bisector,
        // which only happens when the target is off the start tangent
        let parallel = end.y;
        if parallel.abs() <= epsilon * chord {
            return Err(PlanViewError::degenerate(
                SolverVariant::Arc,
                format!("target on the start tangent, lateral {parallel:e}"),
            ));
        }
        let center_y = (end.x * end.x + end.y * end.y) / (2.0 * end.y);
        let radius = center_y.abs();

        // det[chord, heading] with heading (1, 0), positive for a right turn
        let determinant = -end.y;
        let turn_sign = if determinant > 0.0 { -1.0 } else { 1.0 };
        let offset_angle = -turn_sign * FRAC_PI_2;

        let end_angle = (end.y - center_y).atan2(end.x);
        let mut sweep = (turn_sign * (end_angle - offset_angle)) % TAU;
        if sweep < 0.0 {
            sweep += TAU;
        }
        let clamped = sweep > PI;
        if clamped {
            sweep = PI;
        }

        Ok(Self {
            radius,
            turn_sign,
            offset_angle,
            lateral_offset: center_y,
            angle: turn_sign * sweep,
            length: radius * sweep,
            clamped,
        })
    }

    pub fn curvature(&self) -> f64 {
        self.turn_sign / self.radius
    }

    pub fn sample(&self, s: f64) -> PlanViewSample {
        let angle_s = self.offset_angle + self.turn_sign * s / self.radius;
        PlanViewSample {
            x: self.radius * angle_s.cos(),
            y: self.lateral_offset + self.radius * angle_s.sin(),
            heading: angle_s + self.turn_sign * FRAC_PI_2,
            curvature: self.curvature(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn half_circle_left() {
        let arc = ArcCurve::solve(Point2::new(0.0, 2.0), 1e-9).unwrap();
        assert_abs_diff_eq!(arc.radius, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.length, PI, epsilon = 1e-12);
        assert_eq!(arc.turn_sign, 1.0);
        assert!(!arc.clamped);

        let mid = arc.sample(FRAC_PI_2);
        assert_abs_diff_eq!(mid.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.heading, FRAC_PI_2, epsilon = 1e-12);

        let end = arc.sample(arc.length);
        assert_abs_diff_eq!(end.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(end.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn right_turn_reaches_target() {
        let target = Point2::new(6.0, -2.0);
        let arc = ArcCurve::solve(target, 1e-9).unwrap();
        assert_eq!(arc.turn_sign, -1.0);
        assert!(arc.curvature() < 0.0);
        assert!(arc.angle < 0.0);

        let start = arc.sample(0.0);
        assert_abs_diff_eq!(start.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(start.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(start.heading, 0.0, epsilon = 1e-12);

        let end = arc.sample(arc.length);
        assert_abs_diff_eq!(end.x, target.x, epsilon = 1e-9);
        assert_abs_diff_eq!(end.y, target.y, epsilon = 1e-9);
        assert_abs_diff_eq!(end.heading, arc.angle, epsilon = 1e-12);
    }

    #[test]
    fn more_than_half_turn_is_clamped() {
        let arc = ArcCurve::solve(Point2::new(-1.0, 3.0), 1e-9).unwrap();
        assert!(arc.clamped);
        assert_abs_diff_eq!(arc.angle, PI, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.length, arc.radius * PI, epsilon = 1e-12);
        // the end of the half circle sits on the start normal
        let end = arc.sample(arc.length);
        assert_abs_diff_eq!(end.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(end.y, 2.0 * arc.radius, epsilon = 1e-9);
    }

    #[test]
    fn colinear_target_is_degenerate() {
        let rv = ArcCurve::solve(Point2::new(5.0, 1e-14), 1e-9);
        assert!(matches!(
            rv,
            Err(PlanViewError::DegenerateGeometry {
                family: SolverVariant::Arc,
                ..
            })
        ));
        assert!(ArcCurve::solve(Point2::new(0.0, 0.0), 1e-9).is_err());
    }
}
