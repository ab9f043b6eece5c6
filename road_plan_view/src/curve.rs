//! The curve families a section can be solved with, and dispatch over them.
use serde::{Deserialize, Serialize};

use crate::arc::ArcCurve;
use crate::clothoid::ClothoidCurve;
use crate::config::SolverConfig;
use crate::error::Result;
use crate::frame::Point2;
use crate::line::LineCurve;
use crate::param_poly::ParamPolyCurve;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverVariant {
    Line,
    Arc,
    ClothoidHermite,
    ClothoidForward,
    ParamPoly3,
}

/// Position, tangent heading and curvature at a distance along a curve, in the section frame
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PlanViewSample {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub curvature: f64,
}

impl PlanViewSample {
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// Boundary conditions of one solve, expressed in the section frame where the curve starts
/// at the origin heading along +x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalBoundary {
    pub end: Point2,
    pub heading_end: Option<f64>,
    pub curvature_start: f64,
}

impl LocalBoundary {
    /// heading of the circular arc from the origin through `end`
    fn arc_heading(&self) -> f64 {
        2.0 * self.end.y.atan2(self.end.x)
    }

    fn chord_heading(&self) -> f64 {
        self.end.y.atan2(self.end.x)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolvedCurve {
    Line(LineCurve),
    Arc(ArcCurve),
    Clothoid(ClothoidCurve),
    ParamPoly3(ParamPolyCurve),
}

impl Default for SolvedCurve {
    fn default() -> Self {
        Self::Line(LineCurve::default())
    }
}

impl SolvedCurve {
    pub fn solve(
        variant: SolverVariant,
        boundary: &LocalBoundary,
        config: &SolverConfig,
    ) -> Result<Self> {
        let solved = match variant {
            SolverVariant::Line => Self::Line(LineCurve::solve(boundary.end)),
            SolverVariant::Arc => {
                Self::Arc(ArcCurve::solve(boundary.end, config.degenerate_epsilon)?)
            }
            SolverVariant::ClothoidHermite => Self::Clothoid(ClothoidCurve::solve_hermite(
                boundary.end,
                boundary.heading_end.unwrap_or_else(|| boundary.arc_heading()),
                &config.fit_options(),
                config.max_clothoid_length,
            )?),
            SolverVariant::ClothoidForward => Self::Clothoid(ClothoidCurve::solve_forward(
                boundary.end,
                boundary.curvature_start,
                &config.fit_options(),
                config.max_clothoid_length,
            )?),
            SolverVariant::ParamPoly3 => Self::ParamPoly3(ParamPolyCurve::solve(
                boundary.end,
                boundary.heading_end.unwrap_or_else(|| boundary.chord_heading()),
                config.param_poly_samples,
                config.quadrature_tolerance,
                config.degenerate_epsilon,
            )?),
        };
        Ok(solved)
    }

    /// Straight line towards the end, used when the requested family has no solution
    pub fn fallback(boundary: &LocalBoundary) -> Self {
        Self::Line(LineCurve::solve(boundary.end))
    }

    pub fn variant(&self) -> SolverVariant {
        match self {
            Self::Line(_) => SolverVariant::Line,
            Self::Arc(_) => SolverVariant::Arc,
            Self::Clothoid(c) => c.variant(),
            Self::ParamPoly3(_) => SolverVariant::ParamPoly3,
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Self::Line(c) => c.length,
            Self::Arc(c) => c.length,
            Self::Clothoid(c) => c.length,
            Self::ParamPoly3(c) => c.length,
        }
    }

    /// heading at the end relative to the start heading, not wrapped
    pub fn heading_end(&self) -> f64 {
        match self {
            Self::Line(_) => 0.0,
            Self::Arc(c) => c.angle,
            Self::Clothoid(c) => c.heading_end,
            Self::ParamPoly3(c) => c.heading_end,
        }
    }

    pub fn curvature_start(&self) -> f64 {
        match self {
            Self::Line(_) | Self::ParamPoly3(_) => 0.0,
            Self::Arc(c) => c.curvature(),
            Self::Clothoid(c) => c.curvature_start,
        }
    }

    pub fn curvature_end(&self) -> f64 {
        match self {
            Self::Line(_) | Self::ParamPoly3(_) => 0.0,
            Self::Arc(c) => c.curvature(),
            Self::Clothoid(c) => c.curvature_end,
        }
    }

    pub fn sample_plan_view(&self, s: f64) -> PlanViewSample {
        match self {
            Self::Line(c) => c.sample(s),
            Self::Arc(c) => c.sample(s),
            Self::Clothoid(c) => c.sample(s),
            Self::ParamPoly3(c) => c.sample(s),
        }
    }

    /// End point in the section frame; the heading comes from `heading_end` so that it keeps
    /// the total turning
    pub fn end_point(&self) -> Point2 {
        self.sample_plan_view(self.length()).position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn boundary(x: f64, y: f64, heading_end: Option<f64>) -> LocalBoundary {
        LocalBoundary {
            end: Point2::new(x, y),
            heading_end,
            curvature_start: 0.0,
        }
    }

    #[test]
    fn every_family_reaches_the_end() {
        let config = SolverConfig::default();
        let b = boundary(10.0, 4.0, Some(0.9));
        for variant in [
            SolverVariant::Arc,
            SolverVariant::ClothoidHermite,
            SolverVariant::ClothoidForward,
            SolverVariant::ParamPoly3,
        ] {
            let solved = SolvedCurve::solve(variant, &b, &config).unwrap();
            assert_eq!(solved.variant(), variant);
            let end = solved.end_point();
            assert_abs_diff_eq!(end.x, 10.0, epsilon = 1e-6);
            assert_abs_diff_eq!(end.y, 4.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn default_end_headings() {
        let config = SolverConfig::default();
        let b = boundary(10.0, 4.0, None);
        // without a heading the hermite clothoid reproduces the arc
        let arc = SolvedCurve::solve(SolverVariant::Arc, &b, &config).unwrap();
        let clothoid = SolvedCurve::solve(SolverVariant::ClothoidHermite, &b, &config).unwrap();
        assert_abs_diff_eq!(arc.heading_end(), clothoid.heading_end(), epsilon = 1e-6);
        assert_abs_diff_eq!(arc.length(), clothoid.length(), epsilon = 1e-6);
        assert_abs_diff_eq!(arc.curvature_end(), clothoid.curvature_end(), epsilon = 1e-6);

        let poly = SolvedCurve::solve(SolverVariant::ParamPoly3, &b, &config).unwrap();
        assert_abs_diff_eq!(poly.heading_end(), 4.0_f64.atan2(10.0), epsilon = 1e-12);
    }

    #[test]
    fn fallback_is_straight() {
        let b = boundary(5.0, 0.0, None);
        assert!(SolvedCurve::solve(SolverVariant::Arc, &b, &SolverConfig::default()).is_err());
        let line = SolvedCurve::fallback(&b);
        assert_eq!(line.variant(), SolverVariant::Line);
        assert_eq!(line.length(), 5.0);
        assert_eq!(line.heading_end(), 0.0);
    }
}
