//! One piece of the reference line: its boundary conditions, the frame it is solved in and the
//! solved curve.
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use crate::config::SolverConfig;
use crate::curve::{LocalBoundary, PlanViewSample, SolvedCurve, SolverVariant};
use crate::frame::{Frame, Point2, Point3, Pose};
use crate::record::{GeometryKind, GeometryRecord, ParamRange};

/// What a user places: the end of a section in world coordinates and the family to reach it with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionTarget {
    pub point_end: Point3,
    /// world heading at the end, used by the Hermite clothoid and ParamPoly3 families
    pub heading_end: Option<f64>,
    /// curvature at the start, used by the forward clothoid
    pub curvature_start: Option<f64>,
    pub variant: SolverVariant,
}

impl SectionTarget {
    pub fn new(point_end: Point3, variant: SolverVariant) -> Self {
        Self {
            point_end,
            heading_end: None,
            curvature_start: None,
            variant,
        }
    }

    pub fn with_heading(mut self, heading_end: f64) -> Self {
        self.heading_end = Some(heading_end);
        self
    }

    pub fn with_curvature(mut self, curvature_start: f64) -> Self {
        self.curvature_start = Some(curvature_start);
        self
    }
}

/// The start pose a section receives from the chain plus its own target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryInput {
    pub start: Pose,
    pub target: SectionTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveState {
    Unsolved,
    Valid,
    /// the requested target could not be met, the geometry came from a previous target or a line
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    input: BoundaryInput,
    last_valid: Option<SectionTarget>,
    solved: SolvedCurve,
    frame: Frame,
    s_offset: f64,
    state: SolveState,
}

impl Section {
    pub fn new(start: Pose, target: SectionTarget) -> Self {
        Self {
            input: BoundaryInput { start, target },
            last_valid: None,
            solved: SolvedCurve::default(),
            frame: Frame::from_pose(&start),
            s_offset: 0.0,
            state: SolveState::Unsolved,
        }
    }

    pub fn input(&self) -> &BoundaryInput {
        &self.input
    }

    pub fn target(&self) -> &SectionTarget {
        &self.input.target
    }

    pub fn last_valid(&self) -> Option<&SectionTarget> {
        self.last_valid.as_ref()
    }

    pub fn solved(&self) -> &SolvedCurve {
        &self.solved
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn state(&self) -> SolveState {
        self.state
    }

    pub fn valid(&self) -> bool {
        self.state == SolveState::Valid
    }

    pub fn length(&self) -> f64 {
        self.solved.length()
    }

    /// distance along the chain to the start of this section
    pub fn s_offset(&self) -> f64 {
        self.s_offset
    }

    pub(crate) fn set_s_offset(&mut self, s_offset: f64) {
        self.s_offset = s_offset;
    }

    pub(crate) fn set_target(&mut self, target: SectionTarget) {
        self.input.target = target;
    }

    pub fn start_pose(&self) -> Pose {
        self.input.start
    }

    /// World pose at the end of the solved curve. The plan view is flat, z stays at the start z.
    pub fn end_pose(&self) -> Pose {
        let end = self.frame.to_world(self.solved.end_point());
        Pose::new(
            end.with_z(self.input.start.point.z),
            self.frame.rotation() + self.solved.heading_end(),
        )
    }

    fn local_boundary(&self, target: &SectionTarget, inherited_curvature: f64) -> LocalBoundary {
        LocalBoundary {
            end: self.frame.to_local(target.point_end.xy()),
            heading_end: target.heading_end.map(|h| h - self.frame.rotation()),
            curvature_start: target.curvature_start.unwrap_or(inherited_curvature),
        }
    }

    /// Re-solve from a new start pose, `inherited_curvature` is the end curvature of the
    /// previous section. Returns whether the current target was met.
    pub fn resolve(
        &mut self,
        start: Pose,
        inherited_curvature: f64,
        config: &SolverConfig,
    ) -> bool {
        self.input.start = start;
        self.frame = Frame::from_pose(&start);

        let target = self.input.target;
        let boundary = self.local_boundary(&target, inherited_curvature);
        let err = match SolvedCurve::solve(target.variant, &boundary, config) {
            Ok(solved) => {
                debug!(
                    "{:?} section solved, length {:.3}",
                    target.variant,
                    solved.length()
                );
                self.solved = solved;
                self.last_valid = Some(target);
                self.state = SolveState::Valid;
                return true;
            }
            Err(err) => err,
        };

        self.state = SolveState::Fallback;
        // an arc through a target on its own tangent is the straight line to it
        if target.variant != SolverVariant::Arc {
            if let Some(previous) = self.last_valid.filter(|previous| *previous != target) {
                let previous_boundary = self.local_boundary(&previous, inherited_curvature);
                if let Ok(solved) = SolvedCurve::solve(previous.variant, &previous_boundary, config)
                {
                    warn!("{err}, reverting to the last valid target {previous:?}");
                    self.solved = solved;
                    self.input.target = previous;
                    return false;
                }
            }
        }
        warn!("{err}, falling back to a straight line");
        self.solved = SolvedCurve::fallback(&boundary);
        false
    }

    /// Local sample at `s_local` taken to world coordinates, offsets are along the left normal
    pub fn sample_world(
        &self,
        s_local: f64,
        lateral_offsets: &[f64],
    ) -> (Vec<Point3>, PlanViewSample) {
        let local = self.solved.sample_plan_view(s_local);
        let normal = local.heading + FRAC_PI_2;
        let (sin_n, cos_n) = normal.sin_cos();
        let z = self.input.start.point.z;
        let points = lateral_offsets
            .iter()
            .map(|t| {
                let p = Point2::new(local.x + t * cos_n, local.y + t * sin_n);
                self.frame.to_world(p).with_z(z)
            })
            .collect();
        let reference = self.frame.to_world(local.position());
        let world = PlanViewSample {
            x: reference.x,
            y: reference.y,
            heading: self.frame.rotation() + local.heading,
            curvature: local.curvature,
        };
        (points, world)
    }

    /// Plan view record of the solved geometry
    pub fn params(&self) -> GeometryRecord {
        let start = self.input.start;
        let kind = match &self.solved {
            SolvedCurve::Line(_) => GeometryKind::Line,
            SolvedCurve::Arc(arc) => GeometryKind::Arc {
                curvature: arc.curvature(),
            },
            SolvedCurve::Clothoid(clothoid) => GeometryKind::Spiral {
                curv_start: clothoid.curvature_start,
                curv_end: clothoid.curvature_end,
            },
            SolvedCurve::ParamPoly3(poly) => GeometryKind::ParamPoly3 {
                au: poly.u.a,
                bu: poly.u.b,
                cu: poly.u.c,
                du: poly.u.d,
                av: poly.v.a,
                bv: poly.v.b,
                cv: poly.v.c,
                dv: poly.v.d,
                p_range: ParamRange::Normalized,
            },
        };
        GeometryRecord {
            s: self.s_offset,
            x: start.point.x,
            y: start.point.y,
            hdg: start.heading,
            length: self.length(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn origin() -> Pose {
        Pose::new(Point3::new(0.0, 0.0, 0.0), 0.0)
    }

    #[test]
    fn unsolved_until_resolved() {
        let target = SectionTarget::new(Point3::new(4.0, 0.0, 0.0), SolverVariant::Line);
        let mut section = Section::new(origin(), target);
        assert_eq!(section.state(), SolveState::Unsolved);
        assert!(section.resolve(origin(), 0.0, &SolverConfig::default()));
        assert!(section.valid());
        assert_eq!(section.length(), 4.0);
    }

    #[test]
    fn end_pose_in_world() {
        let start = Pose::new(Point3::new(1.0, 1.0, 2.0), std::f64::consts::FRAC_PI_2);
        let target = SectionTarget::new(Point3::new(-1.0, 3.0, 0.0), SolverVariant::Arc);
        let mut section = Section::new(start, target);
        assert!(section.resolve(start, 0.0, &SolverConfig::default()));
        let end = section.end_pose();
        assert_abs_diff_eq!(end.point.x, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(end.point.y, 3.0, epsilon = 1e-9);
        assert_eq!(end.point.z, 2.0);
        // quarter circle to the left
        assert_abs_diff_eq!(end.heading, std::f64::consts::PI, epsilon = 1e-9);
    }

    #[test]
    fn length_guard_reverts_to_last_valid() {
        let config = SolverConfig::default();
        let good = SectionTarget::new(Point3::new(10.0, 2.0, 0.0), SolverVariant::ClothoidHermite)
            .with_heading(0.3);
        let mut section = Section::new(origin(), good);
        assert!(section.resolve(origin(), 0.0, &config));
        let before = section.solved().clone();

        // further than the clothoid length guard
        section.set_target(
            SectionTarget::new(Point3::new(20_000.0, 1.0, 0.0), SolverVariant::ClothoidHermite)
                .with_heading(0.0),
        );
        assert!(!section.resolve(origin(), 0.0, &config));
        assert_eq!(section.state(), SolveState::Fallback);
        assert_eq!(section.solved(), &before);
        assert_eq!(section.target(), &good);
    }

    #[test]
    fn degenerate_arc_is_a_line() {
        let target = SectionTarget::new(Point3::new(7.0, 0.0, 0.0), SolverVariant::Arc);
        let mut section = Section::new(origin(), target);
        assert!(!section.resolve(origin(), 0.0, &SolverConfig::default()));
        assert_eq!(section.solved().variant(), SolverVariant::Line);
        assert_eq!(section.length(), 7.0);
        // the requested target stays in place
        assert_eq!(section.target(), &target);
    }

    #[test]
    fn params_record() {
        let start = Pose::new(Point3::new(2.0, 3.0, 0.0), 0.25);
        let target = SectionTarget::new(Point3::new(12.0, 6.0, 0.0), SolverVariant::ParamPoly3)
            .with_heading(0.5);
        let mut section = Section::new(start, target);
        assert!(section.resolve(start, 0.0, &SolverConfig::default()));
        let record = section.params();
        assert_eq!((record.x, record.y, record.hdg), (2.0, 3.0, 0.25));
        assert_eq!(record.length, section.length());
        match record.kind {
            GeometryKind::ParamPoly3 { au, av, p_range, .. } => {
                assert_eq!((au, av), (0.0, 0.0));
                assert_eq!(p_range, ParamRange::Normalized);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
