use serde::{Deserialize, Serialize};

use crate::curve::PlanViewSample;
use crate::frame::Point2;

/// Straight segment along the local +x axis
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineCurve {
    pub length: f64,
}

impl LineCurve {
    /// `end` is in the section frame, a target behind the start is pulled onto local x = 0
    pub fn solve(end: Point2) -> Self {
        let clamped = Point2::new(end.x.max(0.0), end.y);
        Self {
            length: clamped.norm(),
        }
    }

    pub fn sample(&self, s: f64) -> PlanViewSample {
        PlanViewSample {
            x: s,
            y: 0.0,
            heading: 0.0,
            curvature: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_ahead() {
        let line = LineCurve::solve(Point2::new(3.0, 4.0));
        assert_eq!(line.length, 5.0);
        let end = line.sample(line.length);
        assert_eq!((end.x, end.y, end.heading), (5.0, 0.0, 0.0));
    }

    #[test]
    fn behind_start_is_clamped() {
        let line = LineCurve::solve(Point2::new(-6.0, 2.0));
        assert_eq!(line.length, 2.0);
        assert_eq!(LineCurve::solve(Point2::new(-1.0, 0.0)).length, 0.0);
    }
}
