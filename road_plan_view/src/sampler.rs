//! Sampling the chain by distance along the reference line.
use serde::{Deserialize, Serialize};

use crate::composite::CompositeGeometry;
use crate::error::{PlanViewError, Result};
use crate::frame::Point3;

/// Cubic lateral shift of the lane reference, `a + b s + c s^2 + d s^3` over chain distance
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneOffset {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl LaneOffset {
    pub fn eval(&self, s: f64) -> f64 {
        self.a + s * (self.b + s * (self.c + s * self.d))
    }
}

/// Points at the requested lateral offsets plus the reference line heading and curvature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    pub s: f64,
    pub points: Vec<Point3>,
    pub heading: f64,
    pub curvature: f64,
}

impl CompositeGeometry {
    /// Section containing `s` and the distance into it. A boundary belongs to the section that
    /// starts there, except at the very end of the chain.
    pub fn locate(&self, s: f64) -> Result<(usize, f64)> {
        if self.is_empty() {
            return Err(PlanViewError::EmptyGeometry);
        }
        let total_length = self.total_length();
        if !(0.0..=total_length).contains(&s) {
            return Err(PlanViewError::OutOfRange { s, total_length });
        }
        let sections = self.sections();
        let index = sections
            .partition_point(|section| section.s_offset() <= s)
            .saturating_sub(1);
        let section = &sections[index];
        Ok((index, (s - section.s_offset()).min(section.length())))
    }

    /// World points at `s` shifted along the left normal by each of `lateral_offsets`,
    /// with the lane offset added when `with_lane_offset` is set
    pub fn sample_cross_section(
        &self,
        s: f64,
        lateral_offsets: &[f64],
        with_lane_offset: bool,
    ) -> Result<CrossSection> {
        let (index, s_local) = self.locate(s)?;
        let shift = match (with_lane_offset, self.lane_offset()) {
            (true, Some(lane_offset)) => lane_offset.eval(s),
            _ => 0.0,
        };
        let offsets = lateral_offsets
            .iter()
            .map(|t| t + shift)
            .collect::<Vec<_>>();
        let (points, sample) = self.sections()[index].sample_world(s_local, &offsets);
        Ok(CrossSection {
            s,
            points,
            heading: sample.heading,
            curvature: sample.curvature,
        })
    }

    /// Reference line point at `s`
    pub fn sample_reference(&self, s: f64) -> Result<Point3> {
        let cross_section = self.sample_cross_section(s, &[0.0], false)?;
        Ok(cross_section.points[0])
    }

    /// Cross sections every `step` along the chain, the end of the chain is always included
    pub fn sample_polyline(&self, step: f64, lateral_offsets: &[f64]) -> Result<Vec<CrossSection>> {
        if !(step.is_finite() && step > 0.0) {
            return Err(PlanViewError::InvalidStep(step));
        }
        if self.is_empty() {
            return Err(PlanViewError::EmptyGeometry);
        }
        let total_length = self.total_length();
        let count = (total_length / step).ceil() as usize;
        let mut samples = Vec::with_capacity(count + 1);
        for i in 0..count {
            let s = i as f64 * step;
            if s >= total_length {
                break;
            }
            samples.push(self.sample_cross_section(s, lateral_offsets, true)?);
        }
        samples.push(self.sample_cross_section(total_length, lateral_offsets, true)?);
        Ok(samples)
    }
}
