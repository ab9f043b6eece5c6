//! Solver settings and the TOML road description read by the plan_view binary.
use clothoid_util::FitOptions;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::composite::CompositeGeometry;
use crate::curve::SolverVariant;
use crate::error::{PlanViewError, Result};
use crate::frame::Point3;
use crate::sampler::LaneOffset;
use crate::section::SectionTarget;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// clothoid solutions at or beyond this length are treated as blow-ups
    pub max_clothoid_length: f64,
    /// arc determinant (relative to chord length) and chord length below which geometry degenerates
    pub degenerate_epsilon: f64,
    /// entries in the ParamPoly3 arc length table
    pub param_poly_samples: usize,
    pub quadrature_tolerance: f64,
    pub fit_tolerance: f64,
    pub fit_heading_tolerance: f64,
    pub fit_max_iterations: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_clothoid_length: 10_000.0,
            degenerate_epsilon: 1e-9,
            param_poly_samples: 100,
            quadrature_tolerance: 1e-10,
            fit_tolerance: 1e-10,
            fit_heading_tolerance: 1e-10,
            fit_max_iterations: 100,
        }
    }
}

impl SolverConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SolverConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_clothoid_length", self.max_clothoid_length),
            ("degenerate_epsilon", self.degenerate_epsilon),
            ("quadrature_tolerance", self.quadrature_tolerance),
            ("fit_tolerance", self.fit_tolerance),
            ("fit_heading_tolerance", self.fit_heading_tolerance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PlanViewError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.param_poly_samples < 2 {
            return Err(PlanViewError::Config(format!(
                "param_poly_samples must be at least 2, got {}",
                self.param_poly_samples
            )));
        }
        if self.fit_max_iterations == 0 {
            return Err(PlanViewError::Config(
                "fit_max_iterations must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            tolerance: self.fit_tolerance,
            heading_tolerance: self.fit_heading_tolerance,
            max_iterations: self.fit_max_iterations,
            observe: false,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartPose {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub heading: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub variant: SolverVariant,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    pub heading: Option<f64>,
    pub curvature: Option<f64>,
}

impl Waypoint {
    pub fn target(&self) -> SectionTarget {
        SectionTarget {
            point_end: Point3::new(self.x, self.y, self.z),
            heading_end: self.heading,
            curvature_start: self.curvature,
            variant: self.variant,
        }
    }
}

/// A road reference line as a start pose and a list of waypoints, one section per waypoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadDescription {
    pub start: StartPose,
    #[serde(default)]
    pub solver: SolverConfig,
    pub lane_offset: Option<LaneOffset>,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
}

impl RoadDescription {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let road: RoadDescription = toml::from_str(text)?;
        road.solver.validate()?;
        Ok(road)
    }

    /// Build the chain, the validity of each section comes back alongside it
    pub fn build(&self) -> (CompositeGeometry, Vec<bool>) {
        let start = Point3::new(self.start.x, self.start.y, self.start.z);
        let mut geometry = CompositeGeometry::with_config(start, self.start.heading, self.solver);
        geometry.set_lane_offset(self.lane_offset);
        let valid = self
            .waypoints
            .iter()
            .map(|waypoint| geometry.add_section(waypoint.target()))
            .collect::<Vec<_>>();
        debug!(
            "built {} sections, total length {:.3}",
            geometry.len(),
            geometry.total_length()
        );
        (geometry, valid)
    }
}
