//! A chain of sections where each starts at the end pose of the previous one.
use log::debug;

use crate::config::SolverConfig;
use crate::error::{PlanViewError, Result};
use crate::frame::{Frame, Point3, Pose};
use crate::record::GeometryRecord;
use crate::sampler::LaneOffset;
use crate::section::{Section, SectionTarget};

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeGeometry {
    start: Pose,
    sections: Vec<Section>,
    total_length: f64,
    config: SolverConfig,
    lane_offset: Option<LaneOffset>,
}

impl CompositeGeometry {
    pub fn new(start_point: Point3, start_heading: f64) -> Self {
        Self::with_config(start_point, start_heading, SolverConfig::default())
    }

    pub fn with_config(start_point: Point3, start_heading: f64, config: SolverConfig) -> Self {
        Self {
            start: Pose::new(start_point, start_heading),
            sections: Vec::new(),
            total_length: 0.0,
            config,
            lane_offset: None,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn start_pose(&self) -> Pose {
        self.start
    }

    /// world transform of the chain start
    pub fn matrix_world(&self) -> Frame {
        Frame::from_pose(&self.start)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Result<&Section> {
        self.sections.get(index).ok_or(PlanViewError::SectionIndex {
            index,
            len: self.sections.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    pub fn lane_offset(&self) -> Option<&LaneOffset> {
        self.lane_offset.as_ref()
    }

    pub fn set_lane_offset(&mut self, lane_offset: Option<LaneOffset>) {
        self.lane_offset = lane_offset;
    }

    /// where the next section starts
    pub fn end_pose(&self) -> Pose {
        self.sections
            .last()
            .map_or(self.start, |section| section.end_pose())
    }

    /// end curvature of the last section, picked up by forward clothoids without their own
    fn curvature_before(&self, index: usize) -> f64 {
        index
            .checked_sub(1)
            .and_then(|i| self.sections.get(i))
            .map_or(0.0, |section| section.solved().curvature_end())
    }

    /// Append a section ending at `target`, returns whether the target was met
    pub fn add_section(&mut self, target: SectionTarget) -> bool {
        let start = self.end_pose();
        let inherited = self.curvature_before(self.sections.len());
        let mut section = Section::new(start, target);
        let valid = section.resolve(start, inherited, &self.config);
        section.set_s_offset(self.total_length);
        self.total_length += section.length();
        self.sections.push(section);
        debug!(
            "added section {}, total length {:.3}",
            self.sections.len() - 1,
            self.total_length
        );
        valid
    }

    /// Replace the target of section `index` and re-solve it and everything after it.
    /// Returns the validity of every section.
    pub fn update(&mut self, index: usize, target: SectionTarget) -> Result<Vec<bool>> {
        let len = self.sections.len();
        let section = self
            .sections
            .get_mut(index)
            .ok_or(PlanViewError::SectionIndex { index, len })?;
        section.set_target(target);
        Ok(self.cascade(index))
    }

    /// Move the whole chain, every section keeps its world target
    pub fn set_start_pose(&mut self, start_point: Point3, start_heading: f64) -> Vec<bool> {
        self.start = Pose::new(start_point, start_heading);
        self.cascade(0)
    }

    /// Re-solve all sections, e.g. after changing the configuration
    pub fn set_config(&mut self, config: SolverConfig) -> Vec<bool> {
        self.config = config;
        self.cascade(0)
    }

    /// Drop sections past `len`
    pub fn truncate(&mut self, len: usize) {
        self.sections.truncate(len);
        self.update_offsets();
    }

    pub fn pop_section(&mut self) -> Option<Section> {
        let section = self.sections.pop();
        self.update_offsets();
        section
    }

    fn cascade(&mut self, from: usize) -> Vec<bool> {
        let mut valid = Vec::with_capacity(self.sections.len());
        for index in 0..self.sections.len() {
            if index < from {
                valid.push(self.sections[index].valid());
                continue;
            }
            let start = match index {
                0 => self.start,
                _ => self.sections[index - 1].end_pose(),
            };
            let inherited = self.curvature_before(index);
            valid.push(self.sections[index].resolve(start, inherited, &self.config));
        }
        self.update_offsets();
        debug!(
            "cascade from section {from} over {} sections, total length {:.3}",
            self.sections.len(),
            self.total_length
        );
        valid
    }

    fn update_offsets(&mut self) {
        let mut s = 0.0;
        for section in self.sections.iter_mut() {
            section.set_s_offset(s);
            s += section.length();
        }
        self.total_length = s;
    }

    pub fn geometry_records(&self) -> Vec<GeometryRecord> {
        self.sections.iter().map(Section::params).collect()
    }
}
