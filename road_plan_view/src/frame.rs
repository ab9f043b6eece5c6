//! Planar poses and the rigid transform between a section's local frame and the world.
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn with_z(&self, z: f64) -> Point3 {
        Point3::new(self.x, self.y, z)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// distance in the plan view, z is ignored
    pub fn planar_distance(&self, other: &Point3) -> f64 {
        self.xy().distance(&other.xy())
    }
}

/// Position and tangent heading (rad, counter-clockwise from +x)
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub point: Point3,
    pub heading: f64,
}

impl Pose {
    pub fn new(point: Point3, heading: f64) -> Self {
        Self { point, heading }
    }
}

/// Rotation by `rotation` then translation to `origin`, mapping local coordinates to world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    origin: Point2,
    rotation: f64,
    cos: f64,
    sin: f64,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(Point2::default(), 0.0)
    }
}

impl Frame {
    pub fn new(origin: Point2, rotation: f64) -> Self {
        Self {
            origin,
            rotation,
            cos: rotation.cos(),
            sin: rotation.sin(),
        }
    }

    pub fn from_pose(pose: &Pose) -> Self {
        Self::new(pose.point.xy(), pose.heading)
    }

    pub fn origin(&self) -> Point2 {
        self.origin
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn rotate(&self, v: Point2) -> Point2 {
        Point2::new(
            self.cos * v.x - self.sin * v.y,
            self.sin * v.x + self.cos * v.y,
        )
    }

    pub fn to_world(&self, local: Point2) -> Point2 {
        let r = self.rotate(local);
        Point2::new(self.origin.x + r.x, self.origin.y + r.y)
    }

    pub fn to_local(&self, world: Point2) -> Point2 {
        let dx = world.x - self.origin.x;
        let dy = world.y - self.origin.y;
        Point2::new(self.cos * dx + self.sin * dy, -self.sin * dx + self.cos * dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn local_world_round_trip() {
        let frame = Frame::new(Point2::new(3.0, -1.0), 0.7);
        let p = Point2::new(-2.5, 4.0);
        let q = frame.to_local(frame.to_world(p));
        assert_relative_eq!(q.x, p.x, epsilon = 1e-12);
        assert_relative_eq!(q.y, p.y, epsilon = 1e-12);
    }

    #[test]
    fn quarter_turn() {
        let frame = Frame::new(Point2::new(1.0, 1.0), FRAC_PI_2);
        let p = frame.to_world(Point2::new(2.0, 0.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-12);
    }
}
