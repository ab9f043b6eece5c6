//! Plan view road reference lines: chains of line, arc, clothoid and cubic polynomial sections
//! that are re-solved in place as waypoints move, sampled by distance along the chain.
pub mod arc;
pub mod clothoid;
pub mod composite;
pub mod config;
pub mod curve;
pub mod error;
pub mod frame;
pub mod line;
pub mod param_poly;
pub mod record;
pub mod sampler;
pub mod section;

pub use composite::CompositeGeometry;
pub use config::{RoadDescription, SolverConfig};
pub use curve::{PlanViewSample, SolvedCurve, SolverVariant};
pub use error::{PlanViewError, Result};
pub use frame::{Frame, Point2, Point3, Pose};
pub use record::{GeometryKind, GeometryRecord, ParamRange};
pub use sampler::{CrossSection, LaneOffset};
pub use section::{Section, SectionTarget, SolveState};
