use thiserror::Error;

use crate::curve::SolverVariant;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanViewError {
    #[error("degenerate {family:?} geometry: {reason}")]
    DegenerateGeometry {
        family: SolverVariant,
        reason: String,
    },
    #[error("s {s} is outside of [0, {total_length}]")]
    OutOfRange { s: f64, total_length: f64 },
    #[error("geometry has no sections")]
    EmptyGeometry,
    #[error("section index {index} out of bounds for {len} sections")]
    SectionIndex { index: usize, len: usize },
    #[error("sampling step must be positive and finite, got {0}")]
    InvalidStep(f64),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PlanViewError {
    pub(crate) fn degenerate(family: SolverVariant, reason: impl ToString) -> Self {
        Self::DegenerateGeometry {
            family,
            reason: reason.to_string(),
        }
    }
}

impl From<toml::de::Error> for PlanViewError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlanViewError>;
