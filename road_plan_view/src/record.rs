//! Plan view geometry records handed to exporters, one per section.
use serde::{Deserialize, Serialize};

/// How the parameter of a ParamPoly3 record runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamRange {
    ArcLength,
    Normalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryKind {
    Line,
    Arc {
        curvature: f64,
    },
    Spiral {
        curv_start: f64,
        curv_end: f64,
    },
    #[serde(rename = "param_poly3")]
    ParamPoly3 {
        au: f64,
        bu: f64,
        cu: f64,
        du: f64,
        av: f64,
        bv: f64,
        cv: f64,
        dv: f64,
        p_range: ParamRange,
    },
}

/// Start pose, distance along the chain and length of a section plus its family parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    pub s: f64,
    pub x: f64,
    pub y: f64,
    pub hdg: f64,
    pub length: f64,
    #[serde(flatten)]
    pub kind: GeometryKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_layout() {
        let record = GeometryRecord {
            s: 10.0,
            x: 1.0,
            y: 2.0,
            hdg: 0.5,
            length: 4.0,
            kind: GeometryKind::Arc { curvature: -0.25 },
        };
        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value["type"], "arc");
        assert_eq!(value["curvature"], -0.25);
        assert_eq!(value["s"], 10.0);

        let back: GeometryRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn param_poly_tag() {
        let kind = GeometryKind::ParamPoly3 {
            au: 0.0,
            bu: 1.0,
            cu: 0.0,
            du: 0.0,
            av: 0.0,
            bv: 0.0,
            cv: 0.0,
            dv: 0.0,
            p_range: ParamRange::Normalized,
        };
        let value = serde_json::to_value(kind).unwrap();
        assert_eq!(value["type"], "param_poly3");
        assert_eq!(value["p_range"], "normalized");
    }
}
