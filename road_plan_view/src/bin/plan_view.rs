//! plan_view road.toml [step]
//!
//! Solve the road description and print its geometry records and a sampled polyline of the
//! reference line as json.
use log::{info, warn};
use road_plan_view::{CrossSection, GeometryRecord, RoadDescription};
use serde::Serialize;

#[derive(Serialize)]
struct PlanView {
    total_length: f64,
    valid: Vec<bool>,
    geometry: Vec<GeometryRecord>,
    samples: Vec<CrossSection>,
}

fn run() -> Result<PlanView, String> {
    let args: Vec<_> = std::env::args().collect();
    let path = args
        .get(1)
        .ok_or_else(|| "usage: plan_view road.toml [step]".to_string())?;
    let step = match args.get(2) {
        Some(arg) => arg
            .parse::<f64>()
            .map_err(|err| format!("could not parse step '{arg}': {err}"))?,
        None => 1.0,
    };

    let text =
        std::fs::read_to_string(path).map_err(|err| format!("could not read {path}: {err}"))?;
    let road = RoadDescription::from_toml_str(&text).map_err(|err| err.to_string())?;
    let (geometry, valid) = road.build();
    for (index, valid) in valid.iter().enumerate() {
        if !valid {
            warn!("section {index} did not reach its waypoint");
        }
    }
    info!(
        "{} sections, total length {:.3}",
        geometry.len(),
        geometry.total_length()
    );

    let samples = geometry
        .sample_polyline(step, &[0.0])
        .map_err(|err| err.to_string())?;
    Ok(PlanView {
        total_length: geometry.total_length(),
        valid,
        geometry: geometry.geometry_records(),
        samples,
    })
}

fn main() {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    match run().and_then(|plan_view| {
        serde_json::to_string_pretty(&plan_view).map_err(|err| err.to_string())
    }) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
