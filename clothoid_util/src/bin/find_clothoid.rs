//! Copyright 2024 Lucas Walter
//!
//! find_clothoid x0 y0 theta0 x1 y1 [theta1]
//!
//! With theta1 the clothoid matches both tangents, without it the start is straight and
//! only the end point is matched.
use clothoid_curve::f64::{Clothoid, Curvature, Position};
use clothoid_util::fit::{fit_forward, fit_hermite, FitError, FitOptions};
use log::info;
use uom::num_traits::Zero;
use uom::si::{angle::radian, curvature::radian_per_meter, f64::Angle, length::meter};

fn parse(args: &[String], index: usize, name: &str) -> Result<f64, String> {
    let arg = args
        .get(index)
        .ok_or_else(|| format!("missing argument {name}"))?;
    arg.parse()
        .map_err(|err| format!("could not parse {name} '{arg}': {err}"))
}

fn run() -> Result<Clothoid, String> {
    let args: Vec<_> = std::env::args().collect();
    let start = Position::from_array_meter([parse(&args, 1, "x0")?, parse(&args, 2, "y0")?]);
    let theta0 = Angle::new::<radian>(parse(&args, 3, "theta0")?);
    let end = Position::from_array_meter([parse(&args, 4, "x1")?, parse(&args, 5, "y1")?]);
    let options = FitOptions {
        observe: log::log_enabled!(log::Level::Trace),
        ..Default::default()
    };

    let rv: Result<Clothoid, FitError> = if args.len() > 6 {
        let theta1 = Angle::new::<radian>(parse(&args, 6, "theta1")?);
        info!("hermite fit to {theta1:?}");
        fit_hermite(&start, theta0, &end, theta1, &options)
    } else {
        info!("forward fit from straight start");
        fit_forward(&start, theta0, Curvature::zero(), &end, &options)
    };
    rv.map_err(|err| err.to_string())
}

fn main() {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    match run() {
        Ok(clothoid) => {
            let end = clothoid.get_end_clothoid();
            println!(
                "length: {:0.4}, curvature: {:0.6} -> {:0.6}, end theta: {:0.4}",
                clothoid.length.get::<meter>(),
                clothoid.curvature().get::<radian_per_meter>(),
                end.curvature().get::<radian_per_meter>(),
                clothoid.end_theta().get::<radian>(),
            );
            println!("end: {:?}", end.xy0.as_array_meter());
        }
        Err(e) => {
            println!("{e}");
            std::process::exit(1);
        }
    }
}
