//! Copyright 2024 Lucas Walter
//!
//! Clothoid fitting: G1 Hermite interpolation between two poses, and forward construction
//! from a start pose with fixed curvature to a target point.
//!
//! The G1 solve follows Bertolazzi & Frego, "G1 fitting with clothoids", reducing the problem
//! to a scalar root find in the curvature rate parameter A.
use argmin::core::{
    observers::ObserverMode, CostFunction, Error as ArgminError, Executor, State,
    TerminationReason,
};
use argmin::solver::brent::BrentRoot;
use argmin_observer_slog::SlogLogger;
use clothoid_curve::f64::{
    angle_unwrap, curvature_per_meter, generalized_fresnel_cs, Angle, Clothoid, Curvature, Length,
    Position,
};
use finitediff::FiniteDiff;
use log::trace;
use std::f64::consts::PI;
use thiserror::Error;
use uom::si::{angle::radian, curvature::radian_per_meter, length::meter};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("start and end points coincide")]
    CoincidentPoints,
    #[error("no sign change of the residual around {guess}")]
    NoBracket { guess: f64 },
    #[error("no convergence after {iterations} iterations, residual {residual:e}")]
    NotConverged { iterations: u64, residual: f64 },
    #[error("solution has non-positive length {length}")]
    NonPositiveLength { length: f64 },
    #[error("root finder failed: {0}")]
    Solver(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// bracket width at which the G1 root find in the curvature rate parameter stops
    pub tolerance: f64,
    /// bracket width (rad) at which the forward search over the end heading stops
    pub heading_tolerance: f64,
    /// executor iteration limit of each root find
    pub max_iterations: u64,
    /// log every iteration through the slog observer
    pub observe: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            heading_tolerance: 1e-10,
            max_iterations: 100,
            observe: false,
        }
    }
}

// polynomial fit of the root in A over the (phi0, phi1) plane, from Bertolazzi & Frego
#[allow(clippy::excessive_precision)]
const GUESS_COEFFS: [f64; 6] = [
    2.989696028701907,
    0.716228953608281,
    -0.458969738821509,
    -0.502821153340377,
    0.261062141752652,
    -0.045854475238709,
];

// doublings of the bracket half width before giving up
const MAX_EXPANSIONS: usize = 12;
// a converged bracket around a jump in the residual is not a root
const MAX_ROOT_RESIDUAL: f64 = 1e-6;

/// Angles of the two end tangents measured from the chord
#[derive(Clone, Copy, Debug)]
struct ChordAngles {
    phi0: f64,
    phi1: f64,
}

impl ChordAngles {
    fn delta(&self) -> f64 {
        self.phi1 - self.phi0
    }

    fn initial_guess(&self) -> f64 {
        let x = self.phi0 / PI;
        let y = self.phi1 / PI;
        let xy = x * y;
        let x2y2 = x * x + y * y;
        let x4y4 = x.powi(4) + y.powi(4);
        let c = GUESS_COEFFS;
        (self.phi0 + self.phi1)
            * (c[0] + xy * (c[1] + xy * c[2]) + (c[3] + xy * c[4]) * x2y2 + c[5] * x4y4)
    }

    /// integrals of cos and sin of the heading along the normalized curve for curvature rate a
    fn integrals(&self, a: f64) -> (f64, f64) {
        generalized_fresnel_cs(
            2.0 * a,
            self.delta() - a,
            Angle::new::<radian>(self.phi0),
        )
    }
}

/// The sine integral is zero when the normalized curve ends on the chord
impl CostFunction for ChordAngles {
    type Param = f64;
    type Output = f64;

    fn cost(&self, a: &Self::Param) -> Result<Self::Output, ArgminError> {
        Ok(self.integrals(*a).1)
    }
}

/// Start curvature of the G1 clothoid ending with a given heading, less the wanted start
/// curvature
#[derive(Clone, Debug)]
struct StartCurvature {
    start: Position,
    theta0: Angle,
    end: Position,
    kappa0: f64,
    options: FitOptions,
}

impl CostFunction for StartCurvature {
    type Param = f64;
    type Output = f64;

    fn cost(&self, theta1: &Self::Param) -> Result<Self::Output, ArgminError> {
        let clothoid = fit_hermite(
            &self.start,
            self.theta0,
            &self.end,
            Angle::new::<radian>(*theta1),
            &self.options,
        )?;
        Ok(clothoid.curvature().get::<radian_per_meter>() - self.kappa0)
    }
}

/// Grow an interval around `guess` until the residual changes sign across one half of it,
/// trying the side the local slope points to first
fn bracket<O>(problem: &O, guess: f64, mut half_width: f64) -> Result<(f64, f64), FitError>
where
    O: CostFunction<Param = f64, Output = f64>,
{
    let f = |x: f64| problem.cost(&x).unwrap_or(f64::NAN);
    let f0 = f(guess);
    if f0 == 0.0 {
        return Ok((guess, guess));
    }
    let slope = vec![guess].central_diff(&|p: &Vec<f64>| f(p[0]))[0];
    let toward = if slope.is_finite() && slope != 0.0 {
        -(f0 / slope).signum()
    } else {
        1.0
    };
    for _ in 0..MAX_EXPANSIONS {
        for side in [toward, -toward] {
            let x = guess + side * half_width;
            // a NaN residual never brackets
            if f(x) * f0 <= 0.0 {
                trace!("bracket [{guess}, {x}] after half width {half_width}");
                return Ok(if x < guess { (x, guess) } else { (guess, x) });
            }
        }
        half_width *= 2.0;
    }
    Err(FitError::NoBracket { guess })
}

/// Brent root of a bracketed scalar residual
fn find_root<O>(
    problem: O,
    guess: f64,
    half_width: f64,
    tolerance: f64,
    options: &FitOptions,
) -> Result<f64, FitError>
where
    O: CostFunction<Param = f64, Output = f64> + Clone,
{
    let (min, max) = bracket(&problem, guess, half_width)?;
    if min == max {
        return Ok(min);
    }
    let solver = BrentRoot::new(min, max, tolerance);
    let mut executor = Executor::new(problem.clone(), solver)
        .configure(|state| state.max_iters(options.max_iterations));
    if options.observe {
        executor = executor.add_observer(SlogLogger::term(), ObserverMode::Always);
    }
    let res = executor
        .run()
        .map_err(|err| FitError::Solver(err.to_string()))?;
    let state = &res.state;
    if let Some(TerminationReason::MaxItersReached) = state.get_termination_reason() {
        return Err(FitError::NotConverged {
            iterations: state.get_iter(),
            residual: state.get_cost(),
        });
    }
    let iterations = state.get_iter();
    let root = state.param.ok_or(FitError::NotConverged {
        iterations,
        residual: state.get_cost(),
    })?;
    let residual = problem.cost(&root).unwrap_or(f64::NAN);
    trace!("root {root} after {iterations} iterations, residual {residual:e}");
    if !(residual.abs() <= MAX_ROOT_RESIDUAL) {
        return Err(FitError::NotConverged {
            iterations,
            residual,
        });
    }
    Ok(root)
}

fn chord(start: &Position, end: &Position) -> Result<(f64, f64), FitError> {
    let [x0, y0] = start.as_array_meter();
    let [x1, y1] = end.as_array_meter();
    let dx = x1 - x0;
    let dy = y1 - y0;
    let r = dx.hypot(dy);
    if r < f64::EPSILON {
        return Err(FitError::CoincidentPoints);
    }
    Ok((r, dy.atan2(dx)))
}

fn wrapped(angle: f64) -> f64 {
    angle_unwrap(Angle::new::<radian>(angle)).get::<radian>()
}

/// Find the clothoid from start (position and heading theta0) to end (position and heading
/// theta1) that matches both tangents exactly.
pub fn fit_hermite(
    start: &Position,
    theta0: Angle,
    end: &Position,
    theta1: Angle,
    options: &FitOptions,
) -> Result<Clothoid, FitError> {
    let (r, phi) = chord(start, end)?;
    let angles = ChordAngles {
        phi0: wrapped(theta0.get::<radian>() - phi),
        phi1: wrapped(theta1.get::<radian>() - phi),
    };

    let guess = angles.initial_guess();
    let a = find_root(
        angles,
        guess,
        0.05 * guess.abs().max(1.0),
        options.tolerance,
        options,
    )?;

    let (h, _) = angles.integrals(a);
    if h <= 0.0 {
        return Err(FitError::NonPositiveLength {
            length: if h == 0.0 { 0.0 } else { r / h },
        });
    }
    let length = r / h;
    let kappa0 = (angles.delta() - a) / length;
    let dk = 2.0 * a / (length * length);
    trace!("hermite solution: length {length:.6}, kappa0 {kappa0:.6}, dk {dk:.6}");

    Ok(Clothoid::create(
        start.x,
        start.y,
        theta0,
        Curvature::new::<radian_per_meter>(kappa0),
        curvature_per_meter(dk),
        Length::new::<meter>(length),
    ))
}

/// Find the clothoid leaving start with heading theta0 and curvature kappa0 that passes
/// through end, the end heading is free.
///
/// The end heading is the root of the G1 start curvature residual, bracketed around the
/// circular arc through both points.
pub fn fit_forward(
    start: &Position,
    theta0: Angle,
    kappa0: Curvature,
    end: &Position,
    options: &FitOptions,
) -> Result<Clothoid, FitError> {
    let (_, phi) = chord(start, end)?;
    let theta0_rad = theta0.get::<radian>();
    let problem = StartCurvature {
        start: *start,
        theta0,
        end: *end,
        kappa0: kappa0.get::<radian_per_meter>(),
        options: *options,
    };

    // a circle tangent at the start turns twice the chord angle
    let guess = theta0_rad + 2.0 * wrapped(phi - theta0_rad);
    let theta1 = find_root(problem, guess, 0.05, options.heading_tolerance, options)?;
    trace!("forward end heading {theta1:.12}");

    let clothoid = fit_hermite(start, theta0, end, Angle::new::<radian>(theta1), options)?;
    let length = clothoid.length.get::<meter>();
    if length <= 0.0 {
        return Err(FitError::NonPositiveLength { length });
    }
    Ok(clothoid)
}
