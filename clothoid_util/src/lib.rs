//! Fitting clothoids to boundary conditions, std only

pub mod fit;

pub use fit::{fit_forward, fit_hermite, FitError, FitOptions};
