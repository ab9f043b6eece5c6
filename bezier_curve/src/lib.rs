/*!
Cubic bezier curves over a small Point trait, with the derivative curve, power basis
coefficients and arc length by adaptive quadrature.

Adapted from the stroke crate
*/
#![no_std]

pub mod f64 {
    pub type NativeFloat = f64;

    use libm::sqrt;

    pub mod cubic_bezier {
        include!("cubic_bezier.rs");
    }
    pub mod quadratic_bezier {
        include!("quadratic_bezier.rs");
    }

    // Traits
    pub mod point {
        include!("point.rs");
    }

    pub use cubic_bezier::CubicBezier;
    pub use point::Point;
    pub use point::PointN;
    pub use quadratic_bezier::QuadraticBezier;
}
