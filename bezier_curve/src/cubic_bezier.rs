// Adapted from stroke cubic_bezier
use super::point::Point;
use super::quadratic_bezier::QuadraticBezier;
use super::*;

/// the first levels are always subdivided so symmetric curves can't fool the error estimate
const MIN_LEVEL: u8 = 3;
const MAX_LEVEL: u8 = 14;

/// A cubic Bezier curve defined by four points: the starting point, two successive control points and the ending point.
///
/// The curve is defined by equation
/// : ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * start + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * end```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicBezier<P, const PDIM: usize> {
    pub start: P,
    pub ctrl1: P,
    pub ctrl2: P,
    pub end: P,
}

impl<P, const PDIM: usize> CubicBezier<P, PDIM>
where
    P: Point,
{
    pub fn new(start: P, ctrl1: P, ctrl2: P, end: P) -> Self {
        CubicBezier {
            start,
            ctrl1,
            ctrl2,
            end,
        }
    }

    /// The derivative is also a bezier curve but of degree n-1 (cubic->quadratic)
    pub fn derivative(&self) -> QuadraticBezier<P, PDIM> {
        QuadraticBezier {
            start: (self.ctrl1 - self.start) * 3.0,
            ctrl: (self.ctrl2 - self.ctrl1) * 3.0,
            end: (self.end - self.ctrl2) * 3.0,
        }
    }

    /// magnitude of the derivative, the arc length integrand
    pub fn speed(&self, t: NativeFloat) -> NativeFloat {
        sqrt(self.derivative().eval(t).squared_length())
    }

    /// Coefficients [a, b, c, d] of the power basis form a + b * t + c * t² + d * t³
    pub fn polynomial_coefficients(&self) -> [P; 4] {
        let a = self.start;
        let b = (self.ctrl1 - self.start) * 3.0;
        let c = (self.start - self.ctrl1 * 2.0 + self.ctrl2) * 3.0;
        let d = self.end - self.start + (self.ctrl1 - self.ctrl2) * 3.0;
        [a, b, c, d]
    }

    fn simpson(&self, t0: NativeFloat, t1: NativeFloat) -> NativeFloat {
        let mid = 0.5 * (t0 + t1);
        (t1 - t0) / 6.0 * (self.speed(t0) + 4.0 * self.speed(mid) + self.speed(t1))
    }

    /// adaptive Simpson, halving the tolerance with every subdivision
    fn recurse(
        &self,
        t0: NativeFloat,
        t1: NativeFloat,
        whole: NativeFloat,
        tolerance: NativeFloat,
        level: u8,
    ) -> NativeFloat {
        let mid = 0.5 * (t0 + t1);
        let left = self.simpson(t0, mid);
        let right = self.simpson(mid, t1);
        let delta = left + right - whole;
        let in_tolerance = delta.abs() <= 15.0 * tolerance;
        if (in_tolerance && level >= MIN_LEVEL) || level >= MAX_LEVEL {
            return left + right + delta / 15.0;
        }
        self.recurse(t0, mid, left, 0.5 * tolerance, level + 1)
            + self.recurse(mid, t1, right, 0.5 * tolerance, level + 1)
    }

    /// arc length between two parametric t values by integrating the speed
    pub fn arclen_between(
        &self,
        t0: NativeFloat,
        t1: NativeFloat,
        tolerance: NativeFloat,
    ) -> NativeFloat {
        if t1 <= t0 {
            return 0.0;
        }
        self.recurse(t0, t1, self.simpson(t0, t1), tolerance, 0)
    }

    /// Fill `table` with the arc length from the start to parametric t values evenly spaced
    /// over [0, 1], the last entry is the length of the whole curve
    pub fn arclen_table(&self, table: &mut [NativeFloat], tolerance: NativeFloat) {
        let num = table.len();
        if num == 0 {
            return;
        }
        table[0] = 0.0;
        if num == 1 {
            return;
        }
        let step = 1.0 / ((num - 1) as NativeFloat);
        let mut cumulative = 0.0;
        for i in 1..num {
            let t0 = (i - 1) as NativeFloat * step;
            let t1 = if i == num - 1 {
                1.0
            } else {
                i as NativeFloat * step
            };
            cumulative += self.arclen_between(t0, t1, tolerance);
            table[i] = cumulative;
        }
    }
}
