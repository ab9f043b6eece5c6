use super::point::Point;
use super::*;

/// A quadratic bezier, the derivative of a cubic
///
/// : ```∀ t ∈ [0..1],  P(t) = (1 - t)² * start + 2 * (1 - t) * t * ctrl + t² * end```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadraticBezier<P, const PDIM: usize> {
    pub start: P,
    pub ctrl: P,
    pub end: P,
}

impl<P, const PDIM: usize> QuadraticBezier<P, PDIM>
where
    P: Point,
{
    pub fn eval(&self, t: NativeFloat) -> P {
        let one_t = -t + 1.0;
        self.start * (one_t * one_t) + self.ctrl * (2.0 * one_t * t) + self.end * (t * t)
    }
}

#[cfg(test)]
mod tests {
    use super::super::point::PointN;
    use super::*;

    #[test]
    fn eval_ends_and_middle() {
        let q = QuadraticBezier::<_, 2> {
            start: PointN::xy(0.0, 0.0),
            ctrl: PointN::xy(1.0, 2.0),
            end: PointN::xy(2.0, 0.0),
        };
        assert_eq!(q.eval(0.0), PointN::xy(0.0, 0.0));
        assert_eq!(q.eval(1.0), PointN::xy(2.0, 0.0));
        assert_eq!(q.eval(0.5), PointN::xy(1.0, 1.0));
    }
}
