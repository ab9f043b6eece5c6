use core::ops::{Add, Mul, Sub};

use super::*;

/// The Point trait is the only interface on which the curve types rely.
///
/// DIM makes the memory layout of the implementing type known to the library.
pub trait Point:
    Add<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Mul<NativeFloat, Output = Self>
    + Copy
    + PartialEq
    + Default
{
    const DIM: usize;

    /// Component along axis, e.g. [0, 1, 2] -> [x, y, z]
    /// Panics if index is greater than implementors dimension
    fn axis(&self, index: usize) -> NativeFloat;

    fn dot(&self, other: &Self) -> NativeFloat {
        let mut sum: NativeFloat = 0.0;
        for i in 0..Self::DIM {
            sum += self.axis(i) * other.axis(i);
        }
        sum
    }

    /// squared L2-Norm of the Point interpreted as a Vector
    fn squared_length(&self) -> NativeFloat {
        self.dot(self)
    }

    fn distance(&self, b: &Self) -> NativeFloat {
        sqrt((*self - *b).squared_length())
    }
}

/// Newtype over an array of N coordinates
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointN<const N: usize>([NativeFloat; N]);

impl<const N: usize> PointN<N> {
    pub fn new(array: [NativeFloat; N]) -> Self {
        PointN(array)
    }

    pub fn as_array(&self) -> [NativeFloat; N] {
        self.0
    }
}

impl PointN<2> {
    pub fn xy(x: NativeFloat, y: NativeFloat) -> Self {
        PointN([x, y])
    }

    pub fn x(&self) -> NativeFloat {
        self.0[0]
    }

    pub fn y(&self) -> NativeFloat {
        self.0[1]
    }
}

impl<const N: usize> Default for PointN<N> {
    fn default() -> Self {
        PointN([0.0; N])
    }
}

impl<const N: usize> Add for PointN<N> {
    type Output = Self;

    fn add(self, other: PointN<N>) -> PointN<N> {
        let mut res = self;
        for i in 0..N {
            res.0[i] += other.0[i];
        }
        res
    }
}

impl<const N: usize> Sub for PointN<N> {
    type Output = Self;

    fn sub(self, other: PointN<N>) -> PointN<N> {
        let mut res = self;
        for i in 0..N {
            res.0[i] -= other.0[i];
        }
        res
    }
}

impl<const N: usize> Mul<NativeFloat> for PointN<N> {
    type Output = PointN<N>;

    fn mul(self, rhs: NativeFloat) -> PointN<N> {
        let mut res = self;
        for v in res.0.iter_mut() {
            *v *= rhs;
        }
        res
    }
}

impl<const N: usize> Point for PointN<N> {
    const DIM: usize = N;

    fn axis(&self, index: usize) -> NativeFloat {
        assert!(index < N);
        self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_test() {
        let a = PointN::new([0.0, 0.0]);
        let b = PointN::new([1.0, 1.0]);
        assert_eq!(a.distance(&b), sqrt(2.0));
    }

    #[test]
    fn dot_and_ops() {
        let a = PointN::xy(1.0, 2.0);
        let b = PointN::xy(-3.0, 0.5);
        assert_eq!(a.dot(&b), -2.0);
        assert_eq!((a + b * 2.0).as_array(), [-5.0, 3.0]);
        assert_eq!((a - b).y(), 1.5);
    }
}
