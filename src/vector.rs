//! Three-component vector used for positions, velocities and forces.
//!
//! The simulation is planar, so most values keep `z == 0`, but the full
//! 3D algebra is available (cross products of planar vectors land on Z).

use crate::float::{Float, Real};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 3D vector over the scalar `F`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3<F: Float = Real> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Vector3<F> {
    /// Create a new vector.
    pub fn new(x: F, y: F, z: F) -> Self { Vector3 { x, y, z } }

    /// Create a planar vector (`z == 0`).
    pub fn new2(x: F, y: F) -> Self { Vector3 { x, y, z: F::zero() } }

    /// Zero vector.
    pub fn zero() -> Self { Vector3 { x: F::zero(), y: F::zero(), z: F::zero() } }

    /// Dot product.
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(self, other: Self) -> Self {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Squared length (avoids sqrt).
    pub fn square_magnitude(self) -> F {
        self.dot(self)
    }

    /// Length.
    pub fn magnitude(self) -> F {
        self.square_magnitude().sqrt()
    }

    /// Unit vector in the same direction. Returns the zero vector if the
    /// length is near zero.
    pub fn normalize(self) -> Self {
        let len = self.magnitude();
        if len.is_near_zero(F::epsilon()) {
            Self::zero()
        } else {
            self.scale(F::one() / len)
        }
    }

    /// Scale all components by a scalar.
    pub fn scale(self, s: F) -> Self {
        Vector3 { x: self.x * s, y: self.y * s, z: self.z * s }
    }

    /// `self + other * s`.
    pub fn add_scaled(self, other: Self, s: F) -> Self {
        self + other.scale(s)
    }

    /// Clockwise perpendicular in the XY plane: `(y, -x)`.
    ///
    /// For a ground normal pointing up this yields the forward (+X) tangent;
    /// for a segment direction running left to right it yields the normal
    /// pointing down, so callers negate it for an upward normal.
    pub fn perp(self) -> Self {
        Vector3 { x: self.y, y: -self.x, z: F::zero() }
    }

    /// Distance between two points.
    pub fn distance(self, other: Self) -> F {
        (self - other).magnitude()
    }

    /// True when every component is within `epsilon` of zero.
    pub fn is_near_zero(self, epsilon: F) -> bool {
        self.x.is_near_zero(epsilon) && self.y.is_near_zero(epsilon) && self.z.is_near_zero(epsilon)
    }
}

impl<F: Float> Add for Vector3<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Vector3 { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl<F: Float> Sub for Vector3<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Vector3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl<F: Float> Neg for Vector3<F> {
    type Output = Self;
    fn neg(self) -> Self { Vector3 { x: -self.x, y: -self.y, z: -self.z } }
}

impl<F: Float> Mul<F> for Vector3<F> {
    type Output = Self;
    fn mul(self, rhs: F) -> Self { self.scale(rhs) }
}

impl<F: Float> AddAssign for Vector3<F> {
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl<F: Float> SubAssign for Vector3<F> {
    fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}

impl<F: Float> MulAssign<F> for Vector3<F> {
    fn mul_assign(&mut self, rhs: F) { *self = self.scale(rhs); }
}
