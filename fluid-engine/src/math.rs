// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Fixed-dimension vector arithmetic
//!
//! The solver is generic over the spatial dimension, fixed at compile time
//! to 2 or 3 components. `Vector<N>` wraps a `[f64; N]` and provides the
//! small set of operations the integration pipeline needs: add, subtract,
//! scale, dot product, norms, and a zero-guarded normalize.
//!
//! Normalizing a zero-length vector returns the zero vector rather than
//! propagating NaN; coincident particles are a normal runtime condition
//! and must contribute nothing, not poison the state.

use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// An N-dimensional vector with double-precision components
///
/// # Examples
///
/// ```
/// use fluid_engine::math::Vector;
///
/// let a = Vector::new([3.0, 4.0]);
/// assert_eq!(a.norm(), 5.0);
/// assert_eq!((a * 2.0)[0], 6.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<const N: usize>([f64; N]);

/// Two-dimensional vector
pub type Vector2 = Vector<2>;
/// Three-dimensional vector
pub type Vector3 = Vector<3>;

impl<const N: usize> Vector<N> {
    /// Create a vector from its components
    pub const fn new(components: [f64; N]) -> Self {
        Vector(components)
    }

    /// The zero vector
    pub const fn zero() -> Self {
        Vector([0.0; N])
    }

    /// Get the components as an array
    pub const fn as_array(&self) -> [f64; N] {
        self.0
    }

    /// Dot product with another vector
    pub fn dot(&self, other: &Self) -> f64 {
        let mut sum = 0.0;
        for i in 0..N {
            sum += self.0[i] * other.0[i];
        }
        sum
    }

    /// Squared Euclidean norm
    pub fn norm_sq(&self) -> f64 {
        self.dot(self)
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// Euclidean distance to another vector
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).norm()
    }

    /// Unit vector in the same direction
    ///
    /// A zero-length vector normalizes to the zero vector so that
    /// degenerate separations contribute nothing downstream.
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm == 0.0 {
            Vector::zero()
        } else {
            *self / norm
        }
    }

    /// Check that every component is finite (not NaN or infinite)
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Vector::zero()
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        &self.0[axis]
    }
}

impl<const N: usize> IndexMut<usize> for Vector<N> {
    fn index_mut(&mut self, axis: usize) -> &mut f64 {
        &mut self.0[axis]
    }
}

impl<const N: usize> Add for Vector<N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<const N: usize> AddAssign for Vector<N> {
    fn add_assign(&mut self, rhs: Self) {
        for i in 0..N {
            self.0[i] += rhs.0[i];
        }
    }
}

impl<const N: usize> Sub for Vector<N> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<const N: usize> SubAssign for Vector<N> {
    fn sub_assign(&mut self, rhs: Self) {
        for i in 0..N {
            self.0[i] -= rhs.0[i];
        }
    }
}

impl<const N: usize> Mul<f64> for Vector<N> {
    type Output = Self;

    fn mul(mut self, rhs: f64) -> Self {
        for i in 0..N {
            self.0[i] *= rhs;
        }
        self
    }
}

impl<const N: usize> Div<f64> for Vector<N> {
    type Output = Self;

    fn div(mut self, rhs: f64) -> Self {
        for i in 0..N {
            self.0[i] /= rhs;
        }
        self
    }
}

impl<const N: usize> Neg for Vector<N> {
    type Output = Self;

    fn neg(self) -> Self {
        self * -1.0
    }
}
