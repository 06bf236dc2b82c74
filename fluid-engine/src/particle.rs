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
//! Fluid particle state
//!
//! A particle carries position, velocity, and a per-step derived pressure.
//! `previous_position` snapshots the position at the start of the step's
//! position-update stage; the final stage reconstructs velocity from the
//! actual displacement after all positional corrections have been applied.

use crate::math::Vector;

/// A single fluid particle
///
/// Particles are created only through [`FluidEngine`](crate::FluidEngine)
/// mutators, which assign ids sequentially. Ids are unique for the life of
/// the engine and are never reused, so they can serve as stable keys for
/// the spring registry.
#[derive(Debug, Clone, Copy)]
pub struct Particle<const N: usize> {
    /// Unique, monotonically increasing id assigned at creation
    pub id: u32,
    /// Current position
    pub position: Vector<N>,
    /// Position at the start of this step's position update
    pub previous_position: Vector<N>,
    /// Current velocity
    pub velocity: Vector<N>,
    /// Pressure from the last density-relaxation stage
    ///
    /// Recomputed every step; only meaningful after the relaxation stage
    /// has run within the current step. Exposed for consumers such as
    /// pressure-based color mapping, unused internally afterwards.
    pub pressure: f64,
}

impl<const N: usize> Particle<N> {
    /// Create a particle at rest at the given position
    pub fn new(id: u32, position: Vector<N>) -> Self {
        Particle {
            id,
            position,
            previous_position: Vector::zero(),
            velocity: Vector::zero(),
            pressure: 0.0,
        }
    }

    /// Create a particle with an initial velocity
    pub fn with_velocity(id: u32, position: Vector<N>, velocity: Vector<N>) -> Self {
        Particle {
            velocity,
            ..Particle::new(id, position)
        }
    }

    /// Check that position and velocity are finite
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_creation() {
        let p = Particle::new(7, Vector::new([1.0, 2.0]));
        assert_eq!(p.id, 7);
        assert_eq!(p.position, Vector::new([1.0, 2.0]));
        assert_eq!(p.velocity, Vector::zero());
        assert_eq!(p.pressure, 0.0);
    }

    #[test]
    fn test_particle_with_velocity() {
        let p = Particle::with_velocity(0, Vector::new([0.0, 0.0]), Vector::new([0.0, -3.0]));
        assert_eq!(p.velocity, Vector::new([0.0, -3.0]));
    }

    #[test]
    fn test_particle_finiteness() {
        let mut p = Particle::new(0, Vector::new([1.0, 1.0]));
        assert!(p.is_finite());
        p.velocity = Vector::new([f64::NAN, 0.0]);
        assert!(!p.is_finite());
    }
}
