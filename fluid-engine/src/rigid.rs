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
//! Rigid spherical obstacles
//!
//! A rigid sphere either passively excludes particles (fixed) or exchanges
//! momentum with them and falls under gravity (movable). Movable spheres
//! additionally carry mass and velocity and are clamped against the domain
//! walls by the collision stage.

use crate::math::Vector;

/// A rigid spherical obstacle, fixed or movable
///
/// Fixed spheres never move and never receive impulses; their center and
/// radius are immutable inputs. Movable spheres are integrated by the
/// collision-resolution stage: gravity, the accumulated reaction impulse
/// of every enclosed particle, and a damped wall-bounce response.
#[derive(Debug, Clone, Copy)]
pub struct RigidSphere<const N: usize> {
    /// Current center
    pub center: Vector<N>,
    /// Center at the start of this step's rigid-body advance
    pub previous_center: Vector<N>,
    /// Sphere radius
    pub radius: f64,
    /// Mass; only meaningful for movable spheres
    pub mass: f64,
    /// Whether the sphere moves under gravity and fluid impulses
    pub movable: bool,
    /// Current velocity; stays zero for fixed spheres
    pub velocity: Vector<N>,
}

impl<const N: usize> RigidSphere<N> {
    /// Create a fixed (immovable) sphere
    pub fn fixed(center: Vector<N>, radius: f64) -> Self {
        RigidSphere {
            center,
            previous_center: center,
            radius,
            mass: 0.0,
            movable: false,
            velocity: Vector::zero(),
        }
    }

    /// Create a movable sphere with the given mass
    pub fn movable(center: Vector<N>, radius: f64, mass: f64) -> Self {
        RigidSphere {
            mass,
            movable: true,
            ..RigidSphere::fixed(center, radius)
        }
    }

    /// Whether a point lies strictly inside the sphere
    pub fn contains(&self, point: &Vector<N>) -> bool {
        self.center.distance(point) < self.radius
    }

    /// Outward unit normal at (or toward) the given point
    ///
    /// A point coincident with the center yields the zero vector.
    pub fn surface_normal(&self, point: &Vector<N>) -> Vector<N> {
        (*point - self.center).normalized()
    }

    /// Closest surface point along the outward normal through `point`
    pub fn project_to_surface(&self, point: &Vector<N>) -> Vector<N> {
        self.center + self.surface_normal(point) * self.radius
    }
}
