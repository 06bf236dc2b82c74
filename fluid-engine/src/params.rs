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
//! Global simulation parameters
//!
//! Parameters split into two groups. The driver-facing knobs — gravity,
//! plasticity `alpha`, and the viscosity coefficients — may change between
//! any two steps and take effect with the next step. The remaining
//! coefficients (interaction radius, timestep, pressure and spring
//! stiffness, yield ratio, friction) are solver constants tuned per
//! dimensionality; they are public fields but have no percentage mapping.
//!
//! The defaults differ between 2D and 3D because the preset scenes use
//! different spatial scales: a 300-unit square box with `h = 20` in 2D
//! versus a 200x600x200 box with `h = 65` in 3D.

use crate::math::Vector;

/// Upper end of the driver-controlled gravity magnitude range
pub const GRAVITY_MAX: f64 = 0.1;
/// Upper end of the driver-controlled plasticity range
pub const PLASTICITY_MAX: f64 = 2.0;
/// Upper end of the driver-controlled quadratic-viscosity range
pub const VISCOSITY_MAX: f64 = 1.2;

/// Global parameters of a [`FluidEngine`](crate::FluidEngine)
#[derive(Debug, Clone, Copy)]
pub struct Parameters<const N: usize> {
    /// Gravity acceleration applied to particles and movable spheres
    pub gravity: Vector<N>,
    /// Plasticity constant: rate of permanent rest-length adaptation
    pub alpha: f64,
    /// Viscosity's quadratic dependence on inward radial velocity
    pub delta: f64,
    /// Viscosity's linear dependence on inward radial velocity
    pub beta: f64,
    /// Interaction radius; pairs farther apart exert no direct force
    pub h: f64,
    /// Integration timestep
    pub dt: f64,
    /// Domain box extent per axis; particles live in `[0, extent]`
    pub extent: Vector<N>,
    /// Rest density the relaxation stage drives toward
    pub rest_density: f64,
    /// Pressure-density linear coefficient
    pub stiffness: f64,
    /// Near-pressure near-density linear coefficient
    pub stiffness_near: f64,
    /// Spring elasticity coefficient
    pub spring_stiffness: f64,
    /// Fraction of rest length tolerated before plastic flow
    pub yield_ratio: f64,
    /// Friction coefficient for wall contacts
    pub wall_friction: f64,
    /// Friction coefficient for rigid-sphere contacts
    pub rigid_friction: f64,
    /// Velocity factor applied to a movable sphere on wall contact
    ///
    /// The wall response hard-damps the sphere's velocity by this factor
    /// instead of applying the reflect/friction impulse.
    pub sphere_wall_damping: f64,
}

impl<const N: usize> Default for Parameters<N> {
    fn default() -> Self {
        let mut gravity = Vector::zero();
        let mut extent = Vector::zero();
        // Reference scales per dimensionality; the y axis points down.
        let (g_y, h, dt, beta) = match N {
            2 => (0.03, 20.0, 2.0, 0.01),
            _ => (0.01, 65.0, 3.0, 0.1),
        };
        gravity[1] = g_y;
        match N {
            2 => {
                extent[0] = 300.0;
                extent[1] = 300.0;
            }
            _ => {
                extent[0] = 200.0;
                extent[1] = 600.0;
                extent[2] = 200.0;
            }
        }
        Parameters {
            gravity,
            alpha: 0.3,
            delta: 0.0,
            beta,
            h,
            dt,
            extent,
            rest_density: 10.0,
            stiffness: 0.01,
            stiffness_near: 0.01,
            spring_stiffness: 0.3,
            yield_ratio: 0.15,
            wall_friction: 0.5,
            rigid_friction: 0.0,
            sphere_wall_damping: -0.2,
        }
    }
}

impl<const N: usize> Parameters<N> {
    /// Set gravity from a control fraction in `[0, 1]`
    ///
    /// Maps linearly onto a downward (+y) acceleration of magnitude
    /// `fraction * GRAVITY_MAX`. A negative sign on `fraction` inverts
    /// the direction. Out-of-range magnitudes are clamped.
    pub fn set_gravity_fraction(&mut self, fraction: f64) {
        let f = fraction.clamp(-1.0, 1.0);
        let mut gravity = Vector::zero();
        gravity[1] = f * GRAVITY_MAX;
        self.gravity = gravity;
    }

    /// Set plasticity `alpha` from a control fraction in `[0, 1]`
    ///
    /// Maps linearly onto `[0, PLASTICITY_MAX]`. Clamped.
    pub fn set_plasticity_fraction(&mut self, fraction: f64) {
        self.alpha = fraction.clamp(0.0, 1.0) * PLASTICITY_MAX;
    }

    /// Set quadratic viscosity `delta` from a control fraction in `[0, 1]`
    ///
    /// Uses a square-root response curve onto `[0, VISCOSITY_MAX]` so the
    /// low end of the control has finer resolution. Clamped.
    pub fn set_viscosity_fraction(&mut self, fraction: f64) {
        self.delta = fraction.clamp(0.0, 1.0).sqrt() * VISCOSITY_MAX;
    }
}
