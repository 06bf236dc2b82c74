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
//! The fluid engine: particle state, spring network, rigid bodies, and the
//! eight-stage integration pipeline
//!
//! # Algorithm
//!
//! Each call to [`FluidEngine::simulation_step`] runs eight ordered
//! sub-stages over the engine-owned state:
//!
//! 1. gravity impulse on every particle
//! 2. pairwise viscosity impulses (linear + quadratic in radial velocity)
//! 3. position update (with a snapshot of the previous position)
//! 4. plastic spring rest-length adjustment and pruning
//! 5. elastic spring position displacements
//! 6. double density relaxation (the pressure solve)
//! 7. collision resolution: walls, fixed spheres, movable spheres
//! 8. velocity reconstruction from net displacement
//!
//! The ordering is part of the contract: stages 5-7 displace positions
//! directly, and stage 8 folds those corrections back into velocity, so
//! reordering changes physical behavior. Neighbor sets are memoized for
//! the whole step and discarded at its end.
//!
//! # References
//!
//! - Clavet, S., Beaudoin, P., & Poulin, P. (2005). Particle-based
//!   viscoelastic fluid simulation. Proceedings of the 2005 ACM
//!   SIGGRAPH/Eurographics Symposium on Computer Animation, 219-228.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use crate::math::Vector;
use crate::neighbors::NeighborCache;
use crate::params::Parameters;
use crate::particle::Particle;
use crate::rigid::RigidSphere;
use crate::springs::{PairKey, SpringRegistry};

/// Input rejected at a mutator boundary
///
/// Invalid inputs are refused before they reach the collections; nothing
/// non-finite or degenerate is ever admitted into the simulation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    /// Position had a NaN or infinite component
    NonFinitePosition,
    /// Velocity had a NaN or infinite component
    NonFiniteVelocity,
    /// Radius was non-finite or not strictly positive
    InvalidRadius,
    /// Mass was non-finite or negative
    InvalidMass,
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInput::NonFinitePosition => write!(f, "position must be finite"),
            InvalidInput::NonFiniteVelocity => write!(f, "velocity must be finite"),
            InvalidInput::InvalidRadius => write!(f, "radius must be finite and positive"),
            InvalidInput::InvalidMass => write!(f, "mass must be finite and non-negative"),
        }
    }
}

impl Error for InvalidInput {}

/// Particle-based viscoelastic fluid solver, generic over dimensionality
///
/// The engine exclusively owns its particle list, rigid-sphere list, and
/// spring registry; consumers read them through borrowed slices between
/// steps. A step runs synchronously to completion — there is no partial
/// or re-entrant stepping.
///
/// # Example
///
/// ```
/// use fluid_engine::{FluidEngine2, math::Vector};
///
/// let mut engine = FluidEngine2::new();
/// engine.add_particle(Vector::new([150.0, 50.0])).unwrap();
/// engine.simulation_step();
/// assert_eq!(engine.particles().len(), 1);
/// ```
pub struct FluidEngine<const N: usize> {
    params: Parameters<N>,
    particles: Vec<Particle<N>>,
    spheres: Vec<RigidSphere<N>>,
    springs: SpringRegistry,
    neighbors: NeighborCache,
    /// Particle id -> index in `particles`; ids are never reused, indices
    /// shift only on `clear_particles`
    index_of: HashMap<u32, usize>,
    next_id: u32,
    steps: u64,
}

/// Two-dimensional fluid engine
pub type FluidEngine2 = FluidEngine<2>;
/// Three-dimensional fluid engine
pub type FluidEngine3 = FluidEngine<3>;

impl<const N: usize> Default for FluidEngine<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FluidEngine<N> {
    /// Create an empty engine with the default parameters for this
    /// dimensionality
    pub fn new() -> Self {
        Self::with_parameters(Parameters::default())
    }

    /// Create an empty engine with explicit parameters
    pub fn with_parameters(params: Parameters<N>) -> Self {
        FluidEngine {
            params,
            particles: Vec::new(),
            spheres: Vec::new(),
            springs: SpringRegistry::new(),
            neighbors: NeighborCache::new(),
            index_of: HashMap::new(),
            next_id: 0,
            steps: 0,
        }
    }

    /// Append a particle at rest; returns its id
    pub fn add_particle(&mut self, position: Vector<N>) -> Result<u32, InvalidInput> {
        self.add_particle_with_velocity(position, Vector::zero())
    }

    /// Append a particle with an initial velocity; returns its id
    pub fn add_particle_with_velocity(
        &mut self,
        position: Vector<N>,
        velocity: Vector<N>,
    ) -> Result<u32, InvalidInput> {
        if !position.is_finite() {
            return Err(InvalidInput::NonFinitePosition);
        }
        if !velocity.is_finite() {
            return Err(InvalidInput::NonFiniteVelocity);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.index_of.insert(id, self.particles.len());
        self.particles.push(Particle::with_velocity(id, position, velocity));
        Ok(id)
    }

    /// Append a fixed rigid sphere
    pub fn add_fixed_rigid_body(
        &mut self,
        center: Vector<N>,
        radius: f64,
    ) -> Result<(), InvalidInput> {
        if !center.is_finite() {
            return Err(InvalidInput::NonFinitePosition);
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(InvalidInput::InvalidRadius);
        }
        self.spheres.push(RigidSphere::fixed(center, radius));
        Ok(())
    }

    /// Append a movable rigid sphere with the given mass
    ///
    /// Zero mass is admitted; such a sphere simply never picks up fluid
    /// impulses (the division is guarded).
    pub fn add_movable_rigid_body(
        &mut self,
        center: Vector<N>,
        radius: f64,
        mass: f64,
    ) -> Result<(), InvalidInput> {
        if !center.is_finite() {
            return Err(InvalidInput::NonFinitePosition);
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(InvalidInput::InvalidRadius);
        }
        if !mass.is_finite() || mass < 0.0 {
            return Err(InvalidInput::InvalidMass);
        }
        self.spheres.push(RigidSphere::movable(center, radius, mass));
        Ok(())
    }

    /// Drop all particles and every spring referencing them
    ///
    /// Ids are not reset; a particle added afterwards continues the
    /// sequence, so old ids are never reused.
    pub fn clear_particles(&mut self) {
        self.particles.clear();
        self.index_of.clear();
        self.springs.clear();
        self.neighbors.reset(0);
    }

    /// Drop all rigid spheres
    pub fn clear_rigid_bodies(&mut self) {
        self.spheres.clear();
    }

    /// Read-only view of the particle collection
    pub fn particles(&self) -> &[Particle<N>] {
        &self.particles
    }

    /// Read-only view of the rigid-sphere collection
    pub fn rigid_spheres(&self) -> &[RigidSphere<N>] {
        &self.spheres
    }

    /// Current global parameters
    pub fn parameters(&self) -> &Parameters<N> {
        &self.params
    }

    /// Mutable access to the global parameters
    ///
    /// Changes take effect starting with the next step.
    pub fn parameters_mut(&mut self) -> &mut Parameters<N> {
        &mut self.params
    }

    /// Read-only view of the spring registry
    pub fn springs(&self) -> &SpringRegistry {
        &self.springs
    }

    /// Number of live springs
    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Number of completed simulation steps
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Whether every particle and sphere currently holds finite state
    ///
    /// A step never retries or clamps on its own; if this reports false
    /// the caller decides whether to halt, reset, or clear.
    pub fn is_state_finite(&self) -> bool {
        self.particles.iter().all(|p| p.is_finite())
            && self
                .spheres
                .iter()
                .all(|s| s.center.is_finite() && s.velocity.is_finite())
    }

    /// Advance the simulation by one frame
    ///
    /// Runs the eight pipeline stages in order, then invalidates the
    /// neighbor cache so the next step recomputes from fresh positions.
    pub fn simulation_step(&mut self) {
        self.neighbors.warm(&self.particles, self.params.h);

        self.apply_gravity();
        self.apply_viscosity();
        self.advance_positions();
        self.adjust_springs();
        self.apply_spring_displacements();
        self.double_density_relaxation();
        self.resolve_collisions();
        self.derive_velocities();

        // Invalidated at step end, not step start: stale sets cannot
        // silently survive into the next step's stages.
        self.neighbors.reset(self.particles.len());
        self.steps += 1;

        if !self.is_state_finite() {
            log::warn!(
                "non-finite particle or sphere state after step {}",
                self.steps
            );
        }
    }

    /// Stage 1: v += g * dt
    fn apply_gravity(&mut self) {
        let dv = self.params.gravity * self.params.dt;
        for p in &mut self.particles {
            p.velocity += dv;
        }
    }

    /// Stage 2: pairwise viscosity impulses
    ///
    /// Each unordered pair is visited exactly once through the
    /// `i.id < j.id` filter. Only approaching pairs (positive inward
    /// radial velocity) receive an impulse.
    fn apply_viscosity(&mut self) {
        let Parameters { h, dt, delta, beta, .. } = self.params;
        let particles = &mut self.particles;
        let neighbors = &mut self.neighbors;

        for i in 0..particles.len() {
            let list = neighbors.neighbors_of(i, particles, h);
            for &j in list {
                if particles[j].id <= particles[i].id {
                    continue;
                }
                let r_ij = particles[i].position - particles[j].position;
                let q = r_ij.norm() / h;
                if q >= 1.0 {
                    continue;
                }
                let r_hat = r_ij.normalized();
                let u = (particles[i].velocity - particles[j].velocity).dot(&r_hat);
                if u > 0.0 {
                    let impulse = r_hat * (dt * (1.0 - q) * (delta * u + beta * u * u));
                    let half = impulse * 0.5;
                    particles[i].velocity -= half;
                    particles[j].velocity += half;
                }
            }
        }
    }

    /// Stage 3: snapshot previous position, then x += v * dt
    fn advance_positions(&mut self) {
        let dt = self.params.dt;
        for p in &mut self.particles {
            p.previous_position = p.position;
            p.position += p.velocity * dt;
        }
    }

    /// Stage 4: plastic rest-length adjustment
    ///
    /// Deformation beyond the yield tolerance `d = yield_ratio * L`
    /// permanently adapts the rest length toward the running separation
    /// at rate `dt * alpha`. Springs whose rest length grows past `h`
    /// are dropped afterwards.
    fn adjust_springs(&mut self) {
        let Parameters { h, dt, alpha, yield_ratio, .. } = self.params;
        let particles = &self.particles;
        let neighbors = &mut self.neighbors;
        let springs = &mut self.springs;

        for i in 0..particles.len() {
            let list = neighbors.neighbors_of(i, particles, h);
            for &j in list {
                if particles[j].id <= particles[i].id {
                    continue;
                }
                let r = particles[i].position.distance(&particles[j].position);
                if r / h >= 1.0 {
                    continue;
                }
                let key = PairKey::new(particles[i].id, particles[j].id);
                let rest = springs.ensure(key, h);
                let d = yield_ratio * rest;
                if r > rest + d {
                    // Plastic stretch toward the separation
                    springs.set_rest_length(key, rest + dt * alpha * (r - rest - d));
                } else if r < rest - d {
                    // Plastic compression toward the separation
                    springs.set_rest_length(key, rest - dt * alpha * (rest - d - r));
                }
            }
        }

        springs.prune_longer_than(h);
    }

    /// Stage 5: elastic spring displacements
    fn apply_spring_displacements(&mut self) {
        let Parameters { h, dt, spring_stiffness, .. } = self.params;

        let entries: Vec<(PairKey, f64)> = self.springs.iter().collect();
        for (key, rest) in entries {
            // Endpoints may be gone after an external clear; the registry
            // is purged there, so both lookups are expected to succeed.
            let (Some(&i), Some(&j)) = (
                self.index_of.get(&key.first()),
                self.index_of.get(&key.second()),
            ) else {
                continue;
            };
            let r_ij = self.particles[i].position - self.particles[j].position;
            let displacement = r_ij.normalized()
                * (dt * dt * spring_stiffness * (1.0 - rest / h) * (rest - r_ij.norm()));
            let half = displacement * 0.5;
            self.particles[i].position -= half;
            self.particles[j].position += half;
        }
    }

    /// Stage 6: double density relaxation — the pressure solve
    ///
    /// Density and near-density are accumulated over the memoized
    /// neighbor set (self included, contributing the constant q = 0
    /// term), then each neighbor is pushed out along the separation and
    /// the particle takes the opposite displacement. Positions are
    /// displaced directly; velocities pick the correction up in stage 8.
    /// The stored pressure is for external consumption only.
    fn double_density_relaxation(&mut self) {
        let Parameters { h, dt, rest_density, stiffness, stiffness_near, .. } = self.params;
        let particles = &mut self.particles;
        let neighbors = &mut self.neighbors;

        for i in 0..particles.len() {
            let list = neighbors.neighbors_of(i, particles, h);

            let mut rho = 0.0;
            let mut rho_near = 0.0;
            for &j in list {
                let q = particles[j].position.distance(&particles[i].position) / h;
                if q < 1.0 {
                    rho += (1.0 - q) * (1.0 - q);
                    rho_near += (1.0 - q) * (1.0 - q) * (1.0 - q);
                }
            }
            let pressure = stiffness * (rho - rest_density);
            let pressure_near = stiffness_near * rho_near;

            let mut dx = Vector::zero();
            for &j in list {
                if j == i {
                    continue;
                }
                let r_ij = particles[j].position - particles[i].position;
                let q = r_ij.norm() / h;
                if q >= 1.0 {
                    continue;
                }
                let push = r_ij.normalized()
                    * (dt
                        * dt
                        * (pressure * (1.0 - q) + pressure_near * (1.0 - q) * (1.0 - q)));
                let half = push * 0.5;
                particles[j].position += half;
                dx -= half;
            }
            particles[i].position += dx;
            particles[i].pressure = pressure;
        }
    }

    /// Stage 7: walls, fixed spheres, movable spheres — in that order
    fn resolve_collisions(&mut self) {
        self.resolve_wall_collisions();
        self.resolve_fixed_spheres();
        self.resolve_movable_spheres();
    }

    /// Stage 7a: clamp particles onto the domain boundary
    ///
    /// The clamp is per axis; when a corner violates two axes at once
    /// the impulse uses the normal of the last violated axis.
    fn resolve_wall_collisions(&mut self) {
        let extent = self.params.extent;
        let friction = self.params.wall_friction;

        for p in &mut self.particles {
            let mut normal: Option<Vector<N>> = None;
            for axis in 0..N {
                if p.position[axis] < 0.0 {
                    p.position[axis] = 0.0;
                    let mut n = Vector::zero();
                    n[axis] = 1.0;
                    normal = Some(n);
                }
            }
            for axis in 0..N {
                if p.position[axis] > extent[axis] {
                    p.position[axis] = extent[axis];
                    let mut n = Vector::zero();
                    n[axis] = -1.0;
                    normal = Some(n);
                }
            }
            if let Some(n_hat) = normal {
                let v_normal = n_hat * p.velocity.dot(&n_hat);
                let v_tangent = p.velocity - v_normal;
                p.velocity += v_normal - v_tangent * friction;
            }
        }
    }

    /// Stage 7b: push particles out of fixed spheres
    fn resolve_fixed_spheres(&mut self) {
        let friction = self.params.rigid_friction;
        for si in 0..self.spheres.len() {
            if self.spheres[si].movable {
                continue;
            }
            let sphere = self.spheres[si];
            for p in &mut self.particles {
                if sphere.contains(&p.position) {
                    p.velocity += collision_impulse(&sphere, p, friction);
                    p.position = sphere.project_to_surface(&p.position);
                }
            }
        }
    }

    /// Stage 7c: integrate movable spheres and couple them to the fluid
    ///
    /// The sphere advances under gravity first, gathers the net reaction
    /// impulse of every enclosed particle, is clamped against the walls
    /// with the hard velocity-damping response, and only then re-resolves
    /// the enclosed particles against its updated state.
    fn resolve_movable_spheres(&mut self) {
        let Parameters { dt, gravity, extent, rigid_friction, sphere_wall_damping, .. } =
            self.params;

        for si in 0..self.spheres.len() {
            if !self.spheres[si].movable {
                continue;
            }
            let mut sphere = self.spheres[si];

            sphere.previous_center = sphere.center;
            sphere.velocity += gravity * dt;
            sphere.center += sphere.velocity * dt;

            let mut net_impulse = Vector::zero();
            for p in &self.particles {
                if sphere.contains(&p.position) {
                    net_impulse += collision_impulse(&sphere, p, rigid_friction);
                }
            }
            // Zero-mass spheres never pick up fluid impulses
            if sphere.mass > 0.0 {
                sphere.velocity += net_impulse / sphere.mass;
            }

            let mut hit_wall = false;
            for axis in 0..N {
                if sphere.center[axis] - sphere.radius < 0.0 {
                    sphere.center[axis] = sphere.radius;
                    hit_wall = true;
                }
                if sphere.center[axis] + sphere.radius > extent[axis] {
                    sphere.center[axis] = extent[axis] - sphere.radius;
                    hit_wall = true;
                }
            }
            if hit_wall {
                // Hard damping in place of the reflect/friction impulse;
                // see the settling tests before changing this.
                sphere.velocity = sphere.velocity * sphere_wall_damping;
            }

            for p in &mut self.particles {
                if sphere.contains(&p.position) {
                    p.velocity += collision_impulse(&sphere, p, rigid_friction);
                    p.position = sphere.project_to_surface(&p.position);
                }
            }

            self.spheres[si] = sphere;
        }
    }

    /// Stage 8: v = (x - x_prev) / dt
    ///
    /// The velocity carried into the next step is implied by the actual
    /// displacement after all positional corrections, not the velocity
    /// accumulated mid-step.
    fn derive_velocities(&mut self) {
        let dt = self.params.dt;
        for p in &mut self.particles {
            p.velocity = (p.position - p.previous_position) / dt;
        }
    }
}

/// Collision impulse of a sphere on a particle found inside it
///
/// Projects the relative velocity onto the outward surface normal;
/// the tangential part is damped by the rigid friction coefficient.
fn collision_impulse<const N: usize>(
    sphere: &RigidSphere<N>,
    particle: &Particle<N>,
    friction: f64,
) -> Vector<N> {
    let v_rel = particle.velocity - sphere.velocity;
    let n_hat = sphere.surface_normal(&particle.position);
    let v_normal = n_hat * v_rel.dot(&n_hat);
    let v_tangent = v_rel - v_normal;
    v_normal - v_tangent * friction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_and_never_reused() {
        let mut engine = FluidEngine2::new();
        assert_eq!(engine.add_particle(Vector::new([10.0, 10.0])).unwrap(), 0);
        assert_eq!(engine.add_particle(Vector::new([20.0, 10.0])).unwrap(), 1);

        engine.clear_particles();
        assert!(engine.particles().is_empty());
        // Ids continue after a clear
        assert_eq!(engine.add_particle(Vector::new([10.0, 10.0])).unwrap(), 2);
    }

    #[test]
    fn test_mutators_reject_invalid_input() {
        let mut engine = FluidEngine2::new();
        assert_eq!(
            engine.add_particle(Vector::new([f64::NAN, 0.0])),
            Err(InvalidInput::NonFinitePosition)
        );
        assert_eq!(
            engine.add_particle_with_velocity(
                Vector::new([1.0, 1.0]),
                Vector::new([f64::INFINITY, 0.0])
            ),
            Err(InvalidInput::NonFiniteVelocity)
        );
        assert_eq!(
            engine.add_fixed_rigid_body(Vector::new([1.0, 1.0]), -3.0),
            Err(InvalidInput::InvalidRadius)
        );
        assert_eq!(
            engine.add_movable_rigid_body(Vector::new([1.0, 1.0]), 5.0, f64::NAN),
            Err(InvalidInput::InvalidMass)
        );
        assert!(engine.particles().is_empty());
        assert!(engine.rigid_spheres().is_empty());
    }

    #[test]
    fn test_single_particle_free_fall() {
        // One particle, no neighbors: only gravity, position update, and
        // velocity reconstruction act on it.
        let mut engine = FluidEngine2::new();
        engine.add_particle(Vector::new([150.0, 50.0])).unwrap();
        let (g, dt) = (engine.parameters().gravity, engine.parameters().dt);

        engine.simulation_step();

        let p = &engine.particles()[0];
        let expected_v = g * dt;
        assert!((p.velocity - expected_v).norm() < 1e-12);
        assert!((p.position - (Vector::new([150.0, 50.0]) + expected_v * dt)).norm() < 1e-12);
        assert_eq!(p.previous_position, Vector::new([150.0, 50.0]));
    }

    #[test]
    fn test_close_pair_forms_spring() {
        let mut engine = FluidEngine2::new();
        engine.parameters_mut().gravity = Vector::zero();
        engine.add_particle(Vector::new([100.0, 100.0])).unwrap();
        engine.add_particle(Vector::new([110.0, 100.0])).unwrap();

        engine.simulation_step();
        assert_eq!(engine.spring_count(), 1);
    }

    #[test]
    fn test_distant_pair_forms_no_spring() {
        let mut engine = FluidEngine2::new();
        engine.parameters_mut().gravity = Vector::zero();
        engine.add_particle(Vector::new([50.0, 100.0])).unwrap();
        engine.add_particle(Vector::new([200.0, 100.0])).unwrap();

        engine.simulation_step();
        assert_eq!(engine.spring_count(), 0);
    }

    #[test]
    fn test_clear_particles_purges_springs() {
        let mut engine = FluidEngine2::new();
        engine.parameters_mut().gravity = Vector::zero();
        engine.add_particle(Vector::new([100.0, 100.0])).unwrap();
        engine.add_particle(Vector::new([110.0, 100.0])).unwrap();
        engine.simulation_step();
        assert_eq!(engine.spring_count(), 1);

        engine.clear_particles();
        assert_eq!(engine.spring_count(), 0);
    }

    #[test]
    fn test_pressure_is_written_each_step() {
        let mut engine = FluidEngine2::new();
        engine.parameters_mut().gravity = Vector::zero();
        for x in 0..4 {
            for y in 0..4 {
                engine
                    .add_particle(Vector::new([100.0 + 5.0 * x as f64, 100.0 + 5.0 * y as f64]))
                    .unwrap();
            }
        }
        engine.simulation_step();
        // A dense block sits above rest density somewhere; pressures must
        // have moved off their initial zero.
        assert!(engine.particles().iter().any(|p| p.pressure != 0.0));
    }

    #[test]
    fn test_step_count_advances() {
        let mut engine = FluidEngine3::new();
        engine.simulation_step();
        engine.simulation_step();
        assert_eq!(engine.step_count(), 2);
    }
}
