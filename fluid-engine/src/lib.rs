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
//! # Fluid Engine
//!
//! A particle-based viscoelastic fluid solver with two-way rigid-sphere
//! coupling, implemented once and generic over the spatial dimension
//! (2D and 3D share the algorithm; only domain bounds differ).
//!
//! ## Features
//!
//! - **Double density relaxation**: position-based pressure solve with a
//!   near-density anti-clustering term
//! - **Viscoelasticity**: an evolving sparse spring network with plastic
//!   rest-length adaptation gives the fluid elastic/plastic memory
//! - **Rigid-body coupling**: fixed and movable spherical obstacles that
//!   exclude particles and exchange momentum with the fluid
//! - **Parallelization**: optional Rayon-backed neighbor search behind
//!   the `parallel` feature (on by default)
//!
//! Neighbor search is deliberately brute force: O(n) per query, memoized
//! for one step. The pipeline's later stages are defined over those exact
//! neighbor sets, so there is no spatial acceleration structure.
//!
//! ## Example
//!
//! ```rust
//! use fluid_engine::{FluidEngine2, math::Vector};
//!
//! let mut engine = FluidEngine2::new();
//! for x in 0..10 {
//!     engine.add_particle(Vector::new([100.0 + 5.0 * x as f64, 50.0])).unwrap();
//! }
//! engine.add_fixed_rigid_body(Vector::new([150.0, 200.0]), 30.0).unwrap();
//!
//! for _ in 0..10 {
//!     engine.simulation_step();
//! }
//! assert!(engine.is_state_finite());
//! ```

#![warn(missing_docs)]

/// Fixed-dimension vector arithmetic
pub mod math;

/// Fluid particle state
pub mod particle;

/// Rigid spherical obstacles
pub mod rigid;

/// Sparse spring network between particle pairs
pub mod springs;

/// Per-step memoized neighbor queries
pub mod neighbors;

/// Global simulation parameters
pub mod params;

/// The simulation engine and its step pipeline
pub mod engine;

/// Preset scenarios for bulk-loading an engine
pub mod scenario;

/// Frame logging for recorded runs
pub mod recorder;

pub use engine::{FluidEngine, FluidEngine2, FluidEngine3, InvalidInput};
pub use params::Parameters;
pub use particle::Particle;
pub use rigid::RigidSphere;
