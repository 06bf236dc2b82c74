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
//! End-to-end scenario tests: resting water blocks, a particle thrown at
//! a static sphere, and a movable sphere settling on the floor.

use fluid_engine::math::Vector;
use fluid_engine::scenario::presets_2d;
use fluid_engine::{FluidEngine2, FluidEngine3};

#[test]
fn test_two_resting_blocks_stay_stable() {
    let mut engine = FluidEngine2::new();
    presets_2d::two_blocks().apply(&mut engine).unwrap();
    engine.parameters_mut().gravity = Vector::zero();
    let initial_count = engine.particles().len();
    assert!(initial_count > 100);

    for _ in 0..50 {
        engine.simulation_step();
    }

    // No implicit particle loss, no numerical blowup
    assert_eq!(engine.particles().len(), initial_count);
    assert!(engine.is_state_finite());
}

#[test]
fn test_two_resting_blocks_under_gravity() {
    let mut engine = FluidEngine2::new();
    presets_2d::two_blocks().apply(&mut engine).unwrap();
    let initial_count = engine.particles().len();

    for _ in 0..200 {
        engine.simulation_step();
    }

    assert_eq!(engine.particles().len(), initial_count);
    assert!(engine.is_state_finite());
}

#[test]
fn test_particle_deflected_by_static_sphere() {
    let mut engine = FluidEngine2::new();
    engine.parameters_mut().gravity = Vector::zero();
    engine.add_fixed_rigid_body(Vector::new([150.0, 150.0]), 20.0).unwrap();
    // Aimed straight at the center, fast enough to hit within a few steps
    engine
        .add_particle_with_velocity(Vector::new([50.0, 150.0]), Vector::new([2.0, 0.0]))
        .unwrap();

    for _ in 0..40 {
        engine.simulation_step();
    }

    let p = &engine.particles()[0];
    let center = Vector::new([150.0, 150.0]);
    assert!(
        center.distance(&p.position) >= 20.0 - 1e-9,
        "particle ended inside the sphere"
    );
    // The incoming velocity component (+x) must not still be driving the
    // particle into the sphere: it reverses or dies out at the surface.
    assert!(
        p.velocity[0] <= 1e-9,
        "still approaching the sphere at vx = {}",
        p.velocity[0]
    );
}

#[test]
fn test_movable_sphere_settles_on_floor() {
    // Gravity only, no particles. The wall response hard-damps sphere
    // velocity by a fixed factor (rather than applying the computed
    // reflect/friction impulse); the sphere must come to rest clamped
    // against the floor. Keep this in sync with the damping behavior —
    // it is deliberate, not a missing reflection.
    let mut engine = FluidEngine2::new();
    engine.add_movable_rigid_body(Vector::new([150.0, 100.0]), 30.0, 5.0).unwrap();

    for _ in 0..400 {
        engine.simulation_step();
    }

    let sphere = &engine.rigid_spheres()[0];
    let floor = engine.parameters().extent[1];
    assert!(
        (sphere.center[1] + sphere.radius - floor).abs() < 1e-9,
        "sphere center {} not resting on the floor",
        sphere.center[1]
    );
    assert!(
        sphere.velocity.norm() < 0.05,
        "sphere still moving at |v| = {}",
        sphere.velocity.norm()
    );
}

#[test]
fn test_movable_sphere_couples_to_water() {
    let mut engine = FluidEngine2::new();
    presets_2d::two_blocks_with_movable_sphere().apply(&mut engine).unwrap();
    let initial_count = engine.particles().len();

    for _ in 0..100 {
        engine.simulation_step();
    }

    // Two-way coupling must stay well behaved: nothing lost, nothing NaN,
    // and the sphere never ends a step outside the domain.
    assert_eq!(engine.particles().len(), initial_count);
    assert!(engine.is_state_finite());
    let sphere = &engine.rigid_spheres()[0];
    let extent = engine.parameters().extent;
    for axis in 0..2 {
        assert!(sphere.center[axis] - sphere.radius >= -1e-9);
        assert!(sphere.center[axis] + sphere.radius <= extent[axis] + 1e-9);
    }
    // Particles do not end a step inside the movable sphere either
    for p in engine.particles() {
        assert!(sphere.center.distance(&p.position) >= sphere.radius - 1e-9);
    }
}

#[test]
fn test_fountain_keeps_adding_particles_between_steps() {
    // Mid-run mutation: the fountain preset adds particles with velocity
    // between steps; ids must stay sequential and state finite.
    let mut engine = FluidEngine2::new();

    let mut expected = 0u32;
    for _ in 0..30 {
        for k in 0..5 {
            let id = engine
                .add_particle_with_velocity(
                    Vector::new([145.0 + k as f64 * 2.0, 150.0]),
                    Vector::new([0.0, -3.0]),
                )
                .unwrap();
            assert_eq!(id, expected);
            expected += 1;
        }
        engine.simulation_step();
    }

    assert_eq!(engine.particles().len(), 150);
    assert!(engine.is_state_finite());
}

#[test]
fn test_3d_column_collapse_stays_finite() {
    let mut engine = FluidEngine3::new();
    fluid_engine::scenario::presets_3d::column().apply(&mut engine).unwrap();
    let initial_count = engine.particles().len();
    assert!(initial_count > 50);

    for _ in 0..60 {
        engine.simulation_step();
    }

    assert_eq!(engine.particles().len(), initial_count);
    assert!(engine.is_state_finite());
}
