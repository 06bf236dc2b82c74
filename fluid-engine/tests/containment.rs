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
//! Integration tests for the collision-resolution invariants: particles
//! never leave the domain, and never end a step inside a rigid sphere.

use fluid_engine::math::Vector;
use fluid_engine::scenario::{presets_2d, presets_3d};
use fluid_engine::{FluidEngine, FluidEngine2, FluidEngine3};

fn assert_contained<const N: usize>(engine: &FluidEngine<N>) {
    let extent = engine.parameters().extent;
    for p in engine.particles() {
        for axis in 0..N {
            assert!(
                p.position[axis] >= 0.0 && p.position[axis] <= extent[axis],
                "particle {} left the domain on axis {}: {}",
                p.id,
                axis,
                p.position[axis]
            );
        }
    }
}

fn assert_excluded<const N: usize>(engine: &FluidEngine<N>) {
    for sphere in engine.rigid_spheres() {
        for p in engine.particles() {
            let distance = sphere.center.distance(&p.position);
            assert!(
                distance >= sphere.radius - 1e-9,
                "particle {} inside sphere at distance {} < {}",
                p.id,
                distance,
                sphere.radius
            );
        }
    }
}

#[test]
fn test_walls_contain_falling_water_2d() {
    let mut engine = FluidEngine2::new();
    presets_2d::two_blocks().apply(&mut engine).unwrap();

    for _ in 0..100 {
        engine.simulation_step();
        assert_contained(&engine);
    }
    assert!(engine.is_state_finite());
}

#[test]
fn test_walls_contain_falling_water_3d() {
    let mut engine = FluidEngine3::new();
    presets_3d::two_blocks().apply(&mut engine).unwrap();

    for _ in 0..40 {
        engine.simulation_step();
        assert_contained(&engine);
    }
    assert!(engine.is_state_finite());
}

#[test]
fn test_walls_contain_particles_under_reverted_gravity() {
    let mut engine = FluidEngine2::new();
    presets_2d::two_blocks().apply(&mut engine).unwrap();
    // Gravity pulling toward the y = 0 wall instead
    engine.parameters_mut().set_gravity_fraction(-1.0);

    for _ in 0..100 {
        engine.simulation_step();
        assert_contained(&engine);
    }
}

#[test]
fn test_fixed_spheres_exclude_particles() {
    let mut engine = FluidEngine2::new();
    presets_2d::three_blocks_with_obstacles()
        .apply(&mut engine)
        .unwrap();

    for _ in 0..100 {
        engine.simulation_step();
        assert_contained(&engine);
        assert_excluded(&engine);
    }
}

#[test]
fn test_fixed_spheres_exclude_particles_3d() {
    // Disjoint interior spheres: exclusion must hold for every sphere at
    // every step end. (The obstacle_field preset's spheres overlap each
    // other and the walls, so resolving one can re-violate another; that
    // scene only gets the finiteness check below.)
    let mut engine = FluidEngine3::new();
    engine
        .add_fixed_rigid_body(Vector::new([100.0, 200.0, 100.0]), 50.0)
        .unwrap();
    engine
        .add_fixed_rigid_body(Vector::new([100.0, 450.0, 100.0]), 50.0)
        .unwrap();
    for p in fluid_engine::scenario::block(
        Vector::new([40.0, 0.0, 40.0]),
        Vector::new([160.0, 120.0, 160.0]),
        20.0,
    ) {
        engine.add_particle(p).unwrap();
    }

    for _ in 0..60 {
        engine.simulation_step();
        assert_contained(&engine);
        assert_excluded(&engine);
    }
}

#[test]
fn test_obstacle_field_preset_stays_finite() {
    let mut engine = FluidEngine3::new();
    presets_3d::obstacle_field().apply(&mut engine).unwrap();

    for _ in 0..40 {
        engine.simulation_step();
    }
    assert!(engine.is_state_finite());
}

#[test]
fn test_fast_particle_cannot_tunnel_out() {
    let mut engine = FluidEngine2::new();
    engine.parameters_mut().gravity = Vector::zero();
    engine
        .add_particle_with_velocity(Vector::new([150.0, 150.0]), Vector::new([500.0, -900.0]))
        .unwrap();

    for _ in 0..10 {
        engine.simulation_step();
        assert_contained(&engine);
    }
}
