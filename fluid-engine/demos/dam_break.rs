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
//! Runs the 2D two-block scene headless and prints how the water settles.

use fluid_engine::scenario::presets_2d;
use fluid_engine::FluidEngine2;

fn main() {
    env_logger::init();

    let mut engine = FluidEngine2::new();
    presets_2d::two_blocks()
        .apply(&mut engine)
        .expect("preset fits the domain");

    println!(
        "two_blocks: {} particles in a {:?} box",
        engine.particles().len(),
        engine.parameters().extent.as_array(),
    );

    for step in 1..=300u32 {
        engine.simulation_step();
        if step % 50 == 0 {
            let particles = engine.particles();
            let mean_y: f64 =
                particles.iter().map(|p| p.position[1]).sum::<f64>() / particles.len() as f64;
            let max_pressure = particles
                .iter()
                .map(|p| p.pressure)
                .fold(f64::NEG_INFINITY, f64::max);
            println!(
                "step {step:3}: springs = {:5}, mean depth = {mean_y:6.1}, max pressure = {max_pressure:8.4}",
                engine.spring_count(),
            );
        }
    }

    let settled = engine
        .particles()
        .iter()
        .filter(|p| p.velocity.norm() < 0.05)
        .count();
    println!(
        "after {} steps: {}/{} particles nearly at rest, state finite: {}",
        engine.step_count(),
        settled,
        engine.particles().len(),
        engine.is_state_finite(),
    );
}
