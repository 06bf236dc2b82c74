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
//! Preset scenarios
//!
//! A scenario is a plain description of initial state — particle
//! positions, sphere placements, and optional parameter overrides —
//! applied to an engine once, before the first step. The presets cover
//! the usual demonstration scenes: resting water blocks, blocks with
//! obstacles, and a column collapse.

use crate::engine::{FluidEngine, InvalidInput};
use crate::math::{Vector, Vector2, Vector3};

/// Default mass for preset movable spheres
pub const PRESET_SPHERE_MASS: f64 = 5.0;

/// Axis-aligned grid of particle positions
///
/// Generates points from `min` (inclusive) toward `max` (exclusive) at
/// the given spacing along every axis. An empty or inverted range on any
/// axis yields no points.
pub fn block<const N: usize>(min: Vector<N>, max: Vector<N>, spacing: f64) -> Vec<Vector<N>> {
    let mut counts = [0usize; N];
    for axis in 0..N {
        let span = max[axis] - min[axis];
        if span <= 0.0 {
            return Vec::new();
        }
        counts[axis] = (span / spacing).ceil() as usize;
    }

    let total: usize = counts.iter().product();
    let mut points = Vec::with_capacity(total);
    let mut cursor = [0usize; N];
    for _ in 0..total {
        let mut p = Vector::zero();
        for axis in 0..N {
            p[axis] = min[axis] + cursor[axis] as f64 * spacing;
        }
        points.push(p);

        for axis in (0..N).rev() {
            cursor[axis] += 1;
            if cursor[axis] < counts[axis] {
                break;
            }
            cursor[axis] = 0;
        }
    }
    points
}

/// Initial state for an engine: particles, spheres, parameter overrides
#[derive(Debug, Clone, Default)]
pub struct Scenario<const N: usize> {
    /// Particle positions to load
    pub particles: Vec<Vector<N>>,
    /// Fixed spheres as `(center, radius)`
    pub fixed_spheres: Vec<(Vector<N>, f64)>,
    /// Movable spheres as `(center, radius, mass)`
    pub movable_spheres: Vec<(Vector<N>, f64, f64)>,
    /// Gravity override, if the scene needs one
    pub gravity: Option<Vector<N>>,
    /// Domain extent override, if the scene needs one
    pub extent: Option<Vector<N>>,
}

impl<const N: usize> Scenario<N> {
    /// Load this scenario into an engine
    ///
    /// Applies parameter overrides first, then adds every particle and
    /// sphere. Intended to run on an empty engine before any step.
    pub fn apply(&self, engine: &mut FluidEngine<N>) -> Result<(), InvalidInput> {
        if let Some(gravity) = self.gravity {
            engine.parameters_mut().gravity = gravity;
        }
        if let Some(extent) = self.extent {
            engine.parameters_mut().extent = extent;
        }
        for position in &self.particles {
            engine.add_particle(*position)?;
        }
        for (center, radius) in &self.fixed_spheres {
            engine.add_fixed_rigid_body(*center, *radius)?;
        }
        for (center, radius, mass) in &self.movable_spheres {
            engine.add_movable_rigid_body(*center, *radius, *mass)?;
        }
        Ok(())
    }

    /// Total number of particles this scenario loads
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }
}

/// 2D preset scenes in a 300x300 box with particle spacing 5
pub mod presets_2d {
    use super::*;

    const W: f64 = 300.0;
    const H: f64 = 300.0;
    const SPACING: f64 = 5.0;

    fn rect(x1: f64, x2: f64, y1: f64, y2: f64) -> Vec<Vector2> {
        block(Vector::new([x1, y1]), Vector::new([x2, y2]), SPACING)
    }

    /// Two resting water blocks, no rigid bodies
    pub fn two_blocks() -> Scenario<2> {
        let mut particles = rect(W * 0.2, W * 0.6, H * 0.4, H * 0.6);
        particles.extend(rect(0.0, W, H * 0.8, H));
        Scenario {
            particles,
            ..Scenario::default()
        }
    }

    /// Two water blocks plus a movable sphere dropped into them
    pub fn two_blocks_with_movable_sphere() -> Scenario<2> {
        Scenario {
            movable_spheres: vec![(Vector::new([100.0, 100.0]), 30.0, PRESET_SPHERE_MASS)],
            ..two_blocks()
        }
    }

    /// Three water blocks falling over fixed obstacles
    pub fn three_blocks_with_obstacles() -> Scenario<2> {
        let mut particles = rect(W * 0.2, W * 0.4, H * 0.1, H * 0.25);
        particles.extend(rect(W * 0.2, W * 0.6, H * 0.4, H * 0.6));
        particles.extend(rect(0.0, W, H * 0.8, H));
        Scenario {
            particles,
            fixed_spheres: vec![
                (Vector::new([100.0, 100.0]), 30.0),
                (Vector::new([150.0, 220.0]), 30.0),
                (Vector::new([250.0, 200.0]), 20.0),
            ],
            ..Scenario::default()
        }
    }

    /// Many scattered water cubes around one fixed obstacle
    pub fn scattered_blocks() -> Scenario<2> {
        let mut particles = rect(W * 0.2, W * 0.4, H * 0.2, H * 0.4);
        particles.extend(rect(W * 0.6, W * 0.8, H * 0.2, H * 0.4));
        particles.extend(rect(W * 0.3, W * 0.5, H * 0.7, H * 0.9));
        particles.extend(rect(W * 0.6, W * 0.8, H * 0.4, H * 0.6));
        particles.extend(rect(W * 0.9, W, H * 0.8, H * 0.9));
        particles.extend(rect(W * 0.8, W * 0.9, H * 0.4, H * 0.6));
        particles.extend(rect(W * 0.4, W * 0.5, 0.0, H * 0.15));
        Scenario {
            particles,
            fixed_spheres: vec![(Vector::new([250.0, 200.0]), 20.0)],
            ..Scenario::default()
        }
    }
}

/// 3D preset scenes with particle spacing 20
pub mod presets_3d {
    use super::*;

    const X: f64 = 200.0;
    const Y: f64 = 600.0;
    const Z: f64 = 200.0;
    const SPACING: f64 = 20.0;

    fn box_grid(min: [f64; 3], max: [f64; 3]) -> Vec<Vector3> {
        block(Vector::new(min), Vector::new(max), SPACING)
    }

    /// Two water blocks in the default 200x600x200 box
    pub fn two_blocks() -> Scenario<3> {
        let mut particles = box_grid([X * 0.4, 0.0, Z * 0.2], [X * 0.8, Y * 0.4, Z * 0.8]);
        particles.extend(box_grid([0.0, Y * 0.6, Z * 0.5], [X, Y, Z]));
        Scenario {
            particles,
            ..Scenario::default()
        }
    }

    /// A tall column of water collapsing along one wall
    pub fn column() -> Scenario<3> {
        Scenario {
            particles: box_grid([0.0, Y * 0.2, Z * 0.2], [X * 0.3, Y, Z * 0.8]),
            ..Scenario::default()
        }
    }

    /// A falling block over a field of fixed spheres in a 400x800x200 box
    pub fn obstacle_field() -> Scenario<3> {
        let (x, y, z) = (400.0, 800.0, 200.0);
        Scenario {
            particles: block(
                Vector::new([x * 0.3, 0.0, z * 0.4]),
                Vector::new([x * 0.7, y * 0.4, z * 0.7]),
                SPACING,
            ),
            fixed_spheres: vec![
                (Vector::new([0.5 * x, 0.7 * y, 0.5 * z]), 150.0),
                (Vector::new([0.3 * x, 0.8 * y, 0.6 * z]), 120.0),
                (Vector::new([0.4 * x, 0.7 * y, 0.9 * z]), 100.0),
            ],
            extent: Some(Vector::new([x, y, z])),
            ..Scenario::default()
        }
    }
}
