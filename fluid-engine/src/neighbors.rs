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
//! Per-step neighbor queries
//!
//! Neighbor search is an exhaustive radius scan over the whole particle
//! set: for particle `i`, every particle (itself included) whose distance
//! is strictly below the interaction radius `h`. O(n) per query, O(n²)
//! per step — an accepted tradeoff at the target particle counts, not a
//! defect to fix with spatial hashing. Later pipeline stages depend on
//! the exact neighbor sets, so any acceleration structure would have to
//! reproduce them bit-for-bit.
//!
//! Results are memoized in an engine-owned scratch buffer for the
//! lifetime of one simulation step. The cache is cleared at the *end* of
//! the step, never the start, so a stale result cannot silently survive
//! two full steps; it does deliberately survive across the collision
//! stages within one step, matching the pipeline contract.

use crate::math::Vector;
use crate::particle::Particle;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Engine-owned neighbor cache, indexed by particle position in the list
#[derive(Debug, Default)]
pub struct NeighborCache {
    lists: Vec<Option<Vec<usize>>>,
}

fn scan<const N: usize>(center: &Vector<N>, particles: &[Particle<N>], h: f64) -> Vec<usize> {
    particles
        .iter()
        .enumerate()
        .filter(|(_, p)| p.position.distance(center) < h)
        .map(|(idx, _)| idx)
        .collect()
}

impl NeighborCache {
    /// Create an empty cache
    pub fn new() -> Self {
        NeighborCache { lists: Vec::new() }
    }

    /// Discard all memoized lists and size the cache for `count` particles
    pub fn reset(&mut self, count: usize) {
        self.lists.clear();
        self.lists.resize_with(count, || None);
    }

    /// Neighbors of particle `index` within radius `h`, memoized
    ///
    /// The first query in a step performs the brute-force scan; repeat
    /// queries return the identical set until [`reset`](Self::reset).
    ///
    /// # Panics
    ///
    /// Panics if the cache was not reset to cover `index`.
    pub fn neighbors_of<const N: usize>(
        &mut self,
        index: usize,
        particles: &[Particle<N>],
        h: f64,
    ) -> &[usize] {
        let slot = &mut self.lists[index];
        if slot.is_none() {
            *slot = Some(scan(&particles[index].position, particles, h));
        }
        slot.as_deref().unwrap()
    }

    /// Fill every list eagerly
    ///
    /// Produces exactly the sets the lazy path would; the scan is
    /// read-only over positions, so it parallelizes cleanly when the
    /// `parallel` feature is enabled.
    pub fn warm<const N: usize>(&mut self, particles: &[Particle<N>], h: f64) {
        #[cfg(feature = "parallel")]
        {
            self.lists = particles
                .par_iter()
                .map(|p| Some(scan(&p.position, particles, h)))
                .collect();
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.lists = particles
                .iter()
                .map(|p| Some(scan(&p.position, particles, h)))
                .collect();
        }
    }
}
