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
//! Sparse spring network between particle pairs
//!
//! Springs encode the fluid's plastic/elastic memory. Each spring joins an
//! unordered pair of particles and stores a scalar rest length. Springs
//! are created lazily (at rest length `h`) the first time a pair comes
//! within interaction range, have their rest length adapted by the
//! plasticity stage, and are dropped as soon as the rest length exceeds
//! `h`. The registry is pruned every step; it is not append-only.

use std::collections::HashMap;

/// Canonical key for an unordered particle pair
///
/// Stored as `(min(i, j), max(i, j))` so each pair has exactly one key
/// regardless of traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey(u32, u32);

impl PairKey {
    /// Build the canonical key for two particle ids
    ///
    /// # Panics
    ///
    /// Panics if `i == j`; a particle cannot be sprung to itself. That is
    /// a programming error in the pipeline, not a runtime condition.
    pub fn new(i: u32, j: u32) -> Self {
        assert!(i != j, "spring endpoints must be distinct particles");
        if i < j {
            PairKey(i, j)
        } else {
            PairKey(j, i)
        }
    }

    /// The smaller particle id
    pub fn first(&self) -> u32 {
        self.0
    }

    /// The larger particle id
    pub fn second(&self) -> u32 {
        self.1
    }
}

/// Sparse map from particle pairs to spring rest lengths
#[derive(Debug, Default)]
pub struct SpringRegistry {
    springs: HashMap<PairKey, f64>,
}

impl SpringRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        SpringRegistry {
            springs: HashMap::new(),
        }
    }

    /// Rest length of the spring for `key`, if one exists
    pub fn rest_length(&self, key: PairKey) -> Option<f64> {
        self.springs.get(&key).copied()
    }

    /// Rest length for `key`, inserting a fresh spring at `initial` first
    /// if the pair has none
    pub fn ensure(&mut self, key: PairKey, initial: f64) -> f64 {
        *self.springs.entry(key).or_insert(initial)
    }

    /// Overwrite the rest length for an existing pair
    pub fn set_rest_length(&mut self, key: PairKey, rest_length: f64) {
        self.springs.insert(key, rest_length);
    }

    /// Drop every spring whose rest length exceeds `limit`
    pub fn prune_longer_than(&mut self, limit: f64) {
        self.springs.retain(|_, rest| *rest <= limit);
    }

    /// Drop every spring with an endpoint for which `alive` is false
    ///
    /// Used when the particle collection is cleared externally, so stale
    /// ids do not linger in the registry.
    pub fn retain_ids(&mut self, alive: impl Fn(u32) -> bool) {
        self.springs
            .retain(|key, _| alive(key.first()) && alive(key.second()));
    }

    /// Iterate over `(pair, rest_length)` entries
    pub fn iter(&self) -> impl Iterator<Item = (PairKey, f64)> + '_ {
        self.springs.iter().map(|(k, v)| (*k, *v))
    }

    /// Number of live springs
    pub fn len(&self) -> usize {
        self.springs.len()
    }

    /// Whether the registry holds no springs
    pub fn is_empty(&self) -> bool {
        self.springs.is_empty()
    }

    /// Remove all springs
    pub fn clear(&mut self) {
        self.springs.clear();
    }
}
