/*
rng.rs

Copyright 2025 Hervé Quatremain

This file is part of Ropeforge.

Ropeforge is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Ropeforge is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Ropeforge. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Random sources for level generation.
//!
//! Generation is the only nondeterministic part of the pipeline, and all of
//! its randomness flows through a single [`LevelRng`] object. When the
//! configuration carries a seed, the object wraps a [`Mulberry32`] state and
//! the whole pipeline becomes reproducible. Without a seed, it draws from the
//! system random source.

use rand::Rng;
use rand::rngs::ThreadRng;

/// Mulberry32 generator state.
///
/// The state is a plain 32-bit value and [`Mulberry32::next`] is a pure
/// transition: it consumes a state and returns the drawn number together
/// with the successor state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Create a generator state from a seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Draw a number in `[0, 1)` and return it with the successor state.
    pub fn next(self) -> (f64, Self) {
        let state: u32 = self.state.wrapping_add(0x6D2B_79F5);
        let mut t: u32 = (state ^ (state >> 15)).wrapping_mul(state | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        let value: f64 = f64::from(t ^ (t >> 14)) / 4_294_967_296.0;
        (value, Self { state })
    }
}

/// Random source for one generation pass.
#[derive(Debug, Clone)]
pub enum LevelRng {
    /// Deterministic source driven by a [`Mulberry32`] state.
    Seeded(Mulberry32),

    /// System random source.
    System(ThreadRng),
}

impl LevelRng {
    /// Create the source for the given optional seed.
    pub fn from_seed(seed: Option<u32>) -> Self {
        match seed {
            Some(seed) => Self::Seeded(Mulberry32::new(seed)),
            None => Self::System(rand::rng()),
        }
    }

    /// Draw a number in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        match self {
            Self::Seeded(state) => {
                let (value, next) = state.next();
                *state = next;
                value
            }
            Self::System(rng) => rng.random::<f64>(),
        }
    }

    /// Whether an event with the given probability occurs.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Draw an integer in `[low, high]`, both bounds included.
    pub fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        let span: usize = high - low + 1;
        low + (self.next_f64() * span as f64) as usize
    }

    /// Draw an index in `[0, len)`, or [`None`] when `len` is zero.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.range_inclusive(0, len - 1))
        }
    }

    /// Draw an index with probability proportional to its weight.
    ///
    /// Entries with a weight of zero or less are never selected. Return
    /// [`None`] when no entry has a positive weight.
    pub fn pick_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let mut draw: f64 = self.next_f64() * total;
        for (index, weight) in weights.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            draw -= weight;
            if draw <= 0.0 {
                return Some(index);
            }
        }
        // Floating-point rounding can leave a residue; fall back to the last
        // selectable entry.
        weights.iter().rposition(|weight| *weight > 0.0)
    }
}
