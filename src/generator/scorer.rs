/*
scorer.rs

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

//! Score the solving difficulty of a level.
//!
//! Scoring is a pure function of the level. It classifies every rope as
//! movable or blocked, builds the reverse blocking graph (an edge `B -> A`
//! means clearing rope `B` frees rope `A`'s path), runs a multi-source
//! shortest-path pass from every movable rope, and condenses the signals
//! into a [`Diagnostics`] object with a difficulty score between 0 and 100.
//!
//! The score is the maximum of two weighted channels: a "break" channel
//! driven by how deep the two longest ropes (the key set) are locked behind
//! other ropes, and a "cognitive" channel driven by how much board state the
//! player has to track.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::grid::{Direction, Grid};
use super::level::Level;
use super::rope::Rope;

/// Ceiling for the shortest-path signals. Unreachable key ropes saturate at
/// this depth, and the logarithmic normalization uses it as its maximum.
const LOCK_CEILING: f64 = 25.0;

/// Denominator bound for the average-length normalization.
const AVG_LEN_CEILING: f64 = 10.0;

/// Denominator bound for the average-bend normalization.
const AVG_BENDS_CEILING: f64 = 4.0;

/// Denominator bound for the blocking-edges-per-rope normalization.
const BRANCH_CEILING: f64 = 3.0;

/// How a rope can move on its first pull.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Movability {
    /// The pull cell is occupied by a rope.
    Blocked,

    /// The pull cell is free, inside the grid.
    FreeAhead,

    /// The pull leaves the grid.
    OffGrid,
}

impl Movability {
    /// Whether the rope can move at all.
    pub fn is_movable(self) -> bool {
        !matches!(self, Movability::Blocked)
    }
}

/// Read-only scoring result for one level.
///
/// The wire form uses the diagnostic field names of the level tooling, such
/// as `DifficultyScore` or `KeyLockDepth`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Diagnostics {
    /// Composite difficulty score, between 0 and 100.
    #[serde(rename = "DifficultyScore")]
    pub difficulty_score: f64,

    /// Clears needed before a key rope can move, capped at the ceiling.
    #[serde(rename = "FirstBreakSteps")]
    pub first_break_steps: f64,

    /// Shortest-path distance to the nearest key rope, capped at the
    /// ceiling.
    #[serde(rename = "KeyLockDepth")]
    pub key_lock_depth: f64,

    /// Number of ropes movable at the start.
    #[serde(rename = "InitialMovableCount")]
    pub initial_movable_count: usize,

    /// Fraction of grid cells covered by ropes.
    #[serde(rename = "Density")]
    pub density: f64,

    /// Fraction of grid cells left empty.
    #[serde(rename = "EmptyRatio")]
    pub empty_ratio: f64,

    /// Fraction of ropes movable without leaving the grid.
    #[serde(rename = "FreeAheadRatio")]
    pub free_ahead_ratio: f64,

    /// Fraction of ropes movable only by exiting the grid.
    #[serde(rename = "OOBRatio")]
    pub oob_ratio: f64,

    /// Number of ropes.
    #[serde(rename = "N")]
    pub n: usize,

    /// Average rope length.
    #[serde(rename = "AvgLen")]
    pub avg_len: f64,

    /// Longest rope length.
    #[serde(rename = "MaxLen")]
    pub max_len: usize,

    /// Average bend count.
    #[serde(rename = "AvgBends")]
    pub avg_bends: f64,

    /// Indexes of the (up to) two longest ropes.
    #[serde(rename = "KeySet")]
    pub key_set: Vec<usize>,
}

impl Diagnostics {
    /// Diagnostics of an empty level.
    fn empty(n_cells: usize) -> Self {
        Self {
            difficulty_score: 0.0,
            first_break_steps: 0.0,
            key_lock_depth: 0.0,
            initial_movable_count: 0,
            density: 0.0,
            empty_ratio: if n_cells == 0 { 0.0 } else { 1.0 },
            free_ahead_ratio: 0.0,
            oob_ratio: 0.0,
            n: 0,
            avg_len: 0.0,
            max_len: 0,
            avg_bends: 0.0,
            key_set: Vec::new(),
        }
    }
}

/// Classify one rope against the cell-ownership map.
fn classify(grid: &Grid, owners: &[Option<(usize, usize)>], rope: &Rope) -> Movability {
    if rope.head_direction == Direction::Invalid {
        return Movability::Blocked;
    }
    match grid.neighbor(rope.head, rope.head_direction) {
        None => Movability::OffGrid,
        Some(cell) => {
            if owners[cell].is_some() {
                Movability::Blocked
            } else {
                Movability::FreeAhead
            }
        }
    }
}

/// Classify every rope of the level.
pub fn movability(level: &Level) -> Vec<Movability> {
    let grid: Grid = level.grid();
    let owners: Vec<Option<(usize, usize)>> = level.cell_owners();
    level
        .ropes
        .iter()
        .map(|rope| classify(&grid, &owners, rope))
        .collect()
}

/// Normalize a shortest-path signal logarithmically against the ceiling.
fn norm_log(value: f64) -> f64 {
    ((1.0 + value.max(0.0)).ln() / (1.0 + LOCK_CEILING).ln()).clamp(0.0, 1.0)
}

/// Normalize a signal linearly against a domain maximum.
fn norm_linear(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}

/// Score a level and return its diagnostics.
///
/// Pure and side-effect free: the same level always produces bit-identical
/// diagnostics.
pub fn score(level: &Level) -> Diagnostics {
    let grid: Grid = level.grid();
    let n: usize = level.ropes.len();
    if n == 0 {
        return Diagnostics::empty(grid.num_cells());
    }

    let owners: Vec<Option<(usize, usize)>> = level.cell_owners();
    let flags: Vec<Movability> = level
        .ropes
        .iter()
        .map(|rope| classify(&grid, &owners, rope))
        .collect();

    // Reverse blocking graph: edges[b] lists the ropes freed by clearing
    // rope b, weighted by how much of b must be cleared.
    let mut edges: Vec<Vec<(usize, u64)>> = vec![Vec::new(); n];
    let mut edge_count: usize = 0;
    for (a, rope) in level.ropes.iter().enumerate() {
        if flags[a].is_movable() || rope.head_direction == Direction::Invalid {
            continue;
        }
        if let Some(cell) = grid.neighbor(rope.head, rope.head_direction)
            && let Some((b, position)) = owners[cell]
        {
            let weight: u64 = (level.ropes[b].len() - position) as u64;
            edges[b].push((a, weight));
            edge_count += 1;
        }
    }

    // Multi-source shortest path from every movable rope.
    let mut dist: Vec<u64> = vec![u64::MAX; n];
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::new();
    for (index, flag) in flags.iter().enumerate() {
        if flag.is_movable() {
            dist[index] = 0;
            heap.push(Reverse((0, index)));
        }
    }
    while let Some(Reverse((d, b))) = heap.pop() {
        if d > dist[b] {
            continue;
        }
        for &(a, weight) in &edges[b] {
            let candidate: u64 = d + weight;
            if candidate < dist[a] {
                dist[a] = candidate;
                heap.push(Reverse((candidate, a)));
            }
        }
    }

    // Key set: the (up to) two longest ropes.
    let mut by_length: Vec<usize> = (0..n).collect();
    by_length.sort_by_key(|&index| (Reverse(level.ropes[index].len()), index));
    let key_set: Vec<usize> = by_length.into_iter().take(2).collect();

    let key_lock_depth: f64 = key_set
        .iter()
        .map(|&index| dist[index])
        .min()
        .map(|d| {
            if d == u64::MAX {
                LOCK_CEILING
            } else {
                (d as f64).min(LOCK_CEILING)
            }
        })
        .unwrap_or(LOCK_CEILING);
    let first_break_steps: f64 = (key_lock_depth + 1.0).min(LOCK_CEILING);

    let free_ahead: usize = flags
        .iter()
        .filter(|f| **f == Movability::FreeAhead)
        .count();
    let off_grid: usize = flags
        .iter()
        .filter(|f| **f == Movability::OffGrid)
        .count();
    let initial_movable_count: usize = free_ahead + off_grid;

    let total_cells: usize = grid.num_cells();
    let density: f64 = level.occupied_cells() as f64 / total_cells as f64;
    let avg_len: f64 = level.occupied_cells() as f64 / n as f64;
    let max_len: usize = level.ropes.iter().map(Rope::len).max().unwrap_or(0);
    let avg_bends: f64 =
        level.ropes.iter().map(|r| r.bend_count).sum::<usize>() as f64 / n as f64;

    // Break channel: how hard the first meaningful progress is.
    let inverse_movable: f64 = 1.0 - norm_linear(initial_movable_count as f64, n as f64);
    let branchiness: f64 = norm_linear(edge_count as f64 / n as f64, BRANCH_CEILING);
    let break_score: f64 = 0.45 * norm_log(first_break_steps)
        + 0.25 * norm_log(key_lock_depth)
        + 0.20 * inverse_movable
        + 0.10 * branchiness;

    // Cognitive channel: how much board state the player tracks.
    let cognitive_score: f64 = 0.30 * density
        + 0.25 * norm_linear(n as f64, total_cells as f64 / 4.0)
        + 0.25 * norm_linear(avg_len, AVG_LEN_CEILING)
        + 0.20 * norm_linear(avg_bends, AVG_BENDS_CEILING);

    let difficulty_score: f64 = (100.0 * break_score.max(cognitive_score)).clamp(0.0, 100.0);

    Diagnostics {
        difficulty_score,
        first_break_steps,
        key_lock_depth,
        initial_movable_count,
        density,
        empty_ratio: 1.0 - density,
        free_ahead_ratio: free_ahead as f64 / n as f64,
        oob_ratio: off_grid as f64 / n as f64,
        n,
        avg_len,
        max_len,
        avg_bends,
        key_set,
    }
}
