/*
growth.rs

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

//! Grow ropes over the eligible cells of a grid.

use log::debug;

use super::constraints;
use super::grid::{Direction, Grid};
use super::level::Level;
use super::rng::LevelRng;
use super::rope::Rope;
use super::scorer;
use crate::config::GenerationConfig;

/// Weight added to a candidate that keeps the current travel direction.
const CORRIDOR_BIAS: f64 = 0.55;

/// Weight added to a candidate that turns while the bend budget allows it.
const TURN_CHANCE: f64 = 0.35;

/// Probability of ending a rope early once the minimum length is reached.
/// Diversifies rope lengths.
const EARLY_STOP_CHANCE: f64 = 0.3;

/// Number of times a pass is regenerated when `ensureAtLeastOneMovable` is
/// set and no rope can move.
const MOVABLE_RETRIES: usize = 8;

/// State of one generation attempt.
///
/// The used-cell map, the failed-start map, and the per-rope bend budget are
/// all scoped to the attempt; nothing leaks between attempts except the
/// random source the caller threads through.
pub struct RopeGrower<'a> {
    grid: &'a Grid,
    config: &'a GenerationConfig,

    /// Cells ropes may occupy.
    eligible: Vec<bool>,

    /// Cells occupied by finalized ropes or by the growing path.
    used: Vec<bool>,

    /// Start cells that failed to grow a rope of the minimum length.
    failed_starts: Vec<bool>,
}

impl<'a> RopeGrower<'a> {
    /// Create the attempt state for a grid and a set of eligible cells.
    /// Cells outside the grid are ignored.
    pub fn new(grid: &'a Grid, eligible_cells: &[usize], config: &'a GenerationConfig) -> Self {
        let num_cells: usize = grid.num_cells();
        let mut eligible: Vec<bool> = vec![false; num_cells];
        for cell in eligible_cells {
            if *cell < num_cells {
                eligible[*cell] = true;
            }
        }
        Self {
            grid,
            config,
            eligible,
            used: vec![false; num_cells],
            failed_starts: vec![false; num_cells],
        }
    }

    /// Grow ropes until the eligible cells or the rope budget run out.
    pub fn grow_all(&mut self, rng: &mut LevelRng) -> Vec<Rope> {
        let budget: usize = self.config.max_ropes.unwrap_or(usize::MAX);
        let mut ropes: Vec<Rope> = Vec::new();

        while ropes.len() < budget {
            let Some(start) = self.pick_start(rng) else {
                break;
            };
            let k_target: usize = rng.range_inclusive(self.config.k_min, self.config.k_max);
            match self.grow_one(start, k_target, rng) {
                Some(cells) => {
                    debug!(
                        "Rope {} from cell {start}: {} cells, target bends {k_target}",
                        ropes.len(),
                        cells.len()
                    );
                    ropes.push(Rope::from_cells(self.grid, cells));
                }
                None => {
                    debug!("Start cell {start} failed to reach the minimum length");
                    self.failed_starts[start] = true;
                }
            }
        }
        ropes
    }

    /// Choose the next start cell.
    ///
    /// Cells with the fewest unused eligible neighbors are preferred, which
    /// reduces leftover fragmentation in corners and along rope bodies. Ties
    /// are broken by a uniform random draw. Cells already marked as failed
    /// starts are skipped; when no candidate remains, generation is over.
    fn pick_start(&self, rng: &mut LevelRng) -> Option<usize> {
        let mut best: Vec<usize> = Vec::new();
        let mut best_count: usize = usize::MAX;

        for cell in 0..self.grid.num_cells() {
            if !self.eligible[cell] || self.used[cell] || self.failed_starts[cell] {
                continue;
            }
            let count: usize = self.unused_neighbors(cell);
            if count < best_count {
                best_count = count;
                best.clear();
            }
            if count == best_count {
                best.push(cell);
            }
        }
        rng.pick_index(best.len()).map(|i| best[i])
    }

    /// Number of unused eligible neighbors of a cell.
    fn unused_neighbors(&self, cell: usize) -> usize {
        Direction::CARDINAL
            .iter()
            .filter_map(|d| self.grid.neighbor(cell, *d))
            .filter(|n| self.eligible[*n] && !self.used[*n])
            .count()
    }

    /// Grow one rope from the given start cell.
    ///
    /// Return the cell sequence, or [`None`] when the walk dead-ends before
    /// reaching the minimum length. On failure every cell of the abandoned
    /// path is released.
    fn grow_one(
        &mut self,
        start: usize,
        k_target: usize,
        rng: &mut LevelRng,
    ) -> Option<Vec<usize>> {
        let mut cells: Vec<usize> = vec![start];
        let mut bends: usize = 0;
        self.used[start] = true;

        while cells.len() < self.config.max_len {
            if cells.len() >= self.config.min_len && rng.chance(EARLY_STOP_CHANCE) {
                break;
            }
            let candidates: Vec<(usize, f64)> = self.candidates(&cells, bends, k_target);
            let weights: Vec<f64> = candidates.iter().map(|c| c.1).collect();
            let Some(choice) = rng.pick_weighted(&weights) else {
                break;
            };
            let next: usize = candidates[choice].0;
            if cells.len() >= 2 {
                let current: usize = cells[cells.len() - 1];
                let previous: usize = cells[cells.len() - 2];
                if self.grid.direction(current, next) != self.grid.direction(previous, current) {
                    bends += 1;
                }
            }
            self.used[next] = true;
            cells.push(next);
        }

        if cells.len() < self.config.min_len {
            for cell in &cells {
                self.used[*cell] = false;
            }
            None
        } else {
            Some(cells)
        }
    }

    /// Enumerate and weight the candidate cells for the next growth step.
    ///
    /// A candidate must be eligible, unused, and pass the enabled constraint
    /// checks. The weight is 1.0, plus a bias when the step keeps the travel
    /// direction, plus a bonus when it turns within the bend budget; a turn
    /// that would exceed the budget weighs zero and is excluded.
    fn candidates(&self, path: &[usize], bends: usize, k_target: usize) -> Vec<(usize, f64)> {
        let current: usize = path[path.len() - 1];
        let mut result: Vec<(usize, f64)> = Vec::with_capacity(4);

        for direction in Direction::CARDINAL {
            let Some(next) = self.grid.neighbor(current, direction) else {
                continue;
            };
            if !self.eligible[next] || self.used[next] {
                continue;
            }
            if self.config.forbid_uturn && constraints::is_uturn(self.grid, path, next) {
                continue;
            }
            if self.config.forbid_head_turn && constraints::is_head_turn(self.grid, path, next) {
                continue;
            }
            if self.config.forbid_2x2_loop
                && constraints::closes_2x2_loop(self.grid, &self.used, current, next)
            {
                continue;
            }

            let weight: f64 = if path.len() < 2 {
                1.0
            } else {
                let travel: Direction = self.grid.direction(path[path.len() - 2], current);
                if direction == travel {
                    1.0 + CORRIDOR_BIAS
                } else if bends < k_target {
                    1.0 + TURN_CHANCE
                } else {
                    // A turn beyond the bend budget is excluded.
                    continue;
                }
            };
            result.push((next, weight));
        }
        result
    }
}

/// Run one full generation pass and return the level.
///
/// When `ensureAtLeastOneMovable` is set and a non-empty pass leaves no rope
/// movable, the pass is regenerated a bounded number of times; the last pass
/// is returned if none succeeds.
pub fn generate_level(
    grid: &Grid,
    eligible_cells: &[usize],
    config: &GenerationConfig,
    rng: &mut LevelRng,
) -> Level {
    let mut level: Level = build_pass(grid, eligible_cells, config, rng);
    if !config.ensure_at_least_one_movable {
        return level;
    }
    for retry in 0..MOVABLE_RETRIES {
        if level.ropes.is_empty()
            || scorer::movability(&level)
                .iter()
                .any(|m| m.is_movable())
        {
            return level;
        }
        debug!("No movable rope, regenerating the pass (retry {retry})");
        level = build_pass(grid, eligible_cells, config, rng);
    }
    level
}

fn build_pass(
    grid: &Grid,
    eligible_cells: &[usize],
    config: &GenerationConfig,
    rng: &mut LevelRng,
) -> Level {
    let mut grower: RopeGrower = RopeGrower::new(grid, eligible_cells, config);
    let mut level: Level = Level::new(grid);
    level.ropes = grower.grow_all(rng);
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::rope;
    use std::collections::HashSet;

    fn test_config() -> GenerationConfig {
        GenerationConfig {
            min_len: 2,
            max_len: 5,
            k_min: 0,
            k_max: 1,
            seed: Some(1),
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn test_generated_ropes_respect_the_bounds() {
        let grid: Grid = Grid::new(10, 10);
        let eligible: Vec<usize> = (0..grid.num_cells()).collect();
        let config: GenerationConfig = test_config();
        let mut rng: LevelRng = LevelRng::from_seed(config.seed);
        let level: Level = generate_level(&grid, &eligible, &config, &mut rng);

        assert!(!level.ropes.is_empty());
        for rope in &level.ropes {
            assert!((2..=5).contains(&rope.len()));
            assert!(rope.bend_count <= 1);
        }
    }

    #[test]
    fn test_consecutive_cells_are_adjacent() {
        let grid: Grid = Grid::new(10, 10);
        let eligible: Vec<usize> = (0..grid.num_cells()).collect();
        let config: GenerationConfig = test_config();
        let mut rng: LevelRng = LevelRng::from_seed(Some(7));
        let level: Level = generate_level(&grid, &eligible, &config, &mut rng);

        for rope in &level.ropes {
            for pair in rope.cells.windows(2) {
                assert_ne!(grid.direction(pair[0], pair[1]), Direction::Invalid);
            }
        }
    }

    #[test]
    fn test_ropes_occupy_disjoint_cells() {
        let grid: Grid = Grid::new(10, 10);
        let eligible: Vec<usize> = (0..grid.num_cells()).collect();
        let config: GenerationConfig = test_config();
        let mut rng: LevelRng = LevelRng::from_seed(Some(11));
        let level: Level = generate_level(&grid, &eligible, &config, &mut rng);

        let mut seen: HashSet<usize> = HashSet::new();
        for rope in &level.ropes {
            for cell in &rope.cells {
                assert!(seen.insert(*cell), "cell {cell} is claimed twice");
            }
        }
    }

    #[test]
    fn test_derived_fields_match_recomputation() {
        let grid: Grid = Grid::new(10, 10);
        let eligible: Vec<usize> = (0..grid.num_cells()).collect();
        let config: GenerationConfig = test_config();
        let mut rng: LevelRng = LevelRng::from_seed(Some(13));
        let level: Level = generate_level(&grid, &eligible, &config, &mut rng);

        for r in &level.ropes {
            assert_eq!(r.head, r.cells[0]);
            assert_eq!(r.head_direction, rope::head_direction_of(&grid, &r.cells));
            assert_eq!(r.bend_count, rope::bend_count_of(&grid, &r.cells));
        }
    }

    #[test]
    fn test_generation_is_deterministic_with_a_seed() {
        let grid: Grid = Grid::new(10, 10);
        let eligible: Vec<usize> = (0..grid.num_cells()).collect();
        let config: GenerationConfig = test_config();
        let mut rng1: LevelRng = LevelRng::from_seed(Some(99));
        let mut rng2: LevelRng = LevelRng::from_seed(Some(99));

        let level1: Level = generate_level(&grid, &eligible, &config, &mut rng1);
        let level2: Level = generate_level(&grid, &eligible, &config, &mut rng2);
        assert_eq!(level1, level2);
    }

    #[test]
    fn test_only_eligible_cells_are_used() {
        let grid: Grid = Grid::new(10, 10);
        // Restrict generation to the bottom half of the grid.
        let eligible: Vec<usize> = (0..50).collect();
        let config: GenerationConfig = test_config();
        let mut rng: LevelRng = LevelRng::from_seed(Some(17));
        let level: Level = generate_level(&grid, &eligible, &config, &mut rng);

        for rope in &level.ropes {
            for cell in &rope.cells {
                assert!(*cell < 50);
            }
        }
    }

    #[test]
    fn test_no_eligible_cells_yields_an_empty_level() {
        let grid: Grid = Grid::new(10, 10);
        let config: GenerationConfig = test_config();
        let mut rng: LevelRng = LevelRng::from_seed(Some(19));
        let level: Level = generate_level(&grid, &[], &config, &mut rng);
        assert!(level.ropes.is_empty());
    }

    #[test]
    fn test_rope_budget_is_respected() {
        let grid: Grid = Grid::new(10, 10);
        let eligible: Vec<usize> = (0..grid.num_cells()).collect();
        let config: GenerationConfig = GenerationConfig {
            max_ropes: Some(3),
            ..test_config()
        };
        let mut rng: LevelRng = LevelRng::from_seed(Some(23));
        let level: Level = generate_level(&grid, &eligible, &config, &mut rng);
        assert!(level.ropes.len() <= 3);
    }
}
