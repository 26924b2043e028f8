/*
autotune.rs

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

//! Regenerate levels with adjusted parameters until the difficulty score
//! lands in the target range.

use log::debug;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::growth;
use super::guards;
use super::level::Level;
use super::rng::LevelRng;
use super::scorer::{self, Diagnostics};
use crate::config::{GenerationConfig, TuneDirection};

/// Result of a tuning run.
///
/// On success `reason` is absent and the score lies inside the target range.
/// On exhaustion the result carries the last generated level together with a
/// failure reason and any guard violations; callers must treat such a level
/// as usable only with caution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AutoTuneResult {
    /// The generated level.
    #[serde(rename = "ropes")]
    pub level: Level,

    /// The configuration of the last attempt.
    #[serde(rename = "finalConfig")]
    pub final_config: GenerationConfig,

    /// Difficulty score of the level.
    pub score: f64,

    /// Full diagnostics of the level.
    pub diagnostics: Diagnostics,

    /// Number of attempts spent.
    pub attempts: usize,

    /// Why tuning failed. Absent on success.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,

    /// Guard violations of the returned level.
    #[serde(
        rename = "guardErrors",
        skip_serializing_if = "Vec::is_empty",
        default
    )]
    pub guard_errors: Vec<String>,
}

/// Generate a level whose difficulty score falls in the configured target
/// range, adjusting the configuration between attempts.
///
/// Each attempt runs a full pipeline pass: generation, scoring, and (when
/// enabled) the hard guards. An empty pass or a guard violation loosens the
/// configuration; a score outside the range loosens or tightens it. The loop
/// never exceeds `maxTuneAttempts`. When seeded, attempt `i` draws from
/// `seed + i`, so retries explore distinct levels reproducibly.
pub fn tune(grid: &Grid, eligible_cells: &[usize], config: &GenerationConfig) -> AutoTuneResult {
    let max_attempts: usize = config.max_tune_attempts.max(1);
    let mut current: GenerationConfig = config.clone();
    let mut last_level: Level = Level::new(grid);
    let mut last_diagnostics: Diagnostics = scorer::score(&last_level);
    let mut last_guard_errors: Vec<String> = Vec::new();

    for attempt in 0..max_attempts {
        let seed: Option<u32> = current.seed.map(|s| s.wrapping_add(attempt as u32));
        let mut rng: LevelRng = LevelRng::from_seed(seed);
        let level: Level = growth::generate_level(grid, eligible_cells, &current, &mut rng);
        let diagnostics: Diagnostics = scorer::score(&level);
        let score: f64 = diagnostics.difficulty_score;
        debug!(
            "Attempt {}: {} ropes, score {score:.1}",
            attempt + 1,
            level.ropes.len()
        );

        if level.ropes.is_empty() {
            last_level = level;
            last_diagnostics = diagnostics;
            last_guard_errors.clear();
            current = current.adjusted(TuneDirection::Easier);
            continue;
        }

        let guard_errors: Vec<String> = if current.hard_guards_enabled {
            guards::check(&diagnostics)
        } else {
            Vec::new()
        };
        if !guard_errors.is_empty() {
            debug!("Guard violations: {guard_errors:?}");
            last_level = level;
            last_diagnostics = diagnostics;
            last_guard_errors = guard_errors;
            current = current.adjusted(TuneDirection::Easier);
            continue;
        }

        if score >= current.target_score_min && score <= current.target_score_max {
            return AutoTuneResult {
                level,
                final_config: current,
                score,
                diagnostics,
                attempts: attempt + 1,
                reason: None,
                guard_errors: Vec::new(),
            };
        }

        let direction: TuneDirection = if score > current.target_score_max {
            TuneDirection::Easier
        } else {
            TuneDirection::Harder
        };
        debug!("Score {score:.1} out of range, adjusting {direction:?}");
        last_level = level;
        last_diagnostics = diagnostics;
        last_guard_errors = Vec::new();
        current = current.adjusted(direction);
    }

    AutoTuneResult {
        score: last_diagnostics.difficulty_score,
        level: last_level,
        final_config: current,
        diagnostics: last_diagnostics,
        attempts: max_attempts,
        reason: Some(format!(
            "difficulty target not reached after {max_attempts} attempts"
        )),
        guard_errors: last_guard_errors,
    }
}
