/*
config.rs

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

//! Generation parameters and their tuning adjustments.
//!
//! A [`GenerationConfig`] object collects every knob the level pipeline reads:
//! rope length and bend bounds, the constraint toggles, the optional rope
//! budget and seed, and the AutoTune target range. Configurations are never
//! mutated in place; the search loop derives adjusted copies with
//! [`GenerationConfig::adjusted`].

use serde::{Deserialize, Serialize};

/// Long version string for the command-line `--version` option.
pub const COPYRIGHT_NOTICE: &str = "Copyright 2025 Hervé Quatremain
License GPL-3.0-or-later <https://www.gnu.org/licenses/gpl-3.0.html>
This is free software: you are free to change and redistribute it.
There is NO WARRANTY, to the extent permitted by law.";

/// Direction of an AutoTune parameter adjustment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TuneDirection {
    /// Shrink the bend, length, and rope budgets to lower the difficulty.
    Easier,

    /// Grow the bend, length, and rope budgets to raise the difficulty.
    Harder,
}

/// Parameters for one level-generation pass and its tuning loop.
///
/// The wire form uses the camelCase field names of the level file format,
/// such as `minLen`, `kMax`, or `forbid2x2Loop`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    /// Minimum number of cells in a rope. Shorter attempts are discarded.
    pub min_len: usize,

    /// Maximum number of cells in a rope.
    pub max_len: usize,

    /// Lower bound for the per-rope target bend count.
    pub k_min: usize,

    /// Upper bound for the per-rope target bend count.
    pub k_max: usize,

    /// Reject growth steps that reverse the previous travel direction.
    pub forbid_uturn: bool,

    /// Reject growth steps that land on the head's pull cell.
    pub forbid_head_turn: bool,

    /// Reject growth steps that close a fully occupied 2x2 block.
    pub forbid_2x2_loop: bool,

    /// Regenerate a pass that leaves no rope movable.
    pub ensure_at_least_one_movable: bool,

    /// Floor for the rope budget when AutoTune shrinks it.
    pub min_ropes: Option<usize>,

    /// Maximum number of ropes per generation pass.
    pub max_ropes: Option<usize>,

    /// Seed for the deterministic random source. Unset means the system
    /// random source is used instead.
    pub seed: Option<u32>,

    /// Lower bound of the AutoTune difficulty target range.
    pub target_score_min: f64,

    /// Upper bound of the AutoTune difficulty target range.
    pub target_score_max: f64,

    /// Maximum number of AutoTune attempts before giving up.
    pub max_tune_attempts: usize,

    /// Whether AutoTune rejects levels that fail the hard guards.
    pub hard_guards_enabled: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_len: 2,
            max_len: 6,
            k_min: 0,
            k_max: 3,
            forbid_uturn: true,
            forbid_head_turn: true,
            forbid_2x2_loop: true,
            ensure_at_least_one_movable: true,
            min_ropes: None,
            max_ropes: None,
            seed: None,
            target_score_min: 35.0,
            target_score_max: 70.0,
            max_tune_attempts: 24,
            hard_guards_enabled: true,
        }
    }
}

impl GenerationConfig {
    /// Return a copy of the configuration adjusted in the given direction.
    ///
    /// The adjustment keeps the paired bounds consistent: `kMax` never drops
    /// below `kMin`, `maxLen` never drops below `minLen`, and `maxRopes`
    /// never drops below `minRopes` (or one when `minRopes` is unset).
    pub fn adjusted(&self, direction: TuneDirection) -> Self {
        let mut config: GenerationConfig = self.clone();
        match direction {
            TuneDirection::Easier => {
                if config.k_max > config.k_min {
                    config.k_max -= 1;
                }
                if config.max_len > config.min_len {
                    config.max_len -= 1;
                }
                if let Some(max_ropes) = config.max_ropes {
                    let floor: usize = config.min_ropes.unwrap_or(1);
                    config.max_ropes = Some(max_ropes.saturating_sub(1).max(floor));
                }
            }
            TuneDirection::Harder => {
                config.k_max += 1;
                config.max_len += 1;
                if let Some(max_ropes) = config.max_ropes {
                    config.max_ropes = Some(max_ropes + 1);
                }
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let source: &str = r#"{
            "minLen": 3,
            "maxLen": 7,
            "kMin": 1,
            "kMax": 4,
            "forbidUturn": false,
            "forbidHeadTurn": true,
            "forbid2x2Loop": true,
            "ensureAtLeastOneMovable": false,
            "minRopes": 4,
            "maxRopes": 12,
            "seed": 42,
            "targetScoreMin": 30,
            "targetScoreMax": 60,
            "maxTuneAttempts": 9,
            "hardGuardsEnabled": false
        }"#;
        let config: GenerationConfig = serde_json::from_str(source).unwrap();
        assert_eq!(config.min_len, 3);
        assert_eq!(config.max_len, 7);
        assert_eq!(config.k_min, 1);
        assert_eq!(config.k_max, 4);
        assert!(!config.forbid_uturn);
        assert!(config.forbid_head_turn);
        assert!(config.forbid_2x2_loop);
        assert!(!config.ensure_at_least_one_movable);
        assert_eq!(config.min_ropes, Some(4));
        assert_eq!(config.max_ropes, Some(12));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.target_score_min, 30.0);
        assert_eq!(config.target_score_max, 60.0);
        assert_eq!(config.max_tune_attempts, 9);
        assert!(!config.hard_guards_enabled);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: GenerationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GenerationConfig::default());
    }

    #[test]
    fn test_serialized_form_round_trips() {
        let config: GenerationConfig = GenerationConfig {
            seed: Some(7),
            max_ropes: Some(10),
            ..GenerationConfig::default()
        };
        let encoded: String = serde_json::to_string(&config).unwrap();
        assert!(encoded.contains("\"kMin\""));
        assert!(encoded.contains("\"forbid2x2Loop\""));
        let decoded: GenerationConfig = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_easier_clamps_paired_bounds() {
        let config: GenerationConfig = GenerationConfig {
            min_len: 2,
            max_len: 2,
            k_min: 1,
            k_max: 1,
            min_ropes: Some(3),
            max_ropes: Some(3),
            ..GenerationConfig::default()
        };
        let adjusted: GenerationConfig = config.adjusted(TuneDirection::Easier);
        assert_eq!(adjusted.max_len, 2);
        assert_eq!(adjusted.k_max, 1);
        assert_eq!(adjusted.max_ropes, Some(3));
    }

    #[test]
    fn test_harder_grows_bounds() {
        let config: GenerationConfig = GenerationConfig {
            max_len: 5,
            k_max: 2,
            max_ropes: Some(8),
            ..GenerationConfig::default()
        };
        let adjusted: GenerationConfig = config.adjusted(TuneDirection::Harder);
        assert_eq!(adjusted.max_len, 6);
        assert_eq!(adjusted.k_max, 3);
        assert_eq!(adjusted.max_ropes, Some(9));
        // The original configuration is untouched.
        assert_eq!(config.max_len, 5);
    }
}
