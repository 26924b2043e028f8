/*
guards.rs

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

//! Hard structural-fairness checks.
//!
//! Independent pass/fail rules over a level's diagnostics. They are separate
//! from the numeric difficulty score: a level can score inside the target
//! range and still be unfair, for example when no rope can move at all.

use super::scorer::Diagnostics;

/// Maximum acceptable first-break depth and key lock depth.
const MAX_LOCK_DEPTH: f64 = 10.0;

/// At least one rope in this many must be movable at the start.
const MOVABLE_RATIO_DENOMINATOR: usize = 10;

/// Maximum acceptable fraction of ropes with a free pull cell.
const MAX_FREE_AHEAD_RATIO: f64 = 0.75;

/// Check a level's diagnostics against the hard guards.
///
/// Return one human-readable reason per violated rule; an empty list means
/// the level passes.
pub fn check(diagnostics: &Diagnostics) -> Vec<String> {
    let mut violations: Vec<String> = Vec::new();

    if diagnostics.n > 0 && diagnostics.initial_movable_count == 0 {
        violations.push("no rope is movable at the start".to_string());
    }
    if diagnostics.first_break_steps > MAX_LOCK_DEPTH {
        violations.push(format!(
            "first break needs {:.0} clears, more than {MAX_LOCK_DEPTH:.0}",
            diagnostics.first_break_steps
        ));
    }
    if diagnostics.key_lock_depth > MAX_LOCK_DEPTH {
        violations.push(format!(
            "key ropes are locked at depth {:.0}, more than {MAX_LOCK_DEPTH:.0}",
            diagnostics.key_lock_depth
        ));
    }
    if diagnostics.n > 0
        && diagnostics.initial_movable_count * MOVABLE_RATIO_DENOMINATOR < diagnostics.n
    {
        violations.push(format!(
            "only {} movable ropes out of {}",
            diagnostics.initial_movable_count, diagnostics.n
        ));
    }
    if diagnostics.n > 0 && diagnostics.free_ahead_ratio > MAX_FREE_AHEAD_RATIO {
        violations.push(format!(
            "free-ahead ratio {:.2} is more than {MAX_FREE_AHEAD_RATIO}",
            diagnostics.free_ahead_ratio
        ));
    }
    violations
}
