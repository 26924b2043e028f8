/*
generator.rs

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

//! Generate, score, and tune rope puzzle levels.
//!
//! A level is a grid partially covered by rope pieces, represented by
//! [`level::Level`] and [`rope::Rope`] objects.
//!
//! Producing a level takes three stages:
//!
//! * [`growth::generate_level`] fills the eligible cells of a
//!   [`grid::Grid`] with ropes by running a constrained random walk for each
//!   piece. The walk draws its randomness from a [`rng::LevelRng`] object,
//!   which is deterministic when the [`crate::config::GenerationConfig`]
//!   carries a seed. The [`constraints`] checks reject steps that would
//!   produce U-turns, head turns, or enclosed 2x2 pockets.
//!
//! * [`scorer::score`] evaluates a finished level. It builds the reverse
//!   blocking graph between ropes, runs a multi-source shortest-path pass
//!   from every movable rope, and condenses the signals into a
//!   [`scorer::Diagnostics`] object with a difficulty score between 0
//!   and 100. [`guards::check`] flags structurally unfair levels with
//!   human-readable reasons.
//!
//! * [`autotune::tune`] repeats generation and scoring with adjusted
//!   parameters until the score lands in the configured target range and the
//!   guards pass, or until the attempt budget runs out. On exhaustion it
//!   returns the last level together with an explicit failure reason.

pub mod autotune;
pub mod constraints;
pub mod grid;
pub mod growth;
pub mod guards;
pub mod level;
pub mod rng;
pub mod rope;
pub mod scorer;
