/*
rope.rs

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

//! Rope pieces and their derived fields.

use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid};

/// Serialize and deserialize [`Direction`] values as their integer
/// representation with Serde.
pub mod direction_repr {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

    use crate::generator::grid::Direction;

    /// Serialize a [`Direction`] value as an integer.
    pub fn serialize<S>(direction: &Direction, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (*direction as u8).serialize(serializer)
    }

    /// Deserialize a [`Direction`] value from an integer.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Direction, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: u8 = u8::deserialize(deserializer)?;
        Direction::from_repr(value)
            .ok_or_else(|| Error::custom(format!("invalid direction value {value}")))
    }
}

/// Pull direction of a cell sequence.
///
/// The head is pulled in the direction opposite to the first step of the
/// sequence. Return [`Direction::Invalid`] when the sequence has fewer than
/// two cells or when the first step is not a single grid step.
pub fn head_direction_of(grid: &Grid, cells: &[usize]) -> Direction {
    if cells.len() < 2 {
        return Direction::Invalid;
    }
    grid.direction(cells[0], cells[1]).opposite()
}

/// Number of direction changes in a cell sequence, counted from the second
/// segment onward.
pub fn bend_count_of(grid: &Grid, cells: &[usize]) -> usize {
    let mut count: usize = 0;
    for i in 2..cells.len() {
        if grid.direction(cells[i - 1], cells[i]) != grid.direction(cells[i - 2], cells[i - 1]) {
            count += 1;
        }
    }
    count
}

/// A rope piece placed on the grid.
///
/// The wire form uses the field names of the level file format: `D` for the
/// pull direction (as an integer), `H` for the head cell, `Index` for the
/// cell sequence, `BendCount`, and `ColorIdx`. The color index is managed by
/// the color pool and passes through generation unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Rope {
    /// Direction the head is pulled in.
    #[serde(rename = "D", with = "direction_repr")]
    pub head_direction: Direction,

    /// First cell of the sequence.
    #[serde(rename = "H")]
    pub head: usize,

    /// Ordered cell sequence. Cells are distinct and consecutive cells are
    /// orthogonal neighbors.
    #[serde(rename = "Index")]
    pub cells: Vec<usize>,

    /// Number of direction changes along the sequence.
    #[serde(rename = "BendCount")]
    pub bend_count: usize,

    /// Color assigned by the color pool.
    #[serde(rename = "ColorIdx", default)]
    pub color_idx: usize,
}

impl Rope {
    /// Build a rope from a finished cell sequence, deriving the head, the
    /// pull direction, and the bend count.
    pub fn from_cells(grid: &Grid, cells: Vec<usize>) -> Self {
        Self {
            head_direction: head_direction_of(grid, &cells),
            head: cells.first().copied().unwrap_or(0),
            bend_count: bend_count_of(grid, &cells),
            cells,
            color_idx: 0,
        }
    }

    /// Number of cells in the rope.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the rope has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Return the rope with its cell sequence reversed and its derived
    /// fields recomputed. The color index is preserved.
    ///
    /// Repair passes use this to flip ropes whose head ended up in a dead
    /// corner.
    pub fn reversed(&self, grid: &Grid) -> Self {
        let mut cells: Vec<usize> = self.cells.clone();
        cells.reverse();
        let mut rope: Rope = Self::from_cells(grid, cells);
        rope.color_idx = self.color_idx;
        rope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_three_cell_rope() {
        // Cells 27 (2, 5), 22 (2, 4), and 17 (2, 3) on a 5-wide grid form a
        // straight line going down, so the head is pulled up.
        let grid: Grid = Grid::new(5, 6);
        let rope: Rope = Rope::from_cells(&grid, vec![27, 22, 17]);
        assert_eq!(rope.head, 27);
        assert_eq!(rope.head_direction, Direction::Up);
        assert_eq!(rope.head_direction as u8, 1);
        assert_eq!(grid.direction(27, 22), Direction::Down);
        assert_eq!(grid.direction(27, 22) as u8, 2);
        assert_eq!(rope.bend_count, 0);
    }

    #[test]
    fn test_bend_count_of_l_shape() {
        let grid: Grid = Grid::new(5, 5);
        // (0, 0) -> (1, 0) -> (2, 0) -> (2, 1): one turn.
        assert_eq!(bend_count_of(&grid, &[0, 1, 2, 7]), 1);
        // (0, 0) -> (1, 0) -> (1, 1) -> (2, 1): two turns.
        assert_eq!(bend_count_of(&grid, &[0, 1, 6, 7]), 2);
        assert_eq!(bend_count_of(&grid, &[0, 1]), 0);
        assert_eq!(bend_count_of(&grid, &[0]), 0);
    }

    #[test]
    fn test_head_direction_of_short_sequences() {
        let grid: Grid = Grid::new(5, 5);
        assert_eq!(head_direction_of(&grid, &[]), Direction::Invalid);
        assert_eq!(head_direction_of(&grid, &[3]), Direction::Invalid);
        // Non-adjacent first step.
        assert_eq!(head_direction_of(&grid, &[0, 2]), Direction::Invalid);
    }

    #[test]
    fn test_reversed_rope_rederives_fields() {
        let grid: Grid = Grid::new(5, 5);
        let mut rope: Rope = Rope::from_cells(&grid, vec![0, 1, 2, 7]);
        rope.color_idx = 3;
        let reversed: Rope = rope.reversed(&grid);
        assert_eq!(reversed.cells, vec![7, 2, 1, 0]);
        assert_eq!(reversed.head, 7);
        // First step of the reversed sequence goes down, so the head is
        // pulled up.
        assert_eq!(reversed.head_direction, Direction::Up);
        assert_eq!(reversed.bend_count, rope.bend_count);
        assert_eq!(reversed.color_idx, 3);
    }

    #[test]
    fn test_wire_format() {
        let grid: Grid = Grid::new(5, 6);
        let rope: Rope = Rope::from_cells(&grid, vec![27, 22, 17]);
        let encoded: String = serde_json::to_string(&rope).unwrap();
        assert!(encoded.contains("\"D\":1"));
        assert!(encoded.contains("\"H\":27"));
        assert!(encoded.contains("\"Index\":[27,22,17]"));
        assert!(encoded.contains("\"BendCount\":0"));
        assert!(encoded.contains("\"ColorIdx\":0"));
        let decoded: Rope = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, rope);
    }
}
