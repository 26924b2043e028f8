/*
level.rs

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

//! A level: grid dimensions and the ropes placed on it.

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::rope::Rope;

/// A generated level.
///
/// The wire form uses the field names of the level file format: `MapX`,
/// `MapY`, and `Rope`. Within one generation pass the ropes occupy disjoint
/// cell sets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Level {
    /// Width of the grid in cells.
    #[serde(rename = "MapX")]
    pub map_x: usize,

    /// Height of the grid in cells.
    #[serde(rename = "MapY")]
    pub map_y: usize,

    /// Ropes placed on the grid.
    #[serde(rename = "Rope")]
    pub ropes: Vec<Rope>,
}

impl Level {
    /// Create an empty level for the given grid.
    pub fn new(grid: &Grid) -> Self {
        Self {
            map_x: grid.width,
            map_y: grid.height,
            ropes: Vec::new(),
        }
    }

    /// Return the level's grid.
    pub fn grid(&self) -> Grid {
        Grid::new(self.map_x, self.map_y)
    }

    /// Map every cell to the rope that owns it and the cell's position
    /// within that rope's sequence.
    pub fn cell_owners(&self) -> Vec<Option<(usize, usize)>> {
        let mut owners: Vec<Option<(usize, usize)>> = vec![None; self.map_x * self.map_y];
        for (rope_index, rope) in self.ropes.iter().enumerate() {
            for (position, cell) in rope.cells.iter().enumerate() {
                if *cell < owners.len() {
                    owners[*cell] = Some((rope_index, position));
                }
            }
        }
        owners
    }

    /// Total number of cells covered by ropes.
    pub fn occupied_cells(&self) -> usize {
        self.ropes.iter().map(Rope::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_owners() {
        let grid: Grid = Grid::new(4, 3);
        let mut level: Level = Level::new(&grid);
        level.ropes.push(Rope::from_cells(&grid, vec![0, 1, 5]));
        level.ropes.push(Rope::from_cells(&grid, vec![10, 11]));
        let owners: Vec<Option<(usize, usize)>> = level.cell_owners();
        assert_eq!(owners[0], Some((0, 0)));
        assert_eq!(owners[1], Some((0, 1)));
        assert_eq!(owners[5], Some((0, 2)));
        assert_eq!(owners[10], Some((1, 0)));
        assert_eq!(owners[11], Some((1, 1)));
        assert_eq!(owners[2], None);
        assert_eq!(level.occupied_cells(), 5);
    }

    #[test]
    fn test_wire_format() {
        let grid: Grid = Grid::new(4, 3);
        let mut level: Level = Level::new(&grid);
        level.ropes.push(Rope::from_cells(&grid, vec![0, 1]));
        let encoded: String = serde_json::to_string(&level).unwrap();
        assert!(encoded.contains("\"MapX\":4"));
        assert!(encoded.contains("\"MapY\":3"));
        assert!(encoded.contains("\"Rope\":["));
        let decoded: Level = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, level);
    }
}
