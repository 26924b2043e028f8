/*
constraints.rs

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

//! Structural checks on candidate path extensions.
//!
//! Each check looks at a growing cell sequence and one candidate cell, and
//! tells whether appending the candidate would produce a shape the
//! configuration forbids. The checks are independent and individually
//! toggleable.

use super::grid::{Direction, Grid};
use super::rope;

/// Whether appending the candidate reverses the previous travel direction.
pub fn is_uturn(grid: &Grid, path: &[usize], candidate: usize) -> bool {
    if path.len() < 2 {
        return false;
    }
    let current: usize = path[path.len() - 1];
    let previous: usize = path[path.len() - 2];
    let travel: Direction = grid.direction(previous, current);
    let step: Direction = grid.direction(current, candidate);
    step != Direction::Invalid && travel != Direction::Invalid && step == travel.opposite()
}

/// Whether the candidate lands on the head's pull cell.
///
/// Once the first step fixes the pull direction, the cell one step from the
/// head in that direction must stay clear of the rope's own body, so that
/// the pull direction keeps its meaning.
pub fn is_head_turn(grid: &Grid, path: &[usize], candidate: usize) -> bool {
    if path.len() < 2 {
        return false;
    }
    let pull: Direction = rope::head_direction_of(grid, path);
    grid.neighbor(path[0], pull) == Some(candidate)
}

/// Whether appending the candidate closes a fully occupied 2x2 block.
///
/// An adjacent cell pair sits in up to two 2x2 blocks, one on each side of
/// the shared edge. The candidate counts as occupied; the other corners are
/// checked against the `used` map, which covers the growing path and every
/// finalized rope. Blocks that would cross the grid edge cannot enclose a
/// pocket and are skipped.
pub fn closes_2x2_loop(grid: &Grid, used: &[bool], current: usize, candidate: usize) -> bool {
    let (x1, y1) = grid.to_xy(current);
    let (x2, y2) = grid.to_xy(candidate);
    let mut anchors: [Option<(usize, usize)>; 2] = [None, None];
    if y1 == y2 && x1.abs_diff(x2) == 1 {
        let bx: usize = x1.min(x2);
        anchors[0] = (y1 > 0).then(|| (bx, y1 - 1));
        anchors[1] = Some((bx, y1));
    } else if x1 == x2 && y1.abs_diff(y2) == 1 {
        let by: usize = y1.min(y2);
        anchors[0] = (x1 > 0).then(|| (x1 - 1, by));
        anchors[1] = Some((x1, by));
    } else {
        return false;
    }
    anchors.into_iter().flatten().any(|(bx, by)| {
        if bx + 1 >= grid.width || by + 1 >= grid.height {
            return false;
        }
        [(bx, by), (bx + 1, by), (bx, by + 1), (bx + 1, by + 1)]
            .iter()
            .all(|&(x, y)| {
                let cell: usize = grid.to_index(x, y);
                cell == candidate || used[cell]
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn used_map(grid: &Grid, cells: &[usize]) -> Vec<bool> {
        let mut used: Vec<bool> = vec![false; grid.num_cells()];
        for cell in cells {
            used[*cell] = true;
        }
        used
    }

    #[test]
    fn test_uturn_detection() {
        let grid: Grid = Grid::new(5, 5);
        // Traveling right from 11 to 12; stepping back left is a U-turn.
        assert!(is_uturn(&grid, &[11, 12], 11));
        assert!(!is_uturn(&grid, &[11, 12], 13));
        assert!(!is_uturn(&grid, &[11, 12], 17));
        // Too short to have a travel direction.
        assert!(!is_uturn(&grid, &[12], 13));
    }

    #[test]
    fn test_head_turn_detection() {
        let grid: Grid = Grid::new(5, 5);
        // Path 12 -> 13 travels right, so the head is pulled left and its
        // pull cell is 11.
        let path: [usize; 3] = [12, 13, 18];
        assert!(is_head_turn(&grid, &path, 11));
        assert!(!is_head_turn(&grid, &path, 17));
        assert!(!is_head_turn(&grid, &[12], 11));
    }

    #[test]
    fn test_2x2_loop_detection() {
        let grid: Grid = Grid::new(5, 5);
        // Path (0,0) -> (1,0) -> (1,1); stepping to (0,1) would fill the
        // 2x2 block.
        let used: Vec<bool> = used_map(&grid, &[0, 1, 6]);
        assert!(closes_2x2_loop(&grid, &used, 6, 5));
        // With corner (0,0) free, the block stays open.
        let used: Vec<bool> = used_map(&grid, &[1, 6]);
        assert!(!closes_2x2_loop(&grid, &used, 6, 5));
    }

    #[test]
    fn test_2x2_loop_with_other_rope_cells() {
        let grid: Grid = Grid::new(5, 5);
        // Cells 0 and 1 belong to an earlier rope; the growing path reaches
        // 6 and steps to 5.
        let used: Vec<bool> = used_map(&grid, &[0, 1, 6]);
        assert!(closes_2x2_loop(&grid, &used, 6, 5));
    }

    #[test]
    fn test_2x2_loop_at_the_grid_edge() {
        let grid: Grid = Grid::new(5, 5);
        // A pair on the top row has no 2x2 block above it.
        let used: Vec<bool> = used_map(&grid, &[20, 21, 22]);
        assert!(!closes_2x2_loop(&grid, &used, 21, 22));
    }
}
