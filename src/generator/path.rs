/*
path.rs

Copyright 2025 Hervé Quatremain

This file is part of Nightfall.

Nightfall is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Nightfall is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Nightfall. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Path in the laser grid.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::grid::Coord;

/// Path object.
///
/// Cells are stored in the order they were first visited. Pushing a cell that is already in the
/// path has no effect.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Path {
    /// Path as an ordered list of cells.
    path: Vec<Coord>,

    /// Stores the visited status of the cells.
    /// Instead of looking for the cell in the [`Path::path`] vector, this
    /// [`std::collections::HashSet`] speeds up the lookup.
    visited: HashSet<Coord>,
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Path {
    /// Create a [`Path`] object.
    pub fn new(capacity: usize) -> Self {
        Self {
            path: Vec::with_capacity(capacity),
            visited: HashSet::with_capacity(capacity),
        }
    }

    /// Create a [`Path`] object from a list of cells. Duplicated cells are dropped.
    pub fn from_cells(cells: &[Coord]) -> Self {
        let mut path: Path = Path::new(cells.len());
        for cell in cells {
            path.push(*cell);
        }
        path
    }

    /// Add a cell to the path, unless the path already goes through it.
    ///
    /// Return whether the cell was added.
    pub fn push(&mut self, cell: Coord) -> bool {
        if !self.visited.insert(cell) {
            return false;
        }
        self.path.push(cell);
        true
    }

    /// Get the number of cells in the path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the path has no cell.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Whether the cell is in the path or not.
    pub fn contains(&self, cell: Coord) -> bool {
        self.visited.contains(&cell)
    }

    /// Return a reference to the path vector.
    pub fn get(&self) -> &Vec<Coord> {
        &self.path
    }

    /// Return the first cell in the path.
    pub fn get_first(&self) -> Option<Coord> {
        self.path.first().copied()
    }

    /// Return the last cell in the path.
    pub fn get_last(&self) -> Option<Coord> {
        self.path.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revisits_are_dropped() {
        let mut path: Path = Path::new(4);
        assert!(path.push(Coord::new(0, 0)));
        assert!(path.push(Coord::new(1, 0)));
        assert!(!path.push(Coord::new(0, 0)));
        assert!(path.push(Coord::new(1, 1)));
        assert_eq!(path.len(), 3);
        assert_eq!(path.get_first(), Some(Coord::new(0, 0)));
        assert_eq!(path.get_last(), Some(Coord::new(1, 1)));
        assert!(path.contains(Coord::new(1, 0)));
        assert!(!path.contains(Coord::new(0, 1)));
    }

    #[test]
    fn equality_ignores_the_lookup_set() {
        let a: Path = Path::from_cells(&[Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 0)]);
        let b: Path = Path::from_cells(&[Coord::new(0, 0), Coord::new(0, 1)]);
        assert_eq!(a, b);
    }
}
