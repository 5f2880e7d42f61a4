/*
random_path.rs

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

//! Carve a random path from the starting cell to the goal cell.
//!
//! The walk prefers moving down or right, which are the only moves that bring it closer to the
//! goal. From time to time it moves up or left instead, which makes the paths less predictable.

use log::debug;
use rand::Rng;
use std::time::Instant;

use super::grid::Coord;
use super::path;

/// Probability for a step to move backward (up or left).
pub const BACKWARD_PROBABILITY: f64 = 0.08;

/// [`RandomPath`] object.
pub struct RandomPath {
    /// Grid size.
    pub size: usize,

    /// Probability for a step to move backward.
    pub backward_probability: f64,

    /// Number of moves it took to reach the goal during the last generation.
    pub steps: usize,

    /// Number of backward moves during the last generation.
    pub backward_moves: usize,

    /// Duration in seconds it took to generate the last random path.
    pub duration: f32,
}

impl RandomPath {
    /// Create the object for a `size`×`size` grid.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            backward_probability: BACKWARD_PROBABILITY,
            steps: 0,
            backward_moves: 0,
            duration: 0.0,
        }
    }

    /// Generate and return a random path from (0,0) to (size-1,size-1).
    ///
    /// Cells that the walk visits several times appear only once in the returned path, at the
    /// position of their first visit.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> path::Path {
        let start: Instant = Instant::now();
        self.steps = 0;
        self.backward_moves = 0;

        let goal: Coord = Coord::new(self.size - 1, self.size - 1);
        let mut current: Coord = Coord::new(0, 0);
        let mut path: path::Path = path::Path::new(2 * self.size - 1);
        path.push(current);

        while current != goal {
            current = self.next_cell(current, rng);
            path.push(current);
            self.steps += 1;
        }

        self.duration = start.elapsed().as_secs_f32();
        debug!(
            "Carved path: {} cells, {} moves ({} backward)",
            path.len(),
            self.steps,
            self.backward_moves
        );
        path
    }

    /// Choose the next cell of the walk.
    fn next_cell<R: Rng + ?Sized>(&mut self, cell: Coord, rng: &mut R) -> Coord {
        if rng.random_bool(self.backward_probability) {
            let mut backward: Vec<Coord> = Vec::with_capacity(2);
            if cell.row > 0 {
                backward.push(Coord::new(cell.row - 1, cell.col));
            }
            if cell.col > 0 {
                backward.push(Coord::new(cell.row, cell.col - 1));
            }
            if !backward.is_empty() {
                self.backward_moves += 1;
                return backward[rng.random_range(0..backward.len())];
            }
        }

        let mut forward: Vec<Coord> = Vec::with_capacity(2);
        if cell.row + 1 < self.size {
            forward.push(Coord::new(cell.row + 1, cell.col));
        }
        if cell.col + 1 < self.size {
            forward.push(Coord::new(cell.row, cell.col + 1));
        }
        // Not empty: the walk stops at the goal, the only cell without forward moves
        forward[rng.random_range(0..forward.len())]
    }
}
