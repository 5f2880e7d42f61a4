/*
grid.rs

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

//! Laser grid for the third round.
//!
//! The grid is a square of `size`×`size` cells. The participant starts in the top-left corner
//! and must reach the bottom-right corner without touching a laser (obstacle).
//!
//! [`generate_grid`] builds a random grid in four steps:
//!
//! 1. A random path is carved from the starting cell to the goal cell (see
//!    [`super::random_path::RandomPath`]).
//! 2. Each cell outside that path becomes an obstacle with the given probability.
//! 3. A breadth-first search verifies that the goal can be reached.
//! 4. If not, the obstacles lying on the carved path are removed. The grid is never generated
//!    again: this single repair step guarantees that the generation terminates.

use log::{Level, debug, log_enabled, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use super::path::Path;
use super::random_path::RandomPath;

/// Cell coordinates. Row 0 is the top row, column 0 the left column.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Kind of a grid cell.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellKind {
    Start,
    Goal,
    Obstacle,
    Safe,
}

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum GridError {
    /// The grid must be at least 2×2, otherwise the start and the goal are the same cell.
    TooSmall(usize),

    /// The textual layout is not a valid grid.
    InvalidLayout(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GridError::TooSmall(size) => write!(f, "grid size {size} is too small"),
            GridError::InvalidLayout(msg) => write!(f, "invalid grid layout: {msg}"),
        }
    }
}

impl std::error::Error for GridError {}

/// Laser grid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GridPuzzle {
    /// Number of rows and columns.
    size: usize,

    /// Obstacle flags, row by row.
    obstacles: Vec<bool>,

    /// Cells from the start to the goal. Only used to give hints.
    solution_path: Path,

    /// Whether the generator had to clear the obstacles on the carved path.
    repaired: bool,
}

impl GridPuzzle {
    /// Build a grid from its textual representation.
    ///
    /// Each string is a row. `S` is the start (top-left), `G` the goal (bottom-right), `#` an
    /// obstacle, and `.` a safe cell. The solution path is the shortest route, or empty when the
    /// goal cannot be reached.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GridError> {
        let size: usize = rows.len();
        if size < 2 {
            return Err(GridError::TooSmall(size));
        }
        let mut obstacles: Vec<bool> = Vec::with_capacity(size * size);
        for (r, row) in rows.iter().enumerate() {
            let cells: Vec<char> = row.chars().collect();
            if cells.len() != size {
                return Err(GridError::InvalidLayout(format!(
                    "row {r} has {} cells instead of {size}",
                    cells.len()
                )));
            }
            for (c, cell) in cells.iter().enumerate() {
                let expected: Option<char> = if r == 0 && c == 0 {
                    Some('S')
                } else if r == size - 1 && c == size - 1 {
                    Some('G')
                } else {
                    None
                };
                match (cell, expected) {
                    ('S', Some('S')) | ('G', Some('G')) | ('.', None) => obstacles.push(false),
                    ('#', None) => obstacles.push(true),
                    _ => {
                        return Err(GridError::InvalidLayout(format!(
                            "unexpected `{cell}` at ({r},{c})"
                        )));
                    }
                }
            }
        }

        let mut grid: GridPuzzle = Self {
            size,
            obstacles,
            solution_path: Path::default(),
            repaired: false,
        };
        if let Some(route) = grid.shortest_route() {
            grid.solution_path = Path::from_cells(&route);
        }
        Ok(grid)
    }

    /// Number of rows and columns.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Starting cell.
    pub fn start(&self) -> Coord {
        Coord::new(0, 0)
    }

    /// Goal cell.
    pub fn goal(&self) -> Coord {
        Coord::new(self.size - 1, self.size - 1)
    }

    /// Whether the cell is inside the grid.
    pub fn contains(&self, cell: Coord) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    /// Return the kind of the given cell, or None if the cell is outside the grid.
    pub fn cell_kind(&self, cell: Coord) -> Option<CellKind> {
        if !self.contains(cell) {
            return None;
        }
        if cell == self.start() {
            Some(CellKind::Start)
        } else if cell == self.goal() {
            Some(CellKind::Goal)
        } else if self.obstacles[self.index(cell)] {
            Some(CellKind::Obstacle)
        } else {
            Some(CellKind::Safe)
        }
    }

    /// Whether the cell holds a laser.
    pub fn is_obstacle(&self, cell: Coord) -> bool {
        self.cell_kind(cell) == Some(CellKind::Obstacle)
    }

    /// Number of obstacles.
    pub fn num_obstacles(&self) -> usize {
        self.obstacles.iter().filter(|o| **o).count()
    }

    /// Path used to give hints.
    pub fn solution_path(&self) -> &Path {
        &self.solution_path
    }

    /// Whether the generator had to clear the obstacles on the carved path.
    pub fn is_repaired(&self) -> bool {
        self.repaired
    }

    /// Whether a route of non-obstacle cells connects the start and the goal.
    pub fn has_route(&self) -> bool {
        self.shortest_route().is_some()
    }

    /// Return the shortest route from the start to the goal, both included.
    pub fn shortest_route(&self) -> Option<Vec<Coord>> {
        let mut previous: Vec<Option<usize>> = vec![None; self.size * self.size];
        let mut visited: Vec<bool> = vec![false; self.size * self.size];
        let mut queue: VecDeque<Coord> = VecDeque::new();

        let start: Coord = self.start();
        visited[self.index(start)] = true;
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            if cell == self.goal() {
                let mut route: Vec<Coord> = vec![cell];
                let mut i: usize = self.index(cell);
                while let Some(p) = previous[i] {
                    route.push(self.coord(p));
                    i = p;
                }
                route.reverse();
                return Some(route);
            }
            for next in self.neighbors(cell) {
                let i: usize = self.index(next);
                if !visited[i] && !self.obstacles[i] {
                    visited[i] = true;
                    previous[i] = Some(self.index(cell));
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Text representation of the grid.
    ///
    /// Cells in `trail` are drawn with `*`. When `revealed` is None, all the obstacles are
    /// drawn. Otherwise, only the listed obstacles are drawn and the others look safe.
    pub fn render(&self, trail: &[Coord], revealed: Option<&[Coord]>) -> String {
        let mut out: String = String::with_capacity((self.size + 1) * self.size);
        for row in 0..self.size {
            for col in 0..self.size {
                let cell: Coord = Coord::new(row, col);
                let c: char = match self.cell_kind(cell) {
                    Some(CellKind::Start) => 'S',
                    Some(CellKind::Goal) => 'G',
                    Some(CellKind::Obstacle)
                        if revealed.is_none_or(|cells| cells.contains(&cell)) =>
                    {
                        '#'
                    }
                    _ if trail.contains(&cell) => '*',
                    _ => '.',
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }

    /// Mark the cells outside the solution path as obstacles, each one with the given
    /// probability.
    fn scatter_obstacles<R: Rng + ?Sized>(&mut self, rng: &mut R, obstacle_probability: f64) {
        let p: f64 = obstacle_probability.clamp(0.0, 1.0);
        for i in 0..self.obstacles.len() {
            let cell: Coord = self.coord(i);
            if self.solution_path.contains(cell) || cell == self.start() || cell == self.goal() {
                continue;
            }
            self.obstacles[i] = rng.random_bool(p);
        }
    }

    /// Remove the obstacles that lie on the solution path.
    fn clear_path_obstacles(&mut self) {
        for i in 0..self.solution_path.len() {
            let cell: Coord = self.solution_path.get()[i];
            let index: usize = self.index(cell);
            self.obstacles[index] = false;
        }
        self.repaired = true;
    }

    fn index(&self, cell: Coord) -> usize {
        cell.row * self.size + cell.col
    }

    fn coord(&self, index: usize) -> Coord {
        Coord::new(index / self.size, index % self.size)
    }

    /// Cells above, below, left, and right of the given cell, inside the grid.
    fn neighbors(&self, cell: Coord) -> Vec<Coord> {
        let mut ret: Vec<Coord> = Vec::with_capacity(4);
        if cell.row > 0 {
            ret.push(Coord::new(cell.row - 1, cell.col));
        }
        if cell.row + 1 < self.size {
            ret.push(Coord::new(cell.row + 1, cell.col));
        }
        if cell.col > 0 {
            ret.push(Coord::new(cell.row, cell.col - 1));
        }
        if cell.col + 1 < self.size {
            ret.push(Coord::new(cell.row, cell.col + 1));
        }
        ret
    }
}

/// Generate a random laser grid.
///
/// # Errors
///
/// The function returns an error if `size` is lower than 2.
pub fn generate_grid<R: Rng + ?Sized>(
    rng: &mut R,
    size: usize,
    obstacle_probability: f64,
) -> Result<GridPuzzle, GridError> {
    if size < 2 {
        return Err(GridError::TooSmall(size));
    }

    let mut random_path: RandomPath = RandomPath::new(size);
    let mut grid: GridPuzzle = GridPuzzle {
        size,
        obstacles: vec![false; size * size],
        solution_path: random_path.generate(rng),
        repaired: false,
    };
    grid.scatter_obstacles(rng, obstacle_probability);

    if !grid.has_route() {
        warn!("No route in the generated grid: clearing the carved path");
        grid.clear_path_obstacles();
    }

    if log_enabled!(Level::Debug) {
        debug!(
            "Grid {size}x{size} with {} obstacles:\n{}",
            grid.num_obstacles(),
            grid.render(grid.solution_path.get(), None)
        );
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_grids_are_always_solvable() {
        let mut rng: StdRng = StdRng::seed_from_u64(42);
        for size in 2..10 {
            for p in [0.0, 0.3, 0.6, 0.9, 1.0] {
                for _ in 0..20 {
                    let grid: GridPuzzle = generate_grid(&mut rng, size, p).unwrap();
                    assert!(grid.has_route());
                    assert_eq!(grid.cell_kind(Coord::new(0, 0)), Some(CellKind::Start));
                    assert_eq!(
                        grid.cell_kind(Coord::new(size - 1, size - 1)),
                        Some(CellKind::Goal)
                    );
                    for cell in grid.solution_path().get() {
                        assert!(!grid.is_obstacle(*cell));
                    }
                }
            }
        }
    }

    #[test]
    fn full_probability_blocks_everything_off_the_path() {
        let mut rng: StdRng = StdRng::seed_from_u64(1);
        let grid: GridPuzzle = generate_grid(&mut rng, 6, 1.0).unwrap();
        assert_eq!(grid.num_obstacles(), 36 - grid.solution_path().len());
    }

    #[test]
    fn zero_probability_has_no_obstacle() {
        let mut rng: StdRng = StdRng::seed_from_u64(1);
        let grid: GridPuzzle = generate_grid(&mut rng, 6, 0.0).unwrap();
        assert_eq!(grid.num_obstacles(), 0);
    }

    #[test]
    fn tiny_grid_is_refused() {
        let mut rng: StdRng = StdRng::seed_from_u64(1);
        assert_eq!(generate_grid(&mut rng, 1, 0.3), Err(GridError::TooSmall(1)));
        assert_eq!(generate_grid(&mut rng, 0, 0.3), Err(GridError::TooSmall(0)));
    }

    #[test]
    fn repair_clears_the_carved_path() {
        let carved: Vec<Coord> = vec![
            Coord::new(0, 0),
            Coord::new(0, 1),
            Coord::new(1, 1),
            Coord::new(2, 1),
            Coord::new(2, 2),
        ];
        let mut grid: GridPuzzle = GridPuzzle {
            size: 3,
            obstacles: vec![false, true, true, true, true, true, true, true, false],
            solution_path: Path::from_cells(&carved),
            repaired: false,
        };
        assert!(!grid.has_route());
        grid.clear_path_obstacles();
        assert!(grid.has_route());
        assert!(grid.is_repaired());
        assert!(grid.is_obstacle(Coord::new(0, 2)));
        assert!(grid.is_obstacle(Coord::new(1, 0)));
        assert_eq!(grid.num_obstacles(), 4);
    }

    #[test]
    fn layout_parsing() {
        let grid: GridPuzzle =
            GridPuzzle::from_rows(&["S#...", ".#.#.", "...#.", "##...", "...#G"]).unwrap();
        assert_eq!(grid.size(), 5);
        assert_eq!(grid.num_obstacles(), 7);
        assert!(grid.is_obstacle(Coord::new(3, 1)));
        assert_eq!(grid.cell_kind(Coord::new(5, 0)), None);
        // Shortest route: 2*(5-1) moves
        assert_eq!(grid.solution_path().len(), 9);

        let blocked: GridPuzzle = GridPuzzle::from_rows(&["S#", "#G"]).unwrap();
        assert!(!blocked.has_route());
        assert!(blocked.solution_path().is_empty());

        assert!(matches!(
            GridPuzzle::from_rows(&["S.", "."]),
            Err(GridError::InvalidLayout(_))
        ));
        assert!(matches!(
            GridPuzzle::from_rows(&["#.", ".G"]),
            Err(GridError::InvalidLayout(_))
        ));
    }

    #[test]
    fn render_hides_unrevealed_obstacles() {
        let grid: GridPuzzle = GridPuzzle::from_rows(&["S#.", "..#", "..G"]).unwrap();
        assert_eq!(grid.render(&[], None), "S#.\n..#\n..G\n");
        assert_eq!(
            grid.render(&[Coord::new(1, 0)], Some(&[Coord::new(0, 1)])),
            "S#.\n*..\n..G\n"
        );
    }
}
