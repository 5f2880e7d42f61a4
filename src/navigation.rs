/*
navigation.rs

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

//! Walk a list of moves through the laser grid.
//!
//! The participant submits the moves as text, for example `D D R R`, `down,down,right` or
//! `DDRR`. [`parse_commands`] converts that text into [`Direction`] values, and [`run_path`]
//! follows them from the starting cell. Running a path never modifies the grid.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::GameError;
use crate::generator::grid::{CellKind, Coord, GridPuzzle};

/// Move direction.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Convert a one-letter move (`U`, `D`, `L`, or `R`, any case).
    fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'U' => Some(Direction::Up),
            'D' => Some(Direction::Down),
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            _ => None,
        }
    }

    /// Return the cell reached by moving from `cell`, or None when the move goes above or left
    /// of the grid.
    fn apply(&self, cell: Coord) -> Option<Coord> {
        match self {
            Direction::Up => cell.row.checked_sub(1).map(|r| Coord::new(r, cell.col)),
            Direction::Down => Some(Coord::new(cell.row + 1, cell.col)),
            Direction::Left => cell.col.checked_sub(1).map(|c| Coord::new(cell.row, c)),
            Direction::Right => Some(Coord::new(cell.row, cell.col + 1)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "U"),
            Direction::Down => write!(f, "D"),
            Direction::Left => write!(f, "L"),
            Direction::Right => write!(f, "R"),
        }
    }
}

/// Result of a path.
///
/// `step` is the index (from 0) of the move that stopped the walk.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The goal was reached after `steps` moves.
    Reached { steps: usize },

    /// The move at `step` leaves the grid. `at` is the last cell inside the grid.
    OutOfBounds { step: usize, at: Coord },

    /// The move at `step` lands on the laser at `at`.
    ObstacleHit { step: usize, at: Coord },

    /// All the moves were followed, and the walk stopped at `at` without reaching the goal.
    Incomplete { steps: usize, at: Coord },
}

impl Outcome {
    /// Whether the goal was reached.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Reached { .. })
    }
}

/// Outcome and visited cells of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRun {
    pub outcome: Outcome,

    /// Cells visited by the walk, starting cell included. For an [`Outcome::ObstacleHit`]
    /// outcome, the last cell is the laser.
    pub trail: Vec<Coord>,
}

/// Parse the participant's moves.
///
/// Tokens are separated by spaces or commas. A token is either a full word (`up`, `down`,
/// `left`, `right`) or a sequence of letters (`U`, `D`, `L`, `R`), in any case.
///
/// # Errors
///
/// The function returns [`GameError::InvalidCommand`] for an unknown token or when there is no
/// move at all.
pub fn parse_commands(text: &str) -> Result<Vec<Direction>, GameError> {
    let mut moves: Vec<Direction> = Vec::new();

    for token in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        match token.to_ascii_lowercase().as_str() {
            "up" => moves.push(Direction::Up),
            "down" => moves.push(Direction::Down),
            "left" => moves.push(Direction::Left),
            "right" => moves.push(Direction::Right),
            _ => {
                let letters: Option<Vec<Direction>> =
                    token.chars().map(Direction::from_letter).collect();
                match letters {
                    Some(l) => moves.extend(l),
                    None => return Err(GameError::InvalidCommand(token.to_string())),
                }
            }
        }
    }

    if moves.is_empty() {
        return Err(GameError::InvalidCommand(text.trim().to_string()));
    }
    Ok(moves)
}

/// Follow the moves from the starting cell.
pub fn run_path(grid: &GridPuzzle, moves: &[Direction]) -> PathRun {
    let mut current: Coord = grid.start();
    let mut trail: Vec<Coord> = Vec::with_capacity(moves.len() + 1);
    trail.push(current);

    for (step, direction) in moves.iter().enumerate() {
        let next: Coord = match direction.apply(current) {
            Some(c) if grid.contains(c) => c,
            _ => {
                return PathRun {
                    outcome: Outcome::OutOfBounds { step, at: current },
                    trail,
                };
            }
        };
        trail.push(next);
        match grid.cell_kind(next) {
            Some(CellKind::Obstacle) => {
                return PathRun {
                    outcome: Outcome::ObstacleHit { step, at: next },
                    trail,
                };
            }
            Some(CellKind::Goal) => {
                return PathRun {
                    outcome: Outcome::Reached { steps: step + 1 },
                    trail,
                };
            }
            Some(CellKind::Start) | Some(CellKind::Safe) | None => current = next,
        }
    }

    PathRun {
        outcome: Outcome::Incomplete {
            steps: moves.len(),
            at: current,
        },
        trail,
    }
}

/// Build the list of moves that follows the given cells. Consecutive cells that are not
/// adjacent are skipped.
pub fn moves_along(cells: &[Coord]) -> Vec<Direction> {
    cells
        .windows(2)
        .filter_map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            if b.row == a.row + 1 && b.col == a.col {
                Some(Direction::Down)
            } else if a.row == b.row + 1 && b.col == a.col {
                Some(Direction::Up)
            } else if b.col == a.col + 1 && b.row == a.row {
                Some(Direction::Right)
            } else if a.col == b.col + 1 && b.row == a.row {
                Some(Direction::Left)
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn training_grid() -> GridPuzzle {
        GridPuzzle::from_rows(&["S#...", ".#.#.", "...#.", "##...", "...#G"]).unwrap()
    }

    #[test]
    fn parse_accepts_words_letters_and_commas() {
        use Direction::*;
        assert_eq!(
            parse_commands("D d,RIGHT  up,lr").unwrap(),
            vec![Down, Down, Right, Up, Left, Right]
        );
        assert_eq!(parse_commands("DDRR").unwrap(), vec![Down, Down, Right, Right]);
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        assert_eq!(
            parse_commands("D D X"),
            Err(GameError::InvalidCommand("X".to_string()))
        );
        assert_eq!(
            parse_commands("D north"),
            Err(GameError::InvalidCommand("north".to_string()))
        );
        assert!(matches!(
            parse_commands("  , "),
            Err(GameError::InvalidCommand(_))
        ));
    }

    #[test]
    fn reaches_the_goal() {
        let grid: GridPuzzle = training_grid();
        let run: PathRun = run_path(&grid, &parse_commands("D D R R D R R D").unwrap());
        assert_eq!(run.outcome, Outcome::Reached { steps: 8 });
        assert_eq!(run.trail.len(), 9);
        assert_eq!(run.trail.last(), Some(&Coord::new(4, 4)));
    }

    #[test]
    fn stops_on_the_first_laser() {
        let grid: GridPuzzle = training_grid();
        let run: PathRun = run_path(&grid, &parse_commands("R D D").unwrap());
        assert_eq!(
            run.outcome,
            Outcome::ObstacleHit {
                step: 0,
                at: Coord::new(0, 1)
            }
        );
        assert_eq!(run.trail, vec![Coord::new(0, 0), Coord::new(0, 1)]);
    }

    #[test]
    fn stops_when_leaving_the_grid() {
        let grid: GridPuzzle = training_grid();
        let run: PathRun = run_path(&grid, &parse_commands("D U U D").unwrap());
        assert_eq!(
            run.outcome,
            Outcome::OutOfBounds {
                step: 2,
                at: Coord::new(0, 0)
            }
        );

        let run: PathRun = run_path(&grid, &parse_commands("L").unwrap());
        assert_eq!(
            run.outcome,
            Outcome::OutOfBounds {
                step: 0,
                at: Coord::new(0, 0)
            }
        );
    }

    #[test]
    fn incomplete_walk() {
        let grid: GridPuzzle = training_grid();
        let run: PathRun = run_path(&grid, &parse_commands("D D R").unwrap());
        assert_eq!(
            run.outcome,
            Outcome::Incomplete {
                steps: 3,
                at: Coord::new(2, 1)
            }
        );
        assert!(!run.outcome.is_success());
    }

    #[test]
    fn goal_stops_the_walk_early() {
        let grid: GridPuzzle = GridPuzzle::from_rows(&["S.", ".G"]).unwrap();
        let run: PathRun = run_path(&grid, &parse_commands("R D L L L").unwrap());
        assert_eq!(run.outcome, Outcome::Reached { steps: 2 });
    }

    #[test]
    fn running_twice_gives_the_same_result() {
        let grid: GridPuzzle = training_grid();
        let before: GridPuzzle = grid.clone();
        for text in ["D D R R D R R D", "R", "D D D", "D D R R R R R"] {
            let moves: Vec<Direction> = parse_commands(text).unwrap();
            assert_eq!(run_path(&grid, &moves), run_path(&grid, &moves));
        }
        assert_eq!(grid, before);
    }

    #[test]
    fn moves_follow_the_solution_path() {
        let grid: GridPuzzle = training_grid();
        let moves: Vec<Direction> = moves_along(grid.solution_path().get());
        assert!(run_path(&grid, &moves).outcome.is_success());
    }
}
