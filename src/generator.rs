/*
generator.rs

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

//! Puzzle content and laser grid generation.
//!
//! [`puzzles`] stores the static content of the rounds: the round-1 riddles, the round-2
//! code-tracing puzzles, and the round-3 cryptarithms. The code-tracing puzzle and the
//! cryptarithm are randomly selected when the participant enters the round.
//!
//! The round-3 laser grid is procedurally generated by [`grid::generate_grid`]:
//!
//! * A random path is carved from the top-left corner to the bottom-right corner by a
//!   [`random_path::RandomPath`] object. The cells of that path are stored in a [`path::Path`]
//!   object, which is later used to give hints.
//!
//! * The other cells randomly receive lasers, and a breadth-first search verifies that the goal
//!   is reachable. If it is not, the lasers on the carved path are removed.

pub mod grid;
pub mod path;
pub mod puzzles;
pub mod random_path;
