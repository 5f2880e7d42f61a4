/*
lib.rs

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

//! OPERATION: NIGHTFALL, a three-round escape room game.
//!
//! A participant logs in, and then has a limited time to go through three rounds:
//! riddles that reward the digits of an unlock code, a code-tracing puzzle, and either a laser
//! grid to cross or a cryptarithm to solve. An observer registers the participants and follows
//! their progress.
//!
//! The game state lives in [`game::Session`]. The [`console`] module drives it from a terminal,
//! and the [`saver`] modules keep the credentials and the session results in JSON files.

pub mod auth;
pub mod cli_options;
pub mod config;
pub mod console;
pub mod errors;
pub mod game;
pub mod generator;
pub mod leaderboard;
pub mod mission_log;
pub mod navigation;
pub mod roster;
pub mod saver;
pub mod timer;
pub mod token;
