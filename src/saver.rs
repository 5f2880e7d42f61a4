/*
saver.rs

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

//! Persistent stores.
//!
//! All the stores are JSON files in the data directory:
//!
//! * [`agents`]: the participant credentials (`agents.json`).
//! * [`sessions`]: the records of the finished sessions (`sessions.json`).
//! * [`roster`]: the latest progress of each participant (`roster.json`).
//!
//! The sessions never write the files themselves. They publish their progress to the
//! [`worker::Writer`] background thread, which updates the roster and session files.

pub mod agents;
pub mod roster;
pub mod sessions;
pub mod worker;
