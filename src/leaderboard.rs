/*
leaderboard.rs

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

//! Leaderboard of the successful missions.
//!
//! The [`Leaderboard`] object keeps the escaped sessions sorted by the time it took to escape.
//! It is built from the session records (see [`crate::saver::sessions`]), so failed sessions
//! never make it to the board.

use serde::{Deserialize, Serialize};

use crate::game::Status;
use crate::saver::sessions::SessionRecord;

/// Number of entries in the leaderboard.
pub const BOARD_SIZE: usize = 50;

/// Sorted list of the fastest escapes.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Leaderboard {
    /// Sorted records. The number of records is controlled by the [`BOARD_SIZE`] constant.
    top: Vec<SessionRecord>,
}

impl Leaderboard {
    /// Create an empty [`Leaderboard`] object.
    pub fn new() -> Self {
        Self {
            top: Vec::with_capacity(BOARD_SIZE),
        }
    }

    /// Build the leaderboard from session records. Only the escaped sessions are kept.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        let mut board: Leaderboard = Self::new();
        for record in records {
            board.add_record(record);
        }
        board
    }

    /// Add a record to the board and return its position, or None if the record does not make
    /// it to the board.
    ///
    /// The returned position starts at 1 (fastest escape). On equal times, the earlier record
    /// stays in front.
    pub fn add_record(&mut self, record: &SessionRecord) -> Option<usize> {
        if record.status != Status::Escaped {
            return None;
        }
        let position: usize = self
            .top
            .iter()
            .position(|r| record.elapsed_seconds < r.elapsed_seconds)
            .unwrap_or(self.top.len());
        if position >= BOARD_SIZE {
            return None;
        }
        self.top.insert(position, record.clone());
        self.top.truncate(BOARD_SIZE);
        Some(position + 1)
    }

    /// Return the records, fastest first.
    pub fn entries(&self) -> &[SessionRecord] {
        &self.top
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty()
    }

    /// Text representation of the board, one line per record.
    pub fn render(&self) -> String {
        self.top
            .iter()
            .enumerate()
            .map(|(i, r)| {
                format!(
                    "{:>3}. {:<12} {:<16} {:02}:{:02}  hints {}  {}\n",
                    i + 1,
                    r.username,
                    r.display_name,
                    r.elapsed_seconds / 60,
                    r.elapsed_seconds % 60,
                    r.hints_used,
                    r.ended_at.format("%Y-%m-%d %H:%M")
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(username: &str, status: Status, elapsed: u32) -> SessionRecord {
        SessionRecord {
            username: username.to_string(),
            display_name: username.to_string(),
            started_at: Utc::now(),
            ended_at: Utc::now(),
            status,
            hints_used: 0,
            seconds_remaining: 1200 - elapsed,
            elapsed_seconds: elapsed,
            completion_token: None,
        }
    }

    #[test]
    fn sorted_by_elapsed_time() {
        let records: Vec<SessionRecord> = vec![
            record("slow", Status::Escaped, 900),
            record("failed", Status::Failed, 100),
            record("fast", Status::Escaped, 300),
            record("tied", Status::Escaped, 900),
        ];
        let board: Leaderboard = Leaderboard::from_records(&records);
        let names: Vec<&str> = board.entries().iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["fast", "slow", "tied"]);
    }

    #[test]
    fn board_is_capped() {
        let mut board: Leaderboard = Leaderboard::new();
        for i in 0..BOARD_SIZE as u32 {
            assert!(board.add_record(&record("a", Status::Escaped, 100 + i)).is_some());
        }
        assert_eq!(board.add_record(&record("late", Status::Escaped, 1000)), None);
        assert_eq!(board.add_record(&record("best", Status::Escaped, 10)), Some(1));
        assert_eq!(board.entries().len(), BOARD_SIZE);
        assert_eq!(board.entries()[0].username, "best");
    }
}
