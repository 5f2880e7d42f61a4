/*
mission_log.rs

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

//! Mission log.
//!
//! Each session keeps a journal of what the participant did. The messages are also forwarded to
//! the [`log`] facade at the info level.

use chrono::{DateTime, Local};
use log::info;
use serde::{Deserialize, Serialize};

/// Journal entry.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

/// Journal of a session.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MissionLog {
    entries: Vec<LogEntry>,
}

impl MissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message to the journal.
    pub fn add(&mut self, message: String) {
        info!("{message}");
        self.entries.push(LogEntry {
            timestamp: Local::now(),
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Return the last message.
    pub fn last_message(&self) -> Option<&str> {
        self.entries.last().map(|e| e.message.as_str())
    }

    /// Text representation of the journal, one entry per line.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("[{}] {}\n", e.timestamp.format("%H:%M:%S"), e.message))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_kept_in_order() {
        let mut log: MissionLog = MissionLog::new();
        log.add("first".to_string());
        log.add("second".to_string());
        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.last_message(), Some("second"));
        let text: String = log.render();
        assert!(text.find("first").unwrap() < text.find("second").unwrap());
        assert_eq!(text.lines().count(), 2);
    }
}
