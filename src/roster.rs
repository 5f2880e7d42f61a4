/*
roster.rs

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

//! Progress of the participants, as seen by the observer.
//!
//! Each session publishes a [`SessionSummary`] when it changes. The [`Roster`] object keeps the
//! latest summary for each participant. It is saved in the data directory by the background
//! writer (see [`crate::saver::worker`]) so that the observer console, which may run in another
//! process, can read it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::game::{Round, Status};

/// Snapshot of a session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub username: String,
    pub display_name: String,

    /// Round number (1 to 3).
    pub round: u8,

    /// Digits collected in round 1.
    pub rewards: Vec<String>,

    pub hints_used: u32,

    /// Remaining round-3 attempts.
    pub round_attempts: u32,

    pub status: Status,

    pub seconds_remaining: u32,

    /// Time of the snapshot.
    pub updated_at: DateTime<Utc>,
}

impl SessionSummary {
    /// One-line description for the observer.
    pub fn describe(&self) -> String {
        let round: String = match Round::from_repr(self.round) {
            Some(r) => r.to_string(),
            None => format!("Round {}", self.round),
        };
        format!(
            "{:<12} {:<16} {:<28} rewards [{}] hints {} attempts {} {:02}:{:02} {}",
            self.username,
            self.display_name,
            round,
            self.rewards.join(" "),
            self.hints_used,
            self.round_attempts,
            self.seconds_remaining / 60,
            self.seconds_remaining % 60,
            self.status
        )
    }
}

/// Latest summary of every participant.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Roster {
    /// Summaries indexed by username.
    players: HashMap<String, SessionSummary>,
}

impl Roster {
    /// Create an empty [`Roster`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the summary of the participant.
    pub fn update(&mut self, summary: SessionSummary) {
        self.players.insert(summary.username.clone(), summary);
    }

    /// Remove the participant.
    pub fn remove(&mut self, username: &str) -> Option<SessionSummary> {
        self.players.remove(username)
    }

    pub fn get(&self, username: &str) -> Option<&SessionSummary> {
        self.players.get(username)
    }

    /// Return the summaries, most recently updated first.
    pub fn summaries(&self) -> Vec<&SessionSummary> {
        let mut list: Vec<&SessionSummary> = self.players.values().collect();
        list.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.username.cmp(&b.username))
        });
        list
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn summary(username: &str, round: u8, minutes_ago: i64) -> SessionSummary {
        SessionSummary {
            username: username.to_string(),
            display_name: username.to_uppercase(),
            round,
            rewards: Vec::new(),
            hints_used: 0,
            round_attempts: 3,
            status: Status::InProgress,
            seconds_remaining: 600,
            updated_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn latest_summary_wins() {
        let mut roster: Roster = Roster::new();
        roster.update(summary("alice", 1, 5));
        roster.update(summary("bob", 1, 3));
        roster.update(summary("alice", 2, 1));
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get("alice").map(|s| s.round), Some(2));

        let names: Vec<&str> = roster
            .summaries()
            .iter()
            .map(|s| s.username.as_str())
            .collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn description_names_the_round() {
        let text: String = summary("alice", 2, 0).describe();
        assert!(text.contains("Round 2: decode message"));
        assert!(text.contains("10:00"));
        assert!(text.contains("In progress"));
    }
}
