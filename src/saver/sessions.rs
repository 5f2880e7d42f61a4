/*
sessions.rs

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

//! Save and retrieve the records of the finished sessions.
//!
//! A record is appended each time a session escapes or fails. The records feed the leaderboard
//! and the observer's list of recent sessions.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{File, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use crate::game::Status;
use crate::leaderboard::Leaderboard;

/// Number of sessions returned by [`SaverSessions::recent`].
pub const RECENT_LIMIT: usize = 100;

/// Record of a finished session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub username: String,
    pub display_name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,

    /// Final status: [`Status::Escaped`] or [`Status::Failed`].
    pub status: Status,

    pub hints_used: u32,
    pub seconds_remaining: u32,

    /// Mission time used, in seconds.
    pub elapsed_seconds: u32,

    /// Only for the escaped sessions.
    pub completion_token: Option<String>,
}

impl SessionRecord {
    /// One-line description for the observer.
    pub fn describe(&self) -> String {
        format!(
            "{} {:<12} {:<16} {:<8} {:02}:{:02} hints {} {}",
            self.ended_at.format("%Y-%m-%d %H:%M"),
            self.username,
            self.display_name,
            self.status.to_string(),
            self.elapsed_seconds / 60,
            self.elapsed_seconds % 60,
            self.hints_used,
            self.completion_token.as_deref().unwrap_or("-")
        )
    }
}

/// Object to save and retrieve the session records.
pub struct SaverSessions {
    /// Absolute path to the save file.
    save_file: PathBuf,
}

impl SaverSessions {
    /// Create a [`SaverSessions`] object.
    ///
    /// The provided [`PathBuf`] is the path to the directory where the records are saved.
    pub fn new(mut data_dir: PathBuf) -> Self {
        data_dir.push("sessions.json");
        debug!("Session records file: {data_dir:?}");
        Self {
            save_file: data_dir,
        }
    }

    /// Retrieve all the records in the order they were appended.
    ///
    /// Return an empty list if the records file does not exist.
    pub fn get_records(&self) -> Result<Vec<SessionRecord>, Box<dyn Error>> {
        let file: File = match File::open(&self.save_file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(Vec::new()),
                _ => return Err(Box::new(error)),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let records: Vec<SessionRecord> = serde_json::from_reader(reader)?;
        Ok(records)
    }

    /// Append a record.
    pub fn append(&self, record: &SessionRecord) -> Result<(), Box<dyn Error>> {
        let mut records: Vec<SessionRecord> = self.get_records()?;
        records.push(record.clone());

        let file: File = File::create(&self.save_file)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &records)?;
        writer.flush()?;
        debug!("Session record saved for {}", record.username);
        Ok(())
    }

    /// Build the leaderboard from the escaped sessions.
    pub fn leaderboard(&self) -> Result<Leaderboard, Box<dyn Error>> {
        Ok(Leaderboard::from_records(&self.get_records()?))
    }

    /// Return the most recent records, newest first.
    pub fn recent(&self) -> Result<Vec<SessionRecord>, Box<dyn Error>> {
        let mut records: Vec<SessionRecord> = self.get_records()?;
        // Stable sort: records that ended at the same time stay in append order
        records.reverse();
        records.sort_by(|a, b| b.ended_at.cmp(&a.ended_at));
        records.truncate(RECENT_LIMIT);
        Ok(records)
    }

    /// Delete the records file.
    pub fn delete_save(&self) {
        let _ = remove_file(&self.save_file);
    }
}
