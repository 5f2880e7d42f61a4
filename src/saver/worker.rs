/*
worker.rs

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

//! Background writer for the session progress and records.
//!
//! The sessions must not wait for the disk. [`Writer`] implements [`SessionSink`]: each call
//! queues a job in an [`async_channel`] and returns immediately. A background thread receives
//! the jobs and updates the roster and the session records files.
//!
//! A failing write is logged and dropped. It never changes the state of the game.

use log::{debug, warn};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

use crate::errors::GameError;
use crate::game::SessionSink;
use crate::roster::SessionSummary;
use crate::saver::roster::SaverRoster;
use crate::saver::sessions::{SaverSessions, SessionRecord};

/// Work for the writer thread.
enum Job {
    Progress(SessionSummary),
    Completion(SessionRecord),
}

/// Handle on the writer thread.
pub struct Writer {
    sender: async_channel::Sender<Job>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Writer {
    /// Start the writer thread. The files are stored in the provided directory.
    pub fn spawn(data_dir: PathBuf) -> Self {
        let (sender, receiver) = async_channel::unbounded::<Job>();

        let handle: JoinHandle<()> = thread::spawn(move || {
            let roster: SaverRoster = SaverRoster::new(data_dir.clone());
            let sessions: SaverSessions = SaverSessions::new(data_dir);

            // The loop ends when the channel is closed and empty
            while let Ok(job) = receiver.recv_blocking() {
                let result: Result<(), Box<dyn Error>> = match &job {
                    Job::Progress(summary) => roster.update(summary),
                    Job::Completion(record) => sessions.append(record),
                };
                if let Err(e) = result {
                    warn!("{}", GameError::PersistenceUnavailable(e.to_string()));
                }
            }
            debug!("Writer stopped");
        });

        Self {
            sender,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Write the pending jobs and stop the thread.
    pub fn shutdown(&self) {
        self.sender.close();
        let handle: Option<JoinHandle<()>> = match self.handle.lock() {
            Ok(mut h) => h.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(h) = handle
            && h.join().is_err()
        {
            warn!("The writer thread panicked");
        }
    }

    fn queue(&self, job: Job) {
        if self.sender.try_send(job).is_err() {
            warn!(
                "{}",
                GameError::PersistenceUnavailable("the writer is stopped".to_string())
            );
        }
    }
}

impl SessionSink for Writer {
    fn publish_progress(&self, summary: &SessionSummary) {
        self.queue(Job::Progress(summary.clone()));
    }

    fn record_completion(&self, record: &SessionRecord) {
        self.queue(Job::Completion(record.clone()));
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Status;
    use chrono::Utc;
    use std::fs;

    #[test]
    fn jobs_are_written_before_shutdown() {
        let dir: PathBuf =
            std::env::temp_dir().join(format!("nightfall-writer-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let roster: SaverRoster = SaverRoster::new(dir.clone());
        let sessions: SaverSessions = SaverSessions::new(dir.clone());
        roster.delete_save();
        sessions.delete_save();

        let writer: Writer = Writer::spawn(dir.clone());
        let summary: SessionSummary = SessionSummary {
            username: "alice".to_string(),
            display_name: "Alice".to_string(),
            round: 3,
            rewards: vec!["4".to_string()],
            hints_used: 1,
            round_attempts: 0,
            status: Status::Failed,
            seconds_remaining: 100,
            updated_at: Utc::now(),
        };
        writer.publish_progress(&summary);
        writer.record_completion(&SessionRecord {
            username: "alice".to_string(),
            display_name: "Alice".to_string(),
            started_at: Utc::now(),
            ended_at: Utc::now(),
            status: Status::Failed,
            hints_used: 1,
            seconds_remaining: 100,
            elapsed_seconds: 1100,
            completion_token: None,
        });
        writer.shutdown();

        assert_eq!(roster.get_roster().unwrap().get("alice"), Some(&summary));
        assert_eq!(sessions.get_records().unwrap().len(), 1);

        // Jobs queued after shutdown are dropped
        writer.publish_progress(&summary);
        roster.delete_save();
        sessions.delete_save();
    }

    #[test]
    fn write_failures_do_not_panic() {
        let dir: PathBuf = std::env::temp_dir()
            .join(format!("nightfall-writer-missing-{}", std::process::id()))
            .join("does-not-exist");
        let writer: Writer = Writer::spawn(dir);
        writer.record_completion(&SessionRecord {
            username: "bob".to_string(),
            display_name: "Bob".to_string(),
            started_at: Utc::now(),
            ended_at: Utc::now(),
            status: Status::Escaped,
            hints_used: 0,
            seconds_remaining: 500,
            elapsed_seconds: 700,
            completion_token: Some("BOB-1-AAAA".to_string()),
        });
        writer.shutdown();
    }
}
