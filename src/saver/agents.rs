/*
agents.rs

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

//! Save and retrieve the participant credentials.
//!
//! The observer registers the participants before the event. A participant who is removed is
//! only deactivated: the record is kept so that the creation time survives a later re-add.
//!
//! The saved object is a list of [`AgentRecord`] objects in JSON format, serialized by using
//! [`serde`].

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{File, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

/// Participant credentials.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgentRecord {
    pub username: String,
    pub password: String,
    pub display_name: String,

    /// Inactive participants cannot log in.
    pub active: bool,

    /// Time of the first registration.
    pub created_at: DateTime<Utc>,
}

/// Operations on the credential store.
pub trait CredentialStore {
    /// Register a participant. Registering an existing username replaces the password and the
    /// display name, and reactivates the participant. The creation time is kept.
    fn upsert(
        &self,
        username: &str,
        password: &str,
        display_name: &str,
    ) -> Result<(), Box<dyn Error>>;

    /// Deactivate a participant. Return whether the participant was active.
    fn deactivate(&self, username: &str) -> Result<bool, Box<dyn Error>>;

    /// Deactivate all the participants. Return the number of deactivated participants.
    fn deactivate_all(&self) -> Result<usize, Box<dyn Error>>;

    /// Return the active participants, most recently created first.
    fn list_active(&self) -> Result<Vec<AgentRecord>, Box<dyn Error>>;

    /// Return the participant record if the credentials match an active participant.
    fn verify(&self, username: &str, password: &str)
    -> Result<Option<AgentRecord>, Box<dyn Error>>;
}

/// Object to save and retrieve the credentials.
pub struct SaverAgents {
    /// Absolute path to the save file.
    save_file: PathBuf,
}

impl SaverAgents {
    /// Create a [`SaverAgents`] object.
    ///
    /// The provided [`PathBuf`] is the path to the directory where the credentials are saved.
    pub fn new(mut data_dir: PathBuf) -> Self {
        data_dir.push("agents.json");
        debug!("Credentials file: {data_dir:?}");
        Self {
            save_file: data_dir,
        }
    }

    /// Retrieve all the records, active or not.
    ///
    /// Return an empty list if the credentials file does not exist.
    pub fn get_agents(&self) -> Result<Vec<AgentRecord>, Box<dyn Error>> {
        let file: File = match File::open(&self.save_file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(Vec::new()),
                _ => return Err(Box::new(error)),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let agents: Vec<AgentRecord> = serde_json::from_reader(reader)?;
        Ok(agents)
    }

    /// Save the provided records.
    pub fn save_agents(&self, agents: &[AgentRecord]) -> Result<(), Box<dyn Error>> {
        let file: File = File::create(&self.save_file)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, agents)?;
        writer.flush()?;
        Ok(())
    }

    /// Delete the credentials file.
    pub fn delete_save(&self) {
        let _ = remove_file(&self.save_file);
    }
}

impl CredentialStore for SaverAgents {
    fn upsert(
        &self,
        username: &str,
        password: &str,
        display_name: &str,
    ) -> Result<(), Box<dyn Error>> {
        let username: &str = username.trim();
        let display_name: &str = display_name.trim();
        for (field, value) in [
            ("username", username),
            ("password", password),
            ("display name", display_name),
        ] {
            if value.is_empty() {
                return Err(format!("the {field} cannot be empty").into());
            }
        }

        let mut agents: Vec<AgentRecord> = self.get_agents()?;
        match agents.iter_mut().find(|a| a.username == username) {
            Some(agent) => {
                agent.password = password.to_string();
                agent.display_name = display_name.to_string();
                agent.active = true;
                debug!("Credentials updated for {username}");
            }
            None => {
                agents.push(AgentRecord {
                    username: username.to_string(),
                    password: password.to_string(),
                    display_name: display_name.to_string(),
                    active: true,
                    created_at: Utc::now(),
                });
                debug!("Credentials added for {username}");
            }
        }
        self.save_agents(&agents)
    }

    fn deactivate(&self, username: &str) -> Result<bool, Box<dyn Error>> {
        let mut agents: Vec<AgentRecord> = self.get_agents()?;
        let mut found: bool = false;
        if let Some(agent) = agents
            .iter_mut()
            .find(|a| a.username == username.trim() && a.active)
        {
            agent.active = false;
            found = true;
        }
        if found {
            self.save_agents(&agents)?;
        }
        Ok(found)
    }

    fn deactivate_all(&self) -> Result<usize, Box<dyn Error>> {
        let mut agents: Vec<AgentRecord> = self.get_agents()?;
        let mut count: usize = 0;
        for agent in agents.iter_mut().filter(|a| a.active) {
            agent.active = false;
            count += 1;
        }
        if count > 0 {
            self.save_agents(&agents)?;
        }
        Ok(count)
    }

    fn list_active(&self) -> Result<Vec<AgentRecord>, Box<dyn Error>> {
        let mut agents: Vec<AgentRecord> = self
            .get_agents()?
            .into_iter()
            .filter(|a| a.active)
            .collect();
        agents.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.username.cmp(&b.username))
        });
        Ok(agents)
    }

    fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<AgentRecord>, Box<dyn Error>> {
        Ok(self
            .get_agents()?
            .into_iter()
            .find(|a| a.active && a.username == username.trim() && a.password == password))
    }
}
