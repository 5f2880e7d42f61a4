/*
auth.rs

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

//! Participant and observer authentication.
//!
//! The observer logs in with the reserved credentials from the configuration. These credentials
//! never go through the credential store. The participants are verified against the store (see
//! [`crate::saver::agents`]).

use log::{debug, warn};

use crate::config::GameConfig;
use crate::errors::GameError;
use crate::saver::agents::{AgentRecord, CredentialStore};

/// Who is logged in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    /// Plays the mission.
    Participant,

    /// Manages the participants and follows their progress.
    Observer,
}

/// Authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

impl Identity {
    /// Create a participant [`Identity`] object.
    pub fn participant(username: &str, display_name: &str) -> Self {
        Self {
            username: username.to_string(),
            display_name: display_name.to_string(),
            role: Role::Participant,
        }
    }

    /// Create an observer [`Identity`] object.
    pub fn observer(username: &str) -> Self {
        Self {
            username: username.to_string(),
            display_name: "Observer".to_string(),
            role: Role::Observer,
        }
    }
}

/// Credential verification.
pub struct Authenticator<'a, S: CredentialStore + ?Sized> {
    store: &'a S,
    observer_username: &'a str,
    observer_password: &'a str,
}

impl<'a, S: CredentialStore + ?Sized> Authenticator<'a, S> {
    /// Create an [`Authenticator`] object that uses the observer credentials from the
    /// configuration.
    pub fn new(store: &'a S, config: &'a GameConfig) -> Self {
        Self {
            store,
            observer_username: &config.observer_username,
            observer_password: &config.observer_password,
        }
    }

    /// Verify the credentials.
    ///
    /// # Errors
    ///
    /// The function returns [`GameError::InvalidCredentials`] when the credentials do not match
    /// an active participant or the observer, and when the store cannot be read.
    pub fn login(&self, username: &str, password: &str) -> Result<Identity, GameError> {
        let username: &str = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(GameError::InvalidCredentials);
        }

        if username == self.observer_username {
            if password == self.observer_password {
                debug!("Observer logged in");
                return Ok(Identity::observer(username));
            }
            return Err(GameError::InvalidCredentials);
        }

        let record: Option<AgentRecord> = match self.store.verify(username, password) {
            Ok(r) => r,
            Err(e) => {
                warn!("{}", GameError::PersistenceUnavailable(e.to_string()));
                return Err(GameError::InvalidCredentials);
            }
        };
        match record {
            Some(agent) => {
                debug!("Agent {username} logged in");
                Ok(Identity::participant(&agent.username, &agent.display_name))
            }
            None => Err(GameError::InvalidCredentials),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::cell::RefCell;
    use std::error::Error;

    /// In-memory store.
    #[derive(Default)]
    struct MemoryStore {
        agents: RefCell<Vec<AgentRecord>>,
    }

    impl CredentialStore for MemoryStore {
        fn upsert(&self, username: &str, password: &str, name: &str) -> Result<(), Box<dyn Error>> {
            self.agents.borrow_mut().push(AgentRecord {
                username: username.to_string(),
                password: password.to_string(),
                display_name: name.to_string(),
                active: true,
                created_at: Utc::now(),
            });
            Ok(())
        }

        fn deactivate(&self, username: &str) -> Result<bool, Box<dyn Error>> {
            let mut agents = self.agents.borrow_mut();
            match agents.iter_mut().find(|a| a.username == username) {
                Some(a) => {
                    a.active = false;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        fn deactivate_all(&self) -> Result<usize, Box<dyn Error>> {
            Ok(0)
        }

        fn list_active(&self) -> Result<Vec<AgentRecord>, Box<dyn Error>> {
            Ok(self.agents.borrow().clone())
        }

        fn verify(&self, u: &str, p: &str) -> Result<Option<AgentRecord>, Box<dyn Error>> {
            Ok(self
                .agents
                .borrow()
                .iter()
                .find(|a| a.active && a.username == u && a.password == p)
                .cloned())
        }
    }

    /// Store that cannot be read.
    struct BrokenStore;

    impl CredentialStore for BrokenStore {
        fn upsert(&self, _: &str, _: &str, _: &str) -> Result<(), Box<dyn Error>> {
            Err("read-only".into())
        }
        fn deactivate(&self, _: &str) -> Result<bool, Box<dyn Error>> {
            Err("read-only".into())
        }
        fn deactivate_all(&self) -> Result<usize, Box<dyn Error>> {
            Err("read-only".into())
        }
        fn list_active(&self) -> Result<Vec<AgentRecord>, Box<dyn Error>> {
            Err("unavailable".into())
        }
        fn verify(&self, _: &str, _: &str) -> Result<Option<AgentRecord>, Box<dyn Error>> {
            Err("unavailable".into())
        }
    }

    #[test]
    fn participant_login() {
        let store: MemoryStore = MemoryStore::default();
        store.upsert("agent007", "secret", "James").unwrap();
        let config: GameConfig = GameConfig::default();
        let auth = Authenticator::new(&store, &config);

        let identity: Identity = auth.login("agent007", "secret").unwrap();
        assert_eq!(identity, Identity::participant("agent007", "James"));
        assert_eq!(
            auth.login("agent007", "wrong"),
            Err(GameError::InvalidCredentials)
        );
        assert_eq!(auth.login("", "secret"), Err(GameError::InvalidCredentials));

        store.deactivate("agent007").unwrap();
        assert_eq!(
            auth.login("agent007", "secret"),
            Err(GameError::InvalidCredentials)
        );
    }

    #[test]
    fn observer_bypasses_the_store() {
        let config: GameConfig = GameConfig::default();
        let auth = Authenticator::new(&BrokenStore, &config);
        assert_eq!(auth.login("host", "admin").unwrap().role, Role::Observer);
        assert_eq!(auth.login("host", "nope"), Err(GameError::InvalidCredentials));
        assert_eq!(
            auth.login("agent007", "secret"),
            Err(GameError::InvalidCredentials)
        );
    }
}
