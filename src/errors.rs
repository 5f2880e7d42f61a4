/*
errors.rs

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

//! Errors reported by the game.
//!
//! Gameplay errors never change the session state: the participant is simply invited to try
//! again. Only the attempt budget exhaustion leads to a visible terminal or restart state, and
//! that transition is reported through [`crate::game::Status`], not through an error.

use std::error::Error;
use std::fmt;

/// Type of errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Login denied. No session is created.
    InvalidCredentials,

    /// The hint budget for the session is used up.
    HintBudgetExhausted,

    /// A cryptarithm hint was already given for the current attempt.
    HintAlreadyUsed,

    /// The round-3 attempt budget is used up.
    AttemptBudgetExhausted,

    /// The path command contains an unknown token. No attempt is consumed.
    InvalidCommand(String),

    /// The action does not apply to the current round.
    ActionNotAvailable,

    /// The unlock code cannot be submitted before all the rewards are collected.
    UnlockNotReady { collected: usize },

    /// The submitted answer is blank.
    EmptyAnswer,

    /// The session reached a terminal status.
    SessionClosed,

    /// The mission timer reached zero.
    TimeExpired,

    /// A background write to the persistent store failed.
    PersistenceUnavailable(String),

    /// The configuration is not valid.
    Config(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameError::InvalidCredentials => write!(f, "invalid credentials"),
            GameError::HintBudgetExhausted => write!(f, "no hint left"),
            GameError::HintAlreadyUsed => write!(f, "hint already used for this attempt"),
            GameError::AttemptBudgetExhausted => write!(f, "no attempt left"),
            GameError::InvalidCommand(token) => write!(f, "invalid move command `{token}`"),
            GameError::ActionNotAvailable => write!(f, "action not available in this round"),
            GameError::UnlockNotReady { collected } => {
                write!(f, "only {collected} of the 5 digits are collected")
            }
            GameError::EmptyAnswer => write!(f, "empty answer"),
            GameError::SessionClosed => write!(f, "the mission is over"),
            GameError::TimeExpired => write!(f, "the mission timer elapsed"),
            GameError::PersistenceUnavailable(msg) => write!(f, "storage unavailable: {msg}"),
            GameError::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl Error for GameError {}
