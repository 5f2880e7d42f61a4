/*
config.rs

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

//! Game configuration.
//!
//! The default values come from the constants in this module. A JSON file can override them
//! (see [`GameConfig::load`]), and the command-line options override the file
//! (see [`crate::cli_options`]).

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::GameError;

pub const PACKAGE_NAME: &str = "nightfall";
pub const COPYRIGHT_NOTICE: &str = "Copyright 2025 Hervé Quatremain
License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>.
This is free software: you are free to change and redistribute it.
There is NO WARRANTY, to the extent permitted by law.";

/// Number of hints a participant can use during a whole session.
pub const MAX_HINTS: u32 = 2;

/// Number of failing submissions allowed in round 3.
pub const INITIAL_ATTEMPTS: u32 = 3;

/// Mission duration in seconds (20 minutes).
pub const MISSION_TIME: u32 = 20 * 60;

/// Size of the laser grid (the grid is `GRID_SIZE`×`GRID_SIZE`).
pub const GRID_SIZE: usize = 5;

/// Probability for a cell outside the carved path to hold a laser.
pub const OBSTACLE_PROBABILITY: f64 = 0.3;

/// Reserved observer credentials. They bypass the credential store.
pub const OBSERVER_USERNAME: &str = "host";
pub const OBSERVER_PASSWORD: &str = "admin";

/// What happens when a participant exhausts the round-3 attempts in the grid variant.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExhaustionPolicy {
    /// The session ends with the `Failed` status.
    Fail,

    /// The participant goes back to round 1. The timer and the hint counter keep running.
    #[default]
    Restart,
}

/// Flavor of the third round.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Round3Variant {
    /// Navigate through the laser grid.
    #[default]
    Grid,

    /// Solve a cryptarithm.
    Cryptarithm,
}

/// How the mission timer advances.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// A background ticker emits one tick per second.
    #[default]
    Background,

    /// No background task. The caller invokes [`crate::timer::MissionTimer::tick`].
    Manual,
}

/// Parameters of a game session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Mission duration in seconds.
    pub mission_seconds: u32,

    /// Hint budget for the session.
    pub max_hints: u32,

    /// Round-3 attempt budget.
    pub initial_attempts: u32,

    /// Laser grid size.
    pub grid_size: usize,

    /// Probability for an off-path cell to hold a laser. Clamped to [0, 1].
    pub obstacle_probability: f64,

    /// Round-3 exhaustion policy (grid variant only).
    pub exhaustion_policy: ExhaustionPolicy,

    /// Round-3 flavor.
    pub round3_variant: Round3Variant,

    /// Timer mode.
    pub timer_mode: TimerMode,

    /// Seed for the session random generator. A random seed is used when not set.
    pub seed: Option<u64>,

    /// Observer username.
    pub observer_username: String,

    /// Observer password.
    pub observer_password: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mission_seconds: MISSION_TIME,
            max_hints: MAX_HINTS,
            initial_attempts: INITIAL_ATTEMPTS,
            grid_size: GRID_SIZE,
            obstacle_probability: OBSTACLE_PROBABILITY,
            exhaustion_policy: ExhaustionPolicy::default(),
            round3_variant: Round3Variant::default(),
            timer_mode: TimerMode::default(),
            seed: None,
            observer_username: OBSERVER_USERNAME.to_string(),
            observer_password: OBSERVER_PASSWORD.to_string(),
        }
    }
}

impl GameConfig {
    /// Load the configuration from a JSON file. Missing keys keep their default value.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        debug!("Configuration file: {path:?}");
        let file: File = File::open(path)?;
        let reader: BufReader<File> = BufReader::new(file);
        let config: GameConfig = serde_json::from_reader(reader)?;
        Ok(config.validate()?)
    }

    /// Verify the configuration and clamp the obstacle probability.
    pub fn validate(mut self) -> Result<Self, GameError> {
        if self.grid_size < 2 {
            return Err(GameError::Config(format!(
                "the grid size must be at least 2 (got {})",
                self.grid_size
            )));
        }
        if self.initial_attempts == 0 {
            return Err(GameError::Config(
                "the round-3 attempt budget cannot be zero".to_string(),
            ));
        }
        if self.mission_seconds == 0 {
            return Err(GameError::Config(
                "the mission duration cannot be zero".to_string(),
            ));
        }
        if self.obstacle_probability.is_nan() {
            self.obstacle_probability = OBSTACLE_PROBABILITY;
        }
        self.obstacle_probability = self.obstacle_probability.clamp(0.0, 1.0);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_constants() {
        let config: GameConfig = GameConfig::default();
        assert_eq!(config.max_hints, 2);
        assert_eq!(config.initial_attempts, 3);
        assert_eq!(config.mission_seconds, 1200);
        assert_eq!(config.exhaustion_policy, ExhaustionPolicy::Restart);
        assert_eq!(config.round3_variant, Round3Variant::Grid);
    }

    #[test]
    fn probability_is_clamped() {
        let config = GameConfig {
            obstacle_probability: 1.7,
            ..GameConfig::default()
        };
        assert_eq!(config.validate().unwrap().obstacle_probability, 1.0);

        let config = GameConfig {
            obstacle_probability: -0.2,
            ..GameConfig::default()
        };
        assert_eq!(config.validate().unwrap().obstacle_probability, 0.0);
    }

    #[test]
    fn tiny_grids_are_rejected() {
        let config = GameConfig {
            grid_size: 1,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(GameError::Config(_))));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"exhaustion_policy": "fail", "grid_size": 7}"#).unwrap();
        assert_eq!(config.exhaustion_policy, ExhaustionPolicy::Fail);
        assert_eq!(config.grid_size, 7);
        assert_eq!(config.max_hints, MAX_HINTS);
        assert_eq!(config.observer_username, "host");
    }
}
