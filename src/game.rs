/*
game.rs

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

//! Manage the status of a participant's mission.
//!
//! A [`Session`] object is created when a participant logs in, and is passed to every action
//! the participant performs. It goes through three rounds:
//!
//! 1. Five riddles, each one rewarding a digit. The digits, concatenated in the order they were
//!    collected, form the code that unlocks the next round.
//! 2. A code-tracing puzzle. The participant submits the output of a short program.
//! 3. Either a laser grid to cross, or a cryptarithm to solve (see
//!    [`crate::config::Round3Variant`]). Round 3 has an attempt budget: when it is exhausted,
//!    the session fails or restarts from round 1, depending on
//!    [`crate::config::ExhaustionPolicy`].
//!
//! A hint budget is shared by the three rounds. The mission timer starts at login and keeps
//! running until the participant escapes or fails.
//!
//! The progress is published to the [`SessionSink`] objects provided at login, so that the
//! observer can follow the participants, and the final record is sent to them when the session
//! reaches a terminal status.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use strum_macros::FromRepr;

use crate::auth::{Identity, Role};
use crate::config::{ExhaustionPolicy, GameConfig, Round3Variant};
use crate::errors::GameError;
use crate::generator::grid::{Coord, GridPuzzle, generate_grid};
use crate::generator::puzzles::{
    self, CodePuzzle, CryptarithmTemplate, PuzzleItem, ROUND1_LEN,
};
use crate::mission_log::MissionLog;
use crate::navigation::{Outcome, PathRun, parse_commands, run_path};
use crate::roster::SessionSummary;
use crate::saver::sessions::SessionRecord;
use crate::timer::{MissionTimer, TimerEvent};
use crate::token::completion_token;

/// Number of solution cells revealed by a round-3 grid hint.
pub const HINT_REVEAL_CELLS: usize = 2;

/// Hint given once all the round-1 digits are collected.
const UNLOCK_HINT: &str = "Combine the five digits in the order you recovered them.";

/// Game rounds.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromRepr)]
#[repr(u8)]
pub enum Round {
    One = 1,
    Two = 2,
    Three = 3,
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Round::One => write!(f, "Round 1: intel extraction"),
            Round::Two => write!(f, "Round 2: decode message"),
            Round::Three => write!(f, "Round 3: escape"),
        }
    }
}

/// Session status.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Escaped,
    Failed,

    /// The participant exhausted the round-3 attempts and replays round 1.
    Restarting,
}

impl Status {
    /// Whether the session is over.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Escaped | Status::Failed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::InProgress => write!(f, "In progress"),
            Status::Escaped => write!(f, "Escaped"),
            Status::Failed => write!(f, "Failed"),
            Status::Restarting => write!(f, "Restarting from Round 1"),
        }
    }
}

/// Result of a round-1, unlock, round-2, or cryptarithm submission.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

/// Content revealed by a hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    /// Textual guidance (rounds 1 and 2).
    Text(&'static str),

    /// Safe cells of the laser grid.
    SafeCells(Vec<Coord>),

    /// One letter of the cryptarithm.
    Mapping { letter: char, digit: u8 },
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Hint::Text(text) => write!(f, "{text}"),
            Hint::SafeCells(cells) => {
                let cells: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
                write!(f, "safe cells: {}", cells.join(" "))
            }
            Hint::Mapping { letter, digit } => write!(f, "{letter} = {digit}"),
        }
    }
}

/// Result of a round-3 path submission.
#[derive(Debug, Clone)]
pub struct PathReport {
    pub run: PathRun,

    /// Remaining attempts after the submission.
    pub attempts_left: u32,

    /// Session status after the submission.
    pub status: Status,
}

/// Receiver of the session progress and of the final record.
///
/// Implementations must not block: the session calls them from the participant's thread.
pub trait SessionSink: Send + Sync {
    /// The session changed.
    fn publish_progress(&self, _summary: &SessionSummary) {}

    /// The session reached a terminal status.
    fn record_completion(&self, record: &SessionRecord);
}

/// Round being played, with its data.
enum Stage {
    /// `index` is the position of the current riddle. It is [`ROUND1_LEN`] when all the digits
    /// are collected and the participant must enter the unlock code.
    Round1 { index: usize },

    Round2 { puzzle: &'static CodePuzzle },

    /// `revealed` is the number of solution cells already given as hints.
    Round3Grid { grid: GridPuzzle, revealed: usize },

    /// `hint_in_cycle` is set when a hint was given since the last failed attempt.
    Round3Cryptarithm {
        template: &'static CryptarithmTemplate,
        hints_given: usize,
        hint_in_cycle: bool,
    },
}

/// Mission of a participant.
pub struct Session {
    /// Participant login.
    username: String,

    /// Participant name.
    display_name: String,

    /// Game parameters.
    config: GameConfig,

    /// Current round and its data.
    stage: Stage,

    /// Digits collected in round 1, in collection order.
    collected_rewards: Vec<String>,

    /// Number of hints used. Never reset during the session.
    hints_used: u32,

    /// Remaining round-3 attempts.
    round_attempts: u32,

    status: Status,

    /// Mission countdown.
    timer: MissionTimer,

    /// Login time.
    started_at: DateTime<Utc>,

    /// Time of the terminal status.
    ended_at: Option<DateTime<Utc>>,

    /// Token given when the participant escapes.
    completion_token: Option<String>,

    /// Random generator for the puzzle selection and the grid generation.
    rng: StdRng,

    /// Journal of the session.
    log: MissionLog,

    /// Receivers of the progress and of the final record.
    sinks: Vec<Arc<dyn SessionSink>>,

    /// Last path run in round 3, to draw the trail.
    last_run: Option<PathRun>,

    /// Lasers that the participant hit.
    revealed_obstacles: Vec<Coord>,
}

impl Session {
    /// Start the mission of a participant and start the timer.
    ///
    /// # Errors
    ///
    /// The function returns [`GameError::ActionNotAvailable`] for the observer, who does not
    /// play, and [`GameError::Config`] when the configuration is not valid.
    pub fn start(
        identity: &Identity,
        config: GameConfig,
        sinks: Vec<Arc<dyn SessionSink>>,
    ) -> Result<Self, GameError> {
        if identity.role == Role::Observer {
            return Err(GameError::ActionNotAvailable);
        }
        let config: GameConfig = config.validate()?;
        let rng: StdRng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut session: Session = Self {
            username: identity.username.clone(),
            display_name: identity.display_name.clone(),
            stage: Stage::Round1 { index: 0 },
            collected_rewards: Vec::with_capacity(ROUND1_LEN),
            hints_used: 0,
            round_attempts: config.initial_attempts,
            status: Status::InProgress,
            timer: MissionTimer::new(config.mission_seconds, config.timer_mode),
            started_at: Utc::now(),
            ended_at: None,
            completion_token: None,
            rng,
            log: MissionLog::new(),
            sinks,
            last_run: None,
            revealed_obstacles: Vec::new(),
            config,
        };
        session.timer.start();
        session.log.add(format!(
            "Agent {} connected to OPERATION: NIGHTFALL.",
            session.display_name
        ));
        session.publish();
        Ok(session)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current round.
    pub fn current_round(&self) -> Round {
        match self.stage {
            Stage::Round1 { .. } => Round::One,
            Stage::Round2 { .. } => Round::Two,
            Stage::Round3Grid { .. } | Stage::Round3Cryptarithm { .. } => Round::Three,
        }
    }

    pub fn collected_rewards(&self) -> &[String] {
        &self.collected_rewards
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    /// Remaining hints.
    pub fn hints_left(&self) -> u32 {
        self.config.max_hints.saturating_sub(self.hints_used)
    }

    pub fn round_attempts(&self) -> u32 {
        self.round_attempts
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn timer(&self) -> &MissionTimer {
        &self.timer
    }

    /// Mutable access to the timer, for the callers that drive it in manual mode.
    pub fn timer_mut(&mut self) -> &mut MissionTimer {
        &mut self.timer
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completion_token(&self) -> Option<&str> {
        self.completion_token.as_deref()
    }

    pub fn log(&self) -> &MissionLog {
        &self.log
    }

    /// Whether the five digits are collected and the unlock code is expected.
    pub fn is_unlock_pending(&self) -> bool {
        matches!(self.stage, Stage::Round1 { index } if index >= ROUND1_LEN)
    }

    /// Puzzle currently displayed to the participant, if any. The laser grid is not a catalog
    /// item: see [`Session::grid`].
    pub fn active_puzzle(&self) -> Option<PuzzleItem> {
        match &self.stage {
            Stage::Round1 { index } => puzzles::round1_item(*index).map(PuzzleItem::Round1),
            Stage::Round2 { puzzle } => Some(PuzzleItem::Code(puzzle)),
            Stage::Round3Grid { .. } => None,
            Stage::Round3Cryptarithm { template, .. } => Some(PuzzleItem::Cryptarithm(template)),
        }
    }

    /// Laser grid, in round 3 (grid variant).
    pub fn grid(&self) -> Option<&GridPuzzle> {
        match &self.stage {
            Stage::Round3Grid { grid, .. } => Some(grid),
            _ => None,
        }
    }

    /// Last path run in round 3.
    pub fn last_run(&self) -> Option<&PathRun> {
        self.last_run.as_ref()
    }

    /// Lasers that the participant hit.
    pub fn revealed_obstacles(&self) -> &[Coord] {
        &self.revealed_obstacles
    }

    /// Apply the pending timer ticks.
    pub fn pump(&mut self) -> TimerEvent {
        let event: TimerEvent = self.timer.pump();
        self.after_tick(event)
    }

    /// Remove one second from the timer (manual timer mode).
    pub fn tick(&mut self) -> TimerEvent {
        let event: TimerEvent = self.timer.tick();
        self.after_tick(event)
    }

    fn after_tick(&mut self, event: TimerEvent) -> TimerEvent {
        if event == TimerEvent::Expired {
            self.log.add("Mission timer elapsed.".to_string());
            self.publish();
        }
        event
    }

    /// Submit an answer to the current riddle.
    pub fn submit_round1_answer(&mut self, answer: &str) -> Result<Verdict, GameError> {
        self.ensure_playable()?;
        let item = match self.stage {
            Stage::Round1 { index } => {
                puzzles::round1_item(index).ok_or(GameError::ActionNotAvailable)?
            }
            _ => return Err(GameError::ActionNotAvailable),
        };
        if answer.trim().is_empty() {
            return Err(GameError::EmptyAnswer);
        }

        if !item.accepts(answer) {
            self.log
                .add(format!("Agent {}: Wrong intel attempt.", self.username));
            return Ok(Verdict::Rejected);
        }

        self.collected_rewards.push(item.reward.to_string());
        if let Stage::Round1 { index } = &mut self.stage {
            *index += 1;
        }
        self.log.add(format!(
            "Agent {}: Correct intel recovered -> {}",
            self.username, item.reward
        ));
        self.publish();
        Ok(Verdict::Accepted)
    }

    /// Submit the code made of the collected digits.
    pub fn submit_unlock_code(&mut self, code: &str) -> Result<Verdict, GameError> {
        self.ensure_playable()?;
        if !matches!(self.stage, Stage::Round1 { .. }) {
            return Err(GameError::ActionNotAvailable);
        }
        if self.collected_rewards.len() < ROUND1_LEN {
            return Err(GameError::UnlockNotReady {
                collected: self.collected_rewards.len(),
            });
        }
        let code: &str = code.trim();
        if code.is_empty() {
            return Err(GameError::EmptyAnswer);
        }

        let expected: String = self.collected_rewards.concat();
        if code != expected {
            self.log.add(format!(
                "Agent {}: Door 2 wrong code attempt {code}.",
                self.username
            ));
            return Ok(Verdict::Rejected);
        }

        let puzzle: &'static CodePuzzle = puzzles::pick_random_code_puzzle(&mut self.rng);
        self.stage = Stage::Round2 { puzzle };
        if self.status == Status::Restarting {
            self.status = Status::InProgress;
        }
        self.log.add(format!(
            "Agent {}: Door 2 unlocked with code {expected}.",
            self.username
        ));
        self.publish();
        Ok(Verdict::Accepted)
    }

    /// Submit the output of the round-2 program.
    pub fn submit_round2_answer(&mut self, answer: &str) -> Result<Verdict, GameError> {
        self.ensure_playable()?;
        let puzzle: &'static CodePuzzle = match self.stage {
            Stage::Round2 { puzzle } => puzzle,
            _ => return Err(GameError::ActionNotAvailable),
        };
        if answer.trim().is_empty() {
            return Err(GameError::EmptyAnswer);
        }

        if !puzzle.accepts(answer) {
            self.log.add(format!(
                "Agent {}: Decoding incorrect attempt {}.",
                self.username,
                answer.trim()
            ));
            return Ok(Verdict::Rejected);
        }

        let stage: Stage = match self.config.round3_variant {
            Round3Variant::Grid => Stage::Round3Grid {
                grid: generate_grid(
                    &mut self.rng,
                    self.config.grid_size,
                    self.config.obstacle_probability,
                )
                .map_err(|e| GameError::Config(e.to_string()))?,
                revealed: 0,
            },
            Round3Variant::Cryptarithm => Stage::Round3Cryptarithm {
                template: puzzles::pick_cryptarithm_template(&mut self.rng),
                hints_given: 0,
                hint_in_cycle: false,
            },
        };
        self.stage = stage;
        self.round_attempts = self.config.initial_attempts;
        self.last_run = None;
        self.revealed_obstacles.clear();
        self.log.add(format!(
            "Agent {}: Decoding correct -> {}. Moving to Round 3.",
            self.username,
            answer.trim()
        ));
        self.publish();
        Ok(Verdict::Accepted)
    }

    /// Use a hint for the current round.
    ///
    /// # Errors
    ///
    /// [`GameError::HintBudgetExhausted`] when no hint is left, and
    /// [`GameError::HintAlreadyUsed`] when a cryptarithm hint was already given for the current
    /// attempt. The hint counter is not changed in these cases.
    pub fn use_hint(&mut self) -> Result<Hint, GameError> {
        self.ensure_playable()?;
        if self.hints_used >= self.config.max_hints {
            return Err(GameError::HintBudgetExhausted);
        }

        let hint: Hint = match &mut self.stage {
            Stage::Round1 { index } => match puzzles::round1_item(*index) {
                Some(item) => Hint::Text(item.hint),
                None => Hint::Text(UNLOCK_HINT),
            },
            Stage::Round2 { puzzle } => Hint::Text(puzzle.hint),
            Stage::Round3Grid { grid, revealed } => {
                // Skip the starting cell, which is always safe
                let path: &Vec<Coord> = grid.solution_path().get();
                let mut cells: Vec<Coord> = path
                    .iter()
                    .skip(1 + *revealed)
                    .take(HINT_REVEAL_CELLS)
                    .copied()
                    .collect();
                if cells.is_empty() {
                    let from: usize = path.len().saturating_sub(HINT_REVEAL_CELLS);
                    cells = path[from..].to_vec();
                }
                *revealed += cells.len();
                Hint::SafeCells(cells)
            }
            Stage::Round3Cryptarithm {
                template,
                hints_given,
                hint_in_cycle,
            } => {
                if *hint_in_cycle {
                    return Err(GameError::HintAlreadyUsed);
                }
                let (letter, digit) =
                    template.letter_to_digit[*hints_given % template.letter_to_digit.len()];
                *hints_given += 1;
                *hint_in_cycle = true;
                Hint::Mapping { letter, digit }
            }
        };

        self.hints_used += 1;
        self.log.add(format!(
            "Agent {}: Used hint for Round {} ({hint}).",
            self.username,
            self.current_round() as u8
        ));
        self.publish();
        Ok(hint)
    }

    /// Submit a path through the laser grid.
    ///
    /// A malformed path is rejected with [`GameError::InvalidCommand`] and does not consume an
    /// attempt. Any outcome other than reaching the goal consumes one.
    pub fn submit_round3_path(&mut self, commands: &str) -> Result<PathReport, GameError> {
        self.ensure_playable()?;
        let run: PathRun = match &self.stage {
            Stage::Round3Grid { grid, .. } => {
                if self.round_attempts == 0 {
                    return Err(GameError::AttemptBudgetExhausted);
                }
                run_path(grid, &parse_commands(commands)?)
            }
            _ => return Err(GameError::ActionNotAvailable),
        };

        self.last_run = Some(run.clone());
        match run.outcome {
            Outcome::Reached { steps } => {
                self.log.add(format!(
                    "Agent {}: Laser grid crossed in {steps} moves.",
                    self.username
                ));
                self.escape();
            }
            Outcome::ObstacleHit { at, .. } => {
                if !self.revealed_obstacles.contains(&at) {
                    self.revealed_obstacles.push(at);
                }
                self.consume_attempt(format!("laser hit at {at}"));
            }
            Outcome::OutOfBounds { step, .. } => {
                self.consume_attempt(format!("move {} leaves the grid", step + 1));
            }
            Outcome::Incomplete { at, .. } => {
                self.consume_attempt(format!("path stops at {at}"));
            }
        }

        Ok(PathReport {
            run,
            attempts_left: self.round_attempts,
            status: self.status,
        })
    }

    /// Submit the numeric result of the cryptarithm.
    pub fn submit_round3_result(&mut self, answer: &str) -> Result<Verdict, GameError> {
        self.ensure_playable()?;
        let template: &'static CryptarithmTemplate = match &self.stage {
            Stage::Round3Cryptarithm { template, .. } => *template,
            _ => return Err(GameError::ActionNotAvailable),
        };
        if self.round_attempts == 0 {
            return Err(GameError::AttemptBudgetExhausted);
        }
        if answer.trim().is_empty() {
            return Err(GameError::EmptyAnswer);
        }

        if template.accepts(answer) {
            self.log.add(format!(
                "Agent {}: CRYPTARITHM solved: {}. Mission success.",
                self.username,
                answer.trim()
            ));
            self.escape();
            return Ok(Verdict::Accepted);
        }

        if let Stage::Round3Cryptarithm { hint_in_cycle, .. } = &mut self.stage {
            *hint_in_cycle = false;
        }
        self.consume_attempt(format!("wrong cryptarithm result {}", answer.trim()));
        Ok(Verdict::Rejected)
    }

    /// End the session. The timer is cancelled and the in-memory state is discarded. The
    /// records already sent to the sinks are not affected.
    pub fn logout(mut self) {
        self.timer.stop();
        self.log
            .add(format!("Agent {} disconnected.", self.username));
    }

    /// Snapshot of the session for the observer.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            round: self.current_round() as u8,
            rewards: self.collected_rewards.clone(),
            hints_used: self.hints_used,
            round_attempts: self.round_attempts,
            status: self.status,
            seconds_remaining: self.timer.seconds_remaining(),
            updated_at: Utc::now(),
        }
    }

    /// Record of a session that reached a terminal status.
    fn record(&self) -> SessionRecord {
        let ended_at: DateTime<Utc> = self.ended_at.unwrap_or_else(Utc::now);
        SessionRecord {
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            started_at: self.started_at,
            ended_at,
            status: self.status,
            hints_used: self.hints_used,
            seconds_remaining: self.timer.seconds_remaining(),
            elapsed_seconds: self
                .config
                .mission_seconds
                .saturating_sub(self.timer.seconds_remaining()),
            completion_token: self.completion_token.clone(),
        }
    }

    /// Verify that the participant can still act.
    fn ensure_playable(&mut self) -> Result<(), GameError> {
        self.pump();
        if self.status.is_terminal() {
            return Err(GameError::SessionClosed);
        }
        if self.timer.is_expired() {
            return Err(GameError::TimeExpired);
        }
        Ok(())
    }

    /// Remove one round-3 attempt and apply the exhaustion policy when none is left.
    fn consume_attempt(&mut self, reason: String) {
        self.round_attempts = self.round_attempts.saturating_sub(1);
        self.log.add(format!(
            "Agent {}: Round 3 attempt failed ({reason}). Attempts left {}.",
            self.username, self.round_attempts
        ));
        if self.round_attempts > 0 {
            self.publish();
            return;
        }

        match (self.config.round3_variant, self.config.exhaustion_policy) {
            (Round3Variant::Grid, ExhaustionPolicy::Restart) => self.restart(),
            (Round3Variant::Grid, ExhaustionPolicy::Fail) | (Round3Variant::Cryptarithm, _) => {
                self.fail()
            }
        }
    }

    /// Go back to round 1. The hint counter and the timer are kept.
    fn restart(&mut self) {
        self.stage = Stage::Round1 { index: 0 };
        self.collected_rewards.clear();
        self.round_attempts = self.config.initial_attempts;
        self.last_run = None;
        self.revealed_obstacles.clear();
        self.status = Status::Restarting;
        self.log.add(format!(
            "Agent {}: Failed Round 3. Restarting from Round 1. Timer continues.",
            self.username
        ));
        self.publish();
    }

    fn escape(&mut self) {
        let now: DateTime<Utc> = Utc::now();
        self.status = Status::Escaped;
        self.timer.stop();
        self.ended_at = Some(now);
        let token: String = completion_token(&self.username, now, &mut self.rng);
        self.log.add(format!(
            "Agent {}: Mission complete with {} remaining. Completion token {token}.",
            self.username,
            self.timer.display()
        ));
        self.completion_token = Some(token);
        self.finish();
    }

    fn fail(&mut self) {
        self.status = Status::Failed;
        self.timer.stop();
        self.ended_at = Some(Utc::now());
        self.log.add(format!(
            "Agent {}: MISSION FAILED. All attempts exhausted.",
            self.username
        ));
        self.finish();
    }

    /// Send the progress and the final record to the sinks.
    fn finish(&self) {
        self.publish();
        let record: SessionRecord = self.record();
        for sink in &self.sinks {
            sink.record_completion(&record);
        }
    }

    fn publish(&self) {
        if self.sinks.is_empty() {
            return;
        }
        let summary: SessionSummary = self.summary();
        for sink in &self.sinks {
            sink.publish_progress(&summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimerMode;
    use crate::generator::puzzles::ROUND1_ITEMS;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        summaries: Mutex<Vec<SessionSummary>>,
        records: Mutex<Vec<SessionRecord>>,
    }

    impl SessionSink for Recorder {
        fn publish_progress(&self, summary: &SessionSummary) {
            self.summaries.lock().unwrap().push(summary.clone());
        }

        fn record_completion(&self, record: &SessionRecord) {
            self.records.lock().unwrap().push(record.clone());
        }
    }

    fn test_config() -> GameConfig {
        GameConfig {
            timer_mode: TimerMode::Manual,
            seed: Some(1234),
            ..GameConfig::default()
        }
    }

    fn agent() -> Identity {
        Identity::participant("agent007", "James")
    }

    fn clear_round1(session: &mut Session) {
        for item in &ROUND1_ITEMS {
            assert_eq!(
                session.submit_round1_answer(item.expected_answer),
                Ok(Verdict::Accepted)
            );
        }
        let code: String = session.collected_rewards().concat();
        assert_eq!(session.submit_unlock_code(&code), Ok(Verdict::Accepted));
    }

    fn clear_round2(session: &mut Session) {
        let answer: &str = match session.active_puzzle() {
            Some(PuzzleItem::Code(puzzle)) => puzzle.expected_output,
            other => panic!("unexpected puzzle {other:?}"),
        };
        assert_eq!(session.submit_round2_answer(answer), Ok(Verdict::Accepted));
    }

    #[test]
    fn login_state() {
        let session: Session = Session::start(&agent(), test_config(), Vec::new()).unwrap();
        assert_eq!(session.current_round(), Round::One);
        assert_eq!(session.hints_used(), 0);
        assert!(session.collected_rewards().is_empty());
        assert!(session.timer().is_running());
        assert_eq!(session.round_attempts(), 3);
        assert_eq!(session.status(), Status::InProgress);
    }

    #[test]
    fn observer_cannot_play() {
        let observer: Identity = Identity::observer("host");
        assert_eq!(
            Session::start(&observer, test_config(), Vec::new()).err(),
            Some(GameError::ActionNotAvailable)
        );
    }

    #[test]
    fn round1_rejects_wrong_answers_without_change() {
        let mut session: Session = Session::start(&agent(), test_config(), Vec::new()).unwrap();
        assert_eq!(session.submit_round1_answer("mirror"), Ok(Verdict::Rejected));
        assert_eq!(session.submit_round1_answer("   "), Err(GameError::EmptyAnswer));
        assert!(session.collected_rewards().is_empty());
        assert_eq!(session.submit_round1_answer(" ECHO "), Ok(Verdict::Accepted));
        assert_eq!(session.collected_rewards(), &["4".to_string()]);
    }

    #[test]
    fn unlock_requires_the_ordered_code() {
        let mut session: Session = Session::start(&agent(), test_config(), Vec::new()).unwrap();
        assert_eq!(
            session.submit_unlock_code("49371"),
            Err(GameError::UnlockNotReady { collected: 0 })
        );
        for item in &ROUND1_ITEMS {
            session.submit_round1_answer(item.expected_answer).unwrap();
        }
        assert!(session.is_unlock_pending());
        assert_eq!(
            session.submit_round1_answer("echo"),
            Err(GameError::ActionNotAvailable)
        );
        assert_eq!(session.submit_unlock_code("94371"), Ok(Verdict::Rejected));
        assert_eq!(session.current_round(), Round::One);
        assert_eq!(session.submit_unlock_code("49371"), Ok(Verdict::Accepted));
        assert_eq!(session.current_round(), Round::Two);
        assert_eq!(session.collected_rewards().len(), 5);

        // Round-1 actions are no longer accepted
        assert_eq!(
            session.submit_unlock_code("49371"),
            Err(GameError::ActionNotAvailable)
        );
        assert_eq!(session.current_round(), Round::Two);
    }

    #[test]
    fn round2_allows_unlimited_retries() {
        let mut session: Session = Session::start(&agent(), test_config(), Vec::new()).unwrap();
        clear_round1(&mut session);
        for _ in 0..10 {
            assert_eq!(session.submit_round2_answer("-1"), Ok(Verdict::Rejected));
        }
        assert_eq!(session.current_round(), Round::Two);
        clear_round2(&mut session);
        assert_eq!(session.current_round(), Round::Three);
        assert!(session.grid().is_some());
        assert_eq!(session.round_attempts(), 3);
    }

    #[test]
    fn hints_are_capped() {
        let mut session: Session = Session::start(&agent(), test_config(), Vec::new()).unwrap();
        assert_eq!(
            session.use_hint(),
            Ok(Hint::Text("Think of places that repeat sound."))
        );
        assert!(session.use_hint().is_ok());
        for _ in 0..5 {
            assert_eq!(session.use_hint(), Err(GameError::HintBudgetExhausted));
        }
        assert_eq!(session.hints_used(), 2);
        assert_eq!(session.hints_left(), 0);
    }

    #[test]
    fn grid_hint_reveals_solution_cells() {
        let mut session: Session = Session::start(&agent(), test_config(), Vec::new()).unwrap();
        clear_round1(&mut session);
        clear_round2(&mut session);
        let path: Vec<Coord> = session.grid().unwrap().solution_path().get().clone();
        match session.use_hint() {
            Ok(Hint::SafeCells(cells)) => assert_eq!(cells, path[1..3].to_vec()),
            other => panic!("unexpected hint {other:?}"),
        }
        match session.use_hint() {
            Ok(Hint::SafeCells(cells)) => assert_eq!(cells, path[3..5].to_vec()),
            other => panic!("unexpected hint {other:?}"),
        }
    }

    #[test]
    fn cryptarithm_hint_once_per_attempt() {
        let config: GameConfig = GameConfig {
            round3_variant: Round3Variant::Cryptarithm,
            max_hints: 5,
            ..test_config()
        };
        let mut session: Session = Session::start(&agent(), config, Vec::new()).unwrap();
        clear_round1(&mut session);
        clear_round2(&mut session);
        let template: &CryptarithmTemplate = match session.active_puzzle() {
            Some(PuzzleItem::Cryptarithm(t)) => t,
            other => panic!("unexpected puzzle {other:?}"),
        };
        let (letter, digit) = template.letter_to_digit[0];
        assert_eq!(session.use_hint(), Ok(Hint::Mapping { letter, digit }));
        assert_eq!(session.use_hint(), Err(GameError::HintAlreadyUsed));
        assert_eq!(session.hints_used(), 1);

        assert_eq!(session.submit_round3_result("00"), Ok(Verdict::Rejected));
        let (letter, digit) = template.letter_to_digit[1];
        assert_eq!(session.use_hint(), Ok(Hint::Mapping { letter, digit }));
        assert_eq!(session.hints_used(), 2);
    }

    #[test]
    fn cryptarithm_exhaustion_fails() {
        let recorder: Arc<Recorder> = Arc::new(Recorder::default());
        let config: GameConfig = GameConfig {
            round3_variant: Round3Variant::Cryptarithm,
            exhaustion_policy: ExhaustionPolicy::Restart,
            ..test_config()
        };
        let mut session: Session =
            Session::start(&agent(), config, vec![recorder.clone() as Arc<dyn SessionSink>])
                .unwrap();
        clear_round1(&mut session);
        clear_round2(&mut session);
        for left in [2, 1, 0] {
            assert_eq!(session.submit_round3_result("0"), Ok(Verdict::Rejected));
            assert_eq!(session.round_attempts(), left);
        }
        assert_eq!(session.status(), Status::Failed);
        assert!(!session.timer().is_running());
        assert_eq!(
            session.submit_round3_result("0"),
            Err(GameError::SessionClosed)
        );
        let records = recorder.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, Status::Failed);
        assert!(records[0].completion_token.is_none());
    }

    #[test]
    fn cryptarithm_success() {
        let config: GameConfig = GameConfig {
            round3_variant: Round3Variant::Cryptarithm,
            ..test_config()
        };
        let mut session: Session = Session::start(&agent(), config, Vec::new()).unwrap();
        clear_round1(&mut session);
        clear_round2(&mut session);
        let result: &str = match session.active_puzzle() {
            Some(PuzzleItem::Cryptarithm(t)) => t.numeric_result,
            other => panic!("unexpected puzzle {other:?}"),
        };
        assert_eq!(
            session.submit_round3_result(&format!("0{result}")),
            Ok(Verdict::Rejected)
        );
        assert_eq!(session.submit_round3_result(result), Ok(Verdict::Accepted));
        assert_eq!(session.status(), Status::Escaped);
        assert!(session.completion_token().is_some());
    }

    #[test]
    fn invalid_path_consumes_no_attempt() {
        let mut session: Session = Session::start(&agent(), test_config(), Vec::new()).unwrap();
        clear_round1(&mut session);
        clear_round2(&mut session);
        assert_eq!(
            session.submit_round3_path("D D jump").err(),
            Some(GameError::InvalidCommand("jump".to_string()))
        );
        assert_eq!(session.round_attempts(), 3);
        let report: PathReport = session.submit_round3_path("L").unwrap();
        assert!(matches!(report.run.outcome, Outcome::OutOfBounds { .. }));
        assert_eq!(report.attempts_left, 2);
    }

    #[test]
    fn expired_timer_freezes_play() {
        let config: GameConfig = GameConfig {
            mission_seconds: 3,
            ..test_config()
        };
        let mut session: Session = Session::start(&agent(), config, Vec::new()).unwrap();
        session.tick();
        session.tick();
        assert_eq!(session.tick(), TimerEvent::Expired);
        assert_eq!(
            session.submit_round1_answer("echo"),
            Err(GameError::TimeExpired)
        );
        assert_eq!(session.use_hint(), Err(GameError::TimeExpired));
        assert_eq!(session.status(), Status::InProgress);
        assert_eq!(session.log().last_message(), Some("Mission timer elapsed."));
    }

    #[test]
    fn actions_in_the_wrong_round() {
        let mut session: Session = Session::start(&agent(), test_config(), Vec::new()).unwrap();
        assert_eq!(
            session.submit_round2_answer("15"),
            Err(GameError::ActionNotAvailable)
        );
        assert_eq!(
            session.submit_round3_path("D").err(),
            Some(GameError::ActionNotAvailable)
        );
        assert_eq!(
            session.submit_round3_result("102"),
            Err(GameError::ActionNotAvailable)
        );
    }

    #[test]
    fn progress_is_published() {
        let recorder: Arc<Recorder> = Arc::new(Recorder::default());
        let mut session: Session = Session::start(
            &agent(),
            test_config(),
            vec![recorder.clone() as Arc<dyn SessionSink>],
        )
        .unwrap();
        session.submit_round1_answer("echo").unwrap();
        let summaries = recorder.summaries.lock().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].rewards, vec!["4".to_string()]);
        assert_eq!(summaries[1].round, 1);
    }
}
