/*
console.rs

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

//! Interactive console.
//!
//! After login, the console reads one command per line. The participant plays the mission with
//! the following commands:
//!
//! ```text
//! status              Show the timer, the progress, and the current puzzle
//! answer <text>       Answer the riddle (round 1), the program output (round 2), or the
//!                     cryptarithm result (round 3)
//! unlock <code>       Enter the code made of the round-1 digits
//! path <moves>        Cross the laser grid, for example: path D D R R or path DDRR
//! hint                Use a hint
//! log                 Show the mission log
//! logout              Leave
//! ```
//!
//! The observer manages the participants and follows the game:
//!
//! ```text
//! agents                           List the active participants
//! add <user> <password> <name>     Register or update a participant
//! remove <user>                    Deactivate a participant
//! clear                            Deactivate all the participants
//! roster                           Show the progress of the participants
//! sessions                         Show the recent sessions
//! leaderboard                      Show the fastest escapes
//! logout                           Leave
//! ```

use log::debug;
use std::error::Error;
use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::{Authenticator, Identity, Role};
use crate::config::GameConfig;
use crate::errors::GameError;
use crate::game::{Hint, PathReport, Round, Session, SessionSink, Status, Verdict};
use crate::generator::grid::Coord;
use crate::generator::puzzles::{PuzzleItem, ROUND1_LEN};
use crate::navigation::Outcome;
use crate::saver::agents::{AgentRecord, CredentialStore, SaverAgents};
use crate::saver::roster::SaverRoster;
use crate::saver::sessions::{SaverSessions, SessionRecord};
use crate::saver::worker::Writer;

const PARTICIPANT_HELP: &str = "Commands: status, answer <text>, unlock <code>, path <moves>, \
hint, log, logout";

const OBSERVER_HELP: &str = "Commands: agents, add <user> <password> <name>, remove <user>, \
clear, roster, sessions, leaderboard, logout";

/// Console bound to an input and an output stream.
pub struct Console<R: BufRead, W: Write> {
    input: R,
    output: W,
    config: GameConfig,

    /// Directory of the JSON stores.
    data_dir: PathBuf,
}

/// Split a command line into the command word and its argument.
fn split_command(line: &str) -> (&str, &str) {
    match line.trim().split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (line.trim(), ""),
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Create a [`Console`] object.
    pub fn new(input: R, output: W, config: GameConfig, data_dir: PathBuf) -> Self {
        Self {
            input,
            output,
            config,
            data_dir,
        }
    }

    /// Give back the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Authenticate the user and process the commands until logout or end of input.
    ///
    /// # Errors
    ///
    /// The function returns [`GameError::InvalidCredentials`] when the login fails, and any I/O
    /// error on the console streams or on the data directory.
    pub fn run(&mut self, username: &str, password: &str) -> Result<(), Box<dyn Error>> {
        fs::create_dir_all(&self.data_dir)?;
        let store: SaverAgents = SaverAgents::new(self.data_dir.clone());
        let identity: Identity = match Authenticator::new(&store, &self.config)
            .login(username, password)
        {
            Ok(i) => i,
            Err(e) => {
                writeln!(self.output, "Login failed: {e}")?;
                return Err(Box::new(e));
            }
        };

        match identity.role {
            Role::Participant => self.participant(&identity),
            Role::Observer => self.observer(&store),
        }
    }

    /// Read the next command. Return None at the end of the input.
    fn read_command(&mut self) -> Result<Option<String>, Box<dyn Error>> {
        write!(self.output, "> ")?;
        self.output.flush()?;
        let mut line: String = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Participant command loop.
    fn participant(&mut self, identity: &Identity) -> Result<(), Box<dyn Error>> {
        let writer: Arc<Writer> = Arc::new(Writer::spawn(self.data_dir.clone()));
        let mut session: Session = Session::start(
            identity,
            self.config.clone(),
            vec![writer.clone() as Arc<dyn SessionSink>],
        )?;
        writeln!(
            self.output,
            "Welcome, agent {}. The clock is ticking.\n{PARTICIPANT_HELP}",
            identity.display_name
        )?;
        writeln!(self.output, "{}", status_text(&session))?;

        while let Some(line) = self.read_command()? {
            session.pump();
            let (command, argument) = split_command(&line);
            if command.is_empty() {
                continue;
            }
            if command == "logout" || command == "quit" {
                break;
            }
            match participant_command(&mut session, command, argument) {
                Ok(text) => writeln!(self.output, "{text}")?,
                Err(e) => writeln!(self.output, "{}", error_text(&e))?,
            }
        }

        session.logout();
        writer.shutdown();
        writeln!(self.output, "Disconnected.")?;
        Ok(())
    }

    /// Observer command loop.
    fn observer(&mut self, store: &SaverAgents) -> Result<(), Box<dyn Error>> {
        writeln!(self.output, "Observer console.\n{OBSERVER_HELP}")?;
        let roster: SaverRoster = SaverRoster::new(self.data_dir.clone());
        let sessions: SaverSessions = SaverSessions::new(self.data_dir.clone());

        while let Some(line) = self.read_command()? {
            let (command, argument) = split_command(&line);
            if command.is_empty() {
                continue;
            }
            if command == "logout" || command == "quit" {
                break;
            }
            let result: Result<String, Box<dyn Error>> =
                observer_command(store, &roster, &sessions, command, argument);
            match result {
                Ok(text) => writeln!(self.output, "{text}")?,
                Err(e) => writeln!(self.output, "Error: {e}")?,
            }
        }
        writeln!(self.output, "Disconnected.")?;
        Ok(())
    }
}

/// Run a participant command and return the text to display.
pub fn participant_command(
    session: &mut Session,
    command: &str,
    argument: &str,
) -> Result<String, GameError> {
    debug!("Participant command: {command} {argument}");
    match command {
        "status" => Ok(status_text(session)),
        "answer" => {
            let verdict: Verdict = match session.current_round() {
                Round::One => session.submit_round1_answer(argument)?,
                Round::Two => session.submit_round2_answer(argument)?,
                Round::Three => session.submit_round3_result(argument)?,
            };
            Ok(verdict_text(session, verdict))
        }
        "unlock" => {
            let verdict: Verdict = session.submit_unlock_code(argument)?;
            Ok(verdict_text(session, verdict))
        }
        "path" => {
            let report: PathReport = session.submit_round3_path(argument)?;
            Ok(path_text(session, &report))
        }
        "hint" => {
            let hint: Hint = session.use_hint()?;
            Ok(format!(
                "Hint: {hint}\nHints left: {}",
                session.hints_left()
            ))
        }
        "log" => Ok(session.log().render()),
        "help" => Ok(PARTICIPANT_HELP.to_string()),
        _ => Err(GameError::InvalidCommand(command.to_string())),
    }
}

/// Run an observer command and return the text to display.
pub fn observer_command(
    store: &dyn CredentialStore,
    roster: &SaverRoster,
    sessions: &SaverSessions,
    command: &str,
    argument: &str,
) -> Result<String, Box<dyn Error>> {
    debug!("Observer command: {command} {argument}");
    match command {
        "agents" => {
            let agents: Vec<AgentRecord> = store.list_active()?;
            if agents.is_empty() {
                return Ok("No active agent.".to_string());
            }
            Ok(agents
                .iter()
                .map(|a| {
                    format!(
                        "{:<12} {:<20} since {}",
                        a.username,
                        a.display_name,
                        a.created_at.format("%Y-%m-%d %H:%M")
                    )
                })
                .collect::<Vec<String>>()
                .join("\n"))
        }
        "add" => {
            let mut parts = argument.splitn(3, char::is_whitespace);
            let username: &str = parts.next().unwrap_or("");
            let password: &str = parts.next().unwrap_or("");
            let display_name: &str = parts.next().unwrap_or("").trim();
            store.upsert(username, password, display_name)?;
            Ok(format!("Agent {username} saved."))
        }
        "remove" => {
            if store.deactivate(argument)? {
                Ok(format!("Agent {argument} deactivated."))
            } else {
                Ok(format!("No active agent {argument}."))
            }
        }
        "clear" => {
            let count: usize = store.deactivate_all()?;
            Ok(format!("{count} agent(s) deactivated."))
        }
        "roster" => {
            let list = roster.get_roster()?;
            if list.is_empty() {
                return Ok("No agent has logged in yet.".to_string());
            }
            Ok(list
                .summaries()
                .iter()
                .map(|s| s.describe())
                .collect::<Vec<String>>()
                .join("\n"))
        }
        "sessions" => {
            let records: Vec<SessionRecord> = sessions.recent()?;
            if records.is_empty() {
                return Ok("No finished session.".to_string());
            }
            Ok(records
                .iter()
                .map(|r| r.describe())
                .collect::<Vec<String>>()
                .join("\n"))
        }
        "leaderboard" => {
            let board = sessions.leaderboard()?;
            if board.is_empty() {
                return Ok("Nobody escaped yet.".to_string());
            }
            Ok(board.render())
        }
        "help" => Ok(OBSERVER_HELP.to_string()),
        _ => Err(Box::new(GameError::InvalidCommand(command.to_string()))),
    }
}

/// Message for a gameplay error.
fn error_text(error: &GameError) -> String {
    match error {
        GameError::SessionClosed | GameError::TimeExpired => {
            format!("{}. Type logout to leave.", capitalize(&error.to_string()))
        }
        GameError::UnlockNotReady { .. } => format!(
            "{}. Answer all the questions first.",
            capitalize(&error.to_string())
        ),
        _ => format!("{}. Try again.", capitalize(&error.to_string())),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Message after an answer or an unlock code.
fn verdict_text(session: &Session, verdict: Verdict) -> String {
    match verdict {
        Verdict::Accepted => format!("Correct.\n{}", status_text(session)),
        Verdict::Rejected => match session.status() {
            Status::Failed => format!("Incorrect.\n{}", status_text(session)),
            _ if session.current_round() == Round::Three => format!(
                "Incorrect. Attempts left: {}",
                session.round_attempts()
            ),
            _ => "Incorrect. Try again.".to_string(),
        },
    }
}

/// Message after a path submission.
fn path_text(session: &Session, report: &PathReport) -> String {
    let outcome: String = match report.run.outcome {
        Outcome::Reached { steps } => format!("Goal reached in {steps} moves."),
        Outcome::ObstacleHit { at, .. } => format!("Laser hit at {at}!"),
        Outcome::OutOfBounds { step, .. } => format!("Move {} leaves the grid.", step + 1),
        Outcome::Incomplete { at, .. } => format!("The path stops at {at}, before the goal."),
    };
    match report.status {
        Status::Restarting => format!(
            "{outcome}\nNo attempt left. Back to Round 1, the timer keeps running.\n{}",
            status_text(session)
        ),
        Status::Escaped | Status::Failed => format!("{outcome}\n{}", status_text(session)),
        Status::InProgress => format!(
            "{outcome} Attempts left: {}\n{}",
            report.attempts_left,
            status_text(session)
        ),
    }
}

/// Describe the session and the current puzzle.
pub fn status_text(session: &Session) -> String {
    let mut out: String = format!(
        "[{}] {}  Status: {}\nDigits: [{}]  Hints left: {}",
        session.timer().display(),
        session.current_round(),
        session.status(),
        session.collected_rewards().join(" "),
        session.hints_left()
    );
    if session.current_round() == Round::Three {
        out.push_str(&format!("  Attempts left: {}", session.round_attempts()));
    }
    out.push('\n');

    match session.status() {
        Status::Escaped => {
            out.push_str(&format!(
                "MISSION COMPLETE. Completion token: {}",
                session.completion_token().unwrap_or("-")
            ));
            return out;
        }
        Status::Failed => {
            out.push_str("MISSION FAILED.");
            return out;
        }
        Status::InProgress | Status::Restarting => (),
    }
    if session.timer().is_expired() {
        out.push_str("Time is up.");
        return out;
    }

    match session.active_puzzle() {
        Some(PuzzleItem::Round1(item)) => out.push_str(&format!(
            "Question {}/{ROUND1_LEN}: {}\nanswer <text>",
            session.collected_rewards().len() + 1,
            item.prompt
        )),
        Some(PuzzleItem::Code(puzzle)) => out.push_str(&format!(
            "{}\n\n{}\n\nWhat does the program print? answer <output>",
            puzzle.display_name, puzzle.code
        )),
        Some(PuzzleItem::Cryptarithm(template)) => out.push_str(&format!(
            "Each letter stands for a different digit: {}\nWhat is the value of the result? \
             answer <number>",
            template.display_expression
        )),
        None => {
            if let Some(grid) = session.grid() {
                let trail: &[Coord] = match session.last_run() {
                    Some(run) => &run.trail,
                    None => &[],
                };
                out.push_str(&format!(
                    "Laser grid (S start, G goal, # laser hit, * last path):\n{}\
                     path <moves> (U, D, L, R)",
                    grid.render(trail, Some(session.revealed_obstacles()))
                ));
            } else if session.is_unlock_pending() {
                out.push_str("All the digits are collected. unlock <code>");
            }
        }
    }
    out
}
