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

//! Save and restore the observer roster.
//!
//! The saved object is a serialization of the [`Roster`] object in JSON format by using
//! [`serde`].

use log::debug;
use std::error::Error;
use std::fs::{File, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use crate::roster::{Roster, SessionSummary};

/// Object to save and restore the roster.
pub struct SaverRoster {
    /// Absolute path to the save file.
    save_file: PathBuf,
}

impl SaverRoster {
    /// Create a [`SaverRoster`] object.
    ///
    /// The provided [`PathBuf`] is the path to the directory where the roster is saved.
    pub fn new(mut data_dir: PathBuf) -> Self {
        data_dir.push("roster.json");
        debug!("Roster file: {data_dir:?}");
        Self {
            save_file: data_dir,
        }
    }

    /// Retrieve the [`Roster`] object.
    ///
    /// Return an empty roster if the roster file does not exist.
    pub fn get_roster(&self) -> Result<Roster, Box<dyn Error>> {
        let file: File = match File::open(&self.save_file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(Roster::new()),
                _ => return Err(Box::new(error)),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let roster: Roster = serde_json::from_reader(reader)?;
        Ok(roster)
    }

    /// Save the provided [`Roster`] object.
    pub fn save_roster(&self, roster: &Roster) -> Result<(), Box<dyn Error>> {
        let file: File = File::create(&self.save_file)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        serde_json::to_writer(&mut writer, roster)?;
        writer.flush()?;
        Ok(())
    }

    /// Replace the summary of a participant in the saved roster.
    pub fn update(&self, summary: &SessionSummary) -> Result<(), Box<dyn Error>> {
        let mut roster: Roster = self.get_roster()?;
        roster.update(summary.clone());
        self.save_roster(&roster)
    }

    /// Delete the roster file.
    pub fn delete_save(&self) {
        let _ = remove_file(&self.save_file);
    }
}
