/*
token.rs

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

//! Completion token.
//!
//! A participant who escapes receives a token to paste in the victory claim form. The token is
//! only used to cross-reference claims with the session records by hand: it is not a secret and
//! is not guaranteed to be unique.
//!
//! Format: `<ID>-<TIME>-<RAND>`, where `ID` is up to four alphanumeric characters of the
//! username, `TIME` the completion time in milliseconds since the Unix epoch written in base 36,
//! and `RAND` four random characters. All the letters are upper case.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Characters used for the random part.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of username characters kept in the token.
const ID_LEN: usize = 4;

/// Number of random characters.
const RANDOM_LEN: usize = 4;

/// Write a number in base 36, upper case.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits: Vec<u8> = Vec::with_capacity(13);
    while value > 0 {
        let d: u8 = (value % 36) as u8;
        digits.push(if d < 10 { b'0' + d } else { b'A' + d - 10 });
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Build a completion token for the participant.
pub fn completion_token<R: Rng + ?Sized>(username: &str, when: DateTime<Utc>, rng: &mut R) -> String {
    let mut id: String = username
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(ID_LEN)
        .collect::<String>()
        .to_ascii_uppercase();
    if id.is_empty() {
        id.push_str("AGNT");
    }

    let millis: u64 = u64::try_from(when.timestamp_millis()).unwrap_or(0);
    let random: String = (0..RANDOM_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect();

    format!("{id}-{}-{random}", to_base36(millis))
}
