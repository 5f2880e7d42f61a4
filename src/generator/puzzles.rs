/*
puzzles.rs

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

//! Puzzle catalog.
//!
//! The catalog stores the content of the three rounds:
//!
//! * Round 1: five riddles, each one rewarding a digit of the unlock code.
//! * Round 2: code-tracing puzzles. One of them is randomly selected.
//! * Round 3 (cryptarithm variant): cryptarithm templates. One of them is randomly selected.
//!
//! The round-3 laser grid is not stored in the catalog: it is generated by
//! [`crate::generator::grid::generate_grid`].

use rand::Rng;

/// Number of round-1 items.
pub const ROUND1_LEN: usize = 5;

/// Round-1 riddle.
#[derive(Debug, PartialEq, Eq)]
pub struct Round1Item {
    /// Riddle.
    pub prompt: &'static str,

    /// Expected answer. The comparison ignores the case.
    pub expected_answer: &'static str,

    /// Digit collected when the answer is correct.
    pub reward: &'static str,

    /// Text revealed when the participant uses a hint.
    pub hint: &'static str,
}

impl Round1Item {
    /// Whether the answer is correct (case-insensitive, surrounding whitespace ignored).
    pub fn accepts(&self, answer: &str) -> bool {
        answer.trim().to_lowercase() == self.expected_answer.to_lowercase()
    }
}

/// Round-2 code-tracing puzzle.
#[derive(Debug, PartialEq, Eq)]
pub struct CodePuzzle {
    pub display_name: &'static str,

    /// Program to trace.
    pub code: &'static str,

    /// Output of the program.
    pub expected_output: &'static str,

    pub hint: &'static str,
}

impl CodePuzzle {
    /// Whether the answer is the exact program output (surrounding whitespace ignored).
    pub fn accepts(&self, answer: &str) -> bool {
        answer.trim() == self.expected_output
    }
}

/// Round-3 cryptarithm.
#[derive(Debug, PartialEq, Eq)]
pub struct CryptarithmTemplate {
    /// Expression shown to the participant.
    pub display_expression: &'static str,

    /// Solution, as letter and digit pairs. Hints reveal these entries in order.
    pub letter_to_digit: &'static [(char, u8)],

    /// Right-hand side of the expression, in its canonical decimal form.
    pub numeric_result: &'static str,
}

impl CryptarithmTemplate {
    /// Whether the answer is the numeric result. The comparison is a string comparison, so
    /// leading zeros are rejected.
    pub fn accepts(&self, answer: &str) -> bool {
        answer.trim() == self.numeric_result
    }
}

/// Any catalog item. Consumers match all the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleItem {
    Round1(&'static Round1Item),
    Code(&'static CodePuzzle),
    Cryptarithm(&'static CryptarithmTemplate),
}

pub static ROUND1_ITEMS: [Round1Item; ROUND1_LEN] = [
    Round1Item {
        prompt: "I speak without a mouth and hear without ears. What am I?",
        expected_answer: "echo",
        reward: "4",
        hint: "Think of places that repeat sound.",
    },
    Round1Item {
        prompt: "I have keys but no locks. I have space but no rooms. What am I?",
        expected_answer: "keyboard",
        reward: "9",
        hint: "You use it to type.",
    },
    Round1Item {
        prompt: "Pattern: 2, 4, 8, 16, ?",
        expected_answer: "32",
        reward: "3",
        hint: "Each term doubles.",
    },
    Round1Item {
        prompt: "Fix: prnt(\"Hello Agent\") - what is the correct function name?",
        expected_answer: "print",
        reward: "7",
        hint: "Standard Python print() function.",
    },
    Round1Item {
        prompt: "Which operator checks equality in Python? (example: x __ 10)",
        expected_answer: "==",
        reward: "1",
        hint: "Use the equality operator.",
    },
];

pub static CODE_PUZZLES: [CodePuzzle; 4] = [
    CodePuzzle {
        display_name: "Puzzle 1",
        code: "n = 4
total = 0
for i in range(n):
    for j in range(i+1):
        total += (i*j) + 1
print(total)",
        expected_output: "35",
        hint: "Inner loop runs 1,2,3,4 times.",
    },
    CodePuzzle {
        display_name: "Puzzle 2 (bitwise)",
        code: "x = 13
y = 6
res = 0
for k in range(4):
    res += (x & y) << k
    x = x >> 1
    y = y >> 1
print(res)",
        expected_output: "12",
        hint: "AND bits and shift left by k each iteration.",
    },
    CodePuzzle {
        display_name: "Puzzle 3 (cumulative)",
        code: "arr = [2,3,5,7]
val = 1
s = 0
for a in arr:
    val *= a
    s += val
print(s)",
        expected_output: "248",
        hint: "Running products are summed.",
    },
    CodePuzzle {
        display_name: "Puzzle 4",
        code: "x = 0
for i in range(1,7):
    if i % 2 == 0:
        x += i // 2
    else:
        x += i
print(x)",
        expected_output: "15",
        hint: "Odds add i; evens add i//2.",
    },
];

pub static CRYPTARITHM_TEMPLATES: [CryptarithmTemplate; 2] = [
    CryptarithmTemplate {
        display_expression: "TO + GO = OUT",
        letter_to_digit: &[('O', 1), ('T', 2), ('G', 8), ('U', 0)],
        numeric_result: "102",
    },
    CryptarithmTemplate {
        display_expression: "SEND + MORE = MONEY",
        letter_to_digit: &[
            ('M', 1),
            ('O', 0),
            ('S', 9),
            ('E', 5),
            ('N', 6),
            ('D', 7),
            ('R', 8),
            ('Y', 2),
        ],
        numeric_result: "10652",
    },
];

/// Return the round-1 item at the given position, or None when all the items are answered.
pub fn round1_item(index: usize) -> Option<&'static Round1Item> {
    ROUND1_ITEMS.get(index)
}

/// Select a code-tracing puzzle.
pub fn pick_random_code_puzzle<R: Rng + ?Sized>(rng: &mut R) -> &'static CodePuzzle {
    let i: usize = rng.random_range(0..CODE_PUZZLES.len());
    &CODE_PUZZLES[i]
}

/// Select a cryptarithm template.
pub fn pick_cryptarithm_template<R: Rng + ?Sized>(rng: &mut R) -> &'static CryptarithmTemplate {
    let i: usize = rng.random_range(0..CRYPTARITHM_TEMPLATES.len());
    &CRYPTARITHM_TEMPLATES[i]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn round1_answers_ignore_case_and_spaces() {
        let item: &Round1Item = round1_item(1).unwrap();
        assert!(item.accepts("  KeyBoard "));
        assert!(!item.accepts("key board"));
        assert!(round1_item(ROUND1_LEN).is_none());
    }

    #[test]
    fn code_answers_are_exact() {
        let puzzle: &CodePuzzle = &CODE_PUZZLES[3];
        assert!(puzzle.accepts("15"));
        assert!(puzzle.accepts(" 15\n"));
        assert!(!puzzle.accepts("015"));
        assert!(!puzzle.accepts("15.0"));
    }

    #[test]
    fn cryptarithm_results_are_compared_as_strings() {
        let template: &CryptarithmTemplate = &CRYPTARITHM_TEMPLATES[0];
        assert!(template.accepts("102"));
        assert!(template.accepts(" 102 "));
        assert!(!template.accepts("0102"));
        assert!(!template.accepts("1 02"));
    }

    /// Replace the letters of a word by their digits.
    fn word_value(template: &CryptarithmTemplate, word: &str) -> u64 {
        word.chars().fold(0, |acc, letter| {
            let digit: u8 = template
                .letter_to_digit
                .iter()
                .find(|(l, _)| *l == letter)
                .map(|(_, d)| *d)
                .unwrap();
            acc * 10 + digit as u64
        })
    }

    #[test]
    fn cryptarithm_solutions_are_consistent() {
        for template in &CRYPTARITHM_TEMPLATES {
            let (lhs, rhs) = template.display_expression.split_once(" = ").unwrap();
            let sum: u64 = lhs.split(" + ").map(|w| word_value(template, w)).sum();
            assert_eq!(sum, word_value(template, rhs));
            assert_eq!(sum.to_string(), template.numeric_result);
        }
    }

    #[test]
    fn random_selection_is_deterministic_for_a_seed() {
        let mut a: StdRng = StdRng::seed_from_u64(7);
        let mut b: StdRng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(pick_random_code_puzzle(&mut a), pick_random_code_puzzle(&mut b));
            assert_eq!(
                pick_cryptarithm_template(&mut a),
                pick_cryptarithm_template(&mut b)
            );
        }
    }
}
