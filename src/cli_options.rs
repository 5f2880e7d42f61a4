/*
cli_options.rs

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

//! Process command-line options.
//!
//! # Examples
//!
//! List the content of the puzzle catalog:
//!
//! ```text
//! $ nightfall --ls
//! ```
//!
//! Generate three 6x6 laser grids and print some statistics:
//!
//! ```text
//! $ nightfall --grid -c 3 --size 6 --obstacles 0.4 --summary
//! ```
//!
//! Register a participant, and then play:
//!
//! ```text
//! $ nightfall -u host -p admin
//! > add agent007 secret James Bond
//! > logout
//! $ nightfall -u agent007 -p secret
//! ```

use clap::{CommandFactory, Parser};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::{COPYRIGHT_NOTICE, ExhaustionPolicy, GameConfig, Round3Variant};
use crate::console::Console;
use crate::generator::grid::{self, GridPuzzle};
use crate::generator::puzzles;
use crate::navigation;

/// OPERATION: NIGHTFALL, a three-round escape room for the terminal.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// List the puzzle catalog
    #[arg(long, default_value_t = false)]
    ls: bool,

    /// Generate laser grids
    #[arg(short, long, default_value_t = false, group = "generate")]
    grid: bool,

    /// Number of grids to generate
    #[arg(short, long, default_value_t = 1, requires = "generate")]
    count: usize,

    /// Grid size (overrides the configuration)
    #[arg(long)]
    size: Option<usize>,

    /// Obstacle probability, between 0 and 1 (overrides the configuration)
    #[arg(long)]
    obstacles: Option<f64>,

    /// Print some statistics after generating the grids
    #[arg(short, long, default_value_t = false, requires = "generate")]
    summary: bool,

    /// Log in and start the console
    #[arg(short, long, requires = "password")]
    user: Option<String>,

    /// Password for the login
    #[arg(short, long, requires = "user")]
    password: Option<String>,

    /// Directory for the credentials, the roster, and the session records
    #[arg(long, default_value = ".nightfall")]
    data_dir: PathBuf,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// What happens when the round-3 grid attempts are exhausted
    #[arg(value_enum, long)]
    policy: Option<ExhaustionPolicy>,

    /// Round-3 puzzle
    #[arg(value_enum, long)]
    variant: Option<Round3Variant>,

    /// Mission duration in seconds
    #[arg(long)]
    mission_seconds: Option<u32>,

    /// Seed for the random generator
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Build the configuration from the file and the command-line options.
fn build_config(args: &Args) -> Result<GameConfig, String> {
    let mut config: GameConfig = match &args.config {
        Some(path) => GameConfig::load(path).map_err(|e| format!("{}: {e}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(size) = args.size {
        config.grid_size = size;
    }
    if let Some(p) = args.obstacles {
        config.obstacle_probability = p;
    }
    if let Some(policy) = args.policy {
        config.exhaustion_policy = policy;
    }
    if let Some(variant) = args.variant {
        config.round3_variant = variant;
    }
    if let Some(seconds) = args.mission_seconds {
        config.mission_seconds = seconds;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate().map_err(|e| e.to_string())
}

/// Print the catalog.
fn list_catalog() {
    println!("Round 1:");
    for (i, item) in puzzles::ROUND1_ITEMS.iter().enumerate() {
        println!(
            "  {}. {}  [answer: {}, digit: {}]",
            i + 1,
            item.prompt,
            item.expected_answer,
            item.reward
        );
    }
    println!("Round 2:");
    for puzzle in &puzzles::CODE_PUZZLES {
        println!(
            "  {}  [output: {}]",
            puzzle.display_name, puzzle.expected_output
        );
    }
    println!("Round 3 (cryptarithm variant):");
    for template in &puzzles::CRYPTARITHM_TEMPLATES {
        println!(
            "  {}  [result: {}]",
            template.display_expression, template.numeric_result
        );
    }
}

/// Generate and print grids.
fn generate_grids(config: &GameConfig, count: usize, summary: bool) -> u8 {
    let mut rng: StdRng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut total: f32 = 0.0;
    let mut max: f32 = 0.0;
    let mut repaired: usize = 0;
    let mut obstacles: usize = 0;
    let mut route_len: usize = 0;

    for i in 0..count {
        debug!("Iteration {i}");
        let start: Instant = Instant::now();
        let grid: GridPuzzle =
            match grid::generate_grid(&mut rng, config.grid_size, config.obstacle_probability) {
                Ok(g) => g,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return 1;
                }
            };
        let duration: f32 = start.elapsed().as_secs_f32();
        total += duration;
        if duration > max {
            max = duration;
        }

        // A generated grid must always be solvable
        let route: Vec<grid::Coord> = match grid.shortest_route() {
            Some(r) => r,
            None => {
                eprintln!("Unsolvable grid:\n{}", grid.render(&[], None));
                panic!("Bug: the generated grid has no route to the goal");
            }
        };
        if grid.is_repaired() {
            repaired += 1;
        }
        obstacles += grid.num_obstacles();
        route_len += route.len() - 1;

        let moves: Vec<String> = navigation::moves_along(&route)
            .iter()
            .map(|d| d.to_string())
            .collect();
        println!("{}", grid.render(&[], None));
        println!("Shortest route: {}\n", moves.join(" "));
    }

    if summary && count > 0 {
        println!(
            "
          total time = {}s
        average time = {}s
            max time = {}s
   average obstacles = {}
average route length = {}
      repaired grids = {}",
            total,
            total / count as f32,
            max,
            obstacles as f32 / count as f32,
            route_len as f32 / count as f32,
            repaired
        );
    }
    0
}

/// Parse and process command-line options. Return the exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        println!("DEBUG");
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let config: GameConfig = match build_config(&args) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {msg}");
            return 2;
        }
    };
    debug!("Configuration: {config:?}");

    //
    // List the catalog
    //
    if args.ls {
        list_catalog();
        return 0;
    }

    //
    // Generate grids
    //
    if args.grid {
        return generate_grids(&config, args.count, args.summary);
    }

    //
    // Interactive console
    //
    if let (Some(user), Some(password)) = (&args.user, &args.password) {
        let stdin = io::stdin();
        let mut console = Console::new(stdin.lock(), io::stdout(), config, args.data_dir.clone());
        return match console.run(user, password) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: {e}");
                1
            }
        };
    }

    let _ = Args::command().print_help();
    2
}
