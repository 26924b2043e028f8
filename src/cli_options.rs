/*
cli_options.rs

Copyright 2025 Hervé Quatremain

This file is part of Ropeforge.

Ropeforge is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Ropeforge is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Ropeforge. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Process command-line options.
//!
//! Ropeforge is a developer tool: it generates rope puzzle levels, tunes
//! them toward a difficulty target, and prints them as JSON that can be
//! pasted into a level file.
//!
//! # Examples
//!
//! Generate three tuned 10x10 levels and print statistics:
//!
//! ```
//! $ ropeforge -x 10 -y 10 --count 3 --seed 42 --summary
//! ```
//!
//! Generate one untuned level from a configuration file:
//!
//! ```
//! $ ropeforge --config level_params.json --no-tune
//! ```

use clap::Parser;
use log::debug;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::config::{COPYRIGHT_NOTICE, GenerationConfig};
use crate::generator::autotune::{self, AutoTuneResult};
use crate::generator::grid::Grid;
use crate::generator::growth;
use crate::generator::level::Level;
use crate::generator::rng::LevelRng;
use crate::generator::scorer::{self, Diagnostics};

/// Build rope puzzle levels for developers.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// Width of the grid in cells
    #[arg(short = 'x', long, default_value_t = 10)]
    map_x: usize,

    /// Height of the grid in cells
    #[arg(short = 'y', long, default_value_t = 10)]
    map_y: usize,

    /// Path to a JSON generation configuration file
    #[arg(short = 'g', long)]
    config: Option<PathBuf>,

    /// Number of levels to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Random seed; overrides the configuration file
    #[arg(short, long)]
    seed: Option<u32>,

    /// Lower bound of the difficulty target range
    #[arg(long)]
    target_min: Option<f64>,

    /// Upper bound of the difficulty target range
    #[arg(long)]
    target_max: Option<f64>,

    /// Run a single generation pass without difficulty tuning
    #[arg(short, long, default_value_t = false)]
    no_tune: bool,

    /// Print some statistics after generating the levels
    #[arg(short = 'm', long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Read the generation configuration from the given file, or return the
/// defaults when no file is provided.
fn load_config(path: Option<&PathBuf>) -> Result<GenerationConfig, Box<dyn Error>> {
    match path {
        None => Ok(GenerationConfig::default()),
        Some(path) => {
            let file: File = File::open(path)?;
            let reader: BufReader<File> = BufReader::new(file);
            Ok(serde_json::from_reader(reader)?)
        }
    }
}

/// Parse and process command-line options. Return the process exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    //
    // Assemble the configuration from the file and the option overrides
    //
    let mut config: GenerationConfig = match load_config(args.config.as_ref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Cannot read the configuration file: {error}");
            return 1;
        }
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(target_min) = args.target_min {
        config.target_score_min = target_min;
    }
    if let Some(target_max) = args.target_max {
        config.target_score_max = target_max;
    }

    let grid: Grid = Grid::new(args.map_x, args.map_y);
    let eligible: Vec<usize> = (0..grid.num_cells()).collect();

    let mut total_score: f64 = 0.0;
    let mut total_attempts: usize = 0;
    let mut failures: usize = 0;

    for i in 0..args.count {
        debug!("Level {i}");

        // Shift the seed so that every level of the batch is distinct while
        // the batch as a whole stays reproducible. Tuning consumes one seed
        // per attempt, so the shift steps over the whole attempt budget.
        let mut run_config: GenerationConfig = config.clone();
        if let Some(seed) = config.seed {
            run_config.seed = Some(seed.wrapping_add((i * config.max_tune_attempts.max(1)) as u32));
        }

        let output: String = if args.no_tune {
            let mut rng: LevelRng = LevelRng::from_seed(run_config.seed);
            let level: Level = growth::generate_level(&grid, &eligible, &run_config, &mut rng);
            let diagnostics: Diagnostics = scorer::score(&level);
            total_score += diagnostics.difficulty_score;
            match serde_json::to_string_pretty(&serde_json::json!({
                "level": level,
                "diagnostics": diagnostics,
            })) {
                Ok(text) => text,
                Err(error) => {
                    eprintln!("Cannot serialize the level: {error}");
                    return 1;
                }
            }
        } else {
            let result: AutoTuneResult = autotune::tune(&grid, &eligible, &run_config);
            total_score += result.score;
            total_attempts += result.attempts;
            if result.reason.is_some() {
                failures += 1;
            }
            match serde_json::to_string_pretty(&result) {
                Ok(text) => text,
                Err(error) => {
                    eprintln!("Cannot serialize the tuning result: {error}");
                    return 1;
                }
            }
        };
        println!("{output}");
    }

    //
    // Print some stats
    //
    if args.summary && args.count > 0 {
        println!(
            "
    average score = {}
 average attempts = {}
         failures = {}",
            total_score / args.count as f64,
            total_attempts as f64 / args.count as f64,
            failures
        );
    }
    0
}
