//! Self-play CLI.
//!
//! Plays random-bot matches on generated maps and writes one JSON record per
//! game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --players N     Players per game, 1-6 (default: 2)
//!   --max-turns N   Turn cap per game (default: 500)
//!   --radius N      Board radius, 3-64 (default: 8)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress progress and summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;
use std::str::FromStr;
use std::time::Instant;

use apiary::selfplay::{self, SelfPlayConfig};

fn parse_value<T: FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).map(|v| v.parse()) {
        Some(Ok(value)) => value,
        _ => {
            eprintln!("invalid {} value", flag);
            print_usage();
            process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = SelfPlayConfig::default();
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                config.num_games = parse_value(&args, i, "--games");
            }
            "--players" => {
                i += 1;
                config.num_players = parse_value(&args, i, "--players");
            }
            "--max-turns" => {
                i += 1;
                config.max_turns = parse_value(&args, i, "--max-turns");
            }
            "--radius" => {
                i += 1;
                config.map.radius = parse_value(&args, i, "--radius");
            }
            "--threads" => {
                i += 1;
                config.threads = parse_value(&args, i, "--threads");
            }
            "--seed" => {
                i += 1;
                config.seed = parse_value(&args, i, "--seed");
            }
            "--output" => {
                i += 1;
                output_path = Some(parse_value(&args, i, "--output"));
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    if !config.quiet {
        eprintln!(
            "Self-play: {} games, {} players, radius {}, max {} turns, {} threads",
            config.num_games,
            config.num_players,
            config.map.radius,
            config.max_turns,
            config.threads
        );
    }

    let start = Instant::now();
    let games = match selfplay::run_self_play(&config) {
        Ok(games) => games,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if !config.quiet {
        eprintln!(
            "Completed {} games in {:.1}s",
            games.len(),
            start.elapsed().as_secs_f64()
        );
        selfplay::print_summary(&games, config.num_players);
    }

    let result = match &output_path {
        Some(path) => File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            selfplay::write_jsonl(&games, &mut writer)
        }),
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            selfplay::write_jsonl(&games, &mut writer).and_then(|_| writer.flush())
        }
    };

    if let Err(e) = result {
        eprintln!("failed to write output: {}", e);
        process::exit(1);
    }
    if let (Some(path), false) = (output_path, config.quiet) {
        eprintln!("Wrote {} games to {}", games.len(), path);
    }
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --players N      Players per game, 1-6 (default: 2)");
    eprintln!("  --max-turns N    Turn cap per game (default: 500)");
    eprintln!("  --radius N       Board radius, 3-64 (default: 8)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress and summary output");
    eprintln!("  --help           Show this help");
}
