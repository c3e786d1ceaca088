//! Offline self-play.
//!
//! Plays complete matches directly against the engine, with every player
//! issuing random legal orders from its own fogged view. Games run in
//! parallel on a rayon pool and are reported as JSONL records.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::board::{is_valid_player_count, GameError, Order, WorldState};
use crate::mapgen::{generate_map, MapGenConfig};
use crate::movegen::random_orders;
use crate::resolve::Resolver;

/// Configuration for self-play runs.
#[derive(Clone, Debug)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Players per game (1-6).
    pub num_players: usize,
    /// Turn cap; games still running at the cap are reported unfinished.
    pub max_turns: u32,
    /// Board generation settings. Each game gets its own map seed.
    pub map: MapGenConfig,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            num_players: 2,
            max_turns: 500,
            map: MapGenConfig::default(),
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

/// Result of one self-play game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub turns: u32,
    pub winners: Vec<usize>,
    pub game_over: bool,
    pub final_resources: Vec<u32>,
}

/// Plays a single game to completion or to the turn cap.
pub fn play_game(
    config: &SelfPlayConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, GameError> {
    let map = generate_map(&config.map, rng.gen());
    let mut state = WorldState::new(&map, config.num_players)?;
    let mut resolver = Resolver::new();

    while !state.game_over && state.turn < config.max_turns {
        let orders: Vec<Vec<Order>> = (0..state.num_players)
            .map(|player| random_orders(&state.player_view(player), player, rng))
            .collect();
        resolver.resolve(&mut state, orders, rng)?;
    }

    Ok(GameRecord {
        game_id,
        turns: state.turn,
        winners: state.winners.clone(),
        game_over: state.game_over,
        final_resources: state.player_resources.clone(),
    })
}

fn game_rng(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn describe(game: &GameRecord) -> String {
    match (game.game_over, game.winners.as_slice()) {
        (false, _) => "unfinished".to_string(),
        (true, []) => "stalemate".to_string(),
        (true, winners) => format!("won by {:?}", winners),
    }
}

/// Runs self-play, producing all game records ordered by game ID.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, GameError> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| games.push(game))?;
    games.sort_by_key(|g| g.game_id);
    Ok(games)
}

/// Runs self-play, calling `on_game` with each completed game record.
///
/// When `config.threads > 1`, games are played concurrently and delivered in
/// completion order. An unsupported player count fails before any game runs.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F) -> Result<(), GameError>
where
    F: FnMut(GameRecord) + Send,
{
    if !is_valid_player_count(config.num_players) {
        return Err(GameError::InvalidPlayerCount(config.num_players));
    }
    if config.threads > 1 {
        run_self_play_parallel(config, on_game)
    } else {
        run_self_play_sequential(config, on_game)
    }
}

fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_game: F) -> Result<(), GameError>
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let game_start = Instant::now();
        let game = play_game(config, i, &mut game_rng(config.seed, i))?;
        if !config.quiet {
            eprintln!(
                "Game {}/{}: {} after {} turns ({:.2}s)",
                i + 1,
                config.num_games,
                describe(&game),
                game.turns,
                game_start.elapsed().as_secs_f64(),
            );
        }
        on_game(game);
    }
    Ok(())
}

fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_game: F) -> Result<(), GameError>
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<Result<GameRecord, GameError>>();

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
    {
        Ok(pool) => pool,
        Err(_) => return run_self_play_sequential(config, on_game),
    };

    std::thread::scope(|scope| {
        scope.spawn(|| {
            pool.install(|| {
                (0..config.num_games)
                    .into_par_iter()
                    .try_for_each_with(tx, |tx, i| {
                        let game_start = Instant::now();
                        let game = play_game(config, i, &mut game_rng(config.seed, i));
                        if let (Ok(game), false) = (&game, config.quiet) {
                            let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                            eprintln!(
                                "Game {}/{}: {} after {} turns ({:.2}s)",
                                n,
                                config.num_games,
                                describe(game),
                                game.turns,
                                game_start.elapsed().as_secs_f64(),
                            );
                        }
                        // Fails once the receiver gave up, which stops the pool.
                        tx.send(game)
                    })
            })
            .ok();
        });

        for game in rx {
            on_game(game?);
        }
        Ok(())
    })
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Prints a summary of self-play results to stderr.
pub fn print_summary(games: &[GameRecord], num_players: usize) {
    let total = games.len();
    let mut win_counts = vec![0usize; num_players];
    let mut stalemates = 0usize;
    let mut unfinished = 0usize;
    let mut total_turns = 0u64;

    for game in games {
        total_turns += u64::from(game.turns);
        match (game.game_over, game.winners.is_empty()) {
            (false, _) => unfinished += 1,
            (true, true) => stalemates += 1,
            (true, false) => {
                for &w in &game.winners {
                    if let Some(count) = win_counts.get_mut(w) {
                        *count += 1;
                    }
                }
            }
        }
    }

    eprintln!("=== Self-Play Summary ===");
    eprintln!("Games: {}", total);
    eprintln!(
        "Avg turns/game: {:.1}",
        total_turns as f64 / total.max(1) as f64
    );
    eprintln!("Stalemates: {}", stalemates);
    eprintln!("Unfinished: {}", unfinished);
    eprintln!("Win distribution:");
    for (player, &wins) in win_counts.iter().enumerate() {
        let pct = 100.0 * wins as f64 / total.max(1) as f64;
        eprintln!("  player {}: {} ({:.1}%)", player, wins, pct);
    }
}
