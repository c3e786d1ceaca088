//! Apiary arena.
//!
//! Runs one live session through the turn scheduler on a generated map, with
//! every seat taken by a random bot that reads its fogged view each turn and
//! submits orders like a remote client would.
//!
//! Usage:
//!   cargo run --release --bin apiary -- [OPTIONS]
//!
//! Options:
//!   --players N     Number of bots, 1-6 (default: 2)
//!   --radius N      Board radius, 3-64 (default: 8)
//!   --max-turns N   Stop watching after this many turns (default: 300)
//!   --seed N        Seed for map, shuffle and bots (default: entropy)
//!
//! Timing and persistence follow `APIARY_HISTORY_DIR`, `APIARY_SEED` and
//! `APIARY_DEV_MODE`; log verbosity follows `RUST_LOG`.

use std::env;
use std::process;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, error, info};

use apiary::mapgen::{generate_map, MapGenConfig};
use apiary::movegen::random_orders;
use apiary::protocol::format_orders;
use apiary::session::{SessionConfig, SessionManager};

struct ArenaArgs {
    players: usize,
    radius: u32,
    max_turns: u32,
    seed: Option<u64>,
}

fn parse_args() -> ArenaArgs {
    let args: Vec<String> = env::args().collect();
    let mut parsed = ArenaArgs {
        players: 2,
        radius: MapGenConfig::default().radius,
        max_turns: 300,
        seed: None,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if matches!(flag, "--help" | "-h") {
            print_usage();
            process::exit(0);
        }
        i += 1;
        let value = args.get(i).map(String::as_str).unwrap_or_default();
        let ok = match flag {
            "--players" => value.parse().map(|v| parsed.players = v).is_ok(),
            "--radius" => value.parse().map(|v| parsed.radius = v).is_ok(),
            "--max-turns" => value.parse().map(|v| parsed.max_turns = v).is_ok(),
            "--seed" => value.parse().map(|v| parsed.seed = Some(v)).is_ok(),
            other => {
                eprintln!("Unknown argument: {}", other);
                false
            }
        };
        if !ok {
            print_usage();
            process::exit(1);
        }
        i += 1;
    }
    parsed
}

fn print_usage() {
    eprintln!("Usage: apiary [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --players N      Number of bots, 1-6 (default: 2)");
    eprintln!("  --radius N       Board radius, 3-64 (default: 8)");
    eprintln!("  --max-turns N    Stop watching after this many turns (default: 300)");
    eprintln!("  --seed N         Seed for map, shuffle and bots (default: entropy)");
    eprintln!("  --help           Show this help");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    let mut config = SessionConfig::from_env();
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let seed = config.seed.unwrap_or_else(rand::random);

    let map_config = MapGenConfig {
        radius: args.radius,
        ..Default::default()
    };
    let map = generate_map(&map_config, seed);
    let manager = SessionManager::new(config);

    let ticket = match manager.create_session(args.players, "generated", &map) {
        Ok(ticket) => ticket,
        Err(e) => {
            error!(error = %e, "cannot create session");
            process::exit(1);
        }
    };
    let mut observer = match manager.subscribe(&ticket.id) {
        Ok(rx) => rx,
        Err(e) => {
            error!(error = %e, "cannot observe session");
            process::exit(1);
        }
    };

    for seat in 0..args.players {
        let manager = manager.clone();
        let session_id = ticket.id.clone();
        tokio::spawn(async move {
            run_bot(manager, session_id, seat, seed.wrapping_add(seat as u64 + 1)).await;
        });
    }

    let mut last_turn = 0;
    while let Some(notification) = observer.recv().await {
        last_turn = notification.turn;
        debug!(turn = notification.turn, "turn advanced");
        if notification.game_over || notification.turn >= args.max_turns {
            break;
        }
    }

    let Ok(session) = manager.get(&ticket.id) else {
        error!(session = %ticket.id, "session vanished before the game ended");
        process::exit(1);
    };
    let state = session.state();
    if let Some(last) = session.history().last() {
        debug!(orders = %format_orders(&last.orders), "final turn orders");
    }
    info!(
        session = %ticket.id,
        turns = last_turn,
        game_over = state.game_over,
        winners = ?state.winners,
        resources = ?state.player_resources,
        "arena finished"
    );
}

/// One seat: joins the session, then answers every turn notification with a
/// fresh batch of random orders until the game ends.
async fn run_bot(manager: SessionManager, session_id: String, seat: usize, seed: u64) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut turns = match manager.subscribe(&session_id) {
        Ok(rx) => rx,
        Err(e) => {
            error!(seat, error = %e, "bot cannot subscribe");
            return;
        }
    };
    let registration = match manager.register_player(&session_id, &format!("bot-{}", seat)) {
        Ok(registration) => registration,
        Err(e) => {
            error!(seat, error = %e, "bot cannot join");
            return;
        }
    };

    while let Some(notification) = turns.recv().await {
        if notification.game_over {
            break;
        }
        let view = match manager.get_view(&session_id, &registration.token) {
            Ok(view) => view,
            Err(e) => {
                error!(seat, error = %e, "bot lost its view");
                return;
            }
        };
        let orders = random_orders(&view, registration.player_id, &mut rng);
        if let Err(e) = manager.submit_orders(&session_id, &registration.token, orders) {
            debug!(seat, turn = notification.turn, error = %e, "orders rejected");
        }
    }
}
