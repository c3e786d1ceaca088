//! Session scheduler behaviour under a paused tokio clock.
//!
//! Timers auto-advance whenever the runtime is idle, so waiting on an
//! observer channel fast-forwards through sync delays and turn deadlines.

use std::time::Duration;

use apiary::board::{Coords, Direction, EntityKind, MapData, Order, OrderType, Terrain};
use apiary::mapgen::{generate_map, MapGenConfig};
use apiary::protocol::{PersistedGame, TurnNotification};
use apiary::session::{Phase, Session, SessionConfig, SessionError, SessionManager};

fn small_map() -> MapData {
    let config = MapGenConfig {
        radius: 5,
        ..Default::default()
    };
    generate_map(&config, 11)
}

/// A 20-hex strip: player 0 has a hive at 0,0 and a bee at 0,8 right next to
/// player 1's only hive at 0,10.
fn siege_map() -> MapData {
    let mut map = MapData::new();
    for i in 0..20 {
        map.set_terrain(Coords::new(0, i * 2), Terrain::Empty);
    }
    map.add_spawn(0, EntityKind::Hive, Coords::new(0, 0))
        .add_spawn(0, EntityKind::Bee, Coords::new(0, 8))
        .add_spawn(3, EntityKind::Hive, Coords::new(0, 10));
    map
}

fn seeded() -> SessionConfig {
    SessionConfig {
        seed: Some(3),
        ..Default::default()
    }
}

fn notice(turn: u32, game_over: bool) -> TurnNotification {
    TurnNotification { turn, game_over }
}

#[tokio::test(start_paused = true)]
async fn idle_session_is_torn_down() {
    let manager = SessionManager::new(SessionConfig {
        start_timeout: Duration::from_secs(10),
        ..seeded()
    });
    let map = small_map();
    let idle = manager.create_session(2, "small", &map).unwrap();
    let started = manager.create_session(2, "small", &map).unwrap();
    manager.register_player(&idle.id, "lonely").unwrap();
    manager.register_player(&started.id, "a").unwrap();
    manager.register_player(&started.id, "b").unwrap();
    assert_eq!(manager.len(), 2);

    tokio::time::sleep(Duration::from_secs(11)).await;

    assert_eq!(
        manager.get(&idle.id).unwrap_err(),
        SessionError::NotFound(idle.id.clone())
    );
    assert!(manager.get(&started.id).is_ok());
    assert_eq!(manager.list().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn registration_fills_slots_in_order() {
    let manager = SessionManager::new(seeded());
    let ticket = manager.create_session(2, "small", &small_map()).unwrap();
    assert_eq!(ticket.player_tokens.len(), 2);
    assert!(!ticket.player_tokens.contains(&ticket.admin_token));

    let first = manager.register_player(&ticket.id, "ada").unwrap();
    let second = manager.register_player(&ticket.id, "bob").unwrap();
    assert_eq!((first.player_id, second.player_id), (0, 1));
    assert_eq!(first.token, ticket.player_tokens[0]);
    assert_eq!(
        manager.register_player(&ticket.id, "cyd").unwrap_err(),
        SessionError::Full
    );

    let session = manager.get(&ticket.id).unwrap();
    assert_eq!(session.phase(), Phase::Syncing);
    let names: Vec<String> = session.players().into_iter().map(|p| p.name).collect();
    assert_eq!(names, ["ada", "bob"]);
}

#[tokio::test(start_paused = true)]
async fn submissions_are_checked_before_the_window() {
    let manager = SessionManager::new(seeded());
    let ticket = manager.create_session(2, "small", &small_map()).unwrap();
    let ada = manager.register_player(&ticket.id, "ada").unwrap();

    assert_eq!(
        manager.submit_orders(&ticket.id, "not-a-token", Vec::new()),
        Err(SessionError::UnknownToken)
    );
    assert_eq!(
        manager.submit_orders(&ticket.id, &ticket.player_tokens[1], Vec::new()),
        Err(SessionError::PlayerNotRegistered(1))
    );
    assert_eq!(
        manager.submit_orders(&ticket.id, &ada.token, Vec::new()),
        Err(SessionError::TurnNotOpen)
    );

    manager.register_player(&ticket.id, "bob").unwrap();
    assert_eq!(
        manager.submit_orders(&ticket.id, &ada.token, Vec::new()),
        Err(SessionError::TurnNotOpen)
    );
}

#[tokio::test(start_paused = true)]
async fn turns_advance_on_full_submission_and_on_deadline() {
    let manager = SessionManager::new(seeded());
    let ticket = manager.create_session(2, "small", &small_map()).unwrap();
    let mut observer = manager.subscribe(&ticket.id).unwrap();
    let ada = manager.register_player(&ticket.id, "ada").unwrap();
    let bob = manager.register_player(&ticket.id, "bob").unwrap();
    let session = manager.get(&ticket.id).unwrap();

    assert_eq!(observer.recv().await, Some(notice(0, false)));
    assert_eq!(session.phase(), Phase::AwaitingOrders);

    // Ada changes her mind; only the second batch counts.
    let bee = session
        .state()
        .units_of(ada.player_id)
        .find(|(_, e)| e.kind == EntityKind::Bee)
        .map(|(c, _)| c)
        .unwrap();
    let forage = Order::in_place(OrderType::Forage, bee);
    manager.submit_orders(&ticket.id, &ada.token, vec![forage]).unwrap();
    manager.submit_orders(&ticket.id, &ada.token, Vec::new()).unwrap();
    assert_eq!(session.turn(), 0);
    manager.submit_orders(&ticket.id, &bob.token, Vec::new()).unwrap();

    assert_eq!(session.turn(), 1);
    assert_eq!(session.phase(), Phase::Syncing);
    let history = manager.get_history(&ticket.id).unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[1].orders.is_empty());
    assert_eq!(history[1].state.turn, 1);

    assert_eq!(observer.recv().await, Some(notice(1, false)));
    // Nobody submits for turn 1; the deadline resolves it.
    assert_eq!(observer.recv().await, Some(notice(2, false)));
    assert_eq!(session.turn(), 2);
    assert_eq!(manager.get_history(&ticket.id).unwrap().len(), 3);

    assert!(!session.expire_turn(0));
    assert!(!session.expire_turn(1));
    assert_eq!(session.turn(), 2);
}

#[tokio::test(start_paused = true)]
async fn destroying_the_last_enemy_hive_finishes_the_session() {
    let manager = SessionManager::new(seeded());
    let ticket = manager.create_session(2, "siege", &siege_map()).unwrap();
    let mut observer = manager.subscribe(&ticket.id).unwrap();
    let ada = manager.register_player(&ticket.id, "ada").unwrap();
    let bob = manager.register_player(&ticket.id, "bob").unwrap();

    let sting = Order::new(OrderType::Attack, Coords::new(0, 8), Direction::E);
    let mut seen = Vec::new();
    while let Some(notification) = observer.recv().await {
        seen.push(notification);
        if notification.game_over {
            break;
        }
        manager.submit_orders(&ticket.id, &ada.token, vec![sting]).unwrap();
        manager.submit_orders(&ticket.id, &bob.token, Vec::new()).unwrap();
    }

    // The hive takes one hit per turn.
    let expected: Vec<TurnNotification> = (0..12)
        .map(|turn| notice(turn, false))
        .chain([notice(12, true)])
        .collect();
    assert_eq!(seen, expected);
    assert_eq!(observer.recv().await, None);

    let session = manager.get(&ticket.id).unwrap();
    assert_eq!(session.phase(), Phase::Finished);
    assert_eq!(session.turn(), 12);
    assert_eq!(session.state().winners, vec![0]);
    let history = session.history();
    assert_eq!(history.len(), 13);
    assert_eq!(history[0].state.turn, 0);
    assert!(history.last().unwrap().state.game_over);
    assert_eq!(
        manager.submit_orders(&ticket.id, &ada.token, vec![sting]),
        Err(SessionError::Finished)
    );
}

#[tokio::test(start_paused = true)]
async fn finished_sessions_are_evicted_after_retention() {
    let manager = SessionManager::new(SessionConfig {
        finished_retention: Duration::from_secs(30),
        ..seeded()
    });
    let solo = manager.create_session(1, "small", &small_map()).unwrap();
    let duel = manager.create_session(2, "small", &small_map()).unwrap();
    manager.register_player(&solo.id, "solo").unwrap();
    manager.register_player(&duel.id, "ada").unwrap();
    manager.register_player(&duel.id, "bob").unwrap();
    assert!(manager.get(&solo.id).unwrap().is_finished());

    tokio::time::sleep(Duration::from_secs(31)).await;

    assert_eq!(
        manager.get(&solo.id).unwrap_err(),
        SessionError::NotFound(solo.id.clone())
    );
    // Still playing, so it stays.
    let running = manager.get(&duel.id).unwrap();
    assert!(!running.is_finished());
    assert!(running.turn() > 0);
}

#[test]
fn session_rejects_wrong_token_count() {
    let tokens = vec!["admin".to_string(), "p0".to_string()];
    let err = Session::new(
        "s".to_string(),
        "small".to_string(),
        &small_map(),
        2,
        tokens,
        SessionConfig::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        SessionError::TokenCount {
            expected: 3,
            found: 2
        }
    );

    let err = Session::new(
        "s".to_string(),
        "small".to_string(),
        &small_map(),
        7,
        Vec::new(),
        SessionConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err, SessionError::InvalidPlayerCount(7));
}

#[tokio::test(start_paused = true)]
async fn late_subscriber_gets_current_turn() {
    let manager = SessionManager::new(seeded());
    let ticket = manager.create_session(2, "small", &small_map()).unwrap();
    let mut early = manager.subscribe(&ticket.id).unwrap();
    manager.register_player(&ticket.id, "ada").unwrap();
    manager.register_player(&ticket.id, "bob").unwrap();
    assert_eq!(early.recv().await, Some(notice(0, false)));

    let mut late = manager.subscribe(&ticket.id).unwrap();
    assert_eq!(late.recv().await, Some(notice(0, false)));
    assert_eq!(late.recv().await, Some(notice(1, false)));
}

#[tokio::test(start_paused = true)]
async fn decided_game_finishes_on_registration() {
    let manager = SessionManager::new(seeded());
    // A lone player owns the only hive, so the game is decided at once.
    let ticket = manager.create_session(1, "small", &small_map()).unwrap();
    let mut observer = manager.subscribe(&ticket.id).unwrap();
    let solo = manager.register_player(&ticket.id, "solo").unwrap();

    assert_eq!(observer.recv().await, Some(notice(0, true)));
    assert_eq!(observer.recv().await, None);

    let session = manager.get(&ticket.id).unwrap();
    assert!(session.is_finished());
    assert_eq!(session.state().winners, vec![0]);
    assert_eq!(
        manager.submit_orders(&ticket.id, &solo.token, Vec::new()),
        Err(SessionError::Finished)
    );

    let mut after = manager.subscribe(&ticket.id).unwrap();
    assert_eq!(after.recv().await, Some(notice(0, true)));
    assert_eq!(after.recv().await, None);
    assert!(manager.list()[0].game_over);
}

#[tokio::test(start_paused = true)]
async fn view_is_scoped_to_the_token() {
    let manager = SessionManager::new(seeded());
    let ticket = manager.create_session(2, "small", &small_map()).unwrap();
    let ada = manager.register_player(&ticket.id, "ada").unwrap();

    let view = manager.get_view(&ticket.id, &ada.token).unwrap();
    assert_eq!(view.player, 0);
    assert!(view.hexes.len() < manager.get(&ticket.id).unwrap().state().hex_count());
    assert_eq!(
        manager.get_view(&ticket.id, "nope").unwrap_err(),
        SessionError::UnknownToken
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn finished_game_is_written_to_history_dir() {
    let dir = tempfile::tempdir().unwrap();
    let manager = SessionManager::new(SessionConfig {
        history_dir: Some(dir.path().to_path_buf()),
        dev_mode: true,
        ..seeded()
    });
    let ticket = manager.create_session(1, "small", &small_map()).unwrap();
    manager.register_player(&ticket.id, "solo").unwrap();

    let mut written = Vec::new();
    for _ in 0..100 {
        written = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .collect();
        if !written.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(written.len(), 1);

    let name = written[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.ends_with(&format!("-{}-small.json", ticket.id)));

    // The file may still be mid-write on the blocking pool; retry parsing.
    let mut game: Option<PersistedGame> = None;
    for _ in 0..100 {
        let text = std::fs::read_to_string(&written[0]).unwrap();
        if let Ok(parsed) = serde_json::from_str(&text) {
            game = Some(parsed);
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let game = game.unwrap();
    assert_eq!(game.id, ticket.id);
    assert_eq!(game.players, vec!["solo".to_string()]);
    assert_eq!(game.history.len(), 1);
    assert!(game.history[0].state.game_over);
}
