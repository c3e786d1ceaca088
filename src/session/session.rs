//! One running match.
//!
//! A session owns a [`WorldState`] from registration through game over and
//! collects per-player order batches under a deadline:
//!
//! ```text
//! Forming --(last slot filled)--> Syncing --(min duration)--> AwaitingOrders
//!    AwaitingOrders --(all submitted | deadline)--> Resolving
//!    Resolving --> Syncing | Finished
//! ```
//!
//! All mutation goes through one mutex. The lock is held across a whole
//! resolution, and the deadline task re-checks the turn it was armed for
//! under that lock, so each turn resolves exactly once. Sleeps and history
//! writes happen outside the lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::board::{is_valid_player_count, MapData, Order, PlayerView, WorldState};
use crate::protocol::{
    PersistedGame, Registration, SessionStatus, SessionTicket, TurnNotification, TurnRecord,
};
use crate::resolve::Resolver;

use super::config::SessionConfig;
use super::error::SessionError;
use super::history;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for every player slot to be claimed.
    Forming,
    /// Between a turn transition and the window opening.
    Syncing,
    /// The turn window is open for submissions.
    AwaitingOrders,
    /// Orders are being applied.
    Resolving,
    /// The game is over; the session is read-only.
    Finished,
}

/// A player who claimed a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: usize,
    pub name: String,
    pub token: String,
}

struct SessionInner {
    phase: Phase,
    players: Vec<Player>,
    state: WorldState,
    pending: Vec<Option<Vec<Order>>>,
    history: Vec<TurnRecord>,
    resolver: Resolver,
    rng: SmallRng,
    observers: Vec<UnboundedSender<TurnNotification>>,
}

impl SessionInner {
    fn notification(&self) -> TurnNotification {
        TurnNotification {
            turn: self.state.turn,
            game_over: self.state.game_over,
        }
    }

    /// Pushes the current status to every observer, dropping closed ones.
    fn notify_observers(&mut self) {
        let notification = self.notification();
        self.observers.retain(|tx| tx.send(notification).is_ok());
    }
}

/// A single match with its players, world and turn scheduler.
pub struct Session {
    id: String,
    map: String,
    created_date: DateTime<Utc>,
    admin_token: String,
    player_tokens: Vec<String>,
    config: SessionConfig,
    inner: Mutex<SessionInner>,
}

impl Session {
    /// Creates a session in the `Forming` phase.
    ///
    /// `tokens` must hold one admin token followed by one token per player.
    pub fn new(
        id: String,
        map: String,
        map_data: &MapData,
        num_players: usize,
        mut tokens: Vec<String>,
        config: SessionConfig,
    ) -> Result<Arc<Session>, SessionError> {
        if !is_valid_player_count(num_players) {
            return Err(SessionError::InvalidPlayerCount(num_players));
        }
        if tokens.len() != num_players + 1 {
            return Err(SessionError::TokenCount {
                expected: num_players + 1,
                found: tokens.len(),
            });
        }
        let state = WorldState::new(map_data, num_players)?;
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let admin_token = tokens.remove(0);

        let inner = SessionInner {
            phase: Phase::Forming,
            players: Vec::with_capacity(num_players),
            pending: vec![None; num_players],
            history: vec![TurnRecord {
                orders: Vec::new(),
                state: state.clone(),
            }],
            state,
            resolver: Resolver::new(),
            rng,
            observers: Vec::new(),
        };

        Ok(Arc::new(Session {
            id,
            map,
            created_date: Utc::now(),
            admin_token,
            player_tokens: tokens,
            config,
            inner: Mutex::new(inner),
        }))
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn map(&self) -> &str {
        &self.map
    }

    pub fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    /// The credentials handed back to whoever created the session.
    pub fn ticket(&self) -> SessionTicket {
        SessionTicket {
            id: self.id.clone(),
            admin_token: self.admin_token.clone(),
            player_tokens: self.player_tokens.clone(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn turn(&self) -> u32 {
        self.lock().state.turn
    }

    pub fn is_full(&self) -> bool {
        self.lock().players.len() == self.player_tokens.len()
    }

    pub fn is_finished(&self) -> bool {
        self.lock().phase == Phase::Finished
    }

    /// A copy of the authoritative world state.
    pub fn state(&self) -> WorldState {
        self.lock().state.clone()
    }

    fn slot_of(&self, token: &str) -> Result<usize, SessionError> {
        self.player_tokens
            .iter()
            .position(|t| t == token)
            .ok_or(SessionError::UnknownToken)
    }

    /// Claims the next free player slot. Filling the last slot starts the
    /// first turn. Must be called from within a tokio runtime.
    pub fn register_player(self: &Arc<Self>, name: &str) -> Result<Registration, SessionError> {
        let mut inner = self.lock();
        if inner.players.len() == self.player_tokens.len() {
            return Err(SessionError::Full);
        }

        let id = inner.players.len();
        let token = self.player_tokens[id].clone();
        inner.players.push(Player {
            id,
            name: name.to_string(),
            token: token.clone(),
        });
        info!(session = %self.id, player = id, name, "player registered");

        if inner.players.len() == self.player_tokens.len() {
            info!(session = %self.id, "session full, starting game");
            if inner.state.game_over {
                let finished = self.finish(&mut inner);
                drop(inner);
                if let Some(game) = finished {
                    self.persist(game);
                }
            } else {
                self.schedule_window(&mut inner);
            }
        }
        Ok(Registration {
            player_id: id,
            token,
        })
    }

    /// Moves to `Syncing` and opens the next window after the minimum turn
    /// duration.
    fn schedule_window(self: &Arc<Self>, inner: &mut SessionInner) {
        inner.phase = Phase::Syncing;
        let turn = inner.state.turn;
        let session = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(session.config.window_delay()).await;
            session.open_window(turn);
        });
    }

    fn open_window(self: &Arc<Self>, turn: u32) {
        let mut inner = self.lock();
        if inner.phase != Phase::Syncing || inner.state.turn != turn {
            return;
        }
        inner.phase = Phase::AwaitingOrders;
        inner.pending.iter_mut().for_each(|p| *p = None);
        inner.notify_observers();
        debug!(session = %self.id, turn, "turn window open");

        let session = Arc::clone(self);
        let timeout = self.config.turn_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            session.expire_turn(turn);
        });
    }

    /// Forces resolution of `armed_turn` if it is still open. Returns false
    /// for a stale deadline whose turn already resolved.
    pub fn expire_turn(self: &Arc<Self>, armed_turn: u32) -> bool {
        let mut inner = self.lock();
        if inner.phase != Phase::AwaitingOrders || inner.state.turn != armed_turn {
            debug!(session = %self.id, armed_turn, "stale turn deadline ignored");
            return false;
        }
        debug!(session = %self.id, turn = armed_turn, "turn deadline reached");
        let finished = self.resolve_turn(&mut inner);
        drop(inner);
        if let Some(game) = finished {
            self.persist(game);
        }
        true
    }

    /// Replaces the player's pending batch for the open window. The turn
    /// resolves immediately once every player has submitted.
    pub fn submit_orders(
        self: &Arc<Self>,
        token: &str,
        orders: Vec<Order>,
    ) -> Result<(), SessionError> {
        let slot = self.slot_of(token)?;
        let mut inner = self.lock();
        if slot >= inner.players.len() {
            return Err(SessionError::PlayerNotRegistered(slot));
        }
        match inner.phase {
            Phase::AwaitingOrders => {}
            Phase::Finished => return Err(SessionError::Finished),
            _ => return Err(SessionError::TurnNotOpen),
        }

        debug!(
            session = %self.id,
            player = slot,
            turn = inner.state.turn,
            orders = orders.len(),
            "orders submitted"
        );
        inner.pending[slot] = Some(orders);

        if inner.pending.iter().all(Option::is_some) {
            let finished = self.resolve_turn(&mut inner);
            drop(inner);
            if let Some(game) = finished {
                self.persist(game);
            }
        }
        Ok(())
    }

    /// Applies the pending batches. Returns the document to persist when the
    /// game ended.
    fn resolve_turn(self: &Arc<Self>, inner: &mut SessionInner) -> Option<PersistedGame> {
        inner.phase = Phase::Resolving;
        let orders: Vec<Vec<Order>> = inner
            .pending
            .iter_mut()
            .map(|p| p.take().unwrap_or_default())
            .collect();

        let result = {
            let SessionInner {
                state,
                resolver,
                rng,
                ..
            } = &mut *inner;
            resolver.resolve(state, orders, rng)
        };
        match result {
            Ok(resolution) => {
                info!(
                    session = %self.id,
                    turn = inner.state.turn,
                    processed = resolution.processed.len(),
                    "turn resolved"
                );
                inner.history.push(TurnRecord {
                    orders: resolution.processed,
                    state: inner.state.clone(),
                });
            }
            Err(err) => warn!(session = %self.id, error = %err, "resolution refused"),
        }

        if inner.state.game_over {
            self.finish(inner)
        } else {
            self.schedule_window(inner);
            None
        }
    }

    /// Closes the session after the game ended: final notification, observer
    /// channels closed. Returns the document to persist, if configured.
    fn finish(&self, inner: &mut SessionInner) -> Option<PersistedGame> {
        info!(session = %self.id, winners = ?inner.state.winners, "game over");
        inner.phase = Phase::Finished;
        inner.notify_observers();
        inner.observers.clear();

        if self.config.history_dir.is_none() {
            return None;
        }
        Some(PersistedGame {
            id: self.id.clone(),
            map: self.map.clone(),
            created_date: self.created_date,
            players: inner.players.iter().map(|p| p.name.clone()).collect(),
            history: inner.history.clone(),
        })
    }

    fn persist(&self, game: PersistedGame) {
        let Some(dir) = self.config.history_dir.clone() else {
            return;
        };
        let id = self.id.clone();
        tokio::task::spawn_blocking(move || match history::persist(&dir, &game) {
            Ok(path) => info!(session = %id, path = %path.display(), "game history written"),
            Err(err) => warn!(session = %id, error = %err, "failed to persist game history"),
        });
    }

    /// The world as seen by the holder of `token`.
    pub fn view(&self, token: &str) -> Result<PlayerView, SessionError> {
        let slot = self.slot_of(token)?;
        Ok(self.lock().state.player_view(slot))
    }

    /// Attaches an observer. Once the game has started the current status is
    /// delivered immediately; after the final notification the channel closes.
    pub fn subscribe(&self) -> UnboundedReceiver<TurnNotification> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        match inner.phase {
            Phase::Finished => {
                let _ = tx.send(inner.notification());
            }
            Phase::Forming => inner.observers.push(tx),
            _ => {
                let _ = tx.send(inner.notification());
                inner.observers.push(tx);
            }
        }
        rx
    }

    /// Every turn recorded so far, starting with the initial state.
    pub fn history(&self) -> Vec<TurnRecord> {
        self.lock().history.clone()
    }

    pub fn players(&self) -> Vec<Player> {
        self.lock().players.clone()
    }

    pub fn status(&self) -> SessionStatus {
        let inner = self.lock();
        SessionStatus {
            id: self.id.clone(),
            created_date: self.created_date,
            map: self.map.clone(),
            num_players: inner.state.num_players,
            players: inner.players.iter().map(|p| p.name.clone()).collect(),
            game_over: inner.state.game_over,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("map", &self.map)
            .finish_non_exhaustive()
    }
}
