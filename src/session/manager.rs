//! Session registry.
//!
//! Creates sessions, routes calls to them by ID, tears down sessions that
//! never fill up within `SessionConfig::start_timeout`, and evicts finished
//! sessions after `SessionConfig::finished_retention`.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::board::{MapData, Order, PlayerView};
use crate::protocol::{Registration, SessionStatus, SessionTicket, TurnNotification, TurnRecord};

use super::config::SessionConfig;
use super::error::SessionError;
use super::session::Session;

/// Generates `count` distinct random 64-bit hex tokens.
pub fn generate_tokens(count: usize) -> Vec<String> {
    let mut seen = HashSet::with_capacity(count);
    let mut tokens = Vec::with_capacity(count);
    while tokens.len() < count {
        let token = format!("{:x}", rand::random::<u64>());
        if seen.insert(token.clone()) {
            tokens.push(token);
        }
    }
    tokens
}

type Registry = HashMap<String, Arc<Session>>;

/// Owns every live session. Cheap to clone; clones share the registry.
#[derive(Clone, Debug, Default)]
pub struct SessionManager {
    config: SessionConfig,
    sessions: Arc<Mutex<Registry>>,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sessions: Arc::default(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a session and arms its idle teardown. Must be called from
    /// within a tokio runtime.
    pub fn create_session(
        &self,
        num_players: usize,
        map_name: &str,
        map: &MapData,
    ) -> Result<SessionTicket, SessionError> {
        let mut sessions = self.registry();
        let id = loop {
            let candidate = format!("{:x}", rand::random::<u64>());
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        let session = Session::new(
            id.clone(),
            map_name.to_string(),
            map,
            num_players,
            generate_tokens(num_players + 1),
            self.config.clone(),
        )?;
        let ticket = session.ticket();
        let mut lifecycle = session.subscribe();
        sessions.insert(id.clone(), session);
        drop(sessions);
        info!(session = %id, map = map_name, players = num_players, "session created");

        let manager = self.clone();
        let timeout = self.config.start_timeout;
        let session_id = id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            manager.remove_if_not_started(&session_id);
        });

        // The channel closes once the game finishes or the session is dropped.
        let manager = self.clone();
        let retention = self.config.finished_retention;
        tokio::spawn(async move {
            while lifecycle.recv().await.is_some() {}
            tokio::time::sleep(retention).await;
            manager.remove_if_finished(&id);
        });
        Ok(ticket)
    }

    fn remove_if_finished(&self, id: &str) {
        let mut sessions = self.registry();
        if sessions.get(id).is_some_and(|s| s.is_finished()) {
            sessions.remove(id);
            info!(session = %id, "finished session evicted");
        }
    }

    fn remove_if_not_started(&self, id: &str) {
        let mut sessions = self.registry();
        if sessions.get(id).is_some_and(|s| !s.is_full()) {
            sessions.remove(id);
            info!(session = %id, "session removed after start timeout");
        }
    }

    /// Looks up a session by ID.
    pub fn get(&self, id: &str) -> Result<Arc<Session>, SessionError> {
        self.registry()
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Drops a session from the registry. Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        self.registry().remove(id).is_some()
    }

    pub fn register_player(&self, id: &str, name: &str) -> Result<Registration, SessionError> {
        self.get(id)?.register_player(name)
    }

    pub fn submit_orders(
        &self,
        id: &str,
        token: &str,
        orders: Vec<Order>,
    ) -> Result<(), SessionError> {
        self.get(id)?.submit_orders(token, orders)
    }

    pub fn get_view(&self, id: &str, token: &str) -> Result<PlayerView, SessionError> {
        self.get(id)?.view(token)
    }

    pub fn subscribe(&self, id: &str) -> Result<UnboundedReceiver<TurnNotification>, SessionError> {
        Ok(self.get(id)?.subscribe())
    }

    pub fn get_history(&self, id: &str) -> Result<Vec<TurnRecord>, SessionError> {
        Ok(self.get(id)?.history())
    }

    /// Status of every session, oldest first.
    pub fn list(&self) -> Vec<SessionStatus> {
        let sessions: Vec<Arc<Session>> = self.registry().values().cloned().collect();
        let mut statuses: Vec<SessionStatus> = sessions.iter().map(|s| s.status()).collect();
        statuses.sort_by(|a, b| a.created_date.cmp(&b.created_date).then(a.id.cmp(&b.id)));
        statuses
    }

    pub fn len(&self) -> usize {
        self.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }
}
