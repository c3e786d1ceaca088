//! Session errors.

use thiserror::Error;

use crate::board::GameError;

/// Rejections reported synchronously to session callers. None of them
/// mutate the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session '{0}' not found")]
    NotFound(String),

    #[error("session is full")]
    Full,

    #[error("unknown token")]
    UnknownToken,

    #[error("player slot {0} has not been claimed")]
    PlayerNotRegistered(usize),

    #[error("no turn is open for orders")]
    TurnNotOpen,

    #[error("game is over")]
    Finished,

    #[error("unsupported number of players: {0}")]
    InvalidPlayerCount(usize),

    #[error("expected {expected} tokens, got {found}")]
    TokenCount { expected: usize, found: usize },

    #[error(transparent)]
    Game(#[from] GameError),
}
