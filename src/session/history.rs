//! Finished-game persistence.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::protocol::PersistedGame;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to write game history: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode game history: {0}")]
    Json(#[from] serde_json::Error),
}

/// The file a game is written to: `<dir>/<created>-<id>-<map>.json`.
pub fn history_path(dir: &Path, game: &PersistedGame) -> PathBuf {
    dir.join(format!(
        "{}-{}-{}.json",
        game.created_date.to_rfc3339(),
        game.id,
        game.map
    ))
}

/// Writes `game` as one JSON document and returns its path.
pub fn persist(dir: &Path, game: &PersistedGame) -> Result<PathBuf, HistoryError> {
    std::fs::create_dir_all(dir)?;
    let path = history_path(dir, game);
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer(&mut writer, game)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(path)
}

/// Reads a persisted game back.
pub fn load(path: &Path) -> Result<PersistedGame, HistoryError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}
