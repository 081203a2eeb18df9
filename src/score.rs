use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR_NAME: &str = "grid-snake";
const SCORE_FILE_NAME: &str = "scores.json";

/// Failure talking to a high-score store.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("cannot access score file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("score file {} is malformed: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence collaborator for the best score.
///
/// The game loop treats a failed load as a high score of zero and ignores
/// failed saves, so implementations never need to retry.
pub trait HighScoreStore {
    fn load(&self) -> Result<u32, ScoreError>;

    fn save(&mut self, score: u32) -> Result<(), ScoreError>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScoreFile {
    high_score: u32,
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// Stores the high score as a small JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`scores_path`].
    #[must_use]
    pub fn in_data_dir() -> Self {
        Self::new(scores_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    /// Returns `Ok(0)` when the score file does not exist yet.
    fn load(&self) -> Result<u32, ScoreError> {
        load_high_score_from_path(&self.path)
    }

    /// Writes the score, creating parent directories when needed.
    fn save(&mut self, score: u32) -> Result<(), ScoreError> {
        save_high_score_to_path(&self.path, score)
    }
}

/// Keeps the high score in memory only.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStore {
    high_score: u32,
}

impl MemoryStore {
    #[must_use]
    pub fn new(high_score: u32) -> Self {
        Self { high_score }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32, ScoreError> {
        Ok(self.high_score)
    }

    fn save(&mut self, score: u32) -> Result<(), ScoreError> {
        self.high_score = score;
        Ok(())
    }
}

fn load_high_score_from_path(path: &Path) -> Result<u32, ScoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(ScoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str::<ScoreFile>(&raw)
        .map(|file| file.high_score)
        .map_err(|source| ScoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn save_high_score_to_path(path: &Path, score: u32) -> Result<(), ScoreError> {
    let io_error = |source| ScoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let payload = ScoreFile { high_score: score };
    let json = serde_json::to_string_pretty(&payload).map_err(|source| ScoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, json).map_err(io_error)
}
