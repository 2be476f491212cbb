//! Tournament persistence.
//!
//! The engine never touches storage; callers load a roster and round
//! history through a [`TournamentRepository`] and hand them over. Two
//! backends are provided:
//! - JSONL files under the data directory (one directory per tournament)
//! - An in-memory store for tests and throwaway servers

mod jsonl;
mod memory;
mod repository;

use std::path::PathBuf;
use thiserror::Error;

pub use jsonl::{EntityType, JsonlReader, JsonlWriter};
pub use memory::InMemoryRepository;
pub use repository::{JsonlRepository, TournamentRepository};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn tournaments_dir(&self) -> PathBuf {
        self.data_dir.join("tournaments")
    }

    /// Directory holding one tournament's files. Rejects IDs that would
    /// escape the tournaments directory.
    pub fn tournament_dir(&self, tournament_id: &str) -> Result<PathBuf, StorageError> {
        let valid = !tournament_id.is_empty()
            && tournament_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidPath(tournament_id.to_string()));
        }
        Ok(self.tournaments_dir().join(tournament_id))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
