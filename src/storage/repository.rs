//! Repository abstraction over tournament storage.

use std::fs;

use tracing::{debug, info, warn};

use super::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::models::{Player, Round, Tournament, TournamentId};

/// Persistence for tournaments, rosters and rounds.
pub trait TournamentRepository: Send + Sync {
    /// All tournaments, newest first.
    fn list_tournaments(&self) -> Result<Vec<Tournament>, StorageError>;

    fn tournament(&self, id: &TournamentId) -> Result<Option<Tournament>, StorageError>;

    /// Insert or replace a tournament record.
    fn save_tournament(&self, tournament: &Tournament) -> Result<(), StorageError>;

    /// Roster in registration order.
    fn players(&self, id: &TournamentId) -> Result<Vec<Player>, StorageError>;

    /// Replace the whole roster.
    fn save_players(&self, id: &TournamentId, players: &[Player]) -> Result<(), StorageError>;

    /// Rounds in ascending round number.
    fn rounds(&self, id: &TournamentId) -> Result<Vec<Round>, StorageError>;

    /// Insert a round, replacing any stored round with the same number.
    fn save_round(&self, round: &Round) -> Result<(), StorageError>;
}

/// Sort tournaments newest first, then by name.
pub(crate) fn sort_tournaments(tournaments: &mut [Tournament]) {
    tournaments.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.name.cmp(&b.name)));
}

/// Replace or insert `round` keeping the list ordered by number.
pub(crate) fn upsert_round(rounds: &mut Vec<Round>, round: &Round) {
    match rounds.iter_mut().find(|r| r.number == round.number) {
        Some(existing) => *existing = round.clone(),
        None => rounds.push(round.clone()),
    }
    rounds.sort_by_key(|r| r.number);
}

/// Repository backed by JSONL files, one directory per tournament.
#[derive(Debug, Clone)]
pub struct JsonlRepository {
    config: StorageConfig,
}

impl JsonlRepository {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }
}

impl TournamentRepository for JsonlRepository {
    fn list_tournaments(&self) -> Result<Vec<Tournament>, StorageError> {
        let dir = self.config.tournaments_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut tournaments = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            match self.tournament(&TournamentId::from(name.as_str())) {
                Ok(Some(tournament)) => tournaments.push(tournament),
                Ok(None) => debug!("Skipping {:?}: no tournament record", entry.path()),
                Err(e) => warn!("Skipping tournament directory {}: {}", name, e),
            }
        }

        sort_tournaments(&mut tournaments);
        Ok(tournaments)
    }

    fn tournament(&self, id: &TournamentId) -> Result<Option<Tournament>, StorageError> {
        let reader: JsonlReader<Tournament> =
            JsonlReader::for_entity(&self.config, EntityType::Tournament, id.as_str())?;
        Ok(reader.read_all()?.pop())
    }

    fn save_tournament(&self, tournament: &Tournament) -> Result<(), StorageError> {
        let writer =
            JsonlWriter::for_entity(&self.config, EntityType::Tournament, tournament.id.as_str())?;
        writer.write_all(std::slice::from_ref(tournament))?;
        info!("Saved tournament {} ({})", tournament.name, tournament.id);
        Ok(())
    }

    fn players(&self, id: &TournamentId) -> Result<Vec<Player>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Player, id.as_str())?.read_all()
    }

    fn save_players(&self, id: &TournamentId, players: &[Player]) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, EntityType::Player, id.as_str())?
            .write_all(players)?;
        Ok(())
    }

    fn rounds(&self, id: &TournamentId) -> Result<Vec<Round>, StorageError> {
        let mut rounds: Vec<Round> =
            JsonlReader::for_entity(&self.config, EntityType::Round, id.as_str())?.read_all()?;
        rounds.sort_by_key(|r| r.number);
        Ok(rounds)
    }

    fn save_round(&self, round: &Round) -> Result<(), StorageError> {
        let mut rounds = self.rounds(&round.tournament_id)?;
        upsert_round(&mut rounds, round);
        JsonlWriter::for_entity(&self.config, EntityType::Round, round.tournament_id.as_str())?
            .write_all(&rounds)?;
        Ok(())
    }
}
