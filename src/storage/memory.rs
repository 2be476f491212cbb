//! In-memory repository.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::repository::{sort_tournaments, upsert_round, TournamentRepository};
use super::StorageError;
use crate::models::{Player, Round, Tournament, TournamentId};

#[derive(Debug, Default)]
struct Tables {
    tournaments: HashMap<TournamentId, Tournament>,
    players: HashMap<TournamentId, Vec<Player>>,
    rounds: HashMap<TournamentId, Vec<Round>>,
}

/// Repository that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        self.tables.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl TournamentRepository for InMemoryRepository {
    fn list_tournaments(&self) -> Result<Vec<Tournament>, StorageError> {
        let mut tournaments: Vec<Tournament> = self.lock()?.tournaments.values().cloned().collect();
        sort_tournaments(&mut tournaments);
        Ok(tournaments)
    }

    fn tournament(&self, id: &TournamentId) -> Result<Option<Tournament>, StorageError> {
        Ok(self.lock()?.tournaments.get(id).cloned())
    }

    fn save_tournament(&self, tournament: &Tournament) -> Result<(), StorageError> {
        self.lock()?
            .tournaments
            .insert(tournament.id.clone(), tournament.clone());
        Ok(())
    }

    fn players(&self, id: &TournamentId) -> Result<Vec<Player>, StorageError> {
        Ok(self.lock()?.players.get(id).cloned().unwrap_or_default())
    }

    fn save_players(&self, id: &TournamentId, players: &[Player]) -> Result<(), StorageError> {
        self.lock()?.players.insert(id.clone(), players.to_vec());
        Ok(())
    }

    fn rounds(&self, id: &TournamentId) -> Result<Vec<Round>, StorageError> {
        Ok(self.lock()?.rounds.get(id).cloned().unwrap_or_default())
    }

    fn save_round(&self, round: &Round) -> Result<(), StorageError> {
        let mut tables = self.lock()?;
        let rounds = tables.rounds.entry(round.tournament_id.clone()).or_default();
        upsert_round(rounds, round);
        Ok(())
    }
}
