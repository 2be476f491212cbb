//! Tournament director service.
//!
//! Loads roster and history from a repository, applies the caller-side
//! rules the pairing engine leaves to its users (enough players, previous
//! round finished, planned round limit) and persists the outcome.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::calculate::{
    calculate_standings, initial_standings, rating_changes, Elo, RatingFormula,
};
use crate::models::{
    Outcome, Player, RatingChange, Round, Standing, Tournament, TournamentId, DEFAULT_RATING,
};
use crate::pairing::generate_pairings;
use crate::storage::{StorageError, TournamentRepository};

/// Errors returned by tournament director operations.
#[derive(Debug, Error)]
pub enum DirectorError {
    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    #[error("Tournament already exists: {0}")]
    TournamentExists(TournamentId),

    #[error("Player '{0}' is already registered")]
    DuplicatePlayer(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("At least two players are needed to pair a round, found {0}")]
    NotEnoughPlayers(usize),

    #[error("Round {round} still has {pending} game(s) without a result")]
    RoundInProgress { round: u32, pending: usize },

    #[error("All {0} planned rounds have already been paired")]
    TournamentFinished(u32),

    #[error("Round {0} not found")]
    RoundNotFound(u32),

    #[error("Board {board} not found in round {round}")]
    BoardNotFound { round: u32, board: u32 },

    #[error("Board {board} of round {round} is a bye and has no result to record")]
    ByeBoard { round: u32, board: u32 },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Parameters for a new tournament.
#[derive(Debug, Clone)]
pub struct NewTournament {
    pub name: String,
    pub date: NaiveDate,
    pub location: Option<String>,
    pub planned_rounds: Option<u32>,
}

/// Runs tournaments on top of a [`TournamentRepository`].
///
/// Operations that load, change and save records hold `writes` for the
/// whole step, so concurrent callers sharing a director (or its clones)
/// never overwrite each other's changes.
#[derive(Clone)]
pub struct TournamentDirector {
    repo: Arc<dyn TournamentRepository>,
    formula: Arc<dyn RatingFormula>,
    default_rating: u32,
    writes: Arc<Mutex<()>>,
}

impl TournamentDirector {
    pub fn new(repo: Arc<dyn TournamentRepository>) -> Self {
        Self {
            repo,
            formula: Arc::new(Elo::default()),
            default_rating: DEFAULT_RATING,
            writes: Arc::new(Mutex::new(())),
        }
    }

    fn write_lock(&self) -> Result<MutexGuard<'_, ()>, DirectorError> {
        self.writes
            .lock()
            .map_err(|_| DirectorError::Storage(StorageError::LockPoisoned))
    }

    /// Builder method to set the rating used when none is given.
    pub fn with_default_rating(mut self, rating: u32) -> Self {
        self.default_rating = rating;
        self
    }

    /// Builder method to set the rating formula.
    pub fn with_rating_formula(mut self, formula: Arc<dyn RatingFormula>) -> Self {
        self.formula = formula;
        self
    }

    pub fn create_tournament(&self, params: NewTournament) -> Result<Tournament, DirectorError> {
        let name = params.name.trim().to_string();
        if name.is_empty() {
            return Err(DirectorError::InvalidInput(
                "Tournament name must not be empty".to_string(),
            ));
        }
        if params.planned_rounds == Some(0) {
            return Err(DirectorError::InvalidInput(
                "Planned rounds must be greater than 0".to_string(),
            ));
        }

        let _guard = self.write_lock()?;
        let mut tournament = Tournament::new(name, params.date);
        if self.repo.tournament(&tournament.id)?.is_some() {
            return Err(DirectorError::TournamentExists(tournament.id));
        }
        tournament.location = params.location;
        tournament.planned_rounds = params.planned_rounds;

        self.repo.save_tournament(&tournament)?;
        info!("Created tournament {} ({})", tournament.name, tournament.id);
        Ok(tournament)
    }

    pub fn tournaments(&self) -> Result<Vec<Tournament>, DirectorError> {
        Ok(self.repo.list_tournaments()?)
    }

    pub fn tournament(&self, id: &TournamentId) -> Result<Tournament, DirectorError> {
        self.repo
            .tournament(id)?
            .ok_or_else(|| DirectorError::TournamentNotFound(id.clone()))
    }

    /// Add a player to the roster. A missing rating gets the configured
    /// default.
    pub fn register_player(
        &self,
        id: &TournamentId,
        name: &str,
        rating: Option<u32>,
    ) -> Result<Player, DirectorError> {
        let _guard = self.write_lock()?;
        let tournament = self.tournament(id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DirectorError::InvalidInput(
                "Player name must not be empty".to_string(),
            ));
        }

        let player = Player::registered(
            &tournament.id,
            name.to_string(),
            rating.unwrap_or(self.default_rating),
        );
        let mut players = self.repo.players(id)?;
        if players.iter().any(|p| p.id == player.id) {
            return Err(DirectorError::DuplicatePlayer(name.to_string()));
        }
        players.push(player.clone());
        self.repo.save_players(id, &players)?;

        info!(
            "Registered {} ({}) in {}",
            player.name, player.rating, tournament.name
        );
        Ok(player)
    }

    pub fn players(&self, id: &TournamentId) -> Result<Vec<Player>, DirectorError> {
        self.tournament(id)?;
        Ok(self.repo.players(id)?)
    }

    pub fn rounds(&self, id: &TournamentId) -> Result<Vec<Round>, DirectorError> {
        self.tournament(id)?;
        Ok(self.repo.rounds(id)?)
    }

    /// Pair and store the next round.
    pub fn pair_next_round(&self, id: &TournamentId) -> Result<Round, DirectorError> {
        let _guard = self.write_lock()?;
        let tournament = self.tournament(id)?;
        let players = self.repo.players(id)?;
        let rounds = self.repo.rounds(id)?;

        if players.len() < 2 {
            return Err(DirectorError::NotEnoughPlayers(players.len()));
        }
        if let Some(last) = rounds.last() {
            if !last.is_complete() {
                return Err(DirectorError::RoundInProgress {
                    round: last.number,
                    pending: last.pending_games(),
                });
            }
        }
        if let Some(planned) = tournament.planned_rounds {
            if rounds.len() as u32 >= planned {
                return Err(DirectorError::TournamentFinished(planned));
            }
        }

        let number = rounds.last().map_or(1, |r| r.number + 1);
        let pairings = generate_pairings(&players, &rounds, number);
        let round = Round::new(tournament.id.clone(), number, pairings);
        self.repo.save_round(&round)?;

        info!(
            "{}: round {} paired on {} board(s)",
            tournament.name,
            number,
            round.pairings.len()
        );
        Ok(round)
    }

    /// Record or correct the result of one board.
    pub fn record_result(
        &self,
        id: &TournamentId,
        round_number: u32,
        board: u32,
        outcome: Outcome,
    ) -> Result<Round, DirectorError> {
        let _guard = self.write_lock()?;
        self.tournament(id)?;
        let rounds = self.repo.rounds(id)?;
        let latest = rounds.last().map(|r| r.number);
        let mut round = rounds
            .into_iter()
            .find(|r| r.number == round_number)
            .ok_or(DirectorError::RoundNotFound(round_number))?;

        let pairing = round
            .board_mut(board)
            .ok_or(DirectorError::BoardNotFound {
                round: round_number,
                board,
            })?;
        if pairing.is_bye() {
            return Err(DirectorError::ByeBoard {
                round: round_number,
                board,
            });
        }
        pairing.outcome = outcome;

        if latest != Some(round_number) {
            warn!(
                "Result changed in round {} after later rounds were paired",
                round_number
            );
        }
        self.repo.save_round(&round)?;
        info!("Round {} board {}: {}", round_number, board, outcome);
        Ok(round)
    }

    /// Current standings; seeding order before the first round.
    pub fn standings(&self, id: &TournamentId) -> Result<Vec<Standing>, DirectorError> {
        self.tournament(id)?;
        let players = self.repo.players(id)?;
        let rounds = self.repo.rounds(id)?;

        if rounds.is_empty() {
            return Ok(initial_standings(&players));
        }
        Ok(calculate_standings(&players, &rounds))
    }

    /// Provisional rating changes from decided games.
    pub fn rating_changes(&self, id: &TournamentId) -> Result<Vec<RatingChange>, DirectorError> {
        self.tournament(id)?;
        let players = self.repo.players(id)?;
        let rounds = self.repo.rounds(id)?;
        Ok(rating_changes(&players, &rounds, self.formula.as_ref()))
    }
}
