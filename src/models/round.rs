//! Round model: the pairings played in one round of a tournament.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Pairing, PlayerId, TournamentId};

/// A round of a tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Tournament this round belongs to
    pub tournament_id: TournamentId,

    /// Round number, starting at 1
    pub number: u32,

    /// Pairings in board order
    pub pairings: Vec<Pairing>,

    /// When the round was paired
    pub created_at: DateTime<Utc>,
}

impl Round {
    pub fn new(tournament_id: TournamentId, number: u32, pairings: Vec<Pairing>) -> Self {
        Self {
            tournament_id,
            number,
            pairings,
            created_at: Utc::now(),
        }
    }

    /// Whether every game of the round has a result.
    pub fn is_complete(&self) -> bool {
        self.pairings.iter().all(|p| p.outcome.is_decided())
    }

    /// Number of games still waiting for a result.
    pub fn pending_games(&self) -> usize {
        self.pairings
            .iter()
            .filter(|p| !p.outcome.is_decided())
            .count()
    }

    pub fn board(&self, board: u32) -> Option<&Pairing> {
        self.pairings.iter().find(|p| p.board == board)
    }

    pub fn board_mut(&mut self, board: u32) -> Option<&mut Pairing> {
        self.pairings.iter_mut().find(|p| p.board == board)
    }

    /// The player receiving the bye this round, if any.
    pub fn bye_player(&self) -> Option<&PlayerId> {
        self.pairings.iter().find(|p| p.is_bye()).map(|p| &p.white)
    }
}
