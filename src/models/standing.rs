//! Standings row model.

use serde::{Deserialize, Serialize};

use super::{PlayerId, Score};

/// Win/loss/draw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WinLossRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl WinLossRecord {
    /// Create a new record.
    pub fn new(wins: u32, losses: u32, draws: u32) -> Self {
        Self {
            wins,
            losses,
            draws,
        }
    }

    /// Count a result from the player's point of view.
    pub fn add(&mut self, points: Score) {
        match points {
            Score::ONE => self.wins += 1,
            Score::HALF => self.draws += 1,
            _ => self.losses += 1,
        }
    }
}

/// One row of the standings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// Position in the table, starting at 1
    pub rank: u32,

    pub player_id: PlayerId,

    pub player_name: String,

    pub rating: u32,

    pub score: Score,

    /// Decided games, byes included
    pub games_played: u32,

    pub record: WinLossRecord,

    /// Placeholder, not computed
    pub buchholz: f64,

    /// Placeholder, not computed
    pub sonneborn_berger: f64,
}

/// Rating movement of one player over a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub player_name: String,
    pub old_rating: u32,
    pub new_rating: u32,
    pub games_rated: u32,
}

impl RatingChange {
    pub fn delta(&self) -> i64 {
        self.new_rating as i64 - self.old_rating as i64
    }
}
