//! Player roster entry.

use serde::{Deserialize, Serialize};

use super::{EntityId, PlayerId, TournamentId};

/// Rating assigned to players registered without one.
pub const DEFAULT_RATING: u32 = 800;

/// A registered tournament player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identifier
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Strength rating used for seeding and tie-breaks
    #[serde(default = "default_rating")]
    pub rating: u32,
}

fn default_rating() -> u32 {
    DEFAULT_RATING
}

impl Player {
    /// Create a player with an externally supplied ID.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, rating: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rating,
        }
    }

    /// Create a player whose ID is derived from the tournament and name.
    pub fn registered(tournament_id: &TournamentId, name: String, rating: u32) -> Self {
        let id = EntityId::generate(&[tournament_id.as_str(), &name.to_lowercase()]);
        Self { id, name, rating }
    }
}
