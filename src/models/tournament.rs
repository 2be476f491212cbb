//! Tournament model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, TournamentId};

/// A Swiss-system tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// Unique identifier (derived from name + date)
    pub id: TournamentId,

    /// Tournament name
    pub name: String,

    /// Start date
    pub date: NaiveDate,

    /// Location (city, country)
    pub location: Option<String>,

    /// Number of rounds planned; `None` means open-ended
    pub planned_rounds: Option<u32>,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new Tournament with auto-generated ID.
    pub fn new(name: String, date: NaiveDate) -> Self {
        let id = EntityId::generate(&[&name, &date.to_string()]);

        Self {
            id,
            name,
            date,
            location: None,
            planned_rounds: None,
            created_at: Utc::now(),
        }
    }

    /// Builder method to set location.
    pub fn with_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    /// Builder method to set the number of planned rounds.
    pub fn with_planned_rounds(mut self, rounds: u32) -> Self {
        self.planned_rounds = Some(rounds);
        self
    }
}
