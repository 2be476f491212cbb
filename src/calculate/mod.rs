//! Standings and rating calculation.
//!
//! Everything here is a pure function of the roster and the round history:
//! - Ranked standings and initial seeding
//! - Rating-based tie-break ordering
//! - Provisional rating changes through a pluggable formula

pub mod rating;
pub mod seeding;
mod standings;

pub use rating::{rating_changes, Elo, RatingFormula, DEFAULT_K_FACTOR};
pub use seeding::Seed;
pub use standings::{calculate_standings, initial_standings};
