//! Core data models for the pairing engine and tournament records.

mod ids;
mod pairing;
mod player;
mod round;
mod score;
mod standing;
mod tournament;

pub use ids::*;
pub use pairing::*;
pub use player::*;
pub use round::*;
pub use score::*;
pub use standing::*;
pub use tournament::*;
