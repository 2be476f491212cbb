//! Swiss-system pairing engine.
//!
//! Stateless: every call replays the full round history into
//! [`PlayerAggregate`]s and pairs from those alone.

mod aggregate;
mod swiss;

pub use aggregate::{build_aggregates, PlayerAggregate};
pub use swiss::generate_pairings;

pub(crate) use aggregate::{dedup_roster, rounds_in_order};
