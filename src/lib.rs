//! # Swiss Arbiter
//!
//! A Swiss-system chess pairing and standings engine.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, pairings, rounds, standings)
//! - **pairing**: History replay and Swiss round generation
//! - **calculate**: Seeding, standings and rating changes
//! - **director**: Tournament workflow on top of a repository
//! - **storage**: Tournament repositories (one JSONL directory per tournament, or in memory)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod director;
pub mod models;
pub mod pairing;
pub mod storage;

pub use models::*;

use chrono::{NaiveDate, Utc};

/// Parse a date given on the command line ("2026-05-01" or "today").
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("today") {
        return Some(Utc::now().date_naive());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_iso() {
        assert_eq!(
            parse_date("2026-05-01"),
            NaiveDate::from_ymd_opt(2026, 5, 1)
        );
    }

    #[test]
    fn test_parse_date_trims() {
        assert_eq!(
            parse_date("  2026-12-31 "),
            NaiveDate::from_ymd_opt(2026, 12, 31)
        );
    }

    #[test]
    fn test_parse_date_today() {
        assert_eq!(parse_date("Today"), Some(Utc::now().date_naive()));
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date("01/05/2026"), None);
        assert_eq!(parse_date("2026-02-30"), None);
        assert_eq!(parse_date(""), None);
    }
}
