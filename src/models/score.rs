//! Tournament score kept in exact half points.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign};

/// A tournament score. Stored as half points so that score groups compare
/// exactly; serialized as a decimal number (`1.5`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u32);

impl Score {
    pub const ZERO: Score = Score(0);
    pub const HALF: Score = Score(1);
    pub const ONE: Score = Score(2);

    /// Build a score from a count of half points.
    pub fn from_half_points(half_points: u32) -> Self {
        Self(half_points)
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 2.0
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        Score(self.0 + rhs.0)
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Score) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.as_f64())
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() || value < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "score must be a non-negative number, got {}",
                value
            )));
        }
        let half_points = value * 2.0;
        if half_points.fract() != 0.0 || half_points > u32::MAX as f64 {
            return Err(serde::de::Error::custom(format!(
                "score must be a whole number of half points, got {}",
                value
            )));
        }
        Ok(Score(half_points as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_arithmetic() {
        let mut score = Score::ZERO;
        score += Score::ONE;
        score += Score::HALF;
        assert_eq!(score, Score::from_half_points(3));
        assert_eq!(score.as_f64(), 1.5);
        assert_eq!(Score::HALF + Score::HALF, Score::ONE);
    }

    #[test]
    fn test_score_display() {
        assert_eq!(Score::from_half_points(5).to_string(), "2.5");
        assert_eq!(Score::ZERO.to_string(), "0.0");
    }

    #[test]
    fn test_score_serde() {
        let json = serde_json::to_string(&Score::from_half_points(3)).unwrap();
        assert_eq!(json, "1.5");
        let parsed: Score = serde_json::from_str("2.5").unwrap();
        assert_eq!(parsed, Score::from_half_points(5));
        assert!(serde_json::from_str::<Score>("-1.0").is_err());
    }

    #[test]
    fn test_score_rejects_partial_half_points() {
        assert!(serde_json::from_str::<Score>("0.3").is_err());
        assert!(serde_json::from_str::<Score>("1.75").is_err());
        assert_eq!(serde_json::from_str::<Score>("3").unwrap(), Score::from_half_points(6));
    }

    #[test]
    fn test_score_ordering() {
        assert!(Score::ONE > Score::HALF);
        assert!(Score::HALF > Score::ZERO);
    }
}
