//! Pairing model: one board of a round, or a bye.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::{PlayerId, Score};

/// Side of the board. White moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Contribution to the color balance (+1 white, -1 black).
    pub fn balance(&self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

/// Game result, written with the usual chess notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "1-0")]
    WhiteWins,
    #[serde(rename = "0-1")]
    BlackWins,
    #[serde(rename = "1/2-1/2")]
    Draw,
    #[default]
    #[serde(rename = "*")]
    Undecided,
}

impl Outcome {
    /// Whether the game has been played.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Outcome::Undecided)
    }

    /// Points earned by the given side, or `None` if not decided.
    pub fn points(&self, color: Color) -> Option<Score> {
        match (self, color) {
            (Outcome::Undecided, _) => None,
            (Outcome::Draw, _) => Some(Score::HALF),
            (Outcome::WhiteWins, Color::White) | (Outcome::BlackWins, Color::Black) => {
                Some(Score::ONE)
            }
            _ => Some(Score::ZERO),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::WhiteWins => "1-0",
            Outcome::BlackWins => "0-1",
            Outcome::Draw => "1/2-1/2",
            Outcome::Undecided => "*",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unrecognized result '{0}' (expected 1-0, 0-1, 1/2-1/2 or *)")]
pub struct ParseOutcomeError(pub String);

impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1-0" | "white" => Ok(Outcome::WhiteWins),
            "0-1" | "black" => Ok(Outcome::BlackWins),
            "1/2-1/2" | "½-½" | "0.5-0.5" | "draw" | "=" => Ok(Outcome::Draw),
            "*" | "" | "undecided" => Ok(Outcome::Undecided),
            _ => Err(ParseOutcomeError(s.to_string())),
        }
    }
}

/// A single board of a round.
///
/// A pairing with no black player is a bye. Byes are created already
/// decided in favour of the player receiving them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    /// Board number, starting at 1
    pub board: u32,

    /// Player with the white pieces
    pub white: PlayerId,

    /// Player with the black pieces; `None` for a bye
    pub black: Option<PlayerId>,

    /// Result of the game
    #[serde(default)]
    pub outcome: Outcome,
}

impl Pairing {
    /// Create an undecided game.
    pub fn new(board: u32, white: PlayerId, black: PlayerId) -> Self {
        Self {
            board,
            white,
            black: Some(black),
            outcome: Outcome::Undecided,
        }
    }

    /// Create a bye worth one point.
    pub fn bye(board: u32, player: PlayerId) -> Self {
        Self {
            board,
            white: player,
            black: None,
            outcome: Outcome::WhiteWins,
        }
    }

    /// Builder method to set the outcome.
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn is_bye(&self) -> bool {
        self.black.is_none()
    }

    /// Both participants (one for a bye).
    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        std::iter::once(&self.white).chain(self.black.iter())
    }

    pub fn involves(&self, player: &PlayerId) -> bool {
        self.players().any(|p| p == player)
    }

    /// Color the player had on this board.
    pub fn color_of(&self, player: &PlayerId) -> Option<Color> {
        if &self.white == player {
            Some(Color::White)
        } else if self.black.as_ref() == Some(player) {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// The player's opponent, if they played a game on this board.
    pub fn opponent_of(&self, player: &PlayerId) -> Option<&PlayerId> {
        match self.color_of(player)? {
            Color::White => self.black.as_ref(),
            Color::Black => Some(&self.white),
        }
    }

    /// Points the player earned on this board, if decided.
    pub fn points_for(&self, player: &PlayerId) -> Option<Score> {
        self.outcome.points(self.color_of(player)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_points() {
        assert_eq!(Outcome::WhiteWins.points(Color::White), Some(Score::ONE));
        assert_eq!(Outcome::WhiteWins.points(Color::Black), Some(Score::ZERO));
        assert_eq!(Outcome::BlackWins.points(Color::Black), Some(Score::ONE));
        assert_eq!(Outcome::Draw.points(Color::White), Some(Score::HALF));
        assert_eq!(Outcome::Undecided.points(Color::White), None);
    }

    #[test]
    fn test_outcome_parse() {
        assert_eq!("1-0".parse(), Ok(Outcome::WhiteWins));
        assert_eq!("0-1".parse(), Ok(Outcome::BlackWins));
        assert_eq!("½-½".parse(), Ok(Outcome::Draw));
        assert_eq!("Draw".parse(), Ok(Outcome::Draw));
        assert_eq!("*".parse(), Ok(Outcome::Undecided));
        assert!("2-0".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_outcome_serializes_as_chess_notation() {
        assert_eq!(serde_json::to_string(&Outcome::Draw).unwrap(), "\"1/2-1/2\"");
        let parsed: Outcome = serde_json::from_str("\"0-1\"").unwrap();
        assert_eq!(parsed, Outcome::BlackWins);
    }

    #[test]
    fn test_pairing_accessors() {
        let pairing = Pairing::new(1, "a".into(), "b".into()).with_outcome(Outcome::BlackWins);

        assert!(!pairing.is_bye());
        assert_eq!(pairing.color_of(&"b".into()), Some(Color::Black));
        assert_eq!(pairing.opponent_of(&"a".into()), Some(&PlayerId::from("b")));
        assert_eq!(pairing.points_for(&"b".into()), Some(Score::ONE));
        assert_eq!(pairing.points_for(&"c".into()), None);
        assert_eq!(pairing.players().count(), 2);
    }

    #[test]
    fn test_bye_is_decided_point() {
        let bye = Pairing::bye(4, "a".into());

        assert!(bye.is_bye());
        assert_eq!(bye.opponent_of(&"a".into()), None);
        assert_eq!(bye.points_for(&"a".into()), Some(Score::ONE));
        assert_eq!(bye.players().count(), 1);
    }

    #[test]
    fn test_pairing_missing_outcome_defaults_undecided() {
        let pairing: Pairing =
            serde_json::from_str(r#"{"board":1,"white":"a","black":"b"}"#).unwrap();
        assert_eq!(pairing.outcome, Outcome::Undecided);
    }
}
