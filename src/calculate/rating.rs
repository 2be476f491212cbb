//! Rating recalculation.
//!
//! The rating formula is pluggable through [`RatingFormula`]; [`Elo`] is the
//! standard logistic Elo update.

use std::collections::HashMap;

use super::seeding::seed_order;
use crate::models::{Color, Player, PlayerId, RatingChange, Round, Score};
use crate::pairing::{dedup_roster, rounds_in_order};

/// Default K-factor, standard for most chess rating systems.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// A pure rating update for one game.
pub trait RatingFormula: Send + Sync {
    /// New rating of a player scoring `score` against `opponent_rating`.
    fn new_rating(&self, rating: u32, opponent_rating: u32, score: Score) -> u32;
}

/// Elo rating update.
#[derive(Debug, Clone, Copy)]
pub struct Elo {
    pub k_factor: f64,
}

impl Elo {
    pub fn new(k_factor: f64) -> Self {
        Self { k_factor }
    }

    /// Expected score of a player against an opponent.
    pub fn expected_score(rating: u32, opponent_rating: u32) -> f64 {
        let diff = opponent_rating as f64 - rating as f64;
        1.0 / (1.0 + 10_f64.powf(diff / 400.0))
    }
}

impl Default for Elo {
    fn default() -> Self {
        Self::new(DEFAULT_K_FACTOR)
    }
}

impl RatingFormula for Elo {
    fn new_rating(&self, rating: u32, opponent_rating: u32, score: Score) -> u32 {
        let expected = Self::expected_score(rating, opponent_rating);
        let new = rating as f64 + self.k_factor * (score.as_f64() - expected);
        new.round().max(0.0) as u32
    }
}

/// Provisional rating of every player after the given rounds.
///
/// Each decided game is rated with both players' starting ratings and the
/// per-game changes are summed. Byes and games against players missing
/// from the roster are not rated. Rows follow seeding order.
pub fn rating_changes(
    players: &[Player],
    rounds: &[Round],
    formula: &dyn RatingFormula,
) -> Vec<RatingChange> {
    let roster = dedup_roster(players);
    let ratings: HashMap<&PlayerId, u32> = roster.iter().map(|p| (&p.id, p.rating)).collect();
    let mut deltas: HashMap<&PlayerId, (i64, u32)> = HashMap::new();

    for round in rounds_in_order(rounds) {
        for pairing in &round.pairings {
            let Some(black) = &pairing.black else {
                continue;
            };
            if !pairing.outcome.is_decided() || black == &pairing.white {
                continue;
            }
            let (Some(&white_rating), Some(&black_rating)) =
                (ratings.get(&pairing.white), ratings.get(black))
            else {
                continue;
            };
            for (id, color, own, opponent) in [
                (&pairing.white, Color::White, white_rating, black_rating),
                (black, Color::Black, black_rating, white_rating),
            ] {
                let Some(score) = pairing.outcome.points(color) else {
                    continue;
                };
                let new = formula.new_rating(own, opponent, score);
                let entry = deltas.entry(id).or_insert((0, 0));
                entry.0 += new as i64 - own as i64;
                entry.1 += 1;
            }
        }
    }

    seed_order(&roster)
        .into_iter()
        .map(|i| {
            let player = roster[i];
            let (delta, games) = deltas.get(&player.id).copied().unwrap_or((0, 0));
            RatingChange {
                player_id: player.id.clone(),
                player_name: player.name.clone(),
                old_rating: player.rating,
                new_rating: (player.rating as i64 + delta).max(0) as u32,
                games_rated: games,
            }
        })
        .collect()
}
