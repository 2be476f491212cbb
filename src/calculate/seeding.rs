//! Rating order with a stable roster-position tiebreak.

use std::cmp::{Ordering, Reverse};

use crate::models::{Player, Score};

/// Seeding key of a player: higher rating first, then earlier roster
/// position. Two different players never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    pub rating: u32,
    pub position: usize,
}

impl Seed {
    pub fn new(rating: u32, position: usize) -> Self {
        Self { rating, position }
    }
}

impl Ord for Seed {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .rating
            .cmp(&self.rating)
            .then_with(|| self.position.cmp(&other.position))
    }
}

impl PartialOrd for Seed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Standings order key: score descending, then seed.
pub fn rank_key(score: Score, seed: Seed) -> (Reverse<Score>, Seed) {
    (Reverse(score), seed)
}

/// Roster indices sorted by seed.
pub fn seed_order(players: &[&Player]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..players.len()).collect();
    order.sort_by_key(|&i| Seed::new(players[i].rating, i));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_orders_by_rating_then_position() {
        let strong = Seed::new(2000, 5);
        let weak = Seed::new(1500, 0);
        let tied_late = Seed::new(2000, 7);

        assert!(strong < weak);
        assert!(strong < tied_late);
        assert_eq!(strong.cmp(&strong), Ordering::Equal);
    }

    #[test]
    fn test_rank_key_puts_score_first() {
        let leader = rank_key(Score::ONE, Seed::new(1200, 3));
        let chaser = rank_key(Score::HALF, Seed::new(2400, 0));
        assert!(leader < chaser);
    }

    #[test]
    fn test_seed_order_is_stable_on_rating_ties() {
        let players = [
            Player::new("a", "A", 1500),
            Player::new("b", "B", 1700),
            Player::new("c", "C", 1500),
            Player::new("d", "D", 1900),
        ];
        let refs: Vec<&Player> = players.iter().collect();

        assert_eq!(seed_order(&refs), vec![3, 1, 0, 2]);
    }
}
