//! Per-player state replayed from round history.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::calculate::seeding::Seed;
use crate::models::{Color, Pairing, Player, PlayerId, Round, Score};

/// Everything the pairing engine knows about a player, rebuilt from the
/// full history on every call and never stored.
#[derive(Debug, Clone)]
pub struct PlayerAggregate<'a> {
    pub player: &'a Player,

    /// Position in the (deduplicated) roster
    pub position: usize,

    pub score: Score,

    /// Opponents in the order they were met
    pub opponents: Vec<PlayerId>,

    /// Colors in the order they were assigned
    pub colors: Vec<Color>,

    /// +1 per white game, -1 per black game
    pub color_balance: i32,

    pub had_bye: bool,
}

impl<'a> PlayerAggregate<'a> {
    fn new(player: &'a Player, position: usize) -> Self {
        Self {
            player,
            position,
            score: Score::ZERO,
            opponents: Vec::new(),
            colors: Vec::new(),
            color_balance: 0,
            had_bye: false,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.player.id
    }

    pub fn seed(&self) -> Seed {
        Seed::new(self.player.rating, self.position)
    }

    pub fn has_faced(&self, other: &PlayerId) -> bool {
        self.opponents.contains(other)
    }

    pub fn last_color(&self) -> Option<Color> {
        self.colors.last().copied()
    }

    fn record_game(&mut self, color: Color, opponent: &PlayerId, points: Option<Score>) {
        self.opponents.push(opponent.clone());
        self.colors.push(color);
        self.color_balance += color.balance();
        if let Some(points) = points {
            self.score += points;
        }
    }
}

/// Drop repeated roster IDs, keeping the first occurrence.
pub(crate) fn dedup_roster(players: &[Player]) -> Vec<&Player> {
    let mut seen = HashSet::new();
    let mut roster = Vec::with_capacity(players.len());
    for player in players {
        if !seen.insert(&player.id) {
            warn!("Duplicate player id {} in roster, keeping first entry", player.id);
            continue;
        }
        roster.push(player);
    }
    roster
}

/// Rounds in ascending round number, ties kept in input order.
pub(crate) fn rounds_in_order(rounds: &[Round]) -> Vec<&Round> {
    let mut ordered: Vec<&Round> = rounds.iter().collect();
    ordered.sort_by_key(|r| r.number);
    ordered
}

/// Replay every pairing of `rounds` into one aggregate per roster player.
///
/// The returned vector follows roster order. Pairings naming players that
/// are not on the roster only update the known side.
pub fn build_aggregates<'a>(players: &'a [Player], rounds: &[Round]) -> Vec<PlayerAggregate<'a>> {
    let roster = dedup_roster(players);
    let mut aggregates: Vec<PlayerAggregate<'a>> = roster
        .iter()
        .copied()
        .enumerate()
        .map(|(position, player)| PlayerAggregate::new(player, position))
        .collect();
    let index: HashMap<PlayerId, usize> = roster
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i))
        .collect();

    for round in rounds_in_order(rounds) {
        for pairing in &round.pairings {
            replay_pairing(&mut aggregates, &index, round.number, pairing);
        }
    }

    aggregates
}

fn replay_pairing(
    aggregates: &mut [PlayerAggregate<'_>],
    index: &HashMap<PlayerId, usize>,
    round: u32,
    pairing: &Pairing,
) {
    let Some(black) = &pairing.black else {
        match index.get(&pairing.white) {
            Some(&i) => {
                let agg = &mut aggregates[i];
                agg.had_bye = true;
                if let Some(points) = pairing.points_for(&pairing.white) {
                    agg.score += points;
                }
            }
            None => warn!(
                "Round {} board {}: bye for unknown player {}, skipping",
                round, pairing.board, pairing.white
            ),
        }
        return;
    };

    if black == &pairing.white {
        warn!(
            "Round {} board {}: player {} paired against themselves, skipping",
            round, pairing.board, black
        );
        return;
    }

    for (player, color, opponent) in [
        (&pairing.white, Color::White, black),
        (black, Color::Black, &pairing.white),
    ] {
        match index.get(player) {
            Some(&i) => {
                aggregates[i].record_game(color, opponent, pairing.outcome.points(color));
            }
            None => warn!(
                "Round {} board {}: unknown player {}, skipping their side",
                round, pairing.board, player
            ),
        }
    }
}
