//! Standings from round history.

use std::collections::HashMap;

use tracing::warn;

use super::seeding::{rank_key, seed_order, Seed};
use crate::models::{PlayerId, Player, Round, Score, Standing, WinLossRecord};
use crate::pairing::{dedup_roster, rounds_in_order};

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    score: Score,
    games_played: u32,
    record: WinLossRecord,
}

fn standing(player: &Player, tally: Tally) -> Standing {
    Standing {
        rank: 0,
        player_id: player.id.clone(),
        player_name: player.name.clone(),
        rating: player.rating,
        score: tally.score,
        games_played: tally.games_played,
        record: tally.record,
        buchholz: 0.0,
        sonneborn_berger: 0.0,
    }
}

fn assign_ranks(standings: &mut [Standing]) {
    for (i, row) in standings.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }
}

/// Ranked standings after the given rounds.
///
/// Sorted by score, then rating, then roster position. Undecided games are
/// ignored; a decided bye counts as a game played.
pub fn calculate_standings(players: &[Player], rounds: &[Round]) -> Vec<Standing> {
    let roster = dedup_roster(players);
    let index: HashMap<&PlayerId, usize> = roster
        .iter()
        .enumerate()
        .map(|(i, p)| (&p.id, i))
        .collect();
    let mut tallies = vec![Tally::default(); roster.len()];

    for round in rounds_in_order(rounds) {
        for pairing in &round.pairings {
            if !pairing.outcome.is_decided() {
                continue;
            }
            if pairing.black.as_ref() == Some(&pairing.white) {
                warn!(
                    "Round {} board {}: self-pairing ignored in standings",
                    round.number, pairing.board
                );
                continue;
            }
            for id in pairing.players() {
                let (Some(&i), Some(points)) = (index.get(id), pairing.points_for(id)) else {
                    warn!(
                        "Round {} board {}: unknown player {} ignored in standings",
                        round.number, pairing.board, id
                    );
                    continue;
                };
                let tally = &mut tallies[i];
                tally.score += points;
                tally.games_played += 1;
                tally.record.add(points);
            }
        }
    }

    let mut order: Vec<usize> = (0..roster.len()).collect();
    order.sort_by_key(|&i| rank_key(tallies[i].score, Seed::new(roster[i].rating, i)));

    let mut standings: Vec<Standing> = order
        .into_iter()
        .map(|i| standing(roster[i], tallies[i]))
        .collect();
    assign_ranks(&mut standings);
    standings
}

/// Standings before the first round: everyone on zero, ordered by rating.
pub fn initial_standings(players: &[Player]) -> Vec<Standing> {
    let roster = dedup_roster(players);
    let mut standings: Vec<Standing> = seed_order(&roster)
        .into_iter()
        .map(|i| standing(roster[i], Tally::default()))
        .collect();
    assign_ranks(&mut standings);
    standings
}
