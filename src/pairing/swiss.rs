//! Swiss-system pairing.
//!
//! With an odd field the bye is set aside first: it goes to the lowest
//! ranked player who has not had one. The others are grouped by score and
//! paired greedily inside each group, strongest first, avoiding repeat
//! opponents. Whoever is left over is paired across groups from one pool,
//! where repeats are allowed as a last resort.
//!
//! The greedy first-fit pass is not a maximum matching: an early pairing in
//! a group can leave a later player without a fresh opponent even when a
//! different arrangement would have found one.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use tracing::{debug, info};

use super::aggregate::{build_aggregates, PlayerAggregate};
use crate::calculate::seeding::rank_key;
use crate::models::{Color, Pairing, Player, Round, Score};

/// Pair the next round.
///
/// `round_number` is only used for logging; the pairing depends solely on
/// `players` and `prior_rounds`. Never fails: fewer than two players yields
/// an empty list, and an odd count yields exactly one bye as the last board.
pub fn generate_pairings(
    players: &[Player],
    prior_rounds: &[Round],
    round_number: u32,
) -> Vec<Pairing> {
    let aggregates = build_aggregates(players, prior_rounds);
    if aggregates.len() < 2 {
        debug!(
            "Round {}: {} player(s), nothing to pair",
            round_number,
            aggregates.len()
        );
        return Vec::new();
    }

    let mut paired = vec![false; aggregates.len()];
    let bye = select_bye(&aggregates);
    if let Some(i) = bye {
        paired[i] = true;
    }
    let mut games: Vec<(usize, usize)> = Vec::with_capacity(aggregates.len() / 2);

    for members in score_groups(&aggregates) {
        pair_score_group(&aggregates, &members, &mut paired, &mut games);
    }

    let mut pool: Vec<usize> = (0..aggregates.len()).filter(|&i| !paired[i]).collect();
    pool.sort_by_key(|&i| rank_key(aggregates[i].score, aggregates[i].seed()));
    pair_pool(&aggregates, pool, &mut games, round_number);

    let mut pairings: Vec<Pairing> = games
        .iter()
        .zip(1u32..)
        .map(|(&(a, b), board)| {
            let (white, black) = if takes_white(&aggregates[a], &aggregates[b]) {
                (a, b)
            } else {
                (b, a)
            };
            debug!(
                "Round {} board {}: {} ({}) - {} ({})",
                round_number,
                board,
                aggregates[white].player.name,
                aggregates[white].score,
                aggregates[black].player.name,
                aggregates[black].score
            );
            Pairing::new(
                board,
                aggregates[white].id().clone(),
                aggregates[black].id().clone(),
            )
        })
        .collect();

    if let Some(i) = bye {
        let board = pairings.len() as u32 + 1;
        debug!(
            "Round {}: bye for {}",
            round_number, aggregates[i].player.name
        );
        pairings.push(Pairing::bye(board, aggregates[i].id().clone()));
    }

    info!(
        "Paired round {}: {} games, bye: {}",
        round_number,
        games.len(),
        bye.is_some()
    );
    pairings
}

/// The lowest ranked player without a previous bye, or the lowest ranked
/// player when everyone has had one. `None` for an even field.
fn select_bye(aggregates: &[PlayerAggregate<'_>]) -> Option<usize> {
    if aggregates.len() % 2 == 0 {
        return None;
    }
    let mut order: Vec<usize> = (0..aggregates.len()).collect();
    order.sort_by_key(|&i| rank_key(aggregates[i].score, aggregates[i].seed()));

    let lowest = order.last().copied();
    let eligible = order.iter().rev().copied().find(|&i| !aggregates[i].had_bye);
    if eligible.is_none() {
        debug!("Every player has had a bye, repeating it for the lowest ranked");
    }
    eligible.or(lowest)
}

/// Score groups from the highest score down, each sorted by seed.
fn score_groups(aggregates: &[PlayerAggregate<'_>]) -> Vec<Vec<usize>> {
    let mut groups: BTreeMap<Reverse<Score>, Vec<usize>> = BTreeMap::new();
    for (i, agg) in aggregates.iter().enumerate() {
        groups.entry(Reverse(agg.score)).or_default().push(i);
    }

    groups
        .into_values()
        .map(|mut members| {
            members.sort_by_key(|&i| aggregates[i].seed());
            members
        })
        .collect()
}

/// First-fit pairing inside one score group. Never repeats a game.
fn pair_score_group(
    aggregates: &[PlayerAggregate<'_>],
    members: &[usize],
    paired: &mut [bool],
    games: &mut Vec<(usize, usize)>,
) {
    for (pos, &a) in members.iter().enumerate() {
        if paired[a] {
            continue;
        }
        let partner = members[pos + 1..]
            .iter()
            .copied()
            .find(|&b| !paired[b] && !aggregates[a].has_faced(aggregates[b].id()));
        if let Some(b) = partner {
            paired[a] = true;
            paired[b] = true;
            games.push((a, b));
        }
    }
}

/// Pair the leftover pool, which holds an even number of players.
///
/// The pool head does not simply take its neighbour in pool order: it takes
/// the first player below it that it has not faced, and falls back to the
/// neighbour (a rematch) only when every remaining player is a previous
/// opponent.
fn pair_pool(
    aggregates: &[PlayerAggregate<'_>],
    mut pool: Vec<usize>,
    games: &mut Vec<(usize, usize)>,
    round_number: u32,
) {
    pool.reverse();
    while pool.len() >= 2 {
        let Some(head) = pool.pop() else {
            break;
        };
        let fresh = pool
            .iter()
            .rposition(|&c| !aggregates[head].has_faced(aggregates[c].id()));
        let pick = match fresh {
            Some(pick) => pick,
            None => {
                let last = pool.len() - 1;
                debug!(
                    "Round {}: no fresh opponent left for {}, allowing a rematch with {}",
                    round_number,
                    aggregates[head].player.name,
                    aggregates[pool[last]].player.name
                );
                last
            }
        };
        let opponent = pool.remove(pick);
        games.push((head, opponent));
    }
}

/// Whether `a` gets white against `b`. `a` is the player earlier in
/// processing order and wins every remaining tie.
fn takes_white(a: &PlayerAggregate<'_>, b: &PlayerAggregate<'_>) -> bool {
    if a.color_balance != b.color_balance {
        return a.color_balance < b.color_balance;
    }
    let a_due = a.last_color() == Some(Color::Black);
    let b_due = b.last_color() == Some(Color::Black);
    a_due || !b_due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Outcome, PlayerId};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn four_players() -> Vec<Player> {
        vec![
            Player::new("p1", "P1", 1800),
            Player::new("p2", "P2", 1700),
            Player::new("p3", "P3", 1600),
            Player::new("p4", "P4", 1500),
        ]
    }

    fn ids(pairing: &Pairing) -> (String, Option<String>) {
        (
            pairing.white.to_string(),
            pairing.black.as_ref().map(|b| b.to_string()),
        )
    }

    fn game(white: &str, black: &str) -> (String, Option<String>) {
        (white.to_string(), Some(black.to_string()))
    }

    fn round(number: u32, pairings: Vec<Pairing>) -> Round {
        Round::new("t".into(), number, pairings)
    }

    fn assert_no_duplicates(pairings: &[Pairing]) {
        let mut seen = HashSet::new();
        for p in pairings {
            for id in p.players() {
                assert!(seen.insert(id.clone()), "{} paired twice", id);
            }
        }
    }

    /// Plays `rounds` rounds where the higher rated player always wins.
    fn simulate(players: &[Player], rounds: u32) -> Vec<Round> {
        let rating = |id: &PlayerId| {
            players
                .iter()
                .find(|p| &p.id == id)
                .map(|p| p.rating)
                .unwrap_or(0)
        };
        let mut history = Vec::new();
        for number in 1..=rounds {
            let pairings = generate_pairings(players, &history, number)
                .into_iter()
                .map(|p| match &p.black {
                    None => p,
                    Some(black) if rating(&p.white) >= rating(black) => {
                        p.with_outcome(Outcome::WhiteWins)
                    }
                    Some(_) => p.with_outcome(Outcome::BlackWins),
                })
                .collect();
            history.push(round(number, pairings));
        }
        history
    }

    #[test]
    fn test_fewer_than_two_players() {
        assert!(generate_pairings(&[], &[], 1).is_empty());
        assert!(generate_pairings(&[Player::new("a", "A", 1500)], &[], 1).is_empty());
    }

    #[test]
    fn test_two_players_with_duplicate_entry_still_pair() {
        let players = vec![
            Player::new("a", "A", 1500),
            Player::new("a", "A twin", 1500),
            Player::new("b", "B", 1400),
        ];
        let pairings = generate_pairings(&players, &[], 1);
        assert_eq!(pairings.len(), 1);
        assert_eq!(ids(&pairings[0]), game("a", "b"));
    }

    #[test]
    fn test_first_round_pairs_by_rating() {
        let pairings = generate_pairings(&four_players(), &[], 1);

        assert_eq!(
            pairings.iter().map(ids).collect::<Vec<_>>(),
            vec![game("p1", "p2"), game("p3", "p4")]
        );
        assert_eq!(pairings[0].board, 1);
        assert_eq!(pairings[1].board, 2);
        assert!(pairings.iter().all(|p| p.outcome == Outcome::Undecided));
    }

    #[test]
    fn test_first_round_ignores_roster_order() {
        let mut players = four_players();
        players.reverse();
        let pairings = generate_pairings(&players, &[], 1);

        assert_eq!(
            pairings.iter().map(ids).collect::<Vec<_>>(),
            vec![game("p1", "p2"), game("p3", "p4")]
        );
    }

    #[test]
    fn test_second_round_floats_leader_down_and_avoids_rematch() {
        let players = four_players();
        let history = vec![round(
            1,
            vec![
                Pairing::new(1, "p1".into(), "p2".into()).with_outcome(Outcome::WhiteWins),
                Pairing::new(2, "p3".into(), "p4".into()).with_outcome(Outcome::Draw),
            ],
        )];

        let pairings = generate_pairings(&players, &history, 2);

        // p1 and p3 both had white last round, so the player earlier in pool
        // order keeps white. p4 and p2 both had black; p4 comes first.
        assert_eq!(
            pairings.iter().map(ids).collect::<Vec<_>>(),
            vec![game("p1", "p3"), game("p4", "p2")]
        );
    }

    #[test]
    fn test_group_pairing_skips_previous_opponent() {
        let players = four_players();
        let history = vec![round(
            1,
            vec![
                Pairing::new(1, "p2".into(), "p1".into()).with_outcome(Outcome::Draw),
                Pairing::new(2, "p4".into(), "p3".into()).with_outcome(Outcome::Draw),
            ],
        )];

        let pairings = generate_pairings(&players, &history, 2);

        // All on 0.5: p1 and p2 have met, so p1 meets p3 (both black last
        // round, p1 earlier keeps white) and p2 meets p4 (both white).
        assert_eq!(
            pairings.iter().map(ids).collect::<Vec<_>>(),
            vec![game("p1", "p3"), game("p2", "p4")]
        );
    }

    #[test]
    fn test_balance_beats_order_when_colors_differ() {
        let players = vec![Player::new("a", "A", 2000), Player::new("c", "C", 1000)];
        let history = vec![
            round(
                1,
                vec![Pairing::new(1, "a".into(), "x".into()).with_outcome(Outcome::Draw)],
            ),
            round(
                2,
                vec![Pairing::new(1, "y".into(), "c".into()).with_outcome(Outcome::Draw)],
            ),
        ];

        let pairings = generate_pairings(&players, &history, 3);
        assert_eq!(ids(&pairings[0]), game("c", "a"));
    }

    #[test]
    fn test_equal_balance_alternates_from_last_black() {
        let players = vec![Player::new("a", "A", 2000), Player::new("c", "C", 1000)];
        let history = vec![
            round(
                1,
                vec![
                    Pairing::new(1, "x".into(), "a".into()).with_outcome(Outcome::Draw),
                    Pairing::new(2, "c".into(), "y".into()).with_outcome(Outcome::Draw),
                ],
            ),
            round(
                2,
                vec![
                    Pairing::new(1, "a".into(), "z".into()).with_outcome(Outcome::Draw),
                    Pairing::new(2, "w".into(), "c".into()).with_outcome(Outcome::Draw),
                ],
            ),
        ];

        // Both balanced at zero; c had black most recently.
        let pairings = generate_pairings(&players, &history, 3);
        assert_eq!(ids(&pairings[0]), game("c", "a"));
    }

    #[test]
    fn test_odd_count_gives_lowest_player_explicit_bye() {
        let mut players = four_players();
        players.push(Player::new("p5", "P5", 1400));

        let pairings = generate_pairings(&players, &[], 1);

        assert_eq!(pairings.len(), 3);
        let bye = pairings.last().unwrap();
        assert!(bye.is_bye());
        assert_eq!(bye.white, PlayerId::from("p5"));
        assert_eq!(bye.board, 3);
        assert_eq!(bye.outcome, Outcome::WhiteWins);
        assert_eq!(pairings.iter().filter(|p| p.is_bye()).count(), 1);
    }

    #[test]
    fn test_bye_skips_player_who_already_had_one() {
        let mut players = four_players();
        players.push(Player::new("p5", "P5", 1400));
        let history = vec![round(
            1,
            vec![
                Pairing::new(1, "p1".into(), "p2".into()).with_outcome(Outcome::Draw),
                Pairing::new(2, "p3".into(), "p4".into()).with_outcome(Outcome::Draw),
                Pairing::bye(3, "p5".into()),
            ],
        )];

        let pairings = generate_pairings(&players, &history, 2);

        // p5 leads alone and already had the bye, so it goes to p4 and p5
        // floats down to the leftover p2.
        assert_eq!(
            pairings.iter().map(ids).collect::<Vec<_>>(),
            vec![
                game("p1", "p3"),
                game("p2", "p5"),
                (String::from("p4"), None),
            ]
        );
    }

    #[test]
    fn test_byes_rotate_through_odd_field() {
        for count in [3u32, 5] {
            let players: Vec<Player> = (0..count)
                .map(|i| Player::new(format!("p{}", i), format!("P{}", i), 2000 - i * 50))
                .collect();
            let history = simulate(&players, count);

            let mut receivers = HashSet::new();
            for round in &history {
                let bye = round.pairings.iter().find(|p| p.is_bye()).unwrap();
                assert!(
                    receivers.insert(bye.white.clone()),
                    "{} got a second bye in round {}",
                    bye.white,
                    round.number
                );
            }
            assert_eq!(receivers.len(), count as usize);
        }
    }

    #[test]
    fn test_bye_repeats_when_everyone_had_one() {
        let players = vec![
            Player::new("a", "A", 2000),
            Player::new("b", "B", 1900),
            Player::new("c", "C", 1800),
        ];
        let history = vec![
            round(1, vec![Pairing::bye(1, "a".into())]),
            round(2, vec![Pairing::bye(1, "b".into())]),
            round(3, vec![Pairing::bye(1, "c".into())]),
        ];

        let pairings = generate_pairings(&players, &history, 4);

        assert_eq!(pairings.len(), 2);
        assert_eq!(pairings[1].white, PlayerId::from("c"));
        assert!(pairings[1].is_bye());
    }

    #[test]
    fn test_pairs_last_fresh_opponent_in_group() {
        let players = vec![
            Player::new("a", "A", 2000),
            Player::new("b", "B", 1900),
            Player::new("c", "C", 1800),
            Player::new("d", "D", 1700),
        ];
        // a has met b and c; everyone on the same score.
        let history = vec![
            round(
                1,
                vec![
                    Pairing::new(1, "a".into(), "b".into()).with_outcome(Outcome::Draw),
                    Pairing::new(2, "c".into(), "d".into()).with_outcome(Outcome::Draw),
                ],
            ),
            round(
                2,
                vec![
                    Pairing::new(1, "c".into(), "a".into()).with_outcome(Outcome::Draw),
                    Pairing::new(2, "d".into(), "b".into()).with_outcome(Outcome::Draw),
                ],
            ),
        ];

        let pairings = generate_pairings(&players, &history, 3);

        let a_game = pairings.iter().find(|p| p.involves(&"a".into())).unwrap();
        assert_eq!(a_game.opponent_of(&"a".into()), Some(&PlayerId::from("d")));
        assert_no_duplicates(&pairings);
    }

    #[test]
    fn test_rematch_allowed_when_unavoidable() {
        let players = vec![Player::new("a", "A", 1500), Player::new("b", "B", 1400)];
        let history = vec![round(
            1,
            vec![Pairing::new(1, "a".into(), "b".into()).with_outcome(Outcome::WhiteWins)],
        )];

        let pairings = generate_pairings(&players, &history, 2);

        assert_eq!(pairings.len(), 1);
        assert_eq!(ids(&pairings[0]), game("b", "a"));
    }

    #[test]
    fn test_pool_prefers_fresh_opponent_across_groups() {
        let players = vec![
            Player::new("a", "A", 2000),
            Player::new("b", "B", 1900),
            Player::new("c", "C", 1800),
            Player::new("d", "D", 1700),
        ];
        // a alone on 1.0 and has met d; b and c drew and stay apart.
        let history = vec![round(
            1,
            vec![
                Pairing::new(1, "a".into(), "d".into()).with_outcome(Outcome::WhiteWins),
                Pairing::new(2, "b".into(), "c".into()).with_outcome(Outcome::Draw),
            ],
        )];

        let pairings = generate_pairings(&players, &history, 2);

        // Pool order: a, b, c, d.
        assert_eq!(
            pairings.iter().map(ids).collect::<Vec<_>>(),
            vec![game("a", "b"), game("c", "d")]
        );
    }

    #[test]
    fn test_deterministic_output() {
        let players: Vec<Player> = (0..9)
            .map(|i| Player::new(format!("p{}", i), format!("P{}", i), 1500 + (i % 3) * 100))
            .collect();
        let history = simulate(&players, 3);

        let first = generate_pairings(&players, &history, 4);
        let second = generate_pairings(&players, &history, 4);
        assert_eq!(first, second);
    }

    #[test]
    fn test_simulated_event_invariants() {
        for count in [6u32, 7, 10, 11] {
            let players: Vec<Player> = (0..count)
                .map(|i| Player::new(format!("p{}", i), format!("P{}", i), 2000 - i * 25))
                .collect();
            let history = simulate(&players, 5);

            for round in &history {
                assert_no_duplicates(&round.pairings);
                let seated: usize = round.pairings.iter().map(|p| p.players().count()).sum();
                assert_eq!(seated, count as usize);
                let byes = round.pairings.iter().filter(|p| p.is_bye()).count();
                assert_eq!(byes, (count % 2) as usize);
            }
        }
    }

    #[test]
    fn test_round_number_does_not_change_pairing() {
        let players = four_players();
        assert_eq!(
            generate_pairings(&players, &[], 1),
            generate_pairings(&players, &[], 9)
        );
    }
}
