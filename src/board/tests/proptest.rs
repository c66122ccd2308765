//! Property-based tests using proptest.

use crate::board::{perft, Position};
use crate::zobrist;
use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng;

/// Strategy to generate a random legal move sequence length
fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=30usize
}

/// Strategy to generate a random seed for move selection
fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Play up to `num_moves` random legal moves from the start position,
/// returning every position reached (the start included).
fn random_walk(seed: u64, num_moves: usize) -> Vec<Position> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos = Position::startpos();
    let mut line = vec![pos];
    for _ in 0..num_moves {
        let moves = pos.legal_moves();
        if moves.is_empty() {
            break;
        }
        pos = pos.play(&moves[rng.gen_range(0..moves.len())]);
        line.push(pos);
    }
    line
}

proptest! {
    /// Property: no generated move leaves the mover's king attacked
    #[test]
    fn prop_legal_moves_are_legal(seed in seed_strategy(), num_moves in move_count_strategy()) {
        for pos in random_walk(seed, num_moves) {
            let us = pos.side_to_move();
            for mv in pos.legal_moves() {
                let child = pos.play(&mv);
                prop_assert!(
                    !child.board.is_attacked(child.board.king_square(us), us.opponent()),
                    "{} leaves the king attacked in {}", mv, pos.to_fen()
                );
            }
        }
    }

    /// Property: counting and enumerating agree
    #[test]
    fn prop_count_matches_enumeration(seed in seed_strategy(), num_moves in move_count_strategy()) {
        for pos in random_walk(seed, num_moves) {
            prop_assert_eq!(pos.legal_moves().len() as u64, pos.legal_move_count(), "{}", pos.to_fen());
        }
    }

    /// Property: FEN round-trip preserves position and hash
    #[test]
    fn prop_fen_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        for pos in random_walk(seed, num_moves) {
            let restored = Position::from_fen(&pos.to_fen());
            prop_assert_eq!(restored, pos);
            prop_assert_eq!(zobrist::hash(&restored), zobrist::hash(&pos));
        }
    }

    /// Property: the incremental movestack agrees with fresh per-child counts
    #[test]
    fn prop_perft_two_matches_children(seed in seed_strategy(), num_moves in 0..20usize) {
        let line = random_walk(seed, num_moves);
        let pos = line[line.len() - 1];
        let expected: u64 = pos
            .legal_moves()
            .iter()
            .map(|mv| pos.play(mv).legal_move_count())
            .sum();
        prop_assert_eq!(perft(&pos, 2), expected, "{}", pos.to_fen());
    }
}
