//! Zobrist hashing for chess positions.
//!
//! Provides a full-recomputation 64-bit position hash used as the evaluation
//! cache key and for repetition checks. Keys come from a fixed seed so hashes
//! are identical across runs.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{Color, Piece, Position};

pub(crate) struct ZobristKeys {
    // piece_keys[color * 6 + piece][square]
    pub(crate) piece_keys: [[u64; 64]; 12],
    pub(crate) black_to_move_key: u64,
    // castling_keys[rights mask], one key per combination of the four rights
    pub(crate) castling_keys: [u64; 16],
    // en_passant_keys[file of the pawn that just double-pushed]
    pub(crate) en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(1234567890_u64); // Use a fixed seed for reproducibility
        let mut piece_keys = [[0; 64]; 12];
        let mut castling_keys = [0; 16];
        let mut en_passant_keys = [0; 8];

        for piece in &mut piece_keys {
            for key in piece.iter_mut() {
                *key = rng.gen();
            }
        }

        let black_to_move_key = rng.gen();

        for key in &mut castling_keys {
            *key = rng.gen();
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }
}

// Initialize Zobrist keys lazily and globally
pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[inline]
fn piece_to_zobrist_index(color: Color, piece: Piece) -> usize {
    color.index() * 6 + piece.index()
}

/// Hash of board, side to move, castling rights and en-passant file.
#[must_use]
pub fn hash(pos: &Position) -> u64 {
    let keys = &*ZOBRIST;
    let mut h = 0u64;

    for color in Color::BOTH {
        for piece in Piece::ALL {
            let row = &keys.piece_keys[piece_to_zobrist_index(color, piece)];
            for sq in pos.board.pieces(color, piece) {
                h ^= row[sq.as_usize()];
            }
        }
    }

    if !pos.status.is_white() {
        h ^= keys.black_to_move_key;
    }
    h ^= keys.castling_keys[usize::from(pos.status.castling.as_u8())];
    if pos.status.has_ep_pawn && pos.ep_target.is_nonempty() {
        h ^= keys.en_passant_keys[usize::from(pos.ep_target.lsb().file())];
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let pos = Position::startpos();
        assert_eq!(hash(&pos), hash(&pos));
        assert_eq!(hash(&pos), hash(&Position::from_fen(&pos.to_fen())));
    }

    #[test]
    fn test_transposition_hashes_equal() {
        let start = Position::startpos();
        let play = |pos: Position, uci: &str| pos.play(&pos.parse_move(uci).unwrap());
        let a = play(play(play(play(start, "g1f3"), "g8f6"), "b1c3"), "b8c6");
        let b = play(play(play(play(start, "b1c3"), "b8c6"), "g1f3"), "g8f6");
        assert_eq!(a, b);
        assert_eq!(hash(&a), hash(&b));
    }

    #[test]
    fn test_hash_distinguishes_state() {
        let white = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        let black = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b Q - 0 1");
        let no_rights = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        assert_ne!(hash(&white), hash(&black));
        assert_ne!(hash(&white), hash(&no_rights));

        let ep = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let no_ep = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1");
        assert_ne!(hash(&ep), hash(&no_ep));
    }
}
