//! Attack tables for move generation.
//!
//! Uses Hyperbola Quintessence for sliding piece attacks (bishop, rook, queen).
//! Line masks exclude the slider's own square so occupancy may contain it.
//! X-ray variants see through the first blocker and are what the pin
//! resolver uses to find pinners.

#![allow(clippy::needless_range_loop)] // Index loops are clearer for board coordinates
#![allow(clippy::inline_always)] // Performance-critical hot path functions

mod tables;

use once_cell::sync::Lazy;

use super::types::{Bitboard, Color, Square};

use tables::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS, PIN_BETWEEN};

const FILE_A: u64 = 0x0101010101010101;

fn ray_mask(sq: usize, dirs: [(isize, isize); 2]) -> u64 {
    let rank = (sq / 8) as isize;
    let file = (sq % 8) as isize;
    let mut mask = 0u64;
    for (dr, df) in dirs {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Diagonal masks (a1-h8 direction), slider square excluded
static DIAG_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        masks[sq] = ray_mask(sq, [(1, 1), (-1, -1)]);
    }
    masks
});

/// Anti-diagonal masks (h1-a8 direction), slider square excluded
static ANTI_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        masks[sq] = ray_mask(sq, [(1, -1), (-1, 1)]);
    }
    masks
});

/// File masks, slider square excluded
static FILE_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        masks[sq] = (FILE_A << (sq % 8)) & !(1u64 << sq);
    }
    masks
});

/// Rank attack lookup table: `[8 * occupancy_6bit + file]` -> attacks on that rank
/// Only stores attacks for file positions, shifted to rank 0
static RANK_ATTACKS: Lazy<[u64; 512]> = Lazy::new(|| {
    let mut attacks = [0u64; 512];
    for occ_6bit in 0..64 {
        for file in 0..8 {
            let mut attack = 0u64;
            for f in (file + 1)..8 {
                attack |= 1u64 << f;
                // occupancy bits 0-5 stand for files b-g
                if (1..=6).contains(&f) && (occ_6bit & (1 << (f - 1))) != 0 {
                    break;
                }
            }
            for f in (0..file).rev() {
                attack |= 1u64 << f;
                if (1..=6).contains(&f) && (occ_6bit & (1 << (f - 1))) != 0 {
                    break;
                }
            }
            attacks[8 * occ_6bit + file] = attack;
        }
    }
    attacks
});

/// Full rook lines through each square on an empty board
static ROOK_LINES: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut lines = [0u64; 64];
    for sq in 0..64 {
        lines[sq] = FILE_MASKS[sq] | ((0xFFu64 << (sq & 56)) & !(1u64 << sq));
    }
    lines
});

/// Full bishop lines through each square on an empty board
static BISHOP_LINES: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut lines = [0u64; 64];
    for sq in 0..64 {
        lines[sq] = DIAG_MASKS[sq] | ANTI_MASKS[sq];
    }
    lines
});

#[inline(always)]
fn hyp_quint(occupied: u64, mask: u64, square: usize) -> u64 {
    let piece_bit = 1u64 << square;
    let forward = occupied & mask;
    let reverse = forward.swap_bytes();
    let forward = forward.wrapping_sub(piece_bit);
    let reverse = reverse.wrapping_sub(piece_bit.swap_bytes());
    (forward ^ reverse.swap_bytes()) & mask
}

#[inline(always)]
fn rank_attacks(occupied: u64, square: usize) -> u64 {
    let rank = square / 8;
    let file = square % 8;
    let occ_6bit = ((occupied >> (rank * 8 + 1)) & 63) as usize;
    RANK_ATTACKS[8 * occ_6bit + file] << (rank * 8)
}

#[inline]
pub(crate) fn rook_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    let s = sq.as_usize();
    Bitboard(hyp_quint(occ.0, FILE_MASKS[s], s) | rank_attacks(occ.0, s))
}

#[inline]
pub(crate) fn bishop_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    let s = sq.as_usize();
    Bitboard(hyp_quint(occ.0, DIAG_MASKS[s], s) | hyp_quint(occ.0, ANTI_MASKS[s], s))
}

#[inline]
pub(crate) fn queen_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    rook_attacks(sq, occ) | bishop_attacks(sq, occ)
}

/// Squares behind the first blocker on each rook ray, up to and including the
/// second blocker.
#[inline]
pub(crate) fn rook_xray(sq: Square, occ: Bitboard) -> Bitboard {
    let attacks = rook_attacks(sq, occ);
    attacks ^ rook_attacks(sq, occ ^ (attacks & occ))
}

#[inline]
pub(crate) fn bishop_xray(sq: Square, occ: Bitboard) -> Bitboard {
    let attacks = bishop_attacks(sq, occ);
    attacks ^ bishop_attacks(sq, occ ^ (attacks & occ))
}

#[inline]
pub(crate) fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard(KNIGHT_ATTACKS[sq.as_usize()])
}

#[inline]
pub(crate) fn king_attacks(sq: Square) -> Bitboard {
    Bitboard(KING_ATTACKS[sq.as_usize()])
}

/// Squares a `color` pawn on `sq` attacks.
#[inline]
pub(crate) fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    Bitboard(PAWN_ATTACKS[color.index()][sq.as_usize()])
}

#[inline]
pub(crate) fn pin_between(king: Square, slider: Square) -> Bitboard {
    Bitboard(PIN_BETWEEN[king.as_usize()][slider.as_usize()])
}

#[inline]
pub(crate) fn rook_line(sq: Square) -> Bitboard {
    Bitboard(ROOK_LINES[sq.as_usize()])
}

#[inline]
pub(crate) fn bishop_line(sq: Square) -> Bitboard {
    Bitboard(BISHOP_LINES[sq.as_usize()])
}
