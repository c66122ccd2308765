//! Pawn moves as whole-board shifts, pins and checks pruned inline.
//!
//! "Left" captures head toward the a-file and "right" toward the h-file,
//! for both colors.

use super::super::{Bitboard, Color, Piece, Position, PROMOTION_PIECES};
use super::{MoveVisitor, NodeMasks};

const NOT_FILE_A: u64 = !Bitboard::FILE_A.0;
const NOT_FILE_H: u64 = !Bitboard::FILE_H.0;

#[inline]
const fn forward(color: Color, b: Bitboard) -> Bitboard {
    match color {
        Color::White => Bitboard(b.0 << 8),
        Color::Black => Bitboard(b.0 >> 8),
    }
}

#[inline]
const fn backward(color: Color, b: Bitboard) -> Bitboard {
    match color {
        Color::White => Bitboard(b.0 >> 8),
        Color::Black => Bitboard(b.0 << 8),
    }
}

#[inline]
const fn backward2(color: Color, b: Bitboard) -> Bitboard {
    match color {
        Color::White => Bitboard(b.0 >> 16),
        Color::Black => Bitboard(b.0 << 16),
    }
}

#[inline]
const fn attack_left(color: Color, b: Bitboard) -> Bitboard {
    match color {
        Color::White => Bitboard((b.0 & NOT_FILE_A) << 7),
        Color::Black => Bitboard((b.0 & NOT_FILE_A) >> 9),
    }
}

#[inline]
const fn attack_right(color: Color, b: Bitboard) -> Bitboard {
    match color {
        Color::White => Bitboard((b.0 & NOT_FILE_H) << 9),
        Color::Black => Bitboard((b.0 & NOT_FILE_H) >> 7),
    }
}

/// Pawns that would capture left onto `targets`.
#[inline]
const fn invert_left(color: Color, targets: Bitboard) -> Bitboard {
    match color {
        Color::White => Bitboard((targets.0 & NOT_FILE_H) >> 7),
        Color::Black => Bitboard((targets.0 & NOT_FILE_H) << 9),
    }
}

/// Pawns that would capture right onto `targets`.
#[inline]
const fn invert_right(color: Color, targets: Bitboard) -> Bitboard {
    match color {
        Color::White => Bitboard((targets.0 & NOT_FILE_A) >> 9),
        Color::Black => Bitboard((targets.0 & NOT_FILE_A) << 7),
    }
}

#[inline]
const fn start_rank(color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard::RANK_2,
        Color::Black => Bitboard::RANK_7,
    }
}

/// Rank a pawn promotes from.
#[inline]
const fn promotion_rank(color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard::RANK_7,
        Color::Black => Bitboard::RANK_2,
    }
}

/// Every square attacked by `color`'s `pawns`.
#[inline]
pub(crate) fn pawn_attack_set(color: Color, pawns: Bitboard) -> Bitboard {
    attack_left(color, pawns) | attack_right(color, pawns)
}

/// Legal pawn origins per move shape, computed once per node.
pub(crate) struct PawnSets {
    color: Color,
    left: Bitboard,
    right: Bitboard,
    step: Bitboard,
    push: Bitboard,
    ep_left: Bitboard,
    ep_right: Bitboard,
}

impl PawnSets {
    pub(crate) fn new(pos: &Position, masks: &NodeMasks) -> Self {
        let us = pos.status.side_to_move;
        let board = &pos.board;
        let checkmask = masks.checkmask;
        let pin_hv = masks.pin_hv;
        let pin_d12 = masks.pin_d12;
        let enemy = board.occupied_by(us.opponent());
        let empty = !board.occupied();

        let pawns = board.pieces(us, Piece::Pawn);
        // Rank/file-pinned pawns never capture, diagonal-pinned pawns never step
        let pawns_lr = pawns & !pin_hv;
        let pawns_hv = pawns & !pin_d12;

        let mut left = pawns_lr & invert_left(us, enemy & checkmask);
        let mut right = pawns_lr & invert_right(us, enemy & checkmask);
        let mut step = pawns_hv & backward(us, empty);
        let mut push = step & start_rank(us) & backward2(us, empty & checkmask);
        step &= backward(us, checkmask);

        // A pinned pawn may only move along its own pin ray
        left = (left & invert_left(us, pin_d12)) | (left & !pin_d12);
        right = (right & invert_right(us, pin_d12)) | (right & !pin_d12);
        step = (step & backward(us, pin_hv)) | (step & !pin_hv);
        push = (push & backward2(us, pin_hv)) | (push & !pin_hv);

        let mut ep_left = Bitboard::EMPTY;
        let mut ep_right = Bitboard::EMPTY;
        let ep = masks.ep_target;
        if ep.is_nonempty() {
            let landing = forward(us, ep);
            // Taking resolves a check if it removes the checker or blocks on the landing square
            if ((ep | landing) & checkmask).is_nonempty() {
                ep_left = pawns_lr & invert_left(us, landing);
                ep_right = pawns_lr & invert_right(us, landing);
                ep_left = (ep_left & invert_left(us, pin_d12)) | (ep_left & !pin_d12);
                ep_right = (ep_right & invert_right(us, pin_d12)) | (ep_right & !pin_d12);
            }
        }

        PawnSets {
            color: us,
            left,
            right,
            step,
            push,
            ep_left,
            ep_right,
        }
    }

    pub(crate) fn count(&self) -> u64 {
        let promo = promotion_rank(self.color);
        let promoting = (self.left & promo).popcount()
            + (self.right & promo).popcount()
            + (self.step & promo).popcount();
        let plain = (self.left & !promo).popcount()
            + (self.right & !promo).popcount()
            + (self.step & !promo).popcount()
            + self.push.popcount()
            + self.ep_left.popcount()
            + self.ep_right.popcount();
        u64::from(plain) + 4 * u64::from(promoting)
    }

    pub(crate) fn emit<V: MoveVisitor>(&self, visitor: &mut V) {
        let us = self.color;
        let promo = promotion_rank(us);

        let to_left = |from| attack_left(us, Bitboard::from_square(from)).lsb();
        let to_right = |from| attack_right(us, Bitboard::from_square(from)).lsb();
        let to_step = |from| forward(us, Bitboard::from_square(from)).lsb();

        for from in self.left & promo {
            for piece in PROMOTION_PIECES {
                visitor.promotion(from, to_left(from), piece);
            }
        }
        for from in self.right & promo {
            for piece in PROMOTION_PIECES {
                visitor.promotion(from, to_right(from), piece);
            }
        }
        for from in self.step & promo {
            for piece in PROMOTION_PIECES {
                visitor.promotion(from, to_step(from), piece);
            }
        }

        for from in self.left & !promo {
            visitor.pawn_capture(from, to_left(from));
        }
        for from in self.right & !promo {
            visitor.pawn_capture(from, to_right(from));
        }
        for from in self.step & !promo {
            visitor.pawn_move(from, to_step(from));
        }
        for from in self.push {
            visitor.pawn_push(from, to_step(to_step(from)));
        }

        for from in self.ep_left {
            visitor.en_passant(from, to_left(from));
        }
        for from in self.ep_right {
            visitor.en_passant(from, to_right(from));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Move, MoveCollector, MoveKind, Square};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn pawn_moves(fen: &str) -> Vec<Move> {
        let pos = Position::from_fen(fen);
        let masks = NodeMasks::compute(&pos);
        let mut collector = MoveCollector::default();
        PawnSets::new(&pos, &masks).emit(&mut collector);
        collector.moves
    }

    #[test]
    fn test_shifts_do_not_wrap() {
        let a2 = Bitboard::from_square(sq("a2"));
        assert!(attack_left(Color::White, a2).is_empty());
        let h7 = Bitboard::from_square(sq("h7"));
        assert!(attack_left(Color::Black, h7).contains(sq("g6")));
        assert!(attack_right(Color::Black, h7).is_empty());
        assert_eq!(invert_left(Color::White, Bitboard::from_square(sq("a3"))), Bitboard::from_square(sq("b2")));
        assert_eq!(invert_right(Color::Black, Bitboard::from_square(sq("h3"))), Bitboard::from_square(sq("g4")));
    }

    #[test]
    fn test_startpos_pawns() {
        let moves = pawn_moves("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(moves.len(), 16);
        assert_eq!(
            moves.iter().filter(|m| m.kind == MoveKind::PawnPush).count(),
            8
        );
    }

    #[test]
    fn test_promotion_order_and_count() {
        let moves = pawn_moves("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let promos: Vec<Piece> = moves.iter().filter_map(|m| m.promotion).collect();
        assert_eq!(
            promos,
            vec![
                Piece::Queen,
                Piece::Knight,
                Piece::Bishop,
                Piece::Rook,
                Piece::Queen,
                Piece::Knight,
                Piece::Bishop,
                Piece::Rook
            ]
        );
        let pos = Position::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let masks = NodeMasks::compute(&pos);
        assert_eq!(PawnSets::new(&pos, &masks).count(), 8);
    }

    #[test]
    fn test_file_pinned_pawn_steps_but_never_captures() {
        // e2 pawn pinned by the e8 rook; d3 holds a capturable bishop
        let moves = pawn_moves("4r2k/8/8/8/8/3b4/4P3/4K3 w - - 0 1");
        assert!(moves.iter().all(|m| m.kind != MoveKind::PawnCapture));
        assert!(moves.iter().any(|m| m.to == sq("e4")));
    }

    #[test]
    fn test_diagonal_pinned_pawn_takes_pinner_only() {
        // d2 pawn pinned by the c3 bishop; the e3 knight is off the ray
        let moves = pawn_moves("7k/8/8/8/8/2b1n3/3P4/4K3 w - - 0 1");
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to, sq("c3"));
    }

    #[test]
    fn test_en_passant_blocks_or_captures_checker() {
        // Black just played d7-d5 giving check to the e4 king; exd6 removes it
        let moves = pawn_moves("7k/8/8/3pP3/4K3/8/8/8 w - d6 0 1");
        assert!(moves
            .iter()
            .any(|m| m.kind == MoveKind::EnPassant && m.to == sq("d6")));
    }
}
