//! Per-node check and pin resolution.

use super::super::attack_tables::{
    bishop_attacks, bishop_line, bishop_xray, knight_attacks, pin_between, rook_attacks,
    rook_line, rook_xray,
};
use super::super::movestack::Movestack;
use super::super::{Bitboard, Piece, Position, Square};
use super::pawns::pawn_attack_set;

/// Everything the enumerator needs to emit only legal moves at one node.
///
/// Computed once on node entry and consumed by that node alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeMasks {
    /// Legal king steps (castling excluded)
    pub king_moves: Bitboard,
    /// Squares the king may not stand on
    pub kingban: Bitboard,
    /// `ALL` when not in check, the block-or-capture squares in single
    /// check, `EMPTY` in double check
    pub checkmask: Bitboard,
    /// Rays of rook/queen pins, king excluded, pinner included
    pub pin_hv: Bitboard,
    /// Rays of bishop/queen pins
    pub pin_d12: Bitboard,
    /// Capturable en-passant pawn, cleared when taking it would be illegal
    pub ep_target: Bitboard,
}

impl NodeMasks {
    #[inline]
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.checkmask != Bitboard::ALL
    }

    #[inline]
    #[must_use]
    pub fn in_double_check(&self) -> bool {
        self.checkmask.is_empty()
    }

    /// Masks for a standalone position, outside any search.
    #[must_use]
    pub fn compute(pos: &Position) -> NodeMasks {
        let mut stack = Movestack::new();
        stack.init(pos, 1);
        refresh(pos, &mut stack, 1)
    }
}

/// Resolve checks and pins for the side to move at `depth`.
///
/// Reads the slots the parent prepared at `depth` and resets the child's
/// check slot at `depth - 1`.
pub fn refresh(pos: &Position, stack: &mut Movestack, depth: usize) -> NodeMasks {
    let board = &pos.board;
    let us = pos.status.side_to_move;
    let them = us.opponent();
    let king = board.king_square(us);
    let occ = board.occupied();
    let own = board.occupied_by(us);

    let mut checkmask = stack.check_status(depth);
    let mut kingban = stack.enemy_king_attacks(depth);
    stack.begin_node(depth, kingban);

    let mut pin_hv = Bitboard::EMPTY;
    let mut pin_d12 = Bitboard::EMPTY;
    let mut ep_target = if pos.status.has_ep_pawn {
        pos.ep_target
    } else {
        Bitboard::EMPTY
    };

    let enemy_rq = board.rooks_queens(them);
    if (rook_line(king) & enemy_rq).is_nonempty() {
        for attacker in rook_attacks(king, occ) & enemy_rq {
            check_by_slider(king, attacker, &mut checkmask);
        }
        for pinner in rook_xray(king, occ) & enemy_rq {
            let pin = pin_between(king, pinner);
            if (pin & own).is_nonempty() {
                pin_hv |= pin;
            }
        }
    }

    let enemy_bq = board.bishops_queens(them);
    if (bishop_line(king) & enemy_bq).is_nonempty() {
        for attacker in bishop_attacks(king, occ) & enemy_bq {
            check_by_slider(king, attacker, &mut checkmask);
        }
        for pinner in bishop_xray(king, occ) & enemy_bq {
            let pin = pin_between(king, pinner);
            // The en-passant pawn shields the king on this diagonal
            if (pin & ep_target).is_nonempty() {
                ep_target = Bitboard::EMPTY;
            }
            if (pin & own).is_nonempty() {
                pin_d12 |= pin;
            }
        }
    }

    if ep_target.is_nonempty() {
        ep_target = clear_rank_pinned_ep(pos, king, enemy_rq, ep_target);
    }

    // Enemy attacks with our king lifted off the board, so a slider's ray
    // continues behind it.
    let occ_without_king = occ ^ Bitboard::from_square(king);
    for sq in board.pieces(them, Piece::Knight) {
        kingban |= knight_attacks(sq);
    }
    kingban |= pawn_attack_set(them, board.pieces(them, Piece::Pawn));
    for sq in enemy_bq {
        kingban |= bishop_attacks(sq, occ_without_king);
    }
    for sq in enemy_rq {
        kingban |= rook_attacks(sq, occ_without_king);
    }

    let king_moves = stack.own_king_attacks(depth) & board.enemy_or_empty(us) & !kingban;

    NodeMasks {
        king_moves,
        kingban,
        checkmask,
        pin_hv,
        pin_d12,
        ep_target,
    }
}

#[inline]
fn check_by_slider(king: Square, attacker: Square, checkmask: &mut Bitboard) {
    *checkmask = if *checkmask == Bitboard::ALL {
        pin_between(king, attacker)
    } else {
        Bitboard::EMPTY
    };
}

/// King, enemy rook or queen and the two pawns on one rank: taking en passant
/// would lift both pawns and open the rank.
fn clear_rank_pinned_ep(
    pos: &Position,
    king: Square,
    enemy_rq: Bitboard,
    ep_target: Bitboard,
) -> Bitboard {
    let us = pos.status.side_to_move;
    let ep_rank = if pos.status.is_white() {
        Bitboard::RANK_5
    } else {
        Bitboard::RANK_4
    };
    let pawns = pos.board.pieces(us, Piece::Pawn);
    if !ep_rank.contains(king) || (ep_rank & enemy_rq).is_empty() || (ep_rank & pawns).is_empty()
    {
        return ep_target;
    }

    let capturers = pawns & (ep_target.shift_east() | ep_target.shift_west());
    for pawn in capturers {
        let after = pos.board.occupied() & !(ep_target | Bitboard::from_square(pawn));
        if (rook_attacks(king, after) & ep_rank & enemy_rq).is_nonempty() {
            return Bitboard::EMPTY;
        }
    }
    ep_target
}
