use super::super::attack_tables::pin_between;
use super::super::state::castle_squares;
use super::super::{Bitboard, CastleSide, Piece, Position};
use super::{MoveVisitor, NodeMasks};

/// Castles available at this node, kingside first.
pub(crate) fn castles(pos: &Position, masks: &NodeMasks) -> [Option<CastleSide>; 2] {
    let mut out = [None, None];
    if masks.in_check() {
        return out;
    }
    let us = pos.status.side_to_move;
    let occ = pos.board.occupied();
    let rooks = pos.board.pieces(us, Piece::Rook);
    let kings = pos.board.pieces(us, Piece::King);

    for (slot, side) in out.iter_mut().zip([CastleSide::King, CastleSide::Queen]) {
        if !pos.status.can_castle(side) {
            continue;
        }
        let (king_from, king_to, rook_from, _) = castle_squares(us, side);
        if !kings.contains(king_from) || !rooks.contains(rook_from) {
            continue;
        }
        let between = pin_between(king_from, rook_from) & !Bitboard::from_square(rook_from);
        let transit = pin_between(king_from, king_to);
        if (between & occ).is_empty() && (transit & masks.kingban).is_empty() {
            *slot = Some(side);
        }
    }
    out
}

pub(crate) fn emit_castles<V: MoveVisitor>(pos: &Position, masks: &NodeMasks, visitor: &mut V) {
    let us = pos.status.side_to_move;
    for side in castles(pos, masks).into_iter().flatten() {
        let (king_from, king_to, _, _) = castle_squares(us, side);
        visitor.castle(side, king_from, king_to);
    }
}

pub(crate) fn emit_king_steps<V: MoveVisitor>(pos: &Position, masks: &NodeMasks, visitor: &mut V) {
    let from = pos.board.king_square(pos.status.side_to_move);
    for to in masks.king_moves {
        visitor.king_move(from, to);
    }
}
