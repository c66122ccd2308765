use super::super::attack_tables::{bishop_attacks, queen_attacks, rook_attacks};
use super::super::{Bitboard, Piece, Position, Square};
use super::NodeMasks;

/// Call `f` with each slider of `piece` type that can move and its legal
/// targets. Pinned sliders keep only the part of their attacks on their own
/// pin ray; a slider pinned across its movement axis does not move at all.
pub(crate) fn for_each_slider(
    pos: &Position,
    masks: &NodeMasks,
    piece: Piece,
    movable: Bitboard,
    mut f: impl FnMut(Square, Bitboard),
) {
    let occ = pos.board.occupied();
    let pieces = pos.board.pieces(pos.status.side_to_move, piece);
    let pin_hv = masks.pin_hv;
    let pin_d12 = masks.pin_d12;

    let mut emit = |from: Square, targets: Bitboard| {
        if targets.is_nonempty() {
            f(from, targets);
        }
    };

    match piece {
        Piece::Bishop => {
            let bishops = pieces & !pin_hv;
            for from in bishops & pin_d12 {
                emit(from, bishop_attacks(from, occ) & movable & pin_d12);
            }
            for from in bishops & !pin_d12 {
                emit(from, bishop_attacks(from, occ) & movable);
            }
        }
        Piece::Rook => {
            let rooks = pieces & !pin_d12;
            for from in rooks & pin_hv {
                emit(from, rook_attacks(from, occ) & movable & pin_hv);
            }
            for from in rooks & !pin_hv {
                emit(from, rook_attacks(from, occ) & movable);
            }
        }
        Piece::Queen => {
            for from in pieces & pin_d12 {
                emit(from, bishop_attacks(from, occ) & movable & pin_d12);
            }
            for from in pieces & pin_hv {
                emit(from, rook_attacks(from, occ) & movable & pin_hv);
            }
            for from in pieces & !(pin_hv | pin_d12) {
                emit(from, queen_attacks(from, occ) & movable);
            }
        }
        _ => {}
    }
}
