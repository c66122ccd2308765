use super::super::attack_tables::knight_attacks;
use super::super::{Bitboard, Piece, Position, Square};
use super::NodeMasks;

/// Call `f` with each knight that can move and its legal targets.
/// A pinned knight never moves, whatever the axis.
#[inline]
pub(crate) fn for_each_knight(
    pos: &Position,
    masks: &NodeMasks,
    movable: Bitboard,
    mut f: impl FnMut(Square, Bitboard),
) {
    let knights =
        pos.board.pieces(pos.status.side_to_move, Piece::Knight) & !(masks.pin_hv | masks.pin_d12);
    for from in knights {
        let targets = knight_attacks(from) & movable;
        if targets.is_nonempty() {
            f(from, targets);
        }
    }
}
