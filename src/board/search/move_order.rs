//! Static move ordering: most valuable victim, least valuable attacker.

use super::super::{Move, MoveKind, Position};

/// Row for a move that captures nothing.
const NO_VICTIM: usize = 6;

/// Score of any promotion, above every capture.
pub(crate) const PROMOTION_SCORE: u8 = 100;

/// `MVV_LVA[victim][attacker]`, indexed by `Piece::index()` with 6 meaning
/// "no piece". Quiet moves still rank pawns ahead of queens.
pub(crate) const MVV_LVA: [[u8; 7]; 7] = [
    [15, 14, 13, 12, 11, 10, 0], // pawn
    [25, 24, 23, 22, 21, 20, 0], // knight
    [35, 34, 33, 32, 31, 30, 0], // bishop
    [45, 44, 43, 42, 41, 40, 0], // rook
    [55, 54, 53, 52, 51, 50, 0], // queen
    [0, 0, 0, 0, 0, 0, 0],       // king
    [1, 2, 3, 4, 5, 0, 0],       // empty square
];

/// Ordering score of `mv` in `pos`; higher is searched first.
#[inline]
#[must_use]
pub(crate) fn score_move(pos: &Position, mv: &Move) -> u8 {
    if mv.kind == MoveKind::Promotion {
        return PROMOTION_SCORE;
    }
    // En passant lands on an empty square and scores as a quiet pawn move
    let victim = pos
        .board
        .piece_at(mv.to)
        .map_or(NO_VICTIM, |(_, piece)| piece.index());
    MVV_LVA[victim][mv.piece().index()]
}

/// Sort `moves` best first. Equal scores keep generation order.
pub(crate) fn order_moves(pos: &Position, moves: &mut [Move]) {
    moves.sort_by_cached_key(|mv| std::cmp::Reverse(score_move(pos, mv)));
}
