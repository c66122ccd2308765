//! Strictly legal move generation.
//!
//! [`refresh`] resolves checks and pins for a node; [`enumerate`] and
//! [`enumerate_king`] then emit only legal moves through a [`MoveVisitor`],
//! and [`count`] tallies them with popcounts alone.

mod kings;
mod knights;
mod pawns;
mod refresh;
mod sliders;

pub use refresh::{refresh, NodeMasks};

pub(crate) use pawns::pawn_attack_set;

use super::{Bitboard, CastleSide, Move, MoveKind, Piece, Position, Square};

/// Receiver for generated moves, one method per move category.
///
/// Every method defaults to building a [`Move`] and handing it to
/// [`MoveVisitor::on_move`], so a visitor that only wants a flat stream of
/// moves implements that single method.
pub trait MoveVisitor {
    fn on_move(&mut self, mv: Move);

    fn king_move(&mut self, from: Square, to: Square) {
        self.on_move(Move::new(MoveKind::King, from, to));
    }

    /// `from`/`to` are the king's squares.
    fn castle(&mut self, side: CastleSide, from: Square, to: Square) {
        self.on_move(Move::new(MoveKind::Castle(side), from, to));
    }

    fn pawn_move(&mut self, from: Square, to: Square) {
        self.on_move(Move::new(MoveKind::PawnMove, from, to));
    }

    fn pawn_capture(&mut self, from: Square, to: Square) {
        self.on_move(Move::new(MoveKind::PawnCapture, from, to));
    }

    fn pawn_push(&mut self, from: Square, to: Square) {
        self.on_move(Move::new(MoveKind::PawnPush, from, to));
    }

    /// `to` is the landing square, not the captured pawn.
    fn en_passant(&mut self, from: Square, to: Square) {
        self.on_move(Move::new(MoveKind::EnPassant, from, to));
    }

    fn promotion(&mut self, from: Square, to: Square, piece: Piece) {
        self.on_move(Move::promote(from, to, piece));
    }

    fn knight_move(&mut self, from: Square, to: Square) {
        self.on_move(Move::new(MoveKind::Knight, from, to));
    }

    fn bishop_move(&mut self, from: Square, to: Square) {
        self.on_move(Move::new(MoveKind::Bishop, from, to));
    }

    fn rook_move(&mut self, from: Square, to: Square) {
        self.on_move(Move::new(MoveKind::Rook, from, to));
    }

    fn queen_move(&mut self, from: Square, to: Square) {
        self.on_move(Move::new(MoveKind::Queen, from, to));
    }
}

/// Visitor that keeps every move in emission order.
#[derive(Clone, Debug, Default)]
pub struct MoveCollector {
    pub moves: Vec<Move>,
}

impl MoveVisitor for MoveCollector {
    #[inline]
    fn on_move(&mut self, mv: Move) {
        self.moves.push(mv);
    }
}

/// Emit every legal move except plain king steps: pawns, knights, bishops,
/// rooks, queens, then castles. Nothing is emitted in double check.
pub fn enumerate<V: MoveVisitor>(pos: &Position, masks: &NodeMasks, visitor: &mut V) {
    if masks.in_double_check() {
        return;
    }
    let us = pos.status.side_to_move;
    let movable = pos.board.enemy_or_empty(us) & masks.checkmask;

    pawns::PawnSets::new(pos, masks).emit(visitor);

    knights::for_each_knight(pos, masks, movable, |from, targets| {
        for to in targets {
            visitor.knight_move(from, to);
        }
    });
    sliders::for_each_slider(pos, masks, Piece::Bishop, movable, |from, targets| {
        for to in targets {
            visitor.bishop_move(from, to);
        }
    });
    sliders::for_each_slider(pos, masks, Piece::Rook, movable, |from, targets| {
        for to in targets {
            visitor.rook_move(from, to);
        }
    });
    sliders::for_each_slider(pos, masks, Piece::Queen, movable, |from, targets| {
        for to in targets {
            visitor.queen_move(from, to);
        }
    });

    kings::emit_castles(pos, masks, visitor);
}

/// Emit the king's plain steps.
pub fn enumerate_king<V: MoveVisitor>(pos: &Position, masks: &NodeMasks, visitor: &mut V) {
    kings::emit_king_steps(pos, masks, visitor);
}

/// Number of legal moves at the node, without building any of them.
#[must_use]
pub fn count(pos: &Position, masks: &NodeMasks) -> u64 {
    let kings = u64::from(masks.king_moves.popcount());
    if masks.in_double_check() {
        return kings;
    }
    let us = pos.status.side_to_move;
    let movable = pos.board.enemy_or_empty(us) & masks.checkmask;

    let mut total = kings + pawns::PawnSets::new(pos, masks).count();
    let mut add = |_: Square, targets: Bitboard| total += u64::from(targets.popcount());
    knights::for_each_knight(pos, masks, movable, &mut add);
    for piece in [Piece::Bishop, Piece::Rook, Piece::Queen] {
        sliders::for_each_slider(pos, masks, piece, movable, &mut add);
    }
    total + kings::castles(pos, masks).iter().flatten().count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legal(fen: &str) -> (Vec<Move>, u64) {
        let pos = Position::from_fen(fen);
        let masks = NodeMasks::compute(&pos);
        let mut collector = MoveCollector::default();
        enumerate(&pos, &masks, &mut collector);
        enumerate_king(&pos, &masks, &mut collector);
        (collector.moves, count(&pos, &masks))
    }

    #[test]
    fn test_startpos_twenty() {
        let (moves, n) = legal("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(moves.len(), 20);
        assert_eq!(n, 20);
    }

    #[test]
    fn test_double_check_only_king_moves() {
        let (moves, n) = legal("4r2k/8/8/8/1b6/6N1/8/4K3 w - - 0 1");
        assert!(moves.iter().all(|m| m.kind == MoveKind::King));
        assert_eq!(moves.len() as u64, n);
    }

    #[test]
    fn test_pinned_knight_is_frozen() {
        let (moves, _) = legal("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(moves.iter().all(|m| m.kind != MoveKind::Knight));
    }

    #[test]
    fn test_pinned_rook_slides_along_pin() {
        let (moves, n) = legal("4r2k/8/8/8/8/8/4R3/4K3 w - - 0 1");
        let rook: Vec<&Move> = moves.iter().filter(|m| m.kind == MoveKind::Rook).collect();
        // e3..e8, capture included
        assert_eq!(rook.len(), 6);
        assert!(rook.iter().all(|m| m.to.file() == 4));
        assert_eq!(moves.len() as u64, n);
    }

    #[test]
    fn test_single_check_must_block_or_capture() {
        // Rook e8 checks; the d1 bishop blocks on e2, the b5 rook on e5
        let (moves, n) = legal("4r2k/8/8/1R6/8/8/8/3BK3 w - - 0 1");
        let non_king: Vec<&Move> = moves.iter().filter(|m| !m.is_king_step()).collect();
        assert_eq!(non_king.len(), 2);
        assert!(non_king.iter().any(|m| m.kind == MoveKind::Bishop && m.to.to_string() == "e2"));
        assert!(non_king.iter().any(|m| m.kind == MoveKind::Rook && m.to.to_string() == "e5"));
        assert_eq!(moves.len() as u64, n);
    }
}
