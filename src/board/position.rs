//! A board, its status and the en-passant target: the unit every other
//! component works on.

use std::fmt;

use super::error::MoveParseError;
use super::movegen::{count, enumerate, enumerate_king, MoveCollector, NodeMasks};
use super::{Bitboard, Board, BoardStatus, Color, Move, MoveKind, Piece, Square};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: Board,
    pub status: BoardStatus,
    /// Square of the pawn that just double-pushed; empty unless
    /// `status.has_ep_pawn`.
    pub ep_target: Bitboard,
}

impl Position {
    #[must_use]
    pub const fn new(board: Board, status: BoardStatus, ep_target: Bitboard) -> Self {
        Position {
            board,
            status,
            ep_target,
        }
    }

    #[must_use]
    pub fn startpos() -> Self {
        Position::new(Board::startpos(), BoardStatus::startpos(), Bitboard::EMPTY)
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.status.side_to_move
    }

    /// Child position after `mv`. `mv` must be legal here.
    #[must_use]
    pub fn play(&self, mv: &Move) -> Position {
        let us = self.status.side_to_move;
        let status = self.status;
        let (from, to) = (mv.from, mv.to);

        let (board, status, ep_target) = match mv.kind {
            MoveKind::King => (
                self.board.with_move(us, Piece::King, from, to),
                status.rook_captured(to).king_move(),
                Bitboard::EMPTY,
            ),
            MoveKind::Castle(side) => (
                self.board.with_castle(us, side),
                status.king_move(),
                Bitboard::EMPTY,
            ),
            MoveKind::PawnMove | MoveKind::PawnCapture => (
                self.board.with_move(us, Piece::Pawn, from, to),
                status.rook_captured(to).silent_move(),
                Bitboard::EMPTY,
            ),
            MoveKind::PawnPush => (
                self.board.with_move(us, Piece::Pawn, from, to),
                status.pawn_push(),
                Bitboard::from_square(to),
            ),
            MoveKind::EnPassant => (
                self.board
                    .with_en_passant(us, from, to, Square::new(from.rank(), to.file())),
                status.silent_move(),
                Bitboard::EMPTY,
            ),
            MoveKind::Promotion => (
                self.board
                    .with_promotion(us, from, to, mv.promotion.unwrap_or(Piece::Queen)),
                status.rook_captured(to).silent_move(),
                Bitboard::EMPTY,
            ),
            MoveKind::Rook => (
                self.board.with_move(us, Piece::Rook, from, to),
                status.rook_captured(to).rook_move(from),
                Bitboard::EMPTY,
            ),
            MoveKind::Knight | MoveKind::Bishop | MoveKind::Queen => (
                self.board.with_move(us, mv.piece(), from, to),
                status.rook_captured(to).silent_move(),
                Bitboard::EMPTY,
            ),
        };
        Position::new(board, status, ep_target)
    }

    #[must_use]
    pub fn in_check(&self) -> bool {
        let us = self.status.side_to_move;
        self.board
            .is_attacked(self.board.king_square(us), us.opponent())
    }

    /// Every legal move: the ordered-list moves first, king steps last.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        self.legal_moves_with(&NodeMasks::compute(self))
    }

    /// Legal moves for masks already refreshed for this position.
    pub(crate) fn legal_moves_with(&self, masks: &NodeMasks) -> Vec<Move> {
        let mut collector = MoveCollector::default();
        enumerate(self, masks, &mut collector);
        enumerate_king(self, masks, &mut collector);
        collector.moves
    }

    #[must_use]
    pub fn legal_move_count(&self) -> u64 {
        count(self, &NodeMasks::compute(self))
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.legal_move_count() == 0 && self.in_check()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        self.legal_move_count() == 0 && !self.in_check()
    }

    /// Find the legal move written in long algebraic form ("e2e4", "e7e8q").
    pub fn parse_move(&self, uci: &str) -> Result<Move, MoveParseError> {
        if uci.len() < 4 || uci.len() > 5 || !uci.is_ascii() {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }
        let invalid_square = || MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        };
        let from: Square = uci[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = uci[2..4].parse().map_err(|_| invalid_square())?;

        let promotion = match uci[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(piece) if !matches!(piece, Piece::Pawn | Piece::King) => Some(piece),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
        };

        self.legal_moves()
            .into_iter()
            .find(|m| m.from == from && m.to == to && m.promotion == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: uci.to_string(),
            })
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = match self.board.piece_at(Square::new(rank, file)) {
                    Some((color, piece)) => piece.to_fen_char(color),
                    None => '.',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  abcdefgh")?;
        write!(f, "{} to move", self.status.side_to_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CastleSide;

    #[test]
    fn test_play_double_push_sets_ep_pawn() {
        let pos = Position::startpos();
        let mv = pos.parse_move("e2e4").unwrap();
        let next = pos.play(&mv);
        assert!(next.status.has_ep_pawn);
        assert_eq!(next.ep_target, Bitboard::from_square("e4".parse().unwrap()));
        assert_eq!(next.side_to_move(), Color::Black);
        // parent unchanged
        assert!(!pos.status.has_ep_pawn);
        let reply = next.play(&next.parse_move("g8f6").unwrap());
        assert!(!reply.status.has_ep_pawn);
        assert!(reply.ep_target.is_empty());
    }

    #[test]
    fn test_en_passant_removes_pawn() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let next = pos.play(&pos.parse_move("e5d6").unwrap());
        assert!(next.board.pieces(Color::Black, Piece::Pawn).is_empty());
        assert_eq!(
            next.board.piece_at("d6".parse().unwrap()),
            Some((Color::White, Piece::Pawn))
        );
    }

    #[test]
    fn test_capturing_corner_rook_drops_right() {
        let pos = Position::from_fen("r3k3/8/8/8/8/8/8/R3K3 w Qq - 0 1");
        let next = pos.play(&pos.parse_move("a1a8").unwrap());
        assert!(!next.status.castling.has(Color::Black, CastleSide::Queen));
        assert!(!next.status.castling.has(Color::White, CastleSide::Queen));
    }

    #[test]
    fn test_castle_moves_rook() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        let next = pos.play(&pos.parse_move("e1g1").unwrap());
        assert_eq!(
            next.board.piece_at("f1".parse().unwrap()),
            Some((Color::White, Piece::Rook))
        );
        assert!(!next.status.castling.any(Color::White));
    }

    #[test]
    fn test_parse_move_errors() {
        let pos = Position::startpos();
        assert!(matches!(
            pos.parse_move("e2"),
            Err(MoveParseError::InvalidLength { .. })
        ));
        assert!(matches!(
            pos.parse_move("z9z9"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
        assert!(matches!(
            pos.parse_move("e2e5"),
            Err(MoveParseError::IllegalMove { .. })
        ));
        let promo = Position::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
        assert!(matches!(
            promo.parse_move("a7a8p"),
            Err(MoveParseError::InvalidPromotion { .. })
        ));
        assert_eq!(promo.parse_move("a7a8q").unwrap().promotion, Some(Piece::Queen));
    }

    #[test]
    fn test_mate_and_stalemate() {
        // Back-rank mate
        let mate = Position::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert!(mate.is_checkmate());
        // Classic king and queen stalemate
        let stale = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(stale.is_stalemate());
    }
}
