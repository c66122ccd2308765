//! Side to move, castling rights and the en-passant flag.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{CastleSide, CastlingRights, Color, Square};

/// Small immutable descriptor of everything about a position that is not
/// piece placement. Transitions take the status before the move and return
/// the status after it, with the side to move already flipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardStatus {
    pub side_to_move: Color,
    pub castling: CastlingRights,
    /// An enemy pawn just double-pushed and may be taken en passant
    pub has_ep_pawn: bool,
}

impl BoardStatus {
    #[must_use]
    pub const fn new(side_to_move: Color, castling: CastlingRights, has_ep_pawn: bool) -> Self {
        BoardStatus {
            side_to_move,
            castling,
            has_ep_pawn,
        }
    }

    #[must_use]
    pub const fn startpos() -> Self {
        BoardStatus::new(Color::White, CastlingRights::all(), false)
    }

    #[inline]
    #[must_use]
    pub const fn is_white(self) -> bool {
        matches!(self.side_to_move, Color::White)
    }

    /// Any move that is not a double push, a king move or a rook leaving its corner.
    #[inline]
    #[must_use]
    pub const fn silent_move(self) -> Self {
        BoardStatus::new(self.side_to_move.opponent(), self.castling, false)
    }

    /// Double pawn push: the opponent gets an en-passant chance.
    #[inline]
    #[must_use]
    pub const fn pawn_push(self) -> Self {
        BoardStatus::new(self.side_to_move.opponent(), self.castling, true)
    }

    /// King step or castle: the mover loses both rights.
    #[inline]
    #[must_use]
    pub const fn king_move(self) -> Self {
        BoardStatus::new(
            self.side_to_move.opponent(),
            self.castling.without_color(self.side_to_move),
            false,
        )
    }

    /// Rook move from `from`; leaving a corner drops that side's right.
    #[inline]
    #[must_use]
    pub const fn rook_move(self, from: Square) -> Self {
        self.rook_captured(from).silent_move()
    }

    /// Drop the right tied to the rook that started on `sq`, whoever owns it.
    /// Does not flip the side to move; combine with one of the transitions.
    #[inline]
    #[must_use]
    pub const fn rook_captured(self, sq: Square) -> Self {
        let castling = match sq.index() {
            0 => self.castling.without(Color::White, CastleSide::Queen),
            7 => self.castling.without(Color::White, CastleSide::King),
            56 => self.castling.without(Color::Black, CastleSide::Queen),
            63 => self.castling.without(Color::Black, CastleSide::King),
            _ => self.castling,
        };
        BoardStatus::new(self.side_to_move, castling, self.has_ep_pawn)
    }

    /// Castling side still available to the side to move.
    #[inline]
    #[must_use]
    pub const fn can_castle(self, side: CastleSide) -> bool {
        self.castling.has(self.side_to_move, side)
    }
}

impl Default for BoardStatus {
    fn default() -> Self {
        BoardStatus::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_flip_side() {
        let s = BoardStatus::startpos();
        assert_eq!(s.silent_move().side_to_move, Color::Black);
        assert!(s.pawn_push().has_ep_pawn);
        assert!(!s.pawn_push().silent_move().has_ep_pawn);
    }

    #[test]
    fn test_king_move_clears_only_mover() {
        let s = BoardStatus::startpos().king_move();
        assert!(!s.castling.any(Color::White));
        assert!(s.castling.any(Color::Black));
        assert_eq!(s.side_to_move, Color::Black);
    }

    #[test]
    fn test_rook_corners() {
        let h1 = Square::new(0, 7);
        let s = BoardStatus::startpos().rook_move(h1);
        assert!(!s.castling.has(Color::White, CastleSide::King));
        assert!(s.castling.has(Color::White, CastleSide::Queen));

        // White takes the a8 rook: Black loses the queenside right
        let a8 = Square::new(7, 0);
        let t = BoardStatus::startpos().rook_captured(a8).silent_move();
        assert!(!t.castling.has(Color::Black, CastleSide::Queen));
        assert!(t.castling.has(Color::Black, CastleSide::King));
    }

    #[test]
    fn test_rights_never_regranted() {
        let mut s = BoardStatus::new(Color::White, CastlingRights::none(), false);
        for sq in [0u8, 7, 56, 63] {
            s = s.rook_move(Square::from_index(sq));
            assert_eq!(s.castling.as_u8(), 0);
        }
    }
}
