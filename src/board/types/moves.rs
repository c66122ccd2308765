//! Move types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::castling::CastleSide;
use super::piece::Piece;
use super::square::Square;

/// Move category, one per movegen callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveKind {
    King,
    Castle(CastleSide),
    /// Single pawn step without capture or promotion
    PawnMove,
    /// Pawn capture without promotion
    PawnCapture,
    /// Double pawn step from the start rank
    PawnPush,
    EnPassant,
    /// Any pawn move reaching the last rank, capture or not
    Promotion,
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl MoveKind {
    /// The piece that moves.
    #[must_use]
    pub const fn piece(self) -> Piece {
        match self {
            MoveKind::King | MoveKind::Castle(_) => Piece::King,
            MoveKind::PawnMove
            | MoveKind::PawnCapture
            | MoveKind::PawnPush
            | MoveKind::EnPassant
            | MoveKind::Promotion => Piece::Pawn,
            MoveKind::Knight => Piece::Knight,
            MoveKind::Bishop => Piece::Bishop,
            MoveKind::Rook => Piece::Rook,
            MoveKind::Queen => Piece::Queen,
        }
    }
}

/// A fully legal move as produced by the enumerator.
///
/// For castling `from`/`to` are the king's squares; for en passant `to` is
/// the landing square, not the captured pawn.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
    pub promotion: Option<Piece>,
}

impl Move {
    #[inline]
    #[must_use]
    pub const fn new(kind: MoveKind, from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            kind,
            promotion: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn promote(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            kind: MoveKind::Promotion,
            promotion: Some(piece),
        }
    }

    /// The piece that moves.
    #[inline]
    #[must_use]
    pub const fn piece(self) -> Piece {
        self.kind.piece()
    }

    #[inline]
    #[must_use]
    pub const fn is_king_step(self) -> bool {
        matches!(self.kind, MoveKind::King | MoveKind::Castle(_))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", piece.to_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({:?})", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uci_display() {
        let e2: Square = "e2".parse().unwrap();
        let e4: Square = "e4".parse().unwrap();
        assert_eq!(Move::new(MoveKind::PawnPush, e2, e4).to_string(), "e2e4");

        let a7: Square = "a7".parse().unwrap();
        let a8: Square = "a8".parse().unwrap();
        let promo = Move::promote(a7, a8, Piece::Knight);
        assert_eq!(promo.to_string(), "a7a8n");
        assert_eq!(promo.piece(), Piece::Pawn);
    }
}
