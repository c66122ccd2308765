//! Castling rights type.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

/// All castling rights combined
pub(crate) const ALL_CASTLING_RIGHTS: u8 =
    CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

/// Which side of the board a castle goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CastleSide {
    King,
    Queen,
}

/// Castling rights represented as a 4-bit mask.
///
/// The raw value (0..16) doubles as the Zobrist castling-key index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// No castling rights
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    /// All castling rights (both sides can castle kingside and queenside)
    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(ALL_CASTLING_RIGHTS)
    }

    /// Check if a specific castling right is set
    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::bit_for(color, side) != 0
    }

    /// True if `color` keeps at least one right.
    #[inline]
    #[must_use]
    pub const fn any(self, color: Color) -> bool {
        self.0 & (Self::bit_for(color, CastleSide::King) | Self::bit_for(color, CastleSide::Queen))
            != 0
    }

    /// Copy with one right cleared. Rights are never re-granted.
    #[inline]
    #[must_use]
    pub const fn without(self, color: Color, side: CastleSide) -> Self {
        CastlingRights(self.0 & !Self::bit_for(color, side))
    }

    /// Copy with both of `color`'s rights cleared.
    #[inline]
    #[must_use]
    pub const fn without_color(self, color: Color) -> Self {
        self.without(color, CastleSide::King)
            .without(color, CastleSide::Queen)
    }

    /// Add a right. Only used while building a position from its description.
    #[inline]
    pub(crate) fn grant(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::bit_for(color, side);
    }

    /// Get the raw bitmask value (for Zobrist hashing)
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Get the bit for a specific castling right
    #[inline]
    const fn bit_for(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::King) => CASTLE_WHITE_K,
            (Color::White, CastleSide::Queen) => CASTLE_WHITE_Q,
            (Color::Black, CastleSide::King) => CASTLE_BLACK_K,
            (Color::Black, CastleSide::Queen) => CASTLE_BLACK_Q,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_only_clears() {
        let rights = CastlingRights::all().without(Color::White, CastleSide::Queen);
        assert!(rights.has(Color::White, CastleSide::King));
        assert!(!rights.has(Color::White, CastleSide::Queen));
        assert_eq!(rights.as_u8(), ALL_CASTLING_RIGHTS & !CASTLE_WHITE_Q);
        let cleared = rights.without_color(Color::Black);
        assert!(!cleared.any(Color::Black));
        assert!(cleared.any(Color::White));
    }
}
