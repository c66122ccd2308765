use super::attack_tables::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use super::error::FenError;
use super::{Bitboard, CastleSide, Color, Piece, Square};

/// Twelve piece bitboards plus derived occupancy.
///
/// Boards are values: every move application returns a new `Board`, the
/// parent is never touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
}

impl Board {
    #[must_use]
    pub const fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
        }
    }

    #[must_use]
    pub fn startpos() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in (0u8..).zip(back_rank) {
            board.put(Square::new(0, file), Color::White, piece);
            board.put(Square::new(7, file), Color::Black, piece);
            board.put(Square::new(1, file), Color::White, Piece::Pawn);
            board.put(Square::new(6, file), Color::Black, Piece::Pawn);
        }
        board
    }

    /// Place a piece. Does not clear whatever already stands on `sq`;
    /// [`Board::validate`] reports such overlaps.
    pub fn put(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] |= bit;
        self.occupied[color.index()] |= bit;
        self.all_occupied |= bit;
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        if !self.all_occupied.contains(sq) {
            return None;
        }
        for color in Color::BOTH {
            if !self.occupied[color.index()].contains(sq) {
                continue;
            }
            for piece in Piece::ALL {
                if self.pieces[color.index()][piece.index()].contains(sq) {
                    return Some((color, piece));
                }
            }
        }
        None
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.all_occupied
    }

    /// Squares `color` may move to: empty or holding an enemy piece.
    #[inline]
    #[must_use]
    pub fn enemy_or_empty(&self, color: Color) -> Bitboard {
        !self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub(crate) fn rooks_queens(&self, color: Color) -> Bitboard {
        self.pieces(color, Piece::Rook) | self.pieces(color, Piece::Queen)
    }

    #[inline]
    #[must_use]
    pub(crate) fn bishops_queens(&self, color: Color) -> Bitboard {
        self.pieces(color, Piece::Bishop) | self.pieces(color, Piece::Queen)
    }

    /// Square of `color`'s king. A validated board always has one.
    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(color, Piece::King).lsb()
    }

    /// Classic material points of both sides together, kings excluded.
    #[must_use]
    pub fn material_points(&self) -> u32 {
        Piece::ALL
            .iter()
            .map(|&p| {
                (self.pieces(Color::White, p).popcount() + self.pieces(Color::Black, p).popcount())
                    * p.points()
            })
            .sum()
    }

    /// Pieces of `by` attacking `sq` given occupancy `occ`.
    #[must_use]
    pub(crate) fn attackers_to(&self, sq: Square, by: Color, occ: Bitboard) -> Bitboard {
        (knight_attacks(sq) & self.pieces(by, Piece::Knight))
            | (king_attacks(sq) & self.pieces(by, Piece::King))
            | (pawn_attacks(by.opponent(), sq) & self.pieces(by, Piece::Pawn))
            | (rook_attacks(sq, occ) & self.rooks_queens(by))
            | (bishop_attacks(sq, occ) & self.bishops_queens(by))
    }

    #[inline]
    #[must_use]
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        self.attackers_to(sq, by, self.all_occupied).is_nonempty()
    }

    /// Move `piece` of `color` from `from` to `to`, removing any enemy piece on `to`.
    #[must_use]
    pub fn with_move(&self, color: Color, piece: Piece, from: Square, to: Square) -> Board {
        let mut next = self.captured(color.opponent(), to);
        let from_to = Bitboard::from_square(from) | Bitboard::from_square(to);
        next.pieces[color.index()][piece.index()] ^= from_to;
        next.occupied[color.index()] ^= from_to;
        next.all_occupied = next.occupied[0] | next.occupied[1];
        next
    }

    /// Castle `color`'s king to `side`; the rook jumps over it.
    #[must_use]
    pub fn with_castle(&self, color: Color, side: CastleSide) -> Board {
        let (king_from, king_to, rook_from, rook_to) = castle_squares(color, side);
        self.with_move(color, Piece::King, king_from, king_to)
            .with_move(color, Piece::Rook, rook_from, rook_to)
    }

    /// Pawn takes en passant; `captured` is the square of the pawn removed.
    #[must_use]
    pub fn with_en_passant(&self, color: Color, from: Square, to: Square, captured: Square) -> Board {
        self.captured(color.opponent(), captured)
            .with_move(color, Piece::Pawn, from, to)
    }

    /// Pawn steps or captures onto the last rank and becomes `promotion`.
    #[must_use]
    pub fn with_promotion(&self, color: Color, from: Square, to: Square, promotion: Piece) -> Board {
        let mut next = self.with_move(color, Piece::Pawn, from, to);
        let bit = Bitboard::from_square(to);
        next.pieces[color.index()][Piece::Pawn.index()] ^= bit;
        next.pieces[color.index()][promotion.index()] |= bit;
        next
    }

    /// Copy with whatever `color` has on `sq` taken off.
    fn captured(&self, color: Color, sq: Square) -> Board {
        let mut next = *self;
        let keep = !Bitboard::from_square(sq);
        if self.occupied[color.index()].contains(sq) {
            for bb in next.pieces[color.index()].iter_mut() {
                *bb &= keep;
            }
            next.occupied[color.index()] &= keep;
            next.all_occupied &= keep;
        }
        next
    }

    /// Check the placement invariants: no square claimed twice, occupancy
    /// equal to the union of the piece boards, one king per side and no
    /// pawn on a back rank.
    pub fn validate(&self) -> Result<(), FenError> {
        let mut seen = Bitboard::EMPTY;
        for color in Color::BOTH {
            let mut union = Bitboard::EMPTY;
            for piece in Piece::ALL {
                let bb = self.pieces(color, piece);
                let clash = seen & bb;
                if clash.is_nonempty() {
                    return Err(FenError::OverlappingPieces {
                        square: clash.lsb().to_string(),
                    });
                }
                seen |= bb;
                union |= bb;
            }
            if union != self.occupied[color.index()] {
                return Err(FenError::OverlappingPieces {
                    square: (union ^ self.occupied[color.index()]).lsb().to_string(),
                });
            }
        }
        if seen != self.all_occupied {
            return Err(FenError::OverlappingPieces {
                square: (seen ^ self.all_occupied).lsb().to_string(),
            });
        }
        for color in Color::BOTH {
            let kings = self.pieces(color, Piece::King).popcount();
            if kings != 1 {
                return Err(FenError::KingCount {
                    color: if color == Color::White { "White" } else { "Black" },
                    found: kings,
                });
            }
        }
        let pawns = self.pieces(Color::White, Piece::Pawn) | self.pieces(Color::Black, Piece::Pawn);
        let stranded = pawns & (Bitboard::RANK_1 | Bitboard::RANK_8);
        if stranded.is_nonempty() {
            return Err(FenError::PawnOnBackRank {
                square: stranded.lsb().to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::startpos()
    }
}

/// King from, king to, rook from, rook to.
#[must_use]
pub(crate) const fn castle_squares(color: Color, side: CastleSide) -> (Square, Square, Square, Square) {
    let rank = color.back_rank();
    match side {
        CastleSide::King => (
            Square::new(rank, 4),
            Square::new(rank, 6),
            Square::new(rank, 7),
            Square::new(rank, 5),
        ),
        CastleSide::Queen => (
            Square::new(rank, 4),
            Square::new(rank, 2),
            Square::new(rank, 0),
            Square::new(rank, 3),
        ),
    }
}
