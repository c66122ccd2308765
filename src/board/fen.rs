use std::str::FromStr;

use super::error::FenError;
use super::{Bitboard, Board, BoardStatus, CastleSide, CastlingRights, Color, Piece, Position, Square};

impl Position {
    /// Parse a position from FEN notation.
    ///
    /// The en-passant field names the landing square; it is kept only when
    /// an enemy pawn actually stands in front of it. Clocks are accepted and
    /// ignored.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        // Parse piece placement
        let mut board = Board::empty();
        let mut ranks = 0usize;
        for (rank_idx, rank_str) in parts[0].split('/').enumerate() {
            if rank_idx >= 8 {
                return Err(FenError::InvalidRank { rank: rank_idx });
            }
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                    if file > 8 {
                        return Err(FenError::TooManyFiles {
                            rank: rank_idx,
                            files: file,
                        });
                    }
                    continue;
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file >= 8 {
                    return Err(FenError::TooManyFiles {
                        rank: rank_idx,
                        files: file + 1,
                    });
                }
                board.put(Square::new(7 - rank_idx as u8, file as u8), color, piece);
                file += 1;
            }
            if file < 8 {
                return Err(FenError::TooFewFiles {
                    rank: rank_idx,
                    files: file,
                });
            }
            ranks += 1;
        }
        if ranks != 8 {
            return Err(FenError::InvalidRank { rank: ranks });
        }
        board.validate()?;

        // Parse side to move
        let side = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };
        // The mover could simply take the king
        if board.is_attacked(board.king_square(side.opponent()), side) {
            return Err(FenError::OpponentInCheck);
        }

        // Parse castling rights
        let mut castling = CastlingRights::none();
        for c in parts[2].chars() {
            match c {
                'K' => castling.grant(Color::White, CastleSide::King),
                'Q' => castling.grant(Color::White, CastleSide::Queen),
                'k' => castling.grant(Color::Black, CastleSide::King),
                'q' => castling.grant(Color::Black, CastleSide::Queen),
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }

        // Parse en passant target
        let mut ep_target = Bitboard::EMPTY;
        if parts[3] != "-" {
            let landing: Square = parts[3].parse().map_err(|_| FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            })?;
            let (landing_rank, pawn_rank) = match side {
                Color::White => (5, 4),
                Color::Black => (2, 3),
            };
            if landing.rank() != landing_rank {
                return Err(FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                });
            }
            let pawn = Square::new(pawn_rank, landing.file());
            if board.pieces(side.opponent(), Piece::Pawn).contains(pawn) {
                ep_target = Bitboard::from_square(pawn);
            }
        }

        let status = BoardStatus::new(side, castling, ep_target.is_nonempty());
        Ok(Position::new(board, status, ep_target))
    }

    /// Parse a position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use `try_from_fen` for fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("Invalid FEN string")
    }

    /// Convert the position to FEN notation. Clocks are written as `0 1`.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::new();
        for rank in (0..8u8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8u8 {
                let sq = Square::new(rank, file);
                if let Some((color, piece)) = self.board.piece_at(sq) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = if self.status.is_white() { "w" } else { "b" };
        let rights = self.status.castling;
        let mut castling = String::new();
        for (color, side, c) in [
            (Color::White, CastleSide::King, 'K'),
            (Color::White, CastleSide::Queen, 'Q'),
            (Color::Black, CastleSide::King, 'k'),
            (Color::Black, CastleSide::Queen, 'q'),
        ] {
            if rights.has(color, side) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = if self.status.has_ep_pawn && self.ep_target.is_nonempty() {
            let pawn = self.ep_target.lsb();
            let landing_rank = if self.status.is_white() {
                pawn.rank() + 1
            } else {
                pawn.rank() - 1
            };
            Square::new(landing_rank, pawn.file()).to_string()
        } else {
            "-".to_string()
        };

        format!("{} {} {} {} 0 1", rows.join("/"), active, castling, ep)
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::try_from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_round_trip() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        ] {
            assert_eq!(Position::from_fen(fen).to_fen(), fen);
        }
    }

    #[test]
    fn test_fen_black_to_move() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let pos = Position::try_from_fen(fen).unwrap();
        assert_eq!(pos.side_to_move(), Color::Black);
        // No black pawn can take on e3, the flag is still set by the push
        assert!(pos.status.has_ep_pawn);
        assert_eq!(pos.ep_target, Bitboard::from_square("e4".parse().unwrap()));
    }

    #[test]
    fn test_fen_error_too_few_parts() {
        let result = Position::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w");
        assert!(matches!(result, Err(FenError::TooFewParts { .. })));
    }

    #[test]
    fn test_fen_error_invalid_piece() {
        let result =
            Position::try_from_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidPiece { .. })));
    }

    #[test]
    fn test_fen_error_too_many_files() {
        let result = Position::try_from_fen("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1");
        assert!(matches!(result, Err(FenError::TooManyFiles { .. })));
    }

    #[test]
    fn test_fen_error_invalid_side_to_move() {
        let result =
            Position::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidSideToMove { .. })));
    }

    #[test]
    fn test_fen_error_invalid_castling() {
        let result =
            Position::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidCastling { .. })));
    }

    #[test]
    fn test_fen_error_invalid_en_passant() {
        for ep in ["z9", "e4"] {
            let fen = format!("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq {ep} 0 1");
            assert!(matches!(
                Position::try_from_fen(&fen),
                Err(FenError::InvalidEnPassant { .. })
            ));
        }
    }

    #[test]
    fn test_fen_error_too_few_files() {
        let result = Position::try_from_fen("4k3/8/8/8/8/8/8/4K2 w - - 0 1");
        assert_eq!(result, Err(FenError::TooFewFiles { rank: 7, files: 7 }));
    }

    #[test]
    fn test_fen_error_wrong_rank_count() {
        let result = Position::try_from_fen("4k3/8/8/4K3 w - - 0 1");
        assert_eq!(result, Err(FenError::InvalidRank { rank: 4 }));
        let result = Position::try_from_fen("4k3/8/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(matches!(result, Err(FenError::InvalidRank { rank: 8 })));
    }

    #[test]
    fn test_fen_error_pawn_on_back_rank() {
        for fen in ["P3k3/8/8/8/8/8/8/4K3 w - - 0 1", "4k3/8/8/8/8/8/8/p3K3 b - - 0 1"] {
            assert!(matches!(
                Position::try_from_fen(fen),
                Err(FenError::PawnOnBackRank { .. })
            ));
        }
    }

    #[test]
    fn test_fen_error_king_capturable() {
        // White to move with the black king already attacked by the e7 rook
        let result = Position::try_from_fen("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(result, Err(FenError::OpponentInCheck));
        // The same placement is fine with Black to move
        let pos = Position::try_from_fen("4k3/4R3/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert!(pos.in_check());
        assert!(pos.legal_moves().iter().all(|m| m.to != pos.board.king_square(Color::White)));
    }

    #[test]
    fn test_fen_error_missing_king() {
        let result = Position::try_from_fen("8/8/8/8/8/8/8/K7 w - - 0 1");
        assert!(matches!(result, Err(FenError::KingCount { .. })));
    }

    #[test]
    fn test_fen_partial_castling() {
        let pos =
            Position::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1").unwrap();
        let rights = pos.status.castling;
        assert!(rights.has(Color::White, CastleSide::King));
        assert!(!rights.has(Color::White, CastleSide::Queen));
        assert!(!rights.has(Color::Black, CastleSide::King));
        assert!(rights.has(Color::Black, CastleSide::Queen));
    }

    #[test]
    fn test_ep_without_pawn_is_dropped() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - d6 0 1");
        assert!(!pos.status.has_ep_pawn);
        assert!(pos.ep_target.is_empty());
    }
}
