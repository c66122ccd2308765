//! Chess board representation, legal move generation and search.
//!
//! Positions are values: a [`Board`] of twelve bitboards, a [`BoardStatus`]
//! and the en-passant pawn. Move generation resolves checks and pins once per
//! node ([`refresh`]) and then emits only legal moves through a
//! [`MoveVisitor`]. The [`Searcher`] drives alpha-beta over that generator.
//!
//! # Example
//! ```
//! use chess_search::board::{perft, Position};
//!
//! let pos = Position::startpos();
//! assert_eq!(pos.legal_moves().len(), 20);
//! assert_eq!(perft(&pos, 3), 8902);
//! ```

mod attack_tables;
mod error;
mod fen;
mod movegen;
mod movestack;
mod perft;
mod position;
pub mod search;
mod state;
mod status;
mod types;

#[cfg(test)]
mod tests;

pub use error::{EvalError, FenError, MoveParseError, SearchError, SquareError};
pub use movegen::{count, enumerate, enumerate_king, refresh, MoveCollector, MoveVisitor, NodeMasks};
pub use movestack::{Movestack, MAX_DEPTH};
pub use perft::{divide, perft};
pub use position::Position;
pub use search::{
    Evaluator, GameHistory, MaterialEvaluator, ScoreConvention, SearchParams, SearchResult,
    SearchStats, Searcher, CHECKMATE_SCORE,
};
pub use state::Board;
pub use status::BoardStatus;
pub use types::{Bitboard, BitboardIter, CastleSide, CastlingRights, Color, Move, MoveKind, Piece, Square};

pub(crate) use types::PROMOTION_PIECES;
