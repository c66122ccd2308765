//! Error types for board construction and search.

use std::fmt;

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few parts (needs at least 4)
    TooFewParts { found: usize },
    /// Invalid piece character in position string
    InvalidPiece { char: char },
    /// Invalid castling character
    InvalidCastling { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid en passant square
    InvalidEnPassant { found: String },
    /// Wrong number of ranks in position string
    InvalidRank { rank: usize },
    /// Too many files in a rank
    TooManyFiles { rank: usize, files: usize },
    /// A rank that does not fill all eight files
    TooFewFiles { rank: usize, files: usize },
    /// Each side needs exactly one king
    KingCount { color: &'static str, found: u32 },
    /// Two pieces claim the same square
    OverlappingPieces { square: String },
    /// Pawn on the first or eighth rank
    PawnOnBackRank { square: String },
    /// The side that just moved left its king in check
    OpponentInCheck,
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 4 parts, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::InvalidRank { rank } => {
                write!(f, "Invalid rank index {rank} in FEN")
            }
            FenError::TooManyFiles { rank, files } => {
                write!(f, "Too many files ({files}) in rank {rank}")
            }
            FenError::KingCount { color, found } => {
                write!(f, "{color} must have exactly one king, found {found}")
            }
            FenError::TooFewFiles { rank, files } => {
                write!(f, "Too few files ({files}) in rank {rank}")
            }
            FenError::OverlappingPieces { square } => {
                write!(f, "More than one piece on {square}")
            }
            FenError::PawnOnBackRank { square } => write!(f, "Pawn on back rank square {square}"),
            FenError::OpponentInCheck => write!(f, "Side not to move is in check"),
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-7)
    RankOutOfBounds { rank: usize },
    /// File out of bounds (must be 0-7)
    FileOutOfBounds { file: usize },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "Rank {rank} out of bounds (must be 0-7)")
            }
            SquareError::FileOutOfBounds { file } => {
                write!(f, "File {file} out of bounds (must be 0-7)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Error type for move parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4-5 characters)
    InvalidLength { len: usize },
    /// Invalid square notation in move
    InvalidSquare { notation: String },
    /// Promotion letter is not one of q, r, b, n
    InvalidPromotion { char: char },
    /// Move is not legal in the current position
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "Move must be 4-5 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "Illegal move '{notation}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Failure reported by a leaf evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalError {
    pub reason: String,
}

impl EvalError {
    pub fn new(reason: impl Into<String>) -> Self {
        EvalError {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evaluator failed: {}", self.reason)
    }
}

impl std::error::Error for EvalError {}

/// Error type for a search call.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Requested depth is beyond what the movestack was sized for
    UnsupportedDepth { requested: u32, max: u32 },
    /// The leaf evaluator failed; no score is substituted
    EvaluatorUnavailable(EvalError),
    /// The position handed to the search could not be built
    MalformedPosition(FenError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::UnsupportedDepth { requested, max } => {
                write!(f, "Search depth {requested} not supported (max {max})")
            }
            SearchError::EvaluatorUnavailable(e) => write!(f, "Evaluator unavailable: {e}"),
            SearchError::MalformedPosition(e) => write!(f, "Malformed position: {e}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::EvaluatorUnavailable(e) => Some(e),
            SearchError::MalformedPosition(e) => Some(e),
            SearchError::UnsupportedDepth { .. } => None,
        }
    }
}

impl From<EvalError> for SearchError {
    fn from(e: EvalError) -> Self {
        SearchError::EvaluatorUnavailable(e)
    }
}

impl From<FenError> for SearchError {
    fn from(e: FenError) -> Self {
        SearchError::MalformedPosition(e)
    }
}
