pub mod board;
pub mod eval_cache;
pub mod uci;
pub mod zobrist;

pub use board::{
    Color, Evaluator, MaterialEvaluator, Move, Piece, Position, SearchError, SearchParams,
    Searcher, Square,
};
pub use eval_cache::EvalCache;
