//! Search module implementing fixed-depth alpha-beta over the legal move
//! generator.
//!
//! Features:
//! - Fail-soft alpha-beta with White maximizing, Black minimizing
//! - MVV-LVA move ordering, king steps searched last
//! - Checkmate and stalemate scoring
//! - Leaf evaluations memoized by Zobrist hash, optionally batched
//! - Root driver with endgame depth extension and repetition avoidance

mod evaluator;
mod move_order;
mod params;
mod root;

use log::{debug, warn};

use crate::eval_cache::EvalCache;
use crate::zobrist;

use super::movegen::{enumerate, enumerate_king, refresh, MoveCollector, NodeMasks};
use super::movestack::{Movestack, MAX_DEPTH};
use super::{EvalError, Move, Position, SearchError};

pub use evaluator::{Evaluator, MaterialEvaluator};
pub use params::{ScoreConvention, SearchParams};
pub use root::{GameHistory, SearchResult};

/// Magnitude of a checkmate score. Evaluations stay within `[-1, 1]`, so any
/// score beyond 1 means a forced mate was found.
pub const CHECKMATE_SCORE: f32 = 1.1;

/// Score of a node with no legal moves.
#[must_use]
pub fn terminal_score(pos: &Position, in_check: bool) -> f32 {
    match (in_check, pos.status.is_white()) {
        (false, _) => 0.0,
        (true, true) => -CHECKMATE_SCORE,
        (true, false) => CHECKMATE_SCORE,
    }
}

/// Statistics tracked during search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Interior nodes expanded
    pub nodes: u64,
    /// Leaves scored, from the cache or the evaluator
    pub leaves: u64,
    /// Positions handed to the evaluator
    pub evaluator_calls: u64,
    pub cutoffs: u64,
}

impl SearchStats {
    pub fn reset(&mut self) {
        *self = SearchStats::default();
    }
}

/// Owns everything one search needs: the evaluator, the evaluation cache,
/// the configuration, the game history and the movestack.
///
/// Independent searchers share nothing and may run on separate threads.
pub struct Searcher<E: Evaluator> {
    evaluator: E,
    cache: EvalCache,
    params: SearchParams,
    history: GameHistory,
    stack: Movestack,
    stats: SearchStats,
}

impl<E: Evaluator> Searcher<E> {
    #[must_use]
    pub fn new(evaluator: E) -> Self {
        Self::with_params(evaluator, SearchParams::default())
    }

    #[must_use]
    pub fn with_params(evaluator: E, params: SearchParams) -> Self {
        Searcher {
            evaluator,
            cache: EvalCache::new(),
            params,
            history: GameHistory::default(),
            stack: Movestack::new(),
            stats: SearchStats::default(),
        }
    }

    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Cached scores are stored as the evaluator returned them, so change
    /// the convention through [`Searcher::set_convention`] instead.
    pub fn params_mut(&mut self) -> &mut SearchParams {
        &mut self.params
    }

    /// Switch the score convention. Cached scores carry the old orientation
    /// and are dropped; the evaluator must be switched by the caller.
    pub fn set_convention(&mut self, convention: ScoreConvention) {
        if self.params.convention != convention {
            self.params.convention = convention;
            self.clear_cache();
        }
    }

    #[must_use]
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.evaluator
    }

    #[must_use]
    pub fn cache(&self) -> &EvalCache {
        &self.cache
    }

    #[must_use]
    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut GameHistory {
        &mut self.history
    }

    /// Statistics of the last search call.
    #[must_use]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Forget every cached evaluation. Game history is kept.
    pub fn clear_cache(&mut self) {
        debug!("clearing {} cached evaluations", self.cache.len());
        self.cache.clear();
    }

    /// Start a new game: clear the cache and the position history.
    pub fn new_game(&mut self) {
        self.clear_cache();
        self.history.clear();
    }

    /// Score of `pos` searched `depth` plies deep within `(alpha, beta)`.
    ///
    /// Scores are White-positive; a mate found inside the tree is reported
    /// as `±CHECKMATE_SCORE`.
    pub fn alpha_beta(
        &mut self,
        pos: &Position,
        depth: u32,
        alpha: f32,
        beta: f32,
    ) -> Result<f32, SearchError> {
        let depth = check_depth(depth)?;
        self.stats.reset();
        self.stack.init(pos, depth);
        let score = self.search_node(pos, depth, alpha, beta, true)?;
        debug!(
            "alpha_beta depth {depth}: {score:.4}, {} nodes, {} leaves, {} cache entries",
            self.stats.nodes,
            self.stats.leaves,
            self.cache.len()
        );
        Ok(score)
    }

    /// Exhaustive minimax over the same tree, without cutoffs.
    pub fn minimax(&mut self, pos: &Position, depth: u32) -> Result<f32, SearchError> {
        let depth = check_depth(depth)?;
        self.stats.reset();
        self.stack.init(pos, depth);
        self.search_node(pos, depth, f32::NEG_INFINITY, f32::INFINITY, false)
    }

    /// Leaf score from the cache, falling back to the evaluator.
    fn leaf(&mut self, pos: &Position) -> Result<f32, SearchError> {
        self.stats.leaves += 1;
        let key = zobrist::hash(pos);
        let raw = match self.cache.probe(key) {
            Some(score) => score,
            None => {
                let score = self.evaluator.evaluate(pos)?;
                self.stats.evaluator_calls += 1;
                self.cache.store(key, score);
                score
            }
        };
        Ok(self.orient(pos, raw))
    }

    #[inline]
    fn orient(&self, pos: &Position, raw: f32) -> f32 {
        match self.params.convention {
            ScoreConvention::SideToMove if !pos.status.is_white() => -raw,
            _ => raw,
        }
    }

    /// Score every uncached child with one batch call.
    fn prefetch_leaves(&mut self, children: &[Position]) -> Result<(), SearchError> {
        let mut keys = Vec::with_capacity(children.len());
        let mut pending = Vec::with_capacity(children.len());
        for child in children {
            let key = zobrist::hash(child);
            if !self.cache.contains(key) && !keys.contains(&key) {
                keys.push(key);
                pending.push(*child);
            }
        }
        if pending.is_empty() {
            return Ok(());
        }

        let scores = self.evaluator.evaluate_batch(&pending)?;
        if scores.len() != pending.len() {
            return Err(EvalError::new(format!(
                "batch returned {} scores for {} positions",
                scores.len(),
                pending.len()
            ))
            .into());
        }
        self.stats.evaluator_calls += pending.len() as u64;
        for (key, score) in keys.into_iter().zip(scores) {
            self.cache.store(key, score);
        }
        Ok(())
    }

    /// Legal moves at a refreshed node in visit order: the ordered list,
    /// then king steps.
    fn ordered_moves(pos: &Position, masks: &NodeMasks) -> Vec<Move> {
        let mut collector = MoveCollector::default();
        enumerate(pos, masks, &mut collector);
        let mut moves = collector.moves;
        move_order::order_moves(pos, &mut moves);

        let mut kings = MoveCollector { moves };
        enumerate_king(pos, masks, &mut kings);
        kings.moves
    }

    fn search_node(
        &mut self,
        pos: &Position,
        depth: usize,
        mut alpha: f32,
        mut beta: f32,
        prune: bool,
    ) -> Result<f32, SearchError> {
        if depth == 0 {
            return self.leaf(pos);
        }
        self.stats.nodes += 1;

        let masks = refresh(pos, &mut self.stack, depth);
        let moves = Self::ordered_moves(pos, &masks);
        if moves.is_empty() {
            return Ok(terminal_score(pos, masks.in_check()));
        }

        if depth == 1 && self.params.batch_leaves {
            let children: Vec<Position> = moves.iter().map(|mv| pos.play(mv)).collect();
            self.prefetch_leaves(&children)?;
        }

        let maximizing = pos.status.is_white();
        let mut best = if maximizing {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };

        for mv in &moves {
            let child = pos.play(mv);
            self.stack.enter_child(pos, depth, mv);
            let result = self.search_node(&child, depth - 1, alpha, beta, prune);
            self.stack.leave_child(depth);
            let value = result?;

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(value);
            } else {
                best = best.min(value);
                beta = beta.min(value);
            }
            if prune && alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }
        Ok(best)
    }
}

fn check_depth(depth: u32) -> Result<usize, SearchError> {
    match usize::try_from(depth) {
        Ok(d) if d <= MAX_DEPTH => Ok(d),
        _ => {
            warn!("rejecting search depth {depth}, maximum is {MAX_DEPTH}");
            Err(SearchError::UnsupportedDepth {
                requested: depth,
                max: MAX_DEPTH as u32,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts every position it scores.
    #[derive(Default)]
    struct Counting {
        calls: usize,
        batches: usize,
    }

    impl Evaluator for Counting {
        fn evaluate(&mut self, pos: &Position) -> Result<f32, EvalError> {
            self.calls += 1;
            MaterialEvaluator::default().evaluate(pos)
        }

        fn evaluate_batch(&mut self, positions: &[Position]) -> Result<Vec<f32>, EvalError> {
            self.batches += 1;
            positions.iter().map(|p| self.evaluate(p)).collect()
        }
    }

    struct Failing;

    impl Evaluator for Failing {
        fn evaluate(&mut self, _: &Position) -> Result<f32, EvalError> {
            Err(EvalError::new("model not loaded"))
        }
    }

    const MIDDLEGAME: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn test_terminal_scores() {
        let mut searcher = Searcher::new(MaterialEvaluator::default());
        let mated_black = Position::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert_eq!(
            searcher
                .alpha_beta(&mated_black, 3, f32::NEG_INFINITY, f32::INFINITY)
                .unwrap(),
            CHECKMATE_SCORE
        );
        let mated_white = Position::from_fen("6k1/8/8/8/8/8/5PPP/3r2K1 w - - 0 1");
        assert_eq!(
            searcher
                .alpha_beta(&mated_white, 2, f32::NEG_INFINITY, f32::INFINITY)
                .unwrap(),
            -CHECKMATE_SCORE
        );
        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(
            searcher
                .alpha_beta(&stalemate, 1, f32::NEG_INFINITY, f32::INFINITY)
                .unwrap(),
            0.0
        );
    }

    #[test]
    fn test_set_convention_drops_stale_scores() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1");
        let mut searcher = Searcher::new(MaterialEvaluator::default());
        let absolute = searcher
            .alpha_beta(&pos, 0, f32::NEG_INFINITY, f32::INFINITY)
            .unwrap();
        assert_eq!(searcher.cache().len(), 1);

        searcher.set_convention(ScoreConvention::Absolute);
        assert_eq!(searcher.cache().len(), 1);

        searcher.set_convention(ScoreConvention::SideToMove);
        assert!(searcher.cache().is_empty());
        searcher.evaluator_mut().convention = ScoreConvention::SideToMove;
        let relative = searcher
            .alpha_beta(&pos, 0, f32::NEG_INFINITY, f32::INFINITY)
            .unwrap();
        assert_eq!(relative, absolute);
    }

    #[test]
    fn test_depth_zero_is_leaf() {
        let mut searcher = Searcher::new(MaterialEvaluator::default());
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let score = searcher
            .alpha_beta(&pos, 0, f32::NEG_INFINITY, f32::INFINITY)
            .unwrap();
        assert!((score - 0.5f32.tanh()).abs() < 1e-6);
        assert_eq!(searcher.stats().leaves, 1);
    }

    #[test]
    fn test_alpha_beta_matches_minimax() {
        let pos = Position::from_fen(MIDDLEGAME);
        let mut pruned = Searcher::new(MaterialEvaluator::default());
        let mut full = Searcher::new(MaterialEvaluator::default());
        let a = pruned
            .alpha_beta(&pos, 3, f32::NEG_INFINITY, f32::INFINITY)
            .unwrap();
        let m = full.minimax(&pos, 3).unwrap();
        assert_eq!(a, m);
        assert!(pruned.stats().leaves < full.stats().leaves);
    }

    #[test]
    fn test_cache_avoids_second_evaluation() {
        let pos = Position::from_fen(MIDDLEGAME);
        let mut searcher = Searcher::new(Counting::default());
        let first = searcher
            .alpha_beta(&pos, 2, f32::NEG_INFINITY, f32::INFINITY)
            .unwrap();
        let calls = searcher.evaluator().calls;
        assert_eq!(calls, searcher.cache().len());

        let second = searcher
            .alpha_beta(&pos, 2, f32::NEG_INFINITY, f32::INFINITY)
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(searcher.evaluator().calls, calls);
        assert_eq!(searcher.stats().evaluator_calls, 0);

        searcher.clear_cache();
        assert!(searcher.cache().is_empty());
    }

    #[test]
    fn test_batched_leaves_give_same_score() {
        let pos = Position::from_fen(MIDDLEGAME);
        let mut single = Searcher::new(Counting::default());
        let params = SearchParams {
            batch_leaves: true,
            ..SearchParams::default()
        };
        let mut batched = Searcher::with_params(Counting::default(), params);

        let a = single
            .alpha_beta(&pos, 2, f32::NEG_INFINITY, f32::INFINITY)
            .unwrap();
        let b = batched
            .alpha_beta(&pos, 2, f32::NEG_INFINITY, f32::INFINITY)
            .unwrap();
        assert_eq!(a, b);
        assert!(batched.evaluator().batches > 0);
        assert_eq!(single.evaluator().batches, 0);
    }

    #[test]
    fn test_side_to_move_convention() {
        // Black to move and a rook down: a side-relative evaluator reports
        // a negative score, the search turns it back to White-positive.
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1");
        let params = SearchParams {
            convention: ScoreConvention::SideToMove,
            ..SearchParams::default()
        };
        let mut searcher =
            Searcher::with_params(MaterialEvaluator::new(ScoreConvention::SideToMove), params);
        let score = searcher
            .alpha_beta(&pos, 0, f32::NEG_INFINITY, f32::INFINITY)
            .unwrap();
        assert!(score > 0.0);
    }

    #[test]
    fn test_unsupported_depth() {
        let mut searcher = Searcher::new(MaterialEvaluator::default());
        let pos = Position::startpos();
        let err = searcher
            .alpha_beta(&pos, MAX_DEPTH as u32 + 1, f32::NEG_INFINITY, f32::INFINITY)
            .unwrap_err();
        assert_eq!(
            err,
            SearchError::UnsupportedDepth {
                requested: MAX_DEPTH as u32 + 1,
                max: MAX_DEPTH as u32
            }
        );
    }

    #[test]
    fn test_evaluator_failure_propagates_and_stack_recovers() {
        // Nxf6+ is searched first and registers a knight check for its child
        let pos = Position::from_fen("4k3/8/5p2/8/6N1/8/8/4K3 w - - 0 1");
        let mut failing = Searcher::new(Failing);
        let err = failing
            .alpha_beta(&pos, 2, f32::NEG_INFINITY, f32::INFINITY)
            .unwrap_err();
        assert!(matches!(err, SearchError::EvaluatorUnavailable(_)));
        for d in 0..MAX_DEPTH {
            assert_eq!(failing.stack.check_status(d), crate::board::Bitboard::ALL);
        }
    }
}
