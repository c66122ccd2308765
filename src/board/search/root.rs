//! Root move selection.

use std::collections::HashSet;

use log::{debug, trace, warn};

use crate::zobrist;

use super::super::movegen::refresh;
use super::super::movestack::MAX_DEPTH;
use super::super::{Move, Position, SearchError};
use super::{check_depth, terminal_score, Evaluator, Searcher};

/// Zobrist keys of the positions already reached in the current game.
#[derive(Clone, Debug, Default)]
pub struct GameHistory {
    seen: HashSet<u64>,
}

impl GameHistory {
    /// Record `pos`; returns false if it was already there.
    pub fn record(&mut self, pos: &Position) -> bool {
        self.seen.insert(zobrist::hash(pos))
    }

    #[must_use]
    pub fn contains(&self, pos: &Position) -> bool {
        self.seen.contains(&zobrist::hash(pos))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

/// Result of a root search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// `None` when the root has no legal move
    pub best_move: Option<Move>,
    /// Position after `best_move`, or the root itself
    pub position: Position,
    /// White-positive score of the chosen move
    pub eval: f32,
    /// Interior nodes searched
    pub nodes: u64,
    /// Depth actually searched, extension included
    pub depth: u32,
}

impl SearchResult {
    /// True when the score is a forced mate rather than an evaluation.
    #[must_use]
    pub fn is_mate(&self) -> bool {
        self.eval.abs() > 1.0
    }
}

struct Candidate {
    mv: Move,
    child: Position,
    eval: f32,
}

impl<E: Evaluator> Searcher<E> {
    /// Pick a move for the side to move in `pos`.
    ///
    /// Every root move is searched with a full window. A safe move scoring
    /// beyond 1 for the mover is played at once. Otherwise the best safe move
    /// is chosen unless it is losing, in which case the best move overall is
    /// played. The root and the chosen position are added to the history.
    pub fn best_move(&mut self, pos: &Position, depth: u32) -> Result<SearchResult, SearchError> {
        if depth == 0 {
            warn!("rejecting search depth 0, the root needs at least one ply");
            return Err(SearchError::UnsupportedDepth {
                requested: 0,
                max: MAX_DEPTH as u32,
            });
        }
        check_depth(depth)?;
        self.stats.reset();
        self.history.record(pos);

        let extra = self.params.depth_extension(pos.board.material_points());
        let depth = (depth + extra).min(MAX_DEPTH as u32);
        if extra > 0 {
            debug!(
                "{} material points left, searching {depth} plies",
                pos.board.material_points()
            );
        }
        let d = depth as usize;
        debug!(
            "best_move depth {depth}: {} cached evaluations, {} known positions",
            self.cache.len(),
            self.history.len()
        );

        self.stack.init(pos, d);
        let masks = refresh(pos, &mut self.stack, d);
        let moves = Self::ordered_moves(pos, &masks);
        if moves.is_empty() {
            return Ok(SearchResult {
                best_move: None,
                position: *pos,
                eval: terminal_score(pos, masks.in_check()),
                nodes: 0,
                depth,
            });
        }

        let white = pos.status.is_white();
        let mut candidates = Vec::with_capacity(moves.len());
        for mv in moves {
            let child = pos.play(&mv);
            self.stack.enter_child(pos, d, &mv);
            let result = self.search_node(&child, d - 1, f32::NEG_INFINITY, f32::INFINITY, true);
            self.stack.leave_child(d);
            let eval = result?;
            trace!("root {mv}: {eval:.4}");

            let winning = if white { eval > 1.0 } else { eval < -1.0 };
            if winning && self.is_safe(&child) {
                debug!("forced mate with {mv}");
                return Ok(self.choose(&Candidate { mv, child, eval }, depth));
            }
            candidates.push(Candidate { mv, child, eval });
        }

        // Best first for the mover; ties keep visit order
        if white {
            candidates.sort_by(|a, b| b.eval.total_cmp(&a.eval));
        } else {
            candidates.sort_by(|a, b| a.eval.total_cmp(&b.eval));
        }

        let overall = &candidates[0];
        let chosen = match candidates.iter().find(|c| self.is_safe(&c.child)) {
            Some(safe) if losing(white, safe.eval) => {
                debug!("best safe move {} is losing, playing {}", safe.mv, overall.mv);
                overall
            }
            Some(safe) => safe,
            None => {
                debug!("no safe move, playing {}", overall.mv);
                overall
            }
        };
        Ok(self.choose(chosen, depth))
    }

    /// [`Searcher::best_move`] from a FEN string. A malformed FEN is
    /// reported as [`SearchError::MalformedPosition`].
    pub fn best_move_fen(&mut self, fen: &str, depth: u32) -> Result<SearchResult, SearchError> {
        let pos = Position::try_from_fen(fen)?;
        self.best_move(&pos, depth)
    }

    /// A move is safe if it reaches a new position and no reply returns to
    /// a known one.
    fn is_safe(&self, child: &Position) -> bool {
        if !self.params.avoid_repetition {
            return true;
        }
        if self.history.contains(child) {
            trace!("repetition: move returns to a known position");
            return false;
        }
        let repeatable = child
            .legal_moves()
            .iter()
            .any(|reply| self.history.contains(&child.play(reply)));
        if repeatable {
            trace!("repetition: opponent can return to a known position");
        }
        !repeatable
    }

    fn choose(&mut self, chosen: &Candidate, depth: u32) -> SearchResult {
        self.history.record(&chosen.child);
        debug!(
            "chose {} ({:.4}) after {} nodes, {} evaluator calls",
            chosen.mv, chosen.eval, self.stats.nodes, self.stats.evaluator_calls
        );
        SearchResult {
            best_move: Some(chosen.mv),
            position: chosen.child,
            eval: chosen.eval,
            nodes: self.stats.nodes,
            depth,
        }
    }
}

#[inline]
fn losing(white: bool, eval: f32) -> bool {
    if white {
        eval < 0.0
    } else {
        eval > 0.0
    }
}
