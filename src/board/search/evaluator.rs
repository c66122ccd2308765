//! The leaf scoring seam.

use super::super::{Color, EvalError, Piece, Position};
use super::ScoreConvention;

/// Scores a leaf position in roughly `[-1, 1]`.
///
/// Orientation follows [`SearchParams::convention`](super::SearchParams).
/// Errors abort the search that asked for the score.
pub trait Evaluator {
    fn evaluate(&mut self, pos: &Position) -> Result<f32, EvalError>;

    /// Score several positions in one call. The result must line up with
    /// `positions`.
    fn evaluate_batch(&mut self, positions: &[Position]) -> Result<Vec<f32>, EvalError> {
        positions.iter().map(|pos| self.evaluate(pos)).collect()
    }
}

impl<E: Evaluator + ?Sized> Evaluator for &mut E {
    fn evaluate(&mut self, pos: &Position) -> Result<f32, EvalError> {
        (**self).evaluate(pos)
    }

    fn evaluate_batch(&mut self, positions: &[Position]) -> Result<Vec<f32>, EvalError> {
        (**self).evaluate_batch(positions)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn evaluate(&mut self, pos: &Position) -> Result<f32, EvalError> {
        (**self).evaluate(pos)
    }

    fn evaluate_batch(&mut self, positions: &[Position]) -> Result<Vec<f32>, EvalError> {
        (**self).evaluate_batch(positions)
    }
}

/// Deterministic material count squashed through `tanh`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEvaluator {
    pub convention: ScoreConvention,
}

/// Points of material that map to a score of about 0.76.
const MATERIAL_SCALE: f32 = 10.0;

impl MaterialEvaluator {
    #[must_use]
    pub const fn new(convention: ScoreConvention) -> Self {
        MaterialEvaluator { convention }
    }

    fn side_points(pos: &Position, color: Color) -> i32 {
        Piece::ALL
            .iter()
            .map(|&p| (pos.board.pieces(color, p).popcount() * p.points()) as i32)
            .sum()
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&mut self, pos: &Position) -> Result<f32, EvalError> {
        let balance =
            Self::side_points(pos, Color::White) - Self::side_points(pos, Color::Black);
        let white = (balance as f32 / MATERIAL_SCALE).tanh();
        Ok(match self.convention {
            ScoreConvention::SideToMove if !pos.status.is_white() => -white,
            _ => white,
        })
    }
}
