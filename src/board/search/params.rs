/// How the evaluator's score is oriented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoreConvention {
    /// Positive favors White whoever is to move.
    #[default]
    Absolute,
    /// Positive favors the side to move; flipped for Black before use.
    SideToMove,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct SearchParams {
    pub convention: ScoreConvention,
    /// Evaluate the uncached children of depth-1 nodes in one batch call
    pub batch_leaves: bool,
    /// Search deeper when little material is left
    pub endgame_extension: bool,
    /// Prefer root moves that neither repeat nor allow a repetition
    pub avoid_repetition: bool,
    /// Material points (both sides, kings excluded) below which the depth grows
    pub extension_thresholds: [(u32, u32); 3],
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            convention: ScoreConvention::Absolute,
            batch_leaves: false,
            endgame_extension: true,
            avoid_repetition: true,
            extension_thresholds: [(5, 3), (10, 2), (20, 1)],
        }
    }
}

impl SearchParams {
    /// Extra plies for a position with `points` of material.
    #[must_use]
    pub fn depth_extension(&self, points: u32) -> u32 {
        if !self.endgame_extension {
            return 0;
        }
        self.extension_thresholds
            .iter()
            .find(|&&(below, _)| points < below)
            .map_or(0, |&(_, extra)| extra)
    }
}
