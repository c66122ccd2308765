//! Perft: legal move path counting for move generator verification.

use super::movegen::{count, enumerate, enumerate_king, refresh, MoveVisitor};
use super::movestack::{Movestack, MAX_DEPTH};
use super::{Move, Position};

/// Visitor that recurses into every move it receives.
struct PerftVisitor<'a> {
    parent: &'a Position,
    stack: &'a mut Movestack,
    depth: usize,
    nodes: u64,
}

impl MoveVisitor for PerftVisitor<'_> {
    fn on_move(&mut self, mv: Move) {
        let child = self.parent.play(&mv);
        self.stack.enter_child(self.parent, self.depth, &mv);
        self.nodes += perft_node(&child, self.stack, self.depth - 1);
        self.stack.leave_child(self.depth);
    }
}

fn perft_node(pos: &Position, stack: &mut Movestack, depth: usize) -> u64 {
    let masks = refresh(pos, stack, depth);
    if depth == 1 {
        return count(pos, &masks);
    }
    let mut visitor = PerftVisitor {
        parent: pos,
        stack,
        depth,
        nodes: 0,
    };
    enumerate(pos, &masks, &mut visitor);
    enumerate_king(pos, &masks, &mut visitor);
    visitor.nodes
}

/// Number of legal move paths of length `depth` from `pos`.
///
/// # Panics
/// Panics if `depth` exceeds [`MAX_DEPTH`].
#[must_use]
pub fn perft(pos: &Position, depth: usize) -> u64 {
    assert!(depth <= MAX_DEPTH, "perft depth {depth} exceeds {MAX_DEPTH}");
    if depth == 0 {
        return 1;
    }
    let mut stack = Movestack::new();
    stack.init(pos, depth);
    perft_node(pos, &mut stack, depth)
}

/// Perft split by root move, in generation order.
///
/// # Panics
/// Panics if `depth` is zero or exceeds [`MAX_DEPTH`].
#[must_use]
pub fn divide(pos: &Position, depth: usize) -> Vec<(Move, u64)> {
    assert!(
        (1..=MAX_DEPTH).contains(&depth),
        "divide depth {depth} outside 1..={MAX_DEPTH}"
    );
    let mut stack = Movestack::new();
    stack.init(pos, depth);
    let masks = refresh(pos, &mut stack, depth);

    pos.legal_moves_with(&masks)
        .into_iter()
        .map(|mv| {
            let nodes = if depth == 1 {
                1
            } else {
                let child = pos.play(&mv);
                stack.enter_child(pos, depth, &mv);
                let nodes = perft_node(&child, &mut stack, depth - 1);
                stack.leave_child(depth);
                nodes
            };
            (mv, nodes)
        })
        .collect()
}
