//! Depth-indexed recursion state shared by one search or perft run.
//!
//! Slot `d` belongs to the node at remaining depth `d`. A node reads its own
//! slots on entry and writes slot `d - 1` for each child just before
//! recursing; siblings overwrite each other's child slots, so nothing may
//! hold on to a slot value across sibling calls.

use super::attack_tables::{king_attacks, knight_attacks, pawn_attacks};
use super::{Bitboard, Move, MoveKind, Piece, Position};

/// Deepest search the movestack is sized for.
pub const MAX_DEPTH: usize = 18;

const SLOTS: usize = MAX_DEPTH + 1;

#[derive(Clone, Debug)]
pub struct Movestack {
    /// King attacks of the side to move at each depth
    atk_king: [Bitboard; SLOTS],
    /// King attacks of the side not to move
    atk_eking: [Bitboard; SLOTS],
    /// Square of a pawn or knight giving check, or `ALL`
    check_status: [Bitboard; SLOTS],
}

impl Movestack {
    #[must_use]
    pub fn new() -> Self {
        Movestack {
            atk_king: [Bitboard::EMPTY; SLOTS],
            atk_eking: [Bitboard::EMPTY; SLOTS],
            check_status: [Bitboard::ALL; SLOTS],
        }
    }

    /// Seed the root slots at `depth` from scratch. `depth` must not exceed
    /// [`MAX_DEPTH`]; the search validates it before calling.
    pub fn init(&mut self, pos: &Position, depth: usize) {
        let board = &pos.board;
        let us = pos.status.side_to_move;
        let them = us.opponent();
        let king = board.king_square(us);

        self.atk_king[depth] = king_attacks(king);
        self.atk_eking[depth] = king_attacks(board.king_square(them));

        let leapers = (knight_attacks(king) & board.pieces(them, Piece::Knight))
            | (pawn_attacks(us, king) & board.pieces(them, Piece::Pawn));
        self.check_status[depth] = match leapers.popcount() {
            0 => Bitboard::ALL,
            1 => leapers,
            // Only reachable from a hand-made position; nothing but the king can answer
            _ => Bitboard::EMPTY,
        };
    }

    #[inline]
    pub(crate) fn check_status(&self, depth: usize) -> Bitboard {
        self.check_status[depth]
    }

    #[inline]
    pub(crate) fn own_king_attacks(&self, depth: usize) -> Bitboard {
        self.atk_king[depth]
    }

    #[inline]
    pub(crate) fn enemy_king_attacks(&self, depth: usize) -> Bitboard {
        self.atk_eking[depth]
    }

    /// Node entry: the enemy king becomes the child's own king, and the
    /// child starts with no leaper check.
    #[inline]
    pub(crate) fn begin_node(&mut self, depth: usize, enemy_king_attacks: Bitboard) {
        self.atk_king[depth - 1] = enemy_king_attacks;
        self.check_status[depth - 1] = Bitboard::ALL;
    }

    /// Prepare the child slots for `mv` played from `pos` at `depth`.
    pub(crate) fn enter_child(&mut self, pos: &Position, depth: usize, mv: &Move) {
        let us = pos.status.side_to_move;
        let their_king = pos.board.king_square(us.opponent());

        self.atk_eking[depth - 1] = if mv.is_king_step() {
            king_attacks(mv.to)
        } else {
            self.atk_king[depth]
        };

        let gives_check = match mv.kind {
            MoveKind::PawnMove | MoveKind::PawnCapture | MoveKind::PawnPush | MoveKind::EnPassant => {
                pawn_attacks(us, mv.to).contains(their_king)
            }
            MoveKind::Knight => knight_attacks(mv.to).contains(their_king),
            MoveKind::Promotion => {
                mv.promotion == Some(Piece::Knight) && knight_attacks(mv.to).contains(their_king)
            }
            _ => false,
        };
        if gives_check {
            self.check_status[depth - 1] = Bitboard::from_square(mv.to);
        }
    }

    /// Undo the child's check slot; must run on every exit path of the child.
    #[inline]
    pub(crate) fn leave_child(&mut self, depth: usize) {
        self.check_status[depth - 1] = Bitboard::ALL;
    }
}

impl Default for Movestack {
    fn default() -> Self {
        Movestack::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_root_seeds_pawn_checker() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1");
        let mut stack = Movestack::new();
        stack.init(&pos, 3);
        assert_eq!(stack.check_status(3), Bitboard::from_square(sq("d2")));
        assert_eq!(stack.own_king_attacks(3), king_attacks(sq("e1")));
        assert_eq!(stack.enemy_king_attacks(3), king_attacks(sq("e8")));
    }

    #[test]
    fn test_knight_check_registers_and_clears() {
        let pos = Position::from_fen("4k3/8/8/8/6N1/8/8/4K3 w - - 0 1");
        let mut stack = Movestack::new();
        stack.init(&pos, 2);
        let mv = Move::new(MoveKind::Knight, sq("g4"), sq("f6"));
        stack.enter_child(&pos, 2, &mv);
        assert_eq!(stack.check_status(1), Bitboard::from_square(sq("f6")));
        assert_eq!(stack.enemy_king_attacks(1), stack.own_king_attacks(2));
        stack.leave_child(2);
        assert_eq!(stack.check_status(1), Bitboard::ALL);
    }

    #[test]
    fn test_king_step_moves_enemy_king_slot() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let mut stack = Movestack::new();
        stack.init(&pos, 2);
        let mv = Move::new(MoveKind::King, sq("e1"), sq("d2"));
        stack.enter_child(&pos, 2, &mv);
        assert_eq!(stack.enemy_king_attacks(1), king_attacks(sq("d2")));
    }
}
