//! Enumeration of complete turns.
//!
//! A turn may consist of several captures by the same piece. [`Turns`]
//! walks those chains depth-first with an explicit stack of
//! [`Successors`] iterators, one per chain level, and only yields
//! positions in which the turn has passed to the opponent.

use crate::game_state::BoardState;
use crate::movegen::Successors;

/// Lazy depth-first iterator over the complete turns playable from a
/// position.
#[derive(Debug, Clone)]
pub struct Turns {
    stack: Vec<Successors>,
}

impl Turns {
    pub fn new(board: BoardState) -> Self {
        Self {
            stack: vec![board.successors()],
        }
    }
}

impl Iterator for Turns {
    type Item = BoardState;

    fn next(&mut self) -> Option<BoardState> {
        while let Some(mut level) = self.stack.pop() {
            let Some(child) = level.next() else {
                continue;
            };
            self.stack.push(level);

            if !child.is_continuation() {
                return Some(child);
            }
            self.stack.push(child.successors());
        }
        None
    }
}

impl BoardState {
    /// Every complete turn the side to move can play, capture chains
    /// followed to their end.
    pub fn turns(&self) -> Turns {
        Turns::new(*self)
    }

    /// Whether the side to move has at least one complete turn.
    ///
    /// A side without pieces has none.
    pub fn has_legal_turn(&self) -> bool {
        self.turns().next().is_some()
    }
}

/// Counts the positions reached after exactly `depth` complete turns.
pub fn perft(board: &BoardState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    if depth == 1 {
        return board.turns().count() as u64;
    }
    board.turns().map(|child| perft(&child, depth - 1)).sum()
}
