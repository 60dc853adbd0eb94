mod display;
mod script;
mod terminal;

pub use display::{DisplayError, TerminalDisplay};
pub use script::{ParseError, ScriptedMoves};
pub use terminal::run_interactive_terminal;

use crate::TurnSelector;
use crate::game_state::BoardState;

/// Deterministic stand-in for a search strategy: always plays the first
/// enumerated turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTurn;

impl TurnSelector for FirstTurn {
    fn select(&mut self, _position: &BoardState, turns: &[BoardState]) -> Option<usize> {
        if turns.is_empty() { None } else { Some(0) }
    }
}
