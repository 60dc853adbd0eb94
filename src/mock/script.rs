use std::collections::VecDeque;
use std::convert::Infallible;

use thiserror::Error;

use crate::MoveSource;
use crate::game_state::{BoardState, Square};

/// Error when parsing a move script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid square notation: '{0}'")]
    Square(String),
    #[error("a move needs exactly two squares, got {0}")]
    Arity(usize),
}

/// A scriptable move source that replays queued (from, to) pairs.
///
/// New script can be appended at any time for interactive use.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMoves {
    pending: VecDeque<(Square, Square)>,
}

impl ScriptedMoves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of moves still queued.
    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Parse and queue additional moves.
    ///
    /// Format:
    /// - Squares are 2 characters (e.g., "c3", "d4")
    /// - Spaces between squares are optional
    /// - Periods (". ") end a move
    ///
    /// Examples:
    /// - `"c3d4."` - Move c3 to d4
    /// - `"c3 d4. f6 e5."` - Two moves
    /// - `"c3e5. e5g7."` - A double capture, one jump per move
    ///
    /// Nothing is queued if any part of the script is invalid.
    pub fn push_script(&mut self, script: &str) -> Result<(), ParseError> {
        let moves = parse_script(script)?;
        self.pending.extend(moves);
        Ok(())
    }
}

impl MoveSource for ScriptedMoves {
    type Error = Infallible;

    fn next_move(
        &mut self,
        _position: &BoardState,
    ) -> Result<Option<(Square, Square)>, Infallible> {
        Ok(self.pending.pop_front())
    }
}

/// Parse a move script into (from, to) pairs.
fn parse_script(script: &str) -> Result<Vec<(Square, Square)>, ParseError> {
    let mut batches: Vec<Vec<Square>> = vec![Vec::new()];
    let mut current_token = String::new();

    for ch in script.chars() {
        match ch {
            '.' => {
                flush_token(&mut current_token, &mut batches)?;
                batches.push(Vec::new());
            }
            c if c.is_whitespace() => {
                flush_token(&mut current_token, &mut batches)?;
            }
            _ => {
                current_token.push(ch);

                // Squares are exactly 2 characters (e.g., "c3", "d4")
                if current_token.chars().count() == 2 {
                    flush_token(&mut current_token, &mut batches)?;
                }
            }
        }
    }

    // Flush any remaining token
    flush_token(&mut current_token, &mut batches)?;

    batches
        .into_iter()
        .filter(|batch| !batch.is_empty())
        .map(|batch| match batch[..] {
            [from, to] => Ok((from, to)),
            _ => Err(ParseError::Arity(batch.len())),
        })
        .collect()
}

/// Add current token to the last batch and clear it.
fn flush_token(token: &mut String, batches: &mut [Vec<Square>]) -> Result<(), ParseError> {
    if token.is_empty() {
        return Ok(());
    }
    let square: Square = token
        .trim()
        .parse()
        .map_err(|_| ParseError::Square(token.clone()))?;
    if let Some(batch) = batches.last_mut() {
        batch.push(square);
    }
    token.clear();
    Ok(())
}
