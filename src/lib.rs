//! Rules and move generation for 8×8 checkers with mandatory captures,
//! multi-jump chains and promotion to flying pieces.
//!
//! Positions are immutable [`BoardState`](game_state::BoardState) values.
//! [`BoardState::turns`](game_state::BoardState::turns) enumerates every
//! complete turn, and [`game_logic::GameEngine`] plays a game from human
//! (from, to) input or from a [`TurnSelector`].

use game_logic::Update;
use game_state::{BoardState, Square};

pub mod game_logic;
pub mod game_state;
pub mod movegen;
pub mod traversal;

/// Trait for reading move proposals from a player.
///
/// Abstracts over interactive input (terminal) and scripted inputs,
/// providing a uniform interface for `GameEngine`.
pub trait MoveSource {
    /// Error type for input failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Next (from, to) pair to try in `position`, or `None` when the
    /// source is exhausted.
    fn next_move(&mut self, position: &BoardState) -> Result<Option<(Square, Square)>, Self::Error>;
}

/// Trait for picking one complete turn among the legal ones.
///
/// Implemented by search strategies living outside this crate.
pub trait TurnSelector {
    /// Index into `turns`, or `None` to decline.
    fn select(&mut self, position: &BoardState, turns: &[BoardState]) -> Option<usize>;
}

/// Trait for displaying the board to the players.
///
/// Mirrors [`MoveSource`] on the output side of the game loop.
pub trait BoardDisplay {
    /// Error type for display update failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Show `position`, highlighting the squares touched by `last`.
    fn show(&mut self, position: &BoardState, last: Option<&Update>) -> Result<(), Self::Error>;
}

pub mod mock;
