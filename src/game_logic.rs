use crate::TurnSelector;
use crate::game_state::{Bitboard, BoardState, Side, Square};
use crate::traversal::Turns;

/// Finds the position a human move from `from` to `to` leads to.
///
/// Only the one-ply expansion of `board` is searched, so during a capture
/// chain the move must continue the chain. Returns `None` for illegal
/// moves.
///
/// When the move is a capture that must be followed by another one, the
/// continuation position is returned and its side to move is unchanged;
/// the caller should ask for the next jump of the same piece. A capture
/// that turns out to end the chain returns the position with the turn
/// already handed over.
pub fn resolve_move(board: &BoardState, from: Square, to: Square) -> Option<BoardState> {
    let side = board.side_to_move();
    if !board.occupants(side).contains(from) || !board.empty().contains(to) {
        log::debug!("{side} {from}-{to} rejected: needs own piece onto empty square");
        return None;
    }
    let expected = board.occupants(side) ^ from.mask() ^ to.mask();

    let Some(matched) = board
        .successors()
        .find(|child| child.occupants(side) == expected)
    else {
        log::debug!("{side} {from}-{to} rejected: no matching move");
        return None;
    };

    if !matched.is_continuation() {
        return Some(matched);
    }

    let next = matched.successors().next()?;
    if next.side_to_move() == matched.side_to_move() {
        log::debug!("{side} {from}-{to} must continue capturing from {to}");
        Some(matched)
    } else {
        Some(next)
    }
}

/// What changed between two consecutive positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Update {
    /// Square the mover left and the square it arrived on.
    pub moved: Option<(Square, Square)>,
    /// Opponent pieces that were removed, every jumped square of a chain.
    pub captured: Bitboard,
    /// Square where a piece became a flying piece.
    pub promotion: Option<Square>,
}

impl Update {
    /// Derives the update from the position before and after one step.
    ///
    /// `after` must follow from `before` by a single move, capture or
    /// capture chain of `before`'s side to move.
    pub fn between(before: &BoardState, after: &BoardState) -> Self {
        let side = before.side_to_move();
        let mover_before = before.occupants(side);
        let mover_after = after.occupants(side);

        let vacated = (mover_before & !mover_after).single_square();
        let arrived = (mover_after & !mover_before).single_square();
        let moved = vacated.zip(arrived);

        let promoted = after.flying() & !before.flying() & mover_after;

        Self {
            moved,
            captured: before.occupants(!side) & !after.occupants(!side),
            promotion: promoted.single_square(),
        }
    }

    /// True when nothing on the board changed (a finished chain passing
    /// the turn).
    pub fn is_empty(&self) -> bool {
        self.moved.is_none() && self.captured.is_empty() && self.promotion.is_none()
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Side),
    Draw,
}

/// Session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameConfig {
    /// Completed turns after which the game is drawn. `None` plays until
    /// one side cannot move.
    pub move_limit: Option<u32>,
}

/// A game in progress: the current position plus bookkeeping.
#[derive(Clone, PartialEq, Eq)]
pub struct GameEngine {
    position: BoardState,
    config: GameConfig,
    /// Completed turns, a capture chain counting once.
    turns_played: u32,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    #[inline]
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    #[inline]
    pub fn with_config(config: GameConfig) -> Self {
        Self::from_position(BoardState::default(), config)
    }

    /// Creates a GameEngine from an existing position.
    pub fn from_position(position: BoardState, config: GameConfig) -> Self {
        Self {
            position,
            config,
            turns_played: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> &BoardState {
        &self.position
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    /// Complete turns available from the current position.
    pub fn legal_turns(&self) -> Turns {
        self.position.turns()
    }

    /// Result of the game, or `None` while it is still going.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.position.has_legal_turn() {
            return Some(Outcome::Win(!self.position.side_to_move()));
        }
        match self.config.move_limit {
            Some(limit) if self.turns_played >= limit => Some(Outcome::Draw),
            _ => None,
        }
    }

    /// Plays a human move.
    ///
    /// Returns `None` and leaves the game untouched if the move is illegal
    /// or the game is over. Mid-chain the returned position keeps the same
    /// side to move and the next call must continue with the same piece.
    pub fn play(&mut self, from: Square, to: Square) -> Option<Update> {
        if self.outcome().is_some() {
            return None;
        }
        let next = resolve_move(&self.position, from, to)?;
        Some(self.advance(next))
    }

    /// Lets `selector` pick one of the complete turns and plays it.
    pub fn play_selected<S: TurnSelector + ?Sized>(&mut self, selector: &mut S) -> Option<Update> {
        if self.outcome().is_some() {
            return None;
        }
        let turns: Vec<BoardState> = self.legal_turns().collect();
        let index = selector.select(&self.position, &turns)?;
        let next = *turns.get(index)?;
        Some(self.advance(next))
    }

    fn advance(&mut self, next: BoardState) -> Update {
        let update = Update::between(&self.position, &next);
        let mover = self.position.side_to_move();

        if next.side_to_move() != mover {
            self.turns_played += 1;
        }
        self.position = next;

        log::debug!("{mover} played {update:?}");
        if let Some(outcome) = self.outcome() {
            log::info!("game over after {} turns: {outcome:?}", self.turns_played);
        }
        update
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("white", &format_args!("{:#010X}", self.position.white()))
            .field("black", &format_args!("{:#010X}", self.position.black()))
            .field("flying", &format_args!("{:#010X}", self.position.flying()))
            .field("side_to_move", &self.position.side_to_move())
            .field("turns_played", &self.turns_played)
            .finish()
    }
}
