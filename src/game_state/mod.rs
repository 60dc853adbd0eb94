//! Immutable board positions.
//!
//! A [`BoardState`] packs a full position into three 32-bit masks: one
//! occupancy mask per side plus an overlay marking flying (promoted)
//! pieces. It also records whose turn it is and the [`SearchWindow`]
//! that scopes the next move search.

pub mod bitboard;

use std::fmt;

pub use bitboard::{
    Bitboard, NUM_DISPLAY_SQUARES, NUM_SQUARES, Square, SquareParseError, bit_to_display,
    display_to_bit, is_playable,
};

/// White's starting men: bit positions 0-11.
pub const WHITE_START: Bitboard = Bitboard::new(0x0000_0FFF);

/// Black's starting men: bit positions 20-31.
pub const BLACK_START: Bitboard = Bitboard::new(0xFFF0_0000);

/// Number of entries in the move-encoding space.
pub const NUM_PROBES: u16 = 256;

/// Probes below this index test captures, the rest simple moves.
pub const FIRST_SIMPLE_PROBE: u16 = 128;

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::White, Side::Black];

    #[inline]
    pub const fn opposite(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    /// Row this side's men promote on.
    #[inline]
    pub const fn promotion_row(self) -> Bitboard {
        match self {
            Side::White => Bitboard::new(0xF000_0000),
            Side::Black => Bitboard::new(0x0000_000F),
        }
    }
}

impl std::ops::Not for Side {
    type Output = Side;

    fn not(self) -> Side {
        self.opposite()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => f.write_str("White"),
            Side::Black => f.write_str("Black"),
        }
    }
}

/// A piece standing on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub side: Side,
    /// Promoted pieces step in all four diagonal directions.
    pub flying: bool,
}

/// Half-open range over the 256-entry move-encoding space.
///
/// The full window starts a fresh turn. A narrowed window covers the four
/// capture probes of a single square and marks a capture chain that must
/// continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchWindow {
    start: u16,
    end: u16,
}

impl SearchWindow {
    pub const FULL: SearchWindow = SearchWindow {
        start: 0,
        end: NUM_PROBES,
    };

    /// The four capture probes of `square`.
    #[inline]
    pub const fn captures_from(square: Square) -> SearchWindow {
        let start = (square.value() as u16) << 2;
        SearchWindow {
            start,
            end: start + 4,
        }
    }

    #[inline]
    pub const fn start(self) -> u16 {
        self.start
    }

    #[inline]
    pub const fn end(self) -> u16 {
        self.end
    }

    #[inline]
    pub const fn is_full(self) -> bool {
        self.start == Self::FULL.start && self.end == Self::FULL.end
    }

    /// The square a narrowed window is forcing, if any.
    pub fn forced_square(self) -> Option<Square> {
        if self.is_full() {
            None
        } else {
            Square::new((self.start >> 2) as u8)
        }
    }
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self::FULL
    }
}

/// Rejected explicit board layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("white and black pieces share squares {0:#010X}")]
    Overlap(u32),
    #[error("flying markers without an owning piece on {0:#010X}")]
    UnownedFlying(u32),
}

/// A complete, immutable board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardState {
    occupants: [Bitboard; 2],
    flying: Bitboard,
    side_to_move: Side,
    window: SearchWindow,
}

impl Default for BoardState {
    /// The starting position: twelve men each, white to move.
    fn default() -> Self {
        Self::from_parts(
            WHITE_START,
            BLACK_START,
            Bitboard::EMPTY,
            Side::White,
            SearchWindow::FULL,
        )
    }
}

impl BoardState {
    /// Builds a position at the start of `side_to_move`'s turn.
    pub fn new(
        white: Bitboard,
        black: Bitboard,
        flying: Bitboard,
        side_to_move: Side,
    ) -> Result<Self, BoardError> {
        let overlap = white & black;
        if !overlap.is_empty() {
            return Err(BoardError::Overlap(overlap.value()));
        }
        let unowned = flying & !(white | black);
        if !unowned.is_empty() {
            return Err(BoardError::UnownedFlying(unowned.value()));
        }
        Ok(Self::from_parts(
            white,
            black,
            flying,
            side_to_move,
            SearchWindow::FULL,
        ))
    }

    /// Assembles a position the move search has already validated.
    pub(crate) fn from_parts(
        white: Bitboard,
        black: Bitboard,
        flying: Bitboard,
        side_to_move: Side,
        window: SearchWindow,
    ) -> Self {
        debug_assert!((white & black).is_empty(), "occupancy masks overlap");
        debug_assert!(
            (flying & !(white | black)).is_empty(),
            "flying marker on an empty square"
        );
        Self {
            occupants: [white, black],
            flying,
            side_to_move,
            window,
        }
    }

    /// Same board, turn handed to the opponent with a fresh window.
    pub(crate) fn pass_turn(&self) -> Self {
        Self {
            side_to_move: !self.side_to_move,
            window: SearchWindow::FULL,
            ..*self
        }
    }

    #[inline]
    pub const fn white(&self) -> Bitboard {
        self.occupants[Side::White.index()]
    }

    #[inline]
    pub const fn black(&self) -> Bitboard {
        self.occupants[Side::Black.index()]
    }

    #[inline]
    pub const fn occupants(&self, side: Side) -> Bitboard {
        self.occupants[side.index()]
    }

    #[inline]
    pub const fn flying(&self) -> Bitboard {
        self.flying
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.white() | self.black()
    }

    #[inline]
    pub fn empty(&self) -> Bitboard {
        !self.occupied()
    }

    #[inline]
    pub const fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    #[inline]
    pub const fn window(&self) -> SearchWindow {
        self.window
    }

    /// True while a capture chain is in progress and the turn has not
    /// passed yet.
    #[inline]
    pub const fn is_continuation(&self) -> bool {
        !self.window.is_full()
    }

    /// Get the piece at a given square, if any
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let flying = self.flying.contains(square);
        Side::ALL
            .into_iter()
            .find(|&side| self.occupants(side).contains(square))
            .map(|side| Piece { side, flying })
    }

    #[inline]
    pub fn piece_count(&self, side: Side) -> u32 {
        self.occupants(side).count()
    }
}

/// Board diagram with rank 8 on top.
///
/// `●`/`◆` are white men/flying pieces, `○`/`◇` black ones. The header
/// marks the side to move.
impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.side_to_move {
            Side::White => '●',
            Side::Black => '○',
        };
        writeln!(f, "  a b c d e f g h  {marker}")?;
        writeln!(f, " ┌─┬─┬─┬─┬─┬─┬─┬─┐")?;
        for rank in (0..8u8).rev() {
            write!(f, "{}│", rank + 1)?;
            for file in 0..8u8 {
                let piece = Square::from_display(rank * 8 + file).and_then(|sq| self.piece_at(sq));
                let symbol = match piece.map(|p| (p.side, p.flying)) {
                    Some((Side::White, false)) => '●',
                    Some((Side::White, true)) => '◆',
                    Some((Side::Black, false)) => '○',
                    Some((Side::Black, true)) => '◇',
                    None => ' ',
                };
                write!(f, "{symbol}│")?;
            }
            writeln!(f)?;
        }
        writeln!(f, " └─┴─┴─┴─┴─┴─┴─┴─┘")
    }
}
