use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};
use std::str::FromStr;

/// Number of playable (dark) squares.
pub const NUM_SQUARES: u8 = 32;

/// Number of squares on the full 8×8 grid.
pub const NUM_DISPLAY_SQUARES: u8 = 64;

/// Converts a display index (0-63) to its bit position (0-31).
///
/// Only meaningful for playable display indices; light squares collapse
/// onto the dark square next to them.
#[inline]
pub const fn display_to_bit(display: u8) -> u8 {
    display >> 1
}

/// Converts a bit position (0-31) to its display index (0-63).
///
/// Odd rows are shifted one file to the right, so the offset depends on
/// the row parity of `bit`.
#[inline]
pub const fn bit_to_display(bit: u8) -> u8 {
    (bit << 1) + ((bit >> 2) & 1)
}

/// Returns true if the display index names a dark (playable) square.
#[inline]
pub const fn is_playable(display: u8) -> bool {
    display < NUM_DISPLAY_SQUARES && (display >> 3) & 1 == display & 1
}

/// A playable square, addressed by its bit position (0-31).
///
/// Bit positions run in rows of four from a1 (0) to h8 (31):
/// - row 0: a1, c1, e1, g1
/// - row 1: b2, d2, f2, h2
/// - ...
/// - row 7: b8, d8, f8, h8
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// Creates a new Square if the bit position is valid (0-31).
    #[inline]
    pub const fn new(bit: u8) -> Option<Self> {
        if bit < NUM_SQUARES {
            Some(Self(bit))
        } else {
            None
        }
    }

    /// Creates a Square from a display index, rejecting light squares.
    #[inline]
    pub const fn from_display(display: u8) -> Option<Self> {
        if is_playable(display) {
            Some(Self(display_to_bit(display)))
        } else {
            None
        }
    }

    /// Returns the bit position (0-31).
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the display index (0-63).
    #[inline]
    pub const fn display(self) -> u8 {
        bit_to_display(self.0)
    }

    /// Returns the board row (0-7), row 0 being white's home row.
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 >> 2
    }

    /// Returns the file ('a'-'h') of this square.
    pub fn file(self) -> char {
        (b'a' + self.display() % 8) as char
    }

    /// Returns the rank (1-8) of this square.
    pub fn rank(self) -> u8 {
        self.display() / 8 + 1
    }

    /// Single-bit mask for this square.
    #[inline]
    pub const fn mask(self) -> Bitboard {
        Bitboard(1 << self.0)
    }
}

/// Parse algebraic notation like "c3" into a Square.
///
/// # Examples
/// ```
/// # use checkers_engine::game_state::Square;
/// let square: Square = "c3".parse().unwrap();
/// assert_eq!(square.value(), 9);
/// assert_eq!(square.display(), 18);
/// ```
impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareParseError::WrongLength);
        };

        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            return Err(SquareParseError::BadFile);
        }
        let rank = rank.to_digit(10).ok_or(SquareParseError::BadRank)?;
        if !(1..=8).contains(&rank) {
            return Err(SquareParseError::BadRank);
        }

        let display = (rank as u8 - 1) * 8 + (file as u8 - b'a');
        Square::from_display(display).ok_or(SquareParseError::NotPlayable)
    }
}

/// Display square in algebraic notation (e.g., "c3").
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Error type for parsing square notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SquareParseError {
    #[error("square must be 2 characters (e.g., 'c3')")]
    WrongLength,
    #[error("file must be a-h")]
    BadFile,
    #[error("rank must be 1-8")]
    BadRank,
    #[error("pieces only stand on dark squares")]
    NotPlayable,
}

/// A set of playable squares.
///
/// Each bit represents one square: bit 0 = a1, bit 31 = h8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u32);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Creates a new bitboard with the given value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Bitboard(value)
    }

    /// Returns the underlying u32 value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, square: Square) -> bool {
        self.0 & (1 << square.0) != 0
    }

    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Lowest square in the set, if any.
    #[inline]
    pub const fn first(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square(self.0.trailing_zeros() as u8))
        }
    }

    /// The only square in the set, if it holds exactly one.
    #[inline]
    pub const fn single_square(self) -> Option<Square> {
        if self.0.is_power_of_two() {
            self.first()
        } else {
            None
        }
    }

    /// Iterates over the squares in the set, lowest first.
    #[inline]
    pub fn squares(self) -> Squares {
        Squares(self.0)
    }
}

/// Iterator over the squares of a [`Bitboard`].
#[derive(Debug, Clone)]
pub struct Squares(u32);

impl Iterator for Squares {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(Square(bit))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Squares {}

impl From<Square> for Bitboard {
    fn from(square: Square) -> Self {
        square.mask()
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter().fold(Bitboard::EMPTY, |bb, sq| bb | sq.mask())
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitXor for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitxor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl Not for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl fmt::UpperHex for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}
