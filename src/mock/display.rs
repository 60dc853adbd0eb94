use std::io::{self, Write};

use crate::BoardDisplay;
use crate::game_logic::Update;
use crate::game_state::{BoardState, Piece, Side, Square};

/// Terminal-based board display for development and testing.
///
/// Renders the position as an 8×8 grid and colors the squares touched by
/// the last [`Update`] (origin, destination, capture, promotion).
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    /// Create a new terminal display.
    pub fn new() -> Self {
        Self
    }
}

/// Error type for terminal display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

impl BoardDisplay for TerminalDisplay {
    type Error = DisplayError;

    fn show(&mut self, position: &BoardState, last: Option<&Update>) -> Result<(), Self::Error> {
        render_board(&mut io::stdout(), position, last)
    }
}

/// How a square took part in the last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Highlight {
    Origin,
    Destination,
    Capture,
    Promotion,
}

fn highlight(square: Square, last: Option<&Update>) -> Option<Highlight> {
    let update = last?;
    if update.promotion == Some(square) {
        Some(Highlight::Promotion)
    } else if update.captured.contains(square) {
        Some(Highlight::Capture)
    } else {
        match update.moved {
            Some((from, _)) if from == square => Some(Highlight::Origin),
            Some((_, to)) if to == square => Some(Highlight::Destination),
            _ => None,
        }
    }
}

/// Render the board to any writer. Extracted for testability.
pub(crate) fn render_board(
    w: &mut impl Write,
    position: &BoardState,
    last: Option<&Update>,
) -> Result<(), DisplayError> {
    for rank in (0..8u8).rev() {
        write!(w, " {} ", rank + 1)?;
        for file in 0..8u8 {
            let cell = match Square::from_display(rank * 8 + file) {
                Some(square) => format_square(position.piece_at(square), highlight(square, last)),
                None => "   ".to_string(),
            };
            write!(w, "{cell}")?;
        }
        writeln!(w)?;
    }
    writeln!(w, "    a  b  c  d  e  f  g  h")?;
    writeln!(w, "{} to move", position.side_to_move())?;
    w.flush()?;
    Ok(())
}

/// Map a piece and highlight to an ANSI-colored cell string.
fn format_square(piece: Option<Piece>, highlight: Option<Highlight>) -> String {
    let symbol = match piece.map(|p| (p.side, p.flying)) {
        Some((Side::White, false)) => 'w',
        Some((Side::White, true)) => 'W',
        Some((Side::Black, false)) => 'b',
        Some((Side::Black, true)) => 'B',
        None => '·',
    };
    match highlight {
        Some(Highlight::Origin) => format!("\x1b[42m {symbol} \x1b[0m"),
        Some(Highlight::Destination) => format!("\x1b[44m {symbol} \x1b[0m"),
        Some(Highlight::Capture) => format!("\x1b[41m {symbol} \x1b[0m"),
        Some(Highlight::Promotion) => format!("\x1b[43m {symbol} \x1b[0m"),
        None => format!(" {symbol} "),
    }
}
