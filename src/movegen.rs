//! One-ply move and capture search.
//!
//! Every (square, direction, capture-or-step) combination is one probe in
//! `0..256`:
//!
//! | bits | meaning |
//! |------|---------|
//! | 0-1  | direction: 0 = NE, 1 = NW, 2 = SE, 3 = SW |
//! | 2-6  | bit position of the moving piece |
//! | 7    | clear for captures, set for simple moves |
//!
//! Captures occupy the lower half so a scan meets all of them before any
//! simple move. Once a scan has produced a capture it never reaches the
//! simple-move half, which makes capturing mandatory.

use crate::game_state::{Bitboard, BoardState, FIRST_SIMPLE_PROBE, SearchWindow, Side, Square};

/// Squares a piece cannot step from in each direction without leaving
/// the board.
const MOVE_EDGE: [u32; 4] = [0xF080_8080, 0xF101_0101, 0x8080_808F, 0x0101_010F];

/// Squares a piece cannot jump from in each direction.
const CAPTURE_EDGE: [u32; 4] = [0xFF88_8888, 0xFF11_1111, 0x8888_88FF, 0x1111_11FF];

/// A decoded probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Probe {
    bit: u32,
    direction: usize,
    capture: bool,
}

impl Probe {
    #[inline]
    fn decode(index: u16) -> Self {
        Self {
            bit: u32::from((index >> 2) & 31),
            direction: usize::from(index & 3),
            capture: index < FIRST_SIMPLE_PROBE,
        }
    }

    #[inline]
    fn west(self) -> u32 {
        (self.direction & 1) as u32
    }

    #[inline]
    fn south(self) -> u32 {
        ((self.direction >> 1) & 1) as u32
    }

    /// Whether this direction leads towards `side`'s promotion row.
    #[inline]
    fn is_forward(self, side: Side) -> bool {
        (self.south() == 1) == (side == Side::Black)
    }

    /// Whether the probe would leave the board from its square.
    #[inline]
    fn off_board(self) -> bool {
        let edge = if self.capture {
            CAPTURE_EDGE[self.direction]
        } else {
            MOVE_EDGE[self.direction]
        };
        edge & (1 << self.bit) != 0
    }

    /// Diagonal neighbour in the probe's direction.
    ///
    /// Rows hold four squares each but alternate their file offset: going
    /// north-west from an even row is +3, from an odd row +4. Odd rows add
    /// one to every step; west subtracts one, south subtracts eight.
    #[inline]
    fn adjacent(self) -> u32 {
        let odd = (self.bit >> 2) & 1;
        self.bit + 4 + odd - self.west() - 8 * self.south()
    }

    /// Landing square two diagonal steps away. Parity cancels out.
    #[inline]
    fn landing(self) -> u32 {
        self.bit + 9 - 2 * self.west() - 16 * self.south()
    }
}

/// Lazy iterator over the one-ply successors of a position.
///
/// Yields both complete turns and continuation positions (a capture chain
/// that must go on). Use [`BoardState::turns`] to walk chains to their
/// end.
#[derive(Debug, Clone)]
pub struct Successors {
    board: BoardState,
    next: u16,
    has_captured: bool,
}

impl Successors {
    pub fn new(board: BoardState) -> Self {
        Self {
            board,
            next: board.window().start(),
            has_captured: false,
        }
    }

    /// Applies one probe, or returns `None` if it is not legal here.
    fn apply(&self, probe: Probe) -> Option<BoardState> {
        let board = &self.board;
        let side = board.side_to_move();
        let mover = board.occupants(side);
        let opponent = board.occupants(!side);
        let empty = board.empty();
        let origin = Bitboard::new(1 << probe.bit);

        if (mover & origin).is_empty() || probe.off_board() {
            return None;
        }

        let was_flying = !(board.flying() & origin).is_empty();
        if !was_flying && !probe.is_forward(side) {
            return None;
        }

        let adjacent = Bitboard::new(1 << probe.adjacent());
        let (destination, captured) = if probe.capture {
            let landing = Bitboard::new(1 << probe.landing());
            if (adjacent & opponent).is_empty() || (landing & empty).is_empty() {
                return None;
            }
            (landing, adjacent)
        } else {
            if (adjacent & empty).is_empty() {
                return None;
            }
            (adjacent, Bitboard::EMPTY)
        };

        let new_mover = mover ^ origin ^ destination;
        let new_opponent = opponent ^ captured;
        let (white, black) = match side {
            Side::White => (new_mover, new_opponent),
            Side::Black => (new_opponent, new_mover),
        };

        let promoted = destination & side.promotion_row();
        let carried = if was_flying {
            origin | destination
        } else {
            Bitboard::EMPTY
        };
        let flying = (board.flying() ^ carried ^ (board.flying() & captured)) | promoted;

        // A man that promotes on landing ends the chain.
        let continues = probe.capture && (was_flying || promoted.is_empty());
        let (side_to_move, window) = if continues {
            let square = Square::new(probe.landing() as u8)?;
            (side, SearchWindow::captures_from(square))
        } else {
            (!side, SearchWindow::FULL)
        };

        Some(BoardState::from_parts(
            white,
            black,
            flying,
            side_to_move,
            window,
        ))
    }
}

impl Iterator for Successors {
    type Item = BoardState;

    fn next(&mut self) -> Option<BoardState> {
        let end = self.board.window().end();
        while self.next < end {
            let probe = Probe::decode(self.next);
            self.next += 1;

            if !probe.capture && self.has_captured {
                self.next = end;
                break;
            }

            if let Some(child) = self.apply(probe) {
                if probe.capture {
                    self.has_captured = true;
                }
                log::trace!(
                    "probe {} yields {:?} to move",
                    self.next - 1,
                    child.side_to_move()
                );
                return Some(child);
            }
        }

        // A chain with nothing left to capture hands the turn over.
        if !self.has_captured && self.board.is_continuation() {
            self.has_captured = true;
            return Some(self.board.pass_turn());
        }

        None
    }
}

impl BoardState {
    /// One-ply successors: complete turns and capture-chain continuations.
    pub fn successors(&self) -> Successors {
        Successors::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::Piece;
    use test_case::test_case;

    fn sq(name: &str) -> Square {
        name.parse().expect("test square is invalid")
    }

    fn mask(names: &[&str]) -> Bitboard {
        names.iter().map(|name| sq(name)).collect()
    }

    fn board(white: &[&str], black: &[&str], flying: &[&str], side: Side) -> BoardState {
        BoardState::new(mask(white), mask(black), mask(flying), side).expect("invalid test board")
    }

    #[test_case("c3", 0, "d4"; "ne from even row")]
    #[test_case("c3", 1, "b4"; "nw from even row")]
    #[test_case("c3", 2, "d2"; "se from even row")]
    #[test_case("c3", 3, "b2"; "sw from even row")]
    #[test_case("d4", 0, "e5"; "ne from odd row")]
    #[test_case("d4", 1, "c5"; "nw from odd row")]
    #[test_case("d4", 2, "e3"; "se from odd row")]
    #[test_case("d4", 3, "c3"; "sw from odd row")]
    fn test_probe_adjacent(from: &str, direction: usize, to: &str) {
        let probe = Probe {
            bit: u32::from(sq(from).value()),
            direction,
            capture: false,
        };
        assert_eq!(probe.adjacent(), u32::from(sq(to).value()));
    }

    #[test_case("c3", 0, "e5"; "capture ne")]
    #[test_case("c3", 1, "a5"; "capture nw")]
    #[test_case("f6", 2, "h4"; "capture se")]
    #[test_case("f6", 3, "d4"; "capture sw")]
    fn test_probe_landing(from: &str, direction: usize, to: &str) {
        let probe = Probe {
            bit: u32::from(sq(from).value()),
            direction,
            capture: true,
        };
        assert_eq!(probe.landing(), u32::from(sq(to).value()));
    }

    #[test]
    fn test_probe_decode() {
        assert_eq!(
            Probe::decode(37),
            Probe {
                bit: 9,
                direction: 1,
                capture: true
            }
        );
        assert_eq!(
            Probe::decode(128 + 37),
            Probe {
                bit: 9,
                direction: 1,
                capture: false
            }
        );
    }

    #[test]
    fn test_edge_masks_block_wrapping() {
        // h2 has no north-east neighbour, a3 no north-west one.
        let h2 = Probe::decode(128 + (u16::from(sq("h2").value()) << 2));
        let a3 = Probe::decode(128 + (u16::from(sq("a3").value()) << 2) + 1);
        assert!(h2.off_board());
        assert!(a3.off_board());
    }

    #[test]
    fn test_initial_position_has_seven_advances() {
        let children: Vec<BoardState> = BoardState::default().successors().collect();

        assert_eq!(children.len(), 7);
        for child in &children {
            assert_eq!(child.side_to_move(), Side::Black);
            assert!(!child.is_continuation());
            assert_eq!(child.piece_count(Side::White), 12);
            assert_eq!(child.black(), BoardState::default().black());
        }
    }

    #[test]
    fn test_black_moves_south() {
        let start = BoardState::default();
        let black_start =
            BoardState::new(start.white(), start.black(), Bitboard::EMPTY, Side::Black)
                .expect("valid layout");
        let children: Vec<BoardState> = black_start.successors().collect();

        assert_eq!(children.len(), 7);
        assert_eq!(
            children[0].black(),
            mask(&[
                "c5", "d6", "f6", "h6", "a7", "c7", "e7", "g7", "b8", "d8", "f8", "h8"
            ])
        );
    }

    #[test]
    fn test_single_capture_is_a_continuation_first() {
        let start = board(&["c3"], &["d4", "h8"], &[], Side::White);
        let children: Vec<BoardState> = start.successors().collect();

        assert_eq!(children.len(), 1);
        let child = children[0];
        assert_eq!(child.white(), mask(&["e5"]));
        assert_eq!(child.black(), mask(&["h8"]));
        assert_eq!(child.side_to_move(), Side::White);
        assert_eq!(child.window(), SearchWindow::captures_from(sq("e5")));
    }

    #[test]
    fn test_exhausted_chain_passes_turn() {
        let start = board(&["c3"], &["d4", "h8"], &[], Side::White);
        let chain = start.successors().next().expect("capture available");
        let ends: Vec<BoardState> = chain.successors().collect();

        assert_eq!(ends.len(), 1);
        assert_eq!(ends[0].white(), chain.white());
        assert_eq!(ends[0].black(), chain.black());
        assert_eq!(ends[0].side_to_move(), Side::Black);
        assert!(!ends[0].is_continuation());
    }

    #[test]
    fn test_continuation_only_probes_forced_piece() {
        // a3 could capture b4 on a fresh turn, but the chain belongs to e5.
        let chain = BoardState::from_parts(
            mask(&["a3", "e5"]),
            mask(&["b4", "f6"]),
            Bitboard::EMPTY,
            Side::White,
            SearchWindow::captures_from(sq("e5")),
        );
        let children: Vec<BoardState> = chain.successors().collect();

        assert_eq!(children.len(), 1);
        assert_eq!(children[0].white(), mask(&["a3", "g7"]));
        assert_eq!(children[0].black(), mask(&["b4"]));
        assert_eq!(children[0].window(), SearchWindow::captures_from(sq("g7")));
    }

    #[test]
    fn test_capture_suppresses_simple_moves() {
        let start = board(&["c3", "g3"], &["d4", "h8"], &[], Side::White);
        let children: Vec<BoardState> = start.successors().collect();

        assert_eq!(children.len(), 1);
        assert_eq!(children[0].black(), mask(&["h8"]));
    }

    #[test]
    fn test_men_do_not_move_backwards() {
        let start = board(&["e5"], &["a1"], &[], Side::White);
        let children: Vec<BoardState> = start.successors().collect();

        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.white().first().is_some_and(|s| s.row() == 5)));
    }

    #[test]
    fn test_flying_piece_moves_in_all_directions() {
        let start = board(&["e5"], &["a1"], &["e5"], Side::White);
        let targets: Vec<Bitboard> = start.successors().map(|c| c.white()).collect();

        assert_eq!(
            targets,
            vec![mask(&["f6"]), mask(&["d6"]), mask(&["f4"]), mask(&["d4"])]
        );
    }

    #[test]
    fn test_flying_flag_follows_the_piece() {
        let start = board(&["e5"], &["a1"], &["e5"], Side::White);

        for child in start.successors() {
            assert_eq!(child.flying(), child.white());
        }
    }

    #[test]
    fn test_promotion_on_reaching_back_row() {
        let start = board(&["c7"], &["a1"], &[], Side::White);
        let children: Vec<BoardState> = start.successors().collect();

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].flying(), mask(&["d8"]));
        assert_eq!(children[1].flying(), mask(&["b8"]));
        assert_eq!(
            children[0].piece_at(sq("d8")),
            Some(Piece {
                side: Side::White,
                flying: true
            })
        );
    }

    #[test]
    fn test_black_promotes_on_first_row() {
        let start = board(&["h8"], &["d2"], &[], Side::Black);
        let children: Vec<BoardState> = start.successors().collect();

        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.flying() == c.black()));
    }

    #[test]
    fn test_promoting_capture_ends_turn() {
        // After landing on d8 another jump over e7 would exist.
        let start = board(&["b6"], &["c7", "e7"], &[], Side::White);
        let children: Vec<BoardState> = start.successors().collect();

        assert_eq!(children.len(), 1);
        assert_eq!(children[0].white(), mask(&["d8"]));
        assert_eq!(children[0].flying(), mask(&["d8"]));
        assert_eq!(children[0].side_to_move(), Side::Black);
        assert!(!children[0].is_continuation());
    }

    #[test]
    fn test_flying_piece_returning_to_back_row_stays_flying() {
        let start = board(&["c7"], &["a1"], &["c7"], Side::White);

        for child in start.successors() {
            assert_eq!(child.flying(), child.white());
        }
    }

    #[test]
    fn test_capturing_flying_piece_clears_its_flag() {
        let start = board(&["c3"], &["d4", "h8"], &["d4", "h8"], Side::White);
        let child = start.successors().next().expect("capture available");

        assert_eq!(child.flying(), mask(&["h8"]));
    }

    #[test]
    fn test_flying_capture_continues_chain() {
        let start = board(&["e3"], &["d4", "b4", "h8"], &["e3"], Side::White);
        let child = start.successors().next().expect("capture available");

        assert_eq!(child.white(), mask(&["c5"]));
        assert_eq!(child.flying(), mask(&["c5"]));
        assert_eq!(child.window(), SearchWindow::captures_from(sq("c5")));
    }

    #[test]
    fn test_blocked_side_has_no_successors() {
        let start = board(&["d8"], &["a1"], &[], Side::White);
        assert_eq!(start.successors().count(), 0);
    }
}
