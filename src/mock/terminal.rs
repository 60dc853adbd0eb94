use std::io::{self, BufRead, Write};

use super::{FirstTurn, TerminalDisplay};
use crate::BoardDisplay;
use crate::game_logic::{GameConfig, GameEngine, Outcome, Update};
use crate::game_state::Square;

/// Clears the screen and moves cursor to top-left.
#[inline]
fn clear_screen() {
    print!("\x1B[2J\x1B[H");
}

/// Runs an interactive terminal game on stdin/stdout.
///
/// Both sides are played from the keyboard; `a` lets the first enumerated
/// turn play itself.
pub fn run_interactive_terminal(config: GameConfig) {
    let mut engine = GameEngine::with_config(config);
    let mut display = TerminalDisplay::new();
    let mut last: Option<Update> = None;

    redraw(&mut display, &engine, last.as_ref());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            log::error!("failed to flush stdout: {e}");
            break;
        }

        let input = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                log::error!("failed to read input: {e}");
                break;
            }
            None => break,
        };

        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            continue;
        };

        match command {
            "m" => {
                let [_, from, to] = parts[..] else {
                    println!("Usage: m <from> <to>");
                    continue;
                };
                match (from.parse::<Square>(), to.parse::<Square>()) {
                    (Ok(from), Ok(to)) => match engine.play(from, to) {
                        Some(update) => {
                            last = Some(update);
                            redraw(&mut display, &engine, last.as_ref());
                        }
                        None => println!("❌ Illegal move {from}-{to}"),
                    },
                    (Err(e), _) | (_, Err(e)) => println!("Invalid square: {e}"),
                }
            }
            "a" => match engine.play_selected(&mut FirstTurn) {
                Some(update) => {
                    last = Some(update);
                    redraw(&mut display, &engine, last.as_ref());
                }
                None => println!("No move to play"),
            },
            "l" => {
                for (i, turn) in engine.legal_turns().enumerate() {
                    let update = Update::between(engine.position(), &turn);
                    println!("{i:>3}: {}", describe(&update));
                }
            }
            "r" => {
                engine = GameEngine::with_config(*engine.config());
                last = None;
                redraw(&mut display, &engine, last.as_ref());
                println!("\n🔄 Reset to initial position");
            }
            "p" => redraw(&mut display, &engine, last.as_ref()),
            "q" => break,
            _ => println!("Unknown command"),
        }
    }
}

/// Draws the complete interface: help text, board and game status.
fn redraw(display: &mut TerminalDisplay, engine: &GameEngine, last: Option<&Update>) {
    clear_screen();
    println!("⛀  Checkers");
    println!();
    println!("Commands: m <from> <to> | a (auto) | l (list) | r (reset) | p (refresh) | q (quit)");
    println!();

    if let Err(e) = display.show(engine.position(), last) {
        log::error!("{e}");
        return;
    }

    let position = engine.position();
    if let Some(square) = position.window().forced_square() {
        println!("Continue capturing with {square}");
    }
    match engine.outcome() {
        Some(Outcome::Win(side)) => {
            println!("🏁 {side} wins after {} turns", engine.turns_played())
        }
        Some(Outcome::Draw) => println!("🏁 Draw after {} turns", engine.turns_played()),
        None => println!("Turn {}", engine.turns_played() + 1),
    }
}

/// Short notation for a complete turn, e.g. `c3-d4` or `c3xg7 (d4 f6)`.
fn describe(update: &Update) -> String {
    let Some((from, to)) = update.moved else {
        return "pass".to_string();
    };
    let mut text = if update.captured.is_empty() {
        format!("{from}-{to}")
    } else {
        let captured: Vec<String> = update.captured.squares().map(|sq| sq.to_string()).collect();
        format!("{from}x{to} ({})", captured.join(" "))
    };
    if update.promotion.is_some() {
        text.push_str(" ↑");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::{Bitboard, BoardState, Side};

    fn sq(name: &str) -> Square {
        name.parse().expect("test square is invalid")
    }

    #[test]
    fn describe_simple_move() {
        let update = Update {
            moved: Some((sq("c3"), sq("d4"))),
            ..Update::default()
        };
        assert_eq!(describe(&update), "c3-d4");
    }

    #[test]
    fn describe_promoting_capture() {
        let update = Update {
            moved: Some((sq("b6"), sq("d8"))),
            captured: sq("c7").mask(),
            promotion: Some(sq("d8")),
        };
        assert_eq!(describe(&update), "b6xd8 (c7) ↑");
    }

    #[test]
    fn describe_chain_lists_every_capture() {
        let start = BoardState::new(
            sq("c3").mask(),
            sq("d4").mask() | sq("f6").mask() | sq("a7").mask(),
            Bitboard::EMPTY,
            Side::White,
        )
        .expect("valid layout");
        let turn = start.turns().next().expect("capture chain");

        assert_eq!(describe(&Update::between(&start, &turn)), "c3xg7 (d4 f6)");
    }

    #[test]
    fn describe_pass() {
        assert_eq!(describe(&Update::default()), "pass");
    }
}
