use std::io::Write;

use checkers_engine::game_logic::GameConfig;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play checkers in the terminal", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Declare a draw after this many completed turns
    #[arg(long, value_name = "TURNS")]
    move_limit: Option<u32>,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| {
        writeln!(
            buf,
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        )
    })
    .target(env_logger::Target::Stderr)
    .init();

    log::info!("Checkers - terminal");
    checkers_engine::mock::run_interactive_terminal(GameConfig {
        move_limit: args.move_limit,
    });
}
