use std::io;

use anyhow::Context;
use clap::{arg, command};
use tilechess::chess::board::Board;
use tilechess::chess::core::Player;
use tilechess::Session;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let matches = command!()
        .arg(arg!(
            --layout <TILES> "Start a fresh game from a 64-symbol tile string instead of the standard layout"
        ))
        .arg(arg!(--turn <PLAYER> "Side to move in the initial position").default_value("white"))
        .arg(
            arg!(--log <FILTER> "Log filter used unless RUST_LOG is set, e.g. 'debug'")
                .default_value("warn"),
        )
        .arg(arg!(-q --quiet "Do not print version and build information on startup"))
        .get_matches();

    // Logs go to stderr: stdout carries the session responses.
    let fallback_filter = matches
        .get_one::<String>("log")
        .map_or("warn", String::as_str);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter.into()),
        )
        .with_writer(io::stderr)
        .init();

    if !matches.get_flag("quiet") {
        tilechess::print_engine_info();
        tilechess::print_binary_info();
    }

    let turn = matches
        .get_one::<String>("turn")
        .map_or(Ok(Player::White), |turn| Player::try_from(turn.as_str()))?;
    let board = match matches.get_one::<String>("layout") {
        Some(tiles) => {
            Board::from_initial_layout_with_turn(tiles, turn).context("parsing --layout")?
        },
        None => Board::starting().with_turn(turn)?,
    };

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    Session::with_board(board, &mut input, &mut output).run()
}
