//! Line-oriented text front end. [`Session::run`] is the "main loop" which
//! reads one command per line from the input stream, applies it to the board
//! and writes the response to the output stream.
//!
//! Supported commands:
//!
//! - `new`: reset to the standard starting position
//! - `position startpos` or `position <tiles> [white|black]`: load a position
//! - `moves <square>`: legal destinations of the piece on the square
//! - `move <from><to>` or `move <from> <to>`: play a move for the side to move
//! - `snapshot`: print the tile string
//! - `state`: print the side to move and its status
//! - `board` or `d`: draw the board
//! - `history`: moves played since the position was set
//! - `perft <depth>`: count the leaf nodes of the legal move tree, depth 4 at
//!   most
//! - `version`
//! - `quit`
//!
//! Invalid input never ends the session: it is reported as an `error: ...`
//! line and the board is left untouched.

use std::io::{BufRead, Write};

use anyhow::Context;
use itertools::Itertools;

use crate::chess::board::Board;
use crate::chess::core::{Move, Player, Square};
use crate::chess::movegen;
use crate::session::command::Command;

mod command;

/// Deepest tree the `perft` command explores.
const MAX_PERFT_DEPTH: u8 = 4;

/// A single game driven by text commands, together with its I/O.
pub struct Session<'a, R: BufRead, W: Write> {
    board: Board,
    history: Vec<Move>,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Creates a session with the starting position and provided I/O.
    #[must_use]
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self::with_board(Board::starting(), input, output)
    }

    /// Creates a session starting from the given position.
    #[must_use]
    pub fn with_board(board: Board, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            board,
            history: Vec::new(),
            input,
            output,
        }
    }

    /// Current state of the game.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Continuously reads the input stream and executes commands until `quit`
    /// is sent or the input is exhausted.
    ///
    /// # Errors
    ///
    /// Only I/O failures end the session with an error.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if self
                .input
                .read_line(&mut line)
                .context("reading from input")?
                == 0
            {
                break;
            }
            let command = Command::parse(&line);
            tracing::trace!(?command, "received command");
            if command == Command::Quit {
                break;
            }
            if let Err(e) = self.execute(command) {
                tracing::warn!("{e:#}");
                writeln!(self.output, "error: {e:#}")?;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn execute(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::NewGame => self.reset(Board::starting()),
            Command::SetPosition { tiles, turn } => {
                self.handle_position(tiles.as_deref(), turn.as_deref())?;
            },
            Command::Destinations { square } => self.handle_destinations(&square)?,
            Command::Move { from, to } => self.handle_move(&from, &to)?,
            Command::Snapshot => writeln!(self.output, "{}", self.board.board_snapshot())?,
            Command::State => self.write_state()?,
            Command::Display => writeln!(self.output, "{:?}", self.board)?,
            Command::History => {
                if self.history.is_empty() {
                    writeln!(self.output, "-")?;
                } else {
                    writeln!(self.output, "{}", self.history.iter().join(" "))?;
                }
            },
            Command::Perft { depth } => {
                if depth > MAX_PERFT_DEPTH {
                    anyhow::bail!("perft depth should be at most {MAX_PERFT_DEPTH}, got {depth}");
                }
                let nodes = movegen::perft(&self.board, depth);
                tracing::debug!(depth, nodes, "perft");
                writeln!(self.output, "{nodes}")?;
            },
            Command::Version => writeln!(self.output, "tilechess {}", crate::engine_version())?,
            Command::Quit | Command::Empty => {},
            Command::Unknown(command) => anyhow::bail!("unknown command: '{command}'"),
        }
        Ok(())
    }

    fn reset(&mut self, board: Board) {
        tracing::info!(tiles = %board.board_snapshot(), turn = %board.turn(), "new position");
        self.board = board;
        self.history.clear();
    }

    fn handle_position(&mut self, tiles: Option<&str>, turn: Option<&str>) -> anyhow::Result<()> {
        let turn = turn.map_or(Ok(Player::White), Player::try_from)?;
        let board = match tiles {
            None => Board::starting().with_turn(turn)?,
            Some(tiles) => Board::from_tile_string_with_turn(tiles, turn)?,
        };
        self.reset(board);
        Ok(())
    }

    fn handle_destinations(&mut self, square: &str) -> anyhow::Result<()> {
        let square = Square::try_from(square)?;
        let destinations = self.board.legal_destinations(square);
        if destinations.is_empty() {
            writeln!(self.output, "-")?;
        } else {
            writeln!(self.output, "{destinations}")?;
        }
        Ok(())
    }

    fn handle_move(&mut self, from: &str, to: &str) -> anyhow::Result<()> {
        let next = Move::new(Square::try_from(from)?, Square::try_from(to)?);
        if self.board.game_state().is_terminal() {
            anyhow::bail!("the game is over: {}", self.board.game_state());
        }
        self.board.submit_move(next.from, next.to)?;
        self.history.push(next);
        self.write_state()
    }

    fn write_state(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "{} to move: {}",
            self.board.turn(),
            self.board.game_state()
        )?;
        Ok(())
    }
}
