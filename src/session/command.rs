//! Parsing of the line-oriented commands accepted by [`super::Session`].
//!
//! Parsing is purely syntactic: squares, tile strings and players are carried
//! as text and validated when the command is executed, so that the error
//! message can name the offending value.

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    /// Resets the board to the standard starting position.
    NewGame,
    /// `position startpos` or `position <tiles> [white|black]`.
    SetPosition {
        tiles: Option<String>,
        turn: Option<String>,
    },
    /// Lists legal destinations of the piece on the square.
    Destinations {
        square: String,
    },
    /// `move e2e4` or `move e2 e4`.
    Move {
        from: String,
        to: String,
    },
    Snapshot,
    State,
    Display,
    History,
    Perft {
        depth: u8,
    },
    Version,
    Quit,
    /// Blank line.
    Empty,
    Unknown(String),
}

fn parse_position(parts: &[&str]) -> Command {
    match parts {
        [_, "startpos"] => Command::SetPosition {
            tiles: None,
            turn: None,
        },
        [_, tiles] => Command::SetPosition {
            tiles: Some((*tiles).to_string()),
            turn: None,
        },
        [_, tiles, turn] => Command::SetPosition {
            tiles: Some((*tiles).to_string()),
            turn: Some((*turn).to_string()),
        },
        _ => Command::Unknown(parts.join(" ")),
    }
}

fn parse_move(parts: &[&str]) -> Command {
    match parts {
        [_, combined] if combined.len() == 4 && combined.is_char_boundary(2) => Command::Move {
            from: combined[..2].to_string(),
            to: combined[2..].to_string(),
        },
        [_, from, to] => Command::Move {
            from: (*from).to_string(),
            to: (*to).to_string(),
        },
        _ => Command::Unknown(parts.join(" ")),
    }
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();

        match parts.as_slice() {
            [] => Self::Empty,
            ["new"] => Self::NewGame,
            ["position", ..] => parse_position(&parts),
            ["moves", square] => Self::Destinations {
                square: (*square).to_string(),
            },
            ["move", ..] => parse_move(&parts),
            ["snapshot"] => Self::Snapshot,
            ["state"] => Self::State,
            ["board" | "d"] => Self::Display,
            ["history"] => Self::History,
            ["perft", depth] => depth
                .parse()
                .map_or_else(|_| Self::Unknown(parts.join(" ")), |depth| Self::Perft { depth }),
            ["version"] => Self::Version,
            ["quit"] => Self::Quit,
            _ => Self::Unknown(parts.join(" ")),
        }
    }
}
