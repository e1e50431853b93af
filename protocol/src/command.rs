use std::fmt;

use serde::{Deserialize, Serialize};
use sweepduel_core::*;

use crate::{Result, *};

/// A move as it travels on the wire. Coordinates are kept as read, so a
/// negative or oversized value survives decoding and is ignored by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub row: i64,
    pub column: i64,
    pub kind: MoveKind,
}

impl Command {
    /// The engine move, or `None` when the coordinates cannot be on any board.
    pub fn to_move(self) -> Option<Move> {
        let row = Coord::try_from(self.row).ok()?;
        let column = Coord::try_from(self.column).ok()?;
        Some(Move {
            coords: (row, column),
            kind: self.kind,
        })
    }
}

impl From<Move> for Command {
    fn from(mv: Move) -> Self {
        Self {
            row: mv.coords.0.into(),
            column: mv.coords.1.into(),
            kind: mv.kind,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.row, self.column, self.kind.code())
    }
}

pub fn parse_command_line(line: usize, text: &str) -> Result<Command> {
    let [row, column, code] = parse_ints(line, text)?;
    let kind = u8::try_from(code)
        .ok()
        .and_then(MoveKind::from_code)
        .ok_or(ProtocolError::UnknownMoveKind { line, code })?;
    Ok(Command { row, column, kind })
}

pub fn parse_command(text: &str) -> Result<Command> {
    parse_command_line(1, text.trim())
}
