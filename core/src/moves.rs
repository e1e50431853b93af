use core::ops::BitOr;
use serde::{Deserialize, Serialize};

use crate::*;

/// The three actions a player may take, numbered as on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    Visit = 0,
    Mark = 1,
    AutoExplore = 2,
}

impl MoveKind {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Visit),
            1 => Some(Self::Mark),
            2 => Some(Self::AutoExplore),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub coords: Coord2,
    pub kind: MoveKind,
}

impl Move {
    pub const fn visit(coords: Coord2) -> Self {
        Self {
            coords,
            kind: MoveKind::Visit,
        }
    }

    pub const fn mark(coords: Coord2) -> Self {
        Self {
            coords,
            kind: MoveKind::Mark,
        }
    }

    pub const fn auto_explore(coords: Coord2) -> Self {
        Self {
            coords,
            kind: MoveKind::AutoExplore,
        }
    }
}

/// Why a move left the board untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ignored {
    Finished,
    OutOfBounds,
    Settled,
    NotRevealed,
    MarkMismatch,
    NothingHidden,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    NoChange(Ignored),
    Marked,
    Revealed,
    HitMine,
    Won,
}

impl Outcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange(_))
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }

    const fn rank(self) -> u8 {
        use Outcome::*;
        match self {
            NoChange(_) => 0,
            Marked => 1,
            Revealed => 2,
            Won => 3,
            HitMine => 4,
        }
    }
}

/// Used to merge outcomes of multi-cell moves
impl BitOr for Outcome {
    type Output = Outcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        if rhs.rank() > self.rank() { rhs } else { self }
    }
}
