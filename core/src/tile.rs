use serde::{Deserialize, Serialize};

/// Reveal state of a cell as tracked by the engine.
///
/// Cells only ever leave `Hidden`; nothing returns to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCell {
    Hidden,
    Revealed(u8),
    Marked,
    Exploded,
}

impl EngineCell {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_settled(self) -> bool {
        !self.is_hidden()
    }
}

impl Default for EngineCell {
    fn default() -> Self {
        Self::Hidden
    }
}

/// The disclosure alphabet shared by both sides of the protocol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Glyph {
    /// `?`
    Unknown,
    /// `0`..=`8`
    Number(u8),
    /// `@`
    Marked,
    /// `X`, a detonated mine or a wrong mark
    Exploded,
}

impl Glyph {
    pub const fn to_char(self) -> char {
        match self {
            Self::Unknown => '?',
            Self::Number(n) => {
                debug_assert!(n <= 8, "a cell has at most 8 neighbors");
                (b'0' + n) as char
            }
            Self::Marked => '@',
            Self::Exploded => 'X',
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '?' => Self::Unknown,
            '0'..='8' => Self::Number(c as u8 - b'0'),
            '@' => Self::Marked,
            'X' => Self::Exploded,
            _ => return None,
        })
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<EngineCell> for Glyph {
    fn from(cell: EngineCell) -> Self {
        match cell {
            EngineCell::Hidden => Self::Unknown,
            EngineCell::Revealed(count) => Self::Number(count),
            EngineCell::Marked => Self::Marked,
            EngineCell::Exploded => Self::Exploded,
        }
    }
}
