use std::fmt;

use sweepduel_core::{EngineState, Summary};

pub const WIN_LINE: &str = "YOU WIN!";
pub const LOSE_LINE: &str = "GAME OVER!";

/// The two closing lines: the result, then `visited marked`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SummaryLines(pub Summary);

impl fmt::Display for SummaryLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Summary {
            state,
            visited,
            marked,
        } = self.0;
        let headline = match state {
            EngineState::Won => WIN_LINE,
            EngineState::Lost | EngineState::Playing => LOSE_LINE,
        };
        writeln!(f, "{headline}")?;
        writeln!(f, "{visited} {marked}")
    }
}

/// Whether a line is the first line of a summary rather than a board row.
pub fn is_summary_line(text: &str) -> bool {
    text == WIN_LINE || text == LOSE_LINE
}
