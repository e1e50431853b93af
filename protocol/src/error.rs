use std::io;

use sweepduel_core::GameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("line {line}: expected {expected} integers, found {found}")]
    TokenCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: `{token}` is not an integer")]
    InvalidInteger { line: usize, token: String },
    #[error("board dimensions must be positive, got {rows}x{columns}")]
    InvalidDimensions { rows: i64, columns: i64 },
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: unexpected character `{found}`")]
    InvalidChar { line: usize, found: char },
    #[error("line {line}: unknown move kind {code}")]
    UnknownMoveKind { line: usize, code: i64 },
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
