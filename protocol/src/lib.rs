//! Text protocol between a host holding the mine map and a client that only
//! sees disclosed boards.

pub use board::*;
pub use command::*;
pub use error::*;
pub use reader::*;
pub use referee::*;
pub use session::*;
pub use summary::*;

mod board;
mod command;
mod error;
mod reader;
mod referee;
mod session;
mod summary;
