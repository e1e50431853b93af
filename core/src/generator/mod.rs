use crate::*;
pub use random::*;

mod random;

pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}

/// How much of the opening neighborhood is kept free of mines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StartTile {
    Random,
    SimpleSafe,
    AlwaysZero,
}
