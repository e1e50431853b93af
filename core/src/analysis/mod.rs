pub use knowledge::*;

mod knowledge;
