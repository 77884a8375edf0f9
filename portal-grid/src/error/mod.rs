//! Error types

mod command;
mod field;
mod grid;
mod host;

pub use command::*;
pub use field::*;
pub use grid::*;
pub use host::*;
