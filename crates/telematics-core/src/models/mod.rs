//! Shared data models

mod command;
mod status;

pub use command::*;
pub use status::*;
