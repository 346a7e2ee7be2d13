mod commands;
pub mod error;
mod logger;

pub use commands::Commands;
pub use error::{Error, Result};
pub use logger::*;
