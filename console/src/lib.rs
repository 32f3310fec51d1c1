pub mod commands;
pub mod settings;

pub use commands::{run, Command, ConsoleError, NOT_FOUND};
pub use settings::{ConnectionArgs, FileSettings};
