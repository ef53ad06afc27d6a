pub mod commands;

pub use commands::{run_command, AppCommand};
