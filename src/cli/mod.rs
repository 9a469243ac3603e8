pub mod commands;
pub mod core;
pub mod forms;
pub mod interaction;
pub mod io;
pub mod output;
pub mod registry;
pub mod render;
mod shell;

pub use self::core::{CliMode, CommandError, ShellContext};
pub use shell::run_cli;
