//! CLI layer: argument parsing, command dispatch and the editing shell

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod shell;

pub use args::{Cli, Commands, ShellCommand, ShellLine};
pub use error::{CliError, CliResult};
pub use shell::{Flow, ScriptReport, ShellSession};
