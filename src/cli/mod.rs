pub mod args;
pub mod check;
pub mod commands;

pub use args::{AnalyzeArgs, CliArgs, Command, ConfigCommand};
pub use check::{check_environment, CheckStatus, EnvironmentReport};
pub use commands::handle_command;
