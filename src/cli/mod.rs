pub mod commands;
pub mod error;
pub mod io;
pub mod output;
pub mod prompts;

pub use commands::run_cli;
pub use error::CliError;
