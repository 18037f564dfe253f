use std::io;

use thiserror::Error;

use crate::{config::ConfigError, core::errors::RentalError};

/// Failures surfaced by `rental_core_cli`.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] RentalError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("cancelled")]
    Cancelled,
}
