use std::result::Result as StdResult;

use thiserror::Error;

use crate::config::ConfigError;
use crate::core::validation::ValidationError;
use crate::core::wizard::WizardStep;

/// Unified error type for the wizard, persistence and configuration layers.
#[derive(Error, Debug)]
pub enum RentalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Remote storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Local persistence error: {0}")]
    LocalPersistence(String),
    #[error("Rental not found: {0}")]
    RentalNotFound(String),
    #[error("Submission is only available from the final step (currently on {0})")]
    NotOnFinalStep(WizardStep),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Image processing failed: {0}")]
    Media(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, RentalError>;

impl RentalError {
    /// Validation and remote-storage failures leave the session usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RentalError::Validation(_) | RentalError::StorageUnavailable(_)
        )
    }
}

impl From<std::io::Error> for RentalError {
    fn from(err: std::io::Error) -> Self {
        RentalError::LocalPersistence(err.to_string())
    }
}

impl From<serde_json::Error> for RentalError {
    fn from(err: serde_json::Error) -> Self {
        RentalError::LocalPersistence(err.to_string())
    }
}

impl From<ConfigError> for RentalError {
    fn from(err: ConfigError) -> Self {
        RentalError::Config(err.to_string())
    }
}
