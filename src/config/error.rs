use std::io;

use thiserror::Error;

/// Failure reading or writing `config.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access the config file: {0}")]
    Io(#[from] io::Error),

    #[error("config file is not valid JSON: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_name_the_config_file() {
        let err = serde_json::from_str::<serde_json::Value>("{").expect_err("truncated");
        let message = ConfigError::from(err).to_string();
        assert!(message.starts_with("config file is not valid JSON"));
    }
}
