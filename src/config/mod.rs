mod error;
mod manager;
mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, RemoteConfig, DEFAULT_LOCAL_PREFIX, DEFAULT_TIMEOUT_SECS};
