use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use crate::core::utils::app_data_dir;

pub const DEFAULT_LOCAL_PREFIX: &str = "local_";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_DOCUMENT_URL: &str = "RENTAL_CORE_DOCUMENT_URL";
const ENV_IMAGE_URL: &str = "RENTAL_CORE_IMAGE_URL";
const ENV_PUBLIC_IMAGE_URL: &str = "RENTAL_CORE_PUBLIC_IMAGE_URL";
const ENV_API_KEY: &str = "RENTAL_CORE_API_KEY";

/// User-configurable settings for the booking core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional directory for the rental cache. Defaults to the application data directory.
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_local_prefix")]
    pub local_prefix: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default)]
    pub remote: RemoteConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            local_prefix: Self::default_local_prefix(),
            currency: Self::default_currency(),
            remote: RemoteConfig::default(),
        }
    }
}

impl Config {
    pub fn default_local_prefix() -> String {
        DEFAULT_LOCAL_PREFIX.into()
    }

    pub fn default_currency() -> String {
        "PKR".into()
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(app_data_dir)
    }

    /// Applies `RENTAL_CORE_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`; blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = value(ENV_DOCUMENT_URL) {
            self.remote.document_url = Some(url);
        }
        if let Some(url) = value(ENV_IMAGE_URL) {
            self.remote.image_url = Some(url);
        }
        if let Some(url) = value(ENV_PUBLIC_IMAGE_URL) {
            self.remote.public_image_url = Some(url);
        }
        if let Some(key) = value(ENV_API_KEY) {
            self.remote.api_key = Some(key);
        }
    }
}

/// Endpoints of the remote document and image stores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Base of the URLs handed back for stored images. Falls back to `image_url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "RemoteConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            document_url: None,
            image_url: None,
            public_image_url: None,
            api_key: None,
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    pub fn default_timeout_secs() -> u64 {
        DEFAULT_TIMEOUT_SECS
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn public_base(&self) -> Option<&str> {
        self.public_image_url
            .as_deref()
            .or(self.image_url.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.local_prefix, "local_");
        assert_eq!(config.currency, "PKR");
        assert_eq!(config.remote.timeout(), Duration::from_secs(30));
        assert!(config.remote.document_url.is_none());
    }

    #[test]
    fn sparse_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"remote":{"document_url":"https://db.test"}}"#)
                .expect("parse");
        assert_eq!(config.local_prefix, "local_");
        assert_eq!(config.remote.timeout_secs, 30);
        assert_eq!(config.remote.document_url.as_deref(), Some("https://db.test"));
    }

    #[test]
    fn overrides_ignore_blank_values() {
        let mut config = Config::default();
        config.remote.api_key = Some("from-file".into());
        config.apply_overrides(|key| match key {
            "RENTAL_CORE_DOCUMENT_URL" => Some("https://db.test".into()),
            "RENTAL_CORE_API_KEY" => Some("  ".into()),
            _ => None,
        });
        assert_eq!(config.remote.document_url.as_deref(), Some("https://db.test"));
        assert_eq!(config.remote.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn public_base_falls_back_to_upload_url() {
        let mut remote = RemoteConfig {
            image_url: Some("https://upload.test".into()),
            ..RemoteConfig::default()
        };
        assert_eq!(remote.public_base(), Some("https://upload.test"));
        remote.public_image_url = Some("https://cdn.test".into());
        assert_eq!(remote.public_base(), Some("https://cdn.test"));
    }
}
