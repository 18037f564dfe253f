use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".rental_core";
const HOME_ENV: &str = "RENTAL_CORE_HOME";
const CONFIG_FILE: &str = "config.json";
const CACHE_FILE: &str = "rentals.json";

/// Returns the application-specific data directory, defaulting to `~/.rental_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Creates `path` and its parents if missing.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Well-known file locations under a data directory.
pub struct PathResolver;

impl PathResolver {
    pub fn base_dir() -> PathBuf {
        app_data_dir()
    }

    pub fn resolve_base(custom: Option<PathBuf>) -> PathBuf {
        custom.unwrap_or_else(Self::base_dir)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    pub fn cache_file_in(base: &Path) -> PathBuf {
        base.join(CACHE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_prefers_explicit_base() {
        let base = PathBuf::from("/tmp/rental-core-test");
        assert_eq!(PathResolver::resolve_base(Some(base.clone())), base);
        assert_eq!(
            PathResolver::cache_file_in(&base),
            base.join("rentals.json")
        );
        assert_eq!(
            PathResolver::config_file_in(&base),
            base.join("config.json")
        );
    }

    #[test]
    fn ensure_dir_creates_nested_paths() {
        let temp = tempfile::tempdir().expect("temp dir");
        let nested = temp.path().join("a").join("b");
        ensure_dir(&nested).expect("create");
        assert!(nested.is_dir());
        ensure_dir(&nested).expect("idempotent");
    }
}
