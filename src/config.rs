use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const DEFAULT_LOG_FILTER: &str = "spendlens=info";

/// Paths and log settings resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) db_path: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) log_filter: String,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        let config = Self::resolve(|key| std::env::var(key).ok())?;
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                config.data_dir.display()
            )
        })?;
        Ok(config)
    }

    /// Build a config from an environment lookup without touching the filesystem.
    pub(crate) fn resolve(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let data_dir = match var("SPENDLENS_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => directories::ProjectDirs::from("com", "spendlens", "SpendLens")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .context("Could not determine data directory")?,
        };
        let db_path = var("SPENDLENS_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("spendlens.db"));
        let log_filter = var("SPENDLENS_LOG")
            .or_else(|| var("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            log_path: data_dir.join("spendlens.log"),
            data_dir,
            db_path,
            log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_data_dir_override_drives_paths() {
        let cfg = Config::resolve(lookup(&[("SPENDLENS_DATA_DIR", "/tmp/sl")])).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/sl"));
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/sl/spendlens.db"));
        assert_eq!(cfg.log_path, PathBuf::from("/tmp/sl/spendlens.log"));
        assert_eq!(cfg.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_db_and_log_overrides() {
        let cfg = Config::resolve(lookup(&[
            ("SPENDLENS_DATA_DIR", "/tmp/sl"),
            ("SPENDLENS_DB", "/elsewhere/money.db"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/elsewhere/money.db"));
        assert_eq!(cfg.log_filter, "debug");

        let cfg = Config::resolve(lookup(&[
            ("SPENDLENS_DATA_DIR", "/tmp/sl"),
            ("SPENDLENS_LOG", "spendlens=trace"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.log_filter, "spendlens=trace");
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let cfg = Config::resolve(lookup(&[
            ("SPENDLENS_DATA_DIR", "/tmp/sl"),
            ("SPENDLENS_DB", "  "),
        ]))
        .unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/sl/spendlens.db"));
    }
}
