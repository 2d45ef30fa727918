//! Host configuration read from the environment.

use std::path::PathBuf;

use loopwalk_asset_store::caching_preloader::DEFAULT_CONCURRENCY;

use crate::error::AppError;

/// Path of the YAML catalog; the built-in catalog is used when unset.
pub const CATALOG_VAR: &str = "LOOPWALK_CATALOG";
/// Directory scenes are read from.
pub const ASSET_DIR_VAR: &str = "LOOPWALK_ASSET_DIR";
/// Base URL scenes are downloaded from; takes precedence over the directory.
pub const ASSET_URL_VAR: &str = "LOOPWALK_ASSET_URL";
/// Maximum number of parallel asset fetches.
pub const PRELOAD_CONCURRENCY_VAR: &str = "LOOPWALK_PRELOAD_CONCURRENCY";
/// `json` or `pretty`.
pub const LOG_FORMAT_VAR: &str = "LOOPWALK_LOG_FORMAT";

const DEFAULT_ASSET_DIR: &str = "videos";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

/// Where scene assets come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocation {
    /// A local directory.
    Directory(PathBuf),
    /// An HTTP base URL.
    Http(String),
}

/// Host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Catalog file, if not the built-in one.
    pub catalog_path: Option<PathBuf>,
    /// Asset source.
    pub assets: AssetLocation,
    /// Maximum number of parallel asset fetches.
    pub preload_concurrency: usize,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let assets = match non_empty(ASSET_URL_VAR) {
            Some(url) => AssetLocation::Http(url),
            None => AssetLocation::Directory(PathBuf::from(
                non_empty(ASSET_DIR_VAR).unwrap_or_else(|| DEFAULT_ASSET_DIR.to_owned()),
            )),
        };

        let preload_concurrency = match non_empty(PRELOAD_CONCURRENCY_VAR) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(value) if value > 0 => value,
                _ => {
                    return Err(AppError::Config(format!(
                        "{PRELOAD_CONCURRENCY_VAR} must be a positive integer, got {raw:?}"
                    )));
                }
            },
            None => DEFAULT_CONCURRENCY,
        };

        let log_format = match non_empty(LOG_FORMAT_VAR).as_deref().map(str::trim) {
            None | Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "{LOG_FORMAT_VAR} must be json or pretty, got {other:?}"
                )));
            }
        };

        Ok(Self {
            catalog_path: non_empty(CATALOG_VAR).map(PathBuf::from),
            assets,
            preload_concurrency,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.catalog_path, None);
        assert_eq!(config.assets, AssetLocation::Directory(PathBuf::from("videos")));
        assert_eq!(config.preload_concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_url_takes_precedence_over_directory() {
        let config = config_from(&[
            (ASSET_DIR_VAR, "/srv/videos"),
            (ASSET_URL_VAR, "https://cdn.example.org/videos"),
        ])
        .unwrap();

        assert_eq!(
            config.assets,
            AssetLocation::Http("https://cdn.example.org/videos".to_owned())
        );
    }

    #[test]
    fn test_reads_catalog_concurrency_and_format() {
        let config = config_from(&[
            (CATALOG_VAR, "corridors.yaml"),
            (PRELOAD_CONCURRENCY_VAR, "8"),
            (LOG_FORMAT_VAR, "pretty"),
        ])
        .unwrap();

        assert_eq!(config.catalog_path, Some(PathBuf::from("corridors.yaml")));
        assert_eq!(config.preload_concurrency, 8);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        match config_from(&[(PRELOAD_CONCURRENCY_VAR, "0")]) {
            Err(AppError::Config(message)) => assert!(message.contains(PRELOAD_CONCURRENCY_VAR)),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        match config_from(&[(LOG_FORMAT_VAR, "xml")]) {
            Err(AppError::Config(message)) => assert!(message.contains(LOG_FORMAT_VAR)),
            other => panic!("expected Config error, got {other:?}"),
        }
    }
}
