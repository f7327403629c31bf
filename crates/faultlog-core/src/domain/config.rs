//! Logger configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variables read by [`LoggerConfig::from_env`].
pub mod env {
    /// Root folder for log files
    pub const FOLDER: &str = "FAULTLOG_FOLDER";
    /// Echo rendered lines to stdout ("1"/"true"/"on")
    pub const PRINT_ERRORS: &str = "FAULTLOG_PRINT_ERRORS";
    /// Initial error-reporting level (0 disables `on_error`)
    pub const ERROR_REPORTING: &str = "FAULTLOG_ERROR_REPORTING";
}

/// Error-reporting level that reports everything.
pub const REPORT_ALL: i64 = 32767;

/// Configuration for the error logger.
///
/// Created once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Base directory for the `php/`, `404/` and `login/` trees
    pub log_folder: PathBuf,

    /// Also write every rendered line to stdout
    pub print_errors: bool,

    /// Initial error-reporting level
    pub error_reporting: i64,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_folder: PathBuf::from("."),
            print_errors: false,
            error_reporting: REPORT_ALL,
        }
    }
}

impl LoggerConfig {
    pub fn with_log_folder(mut self, log_folder: impl Into<PathBuf>) -> Self {
        self.log_folder = log_folder.into();
        self
    }

    pub fn with_print_errors(mut self, print_errors: bool) -> Self {
        self.print_errors = print_errors;
        self
    }

    pub fn with_error_reporting(mut self, level: i64) -> Self {
        self.error_reporting = level;
        self
    }

    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `FAULTLOG_*` environment variables (a `.env` file is honoured).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Same as [`from_env`](Self::from_env) over an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                env::FOLDER => config.log_folder = PathBuf::from(value),
                env::PRINT_ERRORS => config.print_errors = parse_flag(env::PRINT_ERRORS, value)?,
                env::ERROR_REPORTING => {
                    config.error_reporting =
                        value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                            key: env::ERROR_REPORTING,
                            value: value.to_string(),
                        })?
                }
                _ => {}
            }
        }
        Ok(config)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
