//! Configuration management for helmfile-values
//!
//! Settings are loaded from environment variables with sensible defaults.
//! They cover the manager defaults (which files are helmfile state files),
//! the extraction heuristics and the discovery walk limits.
//!
//! # Environment Variables
//!
//! - `HELMFILE_VALUES_NESTED_VALUES`: Also search nested keys of in-line values (true|false) - default: "false"
//! - `HELMFILE_VALUES_NON_SCALAR_FIELDS`: Handling of non-scalar `repository`/`tag` fields (coerce|reject) - default: "coerce"
//! - `HELMFILE_VALUES_FILE_MATCH`: Comma-separated extra file patterns, appended to the defaults
//! - `HELMFILE_VALUES_MAX_DEPTH`: Maximum directory depth for discovery - default: "10"
//! - `HELMFILE_VALUES_MAX_FILES`: Maximum number of files visited during discovery - default: "1000"
//! - `HELMFILE_VALUES_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use helmfile_values::HelmfileValuesConfig;
//!
//! let config = HelmfileValuesConfig::default();
//! config.validate().expect("Invalid configuration");
//!
//! let matchers = config.file_matchers().expect("Invalid file pattern");
//! assert!(matchers.iter().any(|re| re.is_match("deploy/helmfile.yaml")));
//! ```

use crate::manager::helmfile;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_MAX_DEPTH: usize = 10;
const DEFAULT_MAX_FILES: usize = 1000;
const MAX_DEPTH_LIMIT: usize = 64;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file pattern is not a valid regular expression
    #[error("Invalid file pattern '{pattern}': {error}")]
    InvalidFilePattern { pattern: String, error: String },

    /// Unknown non-scalar field policy
    #[error("Invalid non-scalar field policy: {0}. Valid options: coerce, reject")]
    InvalidNonScalarPolicy(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// What to do with a structured image whose `repository` or `tag` is a
/// mapping or sequence instead of a scalar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonScalarFields {
    /// Render the value as flow-style text and keep the image.
    #[default]
    Coerce,
    /// Treat the entry as not being an image.
    Reject,
}

impl FromStr for NonScalarFields {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coerce" => Ok(NonScalarFields::Coerce),
            "reject" => Ok(NonScalarFields::Reject),
            other => Err(ConfigError::InvalidNonScalarPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for NonScalarFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonScalarFields::Coerce => write!(f, "coerce"),
            NonScalarFields::Reject => write!(f, "reject"),
        }
    }
}

/// Knobs of the extraction heuristics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Search keys below the top level of each `values` entry.
    pub nested_values: bool,
    pub non_scalar_fields: NonScalarFields,
}

/// Manager-level defaults consumed by the surrounding update tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Regular expressions matched against repository-relative paths
    pub file_match: Vec<String>,

    /// Commit message topic template
    pub commit_message_topic: String,

    /// Helm repository aliases
    pub aliases: BTreeMap<String, String>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            file_match: helmfile::FILE_MATCH.iter().map(|p| p.to_string()).collect(),
            commit_message_topic: helmfile::COMMIT_MESSAGE_TOPIC.to_string(),
            aliases: helmfile::ALIASES
                .iter()
                .map(|(alias, url)| (alias.to_string(), url.to_string()))
                .collect(),
        }
    }
}

/// Main configuration structure for helmfile-values
///
/// `Default::default()` loads from environment variables and falls back to
/// built-in defaults for anything unset or unparsable.
#[derive(Debug, Clone, Serialize)]
pub struct HelmfileValuesConfig {
    /// Manager defaults
    pub manager: ManagerConfig,

    /// Extraction heuristics
    pub options: ExtractOptions,

    /// Maximum directory depth for discovery
    pub max_depth: usize,

    /// Maximum number of files visited during discovery
    pub max_files: usize,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for HelmfileValuesConfig {
    fn default() -> Self {
        let mut manager = ManagerConfig::default();
        if let Ok(extra) = env::var("HELMFILE_VALUES_FILE_MATCH") {
            manager.file_match.extend(
                extra
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from),
            );
        }

        let nested_values = env::var("HELMFILE_VALUES_NESTED_VALUES")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let non_scalar_fields = env::var("HELMFILE_VALUES_NON_SCALAR_FIELDS")
            .ok()
            .and_then(|v| v.parse::<NonScalarFields>().ok())
            .unwrap_or_default();

        let max_depth = env::var("HELMFILE_VALUES_MAX_DEPTH")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_DEPTH);

        let max_files = env::var("HELMFILE_VALUES_MAX_FILES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_FILES);

        let log_level = env::var("HELMFILE_VALUES_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            manager,
            options: ExtractOptions {
                nested_values,
                non_scalar_fields,
            },
            max_depth,
            max_files,
            log_level,
        }
    }
}

impl HelmfileValuesConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a file pattern does not compile, a walk limit
    /// is out of range, or the log level is unknown.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.file_matchers()?;

        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::ValidationFailed(format!(
                "Max depth must be between 1 and {}",
                MAX_DEPTH_LIMIT
            )));
        }

        if self.max_files == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max files must be at least 1".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Compiles the manager's file patterns.
    pub fn file_matchers(&self) -> Result<Vec<Regex>, ConfigError> {
        self.manager
            .file_match
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidFilePattern {
                    pattern: pattern.clone(),
                    error: e.to_string(),
                })
            })
            .collect()
    }
}

impl fmt::Display for HelmfileValuesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "helmfile-values configuration:")?;
        writeln!(f, "  File match: {}", self.manager.file_match.join(", "))?;
        writeln!(
            f,
            "  Commit message topic: {}",
            self.manager.commit_message_topic
        )?;
        for (alias, url) in &self.manager.aliases {
            writeln!(f, "  Alias: {} -> {}", alias, url)?;
        }
        writeln!(f, "  Nested values: {}", self.options.nested_values)?;
        writeln!(f, "  Non-scalar fields: {}", self.options.non_scalar_fields)?;
        writeln!(f, "  Max depth: {}", self.max_depth)?;
        writeln!(f, "  Max files: {}", self.max_files)?;
        write!(f, "  Log level: {}", self.log_level)
    }
}
