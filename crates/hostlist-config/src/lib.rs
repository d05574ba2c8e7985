//! Configuration loading and types for hostlist.
//!
//! This crate is responsible for:
//! - Defining the configuration model consumed by the `hostlist` CLI
//! - Loading configuration from TOML files
//! - Providing a simple default search strategy (/etc/hostlist/hostlist.toml, ./hostlist.toml)
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! usable configuration. Unknown keys are rejected so that typos surface
//! as errors instead of being silently ignored.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use hostlist_core::{Expander, HostlistError, Result, DEFAULT_MAX_HOSTS};

/// Root configuration struct for hostlist.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostlistConfig {
    /// Limits applied while expanding host lists.
    #[serde(default)]
    pub expand: ExpandConfig,

    /// How results are written to stdout.
    #[serde(default)]
    pub output: OutputConfig,

    /// Log filter used when no `--log-level` flag is given.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HostlistConfig {
    /// Perform basic structural validation of the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.expand.max_hosts == 0 {
            return Err(HostlistError::invalid_config(
                "expand.max_hosts",
                "expand.max_hosts must be greater than zero",
            ));
        }

        if let Some(level) = &self.logging.level {
            if level.trim().is_empty() {
                return Err(HostlistError::invalid_config(
                    "logging.level",
                    "logging.level must not be empty when set",
                ));
            }
        }

        Ok(())
    }

    /// Build an expander honouring the configured host limit.
    pub fn expander(&self) -> Expander {
        Expander::new(self.expand.max_hosts)
    }
}

/// Expansion configuration section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpandConfig {
    /// Maximum number of hosts one expansion may produce.
    ///
    /// Defaults to [`DEFAULT_MAX_HOSTS`].
    #[serde(default = "default_max_hosts")]
    pub max_hosts: usize,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            max_hosts: default_max_hosts(),
        }
    }
}

/// Output configuration section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format (`lines`, `comma` or `json`).
    #[serde(default)]
    pub format: OutputFormat,
}

/// How a list of hosts is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One entry per line.
    #[default]
    Lines,

    /// All entries on one line, separated by commas.
    Comma,

    /// A JSON array of strings.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Lines => write!(f, "lines"),
            OutputFormat::Comma => write!(f, "comma"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level or full filter expression, e.g. `debug` or
    /// `warn,hostlist_core=debug`.
    #[serde(default)]
    pub level: Option<String>,
}

/// Load configuration from a specific file path.
///
/// Read failures map to [`HostlistError::Config`], parse failures to
/// [`HostlistError::InvalidConfig`].
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<HostlistConfig> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref).map_err(|err| {
        HostlistError::config(format!(
            "failed to read config file '{}': {}",
            path_ref.display(),
            err
        ))
    })?;

    let cfg: HostlistConfig = toml::from_str(&contents).map_err(|err| {
        HostlistError::invalid_config(
            path_ref.display().to_string(),
            format!("failed to parse config: {}", err),
        )
    })?;

    Ok(cfg)
}

/// Attempt to load configuration using the default search strategy.
///
/// Current strategy (in order):
/// 1. `/etc/hostlist/hostlist.toml`
/// 2. `./hostlist.toml` (in the current working directory)
///
/// Returns [`HostlistError::ConfigNotFound`] when neither file exists.
pub fn load_default() -> Result<HostlistConfig> {
    let candidates = default_candidates();

    for candidate in &candidates {
        if candidate.exists() {
            return load_from_path(candidate);
        }
    }

    Err(HostlistError::ConfigNotFound(
        candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    ))
}

fn default_candidates() -> [PathBuf; 2] {
    [
        PathBuf::from("/etc/hostlist/hostlist.toml"),
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("hostlist.toml"),
    ]
}

fn default_max_hosts() -> usize {
    DEFAULT_MAX_HOSTS
}
