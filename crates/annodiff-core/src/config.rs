//! Engine options and the `annodiff.toml` configuration file

use crate::errors::{AnnodiffError, Result};
use crate::logging_facility::Profile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "annodiff.toml";
pub const DEFAULT_STORE_ROOT: &str = ".annodiff/reports";

/// Metadata keys skipped unless the caller says otherwise
pub fn default_ignored_fields() -> Vec<String> {
    vec!["provenance".to_string()]
}

/// Which record identifiers the aggregator walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordCoverage {
    /// Only ids from the original dataset; unmatched ids are skipped silently
    #[default]
    OriginalOnly,
    /// Ids from both datasets; unmatched ids are counted and reported
    Union,
}

impl RecordCoverage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OriginalOnly => "original_only",
            Self::Union => "union",
        }
    }
}

impl std::str::FromStr for RecordCoverage {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim() {
            "original_only" | "original-only" => Ok(Self::OriginalOnly),
            "union" => Ok(Self::Union),
            other => Err(format!(
                "invalid record coverage '{other}', expected one of: original-only, union"
            )),
        }
    }
}

/// Options for one comparison run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    #[serde(default = "default_ignored_fields")]
    pub ignored_fields: Vec<String>,
    #[serde(default)]
    pub record_coverage: RecordCoverage,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            ignored_fields: default_ignored_fields(),
            record_coverage: RecordCoverage::OriginalOnly,
        }
    }
}

impl CompareOptions {
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignored_fields.iter().any(|f| f == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_root")]
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
        }
    }
}

fn default_store_root() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_ROOT)
}

/// Contents of `annodiff.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AnnodiffConfig {
    #[serde(default)]
    pub compare: CompareOptions,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Parse configuration from TOML text
pub fn parse_config(raw: &str) -> Result<AnnodiffConfig> {
    toml::from_str(raw).map_err(|e| {
        AnnodiffError::Config {
            message: format!("failed to parse config TOML: {e}"),
        }
        .into()
    })
}

/// Load the configuration file at `path`
///
/// A missing file yields the defaults; an unreadable or malformed one is an
/// error.
pub fn load_config(path: &Path) -> Result<AnnodiffConfig> {
    if !path.exists() {
        return Ok(AnnodiffConfig::default());
    }
    let raw = fs::read_to_string(path).map_err(|e| AnnodiffError::Config {
        message: format!("cannot read {}: {e}", path.display()),
    })?;
    parse_config(&raw)
}
