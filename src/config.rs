use crate::error::{Result, SweetReleaseError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "sweetrelease.toml";

/// Represents the complete configuration for sweet-release.
///
/// Describes where the repository lives, which commit to describe, how the
/// base version is sourced and how the result is written out.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_repo_path")]
    pub repo_path: String,

    /// Clone `repo_path` into a temporary directory when it is a URL
    #[serde(default)]
    pub clone: bool,

    #[serde(default = "default_revision")]
    pub revision: String,

    /// Build units contributed by one year between the root and target commits
    #[serde(default = "default_time_multiplier")]
    pub time_multiplier: u64,

    /// Tolerate a dirty working tree by producing a snapshot
    #[serde(default = "default_allow_snapshot")]
    pub allow_snapshot: bool,

    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    /// Read the version file from the resolved commit instead of the working tree
    #[serde(default)]
    pub version_file_from_commit: bool,

    /// The base version must come from the version file
    #[serde(default)]
    pub from_file: bool,

    /// The base version must come from a tag
    #[serde(default)]
    pub from_tag: bool,

    /// Branches whose builds are releases rather than pre-releases (case-insensitive)
    #[serde(default = "default_stable_branches")]
    pub stable_branches: Vec<String>,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the base version may come from, derived from `from_file`/`from_tag`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    /// Version file only
    File,
    /// Tags only; the version file is not read
    Tag,
    /// Version file first, tags as fallback
    Either,
    /// Version file must parse if present, tags are required and win
    FileAndTag,
}

impl VersionSource {
    pub fn reads_file(self) -> bool {
        !matches!(self, VersionSource::Tag)
    }

    pub fn file_required(self) -> bool {
        matches!(self, VersionSource::File | VersionSource::FileAndTag)
    }

    pub fn tag_required(self) -> bool {
        matches!(self, VersionSource::Tag | VersionSource::FileAndTag)
    }
}

/// Output format of the resolved version
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The version string only
    #[default]
    Semver,
    /// One `Field: value` line per field
    Summary,
    /// JSON object of all fields
    Json,
    /// Rust source stub with `pub const` items
    Rust,
}

/// Configuration for rendering the result.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_repo_path() -> String {
    ".".to_string()
}

fn default_revision() -> String {
    "HEAD".to_string()
}

fn default_time_multiplier() -> u64 {
    1000
}

fn default_allow_snapshot() -> bool {
    true
}

fn default_version_file() -> PathBuf {
    PathBuf::from("VERSION")
}

fn default_stable_branches() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repo_path: default_repo_path(),
            clone: false,
            revision: default_revision(),
            time_multiplier: default_time_multiplier(),
            allow_snapshot: default_allow_snapshot(),
            version_file: default_version_file(),
            version_file_from_commit: false,
            from_file: false,
            from_tag: false,
            stable_branches: default_stable_branches(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    pub fn version_source(&self) -> VersionSource {
        match (self.from_file, self.from_tag) {
            (true, false) => VersionSource::File,
            (false, true) => VersionSource::Tag,
            (false, false) => VersionSource::Either,
            (true, true) => VersionSource::FileAndTag,
        }
    }

    /// Reject values no resolution could work with
    pub fn validate(&self) -> Result<()> {
        if self.revision.trim().is_empty() {
            return Err(SweetReleaseError::config("revision must not be empty"));
        }
        if self.version_source().reads_file() && self.version_file.as_os_str().is_empty() {
            return Err(SweetReleaseError::config("version_file must not be empty"));
        }
        if self.version_file.is_absolute() {
            return Err(SweetReleaseError::config(format!(
                "version_file '{}' must be relative to the repository root",
                self.version_file.display()
            )));
        }
        Ok(())
    }

    /// Serialize the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SweetReleaseError::config(e.to_string()))
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `sweetrelease.toml` in current directory
/// 3. `sweet-release/config.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        SweetReleaseError::config(format!("cannot read '{}': {}", path.display(), e))
    })?;
    let config: Config = toml::from_str(&config_str).map_err(|e| {
        SweetReleaseError::config(format!("cannot parse '{}': {}", path.display(), e))
    })?;

    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    let local = Path::new(".").join(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("sweet-release").join("config.toml"))
        .filter(|path| path.exists())
}
