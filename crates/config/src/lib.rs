//! Configuration for quire.
//!
//! Values are layered with [`figment`]: built-in defaults, then an optional
//! config file (TOML, YAML or JSON, picked by extension), then environment
//! variables prefixed with `QUIRE_`. Nested keys are separated by a double
//! underscore, so `QUIRE_AUTOSAVE__IDLE_THRESHOLD_SECS=30` sets
//! `autosave.idle_threshold_secs`.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "QUIRE_";
pub const DEFAULT_SLOT: &str = "bookAuthorData";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub autosave: AutosaveConfig,
    pub decode_policy: DecodePolicy,
}

/// Where the library record is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the slot files. Must be absolute.
    pub root: PathBuf,
    /// Name of the slot holding the library record.
    pub slot: String,
    /// Load normally but never write anything back.
    pub read_only: bool,
}
impl Default for StorageConfig {
    fn default() -> Self {
        let root = project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("quire-data"));
        Self { root, slot: DEFAULT_SLOT.to_string(), read_only: false }
    }
}

/// Idle-triggered history capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// How often to check whether the user has gone idle.
    pub poll_interval_secs: u64,
    /// Idle time that must pass (strictly) before a capture fires.
    pub idle_threshold_secs: u64,
    /// Entries kept per book; the oldest are evicted first.
    pub history_limit: usize,
}
impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { poll_interval_secs: 10, idle_threshold_secs: 60, history_limit: 20 }
    }
}
impl AutosaveConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs(self.idle_threshold_secs)
    }
}

/// What to do when the stored library record cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Fail loading. Unreadable user data is never silently discarded.
    #[default]
    Strict,
    /// Log a warning and start from an empty library.
    Lenient,
}

/// Platform directories for quire (`~/.config/quire`, `~/.local/share/quire`
/// and friends).
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "quire")
}

/// Default config file location, if the platform has a config directory.
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

impl Config {
    /// Load from the default config file (if it exists) and the environment.
    pub fn load() -> Result<Self> {
        let file = default_config_file().filter(|path| path.is_file());
        Self::extract(Self::figment(file.as_deref())?)
    }

    /// Load from a specific config file and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::extract(Self::figment(Some(path.as_ref()))?)
    }

    /// Build the provider stack without extracting it.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            tracing::debug!(path = %path.display(), "Reading config file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()
    }

    /// Reject values that would make the engine misbehave.
    pub fn validate(self) -> Result<Self> {
        if !self.storage.root.is_absolute() {
            exn::bail!(ErrorKind::Invalid(format!(
                "storage.root must be absolute, got `{}`",
                self.storage.root.display()
            )));
        }
        if self.storage.slot.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("storage.slot must not be empty".to_string()));
        }
        if self.autosave.poll_interval_secs == 0 {
            exn::bail!(ErrorKind::Invalid("autosave.poll_interval_secs must be greater than zero".to_string()));
        }
        if self.autosave.idle_threshold_secs == 0 {
            exn::bail!(ErrorKind::Invalid("autosave.idle_threshold_secs must be greater than zero".to_string()));
        }
        if self.autosave.history_limit == 0 {
            exn::bail!(ErrorKind::Invalid("autosave.history_limit must be greater than zero".to_string()));
        }
        Ok(self)
    }
}
