//! Configuration loading via `ortho-config`.
//!
//! Settings merge defaults, configuration files (`.docsync.toml`), and
//! `DOCSYNC_*` environment variables. The list of sources is not part of
//! this configuration; it lives in the manifest named by `manifest_path`.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::manifest::DEFAULT_MANIFEST_PATH;
use crate::sync::SyncError;

/// Default version-control client used for cloning.
pub const DEFAULT_GIT_BIN: &str = "git";

/// Settings for a documentation sync run.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "DOCSYNC",
    discovery(
        app_name = "docsync",
        env_var = "DOCSYNC_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".docsync.toml",
        project_file_name = ".docsync.toml"
    )
)]
pub struct DocSyncConfig {
    /// Path to the `git` executable.
    #[ortho_config(default = DEFAULT_GIT_BIN.to_owned())]
    pub git_bin: String,
    /// Path to the source manifest, relative to the working directory.
    #[ortho_config(default = DEFAULT_MANIFEST_PATH.to_owned())]
    pub manifest_path: String,
    /// Directory in which scratch clones are created. Defaults to the system
    /// temporary directory.
    pub scratch_parent: Option<String>,
}

/// Errors raised when loading configuration from layered sources.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates that parsing or merging configuration layers failed.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl Default for DocSyncConfig {
    fn default() -> Self {
        Self {
            git_bin: DEFAULT_GIT_BIN.to_owned(),
            manifest_path: DEFAULT_MANIFEST_PATH.to_owned(),
            scratch_parent: None,
        }
    }
}

impl DocSyncConfig {
    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("docsync")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Ensures configuration values are present after trimming whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidConfig`] when any required field is empty.
    pub fn validate(&self) -> Result<(), SyncError> {
        Self::require_value(&self.git_bin, "git_bin")?;
        Self::require_value(&self.manifest_path, "manifest_path")?;
        Self::require_optional_value(self.scratch_parent.as_deref(), "scratch_parent")?;
        Ok(())
    }

    /// Returns the manifest location as a UTF-8 path.
    #[must_use]
    pub fn manifest(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.manifest_path.trim())
    }

    /// Returns the scratch parent directory, if one is configured.
    #[must_use]
    pub fn scratch_dir(&self) -> Option<Utf8PathBuf> {
        self.scratch_parent
            .as_deref()
            .map(|value| Utf8PathBuf::from(value.trim()))
    }

    fn require_optional_value(value: Option<&str>, field: &str) -> Result<(), SyncError> {
        match value {
            None => Ok(()),
            Some(v) if !v.trim().is_empty() => Ok(()),
            Some(_) => Err(SyncError::InvalidConfig {
                field: field.to_owned(),
            }),
        }
    }

    fn require_value(value: &str, field: &str) -> Result<(), SyncError> {
        Self::require_optional_value(Some(value), field)
    }
}
