//! Source manifest loading.
//!
//! The manifest is a TOML file listing documentation sources as
//! `[[sources]]` tables. Processing order follows file order. When the file
//! is absent the built-in table from [`crate::source::default_sources`] is
//! used instead.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use ortho_config::toml;
use serde::Deserialize;
use thiserror::Error;

use crate::source::{DocumentationSource, SourceError, default_sources};

/// Default manifest location, relative to the working directory.
pub const DEFAULT_MANIFEST_PATH: &str = "docs-sources.toml";

/// Ordered list of documentation sources.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceManifest {
    /// Sources in processing order.
    pub sources: Vec<DocumentationSource>,
}

/// Errors raised while reading a manifest.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ManifestError {
    /// Raised when file system operations fail.
    #[error("failed to access {path}: {message}")]
    Io {
        /// Path that could not be accessed.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the manifest is not valid TOML or has unexpected keys.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Manifest path.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the manifest lists no sources.
    #[error("{path} does not list any [[sources]]")]
    Empty {
        /// Manifest path.
        path: Utf8PathBuf,
    },
    /// Raised when one of the listed sources fails validation.
    #[error("invalid source #{position} in {path}: {source}")]
    InvalidSource {
        /// Manifest path.
        path: Utf8PathBuf,
        /// One-based position of the source in the manifest.
        position: usize,
        /// Validation failure.
        #[source]
        source: SourceError,
    },
}

impl SourceManifest {
    /// Wraps the built-in source table.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            sources: default_sources(),
        }
    }

    /// Parses manifest text and validates every source.
    ///
    /// `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`], [`ManifestError::Empty`], or
    /// [`ManifestError::InvalidSource`].
    pub fn parse(path: &Utf8Path, contents: &str) -> Result<Self, ManifestError> {
        let manifest: Self = toml::from_str(contents).map_err(|err| ManifestError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

        if manifest.sources.is_empty() {
            return Err(ManifestError::Empty {
                path: path.to_path_buf(),
            });
        }

        for (index, source) in manifest.sources.iter().enumerate() {
            source
                .validate()
                .map_err(|err| ManifestError::InvalidSource {
                    path: path.to_path_buf(),
                    position: index + 1,
                    source: err,
                })?;
        }

        Ok(manifest)
    }

    /// Reads and parses the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Io`] when the file cannot be read, or any
    /// error from [`SourceManifest::parse`].
    pub fn load(path: &Utf8Path) -> Result<Self, ManifestError> {
        let contents = read_manifest(path)?;
        Self::parse(path, &contents)
    }

    /// Reads the manifest at `path`, falling back to [`SourceManifest::builtin`]
    /// when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns any error from [`SourceManifest::load`] other than a missing
    /// file.
    pub fn load_or_builtin(path: &Utf8Path) -> Result<Self, ManifestError> {
        if manifest_exists(path)? {
            Self::load(path)
        } else {
            Ok(Self::builtin())
        }
    }

    /// Consumes the manifest, yielding its sources in order.
    #[must_use]
    pub fn into_sources(self) -> Vec<DocumentationSource> {
        self.sources
    }
}

fn split_path(path: &Utf8Path) -> Result<(&Utf8Path, &str), ManifestError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| ManifestError::Io {
        path: path.to_path_buf(),
        message: String::from("manifest path is missing a filename"),
    })?;
    Ok((parent, file_name))
}

fn manifest_exists(path: &Utf8Path) -> Result<bool, ManifestError> {
    let (parent, file_name) = split_path(path)?;
    match Dir::open_ambient_dir(parent, ambient_authority()) {
        Ok(dir) => dir.try_exists(file_name).map_err(|err| ManifestError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(ManifestError::Io {
            path: parent.to_path_buf(),
            message: err.to_string(),
        }),
    }
}

fn read_manifest(path: &Utf8Path) -> Result<String, ManifestError> {
    let (parent, file_name) = split_path(path)?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| {
        ManifestError::Io {
            path: parent.to_path_buf(),
            message: err.to_string(),
        }
    })?;

    dir.read_to_string(file_name)
        .map_err(|err| ManifestError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
}
