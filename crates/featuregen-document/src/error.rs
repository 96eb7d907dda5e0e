//! Error types for document and fixture persistence
//!
//! Every variant carries the path it failed on; these errors are always
//! scoped to the group being processed.

use std::io;
use std::path::{Path, PathBuf};

/// Scenario document I/O failure
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Existing document could not be read
    #[error("cannot read document {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Temporary file or parent directory could not be written
    #[error("cannot write document {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Temporary file could not be moved over the destination
    #[error("cannot persist document {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DocumentError {
    #[inline]
    #[must_use]
    pub fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    #[inline]
    #[must_use]
    pub fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    #[inline]
    #[must_use]
    pub fn persist(path: &Path, source: io::Error) -> Self {
        Self::Persist {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path the failure refers to
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } | Self::Persist { path, .. } => {
                path
            }
        }
    }
}

/// Fixture file failure
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("cannot serialize fixture {instance}: {source}")]
    Serialize {
        instance: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cannot write fixture {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FixtureError {
    #[inline]
    #[must_use]
    pub fn serialize(instance: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::Serialize {
            instance: instance.into(),
            source,
        }
    }

    #[inline]
    #[must_use]
    pub fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result alias for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;
