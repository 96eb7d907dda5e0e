//! Error types for the generator
//!
//! Two scopes exist:
//! - [`GroupError`]: aborts one document-group, the batch carries on
//! - [`BatchError`]: aborts the whole run before any group is processed

use featuregen_descriptor::DescriptorError;
use featuregen_document::{DocumentError, FixtureError};
use std::io;
use std::path::{Path, PathBuf};

/// Failure confined to one document-group
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    /// Descriptor quality problem (unclassifiable field, binding failure)
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

impl GroupError {
    #[inline]
    #[must_use]
    pub fn is_descriptor_quality(&self) -> bool {
        matches!(self, Self::Descriptor(e) if e.is_descriptor_quality())
    }
}

/// Configuration loading or validation failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read configuration {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported configuration format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("{0} folder must not be empty")]
    EmptyFolder(&'static str),

    #[error("invalid authentication pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ConfigError {
    #[inline]
    #[must_use]
    pub fn parse(path: &Path, message: impl ToString) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Metadata provider failure
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("cannot read manifest {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid manifest {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl ProviderError {
    #[inline]
    #[must_use]
    pub fn parse(path: &Path, message: impl ToString) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Failure that stops the whole run
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Output folder missing and not creatable, or not writable
    #[error("output directory {} is not writable: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `--namespace` named a group that does not exist
    #[error("no route matched this namespace: {0}")]
    NamespaceNotFound(String),

    /// Filters left nothing to generate
    #[error("no route matched the filters")]
    NoGroupsMatched,
}

impl BatchError {
    #[inline]
    #[must_use]
    pub fn output_directory(path: &Path, source: io::Error) -> Self {
        Self::OutputDirectory {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for batch operations
pub type BatchResult<T> = Result<T, BatchError>;
