//! Scenario document storage
//!
//! Documents are flushed through a temporary file in the destination
//! directory and renamed into place, so readers never observe a partial file.

use crate::error::{DocumentError, DocumentResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Extension of scenario documents
pub const DOCUMENT_EXTENSION: &str = "feature";

/// Maps document-groups to files under a root folder
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `A\B\CController` -> `<root>/A/B/CController.feature`
    #[must_use]
    pub fn path_for(&self, group: &str) -> PathBuf {
        let mut path = self.root.clone();
        let segments: Vec<&str> = group
            .split(|c| c == '\\' || c == '/')
            .filter(|s| !s.is_empty())
            .collect();
        match segments.split_last() {
            Some((file, dirs)) => {
                path.extend(dirs);
                path.push(format!("{file}.{DOCUMENT_EXTENSION}"));
            }
            None => path.push(format!("default.{DOCUMENT_EXTENSION}")),
        }
        path
    }

    /// Current text of a document, `None` if it does not exist yet
    ///
    /// # Errors
    /// Any read failure other than the file being absent.
    pub fn load(&self, path: &Path) -> DocumentResult<Option<String>> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DocumentError::read(path, e)),
        }
    }

    /// Create the parent folder of `path`; true if it had to be created
    ///
    /// # Errors
    /// The folder cannot be created.
    pub fn ensure_parent(&self, path: &Path) -> DocumentResult<bool> {
        let Some(parent) = path.parent() else {
            return Ok(false);
        };
        if parent.as_os_str().is_empty() || parent.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(parent).map_err(|e| DocumentError::write(parent, e))?;
        tracing::debug!(path = %parent.display(), "folder created");
        Ok(true)
    }

    /// Replace the document at `path` with `text` atomically
    ///
    /// # Errors
    /// The temporary file cannot be written or renamed over `path`.
    pub fn flush(&self, path: &Path, text: &str) -> DocumentResult<()> {
        self.ensure_parent(path)?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut file = NamedTempFile::new_in(dir).map_err(|e| DocumentError::write(path, e))?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| DocumentError::write(path, e))?;
        file.persist(path)
            .map_err(|e| DocumentError::persist(path, e.error))?;

        tracing::debug!(path = %path.display(), bytes = text.len(), "document flushed");
        Ok(())
    }
}
