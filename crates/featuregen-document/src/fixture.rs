//! Write-once fixture files
//!
//! A fixture is rendered into a temporary file next to its destination and
//! linked into place without clobbering, so the destination either holds the
//! complete text or does not exist. Concurrent writers for the same entity
//! race on that final step; the loser observes `AlreadyExists` and skips.

use crate::error::FixtureError;
use featuregen_descriptor::{FixtureNode, Literal};
use serde_yaml::{Mapping, Number, Value};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// What happened to one fixture file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureStatus {
    Created,
    AlreadyPresent,
}

/// Persists fixture nodes as YAML files in one folder
#[derive(Debug, Clone)]
pub struct FixtureWriter {
    dir: PathBuf,
}

impl FixtureWriter {
    #[inline]
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, node: &FixtureNode) -> PathBuf {
        self.dir.join(node.file_name())
    }

    /// YAML text of a node: `entity -> instance -> fields`
    ///
    /// # Errors
    /// Serialization failure.
    pub fn render(node: &FixtureNode) -> Result<String, FixtureError> {
        let fields: Mapping = node
            .fields
            .iter()
            .map(|(name, value)| (Value::String(name.clone()), to_yaml(value)))
            .collect();

        let mut instance = Mapping::new();
        instance.insert(Value::String(node.instance_name.clone()), Value::Mapping(fields));
        let mut root = Mapping::new();
        root.insert(
            Value::String(node.entity_identifier.clone()),
            Value::Mapping(instance),
        );

        serde_yaml::to_string(&Value::Mapping(root))
            .map_err(|e| FixtureError::serialize(&node.instance_name, e))
    }

    /// Create the fixture file unless it already exists
    ///
    /// # Errors
    /// Serialization or I/O failure other than the file already existing.
    pub fn write(&self, node: &FixtureNode) -> Result<FixtureStatus, FixtureError> {
        let path = self.path_for(node);
        let text = Self::render(node)?;

        if path.exists() {
            tracing::trace!(path = %path.display(), "fixture already present");
            return Ok(FixtureStatus::AlreadyPresent);
        }

        let mut file =
            NamedTempFile::new_in(&self.dir).map_err(|e| FixtureError::write(&path, e))?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| FixtureError::write(&path, e))?;

        match file.persist_noclobber(&path) {
            Ok(_) => {}
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                tracing::trace!(path = %path.display(), "fixture created concurrently");
                return Ok(FixtureStatus::AlreadyPresent);
            }
            Err(e) => return Err(FixtureError::write(&path, e.error)),
        }
        tracing::debug!(path = %path.display(), entity = %node.entity_identifier, "fixture created");
        Ok(FixtureStatus::Created)
    }
}

fn to_yaml(literal: &Literal) -> Value {
    match literal {
        Literal::Text(s) => Value::String(s.clone()),
        Literal::Number(n) => number(n),
        Literal::Reference(instance) => Value::String(Literal::reference_token(instance)),
        Literal::ReferenceList(instances) => Value::Sequence(
            instances
                .iter()
                .map(|i| Value::String(Literal::reference_token(i)))
                .collect(),
        ),
    }
}

fn number(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        return Value::Number(Number::from(i));
    }
    // integers beyond i64 keep their exact spelling
    let integral = text.trim_start_matches('-').bytes().all(|b| b.is_ascii_digit());
    match text.parse::<f64>() {
        Ok(f) if !integral => Value::Number(Number::from(f)),
        _ => Value::String(text.to_string()),
    }
}
