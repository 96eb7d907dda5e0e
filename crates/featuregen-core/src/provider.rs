//! Metadata providers
//!
//! Descriptors come from outside: an extraction tool for the target web
//! framework writes a manifest, and [`ManifestProvider`] reads it.

use crate::error::ProviderError;
use featuregen_descriptor::{EntityCatalog, EntityDescriptor, OperationDescriptor};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Supplies the descriptors of one run
pub trait MetadataProvider: Send + Sync {
    /// Every entity relations or arguments may refer to
    ///
    /// # Errors
    /// Provider-specific loading failure.
    fn entities(&self) -> Result<EntityCatalog, ProviderError>;

    /// Every operation, in route order
    ///
    /// # Errors
    /// Provider-specific loading failure.
    fn operations(&self) -> Result<Vec<OperationDescriptor>, ProviderError>;
}

/// Serialized descriptor set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub entities: Vec<EntityDescriptor>,
    #[serde(default)]
    pub operations: Vec<OperationDescriptor>,
}

/// Provider backed by a JSON or YAML manifest
#[derive(Debug, Clone)]
pub struct ManifestProvider {
    manifest: Manifest,
}

impl ManifestProvider {
    #[inline]
    #[must_use]
    pub fn new(manifest: Manifest) -> Self {
        Self { manifest }
    }

    /// Read a manifest; `.json` is JSON, anything else YAML
    ///
    /// # Errors
    /// Unreadable file or malformed content.
    pub fn from_path(path: &Path) -> Result<Self, ProviderError> {
        let text = fs::read_to_string(path).map_err(|source| ProviderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let manifest = if is_json {
            serde_json::from_str(&text).map_err(|e| ProviderError::parse(path, e))?
        } else {
            serde_yaml::from_str(&text).map_err(|e| ProviderError::parse(path, e))?
        };

        let provider = Self::new(manifest);
        tracing::debug!(
            path = %path.display(),
            entities = provider.manifest.entities.len(),
            operations = provider.manifest.operations.len(),
            "manifest loaded"
        );
        Ok(provider)
    }

    #[inline]
    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

impl MetadataProvider for ManifestProvider {
    fn entities(&self) -> Result<EntityCatalog, ProviderError> {
        Ok(self.manifest.entities.iter().cloned().collect())
    }

    fn operations(&self) -> Result<Vec<OperationDescriptor>, ProviderError> {
        Ok(self.manifest.operations.clone())
    }
}

/// Provider over descriptors built in code
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    catalog: EntityCatalog,
    operations: Vec<OperationDescriptor>,
}

impl InMemoryProvider {
    #[inline]
    #[must_use]
    pub fn new(catalog: EntityCatalog, operations: Vec<OperationDescriptor>) -> Self {
        Self {
            catalog,
            operations,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_operation(mut self, operation: OperationDescriptor) -> Self {
        self.operations.push(operation);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_entity(mut self, entity: EntityDescriptor) -> Self {
        self.catalog.insert(entity);
        self
    }
}

impl MetadataProvider for InMemoryProvider {
    fn entities(&self) -> Result<EntityCatalog, ProviderError> {
        Ok(self.catalog.clone())
    }

    fn operations(&self) -> Result<Vec<OperationDescriptor>, ProviderError> {
        Ok(self.operations.clone())
    }
}

/// Operations keyed by document-group, groups in first-seen order
#[must_use]
pub fn group_operations(
    operations: Vec<OperationDescriptor>,
) -> IndexMap<String, Vec<OperationDescriptor>> {
    let mut groups: IndexMap<String, Vec<OperationDescriptor>> = IndexMap::new();
    for operation in operations {
        groups
            .entry(operation.group.clone())
            .or_default()
            .push(operation);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use featuregen_descriptor::HttpMethod;

    const MANIFEST: &str = r#"{
        "entities": [
            { "identifier": "App\\Entity\\Client", "fields": [
                { "name": "name", "kind": { "type": "scalar", "scalar": "string" } }
            ] }
        ],
        "operations": [
            { "identifier": "list", "group": "B", "http_method": "GET", "path_template": "/b" },
            { "identifier": "show", "group": "A", "http_method": "Get", "path_template": "/a/{id}" },
            { "identifier": "create", "group": "B", "http_method": "post", "path_template": "/b" }
        ]
    }"#;

    #[test]
    fn json_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, MANIFEST).unwrap();

        let provider = ManifestProvider::from_path(&path).unwrap();
        let catalog = provider.entities().unwrap();
        assert!(catalog.contains("App\\Entity\\Client"));

        let operations = provider.operations().unwrap();
        assert_eq!(operations.len(), 3);
        assert_eq!(operations[1].http_method, HttpMethod::Get);
        assert_eq!(operations[2].http_method, HttpMethod::Post);
    }

    #[test]
    fn yaml_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.yaml");
        fs::write(
            &path,
            "operations:\n  - identifier: list\n    group: A\n    http_method: get\n    path_template: /a\n",
        )
        .unwrap();

        let provider = ManifestProvider::from_path(&path).unwrap();
        assert!(provider.entities().unwrap().is_empty());
        assert_eq!(provider.operations().unwrap()[0].identifier, "list");
    }

    #[test]
    fn malformed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ManifestProvider::from_path(&path),
            Err(ProviderError::Parse { .. })
        ));
        assert!(matches!(
            ManifestProvider::from_path(&dir.path().join("missing.json")),
            Err(ProviderError::Read { .. })
        ));
    }

    #[test]
    fn grouping_keeps_first_seen_order() {
        let manifest: Manifest = serde_json::from_str(MANIFEST).unwrap();
        let groups = group_operations(manifest.operations);
        let keys: Vec<_> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(groups["B"].len(), 2);
        assert_eq!(groups["B"][1].identifier, "create");
    }
}
