//! Entity descriptors and the per-run entity catalog

use crate::field::FieldDescriptor;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Last segment of a namespaced identifier (`App\Entity\Client` -> `Client`)
#[must_use]
pub fn simple_name(identifier: &str) -> &str {
    identifier
        .rsplit(|c| c == '\\' || c == '/' || c == ':')
        .find(|segment| !segment.is_empty())
        .unwrap_or(identifier)
}

/// Fixture instance name: the simple name with its leading letter lowercased
#[must_use]
pub fn instance_name(identifier: &str) -> String {
    let simple = simple_name(identifier);
    let mut chars = simple.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A persisted entity and its ordered fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Fully qualified identifier
    pub identifier: String,
    /// Fields, in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl EntityDescriptor {
    /// Create entity without fields
    #[inline]
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[inline]
    #[must_use]
    pub fn simple_name(&self) -> &str {
        simple_name(&self.identifier)
    }

    #[inline]
    #[must_use]
    pub fn instance_name(&self) -> String {
        instance_name(&self.identifier)
    }

    /// Fields a fixture must populate, in declaration order
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_required())
    }
}

/// Entities known for one run, keyed by identifier in supply order
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    entities: IndexMap<String, EntityDescriptor>,
}

impl EntityCatalog {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity; a later descriptor for the same identifier replaces
    /// the earlier one
    pub fn insert(&mut self, entity: EntityDescriptor) {
        self.entities.insert(entity.identifier.clone(), entity);
    }

    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&EntityDescriptor> {
        self.entities.get(identifier)
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.entities.contains_key(identifier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entities.values()
    }
}

impl FromIterator<EntityDescriptor> for EntityCatalog {
    fn from_iter<I: IntoIterator<Item = EntityDescriptor>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for entity in iter {
            catalog.insert(entity);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ScalarType;

    #[test]
    fn simple_name_strips_namespace() {
        assert_eq!(simple_name("App\\Entity\\Client"), "Client");
        assert_eq!(simple_name("app::entity::Client"), "Client");
        assert_eq!(simple_name("Client"), "Client");
    }

    #[test]
    fn instance_name_lowercases_leading_letter() {
        assert_eq!(instance_name("App\\Entity\\ClientAddress"), "clientAddress");
        assert_eq!(instance_name(""), "");
    }

    #[test]
    fn catalog_lookup() {
        let catalog: EntityCatalog = vec![
            EntityDescriptor::new("A").with_field(FieldDescriptor::scalar("x", ScalarType::Text)),
            EntityDescriptor::new("B"),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("A"));
        assert_eq!(catalog.get("A").map(|e| e.fields.len()), Some(1));
        assert!(catalog.get("C").is_none());
    }
}
