//! Seed discovery
//!
//! Binds path placeholders to the action arguments that receive them, and
//! collects the entities a group's operations need directly.

use featuregen_descriptor::{
    placeholders, ArgumentType, DescriptorError, EntityCatalog, OperationDescriptor, NATIVE_TYPES,
};
use indexmap::IndexMap;

/// An entity required directly by an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    /// Placeholder or body field that requires the entity
    pub param_name: String,
    pub entity_identifier: String,
}

impl Seed {
    #[inline]
    #[must_use]
    pub fn new(param_name: impl Into<String>, entity_identifier: impl Into<String>) -> Self {
        Self {
            param_name: param_name.into(),
            entity_identifier: entity_identifier.into(),
        }
    }
}

/// Seeds of one operation: bound path placeholders, then relation body fields
///
/// # Errors
/// - `AmbiguousParameterBinding` if a placeholder matches several arguments
/// - `MissingTypeInformation` if the matching argument has no declared type
/// - `UnresolvedServiceReference` if an entity is missing from the catalog
pub fn bind_operation(
    operation: &OperationDescriptor,
    catalog: &EntityCatalog,
) -> Result<Vec<Seed>, DescriptorError> {
    let mut seeds = Vec::new();

    for name in placeholders(&operation.path_template) {
        let mut matching = operation.arguments_named(name);
        let Some(argument) = matching.next() else {
            continue;
        };
        if matching.next().is_some() {
            return Err(DescriptorError::ambiguous(&operation.identifier, name));
        }

        let declared = argument
            .declared_type
            .as_ref()
            .ok_or_else(|| DescriptorError::missing_type(&operation.identifier, &argument.name))?;

        let identifier = match declared {
            ArgumentType::Native(_) => continue,
            ArgumentType::Entity(id) if id.is_empty() || NATIVE_TYPES.contains(&id.as_str()) => {
                continue
            }
            ArgumentType::Entity(id) => id,
        };

        if !catalog.contains(identifier) {
            return Err(DescriptorError::unresolved(&operation.identifier, identifier));
        }
        seeds.push(Seed::new(name, identifier.clone()));
    }

    for field in operation.required_body_fields() {
        if let Some((target, _)) = field.relation_target() {
            if !catalog.contains(target) {
                return Err(DescriptorError::unresolved(&operation.identifier, target));
            }
            seeds.push(Seed::new(&field.name, target));
        }
    }

    Ok(seeds)
}

/// Seeds of a whole group, deduplicated by entity identifier (first wins)
///
/// # Errors
/// The first binding error of any operation.
pub fn collect_seeds<'a, I>(operations: I, catalog: &EntityCatalog) -> Result<Vec<Seed>, DescriptorError>
where
    I: IntoIterator<Item = &'a OperationDescriptor>,
{
    let mut unique: IndexMap<String, Seed> = IndexMap::new();
    for operation in operations {
        for seed in bind_operation(operation, catalog)? {
            unique.entry(seed.entity_identifier.clone()).or_insert(seed);
        }
    }
    Ok(unique.into_values().collect())
}
