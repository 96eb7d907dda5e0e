//! Scenario planning
//!
//! Turns one [`OperationDescriptor`] into a [`ScenarioRecord`]: a concrete
//! request path, an optional body and the expected status code.

use crate::value::ValueSynthesizer;
use featuregen_descriptor::{
    substitute_placeholders, ArgumentType, DescriptorError, HttpMethod, OperationDescriptor,
    ScenarioRecord,
};
use std::collections::HashMap;

/// Literal substituted for placeholders with no better example
pub const CANONICAL_PLACEHOLDER: &str = "1";

/// Verb to expected-status mapping, with per-verb overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTable {
    overrides: HashMap<HttpMethod, u16>,
}

impl StatusTable {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in status for a verb
    #[must_use]
    pub fn default_for(method: HttpMethod) -> u16 {
        match method {
            HttpMethod::Post | HttpMethod::Patch => 201,
            HttpMethod::Put | HttpMethod::Delete => 204,
            _ => 200,
        }
    }

    /// Override the status for one verb
    #[must_use]
    pub fn with_override(mut self, method: HttpMethod, status: u16) -> Self {
        self.overrides.insert(method, status);
        self
    }

    /// Configured status for a verb
    #[must_use]
    pub fn status_for(&self, method: HttpMethod) -> u16 {
        self.overrides
            .get(&method)
            .copied()
            .unwrap_or_else(|| Self::default_for(method))
    }

    /// Operation override first, then the table
    #[must_use]
    pub fn resolve(&self, operation: &OperationDescriptor) -> u16 {
        operation
            .expected_status_override
            .unwrap_or_else(|| self.status_for(operation.http_method))
    }
}

impl FromIterator<(HttpMethod, u16)> for StatusTable {
    fn from_iter<I: IntoIterator<Item = (HttpMethod, u16)>>(iter: I) -> Self {
        Self {
            overrides: iter.into_iter().collect(),
        }
    }
}

/// Plans scenarios from operation descriptors
#[derive(Debug, Clone, Default)]
pub struct ScenarioPlanner {
    synthesizer: ValueSynthesizer,
    statuses: StatusTable,
}

impl ScenarioPlanner {
    #[inline]
    #[must_use]
    pub fn new(synthesizer: ValueSynthesizer, statuses: StatusTable) -> Self {
        Self {
            synthesizer,
            statuses,
        }
    }

    #[inline]
    #[must_use]
    pub fn synthesizer(&self) -> &ValueSynthesizer {
        &self.synthesizer
    }

    /// Plan one scenario
    ///
    /// # Errors
    /// `DescriptorIncomplete` if a required body field of a mutating
    /// operation is unclassified.
    pub fn plan(&self, operation: &OperationDescriptor) -> Result<ScenarioRecord, DescriptorError> {
        let body = if operation.http_method.is_mutating() {
            for field in operation.required_body_fields() {
                field.classify(&operation.identifier)?;
            }
            Some(self.synthesizer.synthesize_all(operation.required_body_fields()))
        } else {
            None
        };
        let record = ScenarioRecord {
            name: operation.identifier.clone(),
            method: operation.http_method,
            path: self.resolve_path(operation),
            body,
            expected_status: self.statuses.resolve(operation),
        };

        tracing::debug!(
            scenario = %record.name,
            method = %record.method,
            path = %record.path,
            status = record.expected_status,
            "planned scenario"
        );
        Ok(record)
    }

    /// Replace every `{placeholder}` with a concrete example
    ///
    /// Enumerated requirements resolve to their first alternative, temporal
    /// placeholders to the current date/time, everything else to `1`.
    #[must_use]
    pub fn resolve_path(&self, operation: &OperationDescriptor) -> String {
        substitute_placeholders(&operation.path_template, |name| {
            self.example_for(operation, name)
        })
    }

    fn example_for(&self, operation: &OperationDescriptor, name: &str) -> String {
        let param = operation.path_param(name);

        if let Some(alternative) = param.and_then(|p| p.first_alternative()) {
            return alternative.to_string();
        }

        let declared_format = param.and_then(|p| p.temporal_format.as_deref());
        let temporal_argument = operation
            .arguments_named(name)
            .any(|a| a.declared_type.as_ref().is_some_and(ArgumentType::is_temporal));

        if declared_format.is_some() || temporal_argument {
            return self.synthesizer.format_now(declared_format);
        }

        CANONICAL_PLACEHOLDER.to_string()
    }
}
