//! Descriptor-quality errors
//!
//! Every variant means the metadata supplied for one document-group cannot be
//! turned into fixtures or scenarios. They are all handled the same way:
//! the enclosing group is skipped and the batch continues.

/// Errors raised by incomplete or inconsistent descriptors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// A field cannot be classified as scalar, relation or constrained
    #[error("descriptor incomplete: {entity}.{field}: {reason}")]
    DescriptorIncomplete {
        entity: String,
        field: String,
        reason: String,
    },

    /// A path placeholder matches more than one action argument
    #[error("ambiguous parameter binding in {operation}: '{parameter}' matches more than one argument")]
    AmbiguousParameterBinding { operation: String, parameter: String },

    /// An action argument bound to a placeholder has no declared type
    #[error("missing type information in {operation}: argument '{parameter}' has no declared type")]
    MissingTypeInformation { operation: String, parameter: String },

    /// A referenced entity is not present in the catalog
    #[error("unresolved service reference in {operation}: '{reference}' not found")]
    UnresolvedServiceReference { operation: String, reference: String },
}

impl DescriptorError {
    /// Create `DescriptorIncomplete`
    pub fn incomplete(
        entity: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::DescriptorIncomplete {
            entity: entity.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create `AmbiguousParameterBinding`
    pub fn ambiguous(operation: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::AmbiguousParameterBinding {
            operation: operation.into(),
            parameter: parameter.into(),
        }
    }

    /// Create `MissingTypeInformation`
    pub fn missing_type(operation: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MissingTypeInformation {
            operation: operation.into(),
            parameter: parameter.into(),
        }
    }

    /// Create `UnresolvedServiceReference`
    pub fn unresolved(operation: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::UnresolvedServiceReference {
            operation: operation.into(),
            reference: reference.into(),
        }
    }

    /// Short machine-friendly name of the variant
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DescriptorIncomplete { .. } => "descriptor_incomplete",
            Self::AmbiguousParameterBinding { .. } => "ambiguous_parameter_binding",
            Self::MissingTypeInformation { .. } => "missing_type_information",
            Self::UnresolvedServiceReference { .. } => "unresolved_service_reference",
        }
    }

    /// All variants are descriptor-quality errors: they abort one group only
    #[inline]
    #[must_use]
    pub fn is_descriptor_quality(&self) -> bool {
        true
    }
}

/// Result alias for descriptor processing
pub type DescriptorResult<T> = Result<T, DescriptorError>;
