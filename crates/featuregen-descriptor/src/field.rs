//! Field descriptors
//!
//! A field is classified as exactly one of [`FieldKind::Scalar`],
//! [`FieldKind::Relation`] or [`FieldKind::Constrained`]. A field the
//! provider could not classify carries no kind at all.

use crate::error::DescriptorError;
use serde::{Deserialize, Serialize};

/// Bookkeeping fields never treated as required, whatever their nullability
pub const BOOKKEEPING_FIELDS: [&str; 5] = ["id", "uuid", "createdAt", "updatedAt", "deletedAt"];

/// Primitive type of a scalar field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// Free text
    #[serde(alias = "string")]
    Text,
    /// Whole number
    #[serde(alias = "int", alias = "smallint", alias = "bigint")]
    Integer,
    /// Decimal number
    #[serde(alias = "number", alias = "decimal")]
    Float,
    /// True/false flag
    #[serde(alias = "bool")]
    Boolean,
    /// Calendar date
    Date,
    /// Date and time
    #[serde(alias = "datetime")]
    DateTime,
    /// Time of day
    Time,
    /// Selection among enumerated values
    Choice,
    /// Anything the provider could name but not map
    #[serde(other)]
    Unknown,
}

impl ScalarType {
    /// Numeric-like types synthesize unquoted literals
    #[inline]
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float | Self::Boolean)
    }

    /// Temporal types synthesize the current date/time
    #[inline]
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime | Self::Time)
    }

    /// Free-text-like types
    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text | Self::Choice)
    }
}

/// Cardinality of a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    /// To-one relation
    #[default]
    One,
    /// To-many relation
    Many,
}

/// Validation constraint attached to a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Value must be one of the declared choices
    Choice {
        /// Allowed values, in declaration order
        choices: Vec<String>,
    },
    /// Value must look like an e-mail address
    Email,
    /// Value must look like a phone number
    Phone,
    /// Numeric value within bounds
    Range {
        /// Lower bound (inclusive)
        #[serde(default)]
        min: Option<f64>,
        /// Upper bound (inclusive)
        #[serde(default)]
        max: Option<f64>,
    },
    /// Length bounds
    Length {
        /// Minimum length
        #[serde(default)]
        min: Option<u32>,
        /// Maximum length
        #[serde(default)]
        max: Option<u32>,
    },
    /// Value must be greater than or equal to a bound
    GreaterThanOrEqual {
        /// The bound
        value: f64,
    },
    /// Fixed-format identifier (social security number and the like)
    Identifier,
    /// Value must be numeric
    Numeric,
    /// Constraint the synthesizer has no rule for
    #[serde(other)]
    Other,
}

/// Classification of a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain typed value
    Scalar {
        /// Primitive type
        scalar: ScalarType,
    },
    /// Reference to another entity
    Relation {
        /// Target entity identifier
        target: String,
        /// Cardinality
        #[serde(default)]
        multiplicity: Multiplicity,
    },
    /// Typed value with validation constraints
    Constrained {
        /// Primitive type
        scalar: ScalarType,
        /// Constraints, in declaration order
        #[serde(default)]
        constraints: Vec<Constraint>,
    },
}

impl FieldKind {
    /// Primitive type, if this is not a relation
    #[must_use]
    pub fn scalar(&self) -> Option<ScalarType> {
        match self {
            Self::Scalar { scalar } | Self::Constrained { scalar, .. } => Some(*scalar),
            Self::Relation { .. } => None,
        }
    }

    /// Declared constraints (empty for scalars and relations)
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        match self {
            Self::Constrained { constraints, .. } => constraints,
            _ => &[],
        }
    }
}

/// One field of an entity or request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,
    /// Classification; `None` when the provider could not classify it
    #[serde(default)]
    pub kind: Option<FieldKind>,
    /// Whether the field may be left empty
    #[serde(default)]
    pub nullable: bool,
    /// Whether the entity initializes the field itself (e.g. in its constructor)
    #[serde(default)]
    pub already_initialized: bool,
    /// Declared date/time pattern, for temporal fields
    #[serde(default)]
    pub format: Option<String>,
}

impl FieldDescriptor {
    fn with_kind(name: impl Into<String>, kind: Option<FieldKind>) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            already_initialized: false,
            format: None,
        }
    }

    /// Create scalar field
    #[inline]
    #[must_use]
    pub fn scalar(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self::with_kind(name, Some(FieldKind::Scalar { scalar }))
    }

    /// Create relation field
    #[inline]
    #[must_use]
    pub fn relation(
        name: impl Into<String>,
        target: impl Into<String>,
        multiplicity: Multiplicity,
    ) -> Self {
        Self::with_kind(
            name,
            Some(FieldKind::Relation {
                target: target.into(),
                multiplicity,
            }),
        )
    }

    /// Create constrained field
    #[inline]
    #[must_use]
    pub fn constrained(
        name: impl Into<String>,
        scalar: ScalarType,
        constraints: Vec<Constraint>,
    ) -> Self {
        Self::with_kind(
            name,
            Some(FieldKind::Constrained {
                scalar,
                constraints,
            }),
        )
    }

    /// Create field the provider failed to classify
    #[inline]
    #[must_use]
    pub fn unclassified(name: impl Into<String>) -> Self {
        Self::with_kind(name, None)
    }

    /// Mark as nullable
    #[inline]
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark as initialized by the entity itself
    #[inline]
    #[must_use]
    pub fn initialized(mut self) -> Self {
        self.already_initialized = true;
        self
    }

    /// Attach a date/time pattern
    #[inline]
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Whether the field is a bookkeeping column
    #[inline]
    #[must_use]
    pub fn is_bookkeeping(&self) -> bool {
        BOOKKEEPING_FIELDS.contains(&self.name.as_str())
    }

    /// Required = not nullable, not initialized by the entity, not bookkeeping
    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        !self.nullable && !self.already_initialized && !self.is_bookkeeping()
    }

    /// Relation target and multiplicity, if this is a relation
    #[must_use]
    pub fn relation_target(&self) -> Option<(&str, Multiplicity)> {
        match &self.kind {
            Some(FieldKind::Relation {
                target,
                multiplicity,
            }) => Some((target.as_str(), *multiplicity)),
            _ => None,
        }
    }

    /// Classification, or `DescriptorIncomplete` naming the owning entity
    pub fn classify(&self, owner: &str) -> Result<&FieldKind, DescriptorError> {
        self.kind.as_ref().ok_or_else(|| {
            DescriptorError::incomplete(owner, &self.name, "field has no scalar, relation or constraint classification")
        })
    }
}
