//! Synthesized values and the records built from them

use crate::operation::HttpMethod;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Number, Value};
use std::fmt;

/// Placeholder value for one field
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Quoted string
    Text(String),
    /// Unquoted numeric text, kept as text so long digit runs survive
    Number(String),
    /// Reference to another fixture by instance name
    Reference(String),
    /// To-many reference
    ReferenceList(Vec<String>),
}

impl Literal {
    #[inline]
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[inline]
    #[must_use]
    pub fn number(value: impl fmt::Display) -> Self {
        Self::Number(value.to_string())
    }

    /// Render a float without a trailing `.0` when it is integral
    #[must_use]
    pub fn float(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < 1e15 {
            Self::Number(format!("{}", value as i64))
        } else {
            Self::Number(value.to_string())
        }
    }

    /// `@instance` token for a reference
    #[must_use]
    pub fn reference_token(instance: &str) -> String {
        format!("@{instance}")
    }

    /// Whether this value points at other fixtures
    #[inline]
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_) | Self::ReferenceList(_))
    }

    /// Instance names this value points at
    #[must_use]
    pub fn referenced_instances(&self) -> Vec<&str> {
        match self {
            Self::Reference(name) => vec![name.as_str()],
            Self::ReferenceList(names) => names.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// JSON value used in a request body; references become the seeded
    /// record identifier `1`
    #[must_use]
    pub fn to_request_value(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => number_value(n),
            Self::Reference(_) => Value::from(1),
            Self::ReferenceList(names) => Value::Array(vec![Value::from(1); names.len()]),
        }
    }

    /// JSON value in fixture form, references as `@name` tokens
    #[must_use]
    pub fn to_fixture_value(&self) -> Value {
        match self {
            Self::Reference(name) => Value::String(Self::reference_token(name)),
            Self::ReferenceList(names) => names
                .iter()
                .map(|n| Value::String(Self::reference_token(n)))
                .collect(),
            other => other.to_request_value(),
        }
    }

    #[must_use]
    pub fn to_request_json(&self) -> String {
        self.to_request_value().to_string()
    }
}

/// Fixture-style rendering: quoted text, `"@name"` references
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fixture_value())
    }
}

/// Integers stay exact; text that no JSON number can hold is kept as a string
fn number_value(n: &str) -> Value {
    if let Ok(i) = n.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(u) = n.parse::<u64>() {
        return Value::from(u);
    }
    let is_integral = n.bytes().all(|b| b.is_ascii_digit() || b == b'-');
    match n.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(number) if !is_integral => Value::Number(number),
        _ => Value::String(n.to_string()),
    }
}

/// Synthesized fixture record for one entity
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureNode {
    pub entity_identifier: String,
    pub instance_name: String,
    /// Field values, in entity declaration order
    pub fields: IndexMap<String, Literal>,
}

impl FixtureNode {
    #[must_use]
    pub fn new(entity_identifier: impl Into<String>, instance_name: impl Into<String>) -> Self {
        Self {
            entity_identifier: entity_identifier.into(),
            instance_name: instance_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// File the fixture is persisted to, relative to the fixtures directory
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.yaml", self.instance_name)
    }

    /// Instance names this fixture depends on
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.fields.values().flat_map(Literal::referenced_instances)
    }
}

/// Planned acceptance scenario; `name` is the idempotency key in a document
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRecord {
    pub name: String,
    pub method: HttpMethod,
    /// Concrete request path
    pub path: String,
    /// Request body, for state-mutating verbs only
    pub body: Option<IndexMap<String, Literal>>,
    pub expected_status: u16,
}

impl ScenarioRecord {
    /// Pretty JSON body, one field per line, declaration order preserved
    #[must_use]
    pub fn body_json(&self, indent: &str) -> Option<String> {
        let body: IndexMap<&str, Value> = self
            .body
            .as_ref()?
            .iter()
            .map(|(name, value)| (name.as_str(), value.to_request_value()))
            .collect();

        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(
            &mut out,
            PrettyFormatter::with_indent(indent.as_bytes()),
        );
        body.serialize(&mut serializer).ok()?;
        String::from_utf8(out).ok()
    }
}
