//! Operation descriptors: one HTTP method + route path handled by one action

use crate::field::FieldDescriptor;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_.\-]+)\}").expect("placeholder pattern is valid"));

/// Argument types that never bind to an entity fixture
pub const NATIVE_TYPES: [&str; 6] = ["string", "int", "array", "bool", "\\DateTime", "DateTime"];

/// HTTP verb of an operation, deserialized case-insensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// Upper-case verb
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// State-mutating verbs carry a request body
    #[inline]
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown HTTP verb
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown http method: '{0}'")]
pub struct ParseMethodError(pub String);

impl FromStr for HttpMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(ParseMethodError(s.to_string())),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = ParseMethodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Declared type of an action argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ArgumentType {
    /// Language-native type (string, int, DateTime, ...)
    Native(String),
    /// Entity identifier
    Entity(String),
}

impl ArgumentType {
    /// Whether the argument is a date/time conversion target
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Native(n) if n.trim_start_matches('\\') == "DateTime")
    }
}

/// One argument of the action handling an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    pub name: String,
    /// `None` when the signature gives no type
    #[serde(default)]
    pub declared_type: Option<ArgumentType>,
}

impl ArgumentDescriptor {
    #[inline]
    #[must_use]
    pub fn native(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: Some(ArgumentType::Native(type_name.into())),
        }
    }

    #[inline]
    #[must_use]
    pub fn entity(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: Some(ArgumentType::Entity(identifier.into())),
        }
    }

    #[inline]
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
        }
    }
}

/// Named placeholder in a path template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathParam {
    pub name: String,
    /// Route requirement; `a|b|c` is an enumerated alternative
    #[serde(default)]
    pub requirement: Option<String>,
    /// Date/time conversion pattern declared for the placeholder
    #[serde(default)]
    pub temporal_format: Option<String>,
}

impl PathParam {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirement: None,
            temporal_format: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirement = Some(requirement.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_temporal_format(mut self, format: impl Into<String>) -> Self {
        self.temporal_format = Some(format.into());
        self
    }

    /// First alternative of an enumerated requirement (`en|fr` -> `en`)
    #[must_use]
    pub fn first_alternative(&self) -> Option<&str> {
        self.requirement
            .as_deref()
            .filter(|r| r.contains('|'))
            .and_then(|r| r.split('|').next())
    }
}

/// One HTTP method + route path pairing handled by a single action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Action name; also the scenario name
    pub identifier: String,
    /// Document-group the operation belongs to
    pub group: String,
    pub http_method: HttpMethod,
    pub path_template: String,
    #[serde(default)]
    pub path_params: Vec<PathParam>,
    /// Action arguments, used to bind placeholders to entities
    #[serde(default)]
    pub arguments: Vec<ArgumentDescriptor>,
    /// Request body fields, if the action reads a form
    #[serde(default)]
    pub body_fields: Option<Vec<FieldDescriptor>>,
    #[serde(default)]
    pub expected_status_override: Option<u16>,
}

impl OperationDescriptor {
    /// Create operation without params or body
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        group: impl Into<String>,
        http_method: HttpMethod,
        path_template: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            group: group.into(),
            http_method,
            path_template: path_template.into(),
            path_params: Vec::new(),
            arguments: Vec::new(),
            body_fields: None,
            expected_status_override: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_path_param(mut self, param: PathParam) -> Self {
        self.path_params.push(param);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_argument(mut self, argument: ArgumentDescriptor) -> Self {
        self.arguments.push(argument);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_body_field(mut self, field: FieldDescriptor) -> Self {
        self.body_fields.get_or_insert_with(Vec::new).push(field);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_expected_status(mut self, status: u16) -> Self {
        self.expected_status_override = Some(status);
        self
    }

    /// Declared metadata for a placeholder
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&PathParam> {
        self.path_params.iter().find(|p| p.name == name)
    }

    /// Arguments whose name matches the placeholder, case-insensitively
    pub fn arguments_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ArgumentDescriptor> + 'a {
        self.arguments
            .iter()
            .filter(move |a| a.name.eq_ignore_ascii_case(name))
    }

    /// Required body fields, in declaration order
    pub fn required_body_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.body_fields
            .iter()
            .flatten()
            .filter(|f| f.is_required())
    }
}

/// Placeholder names of a path template, in order of appearance
#[must_use]
pub fn placeholders(path_template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(path_template)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Replace every `{name}` of a path template with `example(name)`
#[must_use]
pub fn substitute_placeholders(
    path_template: &str,
    mut example: impl FnMut(&str) -> String,
) -> String {
    PLACEHOLDER
        .replace_all(path_template, |caps: &Captures<'_>| example(&caps[1]))
        .into_owned()
}
