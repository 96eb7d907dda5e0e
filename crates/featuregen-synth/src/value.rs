//! Field value synthesis
//!
//! Maps one [`FieldDescriptor`] to a literal placeholder. Rules are tried in a
//! strict order and the first match wins; synthesis never fails.
//!
//! 1. Relation: reference to the target fixture (one-element list when to-many)
//! 2. Enumerated choice: first declared choice
//! 3. Temporal: current date/time in the declared pattern
//! 4. Typed constraints: email, phone, range, length, `>=`, identifier, numeric
//! 5. Fallback by primitive kind

use crate::temporal::format_with_pattern;
use chrono::{Local, NaiveDateTime};
use featuregen_descriptor::{
    instance_name, Constraint, FieldDescriptor, FieldKind, Literal, Multiplicity, ScalarType,
};
use indexmap::IndexMap;

/// Placeholder for e-mail constrained fields
pub const EMAIL_PLACEHOLDER: &str = "test@test.com";
/// Placeholder for phone constrained fields
pub const PHONE_PLACEHOLDER: &str = "0606060606";
/// Placeholder for fixed-format identifier fields
pub const IDENTIFIER_PLACEHOLDER: &str = "192126442203529";
/// Placeholder for free text
pub const TEXT_PLACEHOLDER: &str = "test";

/// Deterministic placeholder generator
///
/// The clock is captured once, so every temporal value of one run is
/// formatted from the same instant.
#[derive(Debug, Clone)]
pub struct ValueSynthesizer {
    now: NaiveDateTime,
}

impl Default for ValueSynthesizer {
    fn default() -> Self {
        Self::at_current_time()
    }
}

impl ValueSynthesizer {
    /// Synthesizer pinned to a fixed instant
    #[inline]
    #[must_use]
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Synthesizer pinned to the local wall clock
    #[must_use]
    pub fn at_current_time() -> Self {
        Self::new(Local::now().naive_local())
    }

    /// Instant used for temporal values
    #[inline]
    #[must_use]
    pub fn now(&self) -> &NaiveDateTime {
        &self.now
    }

    /// Current date/time in `pattern` (default `Y-m-d`)
    #[must_use]
    pub fn format_now(&self, pattern: Option<&str>) -> String {
        format_with_pattern(&self.now, pattern)
    }

    /// Synthesize one field
    #[must_use]
    pub fn synthesize(&self, field: &FieldDescriptor) -> Literal {
        let kind = field.kind.as_ref();

        if let Some(FieldKind::Relation {
            target,
            multiplicity,
        }) = kind
        {
            let instance = instance_name(target);
            return match multiplicity {
                Multiplicity::One => Literal::Reference(instance),
                Multiplicity::Many => Literal::ReferenceList(vec![instance]),
            };
        }

        let scalar = kind.and_then(FieldKind::scalar);
        let constraints = kind.map(FieldKind::constraints).unwrap_or(&[]);

        if let Some(choice) = first_choice(constraints) {
            return Literal::text(choice);
        }

        if scalar.is_some_and(|s| s.is_temporal()) {
            return Literal::text(self.format_now(field.format.as_deref()));
        }

        if let Some(value) = constrained_value(constraints, scalar) {
            return value;
        }

        fallback(scalar)
    }

    /// Synthesize a set of fields, keeping their order
    pub fn synthesize_all<'a, I>(&self, fields: I) -> IndexMap<String, Literal>
    where
        I: IntoIterator<Item = &'a FieldDescriptor>,
    {
        fields
            .into_iter()
            .map(|f| (f.name.clone(), self.synthesize(f)))
            .collect()
    }
}

fn first_choice(constraints: &[Constraint]) -> Option<&str> {
    constraints.iter().find_map(|c| match c {
        Constraint::Choice { choices } => choices.first().map(String::as_str),
        _ => None,
    })
}

fn constrained_value(constraints: &[Constraint], scalar: Option<ScalarType>) -> Option<Literal> {
    let has = |pred: fn(&Constraint) -> bool| constraints.iter().any(pred);

    if has(|c| matches!(c, Constraint::Email)) {
        return Some(Literal::text(EMAIL_PLACEHOLDER));
    }
    if has(|c| matches!(c, Constraint::Phone)) {
        return Some(Literal::text(PHONE_PLACEHOLDER));
    }

    let range = constraints.iter().find_map(|c| match c {
        Constraint::Range { min, max } => min.or(*max),
        _ => None,
    });
    if let Some(bound) = range {
        return Some(Literal::float(bound));
    }

    let length = constraints.iter().find_map(|c| match c {
        Constraint::Length { min: Some(min), .. } => Some(*min),
        _ => None,
    });
    if let Some(len) = length {
        let numeric = scalar.is_some_and(|s| s.is_numeric());
        return Some(exact_length(len, numeric));
    }

    let gte = constraints.iter().find_map(|c| match c {
        Constraint::GreaterThanOrEqual { value } => Some(*value),
        _ => None,
    });
    if let Some(bound) = gte {
        return Some(Literal::float(bound));
    }

    if has(|c| matches!(c, Constraint::Identifier)) {
        return Some(Literal::text(IDENTIFIER_PLACEHOLDER));
    }
    if has(|c| matches!(c, Constraint::Numeric)) {
        return Some(Literal::number(1));
    }

    None
}

/// Longest text a length constraint can ask for
pub const MAX_TEXT_LENGTH: u32 = 1024;
/// Longest numeric value a length constraint can ask for; `10^18` still fits `i64`
pub const MAX_NUMERIC_LENGTH: u32 = 19;

/// `10^(len-1)` written out, so the value has exactly `len` characters
///
/// Lengths beyond [`MAX_TEXT_LENGTH`] / [`MAX_NUMERIC_LENGTH`] are clamped.
fn exact_length(len: u32, numeric: bool) -> Literal {
    let cap = if numeric { MAX_NUMERIC_LENGTH } else { MAX_TEXT_LENGTH };
    if len > cap {
        tracing::warn!(requested = len, used = cap, "length constraint clamped");
    }
    let digits = match len.min(cap) {
        0 => String::new(),
        n => format!("1{}", "0".repeat(n as usize - 1)),
    };
    if numeric {
        if digits.is_empty() {
            Literal::number(0)
        } else {
            Literal::Number(digits)
        }
    } else {
        Literal::Text(digits)
    }
}

fn fallback(scalar: Option<ScalarType>) -> Literal {
    match scalar {
        Some(s) if s.is_text() => Literal::text(TEXT_PLACEHOLDER),
        Some(s) if s.is_numeric() => Literal::number(1),
        _ => Literal::text(""),
    }
}
