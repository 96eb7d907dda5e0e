//! Featuregen Synthesis
//!
//! Deterministic placeholder values and scenario planning.
//!
//! - [`ValueSynthesizer`]: field descriptor -> literal placeholder
//! - [`ScenarioPlanner`]: operation descriptor -> scenario record
//! - [`StatusTable`]: HTTP verb -> expected status, with overrides
//!
//! The only non-deterministic input is the clock, captured once per
//! synthesizer; tests pin it with [`ValueSynthesizer::new`].

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod planner;
pub mod temporal;
mod value;

pub use planner::{ScenarioPlanner, StatusTable, CANONICAL_PLACEHOLDER};
pub use value::{
    ValueSynthesizer, EMAIL_PLACEHOLDER, IDENTIFIER_PLACEHOLDER, MAX_NUMERIC_LENGTH,
    MAX_TEXT_LENGTH, PHONE_PLACEHOLDER, TEXT_PLACEHOLDER,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
