//! Featuregen Document
//!
//! Everything that touches generated files on disk.
//!
//! # Core Concepts
//!
//! - [`DocumentRenderer`]: Renders and recognises scenario document lines
//! - [`GeneratedDocument`]: An existing document split into header, imports and body
//! - [`DocumentMerger`]: Name-based, append-only reconciliation of planned content
//! - [`DocumentStore`]: Group-to-path mapping and atomic flushes
//! - [`FixtureWriter`]: Exclusive-create YAML fixture files
//!
//! # Example
//!
//! ```rust,ignore
//! use featuregen_document::{DocumentMerger, DocumentStore, GherkinRenderer, MergeRequest};
//!
//! let store = DocumentStore::new("features");
//! let path = store.path_for("App\\Controller\\ClientController");
//! let existing = store.load(&path)?;
//! let outcome = DocumentMerger::new(GherkinRenderer).merge(existing.as_deref(), &request);
//! if let Some(text) = outcome.text {
//!     store.flush(&path, &text)?;
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod document;
mod error;
mod fixture;
mod merger;
mod render;
mod store;

pub use document::GeneratedDocument;
pub use error::{DocumentError, DocumentResult, FixtureError};
pub use fixture::{FixtureStatus, FixtureWriter};
pub use merger::{DocumentMerger, DocumentStatus, MergeOutcome, MergeRequest};
pub use render::{Background, DocumentRenderer, GherkinRenderer, IMPORT_MARKER};
pub use store::{DocumentStore, DOCUMENT_EXTENSION};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
