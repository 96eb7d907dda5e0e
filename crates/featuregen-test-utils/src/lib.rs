//! Testing utilities for the featuregen workspace
//!
//! Shared descriptors, a pinned clock and scratch project directories.

#![allow(missing_docs)]

use chrono::{NaiveDate, NaiveDateTime};
use featuregen_descriptor::{
    ArgumentDescriptor, Constraint, EntityCatalog, EntityDescriptor, FieldDescriptor, HttpMethod,
    Multiplicity, OperationDescriptor, ScalarType,
};
use featuregen_synth::ValueSynthesizer;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CLIENT: &str = "App\\Entity\\Client";
pub const ADDRESS: &str = "App\\Entity\\Address";
pub const CLIENT_GROUP: &str = "App\\Controller\\ClientController";

/// 2026-10-16 12:00:00
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 16)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn fixed_synthesizer() -> ValueSynthesizer {
    ValueSynthesizer::new(fixed_now())
}

pub fn address_entity() -> EntityDescriptor {
    EntityDescriptor::new(ADDRESS)
        .with_field(FieldDescriptor::scalar("id", ScalarType::Integer))
        .with_field(FieldDescriptor::scalar("street", ScalarType::Text))
        .with_field(FieldDescriptor::scalar("city", ScalarType::Text))
}

pub fn client_entity() -> EntityDescriptor {
    EntityDescriptor::new(CLIENT)
        .with_field(FieldDescriptor::scalar("id", ScalarType::Integer))
        .with_field(FieldDescriptor::scalar("name", ScalarType::Text))
        .with_field(FieldDescriptor::constrained(
            "email",
            ScalarType::Text,
            vec![Constraint::Email],
        ))
        .with_field(FieldDescriptor::relation("address", ADDRESS, Multiplicity::One))
        .with_field(FieldDescriptor::scalar("nickname", ScalarType::Text).nullable())
}

/// Client + Address
pub fn client_catalog() -> EntityCatalog {
    vec![client_entity(), address_entity()].into_iter().collect()
}

pub fn list_clients() -> OperationDescriptor {
    OperationDescriptor::new("listClients", CLIENT_GROUP, HttpMethod::Get, "/clients")
}

pub fn show_client() -> OperationDescriptor {
    OperationDescriptor::new("showClient", CLIENT_GROUP, HttpMethod::Get, "/clients/{client}")
        .with_argument(ArgumentDescriptor::entity("client", CLIENT))
}

pub fn create_client() -> OperationDescriptor {
    OperationDescriptor::new("createClient", CLIENT_GROUP, HttpMethod::Post, "/clients")
        .with_body_field(FieldDescriptor::scalar("name", ScalarType::Text))
        .with_body_field(
            FieldDescriptor::scalar("birthDate", ScalarType::DateTime).with_format("yyyy-MM-dd"),
        )
}

pub fn delete_client() -> OperationDescriptor {
    OperationDescriptor::new(
        "deleteClient",
        CLIENT_GROUP,
        HttpMethod::Delete,
        "/clients/{client}",
    )
    .with_argument(ArgumentDescriptor::entity("client", CLIENT))
}

/// All client operations, in route order
pub fn client_operations() -> Vec<OperationDescriptor> {
    vec![list_clients(), show_client(), create_client(), delete_client()]
}

/// Scratch project root with `fixtures/` and `features/` directories
pub struct TestProject {
    root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("fixtures")).unwrap();
        fs::create_dir_all(root.path().join("features")).unwrap();
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn fixtures_dir(&self) -> PathBuf {
        self.root.path().join("fixtures")
    }

    pub fn features_dir(&self) -> PathBuf {
        self.root.path().join("features")
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> String {
        fs::read_to_string(self.root.path().join(relative)).unwrap()
    }

    pub fn write(&self, relative: impl AsRef<Path>, contents: &str) {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.root.path().join(relative).exists()
    }

    /// Files directly inside `fixtures/`, sorted by name
    pub fn fixture_files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.fixtures_dir())
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of lines equal to `line` after trimming
pub fn count_lines(text: &str, line: &str) -> usize {
    text.lines().filter(|l| l.trim() == line.trim()).count()
}
