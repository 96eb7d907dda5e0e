//! Zone parsing of an existing scenario document
//!
//! A document is split at the fixture-import marker into a header (up to and
//! including the marker line), the contiguous import rows that follow it, and
//! the body (everything else). Lines are kept verbatim, so reassembling an
//! unmodified document reproduces its text.

use crate::render::DocumentRenderer;
use indexmap::IndexSet;

/// A previously generated (and possibly hand-edited) document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    header: Vec<String>,
    imports: Vec<String>,
    body: Vec<String>,
    has_marker: bool,
    existing_fixture_names: IndexSet<String>,
    existing_scenario_names: IndexSet<String>,
}

impl GeneratedDocument {
    /// Split `text` into zones
    ///
    /// Without a recognisable marker the whole text is body.
    #[must_use]
    pub fn parse(text: &str, renderer: &dyn DocumentRenderer) -> Self {
        let lines: Vec<&str> = text.split('\n').collect();

        let (header, imports, body, has_marker) =
            match lines.iter().position(|l| renderer.is_import_marker(l)) {
                Some(marker) => {
                    let rows = lines[marker + 1..]
                        .iter()
                        .take_while(|l| renderer.import_name(l).is_some())
                        .count();
                    let body_start = marker + 1 + rows;
                    (
                        &lines[..=marker],
                        &lines[marker + 1..body_start],
                        &lines[body_start..],
                        true,
                    )
                }
                None => (&lines[..0], &lines[..0], &lines[..], false),
            };

        let existing_fixture_names: IndexSet<String> = imports
            .iter()
            .filter_map(|l| renderer.import_name(l))
            .filter(|name| !name.is_empty())
            .collect();
        let existing_scenario_names: IndexSet<String> = lines
            .iter()
            .filter_map(|l| renderer.scenario_name(l))
            .map(str::to_string)
            .collect();

        let owned = |zone: &[&str]| -> Vec<String> {
            zone.iter().map(|l| (*l).to_string()).collect()
        };
        Self {
            header: owned(header),
            imports: owned(imports),
            body: owned(body),
            has_marker,
            existing_fixture_names,
            existing_scenario_names,
        }
    }

    #[inline]
    #[must_use]
    pub fn has_marker(&self) -> bool {
        self.has_marker
    }

    #[must_use]
    pub fn has_scenario(&self, name: &str) -> bool {
        self.existing_scenario_names.contains(name)
    }

    #[must_use]
    pub fn has_fixture(&self, name: &str) -> bool {
        self.existing_fixture_names.contains(name)
    }

    /// Scenario names anywhere in the document, in document order
    #[must_use]
    pub fn existing_scenario_names(&self) -> &IndexSet<String> {
        &self.existing_scenario_names
    }

    /// Fixture names of the import table, in document order
    #[must_use]
    pub fn existing_fixture_names(&self) -> &IndexSet<String> {
        &self.existing_fixture_names
    }

    #[must_use]
    pub fn raw_header(&self) -> String {
        self.header.join("\n")
    }

    #[must_use]
    pub fn raw_imports(&self) -> String {
        self.imports.join("\n")
    }

    #[must_use]
    pub fn raw_body(&self) -> String {
        self.body.join("\n")
    }

    /// Reassemble the document with `rows` appended to the import table
    #[must_use]
    pub fn to_text_with_imports(&self, rows: &[String]) -> String {
        self.header
            .iter()
            .chain(&self.imports)
            .chain(rows)
            .chain(&self.body)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
