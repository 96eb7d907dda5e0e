//! Idempotent document merging
//!
//! The merger compares planned scenarios and required fixtures against what a
//! document already contains, by name. Existing text is never restructured:
//! missing import rows are appended to the import table and new scenarios
//! are appended after the body.

use crate::document::GeneratedDocument;
use crate::render::{Background, DocumentRenderer, GherkinRenderer};
use featuregen_descriptor::ScenarioRecord;
use indexmap::IndexSet;
use std::fmt;

/// Result of one merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentStatus {
    Created,
    Updated,
    Unchanged,
}

impl DocumentStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        }
    }

    /// Whether the document must be flushed
    #[inline]
    #[must_use]
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a group wants its document to contain
#[derive(Debug, Clone, Default)]
pub struct MergeRequest {
    /// Document-group identifier, used as the feature title
    pub title: String,
    /// Required fixture names, shared fixture first
    pub fixtures: Vec<String>,
    pub authentication: Option<String>,
    /// Applied to newly rendered scenarios only
    pub tag: Option<String>,
    pub scenarios: Vec<ScenarioRecord>,
}

impl MergeRequest {
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_fixture(mut self, name: impl Into<String>) -> Self {
        self.fixtures.push(name.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_authentication(mut self, identity: impl Into<String>) -> Self {
        self.authentication = Some(identity.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_scenario(mut self, record: ScenarioRecord) -> Self {
        self.scenarios.push(record);
        self
    }
}

/// What the merge decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// New document text; `None` when nothing has to be written
    pub text: Option<String>,
    pub status: DocumentStatus,
    pub scenarios_added: usize,
    pub imports_added: usize,
    /// Planned names that appeared more than once in the request
    pub duplicates: Vec<String>,
}

impl MergeOutcome {
    fn unchanged(duplicates: Vec<String>) -> Self {
        Self {
            text: None,
            status: DocumentStatus::Unchanged,
            scenarios_added: 0,
            imports_added: 0,
            duplicates,
        }
    }
}

/// Reconciles planned content with an existing document
#[derive(Debug, Clone, Default)]
pub struct DocumentMerger<R = GherkinRenderer> {
    renderer: R,
}

impl<R: DocumentRenderer> DocumentMerger<R> {
    #[inline]
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    #[inline]
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Merge `request` into `existing` (or into a fresh document)
    ///
    /// Applying the same request to the returned text yields `Unchanged`.
    #[must_use]
    pub fn merge(&self, existing: Option<&str>, request: &MergeRequest) -> MergeOutcome {
        let (planned, duplicates) = first_of_each_name(&request.scenarios);

        match existing {
            None => self.fresh(request, &planned, duplicates),
            Some(text) => self.reconcile(text, request, &planned, duplicates),
        }
    }

    fn fresh(
        &self,
        request: &MergeRequest,
        planned: &[&ScenarioRecord],
        duplicates: Vec<String>,
    ) -> MergeOutcome {
        if planned.is_empty() {
            return MergeOutcome::unchanged(duplicates);
        }

        let imports: Vec<String> = request
            .fixtures
            .iter()
            .cloned()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        let mut text = self.renderer.background(&Background {
            title: &request.title,
            imports: &imports,
            authentication: request.authentication.as_deref(),
        });
        self.append_scenarios(&mut text, planned, request.tag.as_deref());

        MergeOutcome {
            text: Some(text),
            status: DocumentStatus::Created,
            scenarios_added: planned.len(),
            imports_added: imports.len(),
            duplicates,
        }
    }

    fn reconcile(
        &self,
        existing: &str,
        request: &MergeRequest,
        planned: &[&ScenarioRecord],
        duplicates: Vec<String>,
    ) -> MergeOutcome {
        let document = GeneratedDocument::parse(existing, &self.renderer);

        let new: Vec<&ScenarioRecord> = planned
            .iter()
            .copied()
            .filter(|s| !document.has_scenario(&s.name))
            .collect();

        let missing: IndexSet<&str> = if document.has_marker() {
            request
                .fixtures
                .iter()
                .map(String::as_str)
                .filter(|name| !document.has_fixture(name))
                .collect()
        } else {
            tracing::debug!(
                title = %request.title,
                "document has no import marker, treating it as body only"
            );
            IndexSet::new()
        };

        if new.is_empty() && missing.is_empty() {
            return MergeOutcome::unchanged(duplicates);
        }

        let rows: Vec<String> = missing
            .iter()
            .map(|name| self.renderer.import_row(name))
            .collect();
        let mut text = document.to_text_with_imports(&rows);
        self.append_scenarios(&mut text, &new, request.tag.as_deref());

        MergeOutcome {
            text: Some(text),
            status: DocumentStatus::Updated,
            scenarios_added: new.len(),
            imports_added: rows.len(),
            duplicates,
        }
    }

    fn append_scenarios(&self, text: &mut String, scenarios: &[&ScenarioRecord], tag: Option<&str>) {
        if scenarios.is_empty() {
            return;
        }
        text.truncate(text.trim_end().len());
        for record in scenarios {
            text.push_str("\n\n");
            text.push_str(&self.renderer.scenario(record, tag));
        }
        text.push('\n');
    }
}

fn first_of_each_name(scenarios: &[ScenarioRecord]) -> (Vec<&ScenarioRecord>, Vec<String>) {
    let mut seen = IndexSet::new();
    let mut planned = Vec::with_capacity(scenarios.len());
    let mut duplicates = Vec::new();
    for record in scenarios {
        if seen.insert(record.name.as_str()) {
            planned.push(record);
        } else {
            duplicates.push(record.name.clone());
        }
    }
    (planned, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use featuregen_descriptor::HttpMethod;
    use pretty_assertions::assert_eq;

    fn scenario(name: &str, method: HttpMethod, status: u16) -> ScenarioRecord {
        ScenarioRecord {
            name: name.into(),
            method,
            path: "/clients/1".into(),
            body: None,
            expected_status: status,
        }
    }

    fn request() -> MergeRequest {
        MergeRequest::new("Client")
            .with_fixture("Base/common.yml")
            .with_fixture("client.yaml")
            .with_authentication("admin@test.com")
            .with_scenario(scenario("showClient", HttpMethod::Get, 200))
    }

    #[test]
    fn fresh_document() {
        let outcome = DocumentMerger::<GherkinRenderer>::default().merge(None, &request());
        assert_eq!(outcome.status, DocumentStatus::Created);
        assert_eq!(outcome.scenarios_added, 1);
        assert_eq!(outcome.imports_added, 2);
        assert_eq!(
            outcome.text.unwrap(),
            "Feature: Test Routes for Client
  Background:
    Given the database is empty
    And the following fixtures files are loaded:
      | Base/common.yml |
      | client.yaml |
    Given I am authenticated as \"admin@test.com\"

  Scenario: showClient
    Given I send a GET request to \"/clients/1\"
    Then the response status code should be 200
"
        );
    }

    #[test]
    fn second_merge_is_a_no_op() {
        let merger = DocumentMerger::<GherkinRenderer>::default();
        let first = merger.merge(None, &request()).text.unwrap();
        let second = merger.merge(Some(&first), &request());
        assert_eq!(second.status, DocumentStatus::Unchanged);
        assert!(second.text.is_none());
        assert_eq!(second.scenarios_added, 0);
    }

    #[test]
    fn existing_scenario_still_gets_missing_imports() {
        let merger = DocumentMerger::<GherkinRenderer>::default();
        let existing = merger
            .merge(
                None,
                &MergeRequest::new("Client")
                    .with_fixture("client.yaml")
                    .with_scenario(scenario("updateClient", HttpMethod::Put, 204)),
            )
            .text
            .unwrap();

        let outcome = merger.merge(
            Some(&existing),
            &MergeRequest::new("Client")
                .with_fixture("client.yaml")
                .with_fixture("address.yaml")
                .with_scenario(scenario("updateClient", HttpMethod::Put, 204)),
        );

        assert_eq!(outcome.status, DocumentStatus::Updated);
        assert_eq!(outcome.scenarios_added, 0);
        assert_eq!(outcome.imports_added, 1);
        let text = outcome.text.unwrap();
        assert_eq!(text.matches("Scenario: updateClient").count(), 1);
        assert!(text.contains("      | client.yaml |\n      | address.yaml |\n"));
    }

    #[test]
    fn new_scenarios_append_after_body() {
        let merger = DocumentMerger::<GherkinRenderer>::default();
        let existing = merger.merge(None, &request()).text.unwrap();
        let outcome = merger.merge(
            Some(&existing),
            &request()
                .with_scenario(scenario("deleteClient", HttpMethod::Delete, 204))
                .with_tag("generated"),
        );

        assert_eq!(outcome.status, DocumentStatus::Updated);
        assert_eq!(outcome.scenarios_added, 1);
        let text = outcome.text.unwrap();
        assert!(text.starts_with(existing.trim_end()));
        assert!(text.ends_with(
            "  @generated
  Scenario: deleteClient
    Given I send a DELETE request to \"/clients/1\"
    Then the response status code should be 204
"
        ));
    }

    #[test]
    fn hand_written_document_without_marker() {
        let existing = "Feature: custom\n\n  Scenario: showClient\n    Given something\n";
        let merger = DocumentMerger::<GherkinRenderer>::default();

        let same = merger.merge(Some(existing), &request());
        assert_eq!(same.status, DocumentStatus::Unchanged);

        let outcome = merger.merge(
            Some(existing),
            &request().with_scenario(scenario("listClients", HttpMethod::Get, 200)),
        );
        assert_eq!(outcome.status, DocumentStatus::Updated);
        assert_eq!(outcome.imports_added, 0);
        let text = outcome.text.unwrap();
        assert!(text.starts_with("Feature: custom\n\n  Scenario: showClient\n    Given something\n\n"));
        assert!(!text.contains("fixtures files are loaded"));
    }

    #[test]
    fn duplicate_names_keep_the_first() {
        let outcome = DocumentMerger::<GherkinRenderer>::default().merge(
            None,
            &request().with_scenario(scenario("showClient", HttpMethod::Post, 201)),
        );
        assert_eq!(outcome.duplicates, vec!["showClient".to_string()]);
        assert_eq!(outcome.scenarios_added, 1);
        let text = outcome.text.unwrap();
        assert_eq!(text.matches("Scenario: showClient").count(), 1);
        assert!(text.contains("GET request"));
    }

    #[test]
    fn fresh_document_without_scenarios_is_not_written() {
        let outcome = DocumentMerger::<GherkinRenderer>::default()
            .merge(None, &MergeRequest::new("Client").with_fixture("client.yaml"));
        assert_eq!(outcome.status, DocumentStatus::Unchanged);
        assert!(outcome.text.is_none());
    }
}
