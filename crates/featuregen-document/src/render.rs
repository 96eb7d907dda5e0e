//! Narrative rendering
//!
//! [`DocumentRenderer`] is the seam between the merge logic and the concrete
//! scenario language. The merger never looks at document text except through
//! the recognisers declared here.

use featuregen_descriptor::ScenarioRecord;

/// Line that opens the fixture-import table
pub const IMPORT_MARKER: &str = "And the following fixtures files are loaded:";

const SCENARIO_PREFIX: &str = "Scenario:";

/// Inputs for a fresh document header
#[derive(Debug, Clone, Copy)]
pub struct Background<'a> {
    /// Document-group identifier
    pub title: &'a str,
    /// Fixture names, in import order
    pub imports: &'a [String],
    pub authentication: Option<&'a str>,
}

/// Renders and recognises the parts of a scenario document
pub trait DocumentRenderer: Send + Sync {
    /// Header of a fresh document, marker and import rows included
    fn background(&self, background: &Background<'_>) -> String;

    /// One row of the import table
    fn import_row(&self, fixture: &str) -> String;

    /// One scenario block
    fn scenario(&self, record: &ScenarioRecord, tag: Option<&str>) -> String;

    fn is_import_marker(&self, line: &str) -> bool;

    /// Fixture name of an import row, `None` if `line` is not a row
    fn import_name(&self, line: &str) -> Option<String>;

    /// Scenario name of a scenario title line
    fn scenario_name<'l>(&self, line: &'l str) -> Option<&'l str>;
}

/// Behat/Gherkin flavoured renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct GherkinRenderer;

impl DocumentRenderer for GherkinRenderer {
    fn background(&self, background: &Background<'_>) -> String {
        let mut lines = vec![
            format!("Feature: Test Routes for {}", background.title),
            "  Background:".to_string(),
            "    Given the database is empty".to_string(),
            format!("    {IMPORT_MARKER}"),
        ];
        lines.extend(background.imports.iter().map(|f| self.import_row(f)));
        if let Some(identity) = background.authentication {
            lines.push(format!("    Given I am authenticated as \"{identity}\""));
        }
        lines.join("\n")
    }

    fn import_row(&self, fixture: &str) -> String {
        format!("      | {fixture} |")
    }

    fn scenario(&self, record: &ScenarioRecord, tag: Option<&str>) -> String {
        let mut lines = Vec::new();
        if let Some(tag) = tag {
            lines.push(format!("  @{tag}"));
        }
        lines.push(format!("  {SCENARIO_PREFIX} {}", record.name));

        match record.body_json("    ") {
            Some(body) => {
                lines.push(
                    "    Given I add \"content-type\" header equal to \"application/json\""
                        .to_string(),
                );
                lines.push(format!(
                    "    Given I send a {} request to \"{}\" with body:",
                    record.method, record.path
                ));
                lines.push("    \"\"\"".to_string());
                lines.extend(body.lines().map(|l| format!("    {l}")));
                lines.push("    \"\"\"".to_string());
            }
            None => lines.push(format!(
                "    Given I send a {} request to \"{}\"",
                record.method, record.path
            )),
        }

        lines.push(format!(
            "    Then the response status code should be {}",
            record.expected_status
        ));
        lines.join("\n")
    }

    fn is_import_marker(&self, line: &str) -> bool {
        line.contains(IMPORT_MARKER)
    }

    fn import_name(&self, line: &str) -> Option<String> {
        let row = line.trim();
        if !row.starts_with('|') {
            return None;
        }
        Some(row.chars().filter(|c| *c != '|' && !c.is_whitespace()).collect())
    }

    fn scenario_name<'l>(&self, line: &'l str) -> Option<&'l str> {
        line.trim()
            .strip_prefix(SCENARIO_PREFIX)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
