//! Batch orchestration
//!
//! For every document-group: resolve the fixture graph, persist missing
//! fixtures, plan scenarios and merge them into the group's document.
//! Failures inside a group are recorded and the batch carries on; only
//! output-directory and filter problems stop the run.

use crate::config::{Authenticator, GeneratorConfig};
use crate::error::{BatchError, BatchResult, GroupError};
use crate::filter::RunFilters;
use crate::provider::{group_operations, MetadataProvider};
use crate::reporter::{plural, Reporter};
use featuregen_descriptor::{EntityCatalog, OperationDescriptor};
use featuregen_document::{
    DocumentMerger, DocumentStatus, DocumentStore, FixtureStatus, FixtureWriter, GherkinRenderer,
    MergeRequest,
};
use featuregen_graph::{collect_seeds, EntityGraphResolver};
use featuregen_synth::{ScenarioPlanner, ValueSynthesizer};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of one processed group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub group: String,
    pub document: PathBuf,
    pub status: DocumentStatus,
    pub scenarios_added: usize,
    pub imports_added: usize,
    pub fixtures_created: usize,
    pub fixtures_present: usize,
}

/// A group left out of the run, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedGroup {
    pub group: String,
    pub reason: String,
}

/// Aggregated result of a run, groups in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub groups: Vec<GroupReport>,
    pub skipped: Vec<SkippedGroup>,
}

impl RunSummary {
    fn count(&self, status: DocumentStatus) -> usize {
        self.groups.iter().filter(|g| g.status == status).count()
    }

    #[must_use]
    pub fn documents_created(&self) -> usize {
        self.count(DocumentStatus::Created)
    }

    #[must_use]
    pub fn documents_updated(&self) -> usize {
        self.count(DocumentStatus::Updated)
    }

    #[must_use]
    pub fn documents_unchanged(&self) -> usize {
        self.count(DocumentStatus::Unchanged)
    }

    #[must_use]
    pub fn scenarios_added(&self) -> usize {
        self.groups.iter().map(|g| g.scenarios_added).sum()
    }

    #[must_use]
    pub fn fixtures_created(&self) -> usize {
        self.groups.iter().map(|g| g.fixtures_created).sum()
    }

    #[must_use]
    pub fn group(&self, group: &str) -> Option<&GroupReport> {
        self.groups.iter().find(|g| g.group == group)
    }

    /// End-of-run report
    pub fn report_to(&self, reporter: &dyn Reporter) {
        reporter.success(&format!("{} created.", plural(self.documents_created(), "file")));
        reporter.success(&format!("{} updated.", plural(self.documents_updated(), "file")));
        reporter.success(&format!("{} created.", plural(self.scenarios_added(), "test")));

        if !self.skipped.is_empty() {
            for skipped in &self.skipped {
                reporter.comment(&format!("{}: {}", skipped.group, skipped.reason));
            }
            reporter.comment(&format!("{} skipped.", plural(self.skipped.len(), "group")));
        }
    }
}

/// Drives generation for a batch of document-groups
pub struct Generator {
    config: GeneratorConfig,
    planner: ScenarioPlanner,
    authenticator: Authenticator,
    merger: DocumentMerger<GherkinRenderer>,
    store: DocumentStore,
    fixtures: FixtureWriter,
    reporter: Arc<dyn Reporter>,
}

impl Generator {
    /// # Errors
    /// Invalid configuration.
    pub fn new(config: GeneratorConfig, reporter: Arc<dyn Reporter>) -> BatchResult<Self> {
        config.validate()?;
        let authenticator = config.authenticator()?;
        let planner = ScenarioPlanner::new(ValueSynthesizer::default(), config.status_table());

        Ok(Self {
            store: DocumentStore::new(&config.features.folder),
            fixtures: FixtureWriter::new(&config.fixtures.folder),
            merger: DocumentMerger::new(GherkinRenderer),
            planner,
            authenticator,
            config,
            reporter,
        })
    }

    /// Use a fixed synthesizer, typically one pinned to a known clock
    #[must_use]
    pub fn with_synthesizer(mut self, synthesizer: ValueSynthesizer) -> Self {
        self.planner = ScenarioPlanner::new(synthesizer, self.config.status_table());
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the whole batch and emit the end-of-run report
    ///
    /// # Errors
    /// Provider failure, unwritable output folders, or filters that select
    /// no group. Group-level failures are reported in the summary instead.
    pub fn run(
        &self,
        provider: &dyn MetadataProvider,
        filters: &RunFilters,
    ) -> BatchResult<RunSummary> {
        let catalog = provider.entities()?;
        let groups = filters.select_groups(group_operations(provider.operations()?))?;
        self.prepare_output(filters.verbose)?;

        tracing::info!(
            groups = groups.len(),
            entities = catalog.len(),
            parallel = self.config.parallel,
            "generation started"
        );

        let work: Vec<(&String, &Vec<OperationDescriptor>)> = groups.iter().collect();
        let process = |(group, operations): &(&String, &Vec<OperationDescriptor>)| {
            (
                (*group).clone(),
                self.process_group(group, operations, &catalog, filters),
            )
        };
        let results: Vec<(String, Result<GroupReport, GroupError>)> = if self.config.parallel {
            work.par_iter().map(process).collect()
        } else {
            work.iter().map(process).collect()
        };

        let mut summary = RunSummary::default();
        for (group, result) in results {
            match result {
                Ok(report) => summary.groups.push(report),
                Err(err) => {
                    tracing::warn!(group = %group, error = %err, "group skipped");
                    summary.skipped.push(SkippedGroup {
                        group,
                        reason: err.to_string(),
                    });
                }
            }
        }

        summary.report_to(self.reporter.as_ref());
        Ok(summary)
    }

    fn prepare_output(&self, verbose: bool) -> BatchResult<()> {
        for dir in [&self.config.fixtures.folder, &self.config.features.folder] {
            if !dir.is_dir() {
                fs::create_dir_all(dir).map_err(|e| BatchError::output_directory(dir, e))?;
                if verbose {
                    self.reporter
                        .comment(&format!("{} folder created", dir.display()));
                }
            }
            // must be writable
            tempfile::NamedTempFile::new_in(dir)
                .map_err(|e| BatchError::output_directory(dir, e))?;
        }
        Ok(())
    }

    /// Generate fixtures and the scenario document of one group
    ///
    /// # Errors
    /// Any descriptor-quality or I/O failure; nothing is written for the
    /// group when descriptor resolution fails.
    pub fn process_group(
        &self,
        group: &str,
        operations: &[OperationDescriptor],
        catalog: &EntityCatalog,
        filters: &RunFilters,
    ) -> Result<GroupReport, GroupError> {
        tracing::debug!(group = %group, operations = operations.len(), "processing group");

        let seeds = collect_seeds(operations, catalog)?;
        let graph = EntityGraphResolver::new(catalog, self.planner.synthesizer()).resolve(&seeds)?;
        if graph.is_cyclic() {
            tracing::debug!(group = %group, "fixture graph contains relation cycles");
        }

        let scenarios = operations
            .iter()
            .filter(|op| filters.accepts_method(op.http_method))
            .map(|op| self.planner.plan(op))
            .collect::<Result<Vec<_>, _>>()?;

        let mut fixtures_created = 0;
        let mut fixtures_present = 0;
        for node in graph.nodes() {
            match self.fixtures.write(node)? {
                FixtureStatus::Created => {
                    fixtures_created += 1;
                    self.verbose_file(filters, &self.fixtures.path_for(node), "created");
                }
                FixtureStatus::AlreadyPresent => fixtures_present += 1,
            }
        }

        let request = MergeRequest {
            title: group.to_string(),
            fixtures: self
                .config
                .features
                .common_fixtures
                .iter()
                .cloned()
                .chain(graph.file_names())
                .collect(),
            authentication: operations
                .first()
                .and_then(|op| self.authenticator.identity_for(&op.path_template))
                .map(str::to_string),
            tag: filters.tag.clone(),
            scenarios,
        };

        let document = self.store.path_for(group);
        let existing = self.store.load(&document)?;
        let outcome = self.merger.merge(existing.as_deref(), &request);

        for duplicate in &outcome.duplicates {
            self.reporter.comment(&format!(
                "{group}: scenario {duplicate} is planned more than once, keeping the first"
            ));
        }

        if let Some(text) = &outcome.text {
            if self.store.ensure_parent(&document)? && filters.verbose {
                if let Some(parent) = document.parent() {
                    self.reporter
                        .comment(&format!("{} folder created", parent.display()));
                }
            }
            self.store.flush(&document, text)?;
            self.verbose_file(filters, &document, outcome.status.as_str());
        }

        tracing::debug!(
            group = %group,
            status = %outcome.status,
            scenarios = outcome.scenarios_added,
            imports = outcome.imports_added,
            "group done"
        );

        Ok(GroupReport {
            group: group.to_string(),
            document,
            status: outcome.status,
            scenarios_added: outcome.scenarios_added,
            imports_added: outcome.imports_added,
            fixtures_created,
            fixtures_present,
        })
    }

    fn verbose_file(&self, filters: &RunFilters, path: &Path, what: &str) {
        if filters.verbose {
            self.reporter
                .comment(&format!("{} {what}", path.display()));
        }
    }
}
