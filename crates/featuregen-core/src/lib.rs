//! Featuregen Core - Batch Generation of Acceptance Scenarios
//!
//! Turns route and entity descriptors into YAML fixtures and Gherkin
//! scenario documents, idempotently.
//!
//! # Core Concepts
//!
//! - [`GeneratorConfig`]: Output folders, shared fixture, auth rules, status overrides
//! - [`MetadataProvider`]: Source of entity and operation descriptors
//! - [`RunFilters`]: Namespace, method and tag options of one invocation
//! - [`Generator`]: Per-group pipeline with failure isolation
//! - [`Reporter`]: Sink for user-facing progress and the end-of-run report
//!
//! # Architecture
//!
//! ```text
//! MetadataProvider -> group_operations -> RunFilters::select_groups
//!     -> for each group (optionally on rayon):
//!          collect_seeds -> EntityGraphResolver -> FixtureWriter
//!          ScenarioPlanner -> DocumentMerger -> DocumentStore
//!     -> RunSummary -> Reporter
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use featuregen_core::{Generator, GeneratorConfig, ManifestProvider, RunFilters, TracingReporter};
//! use std::sync::Arc;
//!
//! let config = GeneratorConfig::load("featuregen.yaml".as_ref())?;
//! let provider = ManifestProvider::from_path("manifest.json".as_ref())?;
//! let generator = Generator::new(config, Arc::new(TracingReporter))?;
//! let summary = generator.run(&provider, &RunFilters::new())?;
//! println!("{} scenarios added", summary.scenarios_added());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod filter;
pub mod orchestrator;
pub mod provider;
pub mod reporter;

pub use config::{Authenticator, FeaturesConfig, FixturesConfig, GeneratorConfig};
pub use error::{BatchError, BatchResult, ConfigError, GroupError, ProviderError};
pub use filter::RunFilters;
pub use orchestrator::{Generator, GroupReport, RunSummary, SkippedGroup};
pub use provider::{group_operations, InMemoryProvider, Manifest, ManifestProvider, MetadataProvider};
pub use reporter::{plural, CollectingReporter, Reporter, Severity, TracingReporter};

pub use featuregen_document::DocumentStatus;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use featuregen_test_utils::{
        client_catalog, client_operations, fixed_synthesizer, TestProject, CLIENT_GROUP,
    };
    use std::sync::Arc;

    fn generator(project: &TestProject, reporter: Arc<CollectingReporter>) -> Generator {
        let config = GeneratorConfig::new()
            .with_fixtures_folder(project.fixtures_dir())
            .with_features_folder(project.features_dir())
            .with_common_fixtures("Base/common.yml")
            .with_authentication("^/clients", "client@test.com");
        Generator::new(config, reporter)
            .unwrap()
            .with_synthesizer(fixed_synthesizer())
    }

    #[test]
    fn full_pipeline_for_one_group() {
        let project = TestProject::new();
        let reporter = Arc::new(CollectingReporter::new());
        let provider = InMemoryProvider::new(client_catalog(), client_operations());

        let summary = generator(&project, reporter.clone())
            .run(&provider, &RunFilters::new())
            .unwrap();

        assert_eq!(summary.documents_created(), 1);
        assert_eq!(summary.scenarios_added(), 4);
        assert_eq!(summary.fixtures_created(), 2);
        assert_eq!(project.fixture_files(), vec!["address.yaml", "client.yaml"]);

        let report = summary.group(CLIENT_GROUP).unwrap();
        let text = std::fs::read_to_string(&report.document).unwrap();
        assert!(text.starts_with("Feature: Test Routes for App\\Controller\\ClientController\n"));
        assert!(text.contains("      | Base/common.yml |\n      | client.yaml |\n      | address.yaml |\n"));
        assert!(text.contains("    Given I am authenticated as \"client@test.com\""));
        assert!(reporter.contains("1 file created."));
        assert!(reporter.contains("4 tests created."));
    }
}
