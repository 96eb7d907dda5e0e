//! `featuregen` - generate acceptance scenarios and fixtures from a
//! descriptor manifest.

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use featuregen_core::{
    Generator, GeneratorConfig, ManifestProvider, RunFilters, RunSummary, TracingReporter,
};
use featuregen_descriptor::HttpMethod;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("featuregen")
        .version(featuregen_core::VERSION)
        .about("Generate Gherkin scenarios and YAML fixtures for HTTP routes")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("generate")
                .about("Create or extend one scenario document per route group")
                .arg(
                    Arg::new("manifest")
                        .long("manifest")
                        .short('m')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Descriptor manifest (JSON or YAML)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .value_parser(value_parser!(PathBuf))
                        .help("Generator configuration (YAML or TOML)"),
                )
                .arg(
                    Arg::new("namespace")
                        .long("namespace")
                        .conflicts_with("from-namespace")
                        .help("Process exactly this route group"),
                )
                .arg(
                    Arg::new("from-namespace")
                        .long("from-namespace")
                        .help("Process route groups starting with this prefix"),
                )
                .arg(
                    Arg::new("methods")
                        .long("methods")
                        .value_delimiter(',')
                        .action(ArgAction::Append)
                        .value_parser(HttpMethod::from_str)
                        .help("Only generate scenarios for these HTTP methods (comma separated)"),
                )
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .help("Tag added above every new scenario"),
                )
                .arg(
                    Arg::new("parallel")
                        .long("parallel")
                        .action(ArgAction::SetTrue)
                        .help("Process route groups in parallel"),
                )
                .arg(
                    Arg::new("verbose")
                        .long("verbose")
                        .short('v')
                        .action(ArgAction::SetTrue)
                        .help("Report every file and folder written"),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}

fn filters(args: &ArgMatches) -> RunFilters {
    let mut filters = RunFilters::new()
        .with_verbose(args.get_flag("verbose"))
        .with_methods(
            args.get_many::<HttpMethod>("methods")
                .into_iter()
                .flatten()
                .copied(),
        );
    if let Some(namespace) = args.get_one::<String>("namespace") {
        filters = filters.with_namespace(namespace);
    }
    if let Some(prefix) = args.get_one::<String>("from-namespace") {
        filters = filters.with_from_namespace(prefix);
    }
    if let Some(tag) = args.get_one::<String>("tag") {
        filters = filters.with_tag(tag);
    }
    filters
}

fn generate(args: &ArgMatches) -> anyhow::Result<RunSummary> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if args.get_flag("parallel") {
        config = config.with_parallel(true);
    }

    let manifest = args
        .get_one::<PathBuf>("manifest")
        .context("--manifest is required")?;
    let provider = ManifestProvider::from_path(manifest)
        .with_context(|| format!("reading manifest {}", manifest.display()))?;

    let generator = Generator::new(config, Arc::new(TracingReporter))?;
    let summary = generator.run(&provider, &filters(args))?;
    Ok(summary)
}

fn main() -> ExitCode {
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("generate", args)) => {
            init_tracing(args.get_flag("verbose"));
            match generate(args) {
                Ok(summary) => {
                    tracing::debug!(
                        created = summary.documents_created(),
                        updated = summary.documents_updated(),
                        skipped = summary.skipped.len(),
                        "run finished"
                    );
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    tracing::error!("{err:#}");
                    ExitCode::FAILURE
                }
            }
        }
        _ => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use featuregen_test_utils::TestProject;

    fn parse(args: &[&str]) -> ArgMatches {
        let matches = cli()
            .try_get_matches_from(std::iter::once("featuregen").chain(args.iter().copied()))
            .unwrap();
        matches.subcommand_matches("generate").unwrap().clone()
    }

    #[test]
    fn command_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn filters_from_arguments() {
        let args = parse(&[
            "generate",
            "-m",
            "routes.json",
            "--from-namespace",
            "App\\Controller\\",
            "--methods",
            "get,Post",
            "--tag",
            "smoke",
            "-v",
        ]);
        let filters = filters(&args);
        assert_eq!(filters.methods, vec![HttpMethod::Get, HttpMethod::Post]);
        assert_eq!(filters.from_namespace.as_deref(), Some("App\\Controller\\"));
        assert_eq!(filters.tag.as_deref(), Some("smoke"));
        assert!(filters.namespace.is_none());
        assert!(filters.verbose);
    }

    #[test]
    fn rejected_arguments() {
        let run = |args: &[&str]| {
            cli().try_get_matches_from(std::iter::once("featuregen").chain(args.iter().copied()))
        };
        assert!(run(&["generate"]).is_err());
        assert!(run(&["generate", "-m", "r.json", "--methods", "fetch"]).is_err());
        assert!(run(&["generate", "-m", "r.json", "--namespace", "A", "--from-namespace", "B"]).is_err());
    }

    #[test]
    fn generate_from_manifest() {
        let project = TestProject::new();
        project.write(
            "routes.yaml",
            "entities:\n\
             \x20 - identifier: App\\Entity\\Tag\n\
             \x20   fields:\n\
             \x20     - name: label\n\
             \x20       kind: { type: scalar, scalar: string }\n\
             operations:\n\
             \x20 - identifier: showTag\n\
             \x20   group: App\\Controller\\TagController\n\
             \x20   http_method: GET\n\
             \x20   path_template: /tags/{tag}\n\
             \x20   arguments:\n\
             \x20     - name: tag\n\
             \x20       declared_type: { kind: entity, name: App\\Entity\\Tag }\n",
        );
        project.write(
            "featuregen.yaml",
            &format!(
                "fixtures:\n  folder: {}\nfeatures:\n  folder: {}\n",
                project.fixtures_dir().display(),
                project.features_dir().display()
            ),
        );

        let manifest = project.root().join("routes.yaml");
        let config = project.root().join("featuregen.yaml");
        let args = parse(&[
            "generate",
            "--manifest",
            manifest.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ]);

        let summary = generate(&args).unwrap();
        assert_eq!(summary.documents_created(), 1);
        assert!(project.exists("features/App/Controller/TagController.feature"));
        assert_eq!(project.fixture_files(), vec!["tag.yaml"]);
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let args = parse(&["generate", "-m", "/nonexistent/routes.json"]);
        let err = generate(&args).unwrap_err();
        assert!(format!("{err:#}").contains("reading manifest"));
    }
}
