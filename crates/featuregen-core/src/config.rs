//! Generator configuration
//!
//! Loaded from YAML or TOML, chosen by file extension:
//!
//! ```yaml
//! fixtures:
//!   folder: tests/fixtures
//! features:
//!   folder: features
//!   common_fixtures: Base/common.yml
//!   authentication:
//!     "^/admin": admin@example.com
//!   http_responses:
//!     post: 200
//! parallel: true
//! ```

use crate::error::ConfigError;
use featuregen_descriptor::HttpMethod;
use featuregen_synth::StatusTable;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Fixture output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixturesConfig {
    pub folder: PathBuf,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("fixtures"),
        }
    }
}

/// Scenario document settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub folder: PathBuf,
    /// Shared fixture listed first in every import table
    pub common_fixtures: Option<String>,
    /// Path pattern to authenticated identity, first match wins
    pub authentication: IndexMap<String, String>,
    /// Per-verb expected status overrides
    pub http_responses: IndexMap<HttpMethod, u16>,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("features"),
            common_fixtures: None,
            authentication: IndexMap::new(),
            http_responses: IndexMap::new(),
        }
    }
}

/// Full generator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub fixtures: FixturesConfig,
    pub features: FeaturesConfig,
    /// Process document-groups on the rayon pool
    pub parallel: bool,
}

impl GeneratorConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a `.yaml`/`.yml` or `.toml` file
    ///
    /// # Errors
    /// Unreadable file, unknown extension or malformed content.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let config = match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            Some("toml") => Self::from_toml_str(&text),
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        let config = config.map_err(|message| ConfigError::parse(path, message))?;

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// # Errors
    /// Malformed YAML, as a message.
    pub fn from_yaml_str(text: &str) -> Result<Self, String> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }

    /// # Errors
    /// Malformed TOML, as a message.
    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    #[inline]
    #[must_use]
    pub fn with_fixtures_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.fixtures.folder = folder.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_features_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.features.folder = folder.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_common_fixtures(mut self, name: impl Into<String>) -> Self {
        self.features.common_fixtures = Some(name.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_authentication(
        mut self,
        pattern: impl Into<String>,
        identity: impl Into<String>,
    ) -> Self {
        self.features
            .authentication
            .insert(pattern.into(), identity.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_http_response(mut self, method: HttpMethod, status: u16) -> Self {
        self.features.http_responses.insert(method, status);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check folders and compile authentication patterns
    ///
    /// # Errors
    /// An empty folder path or an invalid pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixtures.folder.as_os_str().is_empty() {
            return Err(ConfigError::EmptyFolder("fixtures"));
        }
        if self.features.folder.as_os_str().is_empty() {
            return Err(ConfigError::EmptyFolder("features"));
        }
        self.authenticator().map(|_| ())
    }

    /// Verb-to-status table with the configured overrides applied
    #[must_use]
    pub fn status_table(&self) -> StatusTable {
        self.features
            .http_responses
            .iter()
            .map(|(method, status)| (*method, *status))
            .collect()
    }

    /// Compiled authentication rules
    ///
    /// # Errors
    /// The first pattern that does not compile.
    pub fn authenticator(&self) -> Result<Authenticator, ConfigError> {
        let rules = self
            .features
            .authentication
            .iter()
            .map(|(pattern, identity)| {
                Regex::new(pattern)
                    .map(|re| (re, identity.clone()))
                    .map_err(|source| ConfigError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Authenticator { rules })
    }
}

/// Ordered path-pattern to identity rules
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    rules: Vec<(Regex, String)>,
}

impl Authenticator {
    /// Identity of the first rule matching `path`
    #[must_use]
    pub fn identity_for(&self, path: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.is_match(path))
            .map(|(_, identity)| identity.as_str())
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
fixtures:
  folder: tests/fixtures
features:
  folder: tests/features
  common_fixtures: Base/common.yml
  authentication:
    "^/admin": admin@example.com
    "^/": user@example.com
  http_responses:
    post: 200
    DELETE: 202
parallel: true
"#;

    #[test]
    fn yaml_round_trip_of_all_sections() {
        let config = GeneratorConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.fixtures.folder, PathBuf::from("tests/fixtures"));
        assert_eq!(config.features.folder, PathBuf::from("tests/features"));
        assert_eq!(config.features.common_fixtures.as_deref(), Some("Base/common.yml"));
        assert!(config.parallel);

        let table = config.status_table();
        assert_eq!(table.status_for(HttpMethod::Post), 200);
        assert_eq!(table.status_for(HttpMethod::Delete), 202);
        assert_eq!(table.status_for(HttpMethod::Put), 204);
    }

    #[test]
    fn toml_config() {
        let config = GeneratorConfig::from_toml_str(
            r#"
parallel = false

[fixtures]
folder = "fx"

[features.http_responses]
patch = 200
"#,
        )
        .unwrap();
        assert_eq!(config.fixtures.folder, PathBuf::from("fx"));
        assert_eq!(config.features.folder, PathBuf::from("features"));
        assert_eq!(config.status_table().status_for(HttpMethod::Patch), 200);
    }

    #[test]
    fn first_matching_rule_wins() {
        let auth = GeneratorConfig::from_yaml_str(YAML)
            .unwrap()
            .authenticator()
            .unwrap();
        assert_eq!(auth.identity_for("/admin/users"), Some("admin@example.com"));
        assert_eq!(auth.identity_for("/clients"), Some("user@example.com"));
        assert_eq!(auth.identity_for("clients"), None);
    }

    #[test]
    fn validation_failures() {
        let bad = GeneratorConfig::new().with_authentication("(", "x");
        assert!(matches!(bad.validate(), Err(ConfigError::InvalidPattern { .. })));

        let empty = GeneratorConfig::new().with_fixtures_folder("");
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyFolder("fixtures"))));

        assert!(GeneratorConfig::new().validate().is_ok());
    }

    #[test]
    fn load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("featuregen.yaml");
        fs::write(&yaml, YAML).unwrap();
        assert!(GeneratorConfig::load(&yaml).unwrap().parallel);

        let ini = dir.path().join("featuregen.ini");
        fs::write(&ini, "").unwrap();
        assert!(matches!(
            GeneratorConfig::load(&ini),
            Err(ConfigError::UnsupportedFormat { .. })
        ));

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "parallel = [").unwrap();
        assert!(matches!(
            GeneratorConfig::load(&broken),
            Err(ConfigError::Parse { .. })
        ));
    }
}
