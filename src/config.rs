//! Project configuration loaded from `contract-enforcer.toml`.
//!
//! ```toml
//! spec = "openapi.yaml"
//! service = "services/user"
//!
//! [generate]
//! stubs_file = "src/generated_handlers.rs"
//! tests_file = "tests/generated_contract_tests.rs"
//! models_file = "src/generated_models.rs"
//!
//! [check]
//! fail_on_error = true
//! format = "markdown"
//! ```
//!
//! Every key is optional. Relative `spec` and `service` paths are resolved
//! against the directory holding the config file. Command-line flags and the
//! `ENFORCER_SPEC` / `ENFORCER_SERVICE` variables override whatever the file
//! says.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::generator::ArtifactTargets;
use crate::report::ReportFormat;

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "contract-enforcer.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnforcerConfig {
    /// Contract document
    #[serde(default)]
    pub spec: Option<PathBuf>,
    /// Implementation root directory or model manifest
    #[serde(default)]
    pub service: Option<PathBuf>,
    #[serde(default)]
    pub generate: ArtifactTargets,
    #[serde(default)]
    pub check: CheckConfig,
}

/// `[check]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Exit non-zero when the report contains errors
    #[serde(default)]
    pub fail_on_error: bool,
    #[serde(default)]
    pub format: Option<ReportFormat>,
}

impl EnforcerConfig {
    /// Parse configuration text
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Resolve relative `spec` and `service` paths against `base`
    pub fn relative_to(mut self, base: &Path) -> Self {
        let anchor = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.spec = self.spec.map(anchor);
        self.service = self.service.map(anchor);
        self
    }
}

/// Load a configuration file.
///
/// Returns `Ok(None)` when the file does not exist and an error when it
/// exists but cannot be read or parsed.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<EnforcerConfig>> {
    if !config_path.exists() {
        debug!(path = %config_path.display(), "No config file; using defaults");
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let config = EnforcerConfig::from_toml(&contents)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

    let base = config_path.parent().unwrap_or_else(|| Path::new(""));
    Ok(Some(config.relative_to(base)))
}

/// Load `explicit` if given, otherwise [`DEFAULT_CONFIG_FILE`] from the
/// working directory, falling back to defaults when neither exists.
///
/// An explicitly named file that does not exist is an error.
pub fn load_config_or_default(explicit: Option<&Path>) -> anyhow::Result<EnforcerConfig> {
    match explicit {
        Some(path) => load_config(path)?
            .with_context(|| format!("Config file not found: {}", path.display())),
        None => Ok(load_config(Path::new(DEFAULT_CONFIG_FILE))?.unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::fs;

    #[test]
    fn test_full_config_parses() {
        let config = EnforcerConfig::from_toml(
            r#"
spec = "api/openapi.yaml"
service = "services/user"

[generate]
stubs_file = "src/handlers/missing.rs"

[check]
fail_on_error = true
format = "markdown"
"#,
        )
        .unwrap();

        assert_eq!(config.spec, Some(PathBuf::from("api/openapi.yaml")));
        assert_eq!(
            config.generate.stubs_file,
            PathBuf::from("src/handlers/missing.rs")
        );
        // unset targets keep their defaults
        assert_eq!(
            config.generate.tests_file,
            ArtifactTargets::default().tests_file
        );
        assert!(config.check.fail_on_error);
        assert_eq!(config.check.format, Some(ReportFormat::Markdown));
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(EnforcerConfig::from_toml("").unwrap(), EnforcerConfig::default());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("absent.toml")).unwrap().is_none());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_or_default(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_malformed_file_is_error_naming_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract-enforcer.toml");
        fs::write(&path, "spec = [unterminated").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("contract-enforcer.toml"));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract-enforcer.toml");
        fs::write(&path, "spec = \"openapi.yaml\"\nservice = \"/abs/service\"\n").unwrap();
        let config = load_config(&path).unwrap().unwrap();
        assert_eq!(config.spec, Some(dir.path().join("openapi.yaml")));
        assert_eq!(config.service, Some(PathBuf::from("/abs/service")));
    }
}
