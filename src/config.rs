//! Declared resources, loaded from `simplescript.toml`
//!
//! ```toml
//! working_dir = "."
//!
//! [resources.hello]
//! command = "echo hello"
//! ```

use anyhow::{Context, Result};
use declarative::ResourceData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::paths;
use crate::resource::CommandResource;

/// Problems with an otherwise well-formed config file
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("resource name must not be empty")]
    EmptyName,

    #[error("resource name `{0}` must not contain `.`")]
    DottedName(String),

    #[error("resource `{0}` has an empty command")]
    EmptyCommand(String),
}

/// Root of the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory commands run in, relative to the config file
    #[serde(default)]
    pub working_dir: Option<String>,

    /// Declared command resources by name
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceConfig>,
}

/// One declared command resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    pub command: String,
}

impl Config {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::debug!(
            "Loaded {} resource(s) from {}",
            config.resources.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse and validate config text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, resource) in &self.resources {
            if name.is_empty() {
                return Err(ConfigError::EmptyName);
            }
            if name.contains('.') {
                return Err(ConfigError::DottedName(name.clone()));
            }
            if resource.command.trim().is_empty() {
                return Err(ConfigError::EmptyCommand(name.clone()));
            }
        }
        Ok(())
    }

    /// Absolute directory commands run in
    ///
    /// Defaults to the directory holding the config file.
    pub fn working_dir(&self, config_path: &Path) -> Result<PathBuf> {
        let base = config_path.parent().unwrap_or(Path::new(""));
        paths::resolve(base, self.working_dir.as_deref().unwrap_or("."))
    }

    /// Declared records keyed by resource name
    pub fn declared(&self) -> BTreeMap<String, ResourceData> {
        self.resources
            .iter()
            .map(|(name, r)| (name.clone(), CommandResource::declare(&r.command)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::command::COMMAND;

    #[test]
    fn test_parse_resources() {
        let config = Config::from_toml(
            r#"
            working_dir = "scripts"

            [resources.hello]
            command = "echo hello"

            [resources.status]
            command = 'echo {"status":"ok"}'
            "#,
        )
        .unwrap();

        assert_eq!(config.working_dir.as_deref(), Some("scripts"));
        assert_eq!(config.resources.len(), 2);
        assert_eq!(
            config.resources["status"].command,
            r#"echo {"status":"ok"}"#
        );
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_toml("").unwrap();
        assert!(config.resources.is_empty());
        assert!(config.declared().is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Config::from_toml("[resources.a]\ncommand = \"ls\"\nshell = true\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_validation_errors() {
        let err = Config::from_toml("[resources.\"a.b\"]\ncommand = \"ls\"\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::DottedName("a.b".to_string()))
        );

        let err = Config::from_toml("[resources.a]\ncommand = \"  \"\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::EmptyCommand("a".to_string()))
        );

        let err = Config::from_toml("[resources.\"\"]\ncommand = \"ls\"\n").unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::EmptyName));
    }

    #[test]
    fn test_declared_records() {
        let config = Config::from_toml("[resources.hello]\ncommand = \"echo hello\"\n").unwrap();
        let declared = config.declared();
        assert_eq!(declared["hello"].get_str(COMMAND), Some("echo hello"));
        assert!(!declared["hello"].has_id());
    }

    #[test]
    fn test_working_dir_relative_to_config() {
        let config = Config::from_toml("working_dir = \"scripts\"\n").unwrap();
        let dir = config
            .working_dir(Path::new("/srv/project/simplescript.toml"))
            .unwrap();
        assert_eq!(dir, PathBuf::from("/srv/project/scripts"));

        let default = Config::default()
            .working_dir(Path::new("/srv/project/simplescript.toml"))
            .unwrap();
        assert_eq!(default, PathBuf::from("/srv/project"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simplescript.toml");
        fs::write(&path, "[resources.a]\ncommand = \"true\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.resources["a"].command, "true");

        let missing = Config::load(&dir.path().join("nope.toml"));
        assert!(missing.is_err());
    }
}
