use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use declarative::ResourceData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Current on-disk format version
pub const STATE_VERSION: u32 = 1;

// ============================================================================
// State Structures
// ============================================================================

/// Persisted records of every created resource
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SimplescriptState {
    /// Format version of the state file
    #[serde(default = "default_version")]
    pub version: u32,

    /// Last time the state was updated
    pub last_updated: DateTime<Utc>,

    /// Persisted records by resource name
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceData>,
}

fn default_version() -> u32 {
    STATE_VERSION
}

impl Default for SimplescriptState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            last_updated: Utc::now(),
            resources: BTreeMap::new(),
        }
    }
}

// ============================================================================
// Persistence
// ============================================================================

/// A state file on disk
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// State file at an explicit path, or the default one for `config`
    pub fn resolve(explicit: Option<&str>, config: &Path) -> Result<Self> {
        let path = match explicit {
            Some(p) => crate::paths::expand(p),
            None => crate::paths::state_file_for(config)?,
        };
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load state from disk, or return default if file doesn't exist
    pub fn load(&self) -> Result<SimplescriptState> {
        if !self.path.exists() {
            log::debug!("State file does not exist, using default state");
            return Ok(SimplescriptState::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        let state: SimplescriptState = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;

        if state.version > STATE_VERSION {
            anyhow::bail!(
                "State file {} has version {}, newer than supported version {}",
                self.path.display(),
                state.version,
                STATE_VERSION
            );
        }

        log::debug!("Loaded state from {}", self.path.display());
        Ok(state)
    }

    /// Save state to disk
    pub fn save(&self, state: &SimplescriptState) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
        }

        let content =
            serde_json::to_string_pretty(state).context("Failed to serialize state to JSON")?;

        fs::write(&self.path, content + "\n")
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        log::debug!("Saved state to {}", self.path.display());
        Ok(())
    }

    /// Update the last_updated timestamp and save
    pub fn touch(&self, state: &mut SimplescriptState) -> Result<()> {
        state.last_updated = Utc::now();
        self.save(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(command: &str, id: &str) -> ResourceData {
        let mut data = ResourceData::new()
            .with_attribute("command", command)
            .with_attribute("text_output", "hello\n");
        data.set_id(id);
        data
    }

    #[test]
    fn test_default_state() {
        let state = SimplescriptState::default();
        assert_eq!(state.version, STATE_VERSION);
        assert!(state.resources.is_empty());
    }

    #[test]
    fn test_missing_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let file = StateFile::new(dir.path().join("state.json"));
        let state = file.load().unwrap();
        assert!(state.resources.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = StateFile::new(dir.path().join("nested").join("state.json"));

        let mut state = SimplescriptState::default();
        state
            .resources
            .insert("hello".to_string(), record("echo hello", "abc"));
        let before = state.last_updated;
        file.touch(&mut state).unwrap();
        assert!(state.last_updated >= before);

        let loaded = file.load().unwrap();
        assert_eq!(loaded.resources.len(), 1);
        assert_eq!(loaded.resources["hello"].id(), Some("abc"));
        assert_eq!(
            loaded.resources["hello"].get_str("text_output"),
            Some("hello\n")
        );
    }

    #[test]
    fn test_record_without_id_roundtrips_without_id() {
        let dir = tempfile::tempdir().unwrap();
        let file = StateFile::new(dir.path().join("state.json"));

        let mut state = SimplescriptState::default();
        state.resources.insert(
            "pending".to_string(),
            ResourceData::new().with_attribute("command", "ls"),
        );
        file.save(&state).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert!(!content.contains("\"id\""));
        assert!(!file.load().unwrap().resources["pending"].has_id());
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r#"{"version": 99, "last_updated": "2024-01-01T00:00:00Z", "resources": {}}"#,
        )
        .unwrap();

        assert!(StateFile::new(path).load().is_err());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();

        assert!(StateFile::new(path).load().is_err());
    }
}
