//! Centralized path resolution for simplescript
//!
//! All file locations flow through this module so they can be overridden
//! from the environment (tests, CI, sandboxes).

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Environment variable overriding the state directory
pub const ENV_STATE_DIR: &str = "SIMPLESCRIPT_STATE_DIR";

/// Environment variable overriding the config file
pub const ENV_CONFIG: &str = "SIMPLESCRIPT_CONFIG";

/// Config file looked up in the current directory by default
pub const DEFAULT_CONFIG_FILE: &str = "simplescript.toml";

/// Get the simplescript state directory path
///
/// Priority:
/// 1. `SIMPLESCRIPT_STATE_DIR` env var
/// 2. `XDG_STATE_HOME/simplescript`
/// 3. Platform default
pub fn state_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_STATE_DIR) {
        let path = expand(&dir);
        log::debug!("Using state dir from {}: {}", ENV_STATE_DIR, path.display());
        return Ok(path);
    }

    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        let path = PathBuf::from(xdg_state).join("simplescript");
        log::debug!("Using XDG_STATE_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(local_app_data) = dirs::data_local_dir() {
            let path = local_app_data.join("simplescript");
            log::debug!("Using Windows state dir: {}", path.display());
            return Ok(path);
        }
    }

    // Unix default: ~/.local/state/simplescript
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".local").join("state").join("simplescript");
    log::debug!("Using default state dir: {}", path.display());
    Ok(path)
}

/// Default state file for the project declared by `config`
///
/// Each config gets its own file in the state directory, so projects never
/// see each other's records.
pub fn state_file_for(config: &Path) -> Result<PathBuf> {
    let config = std::path::absolute(config)
        .with_context(|| format!("Could not resolve {}", config.display()))?;
    Ok(state_file_in(&state_dir()?, &config))
}

/// State file for an absolute config path inside `state_dir`
///
/// Named `<project dir>-<hash>.json`, where the hash covers the full config
/// path.
pub fn state_file_in(state_dir: &Path, config: &Path) -> PathBuf {
    let digest = hex::encode(Sha256::digest(config.as_os_str().as_encoded_bytes()));
    let project = config
        .parent()
        .and_then(Path::file_name)
        .map_or_else(|| "root".into(), |name| name.to_string_lossy());
    state_dir.join(format!("{project}-{}.json", &digest[..16]))
}

/// Resolve the config file path from an explicit flag or the default name
pub fn config_file(explicit: Option<&str>) -> PathBuf {
    match explicit {
        Some(path) => expand(path),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

/// Resolve `path` against `base` unless it is already absolute
///
/// The result is made absolute lexically; nothing is read from disk.
pub fn resolve(base: &Path, path: &str) -> Result<PathBuf> {
    let expanded = expand(path);
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    };
    std::path::absolute(&joined)
        .with_context(|| format!("Could not resolve {}", joined.display()))
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables are left as written.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Helper to run a test with temporary env var
    ///
    /// Callers hold [`lock_env`] so no other test touches the environment.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Serialized by ENV_LOCK
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: Serialized by ENV_LOCK
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    fn without_env_var<F, R>(key: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Serialized by ENV_LOCK
        unsafe { env::remove_var(key) };
        let result = f();
        if let Some(v) = original {
            // SAFETY: Serialized by ENV_LOCK
            unsafe { env::set_var(key, v) };
        }
        result
    }

    #[test]
    fn test_state_dir_env_override() {
        let _env = lock_env();
        with_env_var(ENV_STATE_DIR, "/custom/state/path", || {
            let result = state_dir().unwrap();
            assert_eq!(result, PathBuf::from("/custom/state/path"));
            let state = state_file_for(Path::new("/srv/app/simplescript.toml")).unwrap();
            assert_eq!(state.parent(), Some(Path::new("/custom/state/path")));
        });
    }

    #[test]
    fn test_state_file_is_scoped_to_config() {
        let dir = Path::new("/state");
        let a = state_file_in(dir, Path::new("/srv/app/simplescript.toml"));
        let b = state_file_in(dir, Path::new("/srv/web/simplescript.toml"));
        let a_other = state_file_in(dir, Path::new("/srv/app/other.toml"));

        assert_ne!(a, b);
        assert_ne!(a, a_other);
        assert_eq!(a, state_file_in(dir, Path::new("/srv/app/simplescript.toml")));

        let name = a.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("app-"));
        assert!(name.ends_with(".json"));
        assert_eq!(a.parent(), Some(dir));
    }

    #[test]
    fn test_state_file_for_relative_config_is_stable() {
        let _env = lock_env();
        with_env_var(ENV_STATE_DIR, "/custom/state/path", || {
            let cwd = env::current_dir().unwrap();
            assert_eq!(
                state_file_for(Path::new("simplescript.toml")).unwrap(),
                state_file_for(&cwd.join("simplescript.toml")).unwrap()
            );
        });
    }

    #[test]
    fn test_xdg_state_home() {
        let _env = lock_env();
        without_env_var(ENV_STATE_DIR, || {
            with_env_var("XDG_STATE_HOME", "/tmp/xdg-state-test", || {
                let result = state_dir().unwrap();
                assert_eq!(result, PathBuf::from("/tmp/xdg-state-test/simplescript"));
            });
        });
    }

    #[test]
    fn test_config_file_default_and_explicit() {
        assert_eq!(config_file(None), PathBuf::from("simplescript.toml"));
        assert_eq!(
            config_file(Some("/etc/simplescript.toml")),
            PathBuf::from("/etc/simplescript.toml")
        );
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let base = Path::new("/srv/project");
        assert_eq!(
            resolve(base, "scripts").unwrap(),
            PathBuf::from("/srv/project/scripts")
        );
        assert_eq!(resolve(base, "/opt").unwrap(), PathBuf::from("/opt"));
    }

    #[test]
    fn test_expand_with_tilde() {
        let _env = lock_env();
        let result = expand("~/test/path");
        let home = dirs::home_dir().unwrap();
        assert_eq!(result, home.join("test").join("path"));
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let result = expand("/path/$NONEXISTENT_VAR_12345/file");
        assert_eq!(result, PathBuf::from("/path/$NONEXISTENT_VAR_12345/file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_default_state_dir_unix() {
        let _env = lock_env();
        without_env_var(ENV_STATE_DIR, || {
            without_env_var("XDG_STATE_HOME", || {
                let result = state_dir().unwrap();
                let home = dirs::home_dir().unwrap();
                assert_eq!(
                    result,
                    home.join(".local").join("state").join("simplescript")
                );
            });
        });
    }
}
