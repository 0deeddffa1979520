use anyhow::Result;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::constants::{
    APP_AUTHOR, APP_NAME, DEFAULT_CLIPBOARD_SECONDS, MASTER_FILENAME, PASSWORDS_FILENAME,
};
use crate::utils::errors::AppError;

/// Resolved runtime settings, built once in `main` and passed down.
#[derive(Debug, Clone)]
pub struct Config {
    data_dir: PathBuf,
    clipboard_hold: Duration,
}

impl Config {
    pub fn new(data_dir: PathBuf, clipboard_seconds: u64) -> Self {
        Self {
            data_dir,
            clipboard_hold: Duration::from_secs(clipboard_seconds),
        }
    }

    /// Builds the config from the raw `--data-dir` value, falling back to the
    /// platform data directory.
    pub fn resolve(data_dir: Option<&str>, clipboard_seconds: Option<u64>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(raw) => expand_path(raw)?,
            None => default_data_dir()?,
        };
        Ok(Self::new(
            data_dir,
            clipboard_seconds.unwrap_or(DEFAULT_CLIPBOARD_SECONDS),
        ))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn passwords_path(&self) -> PathBuf {
        self.data_dir.join(PASSWORDS_FILENAME)
    }

    pub fn master_path(&self) -> PathBuf {
        self.data_dir.join(MASTER_FILENAME)
    }

    pub fn clipboard_hold(&self) -> Duration {
        self.clipboard_hold
    }
}

fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).map_err(|e| {
        AppError::ConfigurationError(format!("cannot expand data dir '{}': {}", raw, e))
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

fn default_data_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", APP_AUTHOR, APP_NAME).ok_or_else(|| {
        AppError::ConfigurationError("Could not determine app data directory".to_string())
    })?;
    Ok(project_dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_paths_live_in_data_dir() {
        let config = Config::new(PathBuf::from("/tmp/passman-test"), 5);

        assert_eq!(
            config.passwords_path(),
            PathBuf::from("/tmp/passman-test/password.json")
        );
        assert_eq!(
            config.master_path(),
            PathBuf::from("/tmp/passman-test/master_password.json")
        );
        assert_eq!(config.clipboard_hold(), Duration::from_secs(5));
    }

    #[test]
    fn test_resolve_defaults_clipboard_delay() {
        let config = Config::resolve(Some("/var/lib/passman"), None).unwrap();

        assert_eq!(config.data_dir(), Path::new("/var/lib/passman"));
        assert_eq!(config.clipboard_hold(), Duration::from_secs(30));
    }

    #[test]
    fn test_resolve_expands_env_vars() {
        std::env::set_var("PASSMAN_TEST_ROOT", "/srv/secrets");
        let config = Config::resolve(Some("$PASSMAN_TEST_ROOT/passman"), Some(0)).unwrap();

        assert_eq!(config.data_dir(), Path::new("/srv/secrets/passman"));
        assert_eq!(config.clipboard_hold(), Duration::ZERO);
    }
}
