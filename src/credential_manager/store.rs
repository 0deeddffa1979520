use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::Credential;
use crate::utils::fs::write_atomic;
use crate::utils::json::to_pretty_json;

/// The credential file: a JSON array loaded and saved as a whole.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty store.
    pub fn load(&self) -> Result<Vec<Credential>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no credential file at {:?}, starting empty", self.path);
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read {}", self.path.display()));
            }
        };

        let credentials: Vec<Credential> = serde_json::from_str(&content)
            .with_context(|| format!("parse {}", self.path.display()))?;
        debug!("loaded {} credentials from {:?}", credentials.len(), self.path);
        Ok(credentials)
    }

    pub fn save(&self, credentials: &[Credential]) -> Result<()> {
        let json = to_pretty_json(credentials).context("serialize credentials")?;
        write_atomic(&self.path, &json)?;
        debug!("saved {} credentials to {:?}", credentials.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Vec<Credential> {
        vec![
            Credential::new("github", "alice", "Ab1!23xy9Q2k", ""),
            Credential::new("Instagram", "user123456", "zz9#QQqq1234", "https://instagram.com"),
        ]
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("password.json"));

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_order() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("password.json"));

        store.save(&sample()).unwrap();

        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn test_file_is_indented_with_four_spaces() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("password.json"));

        store
            .save(&[Credential::new("github", "alice", "Ab1!23xy9Q2k", "")])
            .unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            content,
            "[\n    {\n        \"title\": \"github\",\n        \"username\": \"alice\",\n        \"password\": \"Ab1!23xy9Q2k\",\n        \"url\": \"\"\n    }\n]"
        );
    }

    #[test]
    fn test_missing_url_defaults_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("password.json");
        fs::write(&path, r#"[{"title":"a","username":"b","password":"c"}]"#).unwrap();

        let loaded = CredentialStore::new(&path).load().unwrap();

        assert_eq!(loaded[0].url(), "");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("password.json");
        fs::write(&path, "[{").unwrap();

        assert!(CredentialStore::new(&path).load().is_err());
    }
}
