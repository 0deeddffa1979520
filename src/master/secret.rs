use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use zeroize::Zeroize;

use crate::utils::fs::write_atomic;
use crate::utils::json::to_spaced_json;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MasterSecret {
    password: String,
    #[serde(with = "last_access_format")]
    last_access: NaiveDateTime,
}

impl MasterSecret {
    pub fn new(password: impl Into<String>, last_access: NaiveDateTime) -> Self {
        Self {
            password: password.into(),
            last_access,
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    pub fn last_access(&self) -> NaiveDateTime {
        self.last_access
    }

    pub fn touch(&mut self, now: NaiveDateTime) {
        self.last_access = now;
    }
}

impl Drop for MasterSecret {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

mod last_access_format {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use crate::utils::constants::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// The single-object master-secret file.
#[derive(Debug, Clone)]
pub struct MasterFile {
    path: PathBuf,
}

impl MasterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `None` when no master password has been created yet.
    pub fn load(&self) -> Result<Option<MasterSecret>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("read {}", self.path.display())),
        };

        let secret = serde_json::from_str(&content)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(Some(secret))
    }

    pub fn save(&self, secret: &MasterSecret) -> Result<()> {
        let json = to_spaced_json(secret).context("serialize master secret")?;
        write_atomic(&self.path, &json)?;
        debug!("master secret written, last access {}", secret.last_access());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let file = MasterFile::new(dir.path().join("master_password.json"));

        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_file_format() {
        let dir = tempdir().unwrap();
        let file = MasterFile::new(dir.path().join("master_password.json"));

        file.save(&MasterSecret::new("hunter2", at(8, 5, 0))).unwrap();

        assert_eq!(
            fs::read_to_string(&file.path).unwrap(),
            r#"{"password": "hunter2", "last_access": "2024-03-09 08:05:00"}"#
        );
        let loaded = file.load().unwrap().unwrap();
        assert!(loaded.matches("hunter2"));
        assert_eq!(loaded.last_access(), at(8, 5, 0));
    }

    #[test]
    fn test_non_ascii_password_is_escaped() {
        let dir = tempdir().unwrap();
        let file = MasterFile::new(dir.path().join("master_password.json"));

        file.save(&MasterSecret::new("pässwörd", at(8, 5, 0))).unwrap();

        let content = fs::read_to_string(&file.path).unwrap();
        assert!(content.starts_with(r#"{"password": "p\u00e4ssw\u00f6rd""#));
        assert!(file.load().unwrap().unwrap().matches("pässwörd"));
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        let dir = tempdir().unwrap();
        let file = MasterFile::new(dir.path().join("master_password.json"));
        fs::write(&file.path, r#"{"password":"x","last_access":"yesterday"}"#).unwrap();

        assert!(file.load().is_err());
    }
}
