use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use super::store::CredentialStore;
use crate::utils::errors::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Credential {
    title: String,
    username: String,
    password: String,
    #[serde(default)]
    url: String,
}

impl Credential {
    pub fn new(
        title: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            username: username.into(),
            password: password.into(),
            url: url.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn matches_title(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }

    pub fn update_password(&mut self, password: String) {
        self.password = password;
    }
}

/// Credentials loaded from a store. Every mutation is written back at once.
#[derive(Debug)]
pub struct CredentialManager {
    store: CredentialStore,
    credentials: Vec<Credential>,
}

impl CredentialManager {
    pub fn load(store: CredentialStore) -> Result<Self> {
        debug!("credential store at {:?}", store.path());
        let credentials = store.load()?;
        Ok(Self { store, credentials })
    }

    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    pub fn contains(&self, title: &str) -> bool {
        self.position(title).is_some()
    }

    fn position(&self, title: &str) -> Option<usize> {
        self.credentials.iter().position(|c| c.matches_title(title))
    }

    pub fn add_credential(&mut self, credential: Credential) -> Result<()> {
        if self.contains(credential.title()) {
            return Err(AppError::CredentialError(
                "Password already exists for this title.".to_string(),
            )
            .into());
        }

        self.credentials.push(credential);
        self.store.save(&self.credentials)?;

        Ok(())
    }

    pub fn get_credential(&self, title: &str) -> Result<&Credential> {
        self.credentials
            .iter()
            .find(|c| c.matches_title(title))
            .ok_or_else(|| {
                AppError::CredentialError(format!(
                    "Your password does not exist for title: {}",
                    title
                ))
                .into()
            })
    }

    /// Removes the first record whose title matches, shifting later records left.
    pub fn remove_credential(&mut self, title: &str) -> Result<Credential> {
        let position = self.position(title).ok_or_else(|| {
            AppError::CredentialError("This password is not present.".to_string())
        })?;

        let removed = self.credentials.remove(position);
        self.store.save(&self.credentials)?;

        Ok(removed)
    }

    pub fn update_password(&mut self, title: &str, password: String) -> Result<&Credential> {
        let position = self
            .position(title)
            .ok_or_else(|| AppError::CredentialError(format!("Title: {} not found.", title)))?;

        self.credentials[position].update_password(password);
        self.store.save(&self.credentials)?;

        Ok(&self.credentials[position])
    }
}
