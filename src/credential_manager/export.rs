use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use super::Credential;
use crate::utils::errors::AppError;

const CSV_HEADER: [&str; 4] = ["title", "username", "password", "url"];

/// Writes every credential to `path` as CSV, header first, in store order.
pub fn export_csv(credentials: &[Credential], path: &Path) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(AppError::CsvError)
        .with_context(|| format!("create {}", path.display()))?;

    writer.write_record(CSV_HEADER).map_err(AppError::CsvError)?;
    for credential in credentials {
        writer
            .write_record([
                credential.title(),
                credential.username(),
                credential.password(),
                credential.url(),
            ])
            .map_err(AppError::CsvError)?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;

    debug!("exported {} credentials to {:?}", credentials.len(), path);
    Ok(credentials.len())
}
