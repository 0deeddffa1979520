use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Credential error: {0}")]
    CredentialError(String),
    #[error("Clipboard error: {0}")]
    ClipboardError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("User input error: {0}")]
    UserInputError(String),
    #[error("No master password has been set yet. Run any command to create one.")]
    NotInitialized,
}
