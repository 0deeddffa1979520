pub mod export;
pub mod store;
pub mod vault;

pub use store::CredentialStore;
pub use vault::{Credential, CredentialManager};
