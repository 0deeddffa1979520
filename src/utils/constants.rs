pub const APP_NAME: &str = "passman";
pub const APP_AUTHOR: &str = "Passman Team";
pub const PASSWORDS_FILENAME: &str = "password.json";
pub const MASTER_FILENAME: &str = "master_password.json";

/// Format of `last_access` in the master-secret file, local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const FRESHNESS_HOURS: i64 = 24;

pub const DEFAULT_PASSWORD_LENGTH: usize = 12;
pub const MAX_PASSWORD_LENGTH: usize = 4096;
pub const DEFAULT_CLIPBOARD_SECONDS: u64 = 30;
