pub mod config;
pub mod constants;
pub mod errors;
pub mod fs;
pub mod json;
