pub mod cli;
pub mod clipboard;
pub mod prompt;
