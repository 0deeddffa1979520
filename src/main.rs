use anyhow::Result;
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use std::process;

mod credential_manager;
mod master;
mod password_gen;
mod ui;
mod utils;

use ui::cli::{handle_command, Command, Session};
use ui::clipboard::SystemClipboard;
use ui::prompt::TerminalPrompter;
use utils::config::Config;

/// Passman - store credentials locally and generate passwords behind a master password
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding password.json and master_password.json
    #[clap(long, env = "PASSMAN_DATA_DIR")]
    data_dir: Option<String>,
    /// Seconds a copied password stays on the clipboard before it is cleared
    /// (default 30; 0 skips the clear and, on X11/Wayland, keeps passman
    /// running until another application takes the clipboard)
    #[clap(long, env = "PASSMAN_CLIPBOARD_SECONDS")]
    clipboard_seconds: Option<u64>,
    /// Print debug logs
    #[clap(short, long, action = clap::ArgAction::SetTrue)]
    verbose: bool,
    /// Command words, e.g. `copy -title instagram`; run `help` for the list
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.data_dir.as_deref(), cli.clipboard_seconds)?;
    log::debug!("using data dir {:?}", config.data_dir());

    let mut prompter = TerminalPrompter;
    let mut clipboard = SystemClipboard::default();
    let mut session = Session {
        config: &config,
        prompter: &mut prompter,
        clipboard: &mut clipboard,
        now: Local::now().naive_local(),
    };

    handle_command(Command::from_args(&cli.args), &mut session)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }
}
