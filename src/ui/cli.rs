use anyhow::Result;
use chrono::NaiveDateTime;
use colored::Colorize;
use log::debug;
use std::path::Path;
use std::time::Duration;

use crate::credential_manager::export::export_csv;
use crate::credential_manager::{Credential, CredentialManager, CredentialStore};
use crate::master::{MasterFile, MasterGate};
use crate::password_gen::{CaseMode, PasswordGenerator};
use crate::ui::clipboard::{hold_then_clear, Clipboard};
use crate::ui::prompt::Prompter;
use crate::utils::config::Config;
use crate::utils::constants::{DEFAULT_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH};
use crate::utils::errors::AppError;

const ADD_USAGE: &str = "Usage: passman add -title instagram -username user123456 -generatepassword (For generating new password)";

/// One invocation's worth of state: where the files live and how to talk to
/// the user.
pub struct Session<'a> {
    pub config: &'a Config,
    pub prompter: &'a mut dyn Prompter,
    pub clipboard: &'a mut dyn Clipboard,
    pub now: NaiveDateTime,
}

impl Session<'_> {
    fn gate(&self) -> MasterGate {
        MasterGate::new(MasterFile::new(self.config.master_path()))
    }

    fn credentials(&self) -> Result<CredentialManager> {
        CredentialManager::load(CredentialStore::new(self.config.passwords_path()))
    }

    fn hold(&self) -> Duration {
        self.config.clipboard_hold()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { title: String, username: String },
    Delete { title: String },
    Change { title: String },
    Export { filename: String },
    MasterUpdate,
    Copy { title: String },
    Help,
    /// Six words that are not a well-formed `add`.
    AddUsage,
}

impl Command {
    /// Matches the words after the program name by exact shape. Anything
    /// unrecognised falls back to help.
    pub fn from_args(args: &[String]) -> Self {
        let words: Vec<&str> = args.iter().map(String::as_str).collect();
        match words.as_slice() {
            ["add", "-title", title, "-username", username, "-generatepassword"] => Command::Add {
                title: title.to_string(),
                username: username.to_string(),
            },
            [_, _, _, _, _, _] => Command::AddUsage,
            ["delete", "-title", title] => Command::Delete {
                title: title.to_string(),
            },
            ["change", "-title", title] => Command::Change {
                title: title.to_string(),
            },
            ["export", "-filename", filename] => Command::Export {
                filename: filename.to_string(),
            },
            ["master", "-update"] => Command::MasterUpdate,
            ["copy", "-title", title] => Command::Copy {
                title: title.to_string(),
            },
            _ => Command::Help,
        }
    }

    pub fn requires_master(&self) -> bool {
        !matches!(
            self,
            Command::MasterUpdate | Command::Help | Command::AddUsage
        )
    }
}

pub fn handle_command(command: Command, session: &mut Session) -> Result<()> {
    if command.requires_master() {
        let state = session.gate().unlock(session.prompter, session.now)?;
        debug!("master gate passed ({:?})", state);
    }

    match command {
        Command::Add { title, username } => add_password(session, title, username),
        Command::Delete { title } => delete_password(session, &title),
        Command::Change { title } => change_password(session, &title),
        Command::Export { filename } => export_passwords(session, Path::new(&filename)),
        Command::MasterUpdate => update_master(session),
        Command::Copy { title } => copy_password(session, &title),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::AddUsage => {
            println!("{}", ADD_USAGE);
            Ok(())
        }
    }
}

fn add_password(session: &mut Session, title: String, username: String) -> Result<()> {
    let mut manager = session.credentials()?;
    if manager.contains(&title) {
        return Err(AppError::CredentialError(
            "Password already exists for this title.".to_string(),
        )
        .into());
    }

    let prompter = &mut *session.prompter;
    let length = prompter.line(&format!(
        "Length of password (default = {}): ",
        DEFAULT_PASSWORD_LENGTH
    ))?;
    let case = prompter.line("'u' for only uppercase | 'l' for only lowercases (default = mixed): ")?;
    let symbols = prompter.line("Symbols? 'yes' | 'no' (default: yes): ")?;
    let url = prompter.line("URL (default = empty): ")?;

    let hold = session.hold();
    let generator = PasswordGenerator::new(
        parse_length(&length)?,
        CaseMode::from_answer(&case),
        !symbols.trim().eq_ignore_ascii_case("no"),
    );
    let password = generator.generate();

    manager.add_credential(Credential::new(title, username, password.clone(), url.trim()))?;

    println!(
        "{}",
        format!("OK password created and {}", clipboard_notice(hold)).green()
    );
    hold_then_clear(session.clipboard, &password, hold)
}

fn parse_length(answer: &str) -> Result<usize> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(DEFAULT_PASSWORD_LENGTH);
    }
    match answer.parse::<usize>() {
        Ok(length) if length <= MAX_PASSWORD_LENGTH => Ok(length),
        Ok(_) => Err(AppError::UserInputError(format!(
            "password length must be at most {}",
            MAX_PASSWORD_LENGTH
        ))
        .into()),
        Err(_) => Err(AppError::UserInputError(format!(
            "'{}' is not a valid password length",
            answer
        ))
        .into()),
    }
}

fn delete_password(session: &mut Session, title: &str) -> Result<()> {
    let mut manager = session.credentials()?;

    let confirm = session
        .prompter
        .line("Do you really wanted to delete the password? (yes/no): ")?;
    if !confirm.trim().eq_ignore_ascii_case("yes") {
        println!("{}", "Delete operation aborted!".yellow());
        return Ok(());
    }

    manager.remove_credential(title)?;
    println!("{}", "Your password is successfully deleted.".green());

    Ok(())
}

fn change_password(session: &mut Session, title: &str) -> Result<()> {
    let mut manager = session.credentials()?;
    let hold = session.hold();

    let password = PasswordGenerator::default().generate();
    manager.update_password(title, password.clone())?;

    println!(
        "{}",
        format!(
            "Password has been changed successfully & {}",
            clipboard_notice(hold)
        )
        .green()
    );
    hold_then_clear(session.clipboard, &password, hold)
}

fn export_passwords(session: &mut Session, path: &Path) -> Result<()> {
    let manager = session.credentials()?;

    let count = export_csv(manager.credentials(), path)?;
    println!(
        "{}",
        format!("Exported {} passwords to {}", count, path.display()).green()
    );

    Ok(())
}

fn update_master(session: &mut Session) -> Result<()> {
    session.gate().change(session.prompter, session.now)?;
    println!("{}", "Master-Password successfully updated.".green());
    Ok(())
}

fn copy_password(session: &mut Session, title: &str) -> Result<()> {
    let manager = session.credentials()?;
    let credential = manager.get_credential(title)?;
    let hold = session.hold();

    println!(
        "Username: {} | Password {}",
        credential.username().cyan(),
        clipboard_notice(hold)
    );
    hold_then_clear(session.clipboard, credential.password(), hold)
}

fn clipboard_notice(hold: Duration) -> String {
    if hold.is_zero() {
        "copied to clipboard until something else is copied".to_string()
    } else {
        format!("copied to clipboard for next {} seconds", hold.as_secs())
    }
}

pub fn print_help() {
    println!("\n### HELP - USE FOLLOWING COMMANDS ###\n");
    println!("Generating new password:\npassman add -title instagram -username user123456 -generatepassword\n");
    println!("Copying password to clipboard:\npassman copy -title instagram\n");
    println!("Deleting password:\npassman delete -title instagram\n");
    println!("Exporting passwords to CSV:\npassman export -filename export.csv\n");
    println!("Changing password:\npassman change -title instagram\n");
    println!("Changing Master-Password:\npassman master -update\n");
    println!("Help:\npassman help");
}
