use anyhow::Result;
use chrono::NaiveDateTime;
use log::{debug, info};
use zeroize::Zeroizing;

use super::secret::{MasterFile, MasterSecret};
use crate::ui::prompt::Prompter;
use crate::utils::constants::FRESHNESS_HOURS;
use crate::utils::errors::AppError;

/// Where the gate found the master secret before it let a command through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Absent,
    Fresh,
    Stale,
}

/// Elapsed time is counted in whole hours, rounded down, so anything under
/// 25 hours still counts as fresh.
pub fn is_fresh(last_access: NaiveDateTime, now: NaiveDateTime) -> bool {
    let hours = (now - last_access).num_seconds().div_euclid(3600);
    hours <= FRESHNESS_HOURS
}

pub struct MasterGate {
    file: MasterFile,
}

impl MasterGate {
    pub fn new(file: MasterFile) -> Self {
        Self { file }
    }

    /// Lets a command through, creating the master password on first use and
    /// asking for it once the last successful entry has gone stale.
    pub fn unlock(&self, prompter: &mut dyn Prompter, now: NaiveDateTime) -> Result<GateState> {
        let mut secret = match self.file.load()? {
            Some(secret) => secret,
            None => {
                info!("no master password found, creating one");
                let password = prompt_new_password(
                    prompter,
                    "Create your master password: ",
                    "Re-enter your master password: ",
                )?;
                self.file.save(&MasterSecret::new(password.as_str(), now))?;
                return Ok(GateState::Absent);
            }
        };

        if is_fresh(secret.last_access(), now) {
            debug!("master password entered at {}, still fresh", secret.last_access());
            return Ok(GateState::Fresh);
        }

        let entered = prompter.password("Enter your master password: ")?;
        if !secret.matches(&entered) {
            return Err(
                AppError::AuthenticationError("Your Master-Password is wrong".to_string()).into(),
            );
        }

        secret.touch(now);
        self.file.save(&secret)?;
        Ok(GateState::Stale)
    }

    /// Replaces the master password after checking the current one.
    pub fn change(&self, prompter: &mut dyn Prompter, now: NaiveDateTime) -> Result<()> {
        let secret = self.file.load()?.ok_or(AppError::NotInitialized)?;

        let current = prompter.password("Enter current Master-Password: ")?;
        if !secret.matches(&current) {
            return Err(
                AppError::AuthenticationError("Entered Master-Password is wrong".to_string())
                    .into(),
            );
        }

        let password = prompt_new_password(
            prompter,
            "Create your Master-Password: ",
            "Re-enter your Master-Password: ",
        )?;
        self.file.save(&MasterSecret::new(password.as_str(), now))?;
        info!("master password changed");
        Ok(())
    }
}

/// Asks twice until both entries agree.
fn prompt_new_password(
    prompter: &mut dyn Prompter,
    first: &str,
    second: &str,
) -> Result<Zeroizing<String>> {
    loop {
        let password = prompter.password(first)?;
        let confirm = prompter.password(second)?;
        if *password == *confirm {
            return Ok(password);
        }
        prompter.message("\nTyped in passwords do not match - Please try again:");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::prompt::ScriptedPrompter;
    use chrono::{Duration, NaiveDate};
    use tempfile::tempdir;

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn gate_with(dir: &tempfile::TempDir, secret: Option<MasterSecret>) -> MasterGate {
        let file = MasterFile::new(dir.path().join("master_password.json"));
        if let Some(secret) = secret {
            file.save(&secret).unwrap();
        }
        MasterGate::new(file)
    }

    #[test]
    fn test_freshness_uses_truncated_hours() {
        let last = base();

        assert!(is_fresh(last, last + Duration::hours(1)));
        assert!(is_fresh(last, last + Duration::hours(24)));
        assert!(is_fresh(last, last + Duration::hours(24) + Duration::minutes(59)));
        assert!(!is_fresh(last, last + Duration::hours(25)));
        assert!(is_fresh(last, last - Duration::hours(3)));
    }

    #[test]
    fn test_first_use_creates_secret_after_matching_entries() {
        let dir = tempdir().unwrap();
        let gate = gate_with(&dir, None);
        let mut prompter = ScriptedPrompter::new(&["one", "two", "hunter2", "hunter2"]);

        let state = gate.unlock(&mut prompter, base()).unwrap();

        assert_eq!(state, GateState::Absent);
        assert_eq!(prompter.prompts.len(), 4);
        assert_eq!(prompter.messages.len(), 1);
        let stored = gate.file.load().unwrap().unwrap();
        assert!(stored.matches("hunter2"));
        assert_eq!(stored.last_access(), base());
    }

    #[test]
    fn test_fresh_secret_passes_without_prompt() {
        let dir = tempdir().unwrap();
        let gate = gate_with(&dir, Some(MasterSecret::new("hunter2", base())));
        let mut prompter = ScriptedPrompter::new(&[]);

        let now = base() + Duration::hours(23);
        assert_eq!(gate.unlock(&mut prompter, now).unwrap(), GateState::Fresh);
        assert!(prompter.prompts.is_empty());
        // a fresh pass does not move last_access
        assert_eq!(gate.file.load().unwrap().unwrap().last_access(), base());
    }

    #[test]
    fn test_stale_secret_requires_password_and_refreshes() {
        let dir = tempdir().unwrap();
        let gate = gate_with(&dir, Some(MasterSecret::new("hunter2", base())));
        let mut prompter = ScriptedPrompter::new(&["hunter2"]);

        let now = base() + Duration::hours(26);
        assert_eq!(gate.unlock(&mut prompter, now).unwrap(), GateState::Stale);
        assert_eq!(gate.file.load().unwrap().unwrap().last_access(), now);

        // the refreshed entry lets the next check through silently
        assert_eq!(gate.unlock(&mut prompter, now).unwrap(), GateState::Fresh);
        assert_eq!(prompter.prompts.len(), 1);
    }

    #[test]
    fn test_stale_secret_wrong_password_fails_once() {
        let dir = tempdir().unwrap();
        let gate = gate_with(&dir, Some(MasterSecret::new("hunter2", base())));
        let mut prompter = ScriptedPrompter::new(&["nope", "hunter2"]);

        let now = base() + Duration::days(3);
        let err = gate.unlock(&mut prompter, now).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::AuthenticationError(_))
        ));
        assert_eq!(prompter.remaining(), 1);
        assert_eq!(gate.file.load().unwrap().unwrap().last_access(), base());
    }

    #[test]
    fn test_change_requires_current_password() {
        let dir = tempdir().unwrap();
        let gate = gate_with(&dir, Some(MasterSecret::new("hunter2", base())));
        let mut prompter = ScriptedPrompter::new(&["wrong"]);

        assert!(gate.change(&mut prompter, base()).is_err());
        assert!(gate.file.load().unwrap().unwrap().matches("hunter2"));
    }

    #[test]
    fn test_change_reprompts_until_entries_agree() {
        let dir = tempdir().unwrap();
        let gate = gate_with(&dir, Some(MasterSecret::new("hunter2", base())));
        let mut prompter = ScriptedPrompter::new(&["hunter2", "a", "b", "correct", "correct"]);
        let now = base() + Duration::days(10);

        gate.change(&mut prompter, now).unwrap();

        let stored = gate.file.load().unwrap().unwrap();
        assert!(stored.matches("correct"));
        assert_eq!(stored.last_access(), now);
        assert_eq!(prompter.messages.len(), 1);
    }

    #[test]
    fn test_change_without_secret_is_not_initialized() {
        let dir = tempdir().unwrap();
        let gate = gate_with(&dir, None);
        let mut prompter = ScriptedPrompter::new(&[]);

        let err = gate.change(&mut prompter, base()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::NotInitialized)
        ));
        assert!(prompter.prompts.is_empty());
    }
}
