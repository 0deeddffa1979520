use anyhow::Result;
use rpassword::prompt_password;
use std::io::{self, Write};
use zeroize::Zeroizing;

/// Source of interactive answers.
pub trait Prompter {
    /// Hidden entry, used for master passwords.
    fn password(&mut self, prompt: &str) -> Result<Zeroizing<String>>;

    /// Visible single-line entry, without the trailing newline.
    fn line(&mut self, prompt: &str) -> Result<String>;

    fn message(&mut self, text: &str);
}

pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn password(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        Ok(Zeroizing::new(prompt_password(prompt)?))
    }

    fn line(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }

    fn message(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Replays canned answers in order and records every prompt it was shown.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    pub prompts: Vec<String>,
    pub messages: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("unexpected prompt: {}", prompt))
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn password(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        self.next(prompt).map(Zeroizing::new)
    }

    fn line(&mut self, prompt: &str) -> Result<String> {
        self.next(prompt)
    }

    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}
