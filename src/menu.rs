//! Menu dialogue
//!
//! Asks which project or services to install and whether to reboot.
//! Prompt rendering sits behind the `Prompter` trait; `DialoguerPrompter`
//! drives a real terminal. A cancelled prompt (Esc, Ctrl-C) comes back as
//! `None` and leaves the raw answer empty, which the resolver rejects.

use crate::catalog::Catalog;
use crate::selection::RawAnswer;
use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, MultiSelect, Select};
use tracing::debug;

pub const EXISTING_PROJECT_QUESTION: &str = "Do you want to run a pre-existing project?";
pub const PROJECT_QUESTION: &str = "What project would you like to build?";
pub const SERVICES_QUESTION: &str = "What services would you like to start?";
pub const REBOOT_QUESTION: &str = "Do you want to reboot this machine now? \
     (Recommended as some changes require a reboot to take effect)";

/// Renders questions and collects answers
pub trait Prompter {
    /// Yes/no question. `None` if the prompt was cancelled.
    fn confirm(&mut self, message: &str, default: bool) -> Result<Option<bool>>;

    /// Pick one choice by index. `None` if the prompt was cancelled.
    fn select(&mut self, message: &str, choices: &[&str]) -> Result<Option<usize>>;

    /// Pick any number of choices by index. `None` if the prompt was cancelled.
    fn multi_select(&mut self, message: &str, choices: &[&str]) -> Result<Option<Vec<usize>>>;
}

/// Terminal prompts via dialoguer
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&mut self, message: &str, default: bool) -> Result<Option<bool>> {
        Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(default)
            .interact_opt()
            .context("Confirm prompt failed")
    }

    fn select(&mut self, message: &str, choices: &[&str]) -> Result<Option<usize>> {
        Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(choices)
            .default(0)
            .interact_opt()
            .context("Select prompt failed")
    }

    fn multi_select(&mut self, message: &str, choices: &[&str]) -> Result<Option<Vec<usize>>> {
        MultiSelect::with_theme(&self.theme)
            .with_prompt(message)
            .items(choices)
            .interact_opt()
            .context("Checkbox prompt failed")
    }
}

/// Drive the menu and return the raw answer.
///
/// The first question decides between the project list (with its synthetic
/// `None` entry) and the service checkbox.
pub fn ask_for_selection(prompter: &mut dyn Prompter, catalog: &Catalog) -> Result<RawAnswer> {
    let existing = prompter.confirm(EXISTING_PROJECT_QUESTION, false)?;
    debug!("existing_project answer: {:?}", existing);

    let answer = if existing == Some(true) {
        let choices = catalog.project_choices();
        match prompter.select(PROJECT_QUESTION, &choices)? {
            Some(index) => choices
                .get(index)
                .map(|name| RawAnswer::project(*name))
                .unwrap_or_default(),
            None => RawAnswer::default(),
        }
    } else {
        let choices = catalog.service_names();
        if choices.is_empty() {
            debug!("No services defined, nothing to tick");
            return Ok(RawAnswer::services(Vec::<String>::new()));
        }
        match prompter.multi_select(SERVICES_QUESTION, &choices)? {
            Some(indices) => {
                RawAnswer::services(indices.iter().filter_map(|&i| choices.get(i).copied()))
            }
            None => RawAnswer::default(),
        }
    };

    debug!("Menu answer: {}", answer);
    Ok(answer)
}

/// Ask whether to reboot. A cancelled prompt means no.
pub fn ask_reboot(prompter: &mut dyn Prompter) -> Result<bool> {
    Ok(prompter.confirm(REBOOT_QUESTION, true)?.unwrap_or(false))
}
