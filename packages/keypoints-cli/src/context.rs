//! Application context with shared state and utilities

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::path::{Path, PathBuf};

use crate::config::Settings;

/// Application context passed to all commands
pub struct AppContext {
    pub quiet: bool,
    pub settings: Settings,
}

impl AppContext {
    pub fn new(quiet: bool, config: Option<&Path>) -> Result<Self> {
        let settings = Settings::load(config)?;
        Ok(Self { quiet, settings })
    }

    pub fn theme(&self) -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.quiet {
            return Ok(default);
        }
        Ok(Confirm::with_theme(&self.theme())
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    /// Ask for a path, falling back to `default` on empty input.
    pub fn prompt_path(&self, prompt: &str, default: &Path) -> Result<PathBuf> {
        let answer: String = Input::with_theme(&self.theme())
            .with_prompt(prompt)
            .default(default.display().to_string())
            .interact_text()?;
        Ok(PathBuf::from(answer.trim()))
    }

    /// The dataset path from the command line, or the configured one.
    pub fn dataset_or_default(&self, dataset: Option<PathBuf>) -> PathBuf {
        dataset.unwrap_or_else(|| self.settings.dataset.clone())
    }

    pub fn print_header(&self, msg: &str) {
        if !self.quiet {
            println!();
            println!("{}", style(msg).bold());
        }
    }

    pub fn print_success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).green());
        }
    }

    pub fn print_warning(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).yellow());
        }
    }

    pub fn print_info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).cyan());
        }
    }

    pub fn print_error(&self, msg: &str) {
        eprintln!("{}", style(msg).red());
    }
}
