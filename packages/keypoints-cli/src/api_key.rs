//! API key prompting and `.env` persistence.

use anyhow::{bail, Context, Result};
use dialoguer::{Password, Select};
use keypoints::{is_plausible_api_key, ApiKey, MIN_API_KEY_LEN};
use std::fs;
use std::path::Path;

use crate::config::ENV_API_KEY;
use crate::context::AppContext;

pub const ENV_FILE: &str = ".env";

/// Return the configured key, prompting for one when it is missing or malformed.
///
/// A prompted key replaces the one held in the context's settings.
pub fn ensure_api_key(ctx: &mut AppContext) -> Result<ApiKey> {
    if ctx.settings.has_api_key() {
        if let Some(key) = &ctx.settings.generator.api_key {
            return Ok(key.clone());
        }
    }
    if ctx.quiet {
        bail!("{} is not set or invalid", ENV_API_KEY);
    }

    ctx.print_warning("API key not found in environment or invalid.");
    let key = prompt_api_key(ctx)?;
    ctx.settings.generator.api_key = Some(key.clone());
    Ok(key)
}

/// Ask for a key until a plausible one is entered, then offer to save it.
pub fn prompt_api_key(ctx: &AppContext) -> Result<ApiKey> {
    let key: String = Password::with_theme(&ctx.theme())
        .with_prompt("Please enter your OpenAI compatible API key")
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            if is_plausible_api_key(input) {
                Ok(())
            } else {
                Err(format!(
                    "Invalid API key format (expected more than {} characters)",
                    MIN_API_KEY_LEN
                ))
            }
        })
        .interact()?;
    let key = key.trim().to_string();

    if ctx.confirm("Would you like to save this API key to .env file?", true)? {
        save_api_key(Path::new(ENV_FILE), &key)?;
        ctx.print_success("API key saved to .env file");
    }

    Ok(ApiKey::new(key))
}

/// Interactive view/update/remove loop.
pub fn manage(ctx: &mut AppContext) -> Result<()> {
    let items = [
        "View current API key",
        "Update API key",
        "Remove API key",
        "Back to main menu",
    ];

    loop {
        let choice = Select::with_theme(&ctx.theme())
            .with_prompt("API Key Management")
            .items(&items)
            .default(0)
            .interact()?;

        match choice {
            0 => show(ctx),
            1 => {
                let key = prompt_api_key(ctx)?;
                ctx.settings.generator.api_key = Some(key);
                ctx.print_success("API key updated");
            }
            2 => {
                if remove(ctx)? {
                    ctx.settings.generator.api_key = None;
                }
            }
            _ => return Ok(()),
        }
    }
}

pub fn show(ctx: &AppContext) {
    match &ctx.settings.generator.api_key {
        Some(key) => ctx.print_success(&format!("Current API key: {}", mask_key(key.expose()))),
        None => ctx.print_warning("No API key found"),
    }
}

/// Remove the key line from `.env`. Returns whether a key was removed.
pub fn remove(ctx: &AppContext) -> Result<bool> {
    let removed = remove_api_key(Path::new(ENV_FILE))?;
    if removed {
        ctx.print_success("API key removed");
    } else {
        ctx.print_warning("No API key found in .env file");
    }
    Ok(removed)
}

/// First eight and last four characters of `key`.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

pub fn save_api_key(path: &Path, key: &str) -> Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    };
    fs::write(path, upsert_env_var(&existing, ENV_API_KEY, key))
        .with_context(|| format!("Failed to write {}", path.display()))
}

pub fn remove_api_key(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let (updated, removed) = remove_env_var(&content, ENV_API_KEY);
    if removed {
        fs::write(path, updated).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(removed)
}

fn is_assignment(line: &str, name: &str) -> bool {
    line.trim_start()
        .strip_prefix(name)
        .is_some_and(|rest| rest.trim_start().starts_with('='))
}

/// Set `name=value` in dotenv `content`, replacing an existing assignment.
pub fn upsert_env_var(content: &str, name: &str, value: &str) -> String {
    let assignment = format!("{name}={value}");
    let mut replaced = false;
    let mut lines: Vec<String> = content
        .lines()
        .map(|line| {
            if !replaced && is_assignment(line, name) {
                replaced = true;
                assignment.clone()
            } else {
                line.to_string()
            }
        })
        .collect();

    if !replaced {
        lines.push(assignment);
    }

    let mut updated = lines.join("\n");
    updated.push('\n');
    updated
}

/// Drop every assignment of `name` from dotenv `content`.
pub fn remove_env_var(content: &str, name: &str) -> (String, bool) {
    let kept: Vec<&str> = content
        .lines()
        .filter(|line| !is_assignment(line, name))
        .collect();
    let removed = kept.len() != content.lines().count();

    let mut updated = kept.join("\n");
    if !updated.is_empty() {
        updated.push('\n');
    }
    (updated, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "sk-abcdefghijklmnopqrstuvwxyz";

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key(KEY), "sk-abcde...wxyz");
        assert_eq!(mask_key("short"), "*****");
    }

    #[test]
    fn test_upsert_appends_to_empty() {
        assert_eq!(
            upsert_env_var("", ENV_API_KEY, KEY),
            format!("OPENAI_COMPATIBLE_API_KEY={KEY}\n")
        );
    }

    #[test]
    fn test_upsert_replaces_existing_and_keeps_others() {
        let content = "OLLAMA_API_URL=http://localhost:11434\nOPENAI_COMPATIBLE_API_KEY=old\nFOO=bar";

        let updated = upsert_env_var(content, ENV_API_KEY, KEY);

        assert_eq!(
            updated,
            format!("OLLAMA_API_URL=http://localhost:11434\nOPENAI_COMPATIBLE_API_KEY={KEY}\nFOO=bar\n")
        );
    }

    #[test]
    fn test_upsert_ignores_prefixed_names() {
        let updated = upsert_env_var("OPENAI_COMPATIBLE_API_KEY_BACKUP=x\n", ENV_API_KEY, KEY);

        assert!(updated.starts_with("OPENAI_COMPATIBLE_API_KEY_BACKUP=x\n"));
        assert!(updated.ends_with(&format!("OPENAI_COMPATIBLE_API_KEY={KEY}\n")));
    }

    #[test]
    fn test_remove_env_var() {
        let (updated, removed) =
            remove_env_var("A=1\nOPENAI_COMPATIBLE_API_KEY=secret\nB=2\n", ENV_API_KEY);
        assert!(removed);
        assert_eq!(updated, "A=1\nB=2\n");

        let (unchanged, removed) = remove_env_var("A=1\n", ENV_API_KEY);
        assert!(!removed);
        assert_eq!(unchanged, "A=1\n");
    }

    #[test]
    fn test_save_and_remove_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        save_api_key(&path, "sk-first-key-0123456789abc").unwrap();
        save_api_key(&path, KEY).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("OPENAI_COMPATIBLE_API_KEY={KEY}\n"));

        assert!(remove_api_key(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        assert!(!remove_api_key(&dir.path().join("missing.env")).unwrap());
    }
}
