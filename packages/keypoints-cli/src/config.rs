//! Settings for the keypoints CLI.
//!
//! Layered, later sources win:
//! - Built-in defaults
//! - `keypoints.toml` in the working directory, or the file given with `--config`
//! - Environment variables (a `.env` file is loaded first)

use anyhow::{Context, Result};
use keypoints::{
    ApiKey, ExtractionConfig, FactCheckConfig, GeneratorConfig, ProcessOptions,
    VerifyDatasetConfig,
};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "keypoints.toml";
pub const DEFAULT_DATASET: &str = "dataset.json";

pub const ENV_API_KEY: &str = "OPENAI_COMPATIBLE_API_KEY";
pub const ENV_API_URL: &str = "OPENAI_COMPATIBLE_API_URL";
pub const ENV_MODEL: &str = "OPENAI_COMPATIBLE_MODEL";
pub const ENV_FACT_CHECK_MODEL: &str = "FACT_CHECK_MODEL";
pub const ENV_FACT_CHECK_URL: &str = "OLLAMA_API_URL";
pub const ENV_DATASET: &str = "KEYPOINTS_DATASET";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dataset file used when a command is not given one
    pub dataset: PathBuf,
    pub generator: GeneratorConfig,
    pub fact_check: FactCheckConfig,
    pub extraction: ExtractionConfig,
    pub process: ProcessOptions,
    pub verify: VerifyDatasetConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET),
            generator: GeneratorConfig::default(),
            fact_check: FactCheckConfig::default(),
            extraction: ExtractionConfig::default(),
            process: ProcessOptions::default(),
            verify: VerifyDatasetConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from file and environment.
    ///
    /// An explicit `config` path must exist; the default file is optional.
    pub fn load(config: Option<&Path>) -> Result<Self> {
        let mut settings = match config {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        settings.apply_env(|name| env::var(name).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override settings from environment variables.
    ///
    /// Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.generator.api_key = Some(ApiKey::new(key.trim()));
        }
        if let Some(url) = get(ENV_API_URL) {
            self.generator.base_url = base_url(&url);
        }
        if let Some(model) = get(ENV_MODEL) {
            self.generator.model = model;
        }
        if let Some(model) = get(ENV_FACT_CHECK_MODEL) {
            self.fact_check.model = model;
        }
        if let Some(url) = get(ENV_FACT_CHECK_URL) {
            self.fact_check.base_url = base_url(&url);
        }
        if let Some(dataset) = get(ENV_DATASET) {
            self.dataset = PathBuf::from(dataset);
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.generator
            .api_key
            .as_ref()
            .is_some_and(ApiKey::looks_valid)
    }
}

/// Accept either a base URL or a full `/chat/completions` endpoint.
fn base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    url.strip_suffix("/chat/completions")
        .unwrap_or(url)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.dataset, PathBuf::from("dataset.json"));
        assert_eq!(settings.fact_check.model, "bespoke-minicheck");
        assert!(!settings.extraction.auto_check_enabled);
        assert!(!settings.has_api_key());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            dataset = "data/articles.json"

            [generator]
            model = "gpt-4o-mini"

            [extraction]
            auto_check_enabled = true
            max_regeneration_attempts = 4

            [verify]
            checkpoint_every = 10
            "#,
        )
        .unwrap();

        assert_eq!(settings.dataset, PathBuf::from("data/articles.json"));
        assert_eq!(settings.generator.model, "gpt-4o-mini");
        assert_eq!(settings.generator.top_p, 0.9);
        assert!(settings.extraction.auto_check_enabled);
        assert_eq!(settings.extraction.max_regeneration_attempts, 4);
        assert_eq!(settings.verify.checkpoint_every, 10);
        assert!(settings.verify.backup);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Settings::from_toml("dataset = [").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.apply_env(env_of(&[
            (ENV_API_KEY, "  sk-0123456789abcdefghijklmn  "),
            (ENV_API_URL, "https://llm.test/v1/"),
            (ENV_MODEL, "local-model"),
            (ENV_FACT_CHECK_MODEL, "minicheck-7b"),
            (ENV_FACT_CHECK_URL, "http://gpu-box:11434/v1/chat/completions"),
            (ENV_DATASET, "other.json"),
        ]));

        assert!(settings.has_api_key());
        assert_eq!(
            settings.generator.api_key.as_ref().unwrap().expose(),
            "sk-0123456789abcdefghijklmn"
        );
        assert_eq!(settings.generator.base_url, "https://llm.test/v1");
        assert_eq!(settings.generator.model, "local-model");
        assert_eq!(settings.fact_check.model, "minicheck-7b");
        assert_eq!(settings.fact_check.base_url, "http://gpu-box:11434/v1");
        assert_eq!(settings.dataset, PathBuf::from("other.json"));
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut settings = Settings::default();
        settings.apply_env(env_of(&[(ENV_MODEL, "   "), (ENV_API_KEY, "")]));

        assert_eq!(settings.generator.model, GeneratorConfig::default().model);
        assert!(settings.generator.api_key.is_none());
    }

    #[test]
    fn test_short_key_is_not_usable() {
        let mut settings = Settings::default();
        settings.apply_env(env_of(&[(ENV_API_KEY, "short")]));

        assert!(settings.generator.api_key.is_some());
        assert!(!settings.has_api_key());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[fact_check]\nmax_document_chars = 2000\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.fact_check.max_document_chars, 2000);

        assert!(Settings::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
