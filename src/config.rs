use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Repository-specific config file name
pub const REPO_CONFIG_FILE: &str = ".ai-commit.yaml";

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_DIFF_LENGTH: usize = 6000;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub behavior: BehaviorConfig,
    pub model: ModelConfig,
    pub commit: CommitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BehaviorConfig {
    pub verbose: bool,
    pub no_confirm: bool,
}

/// Chat endpoint settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub endpoint: String,
    pub name: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            name: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: None,
        }
    }
}

impl ModelConfig {
    /// Deadline for a single completion call
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration for commit command
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CommitConfig {
    pub prompt: Option<String>,
    pub max_diff_length: usize,
    pub stage_all: bool,
    pub push: bool,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            prompt: None,
            max_diff_length: DEFAULT_MAX_DIFF_LENGTH,
            stage_all: false,
            push: false,
        }
    }
}

impl Config {
    /// Load configuration from the standard config paths
    pub fn load() -> Result<Self> {
        // Try loading in this order:
        // 1. .ai-commit.yaml in current directory (repo-specific)
        // 2. ~/.config/ai-commit/config.yaml (user-specific)
        // 3. Default configuration
        let candidates = std::iter::once(PathBuf::from(REPO_CONFIG_FILE))
            .chain(Self::user_config_path());

        let mut config = Self::default();
        for path in candidates {
            if path.exists() {
                config = Self::load_from_path(&path)?;
                break;
            }
        }

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file does not exist: {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply `AI_COMMIT_*` environment overrides
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(model) = lookup("AI_COMMIT_MODEL") {
            self.model.name = model;
        }
        if let Some(endpoint) = lookup("AI_COMMIT_ENDPOINT") {
            self.model.endpoint = endpoint;
        }
        if let Some(prompt) = lookup("AI_COMMIT_SYSTEM_PROMPT") {
            self.commit.prompt = Some(prompt);
        }

        self
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<String, ConfigError> {
        lookup(&self.model.api_key_env)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingCredential(self.model.api_key_env.clone()))
    }

    /// Get the user configuration path
    pub fn user_config_path() -> Option<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("ai-commit").join("config.yaml"))
        } else {
            // Fallback to home directory
            dirs::home_dir()
                .map(|home_dir| home_dir.join(".config").join("ai-commit").join("config.yaml"))
        }
    }

    /// Create a sample configuration file
    pub fn create_sample_config() -> Result<String> {
        let mut sample = Self::default();

        sample.behavior.verbose = true;
        sample.model.temperature = Some(0.2);
        sample.commit.prompt =
            Some("Custom commit prompt (optional - overrides built-in prompt)".to_string());

        serde_yaml::to_string(&sample).context("Failed to serialize sample configuration")
    }
}
