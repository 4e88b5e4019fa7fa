use crate::cli::args::ConfigArgs;
use crate::commands::Command;
use crate::config::{Config, REPO_CONFIG_FILE};
use anyhow::Result;
use std::path::PathBuf;

/// Config command implementation
pub struct ConfigCommand<'a> {
    config: &'a Config,
}

impl<'a> ConfigCommand<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl Command for ConfigCommand<'_> {
    type Args = ConfigArgs;
    type Output = String;

    fn resolve_args(&self, args: ConfigArgs) -> ConfigArgs {
        // No overrides for config command
        args
    }

    async fn execute(&mut self, args: ConfigArgs) -> Result<String> {
        if args.init {
            return self.sample();
        }
        if args.show {
            return Ok(self.status(|key| std::env::var(key).ok()));
        }
        Ok(usage())
    }
}

impl ConfigCommand<'_> {
    fn sample(&self) -> Result<String> {
        let sample_config = Config::create_sample_config()?;
        Ok(format!(
            "# Sample ai-commit configuration\n\
             # Copy this to ~/.config/ai-commit/config.yaml or {}\n\n{}",
            REPO_CONFIG_FILE, sample_config
        ))
    }

    fn status(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        let mut lines = vec!["🔍 ai-commit configuration status:".to_string(), String::new()];

        // Check for repo-specific config
        if PathBuf::from(REPO_CONFIG_FILE).exists() {
            lines.push(format!("✅ Repository config: {}", REPO_CONFIG_FILE));
        } else {
            lines.push(format!("❌ Repository config: {} (not found)", REPO_CONFIG_FILE));
        }

        // Check for user config
        match Config::user_config_path() {
            Some(path) if path.exists() => {
                lines.push(format!("✅ User config: {}", path.display()));
            }
            Some(path) => {
                lines.push(format!("❌ User config: {} (not found)", path.display()));
                if let Some(parent) = path.parent() {
                    if !parent.exists() {
                        lines.push(format!("   💡 Create directory: mkdir -p {}", parent.display()));
                    }
                }
            }
            None => lines.push("❌ User config: Unable to determine config directory".to_string()),
        }

        let model = &self.config.model;
        lines.push(String::new());
        lines.push(format!("🤖 Model: {} via {}", model.name, model.endpoint));
        if self.config.api_key(lookup).is_ok() {
            lines.push(format!("✅ API key: {} is set", model.api_key_env));
        } else {
            lines.push(format!("❌ API key: {} is not set", model.api_key_env));
        }

        lines.push(String::new());
        lines.push(
            "💡 To create a sample config: ai-commit config --init > ~/.config/ai-commit/config.yaml"
                .to_string(),
        );

        lines.join("\n")
    }
}

fn usage() -> String {
    [
        "ai-commit config management",
        "",
        "Options:",
        "  --show  Show current configuration status",
        "  --init  Generate sample configuration",
        "",
        "Examples:",
        "  ai-commit config --show",
        "  ai-commit config --init > ~/.config/ai-commit/config.yaml",
        "  ai-commit config --init > .ai-commit.yaml  # Repository-specific config",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_prints_sample() {
        let config = Config::default();
        let output = ConfigCommand::new(&config)
            .execute(ConfigArgs {
                show: false,
                init: true,
            })
            .await
            .unwrap();

        assert!(output.starts_with("# Sample ai-commit configuration"));
        assert!(output.contains("model:"));
    }

    #[tokio::test]
    async fn test_no_flags_prints_usage() {
        let config = Config::default();
        let output = ConfigCommand::new(&config)
            .execute(ConfigArgs::default())
            .await
            .unwrap();

        assert!(output.contains("--show"));
        assert!(output.contains("--init"));
    }

    #[test]
    fn test_status_reports_credential() {
        let config = Config::default();
        let command = ConfigCommand::new(&config);

        let missing = command.status(|_| None);
        assert!(missing.contains("❌ API key: OPENAI_API_KEY is not set"));
        assert!(missing.contains("gpt-4o-mini"));

        let present = command.status(|_| Some("sk-1".to_string()));
        assert!(present.contains("✅ API key: OPENAI_API_KEY is set"));
    }
}
