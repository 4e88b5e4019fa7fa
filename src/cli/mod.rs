pub mod args;

use crate::chat::OpenAiChatClient;
use crate::commands::{Command, CommitCommand, CommitOutcome, ConfigCommand};
use crate::config::Config;
use crate::git::GitCli;
use crate::terminal::{BoxRenderer, PromptReader};
use crate::Commands;
use anyhow::{Context, Result};
use tracing::info;
use args::{CommitArgs, ConfigArgs};

/// Command dispatcher that routes CLI commands to their implementations
pub struct CommandDispatcher {
    config: Config,
}

impl CommandDispatcher {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn dispatch(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Commit {
                message,
                no_confirm,
                dry_run,
                stage_all,
                push,
                model,
                ..
            } => {
                let args = CommitArgs {
                    common: args::CommonArgs { dry_run, message },
                    no_confirm,
                    stage_all,
                    push,
                    model,
                };
                self.commit(args).await
            }
            Commands::Config { show, init } => {
                let mut cmd = ConfigCommand::new(&self.config);
                let args = cmd.resolve_args(ConfigArgs { show, init });
                println!("{}", cmd.execute(args).await?);
                Ok(())
            }
            Commands::Completions { .. } => {
                anyhow::bail!("Completions should be handled in main")
            }
        }
    }

    async fn commit(&self, args: CommitArgs) -> Result<()> {
        // The credential is checked before touching git or the network
        let api_key = self.config.api_key(|key| std::env::var(key).ok())?;

        let mut model = self.config.model.clone();
        if let Some(name) = &args.model {
            model.name = name.clone();
        }
        let chat =
            OpenAiChatClient::new(&model, api_key).context("Failed to set up the chat client")?;

        let git = GitCli::new();
        let mut reader = PromptReader::stdin();
        let mut renderer = BoxRenderer::stdout();

        let mut cmd = CommitCommand::new(&self.config, &git, &chat, &mut reader, &mut renderer);
        let args = cmd.resolve_args(args);
        let outcome = cmd.execute(args).await?;

        report(&outcome, chat.total_tokens());
        Ok(())
    }
}

fn report(outcome: &CommitOutcome, total_tokens: u64) {
    match outcome {
        CommitOutcome::NothingToCommit => println!("Nothing to commit"),
        CommitOutcome::NothingStaged => println!(
            "The repo is dirty but nothing was staged. Please stage your changes and try again"
        ),
        CommitOutcome::DryRun { history } => {
            println!("🔍 Dry run mode - would send:");
            for message in history.messages() {
                println!("--- {} ---", message.role.wire_name());
                println!("{}", message.content);
            }
            println!("---");
        }
        CommitOutcome::Committed {
            message,
            rounds,
            pushed,
        } => {
            info!(%message, "created commit");
            println!("✅ Commit successfully");
            println!("📊 Rounds: {}, total tokens used: {}", rounds, total_tokens);
            if *pushed {
                println!("🚀 Changes pushed to remote");
            }
        }
    }
}
