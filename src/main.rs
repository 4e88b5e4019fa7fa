mod chat;
mod cli;
mod commands;
mod config;
mod conversation;
mod error;
mod git;
mod prompts;
mod refinement;
mod terminal;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ai-commit")]
#[command(about = "Generate and refine commit messages for staged changes with a chat model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a commit message for the staged changes and refine it interactively
    Commit {
        /// Custom message to guide the AI
        #[arg(short, long)]
        message: Option<String>,

        /// Commit the first generated message without asking
        #[arg(long)]
        no_confirm: bool,

        /// Print the conversation that would be sent without calling the model
        #[arg(long)]
        dry_run: bool,

        /// Stage all changes when nothing is staged yet
        #[arg(short = 'a', long)]
        stage_all: bool,

        /// Push after a successful commit
        #[arg(long)]
        push: bool,

        /// Model to use instead of the configured one
        #[arg(long)]
        model: Option<String>,

        /// Show verbose output for debugging
        #[arg(short, long)]
        verbose: bool,
    },
    /// Generate sample configuration file
    Config {
        /// Show current configuration path and status
        #[arg(long)]
        show: bool,

        /// Generate sample configuration
        #[arg(long)]
        init: bool,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// `ai-commit` on its own behaves like `ai-commit commit`
    fn default_commit() -> Self {
        Commands::Commit {
            message: None,
            no_confirm: false,
            dry_run: false,
            stage_all: false,
            push: false,
            model: None,
            verbose: false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(Commands::default_commit);

    // Completions don't need config loading
    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "ai-commit", &mut std::io::stdout());
        return Ok(());
    }

    let config = config::Config::load()?;

    init_tracing(verbose_requested(&command, &config));

    cli::CommandDispatcher::new(config).dispatch(command).await
}

/// `--verbose` on the command line or `behavior.verbose` in config
fn verbose_requested(command: &Commands, config: &config::Config) -> bool {
    let flag = matches!(command, Commands::Commit { verbose: true, .. });
    flag || config.behavior.verbose
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "ai_commit=debug"
    } else {
        "ai_commit=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
