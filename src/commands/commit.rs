use crate::chat::ChatClient;
use crate::cli::args::CommitArgs;
use crate::commands::Command;
use crate::config::Config;
use crate::conversation::ConversationHistory;
use crate::git::GitOps;
use crate::prompts::commit::truncate_diff;
use crate::prompts::commit_instruction;
use crate::refinement::RefinementLoop;
use crate::terminal::{CandidateRenderer, FeedbackReader};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// What a commit run ended with
#[derive(Debug)]
pub enum CommitOutcome {
    /// Nothing staged and the working tree is clean
    NothingToCommit,
    /// Nothing staged but unstaged changes exist
    NothingStaged,
    /// The session that would have been sent
    DryRun { history: ConversationHistory },
    Committed {
        message: String,
        rounds: usize,
        pushed: bool,
    },
}

enum StagedChanges {
    Diff(String),
    Clean,
    Unstaged,
}

/// Generates, refines and commits a message for the staged changes
pub struct CommitCommand<'a> {
    config: &'a Config,
    git: &'a dyn GitOps,
    chat: &'a dyn ChatClient,
    reader: &'a mut dyn FeedbackReader,
    renderer: &'a mut dyn CandidateRenderer,
}

impl<'a> CommitCommand<'a> {
    pub fn new(
        config: &'a Config,
        git: &'a dyn GitOps,
        chat: &'a dyn ChatClient,
        reader: &'a mut dyn FeedbackReader,
        renderer: &'a mut dyn CandidateRenderer,
    ) -> Self {
        Self {
            config,
            git,
            chat,
            reader,
            renderer,
        }
    }

    async fn staged_changes(&self, stage_all: bool) -> Result<StagedChanges> {
        let diff = self.git.staged_diff().await?;
        if !diff.is_empty() {
            return Ok(StagedChanges::Diff(diff));
        }

        if !self.git.is_dirty().await? {
            return Ok(StagedChanges::Clean);
        }
        if !stage_all {
            return Ok(StagedChanges::Unstaged);
        }

        info!("nothing staged, staging all changes");
        self.git.stage_all().await?;
        let diff = self.git.staged_diff().await?;
        Ok(if diff.is_empty() {
            StagedChanges::Clean
        } else {
            StagedChanges::Diff(diff)
        })
    }
}

impl Command for CommitCommand<'_> {
    type Args = CommitArgs;
    type Output = CommitOutcome;

    fn resolve_args(&self, mut args: CommitArgs) -> CommitArgs {
        args.no_confirm |= self.config.behavior.no_confirm;
        args.stage_all |= self.config.commit.stage_all;
        args.push |= self.config.commit.push;
        args
    }

    async fn execute(&mut self, args: CommitArgs) -> Result<CommitOutcome> {
        let diff = match self.staged_changes(args.stage_all).await? {
            StagedChanges::Diff(diff) => diff,
            StagedChanges::Clean => return Ok(CommitOutcome::NothingToCommit),
            StagedChanges::Unstaged => return Ok(CommitOutcome::NothingStaged),
        };
        debug!(bytes = diff.len(), "read staged diff");

        let instruction = commit_instruction(
            self.config.commit.prompt.as_deref(),
            args.common.message.as_deref(),
        );
        let history = ConversationHistory::seeded(
            instruction,
            truncate_diff(&diff, self.config.commit.max_diff_length),
        );

        if args.common.dry_run {
            return Ok(CommitOutcome::DryRun { history });
        }

        let refinement = RefinementLoop::new(self.chat, &mut *self.reader, &mut *self.renderer)
            .with_deadline(self.config.model.timeout())
            .auto_accept(args.no_confirm)
            .run(history)
            .await?;
        debug!(
            rounds = refinement.rounds,
            messages = refinement.history.len(),
            "committing accepted message"
        );

        self.git
            .commit(&refinement.message)
            .await
            .context("Commit was not created")?;

        if args.push {
            self.git
                .push()
                .await
                .context("Commit was created but could not be pushed")?;
        }

        Ok(CommitOutcome::Committed {
            message: refinement.message,
            rounds: refinement.rounds,
            pushed: args.push,
        })
    }
}
