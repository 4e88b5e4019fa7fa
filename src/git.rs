use crate::error::GitError;
use async_trait::async_trait;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Version-control operations the commit workflow depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitOps: Send + Sync {
    /// Zero-context unified diff of the staged changes, trimmed
    async fn staged_diff(&self) -> Result<String, GitError>;

    /// Whether unstaged or untracked changes exist
    async fn is_dirty(&self) -> Result<bool, GitError>;

    async fn stage_all(&self) -> Result<(), GitError>;

    async fn commit(&self, message: &str) -> Result<(), GitError>;

    async fn push(&self) -> Result<(), GitError>;
}

/// Runs the `git` binary in the current working directory
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, args: &[&str]) -> std::io::Result<Output> {
        debug!(?args, "running git");
        Command::new("git").args(args).output().await
    }

    /// Run git, returning stdout on success and a readable failure otherwise
    async fn run_checked(&self, args: &[&str]) -> Result<String, String> {
        let output = self
            .run(args)
            .await
            .map_err(|e| format!("failed to execute git {}: {}", args.join(" "), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(if stderr.is_empty() {
                format!("git {} exited with {}", args.join(" "), output.status)
            } else {
                stderr
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitOps for GitCli {
    async fn staged_diff(&self) -> Result<String, GitError> {
        let diff = self
            .run_checked(&["diff", "--cached", "--unified=0"])
            .await
            .map_err(GitError::Diff)?;
        Ok(diff.trim().to_string())
    }

    async fn is_dirty(&self) -> Result<bool, GitError> {
        let status = self
            .run_checked(&["status", "--porcelain"])
            .await
            .map_err(GitError::Diff)?;
        Ok(has_unstaged_changes(&status))
    }

    async fn stage_all(&self) -> Result<(), GitError> {
        self.run_checked(&["add", "-A"])
            .await
            .map(|_| ())
            .map_err(GitError::Stage)
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        let stdout = self
            .run_checked(&["commit", "-m", message])
            .await
            .map_err(GitError::Commit)?;
        debug!(output = %stdout.trim(), "git commit finished");
        Ok(())
    }

    async fn push(&self) -> Result<(), GitError> {
        self.run_checked(&["push"])
            .await
            .map(|_| ())
            .map_err(GitError::Push)
    }
}

/// Any porcelain entry with a non-blank worktree column, untracked files included
fn has_unstaged_changes(porcelain: &str) -> bool {
    porcelain
        .lines()
        .filter(|line| line.len() >= 2)
        .any(|line| line.as_bytes()[1] != b' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_tree() {
        assert!(!has_unstaged_changes(""));
    }

    #[test]
    fn test_staged_only_is_not_dirty() {
        assert!(!has_unstaged_changes("M  src/main.rs\nA  src/git.rs\n"));
    }

    #[test]
    fn test_worktree_changes_are_dirty() {
        assert!(has_unstaged_changes(" M src/main.rs\n"));
        assert!(has_unstaged_changes("MM src/main.rs\n"));
        assert!(has_unstaged_changes("M  a.rs\n D b.rs\n"));
    }

    #[test]
    fn test_untracked_files_are_dirty() {
        assert!(has_unstaged_changes("?? notes.txt\n"));
    }
}
