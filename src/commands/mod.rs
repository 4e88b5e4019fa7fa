pub mod commit;
pub mod config;

use anyhow::Result;

pub use commit::{CommitCommand, CommitOutcome};
pub use config::ConfigCommand;

/// A subcommand: resolves its arguments against configuration, then runs
#[allow(async_fn_in_trait)]
pub trait Command {
    type Args;
    type Output;

    /// Apply configuration overrides to the parsed arguments
    fn resolve_args(&self, args: Self::Args) -> Self::Args;

    async fn execute(&mut self, args: Self::Args) -> Result<Self::Output>;
}
