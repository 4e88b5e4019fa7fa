use std::io;
use std::time::Duration;
use thiserror::Error;

/// Configuration problems detected at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingCredential(String),
}

/// Failures reported by the version-control collaborator
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to get diff: {0}")]
    Diff(String),

    #[error("failed to stage changes: {0}")]
    Stage(String),

    #[error("failed to commit: {0}")]
    Commit(String),

    #[error("failed to push: {0}")]
    Push(String),
}

/// Failures of a single chat completion call
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("credentials rejected: {0}")]
    Auth(String),
}

/// Terminal failures of a refinement session
#[derive(Debug, Error)]
pub enum RefinementError {
    #[error("failed to generate commit message")]
    Model(#[from] ModelError),

    #[error("failed to read user input")]
    Input(#[from] io::Error),

    #[error("unexpected {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_timeout_message_mentions_deadline() {
        let err = ModelError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "request timed out after 10s");
    }

    #[test]
    fn test_refinement_error_keeps_source() {
        let err = RefinementError::from(ModelError::Auth("401".to_string()));
        assert_eq!(err.to_string(), "failed to generate commit message");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "credentials rejected: 401");
    }
}
