pub mod openai;

pub use openai::OpenAiChatClient;

use crate::conversation::Message;
use crate::error::ModelError;
use async_trait::async_trait;
use std::time::Duration;

/// Replies accepted without asking the model
const AGREE_REPLIES: &[&str] = &[
    "y",
    "yes",
    "yep",
    "yeah",
    "ok",
    "okay",
    "sure",
    "fine",
    "good",
    "great",
    "perfect",
    "lgtm",
    "agree",
    "accept",
    "approved",
    "commit",
    "commit it",
    "ship it",
    "go ahead",
    "do it",
    "looks good",
    "looks fine",
    "looks great",
    "sounds good",
];

/// Replies rejected without asking the model
const DISAGREE_REPLIES: &[&str] = &["n", "no", "nope", "nah", "not yet", "try again", "again"];

/// Chat completion endpoint as seen by the refinement loop
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send the whole history and return the top reply, which may be empty
    async fn complete(&self, history: &[Message], deadline: Duration)
        -> Result<String, ModelError>;

    /// Whether a short free-text reply accepts the last candidate.
    /// Anything ambiguous resolves to `false`.
    async fn classify_agreement(&self, feedback: &str) -> bool;
}

/// Resolve obvious replies from a fixed vocabulary.
/// Returns `None` when the reply needs a closer look.
pub fn classify_locally(feedback: &str) -> Option<bool> {
    let normalized = normalize(feedback);

    if AGREE_REPLIES.contains(&normalized.as_str()) {
        Some(true)
    } else if DISAGREE_REPLIES.contains(&normalized.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Read the model's answer to the yes/no agreement question
pub fn parse_agreement(reply: &str) -> bool {
    reply
        .split_whitespace()
        .next()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .is_some_and(|word| word.eq_ignore_ascii_case("yes"))
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | ',' | ';'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
