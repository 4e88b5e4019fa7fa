pub mod state;

pub use state::{transition, RefinementEvent, RefinementState};

use crate::chat::ChatClient;
use crate::conversation::ConversationHistory;
use crate::error::RefinementError;
use crate::terminal::{CandidateRenderer, FeedbackReader};
use std::time::Duration;
use tracing::{debug, info};

/// Deadline for each completion call
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// Result of an accepted session
#[derive(Debug)]
pub struct Refinement {
    pub message: String,
    pub history: ConversationHistory,
    pub rounds: usize,
}

/// Drives candidate generation and user feedback until a message is accepted
pub struct RefinementLoop<'a> {
    chat: &'a dyn ChatClient,
    reader: &'a mut dyn FeedbackReader,
    renderer: &'a mut dyn CandidateRenderer,
    deadline: Duration,
    auto_accept: bool,
}

impl<'a> RefinementLoop<'a> {
    pub fn new(
        chat: &'a dyn ChatClient,
        reader: &'a mut dyn FeedbackReader,
        renderer: &'a mut dyn CandidateRenderer,
    ) -> Self {
        Self {
            chat,
            reader,
            renderer,
            deadline: DEFAULT_DEADLINE,
            auto_accept: false,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Accept the first candidate without asking
    pub fn auto_accept(mut self, auto_accept: bool) -> Self {
        self.auto_accept = auto_accept;
        self
    }

    /// Run rounds until the user accepts a candidate or something fails
    pub async fn run(
        &mut self,
        history: ConversationHistory,
    ) -> Result<Refinement, RefinementError> {
        let mut state = RefinementState::AwaitingModel { history };
        let mut rounds = 0;

        loop {
            let event = match &state {
                RefinementState::AwaitingModel { history } => {
                    rounds += 1;
                    debug!(round = rounds, messages = history.len(), "requesting candidate");
                    match self.chat.complete(history.messages(), self.deadline).await {
                        Ok(reply) => RefinementEvent::ModelReplied(reply),
                        Err(e) => RefinementEvent::ModelFailed(e),
                    }
                }
                RefinementState::AwaitingUser { candidate, .. } => {
                    self.renderer.render(candidate.text());
                    if self.auto_accept {
                        RefinementEvent::FeedbackAccepted
                    } else {
                        self.collect_feedback().await
                    }
                }
                RefinementState::Accepted { .. } | RefinementState::Failed { .. } => break,
            };

            let from = state.name();
            state = transition(state, event);
            debug!(from, to = state.name(), "refinement transition");
        }

        match state {
            RefinementState::Accepted { message, history } => {
                info!(rounds, "commit message accepted");
                Ok(Refinement {
                    message,
                    history,
                    rounds,
                })
            }
            RefinementState::Failed { error } => Err(error),
            other => Err(RefinementError::InvalidTransition {
                state: other.name(),
                event: "loop exit",
            }),
        }
    }

    async fn collect_feedback(&mut self) -> RefinementEvent {
        let feedback = match self.reader.read_line() {
            Ok(feedback) => feedback,
            Err(e) => return RefinementEvent::InputFailed(e),
        };

        if self.chat.classify_agreement(&feedback).await {
            RefinementEvent::FeedbackAccepted
        } else {
            RefinementEvent::FeedbackRejected(feedback)
        }
    }
}
