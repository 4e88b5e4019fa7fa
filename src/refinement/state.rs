use crate::conversation::{ConversationHistory, Message, Role};
use crate::error::{ModelError, RefinementError};
use crate::prompts::commit::PLACEHOLDER_REPLY;
use std::io;

/// A message shown to the user, not yet committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    text: String,
    placeholder: bool,
}

impl Candidate {
    /// Empty replies become the placeholder so there is always something to show
    pub fn from_reply(reply: String) -> Self {
        if reply.trim().is_empty() {
            Self {
                text: PLACEHOLDER_REPLY.to_string(),
                placeholder: true,
            }
        } else {
            Self {
                text: reply,
                placeholder: false,
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the model returned nothing usable
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[derive(Debug)]
pub enum RefinementState {
    AwaitingModel {
        history: ConversationHistory,
    },
    AwaitingUser {
        history: ConversationHistory,
        candidate: Candidate,
    },
    Accepted {
        message: String,
        history: ConversationHistory,
    },
    Failed {
        error: RefinementError,
    },
}

impl RefinementState {
    pub fn name(&self) -> &'static str {
        match self {
            RefinementState::AwaitingModel { .. } => "awaiting model",
            RefinementState::AwaitingUser { .. } => "awaiting user",
            RefinementState::Accepted { .. } => "accepted",
            RefinementState::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug)]
pub enum RefinementEvent {
    ModelReplied(String),
    ModelFailed(ModelError),
    FeedbackAccepted,
    FeedbackRejected(String),
    InputFailed(io::Error),
}

impl RefinementEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RefinementEvent::ModelReplied(_) => "model reply",
            RefinementEvent::ModelFailed(_) => "model failure",
            RefinementEvent::FeedbackAccepted => "acceptance",
            RefinementEvent::FeedbackRejected(_) => "change request",
            RefinementEvent::InputFailed(_) => "input failure",
        }
    }
}

/// Advance the session by one event.
///
/// Every reply is recorded as a candidate turn, an empty one as an empty
/// slot. Rejecting a usable candidate appends the feedback; rejecting the
/// placeholder turns its empty slot into the feedback entry, so the seeded
/// diff and earlier feedback are never touched.
/// Terminal states ignore further events.
pub fn transition(state: RefinementState, event: RefinementEvent) -> RefinementState {
    use RefinementEvent as E;
    use RefinementState as S;

    match (state, event) {
        (S::AwaitingModel { history }, E::ModelReplied(reply)) => {
            let candidate = Candidate::from_reply(reply);
            let recorded = if candidate.is_placeholder() {
                ""
            } else {
                candidate.text()
            };
            let history = history.appended(Message::new(Role::CandidateReply, recorded));
            S::AwaitingUser { history, candidate }
        }
        (S::AwaitingUser { history, candidate }, E::FeedbackAccepted) => S::Accepted {
            message: candidate.into_text(),
            history,
        },
        (S::AwaitingUser { history, candidate }, E::FeedbackRejected(feedback)) => {
            let feedback = Message::new(Role::Feedback, feedback);
            let history = if candidate.is_placeholder() {
                history.with_last_replaced(feedback)
            } else {
                history.appended(feedback)
            };
            S::AwaitingModel { history }
        }
        (S::AwaitingModel { .. } | S::AwaitingUser { .. }, E::ModelFailed(error)) => S::Failed {
            error: error.into(),
        },
        (S::AwaitingUser { .. }, E::InputFailed(error)) => S::Failed {
            error: error.into(),
        },
        (terminal @ (S::Accepted { .. } | S::Failed { .. }), _) => terminal,
        (state, event) => S::Failed {
            error: RefinementError::InvalidTransition {
                state: state.name(),
                event: event.name(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn awaiting_model() -> RefinementState {
        RefinementState::AwaitingModel {
            history: ConversationHistory::seeded("instruction", "+diff"),
        }
    }

    fn history_of(state: &RefinementState) -> &ConversationHistory {
        match state {
            RefinementState::AwaitingModel { history }
            | RefinementState::AwaitingUser { history, .. }
            | RefinementState::Accepted { history, .. } => history,
            RefinementState::Failed { .. } => panic!("failed state has no history"),
        }
    }

    #[test]
    fn test_reply_becomes_candidate_turn() {
        let state = transition(
            awaiting_model(),
            RefinementEvent::ModelReplied("feat: add parser".to_string()),
        );

        match &state {
            RefinementState::AwaitingUser { history, candidate } => {
                assert_eq!(candidate.text(), "feat: add parser");
                assert!(!candidate.is_placeholder());
                assert_eq!(history.len(), 3);
                assert_eq!(history.last().unwrap().role, Role::CandidateReply);
            }
            other => panic!("unexpected state: {}", other.name()),
        }
    }

    #[test]
    fn test_empty_reply_shows_placeholder_and_records_empty_slot() {
        let state = transition(awaiting_model(), RefinementEvent::ModelReplied(String::new()));

        match &state {
            RefinementState::AwaitingUser { history, candidate } => {
                assert!(candidate.is_placeholder());
                assert_eq!(candidate.text(), PLACEHOLDER_REPLY);
                assert_eq!(history.len(), 3);
                assert_eq!(history.last(), Some(&Message::new(Role::CandidateReply, "")));
            }
            other => panic!("unexpected state: {}", other.name()),
        }
    }

    #[test]
    fn test_rejection_appends_feedback() {
        let state = transition(
            awaiting_model(),
            RefinementEvent::ModelReplied("feat: add parser".to_string()),
        );
        let state = transition(
            state,
            RefinementEvent::FeedbackRejected("mention the lexer".to_string()),
        );

        assert!(matches!(state, RefinementState::AwaitingModel { .. }));
        let history = history_of(&state);
        assert_eq!(history.len(), 4);
        let last = history.last().unwrap();
        assert_eq!(last.role, Role::Feedback);
        assert_eq!(last.content, "mention the lexer");
    }

    #[test]
    fn test_rejecting_placeholder_fills_empty_slot_and_keeps_diff() {
        let state = transition(awaiting_model(), RefinementEvent::ModelReplied("  ".to_string()));
        let before = history_of(&state).len();
        let state = transition(
            state,
            RefinementEvent::FeedbackRejected("just say fix typo".to_string()),
        );

        let history = history_of(&state);
        assert_eq!(history.len(), before);
        assert_eq!(history.messages()[1], Message::new(Role::DiffContext, "+diff"));
        assert_eq!(
            history.last(),
            Some(&Message::new(Role::Feedback, "just say fix typo"))
        );
        assert!(history.messages().iter().all(|m| !m.content.is_empty()));
    }

    #[test]
    fn test_rejecting_placeholder_keeps_earlier_feedback() {
        let state = transition(awaiting_model(), RefinementEvent::ModelReplied("a".to_string()));
        let state = transition(state, RefinementEvent::FeedbackRejected("why".to_string()));
        let state = transition(state, RefinementEvent::ModelReplied(String::new()));
        let state = transition(state, RefinementEvent::FeedbackRejected("retry".to_string()));

        let history = history_of(&state);
        assert_eq!(history.len(), 5);
        assert_eq!(history.messages()[3], Message::new(Role::Feedback, "why"));
        assert_eq!(history.messages()[4], Message::new(Role::Feedback, "retry"));
    }

    #[test]
    fn test_acceptance_uses_current_candidate() {
        let state = transition(
            awaiting_model(),
            RefinementEvent::ModelReplied("fix: typo".to_string()),
        );
        let state = transition(state, RefinementEvent::FeedbackAccepted);

        match state {
            RefinementState::Accepted { message, history } => {
                assert_eq!(message, "fix: typo");
                assert_eq!(history.len(), 3);
            }
            other => panic!("unexpected state: {}", other.name()),
        }
    }

    #[test]
    fn test_accepting_placeholder_keeps_placeholder_text() {
        let state = transition(awaiting_model(), RefinementEvent::ModelReplied(String::new()));
        let state = transition(state, RefinementEvent::FeedbackAccepted);

        match state {
            RefinementState::Accepted { message, .. } => assert_eq!(message, PLACEHOLDER_REPLY),
            other => panic!("unexpected state: {}", other.name()),
        }
    }

    #[test]
    fn test_model_failure_is_terminal() {
        let state = transition(
            awaiting_model(),
            RefinementEvent::ModelFailed(ModelError::Timeout(Duration::from_secs(10))),
        );
        assert!(matches!(
            state,
            RefinementState::Failed {
                error: RefinementError::Model(ModelError::Timeout(_))
            }
        ));

        let state = transition(state, RefinementEvent::ModelReplied("late".to_string()));
        assert!(matches!(state, RefinementState::Failed { .. }));
    }

    #[test]
    fn test_input_failure_while_awaiting_user() {
        let state = transition(awaiting_model(), RefinementEvent::ModelReplied("x".to_string()));
        let state = transition(
            state,
            RefinementEvent::InputFailed(io::Error::from(io::ErrorKind::UnexpectedEof)),
        );
        assert!(matches!(
            state,
            RefinementState::Failed {
                error: RefinementError::Input(_)
            }
        ));
    }

    #[test]
    fn test_out_of_order_event_fails() {
        let state = transition(awaiting_model(), RefinementEvent::FeedbackAccepted);
        match state {
            RefinementState::Failed {
                error: RefinementError::InvalidTransition { state, event },
            } => {
                assert_eq!(state, "awaiting model");
                assert_eq!(event, "acceptance");
            }
            other => panic!("unexpected state: {}", other.name()),
        }
    }

    #[test]
    fn test_accepted_ignores_further_events() {
        let state = RefinementState::Accepted {
            message: "done".to_string(),
            history: ConversationHistory::default(),
        };
        let state = transition(state, RefinementEvent::FeedbackRejected("more".to_string()));
        assert!(matches!(state, RefinementState::Accepted { ref message, .. } if message == "done"));
    }
}
