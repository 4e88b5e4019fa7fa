/// Who a history entry speaks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Fixed task description seeded first
    Instruction,
    /// The staged diff
    DiffContext,
    /// Operator commentary on a rejected candidate
    Feedback,
    /// A message the model proposed
    CandidateReply,
}

impl Role {
    /// Role label understood by chat completion endpoints
    pub fn wire_name(self) -> &'static str {
        match self {
            Role::Instruction => "system",
            Role::DiffContext => "user",
            Role::Feedback => "system",
            Role::CandidateReply => "assistant",
        }
    }
}

/// One conversational turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ordered record of the turns replayed to the model on every call.
///
/// Updates consume the history and hand back the next value, so each
/// refinement step produces a new snapshot instead of editing a shared list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    /// Start a session from the instruction and the staged diff
    pub fn seeded(instruction: impl Into<String>, diff: impl Into<String>) -> Self {
        Self {
            messages: vec![
                Message::new(Role::Instruction, instruction),
                Message::new(Role::DiffContext, diff),
            ],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn appended(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Swap the newest entry for `message`. An empty history gains it instead.
    pub fn with_last_replaced(mut self, message: Message) -> Self {
        match self.messages.last_mut() {
            Some(last) => *last = message,
            None => self.messages.push(message),
        }
        self
    }
}
