use crate::app::runtime::SessionStats;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Ai,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
        }
    }
}

/// Append-only message list for the current session.
#[derive(Default)]
pub struct Conversation {
    messages: Vec<Message>,
    version: u64,
    stats: Option<SessionStats>,
    requires_clarification: bool,
}

impl Conversation {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Bumped on every change so the view can cache rendered lines.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.version += 1;
    }

    pub fn stats(&self) -> Option<&SessionStats> {
        self.stats.as_ref()
    }

    pub fn requires_clarification(&self) -> bool {
        self.requires_clarification
    }

    pub fn record_response_meta(&mut self, stats: Option<SessionStats>, requires_clarification: bool) {
        if stats.is_some() {
            self.stats = stats;
        }
        self.requires_clarification = requires_clarification;
    }

    /// Most recent assistant reply that is not an error line.
    pub fn latest_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == Role::Ai && !message.content.starts_with("Error"))
            .map(|message| message.content.as_str())
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.stats = None;
        self.requires_clarification = false;
        self.version += 1;
    }
}
