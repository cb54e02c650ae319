use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Greeting seeded into every fresh conversation. Explains the multi-agent
/// workflow and the input it wants.
pub const WELCOME_MESSAGE: &str = "Hey! I'm Nolan's AI travel squad\u{2014}three agents researching your perfect trip in parallel. Tell me: **where** you want to go, **when**, **how many travelers**, and whether you're chasing **luxury, deals, or best value**. The more context (occasion, vibe, must-dos), the better I can tailor it!";

/// Delimiter between itinerary chunks in the shareable blob.
pub const SHARE_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_welcome: bool,
    pub is_error: bool,
}

impl Message {
    fn new(role: Role, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            timestamp: Utc::now(),
            is_welcome: false,
            is_error: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into())
    }

    /// Locally synthesized message for a failed dispatch.
    pub fn error(content: impl Into<String>) -> Self {
        let mut message = Self::new(Role::Assistant, content.into());
        message.is_error = true;
        message
    }

    pub fn welcome() -> Self {
        let mut message = Self::new(Role::Assistant, WELCOME_MESSAGE.to_string());
        message.is_welcome = true;
        message
    }

    /// True for the replies worth sharing: assistant output that is neither
    /// the greeting nor a local error.
    pub fn is_shareable(&self) -> bool {
        self.role == Role::Assistant && !self.is_welcome && !self.is_error
    }
}

/// Ordered, append-only transcript. Insertion order is authoritative; the
/// only mutation besides `append` is a full reset back to a fresh greeting.
#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::welcome()],
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Discard everything and reseed with a new welcome message (new id,
    /// current timestamp).
    pub fn reset(&mut self) {
        self.messages = vec![Message::welcome()];
    }

    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Only the greeting is present, i.e. the quick-picks state.
    pub fn is_fresh(&self) -> bool {
        self.messages.len() == 1 && self.messages[0].is_welcome
    }

    pub fn has_itinerary(&self) -> bool {
        self.messages.iter().any(Message::is_shareable)
    }

    /// Shareable text blob: all non-welcome, non-error assistant messages
    /// joined with the separator.
    pub fn share_text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.is_shareable())
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(SHARE_SEPARATOR)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
