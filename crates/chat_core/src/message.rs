use std::fmt;

/// Placeholder shown while a chat request is outstanding.
pub const TYPING_PLACEHOLDER: &str = "Assistant is typing...";
/// Shown when the chat endpoint fails for any reason.
pub const CHAT_ERROR_TEXT: &str = "Oops! Something went wrong. Please try again.";
/// Shown when the route endpoint fails for any reason.
pub const ROUTE_ERROR_TEXT: &str = "Could not fetch route. Try again.";
/// Label of the link message produced by a route lookup.
pub const ROUTE_LINK_LABEL: &str = "👉 Click here to view the route on Google Maps";
/// Welcome message appended when the widget starts.
pub const DEFAULT_GREETING: &str =
    "Hello! How can I assist you with information about Sri Vasavi Engineering College?";

/// Status line shown while a route lookup is outstanding.
pub fn route_status_text(origin: &str, destination: &str) -> String {
    format!("Finding best route from {origin} to {destination}...")
}

/// Handle of a message in the log, assigned when it is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    /// Style class the host attaches to a message from this sender.
    pub fn style_class(self) -> &'static str {
        match self {
            Sender::User => "user-message",
            Sender::Ai => "ai-message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(String),
    /// Anchor that opens `href` in a new browsing context.
    Link { href: String, label: String },
}

/// A rendered log entry. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub body: MessageBody,
}

impl Message {
    /// Visible text: the body text, or the label for links.
    pub fn text(&self) -> &str {
        match &self.body {
            MessageBody::Text(text) => text,
            MessageBody::Link { label, .. } => label,
        }
    }

    pub fn link_target(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text(_) => None,
            MessageBody::Link { href, .. } => Some(href),
        }
    }
}
