use crate::error::SendError;
use crate::model::ChatId;
use async_trait::async_trait;

/// Inline button attached to an outbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    /// Opaque action code delivered back as a button-press event.
    Callback(String),
    /// External link opened by the client.
    Url(String),
}

impl Button {
    pub fn callback(label: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(code.into()),
        }
    }

    pub fn url(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(link.into()),
        }
    }
}

/// Platform-neutral outbound message: text plus keyboard rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub keyboard: Vec<Vec<Button>>,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Vec::new(),
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Vec<Vec<Button>>) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }
}

/// Delivery seam towards the messaging platform.
///
/// The core decides what to say; implementations own the encoding. Tests
/// substitute a recording fake.
#[async_trait]
pub trait Outbound: Send + Sync {
    async fn send(&self, chat: ChatId, message: OutgoingMessage) -> Result<(), SendError>;

    async fn edit_text(&self, chat: ChatId, message_id: i64, text: &str) -> Result<(), SendError>;
}
