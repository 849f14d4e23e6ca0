//! Minimal Telegram Bot API adapter: long-polling intake, reply delivery,
//! and conversion of raw updates into router events.

use crate::error::SendError;
use crate::model::ChatId;
use crate::outbound::{Button, ButtonAction, Outbound, OutgoingMessage};
use crate::roster::RosterHandle;
use crate::router::{self, Event, Outgoing};
use crate::session::SessionStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

const POLL_TIMEOUT_SECS: u64 = 30;
const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Serialize)]
struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Serialize)]
struct InlineKeyboardButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl From<&Button> for InlineKeyboardButton {
    fn from(button: &Button) -> Self {
        let (callback_data, url) = match &button.action {
            ButtonAction::Callback(code) => (Some(code.clone()), None),
            ButtonAction::Url(link) => (None, Some(link.clone())),
        };
        Self {
            text: button.label.clone(),
            callback_data,
            url,
        }
    }
}

fn markup(keyboard: &[Vec<Button>]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: keyboard
            .iter()
            .map(|row| row.iter().map(InlineKeyboardButton::from).collect())
            .collect(),
    }
}

/// Bot API client over HTTPS.
pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Result<Self, SendError> {
        // The client timeout must outlive the long-poll hold time.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()?;
        Ok(Self {
            http,
            base: format!("https://api.telegram.org/bot{token}"),
        })
    }

    async fn call(&self, method: &str, payload: serde_json::Value) -> Result<serde_json::Value, SendError> {
        let response = self
            .http
            .post(format!("{}/{method}", self.base))
            .json(&payload)
            .send()
            .await?;
        let body: ApiResponse<serde_json::Value> = response.json().await?;
        if body.ok {
            Ok(body.result.unwrap_or(serde_json::Value::Null))
        } else {
            Err(SendError::Api(
                body.description
                    .unwrap_or_else(|| format!("{method} failed with no description")),
            ))
        }
    }

    /// Long-polls for the next batch of updates.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, SendError> {
        let result = self
            .call(
                "getUpdates",
                json!({
                    "offset": offset,
                    "timeout": POLL_TIMEOUT_SECS,
                    "allowed_updates": ["message", "callback_query"],
                }),
            )
            .await?;
        Ok(serde_json::from_value(result)?)
    }
}

#[async_trait]
impl Outbound for TelegramClient {
    async fn send(&self, chat: ChatId, message: OutgoingMessage) -> Result<(), SendError> {
        let mut payload = json!({
            "chat_id": chat.as_i64(),
            "text": message.text,
        });
        if !message.keyboard.is_empty() {
            payload["reply_markup"] = serde_json::to_value(markup(&message.keyboard))?;
        }
        self.call("sendMessage", payload).await.map(|_| ())
    }

    async fn edit_text(&self, chat: ChatId, message_id: i64, text: &str) -> Result<(), SendError> {
        let payload = json!({
            "chat_id": chat.as_i64(),
            "message_id": message_id,
            "text": text,
        });
        self.call("editMessageText", payload).await.map(|_| ())
    }
}

/// Maps one raw update onto a router event. Updates the bot does not handle
/// (media, other commands, stale callbacks) map to `None`.
pub fn event_from_update(update: &Update) -> Option<Event> {
    if let Some(message) = &update.message {
        let chat = ChatId(message.chat.id);
        let text = message.text.as_deref()?.trim();
        if let Some(command) = text.strip_prefix('/') {
            if command == "start" || command.starts_with("start ") || command.starts_with("start@")
            {
                return Some(Event::Start { chat });
            }
            return None;
        }
        return Some(Event::Text {
            chat,
            text: text.to_owned(),
        });
    }
    if let Some(query) = &update.callback_query {
        let message = query.message.as_ref()?;
        let code = query.data.clone()?;
        return Some(Event::Action {
            chat: ChatId(message.chat.id),
            message_id: message.message_id,
            code,
        });
    }
    None
}

async fn deliver(client: &TelegramClient, outgoing: Outgoing) -> (ChatId, Result<(), SendError>) {
    match outgoing {
        Outgoing::Send { chat, message } => (chat, client.send(chat, message).await),
        Outgoing::Edit {
            chat,
            message_id,
            text,
        } => (chat, client.edit_text(chat, message_id, &text).await),
    }
}

/// Intake loop: polls, routes, delivers.
///
/// Transient transport failures restart the poll after a short delay; a
/// non-transient API failure (for one, a rejected token) stops the loop and
/// is returned to the caller. Delivery failures stay scoped to their chat.
pub async fn run_polling(
    client: &TelegramClient,
    sessions: &SessionStore,
    roster: &RosterHandle,
    cancel: &CancellationToken,
) -> Result<(), SendError> {
    let mut offset = 0i64;
    loop {
        let updates = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            batch = client.get_updates(offset) => match batch {
                Ok(updates) => updates,
                Err(err) if err.is_transient() => {
                    warn!(error = %err, "polling failed, restarting");
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
                Err(err) => {
                    error!(error = %err, "polling stopped on a non-transient error");
                    return Err(err);
                }
            },
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some(event) = event_from_update(&update) else {
                continue;
            };
            for outgoing in router::handle_event(sessions, roster, event) {
                let (chat, result) = deliver(client, outgoing).await;
                if let Err(err) = result {
                    warn!(%chat, error = %err, "failed to deliver reply");
                }
            }
        }
    }
}
