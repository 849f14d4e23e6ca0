use crate::model::{ChatId, Lang};
use crate::outbound::OutgoingMessage;
use crate::reply;
use crate::roster::RosterHandle;
use crate::session::SessionStore;
use tracing::debug;

/// Inbound platform event, already stripped of transport detail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The start command.
    Start { chat: ChatId },
    /// Button press carrying an opaque action code.
    Action {
        chat: ChatId,
        message_id: i64,
        code: String,
    },
    /// Free-text message.
    Text { chat: ChatId, text: String },
}

/// Outbound decision produced by the router; the transport executes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outgoing {
    Send {
        chat: ChatId,
        message: OutgoingMessage,
    },
    Edit {
        chat: ChatId,
        message_id: i64,
        text: String,
    },
}

fn send(chat: ChatId, message: OutgoingMessage) -> Outgoing {
    Outgoing::Send { chat, message }
}

/// A licence-shaped query carries at least one ASCII letter and one digit.
fn looks_like_license(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic()) && text.chars().any(|c| c.is_ascii_digit())
}

/// Classifies one inbound event and produces the replies to deliver.
///
/// All session mutation goes through the store's atomic operations, and a
/// lookup runs against the single roster snapshot taken for that event, so
/// a publish landing mid-request cannot mix table versions.
pub fn handle_event(sessions: &SessionStore, roster: &RosterHandle, event: Event) -> Vec<Outgoing> {
    match event {
        Event::Start { chat } => vec![send(chat, reply::language_prompt())],
        Event::Action {
            chat,
            message_id,
            code,
        } => handle_action(sessions, chat, message_id, &code),
        Event::Text { chat, text } => handle_text(sessions, roster, chat, &text),
    }
}

fn handle_action(
    sessions: &SessionStore,
    chat: ChatId,
    message_id: i64,
    code: &str,
) -> Vec<Outgoing> {
    match code {
        reply::ACTION_LANG_RU => select_language(sessions, chat, message_id, Lang::Ru),
        reply::ACTION_LANG_KZ => select_language(sessions, chat, message_id, Lang::Kz),
        reply::ACTION_CHECK_COUPONS => {
            let lang = sessions.language(chat);
            vec![send(chat, reply::enter_license_prompt(lang))]
        }
        reply::ACTION_HELP => {
            let lang = sessions.language(chat);
            vec![send(chat, reply::help(lang))]
        }
        reply::ACTION_RESTART => vec![send(chat, reply::language_prompt())],
        _ => {
            debug!(%chat, code, "ignoring unknown action code");
            Vec::new()
        }
    }
}

fn select_language(
    sessions: &SessionStore,
    chat: ChatId,
    message_id: i64,
    lang: Lang,
) -> Vec<Outgoing> {
    sessions.set_language(chat, lang);
    vec![
        Outgoing::Edit {
            chat,
            message_id,
            text: reply::language_chosen(lang).to_owned(),
        },
        send(chat, reply::menu(lang)),
    ]
}

fn handle_text(
    sessions: &SessionStore,
    roster: &RosterHandle,
    chat: ChatId,
    text: &str,
) -> Vec<Outgoing> {
    sessions.touch(chat);
    let lang = sessions.language(chat);
    let query = text.trim();

    if !looks_like_license(query) {
        return vec![send(chat, reply::unknown_request(lang))];
    }

    if !sessions.check_and_mark_request(chat) {
        debug!(%chat, "lookup inside the rate window, dropped");
        return Vec::new();
    }

    let snapshot = roster.current();
    match snapshot.get(query) {
        Some(record) => vec![send(chat, reply::found_reply(record, lang))],
        None => vec![send(chat, reply::not_found_reply(lang))],
    }
}
