use autopartner_bot::model::{ChatId, DriverRecord, Lang};
use autopartner_bot::outbound::ButtonAction;
use autopartner_bot::reply;
use autopartner_bot::roster::RosterHandle;
use autopartner_bot::router::{handle_event, Event, Outgoing};
use autopartner_bot::session::SessionStore;

fn record(license_no: &str, name: &str) -> DriverRecord {
    DriverRecord {
        license_no: license_no.to_owned(),
        name: name.to_owned(),
        city: "Алматы".to_owned(),
        order_count: 215,
        coupon_count: 2,
        coupon_numbers: "101, 102".to_owned(),
    }
}

fn loaded_roster() -> RosterHandle {
    let handle = RosterHandle::new();
    handle.publish(vec![record("AB12345", "Арман")]);
    handle
}

fn sent_text(outgoing: &Outgoing) -> &str {
    match outgoing {
        Outgoing::Send { message, .. } => &message.text,
        Outgoing::Edit { text, .. } => text,
    }
}

#[test]
fn start_prompts_language_selection_without_creating_state() {
    let sessions = SessionStore::new();
    let roster = loaded_roster();

    let replies = handle_event(&sessions, &roster, Event::Start { chat: ChatId(1) });
    assert_eq!(replies.len(), 1);
    match &replies[0] {
        Outgoing::Send { message, .. } => {
            assert_eq!(message.keyboard.len(), 2, "one button per language");
        }
        other => panic!("expected a send, got {other:?}"),
    }
    assert!(sessions.is_empty(), "start must not create a session");
}

#[test]
fn language_selection_confirms_and_shows_menu() {
    let sessions = SessionStore::new();
    let roster = loaded_roster();
    let chat = ChatId(5);

    let replies = handle_event(
        &sessions,
        &roster,
        Event::Action {
            chat,
            message_id: 77,
            code: reply::ACTION_LANG_KZ.to_owned(),
        },
    );

    assert_eq!(replies.len(), 2);
    match &replies[0] {
        Outgoing::Edit { message_id, text, .. } => {
            assert_eq!(*message_id, 77);
            assert_eq!(text, reply::language_chosen(Lang::Kz));
        }
        other => panic!("expected the prompt edit, got {other:?}"),
    }
    assert_eq!(sessions.language(chat), Lang::Kz);
    // Menu is localized and carries the three actions.
    match &replies[1] {
        Outgoing::Send { message, .. } => {
            assert_eq!(message.keyboard.len(), 3);
            assert!(message
                .keyboard
                .iter()
                .flatten()
                .any(|b| b.action == ButtonAction::Url("https://wa.me/77777776500".into())));
        }
        other => panic!("expected the menu send, got {other:?}"),
    }
}

#[test]
fn license_lookup_hits_the_found_branch() {
    let sessions = SessionStore::new();
    let roster = loaded_roster();

    let replies = handle_event(
        &sessions,
        &roster,
        Event::Text {
            chat: ChatId(9),
            text: "AB12345".to_owned(),
        },
    );
    assert_eq!(replies.len(), 1);
    let text = sent_text(&replies[0]);
    assert!(text.contains("Арман"), "found reply is personalized");
    assert!(text.contains("215"), "found reply carries the order count");
}

#[test]
fn unknown_license_hits_the_not_found_branch() {
    let sessions = SessionStore::new();
    let roster = loaded_roster();

    let replies = handle_event(
        &sessions,
        &roster,
        Event::Text {
            chat: ChatId(9),
            text: "ZZ99999".to_owned(),
        },
    );
    assert_eq!(replies.len(), 1);
    assert!(sent_text(&replies[0]).contains("нет в нашей базе"));
}

#[test]
fn plain_text_gets_the_help_menu_branch() {
    let sessions = SessionStore::new();
    let roster = loaded_roster();

    let replies = handle_event(
        &sessions,
        &roster,
        Event::Text {
            chat: ChatId(9),
            text: "hello".to_owned(),
        },
    );
    assert_eq!(replies.len(), 1);
    match &replies[0] {
        Outgoing::Send { message, .. } => {
            assert!(!message.keyboard.is_empty(), "fallback re-offers the menu");
        }
        other => panic!("expected a send, got {other:?}"),
    }
}

#[test]
fn lookup_query_is_trimmed_like_the_source() {
    let sessions = SessionStore::new();
    let roster = loaded_roster();

    let replies = handle_event(
        &sessions,
        &roster,
        Event::Text {
            chat: ChatId(9),
            text: "  AB12345  ".to_owned(),
        },
    );
    assert!(sent_text(&replies[0]).contains("Арман"));
}

#[test]
fn second_lookup_in_the_window_is_dropped_silently() {
    let sessions = SessionStore::new();
    let roster = loaded_roster();
    let chat = ChatId(11);

    let first = handle_event(
        &sessions,
        &roster,
        Event::Text {
            chat,
            text: "AB12345".to_owned(),
        },
    );
    assert_eq!(first.len(), 1);

    let second = handle_event(
        &sessions,
        &roster,
        Event::Text {
            chat,
            text: "AB12345".to_owned(),
        },
    );
    assert!(second.is_empty(), "rate-limited lookup produces no reply");

    // Non-lookup traffic is not rate limited.
    let other = handle_event(
        &sessions,
        &roster,
        Event::Text {
            chat,
            text: "hello".to_owned(),
        },
    );
    assert_eq!(other.len(), 1);
}

#[test]
fn lookups_against_the_empty_roster_miss_cleanly() {
    let sessions = SessionStore::new();
    let roster = RosterHandle::new();

    let replies = handle_event(
        &sessions,
        &roster,
        Event::Text {
            chat: ChatId(3),
            text: "AB12345".to_owned(),
        },
    );
    assert_eq!(replies.len(), 1);
    assert!(sent_text(&replies[0]).contains("нет в нашей базе"));
}

#[test]
fn buttons_answer_in_the_stored_language() {
    let sessions = SessionStore::new();
    let roster = loaded_roster();
    let chat = ChatId(21);
    sessions.set_language(chat, Lang::Kz);

    let replies = handle_event(
        &sessions,
        &roster,
        Event::Action {
            chat,
            message_id: 1,
            code: reply::ACTION_CHECK_COUPONS.to_owned(),
        },
    );
    assert!(sent_text(&replies[0]).contains("нөміріңізді"));

    let replies = handle_event(
        &sessions,
        &roster,
        Event::Action {
            chat,
            message_id: 2,
            code: reply::ACTION_HELP.to_owned(),
        },
    );
    assert!(sent_text(&replies[0]).contains("WhatsApp"));
}

#[test]
fn restart_reopens_the_language_prompt() {
    let sessions = SessionStore::new();
    let roster = loaded_roster();

    let replies = handle_event(
        &sessions,
        &roster,
        Event::Action {
            chat: ChatId(30),
            message_id: 4,
            code: reply::ACTION_RESTART.to_owned(),
        },
    );
    assert_eq!(replies, handle_event(&sessions, &roster, Event::Start { chat: ChatId(30) }));
}

#[test]
fn unknown_action_codes_are_ignored() {
    let sessions = SessionStore::new();
    let roster = loaded_roster();

    let replies = handle_event(
        &sessions,
        &roster,
        Event::Action {
            chat: ChatId(31),
            message_id: 4,
            code: "mystery".to_owned(),
        },
    );
    assert!(replies.is_empty());
}
