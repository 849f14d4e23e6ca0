use autopartner_bot::model::{ChatId, Lang};
use autopartner_bot::session::SessionStore;
use proptest::prelude::*;
use std::thread::sleep;
use std::time::Duration;

#[test]
fn touch_creates_default_session() {
    let store = SessionStore::new();
    let chat = ChatId(1);

    assert!(store.last_activity(chat).is_none());
    store.touch(chat);
    assert!(store.last_activity(chat).is_some());
    assert_eq!(store.language(chat), Lang::Ru);
}

#[test]
fn touch_never_moves_activity_backwards() {
    let store = SessionStore::new();
    let chat = ChatId(7);

    store.touch(chat);
    let first = store.last_activity(chat).expect("session exists");
    sleep(Duration::from_millis(20));
    store.touch(chat);
    let second = store.last_activity(chat).expect("session exists");
    assert!(second >= first, "activity must be non-decreasing");
}

#[test]
fn language_survives_touches_until_eviction() {
    let store = SessionStore::new();
    let chat = ChatId(42);

    store.set_language(chat, Lang::Kz);
    store.touch(chat);
    assert_eq!(store.language(chat), Lang::Kz);

    sleep(Duration::from_millis(40));
    let evicted = store.sweep_idle(time::Duration::milliseconds(20));
    assert_eq!(evicted, vec![chat]);

    // The customized state is gone; the next touch starts a fresh default.
    assert_eq!(store.language(chat), Lang::Ru);
    assert!(store.last_activity(chat).is_none());
    store.touch(chat);
    assert_eq!(store.language(chat), Lang::Ru);
}

#[test]
fn sweep_evicts_exactly_the_idle() {
    let store = SessionStore::new();
    let idle = ChatId(1);
    let active = ChatId(2);

    store.touch(idle);
    sleep(Duration::from_millis(50));
    store.touch(active);

    let mut evicted = store.sweep_idle(time::Duration::milliseconds(25));
    evicted.sort();
    assert_eq!(evicted, vec![idle]);
    assert!(store.last_activity(active).is_some());
    assert_eq!(store.len(), 1);
}

#[test]
fn sweep_of_fresh_sessions_evicts_nothing() {
    let store = SessionStore::new();
    for id in 0..10 {
        store.touch(ChatId(id));
    }
    assert!(store.sweep_idle(time::Duration::minutes(15)).is_empty());
    assert_eq!(store.len(), 10);
}

proptest! {
    #[test]
    fn activity_is_monotonic_under_any_operation_order(ops in prop::collection::vec((0..3i64, 0..3u8), 1..40)) {
        let store = SessionStore::new();
        let mut seen: std::collections::HashMap<i64, time::OffsetDateTime> = Default::default();

        for (raw_chat, op) in ops {
            let chat = ChatId(raw_chat);
            match op {
                0 => store.touch(chat),
                1 => store.set_language(chat, Lang::Kz),
                _ => {
                    let _ = store.check_and_mark_request(chat);
                }
            }
            if let Some(at) = store.last_activity(chat) {
                if let Some(prev) = seen.insert(raw_chat, at) {
                    prop_assert!(at >= prev, "activity went backwards for chat {raw_chat}");
                }
            }
        }
    }
}
