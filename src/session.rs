use crate::model::{ChatId, Lang, SessionState};
use dashmap::DashMap;
use time::{Duration, OffsetDateTime};

const DEFAULT_REQUEST_WINDOW: Duration = Duration::seconds(60);

/// Concurrency-safe map of per-chat sessions.
///
/// Every operation works on one entry under that entry's own lock, so
/// concurrent callers never observe a torn session and two handlers cannot
/// interleave mutations of the same chat. Sessions are created on first
/// touch and only ever leave through `sweep_idle`.
pub struct SessionStore {
    sessions: DashMap<ChatId, SessionState>,
    request_window: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Store with the default one-request-per-60s window.
    pub fn new() -> Self {
        Self::with_request_window(DEFAULT_REQUEST_WINDOW)
    }

    pub fn with_request_window(request_window: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            request_window,
        }
    }

    fn now() -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    /// Marks the chat active now, creating a default-language session if
    /// absent. `last_activity` never moves backwards while a session lives.
    pub fn touch(&self, id: ChatId) {
        let now = Self::now();
        self.sessions
            .entry(id)
            .and_modify(|s| s.last_activity = s.last_activity.max(now))
            .or_insert_with(|| SessionState::new(now));
    }

    /// Stored language, or the default for chats with no session.
    pub fn language(&self, id: ChatId) -> Lang {
        self.sessions
            .get(&id)
            .map(|s| s.language)
            .unwrap_or_default()
    }

    /// Records the chat's language choice; counts as activity.
    pub fn set_language(&self, id: ChatId, language: Lang) {
        let now = Self::now();
        let mut entry = self
            .sessions
            .entry(id)
            .or_insert_with(|| SessionState::new(now));
        entry.language = language;
        entry.last_activity = entry.last_activity.max(now);
    }

    /// Atomic rate gate: returns `true` and stamps `last_request_at` when
    /// the chat has made no honored request inside the window, otherwise
    /// `false` without mutating anything.
    pub fn check_and_mark_request(&self, id: ChatId) -> bool {
        let now = Self::now();
        let mut entry = self
            .sessions
            .entry(id)
            .or_insert_with(|| SessionState::new(now));
        let allowed = match entry.last_request_at {
            Some(at) => now - at > self.request_window,
            None => true,
        };
        if allowed {
            entry.last_request_at = Some(now);
        }
        allowed
    }

    /// Removes and returns every chat idle longer than `threshold`.
    ///
    /// The predicate is re-checked under the entry lock at removal, so a
    /// chat touched while the sweep runs keeps its session.
    pub fn sweep_idle(&self, threshold: Duration) -> Vec<ChatId> {
        let now = Self::now();
        let stale: Vec<ChatId> = self
            .sessions
            .iter()
            .filter_map(|entry| {
                if now - entry.value().last_activity > threshold {
                    Some(*entry.key())
                } else {
                    None
                }
            })
            .collect();

        stale
            .into_iter()
            .filter(|id| {
                self.sessions
                    .remove_if(id, |_, s| now - s.last_activity > threshold)
                    .is_some()
            })
            .collect()
    }

    /// Last recorded activity for one chat, if it has a live session.
    pub fn last_activity(&self, id: ChatId) -> Option<OffsetDateTime> {
        self.sessions.get(&id).map(|s| s.last_activity)
    }

    /// Number of live sessions. Diagnostic only.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
