use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

/// Stable identifier for one chat with the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl ChatId {
    /// Returns the raw platform id.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Reply language selected by a chat. Russian until chosen otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lang {
    #[default]
    Ru,
    Kz,
}

/// Per-chat transient state. Owned by the `SessionStore` and only mutated
/// through its operations; gone once the chat is evicted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub language: Lang,
    pub last_activity: OffsetDateTime,
    pub last_request_at: Option<OffsetDateTime>,
}

impl SessionState {
    /// Fresh default-language session, active as of `now`.
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            language: Lang::default(),
            last_activity: now,
            last_request_at: None,
        }
    }
}

/// One row of the driver roster. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRecord {
    pub license_no: String,
    pub name: String,
    pub city: String,
    pub order_count: u32,
    pub coupon_count: u32,
    /// Comma-separated coupon numbers, kept as the source encodes them.
    pub coupon_numbers: String,
}

/// Immutable roster snapshot keyed by licence number.
///
/// A snapshot is built whole before anyone can see it; lookups against a
/// given snapshot stay consistent even while a newer version is published.
#[derive(Debug)]
pub struct Roster {
    records: HashMap<String, DriverRecord>,
    version: u64,
    loaded_at: OffsetDateTime,
}

impl Roster {
    /// The never-loaded roster: zero records, version 0.
    pub fn empty() -> Self {
        Self {
            records: HashMap::new(),
            version: 0,
            loaded_at: OffsetDateTime::now_utc(),
        }
    }

    pub(crate) fn from_records(records: Vec<DriverRecord>, version: u64) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.license_no.clone(), r))
            .collect();
        Self {
            records,
            version,
            loaded_at: OffsetDateTime::now_utc(),
        }
    }

    /// Exact-match lookup by licence number. Case-sensitive: the source's
    /// matching semantics are preserved, not normalized.
    pub fn get(&self, license_no: &str) -> Option<&DriverRecord> {
        self.records.get(license_no)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Monotonically increasing publish counter; 0 only for `empty()`.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> OffsetDateTime {
        self.loaded_at
    }
}
