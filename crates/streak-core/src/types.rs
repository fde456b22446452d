use crate::error::{Result, StreakError};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

static USER_ID_RE: OnceLock<Regex> = OnceLock::new();

fn user_id_re() -> &'static Regex {
    USER_ID_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.:@\-]+$").unwrap())
}

/// Opaque account identifier owned by the auth/profile collaborator.
///
/// Validated once at construction so the rest of the crate never sees an
/// empty id or one that could collide with the activity-log key separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() || raw.len() > 128 || !user_id_re().is_match(&raw) {
            return Err(StreakError::InvalidUserId(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = StreakError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Accepted years: the four-digit ISO 8601 range.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Parse an ISO calendar day (`YYYY-MM-DD`) with a year in
/// `MIN_YEAR..=MAX_YEAR`.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let invalid = || StreakError::InvalidDate(raw.to_string());
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }
    let day = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&day.year()) {
        return Err(invalid());
    }
    Ok(day)
}

// ---------------------------------------------------------------------------
// StreakRecord
// ---------------------------------------------------------------------------

/// Per-user adherence counters. Mutated only by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    pub user_id: UserId,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completed: u64,
    #[serde(default)]
    pub last_activity_date: Option<NaiveDate>,
}

impl StreakRecord {
    /// The record a user has before their first completion.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            total_completed: 0,
            last_activity_date: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_completed == 0 && self.last_activity_date.is_none()
    }
}

// ---------------------------------------------------------------------------
// CompletionEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub user_id: UserId,
    pub occurred_on: NaiveDate,
}

impl CompletionEvent {
    pub fn new(user_id: UserId, occurred_on: NaiveDate) -> Self {
        Self {
            user_id,
            occurred_on,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
