use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StreakError};
use crate::types::UserId;

pub const MOOD_MIN: u8 = 1;
pub const MOOD_MAX: u8 = 10;

/// One qualifying activity, as logged alongside the streak update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub user_id: UserId,
    pub occurred_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_before: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_after: Option<u8>,
    /// What was done, e.g. an exercise name. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Optional details a caller attaches to one completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDetails {
    pub mood_before: Option<u8>,
    pub mood_after: Option<u8>,
    pub activity: Option<String>,
    pub notes: Option<String>,
}

impl EntryDetails {
    pub fn moods(mood_before: Option<u8>, mood_after: Option<u8>) -> Self {
        Self {
            mood_before,
            mood_after,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_mood(self.mood_before)?;
        validate_mood(self.mood_after)
    }
}

/// Blank text is treated as absent.
fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

impl ActivityEntry {
    pub fn new(
        user_id: UserId,
        occurred_on: NaiveDate,
        mood_before: Option<u8>,
        mood_after: Option<u8>,
    ) -> Self {
        Self::with_details(
            user_id,
            occurred_on,
            EntryDetails::moods(mood_before, mood_after),
        )
    }

    pub fn with_details(user_id: UserId, occurred_on: NaiveDate, details: EntryDetails) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            occurred_on,
            mood_before: details.mood_before,
            mood_after: details.mood_after,
            activity: non_blank(details.activity),
            notes: non_blank(details.notes),
            recorded_at: Utc::now(),
        }
    }

    /// `mood_after - mood_before`, when both were rated.
    pub fn mood_change(&self) -> Option<i16> {
        match (self.mood_before, self.mood_after) {
            (Some(before), Some(after)) => Some(i16::from(after) - i16::from(before)),
            _ => None,
        }
    }
}

pub fn validate_mood(mood: Option<u8>) -> Result<()> {
    match mood {
        Some(m) if !(MOOD_MIN..=MOOD_MAX).contains(&m) => Err(StreakError::InvalidMood(m)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(before: Option<u8>, after: Option<u8>) -> ActivityEntry {
        ActivityEntry::new(
            UserId::parse("u").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            before,
            after,
        )
    }

    #[test]
    fn mood_change_needs_both_ratings() {
        assert_eq!(entry(Some(3), Some(7)).mood_change(), Some(4));
        assert_eq!(entry(Some(8), Some(5)).mood_change(), Some(-3));
        assert_eq!(entry(None, Some(5)).mood_change(), None);
        assert_eq!(entry(Some(5), None).mood_change(), None);
    }

    #[test]
    fn mood_bounds() {
        assert!(validate_mood(None).is_ok());
        assert!(validate_mood(Some(1)).is_ok());
        assert!(validate_mood(Some(10)).is_ok());
        assert!(matches!(validate_mood(Some(0)), Err(StreakError::InvalidMood(0))));
        assert!(matches!(validate_mood(Some(11)), Err(StreakError::InvalidMood(11))));
    }

    #[test]
    fn unrated_moods_are_omitted_from_json() {
        let json = serde_json::to_value(entry(None, None)).unwrap();
        assert!(json.get("mood_before").is_none());
        assert!(json.get("activity").is_none());
        assert_eq!(json["occurred_on"], "2024-01-01");
    }

    #[test]
    fn details_are_trimmed_and_blank_dropped() {
        let e = ActivityEntry::with_details(
            UserId::parse("u").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            EntryDetails {
                activity: Some("  gratitude letter ".into()),
                notes: Some("   ".into()),
                ..EntryDetails::default()
            },
        );
        assert_eq!(e.activity.as_deref(), Some("gratitude letter"));
        assert_eq!(e.notes, None);
    }

    #[test]
    fn entries_stored_without_details_still_decode() {
        let e: ActivityEntry = serde_json::from_str(
            r#"{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","user_id":"u","occurred_on":"2024-01-01","recorded_at":"2024-01-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(e.activity.is_none() && e.notes.is_none());
    }

    #[test]
    fn details_validate_moods() {
        assert!(EntryDetails::moods(Some(3), Some(10)).validate().is_ok());
        assert!(matches!(
            EntryDetails::moods(Some(3), Some(12)).validate(),
            Err(StreakError::InvalidMood(12))
        ));
    }
}
