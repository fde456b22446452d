//! The completion flow and the progress view built on top of the tracker.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::activity::{ActivityEntry, EntryDetails};
use crate::error::{Result, StreakError};
use crate::message;
use crate::store::{ActivityLog, RecordStore};
use crate::tracker::AdherenceTracker;
use crate::transition::Transition;
use crate::types::{StreakRecord, UserId};

pub const WEEK_DAYS: u64 = 7;
pub const MONTH_DAYS: u64 = 30;

/// First day of the `len`-day window that ends on `today`.
fn window_start(today: NaiveDate, len: u64) -> Result<NaiveDate> {
    today
        .checked_sub_days(Days::new(len - 1))
        .ok_or_else(|| StreakError::InvalidDate(today.to_string()))
}

#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub record: StreakRecord,
    pub transition: Transition,
    pub entry: ActivityEntry,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub record: StreakRecord,
    pub completed_this_week: usize,
    pub completed_this_month: usize,
    pub latest_mood_change: Option<i16>,
    pub message: String,
}

pub struct ProgressService<S> {
    tracker: AdherenceTracker<S>,
}

impl<S: RecordStore + ActivityLog> ProgressService<S> {
    pub fn new(store: S) -> Self {
        Self {
            tracker: AdherenceTracker::new(store),
        }
    }

    pub fn tracker(&self) -> &AdherenceTracker<S> {
        &self.tracker
    }

    /// Log one qualifying activity and update the user's streak.
    pub fn complete(
        &self,
        user_id: &UserId,
        occurred_on: NaiveDate,
        mood_before: Option<u8>,
        mood_after: Option<u8>,
    ) -> Result<Completion> {
        self.complete_with(
            user_id,
            occurred_on,
            EntryDetails::moods(mood_before, mood_after),
        )
    }

    /// [`complete`](Self::complete) with activity name and notes attached.
    ///
    /// Moods are validated before anything is written. The log entry is
    /// appended first; if the streak update then fails the entry stays and
    /// the error is returned.
    pub fn complete_with(
        &self,
        user_id: &UserId,
        occurred_on: NaiveDate,
        details: EntryDetails,
    ) -> Result<Completion> {
        details.validate()?;

        let entry = ActivityEntry::with_details(user_id.clone(), occurred_on, details);
        self.tracker.store().append(&entry)?;
        let (record, transition) = self
            .tracker
            .record_completion_with_transition(user_id, occurred_on)?;

        Ok(Completion {
            record,
            transition,
            entry,
        })
    }

    /// Counters plus 7- and 30-day completion counts ending on `today`.
    ///
    /// A `today` too close to the start of the calendar for a full window is
    /// rejected as `InvalidDate`.
    pub fn summary(&self, user_id: &UserId, today: NaiveDate) -> Result<ProgressSummary> {
        let month_start = window_start(today, MONTH_DAYS)?;
        let week_start = window_start(today, WEEK_DAYS)?;
        let record = self
            .tracker
            .get(user_id)?
            .unwrap_or_else(|| StreakRecord::empty(user_id.clone()));
        let log = self.tracker.store();

        let month = log.entries_between(user_id, month_start, today)?;
        let completed_this_week = month.iter().filter(|e| e.occurred_on >= week_start).count();
        let latest_mood_change = log
            .recent(user_id, 1)?
            .first()
            .and_then(ActivityEntry::mood_change);

        Ok(ProgressSummary {
            message: message::encouragement(record.current_streak),
            record,
            completed_this_week,
            completed_this_month: month.len(),
            latest_mood_change,
        })
    }

    /// Newest activity entries first.
    pub fn history(&self, user_id: &UserId, limit: usize) -> Result<Vec<ActivityEntry>> {
        self.tracker.store().recent(user_id, limit)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
