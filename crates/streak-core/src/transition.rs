//! The streak state transition.
//!
//! A completion on `occurred_on` moves a [`StreakRecord`] through exactly one
//! of five transitions, chosen by the whole-day gap between `occurred_on` and
//! the record's `last_activity_date`:
//!
//! | gap          | transition       | current_streak | last_activity_date |
//! |--------------|------------------|----------------|--------------------|
//! | no prior day | `FirstEver`      | 1              | occurred_on        |
//! | 0            | `SameDay`        | unchanged      | occurred_on        |
//! | 1            | `ConsecutiveDay` | +1             | occurred_on        |
//! | > 1          | `GapBroken`      | 1              | occurred_on        |
//! | < 0          | `OutOfOrder`     | unchanged      | unchanged          |
//!
//! Every transition increments `total_completed` by one and lifts
//! `longest_streak` to at least `current_streak`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::StreakRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    FirstEver,
    SameDay,
    ConsecutiveDay,
    GapBroken { missed_days: u32 },
    OutOfOrder,
}

impl Transition {
    /// Classify a completion against the last recorded activity day.
    pub fn classify(last_activity_date: Option<NaiveDate>, occurred_on: NaiveDate) -> Self {
        let Some(last) = last_activity_date else {
            return Transition::FirstEver;
        };
        let gap = occurred_on.signed_duration_since(last).num_days();
        match gap {
            0 => Transition::SameDay,
            1 => Transition::ConsecutiveDay,
            g if g > 1 => Transition::GapBroken {
                missed_days: u32::try_from(g - 1).unwrap_or(u32::MAX),
            },
            _ => Transition::OutOfOrder,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Transition::FirstEver => "first_ever",
            Transition::SameDay => "same_day",
            Transition::ConsecutiveDay => "consecutive_day",
            Transition::GapBroken { .. } => "gap_broken",
            Transition::OutOfOrder => "out_of_order",
        }
    }

    /// True when the completion moved the streak counter.
    pub fn extends_streak(self) -> bool {
        matches!(
            self,
            Transition::FirstEver | Transition::ConsecutiveDay | Transition::GapBroken { .. }
        )
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the record that results from one completion on `occurred_on`.
///
/// Pure: no clock reads, no I/O.
pub fn apply(prior: &StreakRecord, occurred_on: NaiveDate) -> (StreakRecord, Transition) {
    let transition = Transition::classify(prior.last_activity_date, occurred_on);

    let current_streak = match transition {
        Transition::FirstEver | Transition::GapBroken { .. } => 1,
        Transition::ConsecutiveDay => prior.current_streak.saturating_add(1),
        Transition::SameDay | Transition::OutOfOrder => prior.current_streak,
    };

    let last_activity_date = match transition {
        Transition::OutOfOrder => prior.last_activity_date,
        _ => Some(occurred_on),
    };

    let next = StreakRecord {
        user_id: prior.user_id.clone(),
        current_streak,
        longest_streak: prior.longest_streak.max(current_streak),
        total_completed: prior.total_completed.saturating_add(1),
        last_activity_date,
    };
    (next, transition)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
