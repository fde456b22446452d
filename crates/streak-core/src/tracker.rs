use chrono::NaiveDate;

use crate::error::Result;
use crate::store::RecordStore;
use crate::transition::{self, Transition};
use crate::types::{CompletionEvent, StreakRecord, UserId};

/// Owns the streak update for every user.
///
/// One call per qualifying activity. Each call performs one read and one
/// write through [`RecordStore::update`]; errors from either surface
/// unchanged as `StorageUnavailable`. The caller supplies the calendar day,
/// so the tracker never reads the clock.
///
/// Retrying after a failed write of unknown outcome is safe for the streak
/// counter on the same day, but may count `total_completed` twice.
pub struct AdherenceTracker<S> {
    store: S,
}

impl<S: RecordStore> AdherenceTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn record_completion(
        &self,
        user_id: &UserId,
        occurred_on: NaiveDate,
    ) -> Result<StreakRecord> {
        self.record_completion_with_transition(user_id, occurred_on)
            .map(|(record, _)| record)
    }

    pub fn record_event(&self, event: &CompletionEvent) -> Result<StreakRecord> {
        self.record_completion(&event.user_id, event.occurred_on)
    }

    /// Like [`record_completion`](Self::record_completion), also reporting
    /// which transition was applied.
    pub fn record_completion_with_transition(
        &self,
        user_id: &UserId,
        occurred_on: NaiveDate,
    ) -> Result<(StreakRecord, Transition)> {
        let mut applied = Transition::FirstEver;
        let record = self.store.update(user_id, &mut |prior| {
            let prior = prior.unwrap_or_else(|| StreakRecord::empty(user_id.clone()));
            let (next, t) = transition::apply(&prior, occurred_on);
            applied = t;
            next
        })?;

        tracing::debug!(
            user_id = %user_id,
            occurred_on = %occurred_on,
            transition = %applied,
            current_streak = record.current_streak,
            "completion recorded"
        );
        if applied == Transition::OutOfOrder {
            tracing::warn!(
                user_id = %user_id,
                occurred_on = %occurred_on,
                last_activity_date = ?record.last_activity_date,
                "completion dated before last activity; streak left unchanged"
            );
        }

        Ok((record, applied))
    }

    /// Read passthrough for display.
    pub fn get(&self, user_id: &UserId) -> Result<Option<StreakRecord>> {
        self.store.get(user_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StreakError;
    use crate::store::MemoryStore;
    use crate::types::parse_date;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn uid(s: &str) -> UserId {
        UserId::parse(s).unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn tracker() -> AdherenceTracker<MemoryStore> {
        AdherenceTracker::new(MemoryStore::new())
    }

    fn summary(r: &StreakRecord) -> (u32, u32, u64, String) {
        (
            r.current_streak,
            r.longest_streak,
            r.total_completed,
            r.last_activity_date.map(|d| d.to_string()).unwrap_or_default(),
        )
    }

    /// Store that counts calls and can be told to fail reads or writes.
    /// Uses the default, non-atomic `update`.
    #[derive(Default)]
    struct FlakyStore {
        inner: Mutex<Option<StreakRecord>>,
        fail_get: AtomicBool,
        fail_upsert: AtomicBool,
        gets: AtomicUsize,
        upserts: AtomicUsize,
    }

    impl RecordStore for FlakyStore {
        fn get(&self, _user_id: &UserId) -> Result<Option<StreakRecord>> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if self.fail_get.load(Ordering::SeqCst) {
                return Err(StreakError::StorageUnavailable("connection refused".into()));
            }
            Ok(self.inner.lock().unwrap().clone())
        }

        fn upsert(&self, record: &StreakRecord) -> Result<()> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            if self.fail_upsert.load(Ordering::SeqCst) {
                return Err(StreakError::StorageUnavailable("constraint violation".into()));
            }
            *self.inner.lock().unwrap() = Some(record.clone());
            Ok(())
        }
    }

    #[test]
    fn concrete_scenario() {
        let t = tracker();
        let u = uid("u");
        let steps = [
            ("2024-01-01", (1, 1, 1, "2024-01-01")),
            ("2024-01-01", (1, 1, 2, "2024-01-01")),
            ("2024-01-02", (2, 2, 3, "2024-01-02")),
            ("2024-01-10", (1, 2, 4, "2024-01-10")),
            ("2024-01-11", (2, 2, 5, "2024-01-11")),
            ("2024-01-12", (3, 3, 6, "2024-01-12")),
        ];
        for (on, (cur, longest, total, last)) in steps {
            let rec = t.record_completion(&u, day(on)).unwrap();
            assert_eq!(
                summary(&rec),
                (cur, longest, total, last.to_string()),
                "after completion on {on}"
            );
            assert_eq!(t.get(&u).unwrap().as_ref(), Some(&rec), "persisted after {on}");
        }
    }

    #[test]
    fn first_ever_completion() {
        let t = tracker();
        let (rec, tr) = t
            .record_completion_with_transition(&uid("new"), day("2024-05-01"))
            .unwrap();
        assert_eq!(tr, Transition::FirstEver);
        assert_eq!(summary(&rec), (1, 1, 1, "2024-05-01".to_string()));
    }

    #[test]
    fn same_day_is_idempotent_on_streak() {
        let t = tracker();
        let u = uid("u");
        t.record_completion(&u, day("2024-05-01")).unwrap();
        t.record_completion(&u, day("2024-05-02")).unwrap();
        let before = t.get(&u).unwrap().unwrap();
        let (after, tr) = t
            .record_completion_with_transition(&u, day("2024-05-02"))
            .unwrap();
        assert_eq!(tr, Transition::SameDay);
        assert_eq!(after.current_streak, before.current_streak);
        assert_eq!(after.total_completed, before.total_completed + 1);
    }

    #[test]
    fn five_day_gap_resets_to_one() {
        let t = tracker();
        let u = uid("u");
        for d in ["2024-05-01", "2024-05-02", "2024-05-03"] {
            t.record_completion(&u, day(d)).unwrap();
        }
        let (rec, tr) = t
            .record_completion_with_transition(&u, day("2024-05-08"))
            .unwrap();
        assert_eq!(tr, Transition::GapBroken { missed_days: 4 });
        assert_eq!(rec.current_streak, 1);
        assert_eq!(rec.longest_streak, 3);
    }

    #[test]
    fn out_of_order_event_is_a_streak_noop() {
        let t = tracker();
        let u = uid("u");
        t.record_completion(&u, day("2024-05-10")).unwrap();
        t.record_completion(&u, day("2024-05-11")).unwrap();
        let (rec, tr) = t
            .record_completion_with_transition(&u, day("2024-05-03"))
            .unwrap();
        assert_eq!(tr, Transition::OutOfOrder);
        assert_eq!(summary(&rec), (2, 2, 3, "2024-05-11".to_string()));
    }

    #[test]
    fn total_equals_number_of_calls() {
        let t = tracker();
        let u = uid("u");
        let days = [
            "2024-01-01", "2024-01-01", "2024-01-02", "2024-01-09", "2023-12-25", "2024-01-10",
            "2024-01-10", "2024-02-01",
        ];
        for (i, d) in days.iter().enumerate() {
            let rec = t.record_completion(&u, day(d)).unwrap();
            assert_eq!(rec.total_completed, i as u64 + 1);
            assert!(rec.longest_streak >= rec.current_streak);
        }
    }

    #[test]
    fn record_event_uses_event_fields() {
        let t = tracker();
        let ev = CompletionEvent::new(uid("ev"), day("2024-07-04"));
        let rec = t.record_event(&ev).unwrap();
        assert_eq!(rec.user_id, uid("ev"));
        assert_eq!(rec.last_activity_date, Some(day("2024-07-04")));
    }

    #[test]
    fn users_are_independent() {
        let t = tracker();
        t.record_completion(&uid("a"), day("2024-01-01")).unwrap();
        t.record_completion(&uid("a"), day("2024-01-02")).unwrap();
        let b = t.record_completion(&uid("b"), day("2024-01-02")).unwrap();
        assert_eq!(b.current_streak, 1);
        assert_eq!(t.get(&uid("a")).unwrap().unwrap().current_streak, 2);
    }

    #[test]
    fn one_read_and_one_write_per_call() {
        let t = AdherenceTracker::new(FlakyStore::default());
        t.record_completion(&uid("u"), day("2024-01-01")).unwrap();
        assert_eq!(t.store().gets.load(Ordering::SeqCst), 1);
        assert_eq!(t.store().upserts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fetch_failure_aborts_without_write() {
        let t = AdherenceTracker::new(FlakyStore::default());
        t.store().fail_get.store(true, Ordering::SeqCst);
        let err = t.record_completion(&uid("u"), day("2024-01-01")).unwrap_err();
        assert!(matches!(err, StreakError::StorageUnavailable(_)));
        assert_eq!(t.store().upserts.load(Ordering::SeqCst), 0);
        assert!(t.store().inner.lock().unwrap().is_none());
    }

    #[test]
    fn write_failure_leaves_previous_record() {
        let t = AdherenceTracker::new(FlakyStore::default());
        let u = uid("u");
        let first = t.record_completion(&u, day("2024-01-01")).unwrap();
        t.store().fail_upsert.store(true, Ordering::SeqCst);
        let err = t.record_completion(&u, day("2024-01-02")).unwrap_err();
        assert!(matches!(err, StreakError::StorageUnavailable(_)));
        assert_eq!(t.store().inner.lock().unwrap().as_ref(), Some(&first));

        // Same-day retry after recovery does not inflate the streak.
        t.store().fail_upsert.store(false, Ordering::SeqCst);
        let rec = t.record_completion(&u, day("2024-01-02")).unwrap();
        assert_eq!(rec.current_streak, 2);
        let retry = t.record_completion(&u, day("2024-01-02")).unwrap();
        assert_eq!(retry.current_streak, 2);
        assert_eq!(retry.total_completed, 3);
    }

    #[test]
    fn concurrent_same_user_completions_lose_nothing() {
        let t = Arc::new(tracker());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let t = Arc::clone(&t);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        t.record_completion(&uid("u"), day("2024-01-01")).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let rec = t.get(&uid("u")).unwrap().unwrap();
        assert_eq!(rec.total_completed, 200);
        assert_eq!(rec.current_streak, 1);
    }
}
