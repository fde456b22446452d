//! Record-store seams consumed by the tracker and the progress service.
//!
//! `RecordStore` holds one `StreakRecord` per user; `ActivityLog` keeps the
//! dated completion entries behind the weekly/monthly counts. Two backends
//! implement both: [`MemoryStore`] and the redb-backed [`StreakDb`].

pub mod db;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::activity::ActivityEntry;
use crate::error::{Result, StreakError};
use crate::types::{StreakRecord, UserId};

pub use db::StreakDb;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

pub trait RecordStore: Send + Sync {
    fn get(&self, user_id: &UserId) -> Result<Option<StreakRecord>>;

    fn upsert(&self, record: &StreakRecord) -> Result<()>;

    /// Read-modify-write of one user's record.
    ///
    /// `f` receives the stored record (or `None`) and returns the record to
    /// persist. The default is a plain `get` then `upsert`, which is
    /// last-writer-wins under concurrent calls for the same user. Backends
    /// that can serialize per-user updates override this.
    fn update(
        &self,
        user_id: &UserId,
        f: &mut dyn FnMut(Option<StreakRecord>) -> StreakRecord,
    ) -> Result<StreakRecord> {
        let prior = self.get(user_id)?;
        let next = f(prior);
        self.upsert(&next)?;
        Ok(next)
    }
}

pub trait ActivityLog: Send + Sync {
    fn append(&self, entry: &ActivityEntry) -> Result<()>;

    /// Entries with `from <= occurred_on <= to`, oldest day first.
    fn entries_between(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ActivityEntry>>;

    /// The newest `limit` entries by `occurred_on`, newest first.
    fn recent(&self, user_id: &UserId, limit: usize) -> Result<Vec<ActivityEntry>>;
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn get(&self, user_id: &UserId) -> Result<Option<StreakRecord>> {
        (**self).get(user_id)
    }

    fn upsert(&self, record: &StreakRecord) -> Result<()> {
        (**self).upsert(record)
    }

    fn update(
        &self,
        user_id: &UserId,
        f: &mut dyn FnMut(Option<StreakRecord>) -> StreakRecord,
    ) -> Result<StreakRecord> {
        (**self).update(user_id, f)
    }
}

impl<T: ActivityLog + ?Sized> ActivityLog for Arc<T> {
    fn append(&self, entry: &ActivityEntry) -> Result<()> {
        (**self).append(entry)
    }

    fn entries_between(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ActivityEntry>> {
        (**self).entries_between(user_id, from, to)
    }

    fn recent(&self, user_id: &UserId, limit: usize) -> Result<Vec<ActivityEntry>> {
        (**self).recent(user_id, limit)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryInner {
    records: HashMap<UserId, StreakRecord>,
    // per user: (day, insertion seq) -> entry
    activity: HashMap<UserId, BTreeMap<(NaiveDate, u64), ActivityEntry>>,
    seq: u64,
}

/// In-process store. `update` runs entirely under one lock.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>> {
        self.inner
            .lock()
            .map_err(|_| StreakError::StorageUnavailable("memory store lock poisoned".into()))
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, user_id: &UserId) -> Result<Option<StreakRecord>> {
        Ok(self.lock()?.records.get(user_id).cloned())
    }

    fn upsert(&self, record: &StreakRecord) -> Result<()> {
        self.lock()?
            .records
            .insert(record.user_id.clone(), record.clone());
        Ok(())
    }

    fn update(
        &self,
        user_id: &UserId,
        f: &mut dyn FnMut(Option<StreakRecord>) -> StreakRecord,
    ) -> Result<StreakRecord> {
        let mut inner = self.lock()?;
        let next = f(inner.records.get(user_id).cloned());
        inner.records.insert(user_id.clone(), next.clone());
        Ok(next)
    }
}

impl ActivityLog for MemoryStore {
    fn append(&self, entry: &ActivityEntry) -> Result<()> {
        let mut inner = self.lock()?;
        inner.seq += 1;
        let seq = inner.seq;
        inner
            .activity
            .entry(entry.user_id.clone())
            .or_default()
            .insert((entry.occurred_on, seq), entry.clone());
        Ok(())
    }

    fn entries_between(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ActivityEntry>> {
        if from > to {
            return Ok(Vec::new());
        }
        let inner = self.lock()?;
        let Some(log) = inner.activity.get(user_id) else {
            return Ok(Vec::new());
        };
        Ok(log
            .range((from, 0)..=(to, u64::MAX))
            .map(|(_, e)| e.clone())
            .collect())
    }

    fn recent(&self, user_id: &UserId, limit: usize) -> Result<Vec<ActivityEntry>> {
        let inner = self.lock()?;
        let Some(log) = inner.activity.get(user_id) else {
            return Ok(Vec::new());
        };
        Ok(log.values().rev().take(limit).cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_date;

    fn uid(s: &str) -> UserId {
        UserId::parse(s).unwrap()
    }

    #[test]
    fn memory_get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get(&uid("nobody")).unwrap().is_none());
    }

    #[test]
    fn memory_upsert_then_get() {
        let store = MemoryStore::new();
        let mut rec = StreakRecord::empty(uid("a"));
        rec.current_streak = 3;
        store.upsert(&rec).unwrap();
        assert_eq!(store.get(&uid("a")).unwrap(), Some(rec.clone()));

        rec.current_streak = 4;
        store.upsert(&rec).unwrap();
        assert_eq!(store.get(&uid("a")).unwrap().unwrap().current_streak, 4);
    }

    #[test]
    fn memory_update_sees_prior() {
        let store = MemoryStore::new();
        let out = store
            .update(&uid("a"), &mut |prior| {
                assert!(prior.is_none());
                let mut r = StreakRecord::empty(uid("a"));
                r.total_completed = 1;
                r
            })
            .unwrap();
        assert_eq!(out.total_completed, 1);
        store
            .update(&uid("a"), &mut |prior| {
                let mut r = prior.unwrap();
                r.total_completed += 1;
                r
            })
            .unwrap();
        assert_eq!(store.get(&uid("a")).unwrap().unwrap().total_completed, 2);
    }

    #[test]
    fn memory_activity_window_and_recent() {
        let store = MemoryStore::new();
        let u = uid("a");
        for d in ["2024-01-01", "2024-01-03", "2024-01-03", "2024-01-09"] {
            store
                .append(&ActivityEntry::new(u.clone(), parse_date(d).unwrap(), None, None))
                .unwrap();
        }
        store
            .append(&ActivityEntry::new(uid("b"), parse_date("2024-01-03").unwrap(), None, None))
            .unwrap();

        let window = store
            .entries_between(&u, parse_date("2024-01-02").unwrap(), parse_date("2024-01-09").unwrap())
            .unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].occurred_on.to_string(), "2024-01-03");
        assert_eq!(window[2].occurred_on.to_string(), "2024-01-09");

        let recent = store.recent(&u, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].occurred_on.to_string(), "2024-01-09");
        assert_eq!(recent[1].occurred_on.to_string(), "2024-01-03");
    }

    #[test]
    fn inverted_window_is_empty() {
        let store = MemoryStore::new();
        let u = uid("a");
        store
            .append(&ActivityEntry::new(u.clone(), parse_date("2024-01-05").unwrap(), None, None))
            .unwrap();
        let out = store
            .entries_between(&u, parse_date("2024-01-09").unwrap(), parse_date("2024-01-01").unwrap())
            .unwrap();
        assert!(out.is_empty());
    }
}
