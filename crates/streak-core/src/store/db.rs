//! Persistent streak and activity storage using redb.
//!
//! # Table design
//!
//! `STREAKS` maps `user_id` to a JSON-encoded `StreakRecord`.
//!
//! `ACTIVITY` uses a variable-length composite key:
//! ```text
//! [ user_id bytes | 0x00 | day: u32 big-endian (4 bytes) | seq: u32 big-endian (4 bytes) ]
//! ```
//!
//! User ids never contain `0x00`, so the separator makes each user's entries
//! a contiguous key range. Within that range the big-endian day keeps byte
//! order equal to date order, so a date window is a single range scan.
//! `seq` numbers one user's entries for one day in append order, starting at
//! 0; it is assigned inside the append's write transaction.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use redb::{Database, ReadableTable, TableDefinition};

use crate::activity::ActivityEntry;
use crate::error::{Result, StreakError};
use crate::types::{StreakRecord, UserId};

use super::{ActivityLog, RecordStore};

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

/// Key: user id. Value: JSON-encoded StreakRecord.
const STREAKS: TableDefinition<&str, &[u8]> = TableDefinition::new("streaks");

/// Key: composite (user id ++ 0x00 ++ day ++ seq). Value: JSON-encoded ActivityEntry.
const ACTIVITY: TableDefinition<&[u8], &[u8]> = TableDefinition::new("activity");

// ---------------------------------------------------------------------------
// Key helpers
// ---------------------------------------------------------------------------

/// Days since CE with the sign bit flipped, so ordering survives the cast.
fn day_bytes(day: NaiveDate) -> [u8; 4] {
    ((day.num_days_from_ce() as u32) ^ 0x8000_0000).to_be_bytes()
}

fn user_prefix(user_id: &UserId) -> Vec<u8> {
    let mut key = Vec::with_capacity(user_id.as_str().len() + 9);
    key.extend_from_slice(user_id.as_str().as_bytes());
    key.push(0x00);
    key
}

fn activity_key(user_id: &UserId, day: NaiveDate, seq: u32) -> Vec<u8> {
    let mut key = user_prefix(user_id);
    key.extend_from_slice(&day_bytes(day));
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

fn day_lower_bound(user_id: &UserId, day: NaiveDate) -> Vec<u8> {
    activity_key(user_id, day, 0)
}

fn day_upper_bound(user_id: &UserId, day: NaiveDate) -> Vec<u8> {
    activity_key(user_id, day, u32::MAX)
}

fn user_upper_bound(user_id: &UserId) -> Vec<u8> {
    let mut key = user_prefix(user_id);
    key.extend_from_slice(&[0xff; 8]);
    key
}

/// The sequence number stored in the last four bytes of an activity key.
fn key_seq(key: &[u8]) -> Result<u32> {
    let tail = key
        .len()
        .checked_sub(4)
        .and_then(|start| <[u8; 4]>::try_from(&key[start..]).ok())
        .ok_or_else(|| StreakError::storage("truncated activity key"))?;
    Ok(u32::from_be_bytes(tail))
}

fn decode_record(bytes: &[u8]) -> Result<StreakRecord> {
    serde_json::from_slice(bytes).map_err(StreakError::storage)
}

fn decode_entry(bytes: &[u8]) -> Result<ActivityEntry> {
    serde_json::from_slice(bytes).map_err(StreakError::storage)
}

// ---------------------------------------------------------------------------
// StreakDb
// ---------------------------------------------------------------------------

/// redb-backed `RecordStore` + `ActivityLog`.
///
/// redb admits one write transaction at a time, so `update` is atomic per
/// user: concurrent completions for the same user serialize instead of
/// overwriting each other.
pub struct StreakDb {
    db: Database,
}

impl StreakDb {
    /// Open or create the database at `path`, creating both tables.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(StreakError::storage)?;
        let wt = db.begin_write().map_err(StreakError::storage)?;
        wt.open_table(STREAKS).map_err(StreakError::storage)?;
        wt.open_table(ACTIVITY).map_err(StreakError::storage)?;
        wt.commit().map_err(StreakError::storage)?;
        tracing::debug!(path = %path.display(), "opened streak database");
        Ok(Self { db })
    }

    /// Open the database under a project root (`.streak/streak.db`).
    pub fn open_in(root: &Path) -> Result<Self> {
        Self::open(&crate::paths::db_path(root))
    }

    /// All stored records, ordered by user id.
    pub fn list_records(&self) -> Result<Vec<StreakRecord>> {
        let rt = self.db.begin_read().map_err(StreakError::storage)?;
        let table = rt.open_table(STREAKS).map_err(StreakError::storage)?;
        let mut out = Vec::new();
        for entry in table.iter().map_err(StreakError::storage)? {
            let (_, v) = entry.map_err(StreakError::storage)?;
            out.push(decode_record(v.value())?);
        }
        Ok(out)
    }
}

impl RecordStore for StreakDb {
    fn get(&self, user_id: &UserId) -> Result<Option<StreakRecord>> {
        let rt = self.db.begin_read().map_err(StreakError::storage)?;
        let table = rt.open_table(STREAKS).map_err(StreakError::storage)?;
        let guard = table
            .get(user_id.as_str())
            .map_err(StreakError::storage)?;
        guard.map(|v| decode_record(v.value())).transpose()
    }

    fn upsert(&self, record: &StreakRecord) -> Result<()> {
        let value = serde_json::to_vec(record).map_err(StreakError::storage)?;
        let wt = self.db.begin_write().map_err(StreakError::storage)?;
        {
            let mut table = wt.open_table(STREAKS).map_err(StreakError::storage)?;
            table
                .insert(record.user_id.as_str(), value.as_slice())
                .map_err(StreakError::storage)?;
        }
        wt.commit().map_err(StreakError::storage)?;
        Ok(())
    }

    fn update(
        &self,
        user_id: &UserId,
        f: &mut dyn FnMut(Option<StreakRecord>) -> StreakRecord,
    ) -> Result<StreakRecord> {
        let wt = self.db.begin_write().map_err(StreakError::storage)?;
        let next = {
            let mut table = wt.open_table(STREAKS).map_err(StreakError::storage)?;
            let prior_bytes = table
                .get(user_id.as_str())
                .map_err(StreakError::storage)?
                .map(|v| v.value().to_vec());
            let prior = prior_bytes.as_deref().map(decode_record).transpose()?;
            let next = f(prior);
            let value = serde_json::to_vec(&next).map_err(StreakError::storage)?;
            table
                .insert(user_id.as_str(), value.as_slice())
                .map_err(StreakError::storage)?;
            next
        };
        // Dropping `wt` on any early return above aborts the transaction.
        wt.commit().map_err(StreakError::storage)?;
        Ok(next)
    }
}

impl ActivityLog for StreakDb {
    fn append(&self, entry: &ActivityEntry) -> Result<()> {
        let value = serde_json::to_vec(entry).map_err(StreakError::storage)?;
        let wt = self.db.begin_write().map_err(StreakError::storage)?;
        let seq = {
            let mut table = wt.open_table(ACTIVITY).map_err(StreakError::storage)?;
            let lower = day_lower_bound(&entry.user_id, entry.occurred_on);
            let upper = day_upper_bound(&entry.user_id, entry.occurred_on);
            let last_seq = match table
                .range(lower.as_slice()..=upper.as_slice())
                .map_err(StreakError::storage)?
                .next_back()
            {
                Some(last) => {
                    let (k, _) = last.map_err(StreakError::storage)?;
                    Some(key_seq(k.value())?)
                }
                None => None,
            };
            let seq = match last_seq {
                None => 0,
                Some(s) => s
                    .checked_add(1)
                    .ok_or_else(|| StreakError::storage("activity sequence exhausted for day"))?,
            };
            let key = activity_key(&entry.user_id, entry.occurred_on, seq);
            table
                .insert(key.as_slice(), value.as_slice())
                .map_err(StreakError::storage)?;
            seq
        };
        wt.commit().map_err(StreakError::storage)?;
        tracing::trace!(user_id = %entry.user_id, occurred_on = %entry.occurred_on, seq, "activity appended");
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
        let lower = day_lower_bound(user_id, from);
        let upper = day_upper_bound(user_id, to);
        let rt = self.db.begin_read().map_err(StreakError::storage)?;
        let table = rt.open_table(ACTIVITY).map_err(StreakError::storage)?;

        let mut out = Vec::new();
        for entry in table
            .range(lower.as_slice()..=upper.as_slice())
            .map_err(StreakError::storage)?
        {
            let (_, v) = entry.map_err(StreakError::storage)?;
            out.push(decode_entry(v.value())?);
        }
        Ok(out)
    }

    fn recent(&self, user_id: &UserId, limit: usize) -> Result<Vec<ActivityEntry>> {
        let lower = user_prefix(user_id);
        let upper = user_upper_bound(user_id);
        let rt = self.db.begin_read().map_err(StreakError::storage)?;
        let table = rt.open_table(ACTIVITY).map_err(StreakError::storage)?;

        let mut out = Vec::new();
        for entry in table
            .range(lower.as_slice()..=upper.as_slice())
            .map_err(StreakError::storage)?
            .rev()
            .take(limit)
        {
            let (_, v) = entry.map_err(StreakError::storage)?;
            out.push(decode_entry(v.value())?);
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
