pub mod config;
pub mod history;
pub mod init;
pub mod progress;
pub mod record;
pub mod serve;
pub mod show;

use anyhow::Context;
use chrono::NaiveDate;
use std::path::Path;
use streak_core::config::Config;
use streak_core::progress::ProgressService;
use streak_core::store::StreakDb;
use streak_core::types::{parse_date, UserId};

/// Load config and open the project database.
pub(crate) fn open_project(root: &Path) -> anyhow::Result<(Config, ProgressService<StreakDb>)> {
    let config = Config::load(root).context("failed to load config")?;
    let db = StreakDb::open_in(root).context("failed to open streak database")?;
    Ok((config, ProgressService::new(db)))
}

/// Parse an explicit `YYYY-MM-DD`, or take today in the configured timezone.
pub(crate) fn day_or_today(config: &Config, raw: Option<&str>) -> anyhow::Result<NaiveDate> {
    match raw {
        Some(raw) => Ok(parse_date(raw)?),
        None => Ok(config.today(chrono::Utc::now())),
    }
}

pub(crate) fn user(raw: &str) -> anyhow::Result<UserId> {
    Ok(UserId::parse(raw)?)
}
