use crate::output::{or_dash, print_json};
use anyhow::Context;
use std::path::Path;
use streak_core::StreakError;

pub fn run(root: &Path, user: &str, json: bool) -> anyhow::Result<()> {
    let user_id = super::user(user)?;
    let (_, service) = super::open_project(root)?;

    let record = service
        .tracker()
        .get(&user_id)
        .context("failed to read streak record")?
        .ok_or_else(|| StreakError::StreakNotFound(user_id.to_string()))?;

    if json {
        return print_json(&record);
    }

    println!("Streak for '{}':", record.user_id);
    println!("  current:  {}", record.current_streak);
    println!("  longest:  {}", record.longest_streak);
    println!("  total:    {}", record.total_completed);
    println!("  last day: {}", or_dash(record.last_activity_date));
    Ok(())
}
