use crate::output::{or_dash, print_json};
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, user: &str, today: Option<&str>, json: bool) -> anyhow::Result<()> {
    let user_id = super::user(user)?;
    let (config, service) = super::open_project(root)?;
    let today = super::day_or_today(&config, today)?;

    let summary = service
        .summary(&user_id, today)
        .context("failed to build progress summary")?;

    if json {
        return print_json(&summary);
    }

    let r = &summary.record;
    println!("Progress for '{user_id}' as of {today}:");
    println!("  {}", summary.message);
    println!(
        "  streak: {}  personal best: {}  total: {}",
        r.current_streak, r.longest_streak, r.total_completed
    );
    println!(
        "  this week: {}  this month: {}",
        summary.completed_this_week, summary.completed_this_month
    );
    println!("  last day: {}", or_dash(r.last_activity_date));
    if let Some(change) = summary.latest_mood_change {
        println!("  latest mood change: {change:+}");
    }
    Ok(())
}
