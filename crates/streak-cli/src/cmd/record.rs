use crate::output::{or_dash, print_json};
use anyhow::Context;
use std::path::Path;
use streak_core::activity::EntryDetails;

pub fn run(
    root: &Path,
    user: &str,
    on: Option<&str>,
    details: EntryDetails,
    json: bool,
) -> anyhow::Result<()> {
    let user_id = super::user(user)?;
    let (config, service) = super::open_project(root)?;
    let occurred_on = super::day_or_today(&config, on)?;

    let completion = service
        .complete_with(&user_id, occurred_on, details)
        .with_context(|| format!("failed to record completion for '{user_id}'"))?;

    if json {
        return print_json(&completion);
    }

    let r = &completion.record;
    println!(
        "Recorded {user_id} on {occurred_on} ({})",
        completion.transition
    );
    println!(
        "  streak: {}  longest: {}  total: {}  last: {}",
        r.current_streak,
        r.longest_streak,
        r.total_completed,
        or_dash(r.last_activity_date),
    );
    if let Some(activity) = &completion.entry.activity {
        println!("  activity: {activity}");
    }
    if let Some(change) = completion.entry.mood_change() {
        println!("  mood change: {change:+}");
    }
    Ok(())
}
