use crate::output::{or_dash, print_json, print_table};
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, user: &str, limit: usize, json: bool) -> anyhow::Result<()> {
    let user_id = super::user(user)?;
    let (_, service) = super::open_project(root)?;

    let entries = service
        .history(&user_id, limit)
        .context("failed to read activity history")?;

    if json {
        let value = serde_json::json!({
            "user_id": user_id,
            "entries": entries,
        });
        return print_json(&value);
    }

    if entries.is_empty() {
        println!("No activity for '{user_id}'.");
        return Ok(());
    }

    let rows = entries
        .iter()
        .map(|e| {
            vec![
                e.occurred_on.to_string(),
                or_dash(e.activity.as_deref()),
                or_dash(e.mood_before),
                or_dash(e.mood_after),
                e.mood_change()
                    .map(|c| format!("{c:+}"))
                    .unwrap_or_else(|| "-".to_string()),
                or_dash(e.notes.as_deref()),
            ]
        })
        .collect();
    print_table(
        &["DAY", "ACTIVITY", "MOOD BEFORE", "MOOD AFTER", "CHANGE", "NOTES"],
        rows,
    );
    Ok(())
}
