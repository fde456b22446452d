/// Encouragement line shown next to the current streak.
pub fn encouragement(current_streak: u32) -> String {
    match current_streak {
        0 => "Start your first activity to begin a streak!".to_string(),
        1 => "Great start! Keep it going tomorrow.".to_string(),
        n @ 2..=6 => format!("{n} days strong! Can you make it a week?"),
        n @ 7..=29 => format!("{n} days! You're building a great habit."),
        n => format!("{n} days! You're on fire!"),
    }
}
