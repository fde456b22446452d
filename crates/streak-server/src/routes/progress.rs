use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use streak_core::types::{parse_date, UserId};

use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_ACTIVITY_LIMIT: usize = 20;
const MAX_ACTIVITY_LIMIT: usize = 500;

#[derive(Debug, Default, Deserialize)]
pub struct ProgressQuery {
    #[serde(default)]
    pub today: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// GET /api/users/{user_id}/progress — counters, 7/30-day counts, message.
pub async fn get_progress(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = UserId::parse(user_id)?;
    let today = match query.today.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => app.config.today(chrono::Utc::now()),
    };

    let progress = app.progress.clone();
    let summary = tokio::task::spawn_blocking(move || progress.summary(&user_id, today))
        .await
        .map_err(AppError::join)??;

    Ok(Json(serde_json::to_value(summary)?))
}

/// GET /api/users/{user_id}/activity — newest activity entries first.
pub async fn get_activity(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = UserId::parse(user_id)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .min(MAX_ACTIVITY_LIMIT);

    let progress = app.progress.clone();
    let entries = tokio::task::spawn_blocking(move || {
        let entries = progress.history(&user_id, limit)?;
        Ok::<_, streak_core::StreakError>(serde_json::json!({
            "user_id": user_id,
            "entries": entries,
        }))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(entries))
}
