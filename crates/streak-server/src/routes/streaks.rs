use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use streak_core::activity::EntryDetails;
use streak_core::types::{parse_date, UserId};
use streak_core::StreakError;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CompletionBody {
    /// `YYYY-MM-DD`; defaults to today in the configured reference timezone.
    #[serde(default)]
    pub occurred_on: Option<String>,
    #[serde(default)]
    pub mood_before: Option<u8>,
    #[serde(default)]
    pub mood_after: Option<u8>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// GET /api/users/{user_id}/streak — the stored streak record.
pub async fn get_streak(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = UserId::parse(user_id)?;
    let progress = app.progress.clone();
    let record = tokio::task::spawn_blocking(move || {
        progress
            .tracker()
            .get(&user_id)?
            .ok_or_else(|| StreakError::StreakNotFound(user_id.to_string()))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(serde_json::to_value(record)?))
}

/// POST /api/users/{user_id}/completions — record one qualifying activity.
///
/// The body is optional; a request without a Content-Type header records a
/// completion for the configured today.
pub async fn record_completion(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
    body: Option<Json<CompletionBody>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = UserId::parse(user_id)?;
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let occurred_on = match body.occurred_on.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => app.config.today(chrono::Utc::now()),
    };

    let progress = app.progress.clone();
    let completion = tokio::task::spawn_blocking(move || {
        let details = EntryDetails {
            mood_before: body.mood_before,
            mood_after: body.mood_after,
            activity: body.activity,
            notes: body.notes,
        };
        progress.complete_with(&user_id, occurred_on, details)
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(serde_json::to_value(completion)?))
}
