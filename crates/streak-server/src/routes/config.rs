use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config — the loaded project configuration and its warnings.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(serde_json::json!({
        "version": app.config.version,
        "tracker": app.config.tracker,
        "server": app.config.server,
        "warnings": app.config.validate(),
    })))
}
