use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use streak_core::error::StreakError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Task join failure from `spawn_blocking`.
    pub fn join(err: tokio::task::JoinError) -> Self {
        Self(anyhow::anyhow!("task join error: {err}"))
    }
}

fn status_for(err: &StreakError) -> StatusCode {
    match err {
        StreakError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StreakError::StreakNotFound(_) => StatusCode::NOT_FOUND,
        StreakError::InvalidDate(_)
        | StreakError::InvalidUserId(_)
        | StreakError::InvalidMood(_)
        | StreakError::NotInitialized => StatusCode::BAD_REQUEST,
        StreakError::Io(_) | StreakError::Yaml(_) | StreakError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self
            .0
            .downcast_ref::<StreakError>()
            .map(status_for)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
