use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreakError {
    #[error("not initialized: run 'streak init'")]
    NotInitialized,

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid user id '{0}': must be 1-128 chars of [A-Za-z0-9_.:@-]")]
    InvalidUserId(String),

    #[error("invalid mood rating {0}: must be between 1 and 10")]
    InvalidMood(u8),

    #[error("no streak record for user: {0}")]
    StreakNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl StreakError {
    /// Wrap any backend failure as `StorageUnavailable`.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        StreakError::StorageUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StreakError>;
