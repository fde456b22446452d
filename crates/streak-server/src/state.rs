use std::path::PathBuf;
use std::sync::Arc;

use streak_core::config::Config;
use streak_core::progress::ProgressService;
use streak_core::store::StreakDb;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub progress: Arc<ProgressService<StreakDb>>,
}

impl AppState {
    /// Load `.streak/config.yaml` and open the database under `root`.
    pub fn open(root: PathBuf) -> streak_core::Result<Self> {
        let config = Config::load(&root)?;
        let db = StreakDb::open_in(&root)?;
        Ok(Self::new(root, config, db))
    }

    pub fn new(root: PathBuf, config: Config, db: StreakDb) -> Self {
        Self {
            root,
            config: Arc::new(config),
            progress: Arc::new(ProgressService::new(db)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_uninitialized_root_fails() {
        let dir = TempDir::new().unwrap();
        let err = AppState::open(dir.path().to_path_buf()).err().unwrap();
        assert!(matches!(err, streak_core::StreakError::NotInitialized));
    }

    #[test]
    fn open_initialized_root() {
        let dir = TempDir::new().unwrap();
        Config::default().save(dir.path()).unwrap();
        let state = AppState::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(state.root, dir.path());
        assert_eq!(state.config.server.port, 3141);
    }
}
