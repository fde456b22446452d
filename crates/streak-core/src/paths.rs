use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const STREAK_DIR: &str = ".streak";
pub const CONFIG_FILE: &str = ".streak/config.yaml";
pub const DB_FILE: &str = ".streak/streak.db";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn streak_dir(root: &Path) -> PathBuf {
    root.join(STREAK_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn db_path(root: &Path) -> PathBuf {
    root.join(DB_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(streak_dir(root), PathBuf::from("/tmp/proj/.streak"));
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.streak/config.yaml")
        );
        assert_eq!(db_path(root), PathBuf::from("/tmp/proj/.streak/streak.db"));
    }
}
