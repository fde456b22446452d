use anyhow::Context;
use std::path::Path;
use streak_core::config::Config;
use streak_core::store::StreakDb;
use streak_core::{io, paths};

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing streak in: {}", root.display());

    let dir = paths::streak_dir(root);
    std::fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config_yaml =
        serde_yaml::to_string(&Config::default()).context("failed to render config.yaml")?;
    if io::write_if_missing(&paths::config_path(root), config_yaml.as_bytes())
        .context("failed to write config.yaml")?
    {
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    let db_existed = paths::db_path(root).exists();
    StreakDb::open_in(root).context("failed to create streak database")?;
    if db_existed {
        println!("  exists:  {}", paths::DB_FILE);
    } else {
        println!("  created: {}", paths::DB_FILE);
    }

    Ok(())
}
