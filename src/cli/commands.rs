use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::db::Store;

/// Writes the default configuration to `path` (or `./config.toml`).
pub fn init(path: Option<&Path>, force: bool) -> Result<()> {
    let path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);

    if path.exists() && !force {
        println!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }

    Config::default().save_to_path(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

/// Validates the configuration and opens the database, running migrations.
pub async fn check(config: &Config) -> Result<()> {
    config.validate()?;
    println!("Configuration OK");

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
    .context("Failed to open database")?;
    store.ping().await?;

    println!("Database OK ({})", config.general.database_path);
    Ok(())
}
