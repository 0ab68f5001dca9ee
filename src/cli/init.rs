//! Init command implementation

use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::info;

use pushjobs::config::Config;

/// Write the default configuration to `.pushjobs/config.toml`
pub async fn init_command(work_dir: &Path, force: bool) -> Result<()> {
    let config_dir = work_dir.join(".pushjobs");
    let config_path = config_dir.join("config.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;
    std::fs::write(&config_path, Config::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    info!("Created config file: {}", config_path.display());
    Ok(())
}
