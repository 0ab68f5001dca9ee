//! CLI command implementations

pub mod init;
pub mod intermittent;
pub mod nav;
pub mod show;
pub mod task_run;

use anyhow::{Context, Result};
use std::path::Path;

use pushjobs::PushData;

/// Load and enrich a push data file
pub fn load_push(path: &Path) -> Result<PushData> {
    PushData::from_file(path)
        .with_context(|| format!("Failed to load push data: {}", path.display()))
}
