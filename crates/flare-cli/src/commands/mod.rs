pub mod batch;
pub mod config;
pub mod evaluate;
pub mod generate;
pub mod info;

use std::path::Path;

use anyhow::{Context, Result};
use flare_core::config::FlareConfig;

/// Overlay a TOML config file on `base`; keys the file leaves out keep
/// their preset or default values.
pub fn overlay_config_file(base: &FlareConfig, path: &Path) -> Result<FlareConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    base.merged_with_toml(&contents)
        .with_context(|| format!("Invalid config {}", path.display()))
}
