//! Command implementations.

mod info;
mod send;
mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::ReportingConfig;

use crate::error::CliError;

pub use info::run_info;
pub use send::run_send;
pub use validate::run_validate;

/// Load and validate a configuration file
fn load_config(path: &Path) -> Result<ReportingConfig> {
    ensure_exists(path)?;
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Parse a configuration file, leaving validation to the caller
fn parse_config(path: &Path) -> Result<ReportingConfig> {
    ensure_exists(path)?;
    config_loader::ConfigLoader::parse_from_path(path)
        .with_context(|| format!("Failed to parse config from {}", path.display()))
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }
    Ok(())
}
