//! Location of the settings file.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// File name of the settings file inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".chatgpt_config.json";

/// Returns the path of the settings file, `~/.chatgpt_config.json`.
pub fn config_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(CONFIG_FILE_NAME))
}

/// Returns the user's home directory.
fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}
