use anyhow::{Context, Result};
use std::path::Path;
use user_search::config::Config;

pub mod find;
pub mod serve;

/// Load configuration from an explicit file, or from the standard locations
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Config::load().context("Failed to load configuration"),
    }
}
