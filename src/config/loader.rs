use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Config;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = ".checkgate.yaml";

/// Load `.checkgate.yaml` from `dir`, falling back to defaults when absent.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    load_file(&path)
}

/// Load and validate an explicit config file.
pub fn load_file(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    // An empty file deserializes to unit, not a map.
    let config: Config = if contents.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))?
    };
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

/// Resolve the config path: an explicit one wins, relative to `dir`.
pub fn resolve(dir: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(p) if p.is_absolute() => Some(p.to_path_buf()),
        Some(p) => Some(dir.join(p)),
        None => None,
    }
}
