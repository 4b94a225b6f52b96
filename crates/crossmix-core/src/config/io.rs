//! YAML load/save for any serde type

use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Parse a YAML file into `T`; `Ok(None)` when the file does not exist
pub fn read_config<T>(path: &Path) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {:?}", path)),
    };

    serde_yaml::from_str(&contents)
        .map(Some)
        .with_context(|| format!("Invalid YAML in {:?}", path))
}

/// Read a YAML file into `T`, never failing
///
/// Missing, unreadable and malformed files all yield `T::default()`; the
/// latter two with a warning, so a bad edit never keeps the player from
/// starting.
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    match read_config(path) {
        Ok(Some(config)) => {
            log::info!("load_config: loaded {:?}", path);
            config
        }
        Ok(None) => {
            log::info!("load_config: {:?} not found, using defaults", path);
            T::default()
        }
        Err(e) => {
            log::warn!("load_config: {:#}, using defaults", e);
            T::default()
        }
    }
}

/// Write `config` as YAML, creating parent directories
///
/// The file is written next to its destination and renamed into place, so
/// a crash mid-write leaves the previous config intact.
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    let staging = path.with_extension("yaml.partial");
    std::fs::write(&staging, yaml).with_context(|| format!("Failed to write {:?}", staging))?;
    std::fs::rename(&staging, path)
        .with_context(|| format!("Failed to move config into place: {:?}", path))?;

    log::info!("save_config: wrote {:?}", path);
    Ok(())
}
