//! Default file locations

use std::path::PathBuf;

const APP_DIR: &str = "crossmix";

/// `<config dir>/crossmix/config.yaml`
///
/// Falls back to the working directory on platforms without a config dir.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.yaml")
}

/// `<data dir>/crossmix/mixes.yaml`
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("mixes.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_live_under_app_dir() {
        let config = default_config_path();
        assert!(config.ends_with("crossmix/config.yaml"));
        let store = default_store_path();
        assert!(store.ends_with("crossmix/mixes.yaml"));
    }
}
