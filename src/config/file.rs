use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::SuppressedRead;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RM_INJECT_CONFIG";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub fifo_path: Option<PathBuf>,
    pub device_path: Option<PathBuf>,
    pub device_name: Option<String>,
    pub suppression_ms: Option<u64>,
    pub suppressed_read: Option<SuppressedRead>,
    #[serde(default)]
    pub emit_touch_key: bool,
    #[serde(default)]
    pub calibration: Calibration,
}

/// Overrides for the compiled-in device profile.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Calibration {
    pub display_width: Option<i32>,
    pub display_height: Option<i32>,
    pub x_min: Option<i32>,
    pub x_max: Option<i32>,
    pub y_min: Option<i32>,
    pub y_max: Option<i32>,
    pub swap_axes: Option<bool>,
    pub invert_x: Option<bool>,
    pub invert_y: Option<bool>,
    pub pressure_min: Option<i32>,
    pub pressure_max: Option<i32>,
    pub pressure: Option<i32>,
}

pub fn parse(content: &str) -> Result<FileConfig, toml::de::Error> {
    toml::from_str(content)
}

pub fn load_from_path(path: &Path) -> Option<FileConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match parse(&content) {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

pub fn load_from_default_paths() -> Option<FileConfig> {
    for path in default_config_paths() {
        if path.exists() {
            if let Some(config) = load_from_path(&path) {
                return Some(config);
            }
        }
    }
    None
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        paths.push(PathBuf::from(path));
    }

    paths.push(PathBuf::from("/etc/rm-inject.toml"));

    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".config").join("rm-inject.toml"));
    }

    paths
}
