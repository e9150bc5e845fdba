mod file;

pub use file::{FileConfig, CONFIG_ENV};

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::device::DeviceProfile;
use crate::error::ConfigError;
use crate::suppress::DEFAULT_WINDOW;
use crate::transform::TransformConfig;

/// Well-known command FIFO.
pub const DEFAULT_FIFO_PATH: &str = "/tmp/rm2_inject";

/// What a suppressed genuine read returns to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuppressedRead {
    /// Drop the data and read again.
    #[default]
    Reissue,
    /// Drop the data and report 0 bytes.
    Empty,
}

/// Device profile merged with the optional TOML overlay.
#[derive(Debug, Clone)]
pub struct Config {
    pub fifo_path: PathBuf,
    pub device_path: PathBuf,
    pub device_name: String,
    pub suppression: Duration,
    pub suppressed_read: SuppressedRead,
    pub emit_touch_key: bool,
    pub transform: TransformConfig,
    pub pressure_min: i32,
    pub pressure_max: i32,
    /// Pressure reported while the synthetic pen is down.
    pub pressure: i32,
}

impl Config {
    /// Load the first config file found and merge it over `device`.
    pub fn load(device: &DeviceProfile) -> Self {
        let file_config = file::load_from_default_paths().unwrap_or_default();
        Self::merge(device, file_config)
    }

    pub fn from_profile(device: &DeviceProfile) -> Self {
        Self::merge(device, FileConfig::default())
    }

    pub fn from_toml(device: &DeviceProfile, content: &str) -> Result<Self, toml::de::Error> {
        Ok(Self::merge(device, file::parse(content)?))
    }

    fn merge(device: &DeviceProfile, file: FileConfig) -> Self {
        let cal = file.calibration;
        let base = device.transform();

        Self {
            fifo_path: file.fifo_path.unwrap_or_else(|| DEFAULT_FIFO_PATH.into()),
            device_path: file.device_path.unwrap_or_else(|| device.pen_device.into()),
            device_name: file.device_name.unwrap_or_else(|| device.pen_name_hint.into()),
            suppression: file
                .suppression_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_WINDOW),
            suppressed_read: file.suppressed_read.unwrap_or_default(),
            emit_touch_key: file.emit_touch_key,
            transform: TransformConfig {
                display_width: cal.display_width.unwrap_or(base.display_width),
                display_height: cal.display_height.unwrap_or(base.display_height),
                x_min: cal.x_min.unwrap_or(base.x_min),
                x_max: cal.x_max.unwrap_or(base.x_max),
                y_min: cal.y_min.unwrap_or(base.y_min),
                y_max: cal.y_max.unwrap_or(base.y_max),
                swap_axes: cal.swap_axes.unwrap_or(base.swap_axes),
                invert_x: cal.invert_x.unwrap_or(base.invert_x),
                invert_y: cal.invert_y.unwrap_or(base.invert_y),
            },
            pressure_min: cal.pressure_min.unwrap_or(0),
            pressure_max: cal.pressure_max.unwrap_or(device.pen_pressure_max),
            pressure: cal.pressure.unwrap_or(device.pen_pressure_default),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.transform;
        if t.x_min >= t.x_max {
            return Err(ConfigError::EmptyAxis { axis: "x", min: t.x_min, max: t.x_max });
        }
        if t.y_min >= t.y_max {
            return Err(ConfigError::EmptyAxis { axis: "y", min: t.y_min, max: t.y_max });
        }
        if t.display_width <= 0 || t.display_height <= 0 {
            return Err(ConfigError::InvalidDisplay {
                width: t.display_width,
                height: t.display_height,
            });
        }
        if self.pressure <= self.pressure_min || self.pressure > self.pressure_max {
            return Err(ConfigError::InvalidPressure {
                pressure: self.pressure,
                min: self.pressure_min,
                max: self.pressure_max,
            });
        }
        if self.fifo_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("fifo"));
        }
        if self.device_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("device"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RM2;

    #[test]
    fn test_profile_defaults() {
        let config = Config::from_profile(&RM2);
        assert!(config.validate().is_ok());
        assert_eq!(config.fifo_path, PathBuf::from("/tmp/rm2_inject"));
        assert_eq!(config.device_path, PathBuf::from("/dev/input/event1"));
        assert_eq!(config.device_name, "Wacom");
        assert_eq!(config.suppression, Duration::from_millis(150));
        assert_eq!(config.suppressed_read, SuppressedRead::Reissue);
        assert_eq!(config.pressure, 2000);
        assert_eq!(config.transform, RM2.transform());
    }

    #[test]
    fn test_toml_overrides() {
        let config = Config::from_toml(
            &RM2,
            r#"
            fifo_path = "/run/pen"
            suppression_ms = 80
            suppressed_read = "empty"
            emit_touch_key = true

            [calibration]
            x_max = 20966
            invert_x = false
            pressure = 1500
            "#,
        )
        .unwrap();

        assert_eq!(config.fifo_path, PathBuf::from("/run/pen"));
        assert_eq!(config.suppression, Duration::from_millis(80));
        assert_eq!(config.suppressed_read, SuppressedRead::Empty);
        assert!(config.emit_touch_key);
        assert_eq!(config.transform.x_max, 20966);
        assert!(!config.transform.invert_x);
        assert_eq!(config.transform.x_min, 211);
        assert_eq!(config.pressure, 1500);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Config::from_toml(&RM2, "fifo = \"/tmp/x\"").is_err());
        assert!(Config::from_toml(&RM2, "[calibration]\nwidth = 3").is_err());
    }

    #[test]
    fn test_validate_rejects_empty_axis() {
        let mut config = Config::from_profile(&RM2);
        config.transform.y_min = config.transform.y_max;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyAxis { axis: "y", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_display_and_pressure() {
        let mut config = Config::from_profile(&RM2);
        config.transform.display_width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDisplay { .. })));

        let mut config = Config::from_profile(&RM2);
        config.pressure = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPressure { .. })));

        let mut config = Config::from_profile(&RM2);
        config.pressure = 5000;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPressure { .. })));
    }
}
