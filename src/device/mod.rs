mod matcher;
mod rm2;

pub use matcher::DeviceMatcher;
pub use rm2::RM2;

use crate::transform::TransformConfig;

/// Device-specific calibration constants.
#[derive(Debug, Clone, Copy)]
pub struct DeviceProfile {
    pub name: &'static str,

    // Display panel in logical pixels
    pub display_width: i32,
    pub display_height: i32,

    // Pen digitizer ranges and orientation against the panel
    pub pen_x_min: i32,
    pub pen_x_max: i32,
    pub pen_y_min: i32,
    pub pen_y_max: i32,
    pub swap_axes: bool,
    pub invert_x: bool,
    pub invert_y: bool,

    pub pen_pressure_max: i32,
    pub pen_pressure_default: i32,

    // Digitizer evdev node and a substring of its reported name
    pub pen_device: &'static str,
    pub pen_name_hint: &'static str,
}

impl DeviceProfile {
    /// Profile compiled into the hook.
    pub fn current() -> &'static Self {
        &RM2
    }

    pub fn transform(&self) -> TransformConfig {
        TransformConfig {
            display_width: self.display_width,
            display_height: self.display_height,
            x_min: self.pen_x_min,
            x_max: self.pen_x_max,
            y_min: self.pen_y_min,
            y_max: self.pen_y_max,
            swap_axes: self.swap_axes,
            invert_x: self.invert_x,
            invert_y: self.invert_y,
        }
    }
}
