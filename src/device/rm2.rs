use super::DeviceProfile;

/// reMarkable 2 calibration.
///
/// Hardware bounds are the sensor values recorded at the four display
/// corners; the Wacom sensor is rotated 90° against the panel with its X
/// axis running bottom to top.
pub const RM2: DeviceProfile = DeviceProfile {
    name: "reMarkable 2",

    // Portrait panel, pixels
    display_width: 1404,
    display_height: 1872,

    // Pen digitizer (from corner captures)
    pen_x_min: 211,
    pen_x_max: 20820,
    pen_y_min: 90,
    pen_y_max: 15712,
    swap_axes: true,
    invert_x: true,
    invert_y: false,

    pen_pressure_max: 4095,
    pen_pressure_default: 2000,

    pen_device: "/dev/input/event1",
    pen_name_hint: "Wacom",
};
