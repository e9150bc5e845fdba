//! Logical (display pixel) to digitizer coordinate mapping.

/// Calibration for one digitizer / display pairing.
///
/// With `swap_axes` set, logical Y drives hardware X and logical X drives
/// hardware Y. Each inverted hardware axis counts down from its maximum
/// instead of up from its minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformConfig {
    pub display_width: i32,
    pub display_height: i32,
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
    pub swap_axes: bool,
    pub invert_x: bool,
    pub invert_y: bool,
}

impl TransformConfig {
    /// Map logical coordinates onto the sensor, clamping into the hardware range.
    pub fn transform(&self, x: i32, y: i32) -> (i32, i32) {
        let (src_x, extent_x, src_y, extent_y) = if self.swap_axes {
            (y, self.display_height, x, self.display_width)
        } else {
            (x, self.display_width, y, self.display_height)
        };

        let hw_x = scale(src_x, extent_x, self.x_min, self.x_max, self.invert_x);
        let hw_y = scale(src_y, extent_y, self.y_min, self.y_max, self.invert_y);
        (hw_x, hw_y)
    }

    /// True when the logical point lies on the display.
    pub fn on_display(&self, x: i32, y: i32) -> bool {
        (0..self.display_width).contains(&x) && (0..self.display_height).contains(&y)
    }
}

// i64 keeps `src * span` from overflowing for out-of-range producer input.
fn scale(src: i32, extent: i32, min: i32, max: i32, invert: bool) -> i32 {
    let span = i64::from(max) - i64::from(min);
    let offset = i64::from(src) * span / i64::from(extent.max(1));
    let value = if invert {
        i64::from(max) - offset
    } else {
        i64::from(min) + offset
    };
    value.clamp(i64::from(min), i64::from(max)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rm2() -> TransformConfig {
        TransformConfig {
            display_width: 1404,
            display_height: 1872,
            x_min: 211,
            x_max: 20820,
            y_min: 90,
            y_max: 15712,
            swap_axes: true,
            invert_x: true,
            invert_y: false,
        }
    }

    #[test]
    fn test_corners_map_to_bounds() {
        let t = rm2();
        assert_eq!(t.transform(0, 0), (20820, 90));
        assert_eq!(t.transform(1404, 1872), (211, 15712));
        assert_eq!(t.transform(1404, 0), (20820, 15712));
        assert_eq!(t.transform(0, 1872), (211, 90));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let t = rm2();
        assert_eq!(t.transform(-50, -50), (20820, 90));
        assert_eq!(t.transform(5000, 9000), (211, 15712));
        assert_eq!(t.transform(i32::MAX, i32::MIN), (20820, 15712));
    }

    #[test]
    fn test_unswapped_uninverted() {
        let t = TransformConfig {
            swap_axes: false,
            invert_x: false,
            invert_y: true,
            ..rm2()
        };
        assert_eq!(t.transform(0, 0), (211, 15712));
        assert_eq!(t.transform(702, 936), (211 + 702 * 20609 / 1404, 15712 - 936 * 15622 / 1872));
    }

    #[test]
    fn test_on_display() {
        let t = rm2();
        assert!(t.on_display(0, 0));
        assert!(t.on_display(1403, 1871));
        assert!(!t.on_display(1404, 10));
        assert!(!t.on_display(10, -1));
    }

    proptest! {
        #[test]
        fn prop_display_points_stay_in_hardware_range(x in 0i32..1404, y in 0i32..1872) {
            let t = rm2();
            let (hx, hy) = t.transform(x, y);
            prop_assert!((t.x_min..=t.x_max).contains(&hx));
            prop_assert!((t.y_min..=t.y_max).contains(&hy));
        }

        #[test]
        fn prop_any_input_is_clamped(x in any::<i32>(), y in any::<i32>(), swap in any::<bool>(), ix in any::<bool>(), iy in any::<bool>()) {
            let t = TransformConfig { swap_axes: swap, invert_x: ix, invert_y: iy, ..rm2() };
            let (hx, hy) = t.transform(x, y);
            prop_assert!((t.x_min..=t.x_max).contains(&hx));
            prop_assert!((t.y_min..=t.y_max).contains(&hy));
        }
    }
}
