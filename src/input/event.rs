//! Linux `struct input_event` in the host's native layout.
//!
//! The kernel stores the timestamp as two `long`s, so an event is 16 bytes
//! on 32-bit ARM (reMarkable 2) and 24 bytes on 64-bit targets.

use std::mem::size_of;
use std::time::Duration;

use evdevil::event::{EventType, InputEvent};

const WORD: usize = size_of::<libc::c_long>();

/// Size of struct input_event on this target (timeval + type 2 + code 2 + value 4).
pub const INPUT_EVENT_SIZE: usize = 2 * WORD + 8;

pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_ABS: u16 = 0x03;
pub const SYN_REPORT: u16 = 0;

pub const ABS_X: u16 = 0x00;
pub const ABS_Y: u16 = 0x01;
pub const ABS_PRESSURE: u16 = 0x18; // 24

pub const BTN_TOOL_PEN: u16 = 0x140; // 320, proximity
pub const BTN_TOUCH: u16 = 0x14a; // 330

/// One (type, code, value) triple as the digitizer would report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareEvent {
    pub ty: u16,
    pub code: u16,
    pub value: i32,
}

impl HardwareEvent {
    pub const fn new(ty: u16, code: u16, value: i32) -> Self {
        Self { ty, code, value }
    }

    pub const fn abs(code: u16, value: i32) -> Self {
        Self::new(EV_ABS, code, value)
    }

    pub const fn key(code: u16, pressed: bool) -> Self {
        Self::new(EV_KEY, code, pressed as i32)
    }

    pub const fn sync() -> Self {
        Self::new(EV_SYN, SYN_REPORT, 0)
    }

    pub fn is_sync(&self) -> bool {
        self.ty == EV_SYN && self.code == SYN_REPORT
    }

    /// Write the event into `dst`, which must hold exactly one event.
    pub fn write_to(&self, dst: &mut [u8], time: Duration) {
        debug_assert_eq!(dst.len(), INPUT_EVENT_SIZE);
        let secs = time.as_secs() as libc::c_long;
        let micros = time.subsec_micros() as libc::c_long;
        dst[..WORD].copy_from_slice(&secs.to_ne_bytes());
        dst[WORD..2 * WORD].copy_from_slice(&micros.to_ne_bytes());
        dst[2 * WORD..2 * WORD + 2].copy_from_slice(&self.ty.to_ne_bytes());
        dst[2 * WORD + 2..2 * WORD + 4].copy_from_slice(&self.code.to_ne_bytes());
        dst[2 * WORD + 4..INPUT_EVENT_SIZE].copy_from_slice(&self.value.to_ne_bytes());
    }
}

impl From<&InputEvent> for HardwareEvent {
    fn from(ev: &InputEvent) -> Self {
        HardwareEvent::new(ev.event_type().raw(), ev.raw_code(), ev.raw_value())
    }
}

/// Parse one input_event from the front of `buf`.
/// Returns None if buffer is too short.
pub fn parse_input_event(buf: &[u8]) -> Option<InputEvent> {
    if buf.len() < INPUT_EVENT_SIZE {
        return None;
    }
    let at = 2 * WORD;
    let ty = u16::from_ne_bytes([buf[at], buf[at + 1]]);
    let code = u16::from_ne_bytes([buf[at + 2], buf[at + 3]]);
    let value = i32::from_ne_bytes([buf[at + 4], buf[at + 5], buf[at + 6], buf[at + 7]]);
    Some(InputEvent::new(EventType::from_raw(ty), code, value))
}

/// Human-readable event name for trace logs.
pub fn code_name(ty: u16, code: u16) -> String {
    match (ty, code) {
        (EV_SYN, SYN_REPORT) => "SYN_REPORT".into(),
        (EV_KEY, BTN_TOOL_PEN) => "BTN_TOOL_PEN".into(),
        (EV_KEY, BTN_TOUCH) => "BTN_TOUCH".into(),
        (EV_KEY, _) => format!("KEY/{}", code),
        (EV_ABS, ABS_X) => "ABS_X".into(),
        (EV_ABS, ABS_Y) => "ABS_Y".into(),
        (EV_ABS, ABS_PRESSURE) => "ABS_PRESSURE".into(),
        (EV_ABS, _) => format!("ABS/{}", code),
        _ => format!("type{} code{}", ty, code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdevil::event::{Abs, Key};

    #[test]
    fn test_codes_match_evdev() {
        assert_eq!(ABS_X, Abs::X.raw());
        assert_eq!(ABS_Y, Abs::Y.raw());
        assert_eq!(ABS_PRESSURE, Abs::PRESSURE.raw());
        assert_eq!(BTN_TOOL_PEN, Key::BTN_TOOL_PEN.raw());
        assert_eq!(BTN_TOUCH, Key::BTN_TOUCH.raw());
    }

    #[test]
    fn test_event_size_matches_kernel_layout() {
        assert_eq!(INPUT_EVENT_SIZE, size_of::<libc::input_event>());
    }

    #[test]
    fn test_write_then_parse() {
        let ev = HardwareEvent::abs(ABS_PRESSURE, 2000);
        let mut buf = vec![0u8; INPUT_EVENT_SIZE];
        ev.write_to(&mut buf, Duration::new(1_700_000_000, 250_000_000));

        let parsed = parse_input_event(&buf).unwrap();
        assert_eq!(HardwareEvent::from(&parsed), ev);
        assert_eq!(&buf[..WORD], &(1_700_000_000 as libc::c_long).to_ne_bytes());
        assert_eq!(&buf[WORD..2 * WORD], &(250_000 as libc::c_long).to_ne_bytes());
    }

    #[test]
    fn test_short_buffer() {
        assert!(parse_input_event(&[0u8; 4]).is_none());
    }

    #[test]
    fn test_code_name() {
        assert_eq!(code_name(EV_SYN, SYN_REPORT), "SYN_REPORT");
        assert_eq!(code_name(EV_ABS, ABS_PRESSURE), "ABS_PRESSURE");
        assert_eq!(code_name(EV_KEY, 0x14b), "KEY/331");
    }
}
