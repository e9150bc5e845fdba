//! The substitute for `read()` on the digitizer.
//!
//! Pending synthetic events win over the hardware. Otherwise the real read
//! runs unchanged, and whatever it returns is handed back untouched unless
//! it carries data inside the suppression window.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::config::SuppressedRead;
use crate::context::HookContext;
use crate::input::{code_name, parse_input_event, HardwareEvent, ABS_X, ABS_Y, EV_ABS, INPUT_EVENT_SIZE};
use crate::queue::EventReceiver;

/// The genuine device read the boundary wraps.
pub trait RawDeviceReader {
    /// Same contract as `read(2)`: byte count, 0, or -1 with errno set.
    fn read(&mut self, buf: &mut [u8]) -> isize;
}

/// Last pen position the host actually received from the hardware.
#[derive(Debug, Default)]
pub struct CursorTracker {
    seen: AtomicBool,
    x: AtomicI32,
    y: AtomicI32,
}

impl CursorTracker {
    /// Record ABS_X / ABS_Y from a buffer of raw events.
    pub fn observe(&self, bytes: &[u8]) {
        for chunk in bytes.chunks_exact(INPUT_EVENT_SIZE) {
            let Some(ev) = parse_input_event(chunk) else {
                continue;
            };
            if ev.event_type().raw() != EV_ABS {
                continue;
            }
            match ev.raw_code() {
                ABS_X => self.x.store(ev.raw_value(), Ordering::Relaxed),
                ABS_Y => self.y.store(ev.raw_value(), Ordering::Relaxed),
                _ => continue,
            }
            self.seen.store(true, Ordering::Release);
        }
    }

    pub fn position(&self) -> Option<(i32, i32)> {
        if !self.seen.load(Ordering::Acquire) {
            return None;
        }
        Some((self.x.load(Ordering::Relaxed), self.y.load(Ordering::Relaxed)))
    }
}

pub struct InterceptionBoundary {
    ctx: Arc<HookContext>,
    queue: EventReceiver,
    delivered: AtomicU64,
    suppressed: AtomicU64,
}

impl InterceptionBoundary {
    pub fn new(ctx: Arc<HookContext>, queue: EventReceiver) -> Self {
        Self {
            ctx,
            queue,
            delivered: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
        }
    }

    pub fn read<R: RawDeviceReader>(&self, reader: &mut R, buf: &mut [u8]) -> isize {
        self.read_with_clock(reader, buf, Instant::now)
    }

    /// `read` with an injectable clock for the suppression check.
    pub fn read_with_clock<R, C>(&self, reader: &mut R, buf: &mut [u8], mut now: C) -> isize
    where
        R: RawDeviceReader,
        C: FnMut() -> Instant,
    {
        loop {
            if let Some(n) = self.deliver_synthetic(buf) {
                return n as isize;
            }

            let result = reader.read(buf);
            if result <= 0 {
                return result;
            }

            if !self.ctx.arbiter.is_suppressed(now()) {
                self.ctx.cursor.observe(&buf[..result as usize]);
                return result;
            }

            self.count_suppressed(result);
            match self.ctx.config.suppressed_read {
                SuppressedRead::Empty => return 0,
                SuppressedRead::Reissue => continue,
            }
        }
    }

    /// Copy as many whole pending events as fit into `buf`.
    fn deliver_synthetic(&self, buf: &mut [u8]) -> Option<usize> {
        let room = buf.len() / INPUT_EVENT_SIZE;
        if room == 0 || self.queue.is_empty() {
            return None;
        }

        let mut events = Vec::with_capacity(room.min(64));
        let n = self.queue.drain_into(&mut events, room);
        if n == 0 {
            return None;
        }

        // Keep genuine input out until the host has seen the whole burst.
        self.ctx.arbiter.refresh();

        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        for (ev, dst) in events.iter().zip(buf.chunks_exact_mut(INPUT_EVENT_SIZE)) {
            ev.write_to(dst, stamp);
        }
        self.trace(&events);

        let delivered = self.delivered.fetch_add(1, Ordering::Relaxed) + 1;
        if delivered == 1 {
            log::info!("Synthetic events flowing");
        } else if delivered % 500 == 0 {
            log::debug!("Synthetic batches delivered: {}", delivered);
        }

        Some(n * INPUT_EVENT_SIZE)
    }

    fn count_suppressed(&self, bytes: isize) {
        let suppressed = self.suppressed.fetch_add(1, Ordering::Relaxed) + 1;
        log::trace!("Dropped {} bytes of genuine input", bytes);
        if suppressed == 1 || suppressed % 500 == 0 {
            log::debug!("Genuine reads suppressed: {}", suppressed);
        }
    }

    fn trace(&self, events: &[HardwareEvent]) {
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }
        for ev in events {
            log::trace!("inject {} value={}", code_name(ev.ty, ev.code), ev.value);
        }
    }
}
