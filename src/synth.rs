//! Expand pen commands into digitizer-shaped event groups.

use std::sync::Arc;

use crate::command::Command;
use crate::config::Config;
use crate::context::HookContext;
use crate::input::{HardwareEvent, ABS_PRESSURE, ABS_X, ABS_Y, BTN_TOOL_PEN, BTN_TOUCH};
use crate::queue::EventSender;

/// Events for one command, closed by SYN_REPORT. Commands that draw
/// nothing (GET_CURSOR, DELAY) yield an empty group.
pub fn synthesize(command: &Command, config: &Config) -> Vec<HardwareEvent> {
    match *command {
        Command::PenDown { x, y } => {
            let (hx, hy) = config.transform.transform(x, y);
            let mut group = Vec::with_capacity(7);
            group.push(HardwareEvent::key(BTN_TOOL_PEN, true));
            if config.emit_touch_key {
                group.push(HardwareEvent::key(BTN_TOUCH, true));
            }
            group.push(HardwareEvent::abs(ABS_X, hx));
            group.push(HardwareEvent::abs(ABS_Y, hy));
            group.push(HardwareEvent::abs(ABS_PRESSURE, config.pressure));
            group.push(HardwareEvent::sync());
            group
        }
        Command::PenMove { x, y } => {
            let (hx, hy) = config.transform.transform(x, y);
            vec![
                HardwareEvent::abs(ABS_X, hx),
                HardwareEvent::abs(ABS_Y, hy),
                HardwareEvent::sync(),
            ]
        }
        Command::PenUp => {
            let mut group = Vec::with_capacity(4);
            group.push(HardwareEvent::abs(ABS_PRESSURE, 0));
            if config.emit_touch_key {
                group.push(HardwareEvent::key(BTN_TOUCH, false));
            }
            group.push(HardwareEvent::key(BTN_TOOL_PEN, false));
            group.push(HardwareEvent::sync());
            group
        }
        Command::GetCursor | Command::Delay(_) => Vec::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenState {
    Up,
    Down,
}

/// Tracks the synthetic pen and feeds its event groups to the boundary.
pub struct Synthesizer {
    ctx: Arc<HookContext>,
    queue: EventSender,
    state: PenState,
    groups: u64,
}

impl Synthesizer {
    pub fn new(ctx: Arc<HookContext>, queue: EventSender) -> Self {
        Self {
            ctx,
            queue,
            state: PenState::Up,
            groups: 0,
        }
    }

    pub fn state(&self) -> PenState {
        self.state
    }

    /// Synthesize `command` and enqueue its events. Returns the number of
    /// events queued.
    pub fn submit(&mut self, command: &Command) -> usize {
        match (*command, self.state) {
            (Command::PenDown { .. }, PenState::Down) => {
                log::debug!("PEN_DOWN while down, closing previous stroke");
                self.emit(&Command::PenUp) + self.emit(command)
            }
            (Command::PenMove { .. } | Command::PenUp, PenState::Up) => {
                log::debug!("{} while pen is up, ignored", command.verb());
                0
            }
            _ => self.emit(command),
        }
    }

    fn emit(&mut self, command: &Command) -> usize {
        let config = &self.ctx.config;
        if let Command::PenDown { x, y } | Command::PenMove { x, y } = *command {
            if !config.transform.on_display(x, y) {
                log::debug!("{} ({}, {}) is off the display, clamping", command.verb(), x, y);
            }
        }

        let group = synthesize(command, config);
        if group.is_empty() {
            return 0;
        }

        match command {
            Command::PenDown { .. } => self.state = PenState::Down,
            Command::PenUp => self.state = PenState::Up,
            _ => {}
        }

        // The window must be open before the first event becomes visible.
        self.ctx.arbiter.refresh();

        let len = group.len();
        if !self.queue.push_group(group) {
            log::warn!("Synthetic queue closed, dropping {}", command.verb());
            return 0;
        }

        if self.groups == 0 {
            log::info!("First synthetic stroke queued");
        }
        self.groups += 1;
        if self.groups % 500 == 0 {
            log::debug!("Synthetic groups queued: {}", self.groups);
        }
        len
    }
}
