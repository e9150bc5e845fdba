//! Synthetic stylus input for the reMarkable, injected through an
//! `LD_PRELOAD` hook on the host application's digitizer reads.
//!
//! Producers write pen commands into a FIFO; the hook turns them into
//! Wacom-shaped evdev events and hands them to the host ahead of genuine
//! hardware input, muting the real pen briefly after each synthetic burst.

pub mod boundary;
pub mod channel;
pub mod command;
pub mod config;
pub mod context;
pub mod device;
pub mod error;
pub mod hook;
pub mod input;
pub mod queue;
pub mod suppress;
pub mod synth;
pub mod transform;

pub use boundary::{InterceptionBoundary, RawDeviceReader};
pub use command::Command;
pub use config::Config;
pub use context::HookContext;
pub use error::{ConfigError, HookError, ParseError};
pub use input::HardwareEvent;
pub use synth::{synthesize, Synthesizer};
pub use transform::TransformConfig;
