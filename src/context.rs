//! Process-wide state shared by the command reader and the interception
//! boundary, built once when the hook installs.

use std::sync::Arc;

use crate::boundary::{CursorTracker, InterceptionBoundary};
use crate::config::Config;
use crate::queue::synthetic_queue;
use crate::suppress::SuppressionArbiter;
use crate::synth::Synthesizer;

#[derive(Debug)]
pub struct HookContext {
    pub config: Config,
    pub arbiter: SuppressionArbiter,
    pub cursor: CursorTracker,
}

impl HookContext {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            arbiter: SuppressionArbiter::new(config.suppression),
            cursor: CursorTracker::default(),
            config,
        })
    }

    /// Wire a fresh synthetic queue between a synthesizer and a boundary.
    pub fn split(self: &Arc<Self>) -> (Synthesizer, InterceptionBoundary) {
        let (tx, rx) = synthetic_queue();
        (
            Synthesizer::new(Arc::clone(self), tx),
            InterceptionBoundary::new(Arc::clone(self), rx),
        )
    }
}
