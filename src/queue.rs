//! FIFO of synthesized event groups between the command reader and the
//! interception boundary.
//!
//! Groups travel whole over an unbounded crossbeam channel; the consumer
//! keeps the unread tail of a group when the caller's buffer fills up.

use std::collections::VecDeque;
use std::sync::Mutex;

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

use crate::input::HardwareEvent;

/// Create the producer/consumer pair.
pub fn synthetic_queue() -> (EventSender, EventReceiver) {
    let (tx, rx) = channel::unbounded();
    (
        EventSender { tx },
        EventReceiver {
            rx,
            pending: Mutex::new(VecDeque::new()),
        },
    )
}

pub struct EventSender {
    tx: Sender<Vec<HardwareEvent>>,
}

impl EventSender {
    /// Enqueue one group. Returns false once the consumer is gone.
    pub fn push_group(&self, group: Vec<HardwareEvent>) -> bool {
        if group.is_empty() {
            return true;
        }
        self.tx.send(group).is_ok()
    }
}

pub struct EventReceiver {
    rx: Receiver<Vec<HardwareEvent>>,
    pending: Mutex<VecDeque<HardwareEvent>>,
}

impl EventReceiver {
    pub fn is_empty(&self) -> bool {
        self.lock_pending().is_empty() && self.rx.is_empty()
    }

    /// Move up to `max` events, oldest first, into `out`. Never blocks.
    pub fn drain_into(&self, out: &mut Vec<HardwareEvent>, max: usize) -> usize {
        let mut pending = self.lock_pending();
        let start = out.len();

        while out.len() - start < max {
            if let Some(ev) = pending.pop_front() {
                out.push(ev);
                continue;
            }
            match self.rx.try_recv() {
                Ok(group) => pending.extend(group),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        out.len() - start
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, VecDeque<HardwareEvent>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}
