//! Teardown signal for the layout loop
//!
//! Set once by the view owner. The loop both polls it between frames and
//! awaits it alongside the frame timer, so a long frame interval does not
//! delay shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Shared {
    stopped: AtomicBool,
    wake: Notify,
}

/// One-shot stop flag shared between a driver handle and its task.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    shared: Arc<Shared>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. Later calls do nothing.
    pub fn trigger(&self) {
        if !self.shared.stopped.swap(true, Ordering::AcqRel) {
            self.shared.wake.notify_waiters();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Acquire)
    }

    /// Resolve once `trigger` has been called.
    pub async fn stopped(&self) {
        loop {
            // register before checking, so a trigger in between is not missed
            let notified = self.shared.wake.notified();
            if self.is_stopped() {
                return;
            }
            notified.await;
        }
    }
}
