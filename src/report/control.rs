//! Single-flight guard for the "protect" action.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

const IDLE_LABEL: &str = "Protect PDF";
const BUSY_LABEL: &str = "Processing...";

/// Initiating control. Disarmed while a request is in flight.
#[derive(Debug, Default)]
pub struct ProtectControl {
    busy: AtomicBool,
}

impl ProtectControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        !self.busy.load(Ordering::Acquire)
    }

    pub fn label(&self) -> &'static str {
        if self.is_armed() {
            IDLE_LABEL
        } else {
            BUSY_LABEL
        }
    }

    /// Disarm the control. `None` when a request is already in flight.
    /// The control is re-armed when the returned guard drops, whether the
    /// run finished, failed, or unwound.
    pub fn try_disarm(&self) -> Option<ControlGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ControlGuard { control: self })
    }
}

#[derive(Debug)]
pub struct ControlGuard<'a> {
    control: &'a ProtectControl,
}

impl Drop for ControlGuard<'_> {
    fn drop(&mut self) {
        self.control.busy.store(false, Ordering::Release);
        debug!("Protect control re-armed");
    }
}
