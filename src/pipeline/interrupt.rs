//! Ctrl+C handling for the batch driver.
//!
//! The first interrupt only raises a flag; the batch driver checks it between
//! companies, so the company in flight finishes normally. A second interrupt
//! exits at once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::Result;

/// Exit status used when a second interrupt forces an exit.
const FORCED_EXIT_CODE: i32 = 130;

/// Shared stop-request flag.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    requested: Arc<AtomicBool>,
}

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flag raised by Ctrl+C. Can only be installed once per process.
    pub fn install() -> Result<Self> {
        let flag = Self::new();
        let handler_flag = flag.clone();
        ctrlc::set_handler(move || {
            if handler_flag.requested.swap(true, Ordering::SeqCst) {
                log::error!("Second interrupt received, exiting immediately");
                std::process::exit(FORCED_EXIT_CODE);
            }
            log::warn!("Interrupt received, stopping after the current company (press again to force)");
        })?;
        Ok(flag)
    }

    /// Request a stop.
    pub fn trigger(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let flag = InterruptFlag::new();
        let other = flag.clone();
        assert!(!other.is_set());

        flag.trigger();
        assert!(other.is_set());
    }
}
