//! Interrupt-to-main-loop signalling
//!
//! Interrupt handlers never touch application state. They raise a [`Signal`] and
//! return; the main loop is the only consumer and the only party that clears it.

use core::sync::atomic::{AtomicBool, Ordering};

/// Single-producer, single-consumer event flag
pub struct Signal {
    raised: AtomicBool,
}

impl Signal {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Producer side. Called from interrupt context.
    #[inline]
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    #[inline]
    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }

    /// Consume the event if one is pending.
    ///
    /// Load and store are separate so this works on cores without compare-and-swap.
    /// A raise landing between the two is merged into the one being consumed.
    #[inline]
    pub fn take(&self) -> bool {
        if self.is_raised() {
            self.clear();
            true
        } else {
            false
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

/// Raised by the Timer0 overflow interrupt
pub static TICK: Signal = Signal::new();

/// Raised by the INT0 edge on the manual override line
pub static MANUAL_OVERRIDE: Signal = Signal::new();
