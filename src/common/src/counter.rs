//! Saturating event counter.

use core::sync::atomic::{AtomicU16, Ordering};

/// A 16-bit event counter that sticks at `u16::MAX` instead of wrapping.
///
/// Sustained fault conditions stay observably maxed out rather than cycling
/// back through zero. Safe to increment from interrupt context.
#[derive(Debug)]
pub struct SatCounter(AtomicU16);

impl SatCounter {
    /// Creates a counter at zero.
    pub const fn new() -> Self {
        Self(AtomicU16::new(0))
    }

    /// Adds one, saturating at the maximum.
    pub fn increment(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_add(1));
    }

    /// Current value.
    pub fn get(&self) -> u16 {
        self.0.load(Ordering::Relaxed)
    }

    /// Clears the counter back to zero. Diagnostics only; nothing on the hot
    /// path resets.
    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

impl Default for SatCounter {
    fn default() -> Self {
        Self::new()
    }
}
