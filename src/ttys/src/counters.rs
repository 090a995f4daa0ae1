//! Saturating failure accounting for the ttys module.
//!
//! Hardware-detected receive conditions are never surfaced to callers; they
//! land here and stay visible to the diagnostics surface. The table is
//! module-wide, shared by all instances.

use sarja_common::SatCounter;

/// Distinct failure conditions tracked by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterId {
    /// Hardware receive overrun (ORE status bit).
    RxHwOverrun,
    /// Noise detected during reception (NE status bit).
    RxNoise,
    /// Framing error (FE status bit).
    RxFraming,
    /// Parity error (PE status bit).
    RxParity,
    /// Transmit ring buffer full on `put_char`.
    TxBufOverrun,
    /// Receive ring buffer full in the interrupt handler.
    RxBufOverrun,
}

impl CounterId {
    /// Number of tracked conditions.
    pub const COUNT: usize = 6;

    /// Display names, in counter order, for the dispatcher's table.
    pub const NAMES: &'static [&'static str] = &[
        "uart rx overrun err",
        "uart rx noise err",
        "uart rx frame err",
        "uart rx parity err",
        "tx buf overrun err",
        "rx buf overrun err",
    ];

    /// Position in the counter table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name of this condition.
    pub fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }
}

/// The module-wide counter table.
#[derive(Debug)]
pub struct CounterSet {
    slots: [SatCounter; CounterId::COUNT],
}

impl CounterSet {
    /// Creates a table of zeroed counters.
    pub const fn new() -> Self {
        Self {
            slots: [const { SatCounter::new() }; CounterId::COUNT],
        }
    }

    /// Saturating increment of one condition.
    pub fn bump(&self, id: CounterId) {
        self.slots[id.index()].increment();
    }

    /// Current value of one condition.
    pub fn get(&self, id: CounterId) -> u16 {
        self.slots[id.index()].get()
    }

    /// The raw storage, parallel to [`CounterId::NAMES`].
    pub fn as_slice(&self) -> &[SatCounter] {
        &self.slots
    }

    /// Clears every counter. The dispatcher's explicit reset trigger.
    pub fn reset_all(&self) {
        for counter in &self.slots {
            counter.reset();
        }
    }
}

impl Default for CounterSet {
    fn default() -> Self {
        Self::new()
    }
}
