//! Test doubles for driving the driver from host tests.

use core::cell::{Cell, RefCell};
use std::vec::Vec;

use sarja_common::LineStatus;
use sarja_hal::{IrqLine, UartHw};

use crate::driver::{InstanceId, Ttys};

/// Scriptable UART register block.
///
/// Tests set the status word and pending receive byte, then invoke the
/// driver's interrupt entry point; transmitted bytes and interrupt-line
/// state are captured for assertions. Status reads are counted so tests can
/// pin the one-read-per-event rule.
pub(crate) struct MockUart {
    status: Cell<LineStatus>,
    rx_data: Cell<u8>,
    wire: RefCell<Vec<u8>>,
    rx_irq: Cell<bool>,
    tx_irq: Cell<bool>,
    status_reads: Cell<usize>,
}

impl MockUart {
    pub fn new() -> Self {
        Self {
            status: Cell::new(LineStatus::empty()),
            rx_data: Cell::new(0),
            wire: RefCell::new(Vec::new()),
            rx_irq: Cell::new(false),
            tx_irq: Cell::new(false),
            status_reads: Cell::new(0),
        }
    }

    /// Presents a received byte with the given error qualifiers.
    pub fn set_rx(&self, byte: u8, errors: LineStatus) {
        self.rx_data.set(byte);
        self.status.set(LineStatus::RX_NOT_EMPTY | errors);
    }

    /// Presents a ready transmit data register.
    pub fn set_tx_empty(&self) {
        self.status.set(LineStatus::TX_EMPTY);
    }

    pub fn clear_status(&self) {
        self.status.set(LineStatus::empty());
    }

    /// Everything the driver wrote to the transmit data register.
    pub fn wire(&self) -> Vec<u8> {
        self.wire.borrow().clone()
    }

    pub fn rx_irq_enabled(&self) -> bool {
        self.rx_irq.get()
    }

    pub fn tx_irq_enabled(&self) -> bool {
        self.tx_irq.get()
    }

    pub fn status_reads(&self) -> usize {
        self.status_reads.get()
    }

    /// Forces the interrupt-line state, bypassing the driver.
    pub fn force_irqs(&self, rx: bool, tx: bool) {
        self.rx_irq.set(rx);
        self.tx_irq.set(tx);
    }
}

impl UartHw for MockUart {
    fn line_status(&self) -> LineStatus {
        self.status_reads.set(self.status_reads.get() + 1);
        self.status.get()
    }

    fn read_data(&self) -> u8 {
        self.rx_data.get()
    }

    fn write_data(&self, byte: u8) {
        self.wire.borrow_mut().push(byte);
    }

    fn irq_enable(&self, line: IrqLine) {
        match line {
            IrqLine::Receive => self.rx_irq.set(true),
            IrqLine::TransmitEmpty => self.tx_irq.set(true),
        }
    }

    fn irq_disable(&self, line: IrqLine) {
        match line {
            IrqLine::Receive => self.rx_irq.set(false),
            IrqLine::TransmitEmpty => self.tx_irq.set(false),
        }
    }
}

/// Delivers one receive interrupt event carrying `byte` and `errors`.
pub(crate) fn deliver(
    ttys: &Ttys<&MockUart>,
    hw: &MockUart,
    id: InstanceId,
    byte: u8,
    errors: LineStatus,
) {
    hw.set_rx(byte, errors);
    ttys.interrupt(id);
    hw.clear_status();
}

/// Fires transmit-empty events until the driver disables the line.
pub(crate) fn drain_tx(ttys: &Ttys<&MockUart>, hw: &MockUart, id: InstanceId) {
    while hw.tx_irq_enabled() {
        hw.set_tx_empty();
        ttys.interrupt(id);
    }
    hw.clear_status();
}
