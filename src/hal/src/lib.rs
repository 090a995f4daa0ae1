//! Sarja Hardware Abstraction Layer (HAL) traits.
//!
//! This crate defines traits that abstract away platform-specific hardware
//! details of the serial subsystem: the register-level surface of one UART
//! and the generic byte-stream contract layered on top of it.

#![no_std]

use sarja_common::LineStatus;

/// A hardware interrupt line belonging to one UART instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqLine {
    /// Fires when a received byte is available in the data register.
    Receive,
    /// Fires when the transmit data register can accept the next byte.
    TransmitEmpty,
}

/// Trait for the register block of a single UART.
///
/// Implementations are shared between the foreground and the instance's
/// interrupt handler, so all methods take `&self`; a real implementation is
/// a thin interior-mutable wrapper over volatile MMIO accesses.
pub trait UartHw {
    /// Reads the status register.
    ///
    /// A read may have hardware side effects (error flags clear on the
    /// status/data read sequence), so callers perform exactly one read per
    /// interrupt event.
    fn line_status(&self) -> LineStatus;

    /// Reads the receive data register.
    fn read_data(&self) -> u8;

    /// Writes one byte to the transmit data register.
    fn write_data(&self, byte: u8);

    /// Enables one of the instance's interrupt lines.
    fn irq_enable(&self, line: IrqLine);

    /// Disables one of the instance's interrupt lines.
    fn irq_disable(&self, line: IrqLine);
}

impl<T: UartHw + ?Sized> UartHw for &T {
    fn line_status(&self) -> LineStatus {
        (**self).line_status()
    }

    fn read_data(&self) -> u8 {
        (**self).read_data()
    }

    fn write_data(&self, byte: u8) {
        (**self).write_data(byte)
    }

    fn irq_enable(&self, line: IrqLine) {
        (**self).irq_enable(line)
    }

    fn irq_disable(&self, line: IrqLine) {
        (**self).irq_disable(line)
    }
}

/// Trait for a serial port or similar character-based communication channel.
pub trait Serial {
    /// Writes a single byte to the serial port.
    fn write_byte(&mut self, byte: u8);
    /// Reads a single byte from the serial port, if available.
    fn read_byte(&mut self) -> Option<u8>;
}
