//! UART line-status word.

use bitflags::bitflags;

bitflags! {
    /// Status bits returned by a UART status-register read.
    ///
    /// Bit positions follow the STM32F4 USART SR layout. The receive error
    /// bits (PE/FE/NE/ORE) qualify the byte that RXNE announces and are not
    /// mutually exclusive.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineStatus: u16 {
        /// Parity error detected on the received byte (PE).
        const PARITY_ERR = 1 << 0;
        /// Framing error: no valid stop bit seen (FE).
        const FRAMING_ERR = 1 << 1;
        /// Noise detected on the line during reception (NE).
        const NOISE_ERR = 1 << 2;
        /// Receive overrun: a byte arrived before the previous one was read (ORE).
        const OVERRUN_ERR = 1 << 3;
        /// Read data register not empty: a received byte is available (RXNE).
        const RX_NOT_EMPTY = 1 << 5;
        /// Transmit data register empty: ready to accept the next byte (TXE).
        const TX_EMPTY = 1 << 7;
    }
}
