//! Per-instance UART state, the interrupt-side state machine, and the
//! foreground `put_char` / `get_char` entry points.
//!
//! The [`Ttys`] registry is an explicit object owned by the composition
//! root; the interrupt vectors and higher layers hold shared references to
//! it. All cross-context state is atomic or single-writer, so every entry
//! point takes `&self`.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use sarja_common::{Error, LineStatus};
use sarja_hal::{IrqLine, UartHw};
use spin::Once;

use crate::counters::{CounterId, CounterSet};
use crate::ring::RingBuffer;

/// Receive ring capacity: sized for line-oriented input.
pub const RX_BUF_SIZE: usize = 80;

/// Transmit ring capacity: sized for bursty application writes.
pub const TX_BUF_SIZE: usize = 1024;

/// Default console verbosity (encodes `log::LevelFilter::Info`).
const VERBOSITY_DEFAULT: u8 = log::LevelFilter::Info as u8;

/// UART numbering follows the MCU hardware definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InstanceId {
    /// USART1.
    Uart1,
    /// USART2, conventionally bound to the process standard output.
    Uart2,
    /// USART6.
    Uart6,
}

impl InstanceId {
    /// Number of instances in the registry.
    pub const COUNT: usize = 3;

    /// Every instance, in table order.
    pub const ALL: [InstanceId; Self::COUNT] = [Self::Uart1, Self::Uart2, Self::Uart6];

    /// Position in the instance table.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// File-descriptor identity of this instance's stream.
    ///
    /// Uart2 carries descriptor 1 and thus serves as standard output.
    pub const fn fd(self) -> i32 {
        match self {
            Self::Uart1 => 4,
            Self::Uart2 => 1,
            Self::Uart6 => 3,
        }
    }

    /// Looks up an instance by table position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parses a console operand (`"uart2"` or the bare UART number).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "uart1" | "1" => Some(Self::Uart1),
            "uart2" | "2" => Some(Self::Uart2),
            "uart6" | "6" => Some(Self::Uart6),
            _ => None,
        }
    }
}

/// Per-instance configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtysConfig {
    /// Publish the byte-stream / descriptor identity on `start`.
    pub create_stream: bool,
    /// Queue a carriage return before every outgoing line feed.
    pub send_cr_after_nl: bool,
}

impl Default for TtysConfig {
    fn default() -> Self {
        Self {
            create_stream: true,
            send_cr_after_nl: true,
        }
    }
}

/// State of one physical serial port.
struct Instance<H> {
    hw: H,
    /// Completed iff `initialize` ran; doubles as the active/bound flag the
    /// interrupt handler checks before touching any other state.
    cfg: Once<TtysConfig>,
    started: AtomicBool,
    stream_published: AtomicBool,
    rx: RingBuffer<RX_BUF_SIZE>,
    tx: RingBuffer<TX_BUF_SIZE>,
}

impl<H: UartHw> Instance<H> {
    fn new(hw: H) -> Self {
        Self {
            hw,
            cfg: Once::new(),
            started: AtomicBool::new(false),
            stream_published: AtomicBool::new(false),
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
        }
    }

    fn bound(&self) -> bool {
        self.cfg.get().is_some()
    }
}

/// The instance registry: one entry per physical serial port.
///
/// Owned by the composition root for the process lifetime and passed by
/// reference to the interrupt vectors and to higher layers.
pub struct Ttys<H> {
    instances: [Instance<H>; InstanceId::COUNT],
    counters: CounterSet,
    verbosity: AtomicU8,
}

impl<H: UartHw> Ttys<H> {
    /// Builds the registry over one hardware handle per instance.
    ///
    /// Every instance starts inert: interrupts stay untouched until
    /// [`initialize`](Self::initialize) runs for it.
    pub fn new(hw: [H; InstanceId::COUNT]) -> Self {
        Self {
            instances: hw.map(Instance::new),
            counters: CounterSet::new(),
            verbosity: AtomicU8::new(VERBOSITY_DEFAULT),
        }
    }

    fn instance(&self, id: InstanceId) -> &Instance<H> {
        &self.instances[id.index()]
    }

    /// Initializes one instance: disables its interrupt lines, zeroes both
    /// ring buffers, and stores the configuration.
    ///
    /// Fails with [`Error::InvalidState`] on a second call for the same
    /// instance. Side effects are confined to the instance's own state and
    /// registers; this must not call out to logging or console
    /// registration, since other modules may not be initialized yet.
    pub fn initialize(&self, id: InstanceId, cfg: TtysConfig) -> Result<(), Error> {
        let inst = self.instance(id);
        if inst.bound() {
            return Err(Error::InvalidState);
        }
        // Quiet until start: nothing may fire while the buffers rewind.
        inst.hw.irq_disable(IrqLine::Receive);
        inst.hw.irq_disable(IrqLine::TransmitEmpty);
        inst.rx.reset();
        inst.tx.reset();
        inst.started.store(false, Ordering::Relaxed);
        inst.stream_published.store(false, Ordering::Relaxed);
        inst.cfg.call_once(|| cfg);
        Ok(())
    }

    /// Starts one instance: enables the receive interrupt and, when
    /// configured, publishes the stream identity.
    ///
    /// Fails with [`Error::BadInstance`] when the instance was never
    /// initialized; the interrupt stays disabled in that case.
    pub fn start(&self, id: InstanceId) -> Result<(), Error> {
        let inst = self.instance(id);
        let cfg = inst.cfg.get().ok_or(Error::BadInstance)?;
        if cfg.create_stream {
            inst.stream_published.store(true, Ordering::Release);
        }
        inst.started.store(true, Ordering::Release);
        inst.hw.irq_enable(IrqLine::Receive);
        if self.verbosity_allows(log::Level::Debug) {
            log::debug!("ttys: {:?} started (fd {})", id, id.fd());
        }
        Ok(())
    }

    /// Queues one byte for transmission.
    ///
    /// With `send_cr_after_nl` configured, a line feed queues a carriage
    /// return first; space for the pair is reserved up front so the
    /// translation is all-or-nothing. A full buffer charges the tx overrun
    /// counter and fails with [`Error::Overrun`].
    pub fn put_char(&self, id: InstanceId, byte: u8) -> Result<(), Error> {
        let inst = self.instance(id);
        let cfg = inst.cfg.get().ok_or(Error::BadInstance)?;
        let translate = cfg.send_cr_after_nl && byte == b'\n';
        let needed = if translate { 2 } else { 1 };
        if inst.tx.free() < needed {
            self.counters.bump(CounterId::TxBufOverrun);
            return Err(Error::Overrun);
        }
        if translate {
            inst.tx.try_push(b'\r');
        }
        inst.tx.try_push(byte);
        // The drain side disables the line whenever it empties the buffer,
        // possibly between the reservation above and the pushes; re-arm on
        // every queue so a wakeup is never lost.
        inst.hw.irq_enable(IrqLine::TransmitEmpty);
        Ok(())
    }

    /// Takes the oldest received byte, or `Ok(None)` when nothing is
    /// pending.
    ///
    /// Non-blocking by design; a blocking line discipline belongs to the
    /// stream wrapper above this layer.
    pub fn get_char(&self, id: InstanceId) -> Result<Option<u8>, Error> {
        let inst = self.instance(id);
        if !inst.bound() {
            return Err(Error::BadInstance);
        }
        Ok(inst.rx.try_pop())
    }

    /// The instance's interrupt entry point.
    ///
    /// Invoked once per hardware interrupt event, from at most one
    /// execution context per instance. Bounded time; never calls into
    /// logging, diagnostics, or dispatch.
    pub fn interrupt(&self, id: InstanceId) {
        let inst = self.instance(id);
        // Spurious delivery before initialize completed: silence the
        // instance's lines and leave every counter untouched.
        if !inst.bound() {
            inst.hw.irq_disable(IrqLine::Receive);
            inst.hw.irq_disable(IrqLine::TransmitEmpty);
            return;
        }
        // The status read participates in the hardware's flag-clearing
        // sequence: exactly one read per event.
        let status = inst.hw.line_status();
        if status.contains(LineStatus::RX_NOT_EMPTY) {
            let byte = inst.hw.read_data();
            // Error bits qualify this byte and are not mutually exclusive;
            // charge one counter per bit set.
            if status.contains(LineStatus::OVERRUN_ERR) {
                self.counters.bump(CounterId::RxHwOverrun);
            }
            if status.contains(LineStatus::NOISE_ERR) {
                self.counters.bump(CounterId::RxNoise);
            }
            if status.contains(LineStatus::FRAMING_ERR) {
                self.counters.bump(CounterId::RxFraming);
            }
            if status.contains(LineStatus::PARITY_ERR) {
                self.counters.bump(CounterId::RxParity);
            }
            if !inst.rx.try_push(byte) {
                self.counters.bump(CounterId::RxBufOverrun);
            }
        }
        if status.contains(LineStatus::TX_EMPTY) {
            match inst.tx.try_pop() {
                Some(byte) => inst.hw.write_data(byte),
                // An empty transmit buffer is the normal terminal
                // condition, not an error; the line must not keep firing
                // with nothing to send.
                None => inst.hw.irq_disable(IrqLine::TransmitEmpty),
            }
        }
    }

    /// Whether `initialize` has run for this instance.
    pub fn is_initialized(&self, id: InstanceId) -> bool {
        self.instance(id).bound()
    }

    /// Whether `start` has run for this instance.
    pub fn is_started(&self, id: InstanceId) -> bool {
        self.instance(id).started.load(Ordering::Acquire)
    }

    /// The instance's configuration, once initialized.
    pub fn config(&self, id: InstanceId) -> Option<TtysConfig> {
        self.instance(id).cfg.get().copied()
    }

    /// Bytes pending in the receive buffer.
    pub fn rx_pending(&self, id: InstanceId) -> usize {
        self.instance(id).rx.len()
    }

    /// Bytes pending in the transmit buffer.
    pub fn tx_pending(&self, id: InstanceId) -> usize {
        self.instance(id).tx.len()
    }

    pub(crate) fn stream_published(&self, id: InstanceId) -> bool {
        self.instance(id).stream_published.load(Ordering::Acquire)
    }

    pub(crate) fn counter_set(&self) -> &CounterSet {
        &self.counters
    }

    pub(crate) fn verbosity_cell(&self) -> &AtomicU8 {
        &self.verbosity
    }

    pub(crate) fn verbosity_allows(&self, level: log::Level) -> bool {
        level as u8 <= self.verbosity.load(Ordering::Relaxed)
    }
}
