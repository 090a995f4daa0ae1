//! Byte-stream view of a driver instance.
//!
//! A published stream lets an instance double as the sink of a generic
//! formatting facility: it implements both the [`Serial`] byte contract and
//! [`core::fmt::Write`]. Publication is an explicit configuration choice
//! (`create_stream`) taken at `start`, and the fixed Uart2/descriptor-1
//! mapping makes that instance the conventional process standard output.

use core::fmt;

use sarja_hal::{Serial, UartHw};

use crate::driver::{InstanceId, Ttys};

/// A published byte stream over one UART instance.
///
/// Obtained from [`Ttys::stream`] or [`Ttys::stdout`]; never constructible
/// for an instance that has not published its stream identity.
pub struct TtysStream<'a, H> {
    ttys: &'a Ttys<H>,
    id: InstanceId,
}

impl<'a, H: UartHw> TtysStream<'a, H> {
    /// The instance behind this stream.
    pub fn instance(&self) -> InstanceId {
        self.id
    }

    /// The stream's file-descriptor identity.
    pub fn fd(&self) -> i32 {
        self.id.fd()
    }
}

impl<H: UartHw> Serial for TtysStream<'_, H> {
    fn write_byte(&mut self, byte: u8) {
        // A full buffer drops the byte; the tx overrun counter records it.
        let _ = self.ttys.put_char(self.id, byte);
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.ttys.get_char(self.id).ok().flatten()
    }
}

impl<H: UartHw> fmt::Write for TtysStream<'_, H> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // Best effort: diagnostic printing must not wedge on a full buffer,
        // so dropped bytes surface only through the overrun counter.
        for byte in s.bytes() {
            let _ = self.ttys.put_char(self.id, byte);
        }
        Ok(())
    }
}

impl<H: UartHw> Ttys<H> {
    /// The published stream view of an instance, if `start` published one.
    pub fn stream(&self, id: InstanceId) -> Option<TtysStream<'_, H>> {
        self.stream_published(id).then(|| TtysStream { ttys: self, id })
    }

    /// The stream conventionally bound as process standard output
    /// (descriptor 1), once published.
    pub fn stdout(&self) -> Option<TtysStream<'_, H>> {
        InstanceId::ALL
            .into_iter()
            .find(|id| id.fd() == 1)
            .and_then(|id| self.stream(id))
    }
}
