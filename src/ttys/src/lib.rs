//! Sarja interrupt-driven serial (ttys) driver.
//!
//! Each physical UART is one *instance*: a pair of single-producer,
//! single-consumer ring buffers drained and filled by the hardware
//! interrupt handler, plus a foreground byte-stream interface usable as the
//! process console.
//!
//! # Architecture
//!
//! - `ring`: the SPSC byte ring buffer both directions are built on
//! - `driver`: the instance registry, interrupt handler, and `put_char` /
//!   `get_char` entry points
//! - `stream`: the published byte-stream / formatted-output view
//! - `counters`: saturating failure accounting
//! - `console`: the `status` / `test` diagnostics surface for the command
//!   dispatcher
//!
//! # Concurrency
//!
//! Exactly one interrupt context per instance contends with one foreground
//! context. Every shared field is either written by a single side (ring
//! indices) or atomic (occupancy counts, counters, flags); nothing in this
//! crate blocks, suspends, or takes a lock on the hot path. The composition
//! root owns the [`Ttys`] registry and hands shared references to the
//! interrupt vectors and to higher layers.

#![no_std]
#![warn(missing_docs)]

#[cfg(test)]
extern crate std;

pub mod console;
pub mod counters;
pub mod driver;
pub mod ring;
pub mod stream;

#[cfg(test)]
pub(crate) mod testutil;

pub use driver::{InstanceId, Ttys, TtysConfig, RX_BUF_SIZE, TX_BUF_SIZE};
pub use stream::TtysStream;
