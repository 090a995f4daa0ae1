//! Shared vocabulary types for the Sarja serial subsystem.
//!
//! This crate carries the types that cross crate boundaries: error kinds,
//! the UART line-status word, the saturating counter primitive, and the
//! client-side contract of the process command dispatcher.

#![no_std]

pub mod cmd;
pub mod counter;
pub mod error;
pub mod line;

pub use cmd::{CmdClient, CmdInfo};
pub use counter::SatCounter;
pub use error::Error;
pub use line::LineStatus;
