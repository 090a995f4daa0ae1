//! Client-side contract for the process command dispatcher.
//!
//! Modules expose themselves on the console by handing the dispatcher a
//! [`CmdClient`] reference. The dispatcher reads the name, subcommand table,
//! and counter table; it mutates nothing except the verbosity cell and,
//! through [`SatCounter::reset`], the counter storage.

use core::fmt;
use core::sync::atomic::AtomicU8;

use crate::counter::SatCounter;
use crate::error::Error;

/// One subcommand a module exposes on the console.
#[derive(Debug, Clone, Copy)]
pub struct CmdInfo {
    /// Subcommand name as typed on the console.
    pub name: &'static str,
    /// One-line usage/help text.
    pub help: &'static str,
}

/// Implemented by modules that register with the command dispatcher.
pub trait CmdClient {
    /// Module name, the first console token.
    fn client_name(&self) -> &'static str;

    /// Subcommand table, for help rendering and completion.
    fn commands(&self) -> &'static [CmdInfo];

    /// Executes subcommand `cmd` with `args`, writing human-readable output
    /// to `out`.
    ///
    /// Returns [`Error::BadCommand`] for a subcommand not present in
    /// [`commands`](Self::commands).
    fn run(&self, cmd: &str, args: &[&str], out: &mut dyn fmt::Write) -> Result<(), Error>;

    /// Dispatcher-writable log verbosity cell, encoding a level filter as
    /// 0 = off through 5 = trace.
    fn verbosity(&self) -> &AtomicU8;

    /// Saturating failure counters, parallel to
    /// [`counter_names`](Self::counter_names).
    fn counters(&self) -> &[SatCounter];

    /// Display names for [`counters`](Self::counters), same order and length.
    fn counter_names(&self) -> &'static [&'static str];
}
