//! System-wide error types for the Sarja serial subsystem.

use core::fmt;

/// Error kinds shared by the driver and the console contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Error {
    /// Malformed argument (unknown instance name, missing operand)
    InvalidArgument,
    /// Operation invoked out of its required order
    InvalidState,
    /// Operation on an instance that was never initialized
    BadInstance,
    /// Unknown console subcommand
    BadCommand,
    /// Buffer full
    Overrun,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "invalid argument"),
            Error::InvalidState => write!(f, "invalid state for operation"),
            Error::BadInstance => write!(f, "instance not initialized"),
            Error::BadCommand => write!(f, "unknown command"),
            Error::Overrun => write!(f, "buffer overrun"),
        }
    }
}
