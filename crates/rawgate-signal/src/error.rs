//! Signal registration errors.

use std::io;

use thiserror::Error;

/// Errors from [`handle`](crate::handle) and [`reset`](crate::reset).
#[derive(Debug, Error)]
pub enum SignalError {
    /// No signal with this name exists on this platform.
    #[error("unknown signal: {name}")]
    Unknown {
        /// The name as given.
        name: String,
    },
    /// The signal exists but cannot be caught, or is reserved for fault
    /// handling by the runtime.
    #[error("signal {name} cannot be handled")]
    Reserved {
        /// The name as given.
        name: String,
    },
    /// Signal handling is not available on this platform.
    #[error("signal handling is not supported on this platform")]
    Unsupported,
    /// An OS call failed while installing the handler or dispatcher.
    #[error("signal setup failed: {0}")]
    Os(#[from] io::Error),
}
