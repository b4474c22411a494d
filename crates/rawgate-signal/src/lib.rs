//! Named POSIX signal registration.
//!
//! ```no_run
//! rawgate_signal::handle("USR1", |number, name| {
//!     eprintln!("got SIG{name} ({number})");
//! })?;
//! # Ok::<(), rawgate_signal::SignalError>(())
//! ```
//!
//! Handlers are keyed by signal, one per signal; registering again replaces
//! and returns the previous handler. They run on a single dispatcher thread
//! named `rawgate-signal`, never inside the asynchronous signal context, so
//! a slow handler delays later signals but cannot deadlock the process.
//!
//! Fault signals (`SEGV`, `BUS`, `FPE`, `ILL`) and the uncatchable
//! `KILL`/`STOP` are refused with [`SignalError::Reserved`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

#[cfg(unix)]
mod dispatch;
pub mod error;
pub mod names;

use std::sync::Arc;

pub use error::SignalError;
pub use names::{signal_name, signal_number};

/// A registered signal handler. Receives the signal number and its
/// unprefixed name.
pub type Handler = Arc<dyn Fn(i32, &str) + Send + Sync>;

/// Register `handler` for the signal called `name`.
///
/// Returns the handler previously registered through this crate for the
/// same signal, if any.
pub fn handle<F>(name: &str, handler: F) -> Result<Option<Handler>, SignalError>
where
    F: Fn(i32, &str) + Send + Sync + 'static,
{
    register(name, Arc::new(handler))
}

/// Register an already shared handler, e.g. one returned by [`handle`].
#[cfg(unix)]
pub fn register(name: &str, handler: Handler) -> Result<Option<Handler>, SignalError> {
    dispatch::handle(name, handler)
}

/// Register an already shared handler, e.g. one returned by [`handle`].
#[cfg(not(unix))]
pub fn register(name: &str, _handler: Handler) -> Result<Option<Handler>, SignalError> {
    signal_number(name)?;
    Err(SignalError::Unsupported)
}

/// Remove the handler for `name` and restore the default disposition.
///
/// Returns the removed handler, if any.
#[cfg(unix)]
pub fn reset(name: &str) -> Result<Option<Handler>, SignalError> {
    dispatch::reset(name)
}

/// Remove the handler for `name` and restore the default disposition.
#[cfg(not(unix))]
pub fn reset(name: &str) -> Result<Option<Handler>, SignalError> {
    signal_number(name)?;
    Err(SignalError::Unsupported)
}

/// Whether a handler is currently registered for `name`.
#[cfg(unix)]
pub fn is_handled(name: &str) -> Result<bool, SignalError> {
    dispatch::is_handled(name)
}

/// Whether a handler is currently registered for `name`.
#[cfg(not(unix))]
pub fn is_handled(name: &str) -> Result<bool, SignalError> {
    signal_number(name)?;
    Ok(false)
}
