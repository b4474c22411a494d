//! Probed access to raw memory, atomics, fences, off-heap allocation and
//! POSIX signals.
//!
//! This is the top-level facade crate. It re-exports the public API from the
//! rawgate sub-crates so users need only depend on `rawgate`.
//!
//! # Quick start
//!
//! ```
//! use rawgate::prelude::*;
//!
//! let gateway = rawgate::global();
//! if let Some(raw) = gateway.raw() {
//!     let mut buf = OffHeapBuffer::new(raw, 64)?;
//!     buf.put::<i64>(8, 42)?;
//!     assert_eq!(buf.get::<i64>(8)?, 42);
//! }
//! # Ok::<(), MemoryError>(())
//! ```
//!
//! # Crate structure
//!
//! | Module | Source crate | Contents |
//! |--------|-------------|----------|
//! | [`types`] | `rawgate-core` | Kinds, signatures, capability flags, errors |
//! | [`probe`] | `rawgate-probe` | Probe seams, configuration, report |
//! | [`raw`] | `rawgate-raw` | `RawAccess`, fences, off-heap, lifecycle, host |
//! | [`signal`] | `rawgate-signal` | Named signal handlers |
//! | [`bytes`] | this crate | Byte-array helpers with a raw fast path |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod bytes;
mod gateway;

pub use gateway::{global, is_available, is_unaligned_access_supported, Gateway};

/// Core types (`rawgate-core`).
///
/// Primitive kinds, operation signatures, the [`types::REQUIRED_OPS`]
/// catalogue, [`types::Capabilities`] and the shared error types.
pub use rawgate_core as types;

/// Startup probe (`rawgate-probe`).
///
/// Implement [`probe::Locate`] and [`probe::UnalignedQuery`] to probe
/// something other than the in-process provider.
pub use rawgate_probe as probe;

/// Raw access boundary (`rawgate-raw`).
///
/// [`raw::RawAccess`] plus fences, off-heap allocation, introspection,
/// lifecycle hooks, parking and load average.
pub use rawgate_raw as raw;

/// Named signal handlers (`rawgate-signal`).
pub use rawgate_signal as signal;

pub use rawgate_raw::object_field_offset;

/// Common imports for typical rawgate usage.
///
/// ```rust
/// use rawgate::prelude::*;
/// ```
pub mod prelude {
    // Gateway
    pub use crate::gateway::{global, Gateway};

    // Core types and errors
    pub use rawgate_core::{Address, Capabilities, Capability, MemoryError};
    pub use rawgate_probe::{ProbeConfig, ProbeReport};

    // Raw access
    pub use rawgate_raw::{
        full_fence, load_fence, store_fence, OffHeapBuffer, ParkDeadline, Primitive, RawAccess,
        Scalar,
    };

    // Signals
    pub use rawgate_signal::SignalError;
}
