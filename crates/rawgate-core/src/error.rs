//! Error types shared across the workspace.
//!
//! Raw operations never return these: misuse of the unchecked surface is
//! undefined behaviour by contract. They cover the few conditions the layer
//! does check (allocation failure, host queries) and the bounds checks of
//! the owned buffer types.

use thiserror::Error;

/// Errors from off-heap allocation and checked buffer access.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// The system allocator returned null.
    #[error("failed to allocate {bytes} bytes of off-heap memory")]
    AllocationFailed {
        /// Number of bytes requested.
        bytes: usize,
    },
    /// An access of `len` bytes at `offset` does not fit in the buffer.
    #[error("access of {len} bytes at offset {offset} exceeds buffer of {size} bytes")]
    OutOfBounds {
        /// Byte offset of the access.
        offset: usize,
        /// Width of the access in bytes.
        len: usize,
        /// Size of the buffer in bytes.
        size: usize,
    },
    /// An atomic or volatile access at an address not aligned to the
    /// value's width.
    #[error("address {address:#x} is not aligned to {align} bytes")]
    Misaligned {
        /// The offending address.
        address: usize,
        /// Required alignment in bytes.
        align: usize,
    },
}

/// Errors from host introspection queries.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HostError {
    /// The load average supports between one and three samples.
    #[error("load average sample count must be in 1..=3, got {requested}")]
    InvalidSampleCount {
        /// The requested sample count.
        requested: usize,
    },
    /// The operating system could not report a load average.
    #[error("system load average is unavailable")]
    LoadAverageUnavailable,
    /// The query is not implemented on this platform.
    #[error("{what} is not supported on this platform")]
    Unsupported {
        /// Name of the unsupported query.
        what: &'static str,
    },
}

/// A capability name that does not match any known [`crate::Capability`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown capability: {name}")]
pub struct CapabilityParseError {
    /// The unrecognised name.
    pub name: String,
}
