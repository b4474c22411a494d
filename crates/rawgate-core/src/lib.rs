//! Core types for the rawgate capability layer.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the probe, the raw access boundary and the facade:
//! primitive kinds, addressing modes, operation signatures, the immutable
//! capability flags, and the error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod address;
pub mod capability;
pub mod error;
pub mod kind;
pub mod op;

pub use address::Address;
pub use capability::{Capabilities, Capability};
pub use error::{CapabilityParseError, HostError, MemoryError};
pub use kind::{AddressMode, PrimitiveKind};
pub use op::{full_catalogue, Op, OpSignature, REQUIRED_OPS};
