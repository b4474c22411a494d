//! Startup capability probing for rawgate.
//!
//! Runs once per process (or once per [`Gateway`] in tests) and answers two
//! questions: can the raw provider be used at all, and may multi-byte
//! accesses be unaligned? The answers are folded into an immutable
//! [`Capabilities`](rawgate_core::Capabilities) value.
//!
//! # Probe order
//!
//! ```text
//! Locate::locate()
//! ├── Err / Ok(None)         → unavailable (warn)
//! └── Ok(Some(provider))
//!     └── supports(sig) for every required signature
//!         ├── any missing    → unavailable (warn per signature)
//!         └── all present    → available
//!             ├── arch on allow-list → unaligned = true
//!             └── UnalignedQuery     → answer, or false on error (warn)
//! ```
//!
//! [`Gateway`]: https://docs.rs/rawgate/latest/rawgate/struct.Gateway.html

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod probe;
pub mod provider;

pub use config::{normalize_arch, ProbeConfig};
pub use error::{LocateError, ProbeFailure, QueryError};
pub use probe::{Probe, ProbeReport, UnalignedSource};
pub use provider::{Locate, Provider, UnalignedQuery};
