//! Probe error types.
//!
//! None of these escape as panics: every one of them turns into a
//! fail-closed capability flag plus a log line.

use rawgate_core::OpSignature;
use thiserror::Error;

/// Why a provider could not be located.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LocateError {
    /// The provider is not present in this build or on this platform.
    #[error("provider {name} is not present")]
    NotFound {
        /// Name of the provider that was looked for.
        name: String,
    },
    /// The provider exists but its shared instance could not be obtained.
    #[error("provider {name} instance is not accessible: {reason}")]
    Inaccessible {
        /// Name of the provider.
        name: String,
        /// Why access failed.
        reason: String,
    },
}

/// Why the runtime unaligned-access query could not answer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The query is not implemented for this architecture.
    #[error("unaligned-access query is not supported on {arch}")]
    UnsupportedArch {
        /// The architecture that was queried.
        arch: String,
    },
    /// The query itself failed.
    #[error("unaligned-access query failed: {reason}")]
    Failed {
        /// Description of the failure.
        reason: String,
    },
}

/// The reason a probe left the capability disabled.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    /// The provider could not be located.
    #[error("provider could not be located: {0}")]
    Locate(#[from] LocateError),
    /// The provider was located but its instance is null.
    #[error("provider instance is null")]
    NullInstance,
    /// The provider lacks one or more required operations.
    #[error("provider {provider} is missing {first} ({count} required operation(s) missing)")]
    MissingOperations {
        /// Name of the provider.
        provider: String,
        /// The first missing signature, in catalogue order.
        first: OpSignature,
        /// Total number of missing signatures.
        count: usize,
    },
}
