//! The seams the probe runs against.
//!
//! A [`Locate`] implementation finds the raw provider, the [`Provider`]
//! advertises which operation signatures it implements, and an
//! [`UnalignedQuery`] answers whether the platform tolerates unaligned
//! multi-byte access. Production uses the native implementations in
//! `rawgate-raw`; tests substitute mocks.

use rawgate_core::OpSignature;

use crate::error::{LocateError, QueryError};

/// A source of raw memory primitives.
pub trait Provider {
    /// Human-readable provider name, used in log lines and reports.
    fn name(&self) -> &str;

    /// Whether the provider implements `sig`.
    fn supports(&self, sig: &OpSignature) -> bool;
}

impl<P: Provider + ?Sized> Provider for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn supports(&self, sig: &OpSignature) -> bool {
        (**self).supports(sig)
    }
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn supports(&self, sig: &OpSignature) -> bool {
        (**self).supports(sig)
    }
}

/// Finds the provider instance.
///
/// `Ok(None)` means the provider exists but its shared instance is null;
/// the probe treats that the same way as a locate error.
pub trait Locate {
    /// The provider type this locator yields.
    type Provider: Provider;

    /// Look the provider up.
    fn locate(&self) -> Result<Option<Self::Provider>, LocateError>;
}

impl<P, F> Locate for F
where
    P: Provider,
    F: Fn() -> Result<Option<P>, LocateError>,
{
    type Provider = P;

    fn locate(&self) -> Result<Option<P>, LocateError> {
        self()
    }
}

/// The runtime's own unaligned-access detection.
pub trait UnalignedQuery {
    /// Whether unaligned multi-byte access is safe on this platform.
    fn unaligned(&self) -> Result<bool, QueryError>;
}

impl<F> UnalignedQuery for F
where
    F: Fn() -> Result<bool, QueryError>,
{
    fn unaligned(&self) -> Result<bool, QueryError> {
        self()
    }
}
