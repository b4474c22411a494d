//! The capability gateway: probe result plus the access token it earned.

#![allow(unsafe_code)]

use std::sync::OnceLock;

use log::debug;
use rawgate_core::{Capabilities, Capability};
use rawgate_probe::{
    Locate, LocateError, Probe, ProbeConfig, ProbeReport, QueryError, UnalignedQuery,
};
use rawgate_raw::{HostQuery, NativeLocator, NativeProvider, RawAccess};

/// Immutable record of what the startup probe found.
///
/// A `Gateway` holds a [`RawAccess`] token only when the probe reported
/// the provider available; [`raw`](Gateway::raw) is the single place that
/// hands it out. Operations performed through the token always run on the
/// primitives compiled into `rawgate-raw`; the probe decides whether they
/// may be used.
#[derive(Clone, Debug)]
pub struct Gateway {
    report: ProbeReport,
    raw: Option<RawAccess>,
}

impl Gateway {
    /// Probe the in-process provider with `config`.
    pub fn probe(config: ProbeConfig) -> Self {
        let query = HostQuery::new(config.arch.clone());
        Self::probe_with(config, &NativeLocator, &query)
    }

    /// Probe an arbitrary locator and unaligned query.
    pub fn probe_with<L, Q>(config: ProbeConfig, locator: &L, query: &Q) -> Self
    where
        L: Locate,
        Q: UnalignedQuery,
    {
        let (report, provider) = Probe::new(config).run(locator, query);
        let raw = match provider {
            // SAFETY: the probe located the provider and confirmed every
            // required signature.
            Some(_) => Some(unsafe { RawAccess::new_unchecked() }),
            None => None,
        };
        Self { report, raw }
    }

    /// A gateway that never grants raw access.
    pub fn disabled() -> Self {
        let config = ProbeConfig::new();
        let locator = || -> Result<Option<NativeProvider>, LocateError> { Ok(None) };
        let query = || -> Result<bool, QueryError> { Ok(false) };
        Self::probe_with(config, &locator, &query)
    }

    /// Whether the raw provider may be used at all.
    pub fn is_available(&self) -> bool {
        self.report.is_available()
    }

    /// Whether multi-byte raw access may use unaligned addresses.
    ///
    /// Always false when [`is_available`](Self::is_available) is false.
    pub fn is_unaligned_access_supported(&self) -> bool {
        self.report.is_unaligned_access_supported()
    }

    /// The capability flags.
    pub fn capabilities(&self) -> Capabilities {
        self.report.capabilities
    }

    /// Query a flag by capability name.
    pub fn supports(&self, capability: Capability) -> bool {
        self.report.capabilities.supports(capability)
    }

    /// The full probe report.
    pub fn report(&self) -> &ProbeReport {
        &self.report
    }

    /// The raw access token, if the provider is available.
    pub fn raw(&self) -> Option<RawAccess> {
        self.raw
    }

    /// The token, but only when unaligned multi-byte access is also
    /// supported. Fast paths that read words out of byte arrays use this.
    pub fn unaligned_raw(&self) -> Option<RawAccess> {
        self.raw.filter(|_| self.is_unaligned_access_supported())
    }
}

/// The process-wide gateway, probing the host on first use.
pub fn global() -> &'static Gateway {
    static GLOBAL: OnceLock<Gateway> = OnceLock::new();
    GLOBAL.get_or_init(|| {
        debug!("probing process-wide raw capability");
        Gateway::probe(ProbeConfig::default())
    })
}

/// Shorthand for `global().is_available()`.
pub fn is_available() -> bool {
    global().is_available()
}

/// Shorthand for `global().is_unaligned_access_supported()`.
pub fn is_unaligned_access_supported() -> bool {
    global().is_unaligned_access_supported()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_probe_grants_token() {
        let gateway = Gateway::probe(ProbeConfig::new());
        assert!(gateway.is_available());
        assert!(gateway.raw().is_some());
        assert_eq!(gateway.report().provider.as_deref(), Some("native"));
    }

    #[test]
    fn disabled_gateway_has_no_token() {
        let gateway = Gateway::disabled();
        assert!(!gateway.is_available());
        assert!(!gateway.is_unaligned_access_supported());
        assert!(gateway.raw().is_none());
        assert!(gateway.unaligned_raw().is_none());
    }

    #[test]
    fn global_is_probed_once() {
        assert!(std::ptr::eq(global(), global()));
        assert_eq!(is_available(), global().is_available());
    }

    #[test]
    fn forced_arch_enables_unaligned_fast_path() {
        let gateway = Gateway::probe(ProbeConfig::new().with_arch("aarch64"));
        assert!(gateway.is_unaligned_access_supported());
        assert!(gateway.unaligned_raw().is_some());
        assert!(gateway.supports(Capability::UnalignedAccess));
    }
}
