//! The startup probe.
//!
//! [`Probe::run`] locates the provider, checks every required signature,
//! then decides unaligned-access support. It never panics and never
//! returns an error: each failure mode produces a disabled flag, a
//! [`ProbeFailure`] in the report, and a warning in the log.

use log::{debug, info, warn};
use rawgate_core::{Capabilities, OpSignature};
use smallvec::SmallVec;

use crate::config::ProbeConfig;
use crate::error::{ProbeFailure, QueryError};
use crate::provider::{Locate, Provider, UnalignedQuery};

/// How the unaligned-access flag was decided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnalignedSource {
    /// Forced false because the provider is unavailable.
    Unavailable,
    /// Forced true by the architecture allow-list.
    ForcedArch,
    /// Answered by the runtime query.
    RuntimeQuery,
    /// The runtime query failed; defaulted to false.
    QueryFailed(QueryError),
}

/// Everything the probe learned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeReport {
    /// The resulting flags.
    pub capabilities: Capabilities,
    /// Name of the located provider, if one was found.
    pub provider: Option<String>,
    /// Every required signature the provider lacks, in config order.
    pub missing: SmallVec<[OpSignature; 4]>,
    /// Why availability is false, if it is.
    pub failure: Option<ProbeFailure>,
    /// How the unaligned flag was decided.
    pub unaligned_source: UnalignedSource,
}

impl ProbeReport {
    /// Shorthand for `capabilities.is_available()`.
    pub fn is_available(&self) -> bool {
        self.capabilities.is_available()
    }

    /// Shorthand for `capabilities.is_unaligned_access_supported()`.
    pub fn is_unaligned_access_supported(&self) -> bool {
        self.capabilities.is_unaligned_access_supported()
    }
}

/// A configured capability probe.
pub struct Probe {
    config: ProbeConfig,
}

impl Probe {
    /// Create a probe with the given configuration.
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// The probe's configuration.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Run the probe against a locator and an unaligned query.
    ///
    /// Returns the located provider alongside the report so the caller can
    /// keep using it; the provider is `None` whenever availability is false.
    pub fn run<L, Q>(&self, locator: &L, query: &Q) -> (ProbeReport, Option<L::Provider>)
    where
        L: Locate,
        Q: UnalignedQuery,
    {
        let (provider, missing, failure) = self.check_available(locator);
        let available = failure.is_none();
        let (unaligned, unaligned_source) = self.check_unaligned(available, query);

        let report = ProbeReport {
            capabilities: Capabilities::new(available, unaligned),
            provider: provider.as_ref().map(|p| p.name().to_string()),
            missing,
            failure,
            unaligned_source,
        };
        info!(
            "raw capability probe on {}: {}",
            self.config.arch, report.capabilities
        );

        let provider = if available { provider } else { None };
        (report, provider)
    }

    fn check_available<L: Locate>(
        &self,
        locator: &L,
    ) -> (
        Option<L::Provider>,
        SmallVec<[OpSignature; 4]>,
        Option<ProbeFailure>,
    ) {
        let provider = match locator.locate() {
            Ok(Some(p)) => p,
            Ok(None) => {
                warn!("could not get the raw provider instance: instance is null");
                return (None, SmallVec::new(), Some(ProbeFailure::NullInstance));
            }
            Err(e) => {
                warn!("raw provider is not available/accessible: {e}");
                return (None, SmallVec::new(), Some(ProbeFailure::Locate(e)));
            }
        };

        let missing: SmallVec<[OpSignature; 4]> = self
            .config
            .required_ops
            .iter()
            .filter(|sig| {
                let present = provider.supports(sig);
                debug!("{}: {sig} present={present}", provider.name());
                !present
            })
            .copied()
            .collect();

        if missing.is_empty() {
            return (Some(provider), missing, None);
        }
        for sig in &missing {
            warn!("{} is missing {sig}", provider.name());
        }
        let failure = ProbeFailure::MissingOperations {
            provider: provider.name().to_string(),
            first: missing[0],
            count: missing.len(),
        };
        (Some(provider), missing, Some(failure))
    }

    fn check_unaligned<Q: UnalignedQuery>(
        &self,
        available: bool,
        query: &Q,
    ) -> (bool, UnalignedSource) {
        if !available {
            return (false, UnalignedSource::Unavailable);
        }
        if self.config.is_forced_unaligned() {
            debug!(
                "unaligned access forced on for {} (runtime detection is unreliable there)",
                self.config.arch
            );
            return (true, UnalignedSource::ForcedArch);
        }
        match query.unaligned() {
            Ok(unaligned) => (unaligned, UnalignedSource::RuntimeQuery),
            Err(e) => {
                warn!("{e}; raw unaligned reads and writes of primitive types won't be used");
                (false, UnalignedSource::QueryFailed(e))
            }
        }
    }
}

impl Default for Probe {
    fn default() -> Self {
        Self::new(ProbeConfig::default())
    }
}
