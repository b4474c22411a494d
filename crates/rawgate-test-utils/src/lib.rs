//! Test utilities and mock types for rawgate development.
//!
//! Provides mock implementations of the probe seams ([`Provider`],
//! [`Locate`], [`UnalignedQuery`]) plus a [`GuardedRegion`] harness for
//! checking that raw writes stay inside their allocation.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod guard;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rawgate_core::{full_catalogue, OpSignature};
use rawgate_probe::{LocateError, Locate, Provider, QueryError, UnalignedQuery};

pub use guard::{GuardViolation, GuardedRegion};

/// Mock implementation of [`Provider`].
///
/// Supports the full catalogue minus any signatures hidden with
/// [`without`](MockProvider::without).
#[derive(Clone, Debug)]
pub struct MockProvider {
    name: String,
    supported: HashSet<OpSignature>,
}

impl MockProvider {
    /// A provider implementing every catalogued signature.
    pub fn full(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supported: full_catalogue().into_iter().collect(),
        }
    }

    /// A provider implementing nothing.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supported: HashSet::new(),
        }
    }

    /// Hide one signature.
    pub fn without(mut self, sig: OpSignature) -> Self {
        self.supported.remove(&sig);
        self
    }
}

impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, sig: &OpSignature) -> bool {
        self.supported.contains(sig)
    }
}

/// Mock implementation of [`Locate`] covering every locate outcome.
#[derive(Clone, Debug)]
pub enum MockLocator {
    Found(MockProvider),
    Null,
    NotFound,
    Inaccessible,
}

impl Locate for MockLocator {
    type Provider = MockProvider;

    fn locate(&self) -> Result<Option<MockProvider>, LocateError> {
        match self {
            Self::Found(p) => Ok(Some(p.clone())),
            Self::Null => Ok(None),
            Self::NotFound => Err(LocateError::NotFound {
                name: "mock".into(),
            }),
            Self::Inaccessible => Err(LocateError::Inaccessible {
                name: "mock".into(),
                reason: "instance field is private".into(),
            }),
        }
    }
}

/// Mock implementation of [`UnalignedQuery`] that counts calls.
#[derive(Debug)]
pub struct FixedQuery {
    answer: Result<bool, QueryError>,
    calls: AtomicUsize,
}

impl FixedQuery {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer: Ok(answer),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            answer: Err(QueryError::Failed {
                reason: reason.into(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the query has been consulted.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl UnalignedQuery for FixedQuery {
    fn unaligned(&self) -> Result<bool, QueryError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.answer.clone()
    }
}

/// Deterministic pseudo-random bytes for write/read-back checks.
pub fn pattern(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawgate_core::{Op, PrimitiveKind, REQUIRED_OPS};

    #[test]
    fn full_provider_supports_required_ops() {
        let provider = MockProvider::full("mock");
        assert!(REQUIRED_OPS.iter().all(|sig| provider.supports(sig)));
    }

    #[test]
    fn without_hides_exactly_one_signature() {
        let hidden = OpSignature::absolute(Op::Get(PrimitiveKind::Int));
        let provider = MockProvider::full("mock").without(hidden);
        assert!(!provider.supports(&hidden));
        assert!(provider.supports(&OpSignature::relative(Op::Get(PrimitiveKind::Int))));
    }

    #[test]
    fn fixed_query_counts_calls() {
        let query = FixedQuery::answering(true);
        assert_eq!(query.unaligned(), Ok(true));
        assert_eq!(query.unaligned(), Ok(true));
        assert_eq!(query.calls(), 2);
    }

    #[test]
    fn pattern_is_deterministic() {
        assert_eq!(pattern(7, 64), pattern(7, 64));
        assert_ne!(pattern(7, 64), pattern(8, 64));
    }
}
