//! Integration test: every way the provider can be unusable disables the
//! whole capability, and unaligned support never outlives availability.

use rawgate_core::{OpSignature, REQUIRED_OPS};
use rawgate_probe::{Probe, ProbeConfig, ProbeFailure, UnalignedSource};
use rawgate_test_utils::{FixedQuery, MockLocator, MockProvider};

fn probe_on(arch: &str) -> Probe {
    Probe::new(ProbeConfig::new().with_arch(arch))
}

#[test]
fn complete_provider_is_available() {
    let locator = MockLocator::Found(MockProvider::full("complete"));
    let query = FixedQuery::answering(true);
    let (report, provider) = probe_on("x86_64").run(&locator, &query);

    assert!(report.is_available());
    assert!(report.is_unaligned_access_supported());
    assert_eq!(report.unaligned_source, UnalignedSource::RuntimeQuery);
    assert!(provider.is_some());
    assert_eq!(query.calls(), 1);
}

#[test]
fn hiding_any_single_required_op_disables_capability() {
    for &hidden in REQUIRED_OPS {
        let locator = MockLocator::Found(MockProvider::full("partial").without(hidden));
        let query = FixedQuery::answering(true);
        let (report, provider) = probe_on("x86_64").run(&locator, &query);

        assert!(!report.is_available(), "hiding {hidden} left capability on");
        assert!(!report.is_unaligned_access_supported());
        assert!(provider.is_none());
        assert_eq!(report.missing.as_slice(), &[hidden]);
        match report.failure {
            Some(ProbeFailure::MissingOperations { first, count, .. }) => {
                assert_eq!(first, hidden);
                assert_eq!(count, 1);
            }
            other => panic!("unexpected failure {other:?}"),
        }
        assert_eq!(query.calls(), 0);
    }
}

#[test]
fn hiding_optional_op_keeps_capability() {
    let optional = rawgate_core::full_catalogue()
        .into_iter()
        .find(|sig| !REQUIRED_OPS.contains(sig))
        .expect("catalogue has optional ops");
    let locator = MockLocator::Found(MockProvider::full("optional").without(optional));
    let (report, _) = probe_on("x86_64").run(&locator, &FixedQuery::answering(false));
    assert!(report.is_available());
    assert!(!report.is_unaligned_access_supported());
}

#[test]
fn empty_provider_reports_every_missing_op() {
    let locator = MockLocator::Found(MockProvider::empty("empty"));
    let (report, _) = probe_on("x86_64").run(&locator, &FixedQuery::answering(true));
    let missing: Vec<OpSignature> = report.missing.to_vec();
    assert_eq!(missing, REQUIRED_OPS.to_vec());
}

#[test]
fn locate_failures_fail_closed_on_every_arch() {
    for locator in [
        MockLocator::Null,
        MockLocator::NotFound,
        MockLocator::Inaccessible,
    ] {
        for arch in ["x86_64", "aarch64", "powerpc64"] {
            let query = FixedQuery::answering(true);
            let (report, _) = probe_on(arch).run(&locator, &query);
            assert!(!report.is_available());
            assert!(
                !report.is_unaligned_access_supported(),
                "{locator:?} on {arch} claimed unaligned access"
            );
            assert_eq!(query.calls(), 0);
        }
    }
}

#[test]
fn forced_arches_ignore_runtime_answer() {
    for arch in ["aarch64", "ppc64", "ppc64le"] {
        let locator = MockLocator::Found(MockProvider::full("complete"));
        let query = FixedQuery::answering(false);
        let (report, _) = probe_on(arch).run(&locator, &query);
        assert!(report.is_unaligned_access_supported(), "{arch}");
        assert_eq!(report.unaligned_source, UnalignedSource::ForcedArch);
        assert_eq!(query.calls(), 0);
    }
}

#[test]
fn failing_runtime_query_defaults_to_false() {
    let locator = MockLocator::Found(MockProvider::full("complete"));
    let query = FixedQuery::failing("no such method");
    let (report, _) = probe_on("x86_64").run(&locator, &query);
    assert!(report.is_available());
    assert!(!report.is_unaligned_access_supported());
    assert!(matches!(
        report.unaligned_source,
        UnalignedSource::QueryFailed(_)
    ));
}
