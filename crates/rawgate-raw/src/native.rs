//! The in-process provider backed by this crate.
//!
//! [`NativeProvider`] advertises exactly the signatures [`RawAccess`]
//! implements on the current target. [`HostQuery`] answers the unaligned
//! access question from the target architecture.
//!
//! [`RawAccess`]: crate::RawAccess

use std::collections::HashSet;
use std::sync::OnceLock;

use rawgate_core::{full_catalogue, Op, OpSignature};
use rawgate_probe::{LocateError, Locate, Provider, QueryError, UnalignedQuery};

fn catalogue() -> &'static HashSet<OpSignature> {
    static CATALOGUE: OnceLock<HashSet<OpSignature>> = OnceLock::new();
    CATALOGUE.get_or_init(|| full_catalogue().into_iter().collect())
}

/// Provider for the raw operations compiled into this crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeProvider;

impl NativeProvider {
    /// Name reported in probe logs.
    pub const NAME: &'static str = "native";
}

impl Provider for NativeProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supports(&self, sig: &OpSignature) -> bool {
        match sig.op {
            Op::LoadAverage => sig.mode.is_none() && cfg!(any(
                target_os = "linux",
                target_os = "macos",
                target_os = "freebsd",
                target_os = "netbsd",
                target_os = "openbsd"
            )),
            _ => catalogue().contains(sig),
        }
    }
}

/// Locates the [`NativeProvider`]. Never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeLocator;

impl Locate for NativeLocator {
    type Provider = NativeProvider;

    fn locate(&self) -> Result<Option<NativeProvider>, LocateError> {
        Ok(Some(NativeProvider))
    }
}

/// Answers the unaligned-access question for an architecture.
///
/// Architectures whose base ISA handles misaligned integer loads in
/// hardware answer `true`; other known architectures answer `false`;
/// unknown names are an error, which the probe treats as `false`.
#[derive(Clone, Debug)]
pub struct HostQuery {
    arch: String,
}

impl HostQuery {
    /// Query for the given architecture name.
    pub fn new(arch: impl Into<String>) -> Self {
        Self { arch: arch.into() }
    }

    /// Query for the architecture this crate was compiled for.
    pub fn host() -> Self {
        Self::new(std::env::consts::ARCH)
    }
}

impl Default for HostQuery {
    fn default() -> Self {
        Self::host()
    }
}

impl UnalignedQuery for HostQuery {
    fn unaligned(&self) -> Result<bool, QueryError> {
        match rawgate_probe::normalize_arch(&self.arch).as_str() {
            "x86" | "x86_64" | "s390x" => Ok(true),
            "arm" | "aarch64" | "powerpc" | "powerpc64" | "mips" | "mips64" | "riscv32"
            | "riscv64" | "sparc" | "sparc64" | "loongarch64" | "wasm32" | "wasm64" => Ok(false),
            _ => Err(QueryError::UnsupportedArch {
                arch: self.arch.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawgate_core::{PrimitiveKind, REQUIRED_OPS};

    #[test]
    fn native_provider_supports_every_required_op() {
        for sig in REQUIRED_OPS {
            assert!(NativeProvider.supports(sig), "{sig}");
        }
    }

    #[test]
    fn native_provider_rejects_uncatalogued_shapes() {
        let sig = OpSignature::absolute(Op::Get(PrimitiveKind::Object));
        assert!(!NativeProvider.supports(&sig));
        let sig = OpSignature::relative(Op::GetAndAdd(PrimitiveKind::Byte));
        assert!(!NativeProvider.supports(&sig));
    }

    #[test]
    fn locator_always_finds_provider() {
        let provider = NativeLocator.locate().unwrap().unwrap();
        assert_eq!(provider.name(), "native");
    }

    #[test]
    fn host_query_by_arch() {
        assert_eq!(HostQuery::new("x86_64").unaligned(), Ok(true));
        assert_eq!(HostQuery::new("amd64").unaligned(), Ok(true));
        assert_eq!(HostQuery::new("riscv64").unaligned(), Ok(false));
        assert!(matches!(
            HostQuery::new("vax").unaligned(),
            Err(QueryError::UnsupportedArch { .. })
        ));
    }
}
