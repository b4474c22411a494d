//! Probe configuration parameters.

use rawgate_core::{OpSignature, REQUIRED_OPS};

/// Configuration for a capability probe.
///
/// The defaults describe the host process. Tests override `arch` and
/// `required_ops` to exercise the fail-closed and allow-list paths on any
/// machine. Immutable once handed to [`Probe`](crate::Probe).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Target architecture name, as in [`std::env::consts::ARCH`].
    ///
    /// Default: the architecture this crate was compiled for.
    pub arch: String,

    /// Architectures on which unaligned access is assumed without
    /// consulting the runtime query.
    ///
    /// Default: [`ProbeConfig::DEFAULT_FORCED_UNALIGNED_ARCHES`]. The
    /// runtime's own detection reports false negatives on these.
    pub forced_unaligned_arches: Vec<String>,

    /// Signatures that must all be present for the capability to be
    /// enabled.
    ///
    /// Default: [`REQUIRED_OPS`].
    pub required_ops: Vec<OpSignature>,
}

impl ProbeConfig {
    /// Architectures forced to report unaligned support.
    pub const DEFAULT_FORCED_UNALIGNED_ARCHES: &'static [&'static str] =
        &["powerpc64", "aarch64"];

    /// Create a config for the host architecture with default lists.
    pub fn new() -> Self {
        Self {
            arch: std::env::consts::ARCH.to_string(),
            forced_unaligned_arches: Self::DEFAULT_FORCED_UNALIGNED_ARCHES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            required_ops: REQUIRED_OPS.to_vec(),
        }
    }

    /// Replace the architecture name.
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    /// Replace the forced-unaligned allow-list.
    pub fn with_forced_unaligned_arches<I, S>(mut self, arches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.forced_unaligned_arches = arches.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the required-operation list.
    pub fn with_required_ops(mut self, ops: impl IntoIterator<Item = OpSignature>) -> Self {
        self.required_ops = ops.into_iter().collect();
        self
    }

    /// Whether `arch` is on the forced-unaligned allow-list.
    ///
    /// Names are compared after normalisation, so `ppc64le` matches
    /// `powerpc64` and `arm64` matches `aarch64`.
    pub fn is_forced_unaligned(&self) -> bool {
        let arch = normalize_arch(&self.arch);
        self.forced_unaligned_arches
            .iter()
            .any(|a| normalize_arch(a) == arch)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Map the common aliases of an architecture name onto the Rust name.
pub fn normalize_arch(arch: &str) -> String {
    let lower = arch.trim().to_ascii_lowercase();
    match lower.as_str() {
        "ppc64" | "ppc64le" | "powerpc64le" => "powerpc64".to_string(),
        "amd64" | "x64" => "x86_64".to_string(),
        "arm64" => "aarch64".to_string(),
        "i386" | "i486" | "i586" | "i686" => "x86".to_string(),
        _ => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_host_arch_and_required_catalogue() {
        let config = ProbeConfig::default();
        assert_eq!(config.arch, std::env::consts::ARCH);
        assert_eq!(config.required_ops.len(), REQUIRED_OPS.len());
        assert_eq!(config.forced_unaligned_arches, vec!["powerpc64", "aarch64"]);
    }

    #[test]
    fn aliases_match_allow_list() {
        for arch in ["ppc64", "ppc64le", "powerpc64", "aarch64", "ARM64"] {
            let config = ProbeConfig::new().with_arch(arch);
            assert!(config.is_forced_unaligned(), "{arch} should be forced");
        }
    }

    #[test]
    fn other_arches_are_not_forced() {
        for arch in ["x86_64", "amd64", "riscv64", "sparc64", "x86"] {
            let config = ProbeConfig::new().with_arch(arch);
            assert!(!config.is_forced_unaligned(), "{arch} should not be forced");
        }
    }

    #[test]
    fn empty_allow_list_forces_nothing() {
        let config = ProbeConfig::new()
            .with_arch("aarch64")
            .with_forced_unaligned_arches(Vec::<String>::new());
        assert!(!config.is_forced_unaligned());
    }

    #[test]
    fn normalize_is_case_insensitive() {
        assert_eq!(normalize_arch(" AMD64 "), "x86_64");
        assert_eq!(normalize_arch("i686"), "x86");
        assert_eq!(normalize_arch("mips"), "mips");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn normalize_is_idempotent(arch in "[ A-Za-z0-9_]{0,12}") {
                let once = normalize_arch(&arch);
                prop_assert_eq!(normalize_arch(&once), once);
            }

            #[test]
            fn forcing_ignores_case_and_padding(
                arch in prop::sample::select(vec!["ppc64le", "powerpc64", "arm64", "aarch64"]),
                upper: bool,
                pad in " {0,2}",
            ) {
                let shown = if upper { arch.to_ascii_uppercase() } else { arch.to_string() };
                let config = ProbeConfig::new().with_arch(format!("{pad}{shown}{pad}"));
                prop_assert!(config.is_forced_unaligned());
            }
        }
    }
}
