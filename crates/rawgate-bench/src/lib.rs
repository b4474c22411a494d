//! Benchmark profiles for rawgate.
//!
//! - [`fast_gateway`]: available with unaligned access (word-at-a-time paths)
//! - [`aligned_only_gateway`]: available, but byte helpers take the safe path
//! - [`key_set`]: deterministic byte keys sharing a common prefix

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rawgate::probe::ProbeConfig;
use rawgate::Gateway;

/// A gateway probed as if on an allow-listed architecture.
pub fn fast_gateway() -> Gateway {
    Gateway::probe(ProbeConfig::new().with_arch("aarch64"))
}

/// A gateway with the provider available but unaligned access refused.
pub fn aligned_only_gateway() -> Gateway {
    Gateway::probe(
        ProbeConfig::new()
            .with_arch("riscv64")
            .with_forced_unaligned_arches(Vec::<String>::new()),
    )
}

/// `count` keys of `len` bytes that share their first `len - 8` bytes, so
/// comparisons have to scan almost the whole key.
pub fn key_set(seed: u64, count: usize, len: usize) -> Vec<Vec<u8>> {
    let prefix_len = len.saturating_sub(8);
    let prefix = rawgate_test_utils::pattern(seed, prefix_len);
    (0..count as u64)
        .map(|i| {
            let mut key = prefix.clone();
            key.extend_from_slice(&rawgate_test_utils::pattern(seed ^ (i + 1), len - prefix_len));
            key
        })
        .collect()
}
