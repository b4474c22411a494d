//! Host load average.

#![allow(unsafe_code)]

use rawgate_core::HostError;
use smallvec::SmallVec;

use crate::access::RawAccess;

/// Load-average samples: the 1, 5 and 15 minute averages, truncated to the
/// number requested.
pub type LoadAverage = SmallVec<[f64; 3]>;

/// Read up to `nelems` (1 to 3) system load-average samples.
///
/// May return fewer samples than requested if the system reports fewer.
pub fn load_average(nelems: usize) -> Result<LoadAverage, HostError> {
    if !(1..=3).contains(&nelems) {
        return Err(HostError::InvalidSampleCount { requested: nelems });
    }
    query(nelems)
}

#[cfg(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
fn query(nelems: usize) -> Result<LoadAverage, HostError> {
    let mut samples = [0f64; 3];
    // SAFETY: `samples` holds at least `nelems` doubles; nelems is in 1..=3.
    let got = unsafe { libc::getloadavg(samples.as_mut_ptr(), nelems as libc::c_int) };
    match usize::try_from(got) {
        Ok(n) if n > 0 => Ok(samples[..n.min(nelems)].iter().copied().collect()),
        _ => Err(HostError::LoadAverageUnavailable),
    }
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
fn query(_nelems: usize) -> Result<LoadAverage, HostError> {
    Err(HostError::Unsupported {
        what: "load average",
    })
}

impl RawAccess {
    /// See [`load_average`].
    pub fn load_average(self, nelems: usize) -> Result<LoadAverage, HostError> {
        load_average(nelems)
    }
}
