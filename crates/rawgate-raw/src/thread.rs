//! Thread parking.
//!
//! Wraps [`std::thread::park`] and friends. As with any park primitive a
//! call may return spuriously; callers re-check their condition in a loop.

use std::thread::{self, Thread};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::access::RawAccess;

/// How long [`park`] may block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParkDeadline {
    /// Until unparked.
    Indefinite,
    /// For at most this long. Zero returns immediately.
    Relative(Duration),
    /// Until this wall-clock instant. A past instant returns immediately.
    Absolute(SystemTime),
}

impl ParkDeadline {
    /// Decode the `(is_absolute, time)` convention.
    ///
    /// Absolute times are milliseconds since the Unix epoch. Relative times
    /// are nanoseconds, where zero means "no timeout" and a negative value
    /// returns immediately.
    pub fn from_raw(is_absolute: bool, time: i64) -> Self {
        if is_absolute {
            let millis = u64::try_from(time).unwrap_or(0);
            Self::Absolute(UNIX_EPOCH + Duration::from_millis(millis))
        } else {
            match time {
                0 => Self::Indefinite,
                t if t < 0 => Self::Relative(Duration::ZERO),
                t => Self::Relative(Duration::from_nanos(t.unsigned_abs())),
            }
        }
    }
}

/// Block the current thread until unparked or the deadline passes.
pub fn park(deadline: ParkDeadline) {
    match deadline {
        ParkDeadline::Indefinite => thread::park(),
        ParkDeadline::Relative(timeout) => {
            if !timeout.is_zero() {
                thread::park_timeout(timeout);
            }
        }
        ParkDeadline::Absolute(at) => {
            if let Ok(remaining) = at.duration_since(SystemTime::now()) {
                thread::park_timeout(remaining);
            }
        }
    }
}

/// Wake `thread` if it is parked, or make its next park return at once.
pub fn unpark(thread: &Thread) {
    thread.unpark();
}

impl RawAccess {
    /// See [`park`].
    pub fn park(self, deadline: ParkDeadline) {
        park(deadline);
    }

    /// See [`unpark`].
    pub fn unpark(self, thread: &Thread) {
        unpark(thread);
    }
}
