//! Guard-region harness for raw write tests.
//!
//! A [`GuardedRegion`] is a byte buffer laid out as
//! `[guard | payload | guard]`, with both guards filled with a canary byte.
//! Tests hand the payload pointer to raw code, then call
//! [`check`](GuardedRegion::check) to confirm nothing was written outside it.

use std::fmt;

/// Canary byte written into both guards.
pub const CANARY: u8 = 0xA5;

/// A guard byte that no longer holds the canary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardViolation {
    /// Offset of the corrupted byte relative to the payload start
    /// (negative for the leading guard).
    pub offset: isize,
    /// The value found there.
    pub found: u8,
}

impl fmt::Display for GuardViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "guard byte at payload offset {} holds {:#04x}, expected {:#04x}",
            self.offset, self.found, CANARY
        )
    }
}

impl std::error::Error for GuardViolation {}

/// A payload surrounded by canary-filled guards.
pub struct GuardedRegion {
    bytes: Vec<u8>,
    guard: usize,
    len: usize,
}

impl GuardedRegion {
    /// Allocate a zeroed payload of `len` bytes with `guard` canary bytes
    /// on each side.
    pub fn new(len: usize, guard: usize) -> Self {
        let mut bytes = vec![CANARY; len + 2 * guard];
        bytes[guard..guard + len].fill(0);
        Self { bytes, guard, len }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pointer to the first payload byte.
    pub fn payload_ptr(&mut self) -> *mut u8 {
        self.bytes[self.guard..].as_mut_ptr()
    }

    /// The payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[self.guard..self.guard + self.len]
    }

    /// Confirm both guards still hold the canary.
    pub fn check(&self) -> Result<(), GuardViolation> {
        let tail_start = self.guard + self.len;
        let leading = self.bytes[..self.guard].iter().enumerate();
        let trailing = self.bytes[tail_start..]
            .iter()
            .enumerate()
            .map(|(i, b)| (tail_start + i, b));
        for (i, &b) in leading.chain(trailing) {
            if b != CANARY {
                return Err(GuardViolation {
                    offset: i as isize - self.guard as isize,
                    found: b,
                });
            }
        }
        Ok(())
    }
}
