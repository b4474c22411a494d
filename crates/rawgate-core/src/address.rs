//! Bare off-heap addresses.

use std::fmt;
use std::ptr;

/// An integer naming a raw memory location outside any owned Rust value.
///
/// Valid from the allocation that produced it until it is freed. Address
/// arithmetic wraps; nothing here checks that the result is still inside
/// the allocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub usize);

impl Address {
    /// The null address. Returned for zero-byte allocations.
    pub const NULL: Self = Self(0);

    /// Whether this is the null address.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The address `bytes` further on (wrapping).
    pub const fn add(self, bytes: usize) -> Self {
        Self(self.0.wrapping_add(bytes))
    }

    /// The address displaced by a signed byte offset (wrapping).
    pub const fn offset(self, bytes: isize) -> Self {
        Self(self.0.wrapping_add_signed(bytes))
    }

    /// Whether the address is a multiple of `align` (a power of two).
    pub const fn is_aligned_to(self, align: usize) -> bool {
        self.0 & (align - 1) == 0
    }

    /// Reinterpret as a raw pointer.
    ///
    /// The pointer picks up whichever exposed provenance covers the address,
    /// so the allocation must have been exposed, for example through
    /// [`from_ptr`](Self::from_ptr).
    pub fn as_ptr<T>(self) -> *mut T {
        ptr::with_exposed_provenance_mut(self.0)
    }

    /// The address a pointer refers to. Exposes the pointer's provenance.
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr.expose_provenance())
    }
}

impl From<usize> for Address {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
