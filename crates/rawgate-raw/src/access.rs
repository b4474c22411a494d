//! The unchecked access token.
//!
//! [`RawAccess`] is a zero-sized proof that the startup probe found the
//! native primitives usable. Every method that touches caller-supplied
//! memory is an `unsafe fn`: nothing here checks bounds, types, liveness or
//! (for plain accesses) alignment. Each method documents what the caller
//! must guarantee.
//!
//! # Addressing
//!
//! - Relative methods (`get`, `put`, `compare_and_swap`, ...) take a base
//!   pointer and a signed byte offset. A null base makes the offset an
//!   absolute address.
//! - Absolute methods (`get_at`, `put_at`, ...) take an [`Address`].

#![allow(unsafe_code)]

use std::ptr;

use rawgate_core::Address;

use crate::primitive::{AtomicInteger, AtomicWord, Primitive};

/// Capability token for the raw memory surface.
///
/// Cannot be constructed outside this crate except through
/// [`RawAccess::new_unchecked`]; the facade mints one only after a
/// successful probe.
#[derive(Clone, Copy, Debug)]
pub struct RawAccess {
    _private: (),
}

// Compile-time assertion: RawAccess must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<RawAccess>();
};

/// Resolve a `(base, offset)` pair. A null base makes the offset an
/// absolute address, which must belong to an exposed allocation.
#[inline(always)]
pub(crate) fn locate<T>(base: *const u8, offset: isize) -> *mut T {
    if base.is_null() {
        ptr::with_exposed_provenance_mut(offset as usize)
    } else {
        base.wrapping_offset(offset).cast_mut().cast::<T>()
    }
}

impl RawAccess {
    pub(crate) const INSTANCE: Self = Self { _private: () };

    /// Mint a token without running the probe.
    ///
    /// # Safety
    ///
    /// The caller must have established that the native primitives are
    /// usable in this process, normally by observing an available
    /// [`ProbeReport`](rawgate_probe::ProbeReport).
    pub const unsafe fn new_unchecked() -> Self {
        Self::INSTANCE
    }

    // =====================================================================
    // Plain loads and stores
    // =====================================================================

    /// Load a `T` at `base + offset`.
    ///
    /// # Safety
    ///
    /// `base + offset` must be valid for reads of `size_of::<T>()` bytes
    /// and hold a valid `T` (for `bool`, a 0 or 1 byte). Alignment is not
    /// required.
    #[inline]
    pub unsafe fn get<T: Primitive>(self, base: *const u8, offset: isize) -> T {
        // SAFETY: caller contract above.
        unsafe { ptr::read_unaligned(locate::<T>(base, offset)) }
    }

    /// Store a `T` at `base + offset`.
    ///
    /// # Safety
    ///
    /// `base + offset` must be valid for writes of `size_of::<T>()` bytes
    /// and not aliased by a live Rust reference. Alignment is not required.
    #[inline]
    pub unsafe fn put<T: Primitive>(self, base: *mut u8, offset: isize, value: T) {
        // SAFETY: caller contract above.
        unsafe { ptr::write_unaligned(locate::<T>(base, offset), value) }
    }

    /// Load a `T` at an absolute address.
    ///
    /// # Safety
    ///
    /// As for [`get`](Self::get) with a null base.
    #[inline]
    pub unsafe fn get_at<T: Primitive>(self, address: Address) -> T {
        // SAFETY: caller contract above.
        unsafe { ptr::read_unaligned(address.as_ptr::<T>()) }
    }

    /// Store a `T` at an absolute address.
    ///
    /// # Safety
    ///
    /// As for [`put`](Self::put) with a null base.
    #[inline]
    pub unsafe fn put_at<T: Primitive>(self, address: Address, value: T) {
        // SAFETY: caller contract above.
        unsafe { ptr::write_unaligned(address.as_ptr::<T>(), value) }
    }

    /// Load a pointer-width address stored at `address`.
    ///
    /// # Safety
    ///
    /// As for [`get_at`](Self::get_at).
    #[inline]
    pub unsafe fn get_address(self, address: Address) -> Address {
        // SAFETY: caller contract above.
        Address(unsafe { self.get_at::<usize>(address) })
    }

    /// Store a pointer-width address at `address`.
    ///
    /// # Safety
    ///
    /// As for [`put_at`](Self::put_at).
    #[inline]
    pub unsafe fn put_address(self, address: Address, value: Address) {
        // SAFETY: caller contract above.
        unsafe { self.put_at::<usize>(address, value.0) }
    }

    // =====================================================================
    // Volatile and ordered accesses
    // =====================================================================

    /// Sequentially consistent load of a `T` at `base + offset`.
    ///
    /// # Safety
    ///
    /// As for [`get`](Self::get), and the location must be aligned to
    /// `align_of::<T>()`.
    #[inline]
    pub unsafe fn get_volatile<T: Primitive>(self, base: *const u8, offset: isize) -> T {
        // SAFETY: caller contract above.
        unsafe { T::load_volatile(locate::<T>(base, offset)) }
    }

    /// Sequentially consistent store of a `T` at `base + offset`.
    ///
    /// # Safety
    ///
    /// As for [`put`](Self::put), and the location must be aligned to
    /// `align_of::<T>()`.
    #[inline]
    pub unsafe fn put_volatile<T: Primitive>(self, base: *mut u8, offset: isize, value: T) {
        // SAFETY: caller contract above.
        unsafe { T::store_volatile(locate::<T>(base, offset), value) }
    }

    /// Release store of a `T` at `base + offset`.
    ///
    /// Cheaper than [`put_volatile`](Self::put_volatile): the value becomes
    /// visible to a thread that later acquires it, but later loads on this
    /// thread may be reordered before the store.
    ///
    /// # Safety
    ///
    /// As for [`put_volatile`](Self::put_volatile).
    #[inline]
    pub unsafe fn put_ordered<T: Primitive>(self, base: *mut u8, offset: isize, value: T) {
        // SAFETY: caller contract above.
        unsafe { T::store_release(locate::<T>(base, offset), value) }
    }

    // =====================================================================
    // Atomic read-modify-write
    // =====================================================================

    /// Atomically replace the `T` at `base + offset` with `new` if it
    /// equals `expected`. Returns whether the swap happened.
    ///
    /// # Safety
    ///
    /// As for [`put_volatile`](Self::put_volatile), and concurrent accesses
    /// by other threads must also be atomic.
    #[inline]
    pub unsafe fn compare_and_swap<T: AtomicWord>(
        self,
        base: *mut u8,
        offset: isize,
        expected: T,
        new: T,
    ) -> bool {
        // SAFETY: caller contract above.
        unsafe { T::compare_and_swap(locate::<T>(base, offset), expected, new) }
    }

    /// Atomically add `delta` to the integer at `base + offset`, returning
    /// the previous value. Wraps on overflow.
    ///
    /// # Safety
    ///
    /// As for [`compare_and_swap`](Self::compare_and_swap).
    #[inline]
    pub unsafe fn get_and_add<T: AtomicInteger>(self, base: *mut u8, offset: isize, delta: T) -> T {
        // SAFETY: caller contract above.
        unsafe { T::fetch_add(locate::<T>(base, offset), delta) }
    }

    /// Atomically store `new` at `base + offset`, returning the previous
    /// value.
    ///
    /// # Safety
    ///
    /// As for [`compare_and_swap`](Self::compare_and_swap).
    #[inline]
    pub unsafe fn get_and_set<T: AtomicWord>(self, base: *mut u8, offset: isize, new: T) -> T {
        // SAFETY: caller contract above.
        unsafe { T::swap(locate::<T>(base, offset), new) }
    }

    // =====================================================================
    // Fences
    // =====================================================================

    /// See [`crate::fence::load_fence`].
    #[inline]
    pub fn load_fence(self) {
        crate::fence::load_fence();
    }

    /// See [`crate::fence::store_fence`].
    #[inline]
    pub fn store_fence(self) {
        crate::fence::store_fence();
    }

    /// See [`crate::fence::full_fence`].
    #[inline]
    pub fn full_fence(self) {
        crate::fence::full_fence();
    }
}
