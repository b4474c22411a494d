//! Off-heap allocation and bulk memory operations.
//!
//! Memory comes from the C allocator (`malloc`/`realloc`/`free`) so that
//! addresses can cross FFI boundaries and be freed by either side. The raw
//! layer keeps no record of what it handed out; pairing each allocation
//! with exactly one free is the caller's job. [`OffHeapBuffer`] does that
//! pairing for you.
//!
//! [`OffHeapBuffer`]: crate::OffHeapBuffer

#![allow(unsafe_code)]

use std::ptr;

use rawgate_core::{Address, MemoryError};

use crate::access::{locate, RawAccess};

impl RawAccess {
    /// Allocate `bytes` of uninitialised off-heap memory.
    ///
    /// Zero bytes yields [`Address::NULL`]. The block is aligned for any
    /// primitive type.
    pub fn allocate_memory(self, bytes: usize) -> Result<Address, MemoryError> {
        if bytes == 0 {
            return Ok(Address::NULL);
        }
        // SAFETY: malloc has no preconditions for a non-zero size.
        let ptr = unsafe { libc::malloc(bytes) };
        if ptr.is_null() {
            return Err(MemoryError::AllocationFailed { bytes });
        }
        Ok(Address::from_ptr(ptr))
    }

    /// Resize a block obtained from [`allocate_memory`](Self::allocate_memory).
    ///
    /// Contents are preserved up to the smaller of the two sizes; bytes past
    /// the old size are uninitialised. A null `address` allocates, zero
    /// `bytes` frees and yields [`Address::NULL`]. On failure the original
    /// block is left untouched and still owned by the caller.
    ///
    /// # Safety
    ///
    /// `address` must be null or a live block from this allocator. On
    /// success the old address must no longer be used.
    pub unsafe fn reallocate_memory(
        self,
        address: Address,
        bytes: usize,
    ) -> Result<Address, MemoryError> {
        if address.is_null() {
            return self.allocate_memory(bytes);
        }
        if bytes == 0 {
            // SAFETY: forwarded caller contract.
            unsafe { self.free_memory(address) };
            return Ok(Address::NULL);
        }
        // SAFETY: `address` is a live malloc block per the caller contract.
        let ptr = unsafe { libc::realloc(address.as_ptr(), bytes) };
        if ptr.is_null() {
            return Err(MemoryError::AllocationFailed { bytes });
        }
        Ok(Address::from_ptr(ptr))
    }

    /// Release a block. Null is a no-op.
    ///
    /// # Safety
    ///
    /// `address` must be null or a live block from this allocator, and must
    /// not be used afterwards.
    pub unsafe fn free_memory(self, address: Address) {
        if address.is_null() {
            return;
        }
        // SAFETY: caller contract above.
        unsafe { libc::free(address.as_ptr()) }
    }

    /// Fill `bytes` bytes starting at `address` with `value`.
    ///
    /// # Safety
    ///
    /// The range must be valid for writes.
    pub unsafe fn set_memory_at(self, address: Address, bytes: usize, value: u8) {
        // SAFETY: caller contract above.
        unsafe { ptr::write_bytes(address.as_ptr::<u8>(), value, bytes) }
    }

    /// Fill `bytes` bytes starting at `base + offset` with `value`.
    ///
    /// # Safety
    ///
    /// The range must be valid for writes and not covered by a live
    /// reference.
    pub unsafe fn set_memory(self, base: *mut u8, offset: isize, bytes: usize, value: u8) {
        // SAFETY: caller contract above.
        unsafe { ptr::write_bytes(locate::<u8>(base, offset), value, bytes) }
    }

    /// Copy `bytes` bytes from `src` to `dst`. The ranges may overlap.
    ///
    /// # Safety
    ///
    /// `src` must be valid for reads and `dst` for writes of `bytes` bytes.
    pub unsafe fn copy_memory_at(self, src: Address, dst: Address, bytes: usize) {
        // SAFETY: caller contract above; `ptr::copy` permits overlap.
        unsafe { ptr::copy(src.as_ptr::<u8>(), dst.as_ptr::<u8>(), bytes) }
    }

    /// Copy `bytes` bytes from `src_base + src_offset` to
    /// `dst_base + dst_offset`. The ranges may overlap.
    ///
    /// # Safety
    ///
    /// The source range must be valid for reads and the destination range
    /// for writes.
    pub unsafe fn copy_memory(
        self,
        src_base: *const u8,
        src_offset: isize,
        dst_base: *mut u8,
        dst_offset: isize,
        bytes: usize,
    ) {
        // SAFETY: caller contract above.
        unsafe {
            ptr::copy(
                locate::<u8>(src_base, src_offset),
                locate::<u8>(dst_base, dst_offset),
                bytes,
            )
        }
    }
}
