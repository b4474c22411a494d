//! Bounds-checked owned off-heap memory.
//!
//! [`OffHeapBuffer`] is the safe face of the off-heap operations: it pairs
//! every allocation with exactly one free, checks every access against its
//! length, and only reads types for which any bit pattern is valid.

#![allow(unsafe_code)]

use std::fmt;
use std::ops::Range;
use std::ptr::NonNull;
use std::slice;

use rawgate_core::{Address, MemoryError};

use crate::access::RawAccess;
use crate::primitive::Scalar;

/// A zero-initialised block of C-allocated memory.
pub struct OffHeapBuffer {
    raw: RawAccess,
    ptr: NonNull<u8>,
    len: usize,
}

// SAFETY: the buffer uniquely owns its allocation; shared access only reads.
unsafe impl Send for OffHeapBuffer {}
// SAFETY: as above; every mutating method takes `&mut self`.
unsafe impl Sync for OffHeapBuffer {}

impl OffHeapBuffer {
    /// Allocate `len` zeroed bytes.
    pub fn new(raw: RawAccess, len: usize) -> Result<Self, MemoryError> {
        let addr = raw.allocate_memory(len)?;
        let Some(ptr) = NonNull::new(addr.as_ptr::<u8>()) else {
            return Ok(Self {
                raw,
                ptr: NonNull::dangling(),
                len: 0,
            });
        };
        // SAFETY: freshly allocated block of `len` bytes.
        unsafe { raw.set_memory_at(addr, len, 0) };
        Ok(Self { raw, ptr, len })
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Address of the first byte, or [`Address::NULL`] when empty.
    ///
    /// Valid until the buffer is resized or dropped.
    pub fn address(&self) -> Address {
        if self.len == 0 {
            Address::NULL
        } else {
            Address::from_ptr(self.ptr.as_ptr())
        }
    }

    fn check(&self, offset: usize, width: usize) -> Result<(), MemoryError> {
        match offset.checked_add(width) {
            Some(end) if end <= self.len => Ok(()),
            _ => Err(MemoryError::OutOfBounds {
                offset,
                len: width,
                size: self.len,
            }),
        }
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), MemoryError> {
        if range.start > range.end {
            return Err(MemoryError::OutOfBounds {
                offset: range.start,
                len: 0,
                size: self.len,
            });
        }
        self.check(range.start, range.end - range.start)
    }

    fn check_aligned<T>(&self, offset: usize) -> Result<(), MemoryError> {
        let address = self.address().add(offset);
        let align = std::mem::align_of::<T>();
        if address.is_aligned_to(align) {
            Ok(())
        } else {
            Err(MemoryError::Misaligned {
                address: address.0,
                align,
            })
        }
    }

    /// Read a `T` at `offset`. Alignment is not required.
    pub fn get<T: Scalar>(&self, offset: usize) -> Result<T, MemoryError> {
        self.check(offset, std::mem::size_of::<T>())?;
        // SAFETY: in bounds; every bit pattern is a valid `T`.
        Ok(unsafe { self.raw.get(self.ptr.as_ptr(), offset as isize) })
    }

    /// Write a `T` at `offset`. Alignment is not required.
    pub fn put<T: Scalar>(&mut self, offset: usize, value: T) -> Result<(), MemoryError> {
        self.check(offset, std::mem::size_of::<T>())?;
        // SAFETY: in bounds and uniquely borrowed.
        unsafe { self.raw.put(self.ptr.as_ptr(), offset as isize, value) };
        Ok(())
    }

    /// Sequentially consistent read of a `T` at an aligned `offset`.
    pub fn get_volatile<T: Scalar>(&self, offset: usize) -> Result<T, MemoryError> {
        self.check(offset, std::mem::size_of::<T>())?;
        self.check_aligned::<T>(offset)?;
        // SAFETY: in bounds and aligned.
        Ok(unsafe { self.raw.get_volatile(self.ptr.as_ptr(), offset as isize) })
    }

    /// Sequentially consistent write of a `T` at an aligned `offset`.
    pub fn put_volatile<T: Scalar>(&mut self, offset: usize, value: T) -> Result<(), MemoryError> {
        self.check(offset, std::mem::size_of::<T>())?;
        self.check_aligned::<T>(offset)?;
        // SAFETY: in bounds, aligned and uniquely borrowed.
        unsafe { self.raw.put_volatile(self.ptr.as_ptr(), offset as isize, value) };
        Ok(())
    }

    /// Set every byte in `range` to `value`.
    pub fn fill(&mut self, range: Range<usize>, value: u8) -> Result<(), MemoryError> {
        self.check_range(&range)?;
        // SAFETY: range checked above.
        unsafe {
            self.raw
                .set_memory(self.ptr.as_ptr(), range.start as isize, range.len(), value)
        };
        Ok(())
    }

    /// Copy the bytes in `src` to `dest`. The regions may overlap.
    pub fn copy_within(&mut self, src: Range<usize>, dest: usize) -> Result<(), MemoryError> {
        self.check_range(&src)?;
        let count = src.len();
        self.check(dest, count)?;
        let base = self.ptr.as_ptr();
        // SAFETY: both ranges checked above.
        unsafe {
            self.raw
                .copy_memory(base, src.start as isize, base, dest as isize, count)
        };
        Ok(())
    }

    /// Copy `bytes` into the buffer at `offset`.
    pub fn write_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<(), MemoryError> {
        self.check(offset, bytes.len())?;
        self.as_mut_slice()[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Copy bytes out of the buffer at `offset`, filling `out`.
    pub fn read_bytes(&self, offset: usize, out: &mut [u8]) -> Result<(), MemoryError> {
        self.check(offset, out.len())?;
        out.copy_from_slice(&self.as_slice()[offset..offset + out.len()]);
        Ok(())
    }

    /// The contents as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` is valid for `len` initialised bytes (dangling with
        // len 0 is permitted).
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The contents as a mutable byte slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and uniquely borrowed.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Grow or shrink to `new_len` bytes.
    ///
    /// The common prefix is preserved and new bytes are zeroed. On failure
    /// the buffer is unchanged.
    pub fn resize(&mut self, new_len: usize) -> Result<(), MemoryError> {
        // SAFETY: `address()` is null or the live block this buffer owns;
        // on success the old pointer is replaced before any further use.
        let addr = unsafe { self.raw.reallocate_memory(self.address(), new_len)? };
        let old_len = self.len;
        match NonNull::new(addr.as_ptr::<u8>()) {
            Some(ptr) => {
                self.ptr = ptr;
                self.len = new_len;
                if new_len > old_len {
                    // SAFETY: the tail lies inside the new block.
                    unsafe { self.raw.set_memory_at(addr.add(old_len), new_len - old_len, 0) };
                }
            }
            None => {
                self.ptr = NonNull::dangling();
                self.len = 0;
            }
        }
        Ok(())
    }
}

impl Drop for OffHeapBuffer {
    fn drop(&mut self) {
        // SAFETY: null or the live block this buffer owns; never used again.
        unsafe { self.raw.free_memory(self.address()) };
    }
}

impl fmt::Debug for OffHeapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffHeapBuffer")
            .field("address", &self.address())
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn buffer(len: usize) -> OffHeapBuffer {
        OffHeapBuffer::new(RawAccess::INSTANCE, len).unwrap()
    }

    #[test]
    fn new_buffer_is_zeroed() {
        let buf = buffer(128);
        assert_eq!(buf.len(), 128);
        assert!(buf.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_buffer_has_null_address() {
        let buf = buffer(0);
        assert!(buf.is_empty());
        assert!(buf.address().is_null());
        assert!(buf.as_slice().is_empty());
    }

    #[test]
    fn out_of_range_access_is_rejected() {
        let mut buf = buffer(16);
        assert_eq!(
            buf.get::<i64>(9),
            Err(MemoryError::OutOfBounds {
                offset: 9,
                len: 8,
                size: 16
            })
        );
        assert!(buf.put::<i32>(13, 1).is_err());
        assert!(buf.put::<u8>(usize::MAX, 1).is_err());
        assert!(buf.fill(4..20, 0).is_err());
        assert!(buf.copy_within(0..8, 12).is_err());
        assert!(buf.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn misaligned_volatile_access_is_rejected() {
        let mut buf = buffer(16);
        assert!(matches!(
            buf.put_volatile::<i64>(1, 5),
            Err(MemoryError::Misaligned { align: 8, .. })
        ));
        buf.put_volatile::<i64>(8, 5).unwrap();
        assert_eq!(buf.get_volatile::<i64>(8), Ok(5));
    }

    #[test]
    fn resize_preserves_prefix_and_zeroes_tail() {
        let mut buf = buffer(8);
        buf.write_bytes(0, b"rawgate!").unwrap();
        buf.resize(64).unwrap();
        assert_eq!(&buf.as_slice()[..8], b"rawgate!");
        assert!(buf.as_slice()[8..].iter().all(|&b| b == 0));
        buf.resize(3).unwrap();
        assert_eq!(buf.as_slice(), b"raw");
        buf.resize(0).unwrap();
        assert!(buf.address().is_null());
        buf.resize(4).unwrap();
        assert_eq!(buf.as_slice(), &[0; 4]);
    }

    #[test]
    fn copy_within_handles_overlap() {
        let mut buf = buffer(8);
        buf.write_bytes(0, b"abcdefgh").unwrap();
        buf.copy_within(2..8, 0).unwrap();
        assert_eq!(buf.as_slice(), b"cdefghgh");
    }

    mod proptests {
        use super::*;

        proptest! {
            #[test]
            fn in_bounds_writes_read_back(
                len in 8usize..256,
                offset_seed in any::<usize>(),
                value in any::<i64>(),
            ) {
                let mut buf = buffer(len);
                let offset = offset_seed % (len - 7);
                buf.put(offset, value).unwrap();
                prop_assert_eq!(buf.get::<i64>(offset), Ok(value));
                let mut out = [0u8; 8];
                buf.read_bytes(offset, &mut out).unwrap();
                prop_assert_eq!(i64::from_ne_bytes(out), value);
            }

            #[test]
            fn out_of_bounds_never_writes(len in 0usize..64, offset in 0usize..128) {
                let mut buf = buffer(len);
                let fits = offset + 4 <= len;
                prop_assert_eq!(buf.put::<u32>(offset, u32::MAX).is_ok(), fits);
                if !fits {
                    prop_assert!(buf.as_slice().iter().all(|&b| b == 0));
                }
            }
        }
    }
}
