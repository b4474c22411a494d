//! Byte-array helpers that take the raw fast path when the gateway allows.
//!
//! Each helper produces the same result on both paths; the gateway only
//! decides how it is computed. Multi-byte values are big-endian.

#![allow(unsafe_code)]

use std::cmp::Ordering;

use rawgate_core::MemoryError;

use crate::gateway::Gateway;

const WORD: usize = std::mem::size_of::<u64>();

fn check(bytes: &[u8], offset: usize, width: usize) -> Result<(), MemoryError> {
    match offset.checked_add(width) {
        Some(end) if end <= bytes.len() => Ok(()),
        _ => Err(MemoryError::OutOfBounds {
            offset,
            len: width,
            size: bytes.len(),
        }),
    }
}

macro_rules! big_endian {
    ($($read:ident, $write:ident => $ty:ty;)*) => {$(
        #[doc = concat!("Read a big-endian `", stringify!($ty), "` at `offset`.")]
        pub fn $read(gateway: &Gateway, bytes: &[u8], offset: usize) -> Result<$ty, MemoryError> {
            const N: usize = std::mem::size_of::<$ty>();
            check(bytes, offset, N)?;
            if let Some(raw) = gateway.unaligned_raw() {
                // SAFETY: the range was checked above; plain loads tolerate
                // misalignment.
                let native: $ty = unsafe { raw.get(bytes.as_ptr(), offset as isize) };
                return Ok(<$ty>::from_be(native));
            }
            let mut buf = [0u8; N];
            buf.copy_from_slice(&bytes[offset..offset + N]);
            Ok(<$ty>::from_be_bytes(buf))
        }

        #[doc = concat!("Write `value` as a big-endian `", stringify!($ty), "` at `offset`.")]
        pub fn $write(
            gateway: &Gateway,
            bytes: &mut [u8],
            offset: usize,
            value: $ty,
        ) -> Result<(), MemoryError> {
            const N: usize = std::mem::size_of::<$ty>();
            check(bytes, offset, N)?;
            if let Some(raw) = gateway.unaligned_raw() {
                // SAFETY: the range was checked above and `bytes` is
                // uniquely borrowed.
                unsafe { raw.put(bytes.as_mut_ptr(), offset as isize, value.to_be()) };
                return Ok(());
            }
            bytes[offset..offset + N].copy_from_slice(&value.to_be_bytes());
            Ok(())
        }
    )*};
}

big_endian! {
    read_i16, write_i16 => i16;
    read_i32, write_i32 => i32;
    read_i64, write_i64 => i64;
}

/// Lexicographic comparison of two byte slices, eight bytes at a time when
/// unaligned access is supported.
pub fn compare(gateway: &Gateway, left: &[u8], right: &[u8]) -> Ordering {
    let Some(raw) = gateway.unaligned_raw() else {
        return left.cmp(right);
    };
    let common = left.len().min(right.len());
    let words = common / WORD;
    for i in 0..words {
        let offset = (i * WORD) as isize;
        // SAFETY: offset + WORD <= common, which both slices cover.
        let (l, r): (u64, u64) = unsafe {
            (
                raw.get(left.as_ptr(), offset),
                raw.get(right.as_ptr(), offset),
            )
        };
        if l != r {
            return u64::from_be(l).cmp(&u64::from_be(r));
        }
    }
    left[words * WORD..].cmp(&right[words * WORD..])
}

/// Copy `src` into `dst` at `offset`.
pub fn copy_into(
    gateway: &Gateway,
    src: &[u8],
    dst: &mut [u8],
    offset: usize,
) -> Result<(), MemoryError> {
    check(dst, offset, src.len())?;
    match gateway.raw() {
        // SAFETY: the destination range was checked above; `src` and
        // `dst` cannot overlap as `dst` is uniquely borrowed.
        Some(raw) => unsafe {
            raw.copy_memory(src.as_ptr(), 0, dst.as_mut_ptr(), offset as isize, src.len())
        },
        None => dst[offset..offset + src.len()].copy_from_slice(src),
    }
    Ok(())
}
