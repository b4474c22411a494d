//! Layout and platform introspection.
//!
//! Field offsets come from [`core::mem::offset_of!`], re-exported as
//! [`object_field_offset!`](crate::object_field_offset). Slices have no
//! header, so every array's base offset is zero and its index scale is the
//! element size.

#![allow(unsafe_code)]

use std::sync::OnceLock;

use log::warn;

use crate::access::RawAccess;

const FALLBACK_PAGE_SIZE: usize = 4096;

static PAGE_SIZE: OnceLock<usize> = OnceLock::new();

/// Byte offset of the first element of a `[T]`.
#[inline]
pub const fn array_base_offset<T>() -> usize {
    0
}

/// Byte distance between consecutive elements of a `[T]`.
#[inline]
pub const fn array_index_scale<T>() -> usize {
    std::mem::size_of::<T>()
}

/// Width of a native pointer in bytes (4 or 8).
#[inline]
pub const fn address_size() -> usize {
    std::mem::size_of::<usize>()
}

/// Size of a virtual memory page in bytes. Always a power of two.
///
/// Queried once and cached.
pub fn page_size() -> usize {
    *PAGE_SIZE.get_or_init(query_page_size)
}

#[cfg(unix)]
fn query_page_size() -> usize {
    // SAFETY: sysconf has no preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    match usize::try_from(size) {
        Ok(size) if size.is_power_of_two() => size,
        _ => {
            warn!("sysconf(_SC_PAGESIZE) returned {size}, assuming {FALLBACK_PAGE_SIZE}");
            FALLBACK_PAGE_SIZE
        }
    }
}

#[cfg(not(unix))]
fn query_page_size() -> usize {
    warn!("page size query unsupported on this platform, assuming {FALLBACK_PAGE_SIZE}");
    FALLBACK_PAGE_SIZE
}

impl RawAccess {
    /// See [`array_base_offset`].
    #[inline]
    pub fn array_base_offset<T>(self) -> usize {
        array_base_offset::<T>()
    }

    /// See [`array_index_scale`].
    #[inline]
    pub fn array_index_scale<T>(self) -> usize {
        array_index_scale::<T>()
    }

    /// See [`address_size`].
    #[inline]
    pub fn address_size(self) -> usize {
        address_size()
    }

    /// See [`page_size`].
    #[inline]
    pub fn page_size(self) -> usize {
        page_size()
    }

    /// Base pointer for addressing the fields of a static.
    ///
    /// Pair with [`static_field_offset`](Self::static_field_offset) to get a
    /// `(base, offset)` pair usable with the relative accessors.
    #[inline]
    pub fn static_field_base<H>(self, holder: &'static H) -> *const u8 {
        (holder as *const H).cast()
    }

    /// Offset of `field` from the start of `holder`.
    ///
    /// `field` should live inside `holder`; if it does not, the result is
    /// still a valid displacement between the two addresses.
    #[inline]
    pub fn static_field_offset<H, F>(self, holder: &'static H, field: &'static F) -> isize {
        let base = holder as *const H as isize;
        let field = field as *const F as isize;
        field.wrapping_sub(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[repr(C)]
    struct Stats {
        hits: AtomicI64,
        misses: AtomicI64,
    }

    static STATS: Stats = Stats {
        hits: AtomicI64::new(0),
        misses: AtomicI64::new(0),
    };

    const RAW: RawAccess = RawAccess::INSTANCE;

    #[test]
    fn static_field_pair_addresses_field() {
        let base = RAW.static_field_base(&STATS);
        let offset = RAW.static_field_offset(&STATS, &STATS.misses);
        assert_eq!(offset as usize, std::mem::offset_of!(Stats, misses));
        // SAFETY: base + offset is `STATS.misses`, an aligned atomic i64;
        // all other accesses to it are atomic.
        unsafe { RAW.get_and_add(base.cast_mut(), offset, 5i64) };
        assert_eq!(STATS.misses.load(Ordering::SeqCst), 5);
        assert_eq!(STATS.hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn array_layout_matches_slice_indexing() {
        let values = [10i32, 20, 30];
        let base = values.as_ptr().cast::<u8>();
        let scale = RAW.array_index_scale::<i32>();
        let offset = RAW.array_base_offset::<i32>() + 2 * scale;
        // SAFETY: element 2 of `values`.
        assert_eq!(unsafe { RAW.get::<i32>(base, offset as isize) }, 30);
        assert_eq!(array_index_scale::<u64>(), 8);
    }

    #[test]
    fn address_size_is_pointer_width() {
        assert_eq!(address_size(), std::mem::size_of::<*const ()>());
        assert!(matches!(address_size(), 4 | 8));
    }

    #[test]
    fn page_size_is_cached_power_of_two() {
        let size = page_size();
        assert!(size.is_power_of_two());
        assert!(size >= 4096);
        assert_eq!(page_size(), size);
    }
}
