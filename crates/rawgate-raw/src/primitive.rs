//! Value types the raw layer can move in and out of memory.
//!
//! [`Primitive`] is sealed: the set of kinds is fixed by
//! [`PrimitiveKind`]. Volatile and ordered accesses go through the
//! matching `std::sync::atomic` type, so they require natural alignment;
//! plain loads and stores do not.

#![allow(unsafe_code)]

use std::sync::atomic::{
    AtomicBool, AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicPtr, AtomicU16, AtomicU32,
    AtomicU64, AtomicU8, AtomicUsize, Ordering,
};

use rawgate_core::PrimitiveKind;

/// A raw object reference.
pub type ObjectRef = *mut ();

mod sealed {
    pub trait Sealed {}
}

/// A value that can be loaded and stored through the raw layer.
///
/// The `*_volatile` and `store_release` methods are implementation details
/// of [`RawAccess`](crate::RawAccess); call those instead.
pub trait Primitive: Copy + sealed::Sealed + 'static {
    /// The kind tag for this type.
    const KIND: PrimitiveKind;

    #[doc(hidden)]
    /// # Safety
    /// `ptr` must be valid for reads and aligned to `align_of::<Self>()`.
    unsafe fn load_volatile(ptr: *const Self) -> Self;

    #[doc(hidden)]
    /// # Safety
    /// `ptr` must be valid for writes and aligned to `align_of::<Self>()`.
    unsafe fn store_volatile(ptr: *mut Self, value: Self);

    #[doc(hidden)]
    /// # Safety
    /// `ptr` must be valid for writes and aligned to `align_of::<Self>()`.
    unsafe fn store_release(ptr: *mut Self, value: Self);
}

/// A primitive for which every bit pattern is a valid value.
///
/// Only these may be read out of untyped memory by safe code, which is why
/// [`OffHeapBuffer`](crate::OffHeapBuffer) bounds its accessors on `Scalar`
/// rather than [`Primitive`].
pub trait Scalar: Primitive {}

/// A primitive supporting compare-and-swap and swap.
pub trait AtomicWord: Primitive {
    #[doc(hidden)]
    /// # Safety
    /// As for [`Primitive::load_volatile`], and the location must only be
    /// accessed atomically by other threads while this call runs.
    unsafe fn compare_and_swap(ptr: *mut Self, expected: Self, new: Self) -> bool;

    #[doc(hidden)]
    /// # Safety
    /// As for [`AtomicWord::compare_and_swap`].
    unsafe fn swap(ptr: *mut Self, new: Self) -> Self;
}

/// An integer primitive supporting fetch-and-add.
pub trait AtomicInteger: AtomicWord {
    #[doc(hidden)]
    /// # Safety
    /// As for [`AtomicWord::compare_and_swap`].
    unsafe fn fetch_add(ptr: *mut Self, delta: Self) -> Self;
}

/// Types whose atomic counterpart stores the value directly.
macro_rules! direct_primitive {
    ($($ty:ty => $atomic:ty, $kind:expr;)*) => {$(
        impl sealed::Sealed for $ty {}

        impl Primitive for $ty {
            const KIND: PrimitiveKind = $kind;

            #[inline]
            unsafe fn load_volatile(ptr: *const Self) -> Self {
                // SAFETY: caller guarantees validity and alignment; the
                // atomic type has the same size and alignment as `$ty`.
                unsafe { <$atomic>::from_ptr(ptr.cast_mut()).load(Ordering::SeqCst) }
            }

            #[inline]
            unsafe fn store_volatile(ptr: *mut Self, value: Self) {
                // SAFETY: as above.
                unsafe { <$atomic>::from_ptr(ptr).store(value, Ordering::SeqCst) }
            }

            #[inline]
            unsafe fn store_release(ptr: *mut Self, value: Self) {
                // SAFETY: as above.
                unsafe { <$atomic>::from_ptr(ptr).store(value, Ordering::Release) }
            }
        }
    )*};
}

direct_primitive! {
    bool => AtomicBool, PrimitiveKind::Boolean;
    i8 => AtomicI8, PrimitiveKind::Byte;
    u8 => AtomicU8, PrimitiveKind::Byte;
    i16 => AtomicI16, PrimitiveKind::Short;
    u16 => AtomicU16, PrimitiveKind::Char;
    i32 => AtomicI32, PrimitiveKind::Int;
    u32 => AtomicU32, PrimitiveKind::Int;
    i64 => AtomicI64, PrimitiveKind::Long;
    u64 => AtomicU64, PrimitiveKind::Long;
    usize => AtomicUsize, PrimitiveKind::Address;
}

/// Floating-point types, stored through their bit pattern.
macro_rules! float_primitive {
    ($($ty:ty => $bits:ty, $atomic:ty, $kind:expr;)*) => {$(
        impl sealed::Sealed for $ty {}

        impl Primitive for $ty {
            const KIND: PrimitiveKind = $kind;

            #[inline]
            unsafe fn load_volatile(ptr: *const Self) -> Self {
                // SAFETY: caller guarantees validity and alignment; `$ty`
                // and `$bits` share size and alignment.
                let bits = unsafe { <$atomic>::from_ptr(ptr.cast_mut().cast::<$bits>()) }
                    .load(Ordering::SeqCst);
                <$ty>::from_bits(bits)
            }

            #[inline]
            unsafe fn store_volatile(ptr: *mut Self, value: Self) {
                // SAFETY: as above.
                unsafe { <$atomic>::from_ptr(ptr.cast::<$bits>()) }
                    .store(value.to_bits(), Ordering::SeqCst)
            }

            #[inline]
            unsafe fn store_release(ptr: *mut Self, value: Self) {
                // SAFETY: as above.
                unsafe { <$atomic>::from_ptr(ptr.cast::<$bits>()) }
                    .store(value.to_bits(), Ordering::Release)
            }
        }
    )*};
}

float_primitive! {
    f32 => u32, AtomicU32, PrimitiveKind::Float;
    f64 => u64, AtomicU64, PrimitiveKind::Double;
}

impl sealed::Sealed for ObjectRef {}

impl Primitive for ObjectRef {
    const KIND: PrimitiveKind = PrimitiveKind::Object;

    #[inline]
    unsafe fn load_volatile(ptr: *const Self) -> Self {
        // SAFETY: caller guarantees validity and alignment; `AtomicPtr<()>`
        // has the layout of `*mut ()`.
        unsafe { AtomicPtr::from_ptr(ptr.cast_mut()) }.load(Ordering::SeqCst)
    }

    #[inline]
    unsafe fn store_volatile(ptr: *mut Self, value: Self) {
        // SAFETY: as above.
        unsafe { AtomicPtr::from_ptr(ptr) }.store(value, Ordering::SeqCst)
    }

    #[inline]
    unsafe fn store_release(ptr: *mut Self, value: Self) {
        // SAFETY: as above.
        unsafe { AtomicPtr::from_ptr(ptr) }.store(value, Ordering::Release)
    }
}

impl Scalar for i8 {}
impl Scalar for u8 {}
impl Scalar for i16 {}
impl Scalar for u16 {}
impl Scalar for i32 {}
impl Scalar for u32 {}
impl Scalar for i64 {}
impl Scalar for u64 {}
impl Scalar for usize {}
impl Scalar for f32 {}
impl Scalar for f64 {}

macro_rules! atomic_integer {
    ($($ty:ty => $atomic:ty;)*) => {$(
        impl AtomicWord for $ty {
            #[inline]
            unsafe fn compare_and_swap(ptr: *mut Self, expected: Self, new: Self) -> bool {
                // SAFETY: caller guarantees validity, alignment and
                // atomic-only concurrent access.
                unsafe { <$atomic>::from_ptr(ptr) }
                    .compare_exchange(expected, new, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
            }

            #[inline]
            unsafe fn swap(ptr: *mut Self, new: Self) -> Self {
                // SAFETY: as above.
                unsafe { <$atomic>::from_ptr(ptr) }.swap(new, Ordering::SeqCst)
            }
        }

        impl AtomicInteger for $ty {
            #[inline]
            unsafe fn fetch_add(ptr: *mut Self, delta: Self) -> Self {
                // SAFETY: as above.
                unsafe { <$atomic>::from_ptr(ptr) }.fetch_add(delta, Ordering::SeqCst)
            }
        }
    )*};
}

atomic_integer! {
    i32 => AtomicI32;
    i64 => AtomicI64;
}

impl AtomicWord for ObjectRef {
    #[inline]
    unsafe fn compare_and_swap(ptr: *mut Self, expected: Self, new: Self) -> bool {
        // SAFETY: caller guarantees validity, alignment and atomic-only
        // concurrent access.
        unsafe { AtomicPtr::from_ptr(ptr) }
            .compare_exchange(expected, new, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    #[inline]
    unsafe fn swap(ptr: *mut Self, new: Self) -> Self {
        // SAFETY: as above.
        unsafe { AtomicPtr::from_ptr(ptr) }.swap(new, Ordering::SeqCst)
    }
}
