//! Raw memory access for rawgate.
//!
//! This crate is the trusted boundary of the workspace. Everything that
//! dereferences caller-supplied addresses lives on [`RawAccess`], a
//! zero-sized token whose memory methods are `unsafe fn`. The token is
//! normally obtained from a `rawgate::Gateway` whose probe reported the
//! provider available.
//!
//! # Surfaces
//!
//! | Concern | Items |
//! |---------|-------|
//! | Typed load/store | [`RawAccess::get`], [`RawAccess::put`], [`RawAccess::get_at`], [`RawAccess::put_at`] |
//! | Ordering | [`RawAccess::get_volatile`], [`RawAccess::put_volatile`], [`RawAccess::put_ordered`], [`fence`] |
//! | Atomics | [`RawAccess::compare_and_swap`], [`RawAccess::get_and_add`], [`RawAccess::get_and_set`] |
//! | Off-heap | [`RawAccess::allocate_memory`], [`OffHeapBuffer`] |
//! | Layout | [`object_field_offset!`], [`array_base_offset`], [`page_size`] |
//! | Lifecycle | [`RawAccess::allocate_instance`], [`ensure_initialized`], [`RawAccess::define_module`] |
//! | Host | [`park`], [`unpark`], [`load_average`] |
//!
//! The crate denies `unsafe_code`; only the modules that implement the
//! boundary opt back in.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod access;
pub mod buffer;
pub mod fence;
pub mod host;
pub mod introspect;
pub mod lifecycle;
pub mod native;
pub mod offheap;
pub mod primitive;
pub mod thread;

pub use access::RawAccess;
pub use buffer::OffHeapBuffer;
pub use fence::{full_fence, load_fence, store_fence};
pub use host::{load_average, LoadAverage};
pub use introspect::{address_size, array_base_offset, array_index_scale, page_size};
pub use lifecycle::{
    ensure_initialized, should_be_initialized, DefinedModule, ModuleError, ModuleLoader,
};
pub use native::{HostQuery, NativeLocator, NativeProvider};
pub use primitive::{AtomicInteger, AtomicWord, ObjectRef, Primitive, Scalar};
pub use thread::{park, unpark, ParkDeadline};

/// Byte offset of a field within a type, for use as a relative offset.
///
/// ```
/// #[repr(C)]
/// struct Header {
///     magic: u32,
///     len: u64,
/// }
///
/// assert_eq!(rawgate_raw::object_field_offset!(Header, len), 8);
/// ```
#[macro_export]
macro_rules! object_field_offset {
    ($ty:ty, $($field:tt)+) => {
        ::core::mem::offset_of!($ty, $($field)+)
    };
}
