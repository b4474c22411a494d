//! Operation signatures and the catalogue the probe checks at startup.
//!
//! An [`OpSignature`] names one raw operation together with its addressing
//! mode, e.g. `get_short(address)` or `put_long(base, offset)`. Providers
//! advertise which signatures they implement; the probe compares that set
//! against [`REQUIRED_OPS`] and disables the whole capability if any one is
//! missing.

use std::fmt;

use crate::kind::{AddressMode, PrimitiveKind};

/// A raw operation, without its addressing mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Op {
    /// Plain typed load.
    Get(PrimitiveKind),
    /// Plain typed store.
    Put(PrimitiveKind),
    /// Sequentially consistent load.
    GetVolatile(PrimitiveKind),
    /// Sequentially consistent store.
    PutVolatile(PrimitiveKind),
    /// Release store.
    PutOrdered(PrimitiveKind),
    /// Atomic compare-and-swap.
    CompareAndSwap(PrimitiveKind),
    /// Atomic fetch-and-add.
    GetAndAdd(PrimitiveKind),
    /// Atomic fetch-and-set.
    GetAndSet(PrimitiveKind),
    /// Acquire fence.
    LoadFence,
    /// Release fence.
    StoreFence,
    /// Sequentially consistent fence.
    FullFence,
    /// Off-heap allocation.
    AllocateMemory,
    /// Off-heap resize.
    ReallocateMemory,
    /// Off-heap release.
    FreeMemory,
    /// Byte fill.
    SetMemory,
    /// Bulk copy.
    CopyMemory,
    /// Byte offset of the first element of an array.
    ArrayBaseOffset,
    /// Element stride of an array.
    ArrayIndexScale,
    /// Native pointer width.
    AddressSize,
    /// OS page size.
    PageSize,
    /// Allocation without running a constructor.
    AllocateInstance,
    /// Forced one-time initialisation.
    EnsureInitialized,
    /// Loadable module definition from raw bytes.
    DefineModule,
    /// Park the current thread.
    Park,
    /// Unpark a given thread.
    Unpark,
    /// System load average.
    LoadAverage,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get(k) => write!(f, "get_{k}"),
            Self::Put(k) => write!(f, "put_{k}"),
            Self::GetVolatile(k) => write!(f, "get_{k}_volatile"),
            Self::PutVolatile(k) => write!(f, "put_{k}_volatile"),
            Self::PutOrdered(k) => write!(f, "put_ordered_{k}"),
            Self::CompareAndSwap(k) => write!(f, "compare_and_swap_{k}"),
            Self::GetAndAdd(k) => write!(f, "get_and_add_{k}"),
            Self::GetAndSet(k) => write!(f, "get_and_set_{k}"),
            Self::LoadFence => f.write_str("load_fence"),
            Self::StoreFence => f.write_str("store_fence"),
            Self::FullFence => f.write_str("full_fence"),
            Self::AllocateMemory => f.write_str("allocate_memory"),
            Self::ReallocateMemory => f.write_str("reallocate_memory"),
            Self::FreeMemory => f.write_str("free_memory"),
            Self::SetMemory => f.write_str("set_memory"),
            Self::CopyMemory => f.write_str("copy_memory"),
            Self::ArrayBaseOffset => f.write_str("array_base_offset"),
            Self::ArrayIndexScale => f.write_str("array_index_scale"),
            Self::AddressSize => f.write_str("address_size"),
            Self::PageSize => f.write_str("page_size"),
            Self::AllocateInstance => f.write_str("allocate_instance"),
            Self::EnsureInitialized => f.write_str("ensure_initialized"),
            Self::DefineModule => f.write_str("define_module"),
            Self::Park => f.write_str("park"),
            Self::Unpark => f.write_str("unpark"),
            Self::LoadAverage => f.write_str("load_average"),
        }
    }
}

/// An operation plus the addressing mode it is invoked with.
///
/// `mode` is `None` for operations that take no memory location
/// (fences, introspection, thread control).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpSignature {
    /// The operation.
    pub op: Op,
    /// How the operation addresses memory, if at all.
    pub mode: Option<AddressMode>,
}

impl OpSignature {
    /// Signature addressing memory by base object plus offset.
    pub const fn relative(op: Op) -> Self {
        Self {
            op,
            mode: Some(AddressMode::Relative),
        }
    }

    /// Signature addressing memory by bare address.
    pub const fn absolute(op: Op) -> Self {
        Self {
            op,
            mode: Some(AddressMode::Absolute),
        }
    }

    /// Signature with no memory operand.
    pub const fn plain(op: Op) -> Self {
        Self { op, mode: None }
    }
}

impl fmt::Display for OpSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Some(mode) => write!(f, "{}({mode})", self.op),
            None => write!(f, "{}()", self.op),
        }
    }
}

/// Signatures that must all be present for the capability to be enabled.
///
/// These are the operations the fast buffer-comparison and serialization
/// paths rely on. Everything else in [`full_catalogue`] is exposed, but its
/// absence does not disable the gateway.
pub const REQUIRED_OPS: &[OpSignature] = &[
    OpSignature::plain(Op::ArrayBaseOffset),
    OpSignature::relative(Op::CopyMemory),
    OpSignature::relative(Op::Get(PrimitiveKind::Byte)),
    OpSignature::absolute(Op::Get(PrimitiveKind::Short)),
    OpSignature::relative(Op::Get(PrimitiveKind::Short)),
    OpSignature::absolute(Op::Get(PrimitiveKind::Int)),
    OpSignature::relative(Op::Get(PrimitiveKind::Int)),
    OpSignature::absolute(Op::Get(PrimitiveKind::Long)),
    OpSignature::relative(Op::Get(PrimitiveKind::Long)),
    OpSignature::absolute(Op::Put(PrimitiveKind::Byte)),
    OpSignature::relative(Op::Put(PrimitiveKind::Byte)),
    OpSignature::absolute(Op::Put(PrimitiveKind::Short)),
    OpSignature::relative(Op::Put(PrimitiveKind::Short)),
    OpSignature::absolute(Op::Put(PrimitiveKind::Int)),
    OpSignature::relative(Op::Put(PrimitiveKind::Int)),
    OpSignature::absolute(Op::Put(PrimitiveKind::Long)),
    OpSignature::relative(Op::Put(PrimitiveKind::Long)),
];

/// Every signature the gateway can expose, in a stable order.
///
/// Absolute-mode loads and stores exist for every kind except `Boolean`
/// and `Object`, which are only meaningful relative to a base.
pub fn full_catalogue() -> Vec<OpSignature> {
    use PrimitiveKind::*;

    let mut ops = Vec::with_capacity(96);
    for kind in PrimitiveKind::ALL {
        ops.push(OpSignature::relative(Op::Get(kind)));
        ops.push(OpSignature::relative(Op::Put(kind)));
        if !matches!(kind, Boolean | Object) {
            ops.push(OpSignature::absolute(Op::Get(kind)));
            ops.push(OpSignature::absolute(Op::Put(kind)));
        }
        if kind != Address {
            ops.push(OpSignature::relative(Op::GetVolatile(kind)));
            ops.push(OpSignature::relative(Op::PutVolatile(kind)));
        }
    }
    for kind in [Int, Long, Object] {
        ops.push(OpSignature::relative(Op::PutOrdered(kind)));
        ops.push(OpSignature::relative(Op::CompareAndSwap(kind)));
        ops.push(OpSignature::relative(Op::GetAndSet(kind)));
    }
    for kind in [Int, Long] {
        ops.push(OpSignature::relative(Op::GetAndAdd(kind)));
    }
    ops.extend([
        OpSignature::plain(Op::LoadFence),
        OpSignature::plain(Op::StoreFence),
        OpSignature::plain(Op::FullFence),
        OpSignature::plain(Op::AllocateMemory),
        OpSignature::absolute(Op::ReallocateMemory),
        OpSignature::absolute(Op::FreeMemory),
        OpSignature::absolute(Op::SetMemory),
        OpSignature::relative(Op::SetMemory),
        OpSignature::absolute(Op::CopyMemory),
        OpSignature::relative(Op::CopyMemory),
        OpSignature::plain(Op::ArrayBaseOffset),
        OpSignature::plain(Op::ArrayIndexScale),
        OpSignature::plain(Op::AddressSize),
        OpSignature::plain(Op::PageSize),
        OpSignature::plain(Op::AllocateInstance),
        OpSignature::plain(Op::EnsureInitialized),
        OpSignature::plain(Op::DefineModule),
        OpSignature::plain(Op::Park),
        OpSignature::plain(Op::Unpark),
        OpSignature::plain(Op::LoadAverage),
    ]);
    ops
}
