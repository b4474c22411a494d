//! Primitive value kinds and the two addressing modes.

use std::fmt;

/// The value types the raw layer can load, store, or update atomically.
///
/// `Char` is a UTF-16 code unit (`u16`). `Address` is a pointer-width
/// integer and `Object` is a raw object reference; both are
/// [`std::mem::size_of::<usize>()`] bytes wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    /// `bool`, one byte.
    Boolean,
    /// `i8` / `u8`.
    Byte,
    /// `i16`.
    Short,
    /// `u16` code unit.
    Char,
    /// `i32`.
    Int,
    /// `i64`.
    Long,
    /// `f32`.
    Float,
    /// `f64`.
    Double,
    /// Pointer-width unsigned integer.
    Address,
    /// Raw object reference.
    Object,
}

impl PrimitiveKind {
    /// Every kind, in declaration order.
    pub const ALL: [PrimitiveKind; 10] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Char,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Address,
        Self::Object,
    ];

    /// Width of a value of this kind in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Boolean | Self::Byte => 1,
            Self::Short | Self::Char => 2,
            Self::Int | Self::Float => 4,
            Self::Long | Self::Double => 8,
            Self::Address | Self::Object => std::mem::size_of::<usize>(),
        }
    }

    /// Lower-case name used in operation signatures (`"short"`, `"int"`...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Address => "address",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a memory location is addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressMode {
    /// A bare off-heap address.
    Absolute,
    /// A base object (possibly null) plus a byte offset.
    Relative,
}

impl fmt::Display for AddressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => f.write_str("address"),
            Self::Relative => f.write_str("base, offset"),
        }
    }
}
