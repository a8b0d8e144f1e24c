//! MIR type system.

use std::fmt;

/// Types used in MIR.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MirType {
    /// Integer with a given bit width (1, 8, 32 or 64).
    Int(u16),
    /// Opaque pointer.
    Ptr,
    /// Array of the given number of `i64` slots.
    Array(u64),
    /// Void/unit type (for instructions and functions that produce nothing).
    Void,
}

impl MirType {
    /// The boolean type produced by comparisons.
    pub const I1: Self = Self::Int(1);
    /// A byte.
    pub const I8: Self = Self::Int(8);
    /// A C `int`.
    pub const I32: Self = Self::Int(32);
    /// Operand stack cells.
    pub const I64: Self = Self::Int(64);

    /// Returns the number of `i64` cells a value of this type occupies in memory.
    #[must_use]
    pub const fn cells(&self) -> u64 {
        match self {
            Self::Int(_) | Self::Ptr => 1,
            Self::Array(len) => *len,
            Self::Void => 0,
        }
    }

    /// Returns the bit width if this is an integer type.
    #[must_use]
    pub const fn int_bits(&self) -> Option<u16> {
        match self {
            Self::Int(bits) => Some(*bits),
            _ => None,
        }
    }

    /// Returns true if this is the void type.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }
}

/// Formats the type in LLVM syntax.
impl fmt::Display for MirType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(bits) => write!(f, "i{bits}"),
            Self::Ptr => write!(f, "ptr"),
            Self::Array(len) => write!(f, "[{len} x i64]"),
            Self::Void => write!(f, "void"),
        }
    }
}
