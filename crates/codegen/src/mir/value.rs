//! MIR values.

use super::{InstId, MirType};
use std::fmt;

/// An SSA value in the MIR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// Result of an instruction.
    Inst(InstId),
    /// Immediate constant.
    Immediate(Immediate),
}

impl Value {
    /// Returns true if this is an immediate value.
    #[must_use]
    pub const fn is_immediate(&self) -> bool {
        matches!(self, Self::Immediate(_))
    }

    /// Returns this value as an immediate, if it is one.
    #[must_use]
    pub const fn as_immediate(&self) -> Option<&Immediate> {
        match self {
            Self::Immediate(imm) => Some(imm),
            _ => None,
        }
    }
}

/// An immediate constant value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Immediate {
    /// Integer constant of the given bit width.
    Int(i64, u16),
    /// The null pointer.
    Null,
}

impl Immediate {
    /// Returns the type of this immediate.
    #[must_use]
    pub const fn ty(&self) -> MirType {
        match self {
            Self::Int(_, bits) => MirType::Int(*bits),
            Self::Null => MirType::Ptr,
        }
    }

    /// Creates a new `i64` immediate.
    #[must_use]
    pub const fn i64(value: i64) -> Self {
        Self::Int(value, 64)
    }

    /// Creates a new `i32` immediate.
    #[must_use]
    pub const fn i32(value: i32) -> Self {
        Self::Int(value as i64, 32)
    }

    /// Returns the value as an integer, if applicable.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v, _) => Some(*v),
            Self::Null => None,
        }
    }
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v, 1) => write!(f, "{}", *v != 0),
            Self::Int(v, _) => write!(f, "{v}"),
            Self::Null => write!(f, "null"),
        }
    }
}
