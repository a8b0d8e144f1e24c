//! MIR instructions.

use super::{ExternId, MirType, ValueId};
use smallvec::SmallVec;
use std::fmt;

/// An instruction in the MIR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstKind,
    /// The type of the result, or `None` if the instruction produces nothing.
    pub result_ty: Option<MirType>,
}

impl Instruction {
    /// Creates a new instruction.
    pub fn new(kind: InstKind, result_ty: Option<MirType>) -> Self {
        Self { kind, result_ty }
    }

    /// Returns the operands of this instruction.
    pub fn operands(&self) -> SmallVec<[ValueId; 3]> {
        self.kind.operands()
    }

    /// Returns true if the instruction produces a value.
    pub fn has_result(&self) -> bool {
        self.result_ty.is_some_and(|ty| !ty.is_void())
    }
}

/// Integer comparison predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ICmp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Signed greater than.
    Sgt,
    /// Signed less than.
    Slt,
}

impl ICmp {
    /// Returns the LLVM spelling of the predicate.
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Sgt => "sgt",
            Self::Slt => "slt",
        }
    }

    /// Evaluates the predicate.
    pub const fn eval(self, a: i64, b: i64) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Sgt => a > b,
            Self::Slt => a < b,
        }
    }
}

impl fmt::Display for ICmp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// The kind of instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstKind {
    // Memory
    /// Reserve stack memory for a value of the given type; yields a pointer.
    Alloca(MirType),
    /// Load a value of the given type: `(ty, ptr)`.
    Load(MirType, ValueId),
    /// Store a value: `(value, ptr)`.
    Store(ValueId, ValueId),
    /// Address of an `i64` slot inside an array: `(array_ty, base, index)`.
    ElementPtr(MirType, ValueId, ValueId),

    // Arithmetic
    /// Wrapping addition.
    Add(ValueId, ValueId),
    /// Wrapping subtraction.
    Sub(ValueId, ValueId),
    /// Wrapping multiplication.
    Mul(ValueId, ValueId),
    /// Signed division.
    SDiv(ValueId, ValueId),
    /// Signed remainder.
    SRem(ValueId, ValueId),

    // Comparison
    /// Integer comparison yielding an `i1`.
    ICmp(ICmp, ValueId, ValueId),

    // Conversion
    /// Zero extension to the given type.
    ZExt(ValueId, MirType),
    /// Truncation to the given type.
    Trunc(ValueId, MirType),

    // Calls
    /// Call an external function.
    Call(ExternId, SmallVec<[ValueId; 2]>),
}

impl InstKind {
    /// Returns the operands of this instruction kind.
    pub fn operands(&self) -> SmallVec<[ValueId; 3]> {
        match self {
            Self::Alloca(_) => SmallVec::new(),
            Self::Load(_, v) | Self::ZExt(v, _) | Self::Trunc(v, _) => smallvec::smallvec![*v],
            Self::Store(a, b)
            | Self::ElementPtr(_, a, b)
            | Self::Add(a, b)
            | Self::Sub(a, b)
            | Self::Mul(a, b)
            | Self::SDiv(a, b)
            | Self::SRem(a, b)
            | Self::ICmp(_, a, b) => smallvec::smallvec![*a, *b],
            Self::Call(_, args) => args.iter().copied().collect(),
        }
    }

    /// Returns the instruction mnemonic.
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Self::Alloca(_) => "alloca",
            Self::Load(..) => "load",
            Self::Store(..) => "store",
            Self::ElementPtr(..) => "gep",
            Self::Add(..) => "add",
            Self::Sub(..) => "sub",
            Self::Mul(..) => "mul",
            Self::SDiv(..) => "sdiv",
            Self::SRem(..) => "srem",
            Self::ICmp(..) => "icmp",
            Self::ZExt(..) => "zext",
            Self::Trunc(..) => "trunc",
            Self::Call(..) => "call",
        }
    }

    /// Returns true if this instruction writes to memory or has effects outside the function.
    pub const fn has_side_effects(&self) -> bool {
        matches!(self, Self::Store(..) | Self::Call(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operands() {
        let (a, b) = (ValueId::new(0), ValueId::new(1));
        assert!(InstKind::Alloca(MirType::I64).operands().is_empty());
        assert_eq!(InstKind::Store(a, b).operands().as_slice(), &[a, b]);
        assert_eq!(InstKind::Trunc(b, MirType::I32).operands().as_slice(), &[b]);
        let call = InstKind::Call(ExternId::new(0), smallvec::smallvec![b, a]);
        assert_eq!(call.operands().as_slice(), &[b, a]);
        assert!(call.has_side_effects());
    }

    #[test]
    fn predicates() {
        assert!(ICmp::Sgt.eval(3, -1));
        assert!(!ICmp::Slt.eval(3, -1));
        assert!(ICmp::Ne.eval(0, 1));
        assert_eq!(ICmp::Eq.to_string(), "eq");
    }
}
