//! Basic blocks.

use super::{BlockId, InstId, ValueId};
use smallvec::{SmallVec, smallvec};

/// A straight-line run of instructions ending in a [`Terminator`].
#[derive(Clone, Debug)]
pub struct BasicBlock {
    /// The label of this block. Unique within a function.
    pub name: String,
    /// Instructions in this block (excluding the terminator).
    pub instructions: Vec<InstId>,
    /// The terminator instruction.
    pub terminator: Option<Terminator>,
    /// Predecessor blocks.
    pub predecessors: SmallVec<[BlockId; 4]>,
    /// Successor blocks.
    pub successors: SmallVec<[BlockId; 4]>,
}

impl BasicBlock {
    /// Creates a new empty basic block.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: Vec::new(),
            terminator: None,
            predecessors: SmallVec::new(),
            successors: SmallVec::new(),
        }
    }

    /// Returns true if this block has a terminator.
    pub fn is_terminated(&self) -> bool {
        self.terminator.is_some()
    }

    /// Returns the terminator, if any.
    pub fn terminator(&self) -> Option<&Terminator> {
        self.terminator.as_ref()
    }
}

/// Block terminator instructions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Terminator {
    /// Unconditional jump.
    Jump(BlockId),
    /// Two-way branch on an `i1`.
    Branch {
        /// The condition value.
        condition: ValueId,
        /// Block to jump to if true.
        then_block: BlockId,
        /// Block to jump to if false.
        else_block: BlockId,
    },
    /// Multi-way branch on an integer.
    Switch {
        /// The value to switch on.
        value: ValueId,
        /// Default block.
        default: BlockId,
        /// Cases: (immediate value, target block).
        cases: Vec<(ValueId, BlockId)>,
    },
    /// Return from the function.
    Return(Option<ValueId>),
    /// Control never reaches here.
    Unreachable,
}

impl Terminator {
    /// Returns the blocks control may transfer to, without duplicates.
    pub fn successors(&self) -> SmallVec<[BlockId; 4]> {
        match self {
            Self::Jump(target) => smallvec![*target],
            Self::Branch { then_block, else_block, .. } => {
                smallvec![*then_block, *else_block]
            }
            Self::Switch { default, cases, .. } => {
                let mut succs: SmallVec<[BlockId; 4]> = smallvec![*default];
                for (_, target) in cases {
                    if !succs.contains(target) {
                        succs.push(*target);
                    }
                }
                succs
            }
            Self::Return(_) | Self::Unreachable => SmallVec::new(),
        }
    }

    /// Returns the name of this terminator in the MIR listing.
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Self::Jump(_) => "jump",
            Self::Branch { .. } => "branch",
            Self::Switch { .. } => "switch",
            Self::Return(_) => "return",
            Self::Unreachable => "unreachable",
        }
    }
}
