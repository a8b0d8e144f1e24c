//! MIR functions.

use super::{BasicBlock, BlockId, InstId, Instruction, MirType, Value, ValueId};
use toroid_data_structures::index::IndexVec;

/// A function in the MIR.
#[derive(Clone, Debug)]
pub struct Function {
    /// The function name.
    pub name: String,
    /// The return type.
    pub returns: MirType,
    /// All values in this function.
    pub values: IndexVec<ValueId, Value>,
    /// All instructions in this function.
    pub instructions: IndexVec<InstId, Instruction>,
    /// The value defined by each instruction.
    pub results: IndexVec<InstId, ValueId>,
    /// All basic blocks in this function, in emission order.
    pub blocks: IndexVec<BlockId, BasicBlock>,
    /// The entry block.
    pub entry_block: BlockId,
}

impl Function {
    /// Creates a new function with an empty entry block.
    pub fn new(name: impl Into<String>, returns: MirType) -> Self {
        let mut blocks = IndexVec::new();
        let entry_block = blocks.push(BasicBlock::new("entry"));
        Self {
            name: name.into(),
            returns,
            values: IndexVec::new(),
            instructions: IndexVec::new(),
            results: IndexVec::new(),
            blocks,
            entry_block,
        }
    }

    /// Returns the value with the given ID.
    #[inline]
    pub fn value(&self, id: ValueId) -> &Value {
        &self.values[id]
    }

    /// Returns the type of the given value.
    pub fn value_ty(&self, id: ValueId) -> MirType {
        match &self.values[id] {
            Value::Inst(inst) => self.instructions[*inst].result_ty.unwrap_or(MirType::Void),
            Value::Immediate(imm) => imm.ty(),
        }
    }

    /// Returns the instruction with the given ID.
    #[inline]
    pub fn instruction(&self, id: InstId) -> &Instruction {
        &self.instructions[id]
    }

    /// Returns the value defined by the given instruction.
    #[inline]
    pub fn inst_value(&self, id: InstId) -> ValueId {
        self.results[id]
    }

    /// Returns the block with the given ID.
    #[inline]
    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id]
    }

    /// Returns a mutable reference to the block with the given ID.
    #[inline]
    pub fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        &mut self.blocks[id]
    }

    /// Returns the entry block.
    pub fn entry(&self) -> &BasicBlock {
        &self.blocks[self.entry_block]
    }

    /// Looks up a block by its label.
    pub fn block_by_name(&self, name: &str) -> Option<BlockId> {
        self.blocks.iter_enumerated().find_map(|(id, block)| (block.name == name).then_some(id))
    }

    /// Returns the number of non-terminator instructions placed in blocks.
    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(|block| block.instructions.len()).sum()
    }

    /// Allocates a new value.
    pub fn alloc_value(&mut self, value: Value) -> ValueId {
        self.values.push(value)
    }

    /// Allocates a new instruction along with the value it defines.
    pub fn alloc_inst(&mut self, inst: Instruction) -> (InstId, ValueId) {
        let inst_id = self.instructions.push(inst);
        let value = self.values.push(Value::Inst(inst_id));
        self.results.push(value);
        (inst_id, value)
    }

    /// Allocates a new block.
    pub fn alloc_block(&mut self, name: impl Into<String>) -> BlockId {
        self.blocks.push(BasicBlock::new(name))
    }
}
