//! MIR function builder.

use super::{
    BlockId, ExternId, Function, ICmp, Immediate, InstKind, Instruction, MirType, Terminator,
    Value, ValueId,
};
use smallvec::SmallVec;

/// A builder for constructing MIR functions.
///
/// Terminating a block that already has a terminator is a no-op, so callers can close blocks
/// without tracking whether an earlier path already did.
pub struct FunctionBuilder<'a> {
    /// The function being built.
    func: &'a mut Function,
    /// The current block.
    current_block: BlockId,
}

impl<'a> FunctionBuilder<'a> {
    /// Creates a new function builder positioned at the entry block.
    pub fn new(func: &'a mut Function) -> Self {
        let entry = func.entry_block;
        Self { func, current_block: entry }
    }

    /// Returns the current block.
    #[must_use]
    pub const fn current_block(&self) -> BlockId {
        self.current_block
    }

    /// Switches to a different block.
    pub fn switch_to_block(&mut self, block: BlockId) {
        self.current_block = block;
    }

    /// Creates a new basic block with the given label.
    pub fn create_block(&mut self, name: impl Into<String>) -> BlockId {
        self.func.alloc_block(name)
    }

    /// Returns true if the current block already has a terminator.
    pub fn is_terminated(&self) -> bool {
        self.func.blocks[self.current_block].is_terminated()
    }

    /// Creates an `i64` immediate.
    pub fn imm_i64(&mut self, value: i64) -> ValueId {
        self.func.alloc_value(Value::Immediate(Immediate::i64(value)))
    }

    /// Creates an `i32` immediate.
    pub fn imm_i32(&mut self, value: i32) -> ValueId {
        self.func.alloc_value(Value::Immediate(Immediate::i32(value)))
    }

    /// Creates a null pointer immediate.
    pub fn null(&mut self) -> ValueId {
        self.func.alloc_value(Value::Immediate(Immediate::Null))
    }

    fn emit_inst(&mut self, kind: InstKind, result_ty: Option<MirType>) -> ValueId {
        debug_assert!(!self.is_terminated(), "emitting into terminated block");
        let (inst_id, value) = self.func.alloc_inst(Instruction::new(kind, result_ty));
        self.func.blocks[self.current_block].instructions.push(inst_id);
        value
    }

    // Memory

    /// Emits an alloca instruction.
    pub fn alloca(&mut self, ty: MirType) -> ValueId {
        self.emit_inst(InstKind::Alloca(ty), Some(MirType::Ptr))
    }

    /// Emits a load instruction.
    pub fn load(&mut self, ty: MirType, ptr: ValueId) -> ValueId {
        self.emit_inst(InstKind::Load(ty, ptr), Some(ty))
    }

    /// Emits a store instruction.
    pub fn store(&mut self, value: ValueId, ptr: ValueId) {
        self.emit_inst(InstKind::Store(value, ptr), None);
    }

    /// Emits an element pointer computation into an `i64` array.
    pub fn element_ptr(&mut self, array: MirType, base: ValueId, index: ValueId) -> ValueId {
        self.emit_inst(InstKind::ElementPtr(array, base, index), Some(MirType::Ptr))
    }

    // Arithmetic

    /// Emits an add instruction.
    pub fn add(&mut self, a: ValueId, b: ValueId) -> ValueId {
        self.emit_inst(InstKind::Add(a, b), Some(MirType::I64))
    }

    /// Emits a sub instruction.
    pub fn sub(&mut self, a: ValueId, b: ValueId) -> ValueId {
        self.emit_inst(InstKind::Sub(a, b), Some(MirType::I64))
    }

    /// Emits a mul instruction.
    pub fn mul(&mut self, a: ValueId, b: ValueId) -> ValueId {
        self.emit_inst(InstKind::Mul(a, b), Some(MirType::I64))
    }

    /// Emits a signed division instruction.
    pub fn sdiv(&mut self, a: ValueId, b: ValueId) -> ValueId {
        self.emit_inst(InstKind::SDiv(a, b), Some(MirType::I64))
    }

    /// Emits a signed remainder instruction.
    pub fn srem(&mut self, a: ValueId, b: ValueId) -> ValueId {
        self.emit_inst(InstKind::SRem(a, b), Some(MirType::I64))
    }

    // Comparison

    /// Emits an integer comparison.
    pub fn icmp(&mut self, pred: ICmp, a: ValueId, b: ValueId) -> ValueId {
        self.emit_inst(InstKind::ICmp(pred, a, b), Some(MirType::I1))
    }

    // Conversion

    /// Emits a zero extension.
    pub fn zext(&mut self, value: ValueId, ty: MirType) -> ValueId {
        self.emit_inst(InstKind::ZExt(value, ty), Some(ty))
    }

    /// Emits a truncation.
    pub fn trunc(&mut self, value: ValueId, ty: MirType) -> ValueId {
        self.emit_inst(InstKind::Trunc(value, ty), Some(ty))
    }

    // Calls

    /// Emits a call to an external function returning `returns`.
    pub fn call(
        &mut self,
        callee: ExternId,
        returns: MirType,
        args: impl IntoIterator<Item = ValueId>,
    ) -> ValueId {
        let args: SmallVec<[ValueId; 2]> = args.into_iter().collect();
        let result_ty = (!returns.is_void()).then_some(returns);
        self.emit_inst(InstKind::Call(callee, args), result_ty)
    }

    // Terminators

    /// Sets the terminator of the current block, unless it already has one.
    fn terminate(&mut self, term: Terminator) {
        let current = self.current_block;
        let block = &mut self.func.blocks[current];
        if block.is_terminated() {
            trace!(block = %block.name, ignored = term.mnemonic(), "block already terminated");
            return;
        }
        let successors = term.successors();
        block.successors.extend(successors.iter().copied());
        block.terminator = Some(term);
        for succ in successors {
            self.func.blocks[succ].predecessors.push(current);
        }
    }

    /// Sets a jump terminator.
    pub fn jump(&mut self, target: BlockId) {
        self.terminate(Terminator::Jump(target));
    }

    /// Sets a branch terminator.
    pub fn branch(&mut self, condition: ValueId, then_block: BlockId, else_block: BlockId) {
        self.terminate(Terminator::Branch { condition, then_block, else_block });
    }

    /// Sets a switch terminator. Case values are `i64` immediates.
    pub fn switch(&mut self, value: ValueId, default: BlockId, cases: &[(i64, BlockId)]) {
        let cases = cases.iter().map(|&(case, target)| (self.imm_i64(case), target)).collect();
        self.terminate(Terminator::Switch { value, default, cases });
    }

    /// Sets a return terminator.
    pub fn ret(&mut self, value: Option<ValueId>) {
        self.terminate(Terminator::Return(value));
    }

    /// Sets an unreachable terminator.
    pub fn unreachable(&mut self) {
        self.terminate(Terminator::Unreachable);
    }

    /// Returns a reference to the function.
    #[must_use]
    pub fn func(&self) -> &Function {
        self.func
    }

    /// Returns a mutable reference to the function.
    pub fn func_mut(&mut self) -> &mut Function {
        self.func
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_terminator_is_ignored() {
        let mut func = Function::new("main", MirType::I32);
        let mut b = FunctionBuilder::new(&mut func);
        let zero = b.imm_i32(0);
        let other = b.create_block("other");
        b.ret(Some(zero));
        b.jump(other);
        b.ret(None);

        let entry = func.entry();
        assert_eq!(entry.terminator(), Some(&Terminator::Return(Some(zero))));
        assert!(entry.successors.is_empty());
        assert!(func.block(other).predecessors.is_empty());
    }

    #[test]
    fn edges_are_recorded() {
        let mut func = Function::new("main", MirType::I32);
        let mut b = FunctionBuilder::new(&mut func);
        let then_block = b.create_block("then");
        let else_block = b.create_block("else");
        let slot = b.alloca(MirType::I64);
        let value = b.load(MirType::I64, slot);
        let zero = b.imm_i64(0);
        let cond = b.icmp(ICmp::Ne, value, zero);
        b.branch(cond, then_block, else_block);
        b.switch_to_block(then_block);
        b.jump(else_block);

        let entry = func.entry_block;
        assert_eq!(func.block(entry).successors.as_slice(), &[then_block, else_block]);
        assert_eq!(func.block(else_block).predecessors.as_slice(), &[entry, then_block]);
        assert_eq!(func.value_ty(cond), MirType::I1);
        assert_eq!(func.instruction_count(), 3);
    }

    #[test]
    fn void_calls_have_no_result_type() {
        let mut func = Function::new("main", MirType::I32);
        let mut b = FunctionBuilder::new(&mut func);
        let arg = b.imm_i32(7);
        let v = b.call(ExternId::new(0), MirType::Void, [arg]);
        assert_eq!(func.value_ty(v), MirType::Void);
        assert!(!func.instructions[crate::mir::InstId::new(0)].has_result());
    }
}
