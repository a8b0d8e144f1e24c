//! Operand stack access in the generated program.

use super::Lowerer;
use crate::mir::{FunctionBuilder, ICmp, MirType, ValueId};

impl Lowerer<'_> {
    /// Pushes an `i64` constant.
    pub(super) fn push_imm(&mut self, builder: &mut FunctionBuilder<'_>, value: i64) {
        let value = builder.imm_i64(value);
        self.push(builder, value);
    }

    /// Pushes `value`. The stack capacity is not checked.
    pub(super) fn push(&mut self, builder: &mut FunctionBuilder<'_>, value: ValueId) {
        let rt = self.rt;
        let sp = builder.load(MirType::I64, rt.sp);
        let slot = builder.element_ptr(rt.stack_ty, rt.stack, sp);
        builder.store(value, slot);
        let one = builder.imm_i64(1);
        let sp = builder.add(sp, one);
        builder.store(sp, rt.sp);
    }

    /// Pops the top of the stack through the scratch cell `scratch` and returns it.
    pub(super) fn pop(&mut self, builder: &mut FunctionBuilder<'_>, scratch: ValueId) -> ValueId {
        self.read_top(builder, Some(scratch), true);
        builder.load(MirType::I64, scratch)
    }

    /// Reads the top of the stack through `scratch` without removing it.
    pub(super) fn peek(&mut self, builder: &mut FunctionBuilder<'_>, scratch: ValueId) -> ValueId {
        self.read_top(builder, Some(scratch), false);
        builder.load(MirType::I64, scratch)
    }

    /// Pops and discards the top of the stack.
    pub(super) fn discard(&mut self, builder: &mut FunctionBuilder<'_>) {
        self.read_top(builder, None, true);
    }

    /// Copies the top of the stack into `scratch` if given, and removes it if `remove` is set.
    ///
    /// With bounds checking, an empty stack stores zero into `scratch` and is left untouched.
    /// This splits the current block into `pop.N.empty`, `pop.N.some` and `pop.N.done`, leaving
    /// the builder at the latter.
    fn read_top(
        &mut self,
        builder: &mut FunctionBuilder<'_>,
        scratch: Option<ValueId>,
        remove: bool,
    ) {
        let rt = self.rt;
        let sp = builder.load(MirType::I64, rt.sp);

        if self.bounds_checking.is_unchecked() {
            self.take_top(builder, sp, scratch, remove);
            return;
        }

        let n = self.pops;
        self.pops += 1;
        let empty = builder.create_block(format!("pop.{n}.empty"));
        let some = builder.create_block(format!("pop.{n}.some"));
        let done = builder.create_block(format!("pop.{n}.done"));

        let zero = builder.imm_i64(0);
        let is_empty = builder.icmp(ICmp::Eq, sp, zero);
        builder.branch(is_empty, empty, some);

        builder.switch_to_block(empty);
        if let Some(scratch) = scratch {
            builder.store(zero, scratch);
        }
        builder.jump(done);

        builder.switch_to_block(some);
        self.take_top(builder, sp, scratch, remove);
        builder.jump(done);

        builder.switch_to_block(done);
    }

    /// Reads the slot below `sp`, without any check.
    fn take_top(
        &mut self,
        builder: &mut FunctionBuilder<'_>,
        sp: ValueId,
        scratch: Option<ValueId>,
        remove: bool,
    ) {
        let rt = self.rt;
        let one = builder.imm_i64(1);
        let top = builder.sub(sp, one);
        if let Some(scratch) = scratch {
            let slot = builder.element_ptr(rt.stack_ty, rt.stack, top);
            let value = builder.load(MirType::I64, slot);
            builder.store(value, scratch);
        }
        if remove {
            builder.store(top, rt.sp);
        }
    }
}
