//! Lowering from the control-flow tree to MIR.
//!
//! The generated program keeps the operand stack in memory: an `alloca`'d array of `i64` slots,
//! a stack pointer cell and three scratch cells. Each tree state that is a destination becomes
//! one named block; every other instruction is inlined into whatever block reaches it.

use crate::mir::{
    BlockId, ExternFunction, ExternId, Function, FunctionBuilder, ICmp, MirType, Module, ValueId,
};
use toroid_config::{BoundsChecking, CodegenOpts};
use toroid_data_structures::map::FxHashMap;
use toroid_flow::{ControlTree, Divergence, Node, NodeId, State};
use toroid_grid::Direction;
use toroid_interface::Pos;

mod stack;


/// An instruction the code generator refuses to lower.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    /// Input instructions (`&`, `~`) and integer output (`.`).
    #[error("unsupported instruction `{instruction}` at {pos}")]
    UnsupportedInstruction { instruction: char, pos: Pos },
    /// Grid access (`p`, `g`).
    #[error("disallowed instruction `{instruction}` at {pos}: self-modification not supported")]
    DisallowedInstruction { instruction: char, pos: Pos },
}

impl CodegenError {
    /// Returns the offending instruction.
    pub fn instruction(&self) -> char {
        match *self {
            Self::UnsupportedInstruction { instruction, .. }
            | Self::DisallowedInstruction { instruction, .. } => instruction,
        }
    }

    /// Returns the position of the offending instruction.
    pub fn pos(&self) -> Pos {
        match *self {
            Self::UnsupportedInstruction { pos, .. } | Self::DisallowedInstruction { pos, .. } => {
                pos
            }
        }
    }

    /// Returns a short label for the offending cell.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnsupportedInstruction { instruction: '.', .. } => {
                "integer output is not supported"
            }
            Self::UnsupportedInstruction { .. } => "input is not supported",
            Self::DisallowedInstruction { .. } => "grid access is not supported",
        }
    }
}

/// Generates a MIR module with a single `main` function from a control-flow tree.
#[instrument(level = "debug", skip_all, fields(module = %opts.module_name))]
pub fn generate(tree: &ControlTree, opts: &CodegenOpts) -> Result<Module, CodegenError> {
    let mut module = Module::new(opts.module_name.clone());
    let externs = Externs::declare(&mut module);

    let mut func = Function::new("main", MirType::I32);
    let mut builder = FunctionBuilder::new(&mut func);
    let mut lowerer = Lowerer::new(tree, opts, externs, &mut builder);
    lowerer.lower(&mut builder)?;

    debug!(
        blocks = func.blocks.len(),
        instructions = func.instruction_count(),
        destinations = tree.destinations().len(),
        "generated main"
    );
    module.add_function(func);
    Ok(module)
}

/// The C runtime functions the generated program calls.
#[derive(Clone, Copy, Debug)]
struct Externs {
    putchar: ExternId,
    srandom: ExternId,
    random: ExternId,
    time: ExternId,
}

impl Externs {
    fn declare(module: &mut Module) -> Self {
        use MirType::{Ptr, Void};
        let (i32, i64) = (MirType::I32, MirType::I64);
        Self {
            putchar: module.declare(ExternFunction::new("putchar", vec![i32], i32)),
            srandom: module.declare(ExternFunction::new("srandom", vec![i32], Void)),
            random: module.declare(ExternFunction::new("random", vec![], i64)),
            time: module.declare(ExternFunction::new("time", vec![Ptr], i64)),
        }
    }
}

/// Pointers to the memory of the generated program.
#[derive(Clone, Copy, Debug)]
struct Runtime {
    /// Type of the operand stack array.
    stack_ty: MirType,
    stack: ValueId,
    sp: ValueId,
    a: ValueId,
    b: ValueId,
    x: ValueId,
}

/// Lowers a [`ControlTree`] into the body of `main`.
struct Lowerer<'a> {
    tree: &'a ControlTree,
    bounds_checking: BoundsChecking,
    externs: Externs,
    rt: Runtime,
    /// Blocks of destination states, created on first reference.
    blocks: FxHashMap<State, BlockId>,
    /// Chains still to be lowered, each starting at the top of its block.
    work: Vec<(BlockId, NodeId)>,
    /// Counter for naming checked-pop blocks.
    pops: u32,
}

impl<'a> Lowerer<'a> {
    /// Emits the prologue into the entry block: memory for the stack and scratch cells, a zeroed
    /// stack pointer, and `srandom(time(NULL))`.
    fn new(
        tree: &'a ControlTree,
        opts: &CodegenOpts,
        externs: Externs,
        builder: &mut FunctionBuilder<'_>,
    ) -> Self {
        let stack_ty = MirType::Array(opts.stack_capacity.get() as u64);
        let stack = builder.alloca(stack_ty);
        let sp = builder.alloca(MirType::I64);
        let a = builder.alloca(MirType::I64);
        let b = builder.alloca(MirType::I64);
        let x = builder.alloca(MirType::I64);
        let zero = builder.imm_i64(0);
        builder.store(zero, sp);

        let null = builder.null();
        let now = builder.call(externs.time, MirType::I64, [null]);
        let seed = builder.trunc(now, MirType::I32);
        builder.call(externs.srandom, MirType::Void, [seed]);

        Self {
            tree,
            bounds_checking: opts.bounds_checking,
            externs,
            rt: Runtime { stack_ty, stack, sp, a, b, x },
            blocks: FxHashMap::default(),
            work: Vec::new(),
            pops: 0,
        }
    }

    fn lower(&mut self, builder: &mut FunctionBuilder<'_>) -> Result<(), CodegenError> {
        self.work.push((builder.current_block(), self.tree.root()));
        while let Some((block, node)) = self.work.pop() {
            builder.switch_to_block(block);
            self.lower_chain(builder, node)?;
        }
        Ok(())
    }

    /// Returns the block of a destination state, creating it on first use.
    fn block_for(&mut self, builder: &mut FunctionBuilder<'_>, state: State) -> BlockId {
        *self.blocks.entry(state).or_insert_with(|| builder.create_block(state.to_string()))
    }

    /// Lowers a straight-line run of nodes into the current block until it is terminated.
    fn lower_chain(
        &mut self,
        builder: &mut FunctionBuilder<'_>,
        mut node: NodeId,
    ) -> Result<(), CodegenError> {
        let tree = self.tree;
        loop {
            match *tree.node(node) {
                Node::Instruction { state, cell, next } => {
                    if tree.is_destination(&state) {
                        let block = self.block_for(builder, state);
                        builder.jump(block);
                        builder.switch_to_block(block);
                    }
                    match self.lower_instruction(builder, state, cell, next)? {
                        Some(next) => node = next,
                        None => return Ok(()),
                    }
                }
                Node::BackEdge(state) => {
                    let block = self.block_for(builder, state);
                    builder.jump(block);
                    return Ok(());
                }
                Node::Divergence(_) => {
                    trace!(?node, "divergence without a branching instruction");
                    builder.unreachable();
                    return Ok(());
                }
            }
        }
    }

    /// Lowers a single instruction, returning the node that continues the current block.
    fn lower_instruction(
        &mut self,
        builder: &mut FunctionBuilder<'_>,
        state: State,
        cell: char,
        next: Option<NodeId>,
    ) -> Result<Option<NodeId>, CodegenError> {
        if state.string_mode {
            if cell != '"' {
                self.push_imm(builder, i64::from(u32::from(cell)));
            }
            return Ok(next);
        }

        let rt = self.rt;
        match cell {
            '0'..='9' => self.push_imm(builder, i64::from(cell as u8 - b'0')),
            '+' => self.binary(builder, FunctionBuilder::add),
            '-' => self.binary(builder, FunctionBuilder::sub),
            '*' => self.binary(builder, FunctionBuilder::mul),
            '/' => self.binary(builder, FunctionBuilder::sdiv),
            '%' => self.binary(builder, FunctionBuilder::srem),
            '`' => self.binary(builder, |builder, a, b| {
                let gt = builder.icmp(ICmp::Sgt, a, b);
                builder.zext(gt, MirType::I64)
            }),
            '!' => {
                let value = self.pop(builder, rt.x);
                let zero = builder.imm_i64(0);
                let is_zero = builder.icmp(ICmp::Eq, value, zero);
                let result = builder.zext(is_zero, MirType::I64);
                self.push(builder, result);
            }
            ',' => {
                let value = self.pop(builder, rt.x);
                let ch = builder.trunc(value, MirType::I32);
                builder.call(self.externs.putchar, MirType::I32, [ch]);
            }
            ':' => {
                let value = self.peek(builder, rt.x);
                self.push(builder, value);
            }
            '\\' => {
                let a = self.pop(builder, rt.a);
                let b = self.pop(builder, rt.b);
                self.push(builder, a);
                self.push(builder, b);
            }
            '$' => self.discard(builder),
            '_' | '|' | '?' => {
                let next_node = next.map(|next| self.tree.node(next));
                if let Some(&Node::Divergence(divergence)) = next_node {
                    self.diverge(builder, state, cell, &divergence);
                    return Ok(None);
                }
            }
            '@' => {
                let status = builder.imm_i32(0);
                builder.ret(Some(status));
                return Ok(None);
            }
            '&' | '~' | '.' => {
                return Err(CodegenError::UnsupportedInstruction {
                    instruction: cell,
                    pos: state.pos,
                });
            }
            'p' | 'g' => {
                return Err(CodegenError::DisallowedInstruction {
                    instruction: cell,
                    pos: state.pos,
                });
            }
            _ => {}
        }
        Ok(next)
    }

    /// Pops `a`, then `b`, and pushes `op(a, b)`.
    fn binary<'b>(
        &mut self,
        builder: &mut FunctionBuilder<'b>,
        op: impl FnOnce(&mut FunctionBuilder<'b>, ValueId, ValueId) -> ValueId,
    ) {
        let rt = self.rt;
        let a = self.pop(builder, rt.a);
        let b = self.pop(builder, rt.b);
        let result = op(builder, a, b);
        self.push(builder, result);
    }

    /// Terminates the current block with a branch or switch into one block per exit, and queues
    /// the continuations.
    fn diverge(
        &mut self,
        builder: &mut FunctionBuilder<'_>,
        state: State,
        cell: char,
        divergence: &Divergence,
    ) {
        let mut targets = [None; 4];
        let mut queued = Vec::with_capacity(4);
        for (direction, node) in divergence.slots() {
            let block = builder.create_block(format!("{state}.{direction}"));
            targets[direction as usize] = Some(block);
            queued.push((block, node));
        }
        let mut target = |builder: &mut FunctionBuilder<'_>, direction: Direction| {
            *targets[direction as usize].get_or_insert_with(|| {
                let current = builder.current_block();
                let block = builder.create_block(format!("{state}.{direction}"));
                builder.switch_to_block(block);
                builder.unreachable();
                builder.switch_to_block(current);
                block
            })
        };

        let rt = self.rt;
        match cell {
            '_' | '|' => {
                let value = self.pop(builder, rt.x);
                let zero = builder.imm_i64(0);
                let nonzero = builder.icmp(ICmp::Ne, value, zero);
                let (then_dir, else_dir) = if cell == '_' {
                    (Direction::Left, Direction::Right)
                } else {
                    (Direction::Up, Direction::Down)
                };
                let then_block = target(builder, then_dir);
                let else_block = target(builder, else_dir);
                builder.branch(nonzero, then_block, else_block);
            }
            _ => {
                let random = builder.call(self.externs.random, MirType::I64, []);
                let four = builder.imm_i64(4);
                let residue = builder.srem(random, four);
                let cases = [
                    (0, target(builder, Direction::Up)),
                    (1, target(builder, Direction::Down)),
                    (2, target(builder, Direction::Left)),
                ];
                let default = target(builder, Direction::Right);
                builder.switch(residue, default, &cases);
            }
        }

        // Reversed so the first exit is lowered first.
        self.work.extend(queued.into_iter().rev());
    }
}
