//! LLVM IR text generation from MIR.
//!
//! MIR instructions correspond one-to-one to LLVM instructions, so this is a printer: values that
//! are defined by instructions are named `%vN` after their MIR value, immediates are printed
//! inline, and blocks keep their MIR labels.

use crate::mir::{
    BlockId, Function, InstId, InstKind, MirType, Module, Terminator, Value, ValueId,
};
use std::fmt::{self, Write};

/// Renders `module` as a textual LLVM IR module.
#[instrument(level = "debug", skip_all, fields(module = %module.name))]
pub fn emit_llvm(module: &Module) -> String {
    let mut emitter = LlvmEmitter::new(module);
    emitter.emit_module();
    emitter.finish()
}

/// LLVM IR text generator.
pub struct LlvmEmitter<'a> {
    module: &'a Module,
    out: String,
}

impl<'a> LlvmEmitter<'a> {
    /// Creates a new emitter for `module`.
    pub fn new(module: &'a Module) -> Self {
        Self { module, out: String::new() }
    }

    /// Returns the generated text.
    pub fn finish(self) -> String {
        self.out
    }

    /// Emits the module header, the external declarations and every function.
    pub fn emit_module(&mut self) {
        // Writing to a `String` cannot fail.
        let _ = self.write_module();
    }

    fn write_module(&mut self) -> fmt::Result {
        let module = self.module;
        writeln!(self.out, "; ModuleID = '{}'", module.name)?;
        writeln!(self.out, "source_filename = \"{}\"", module.name)?;
        writeln!(self.out)?;

        for decl in &module.externs {
            write!(self.out, "declare {} @{}(", decl.returns, decl.name)?;
            for (i, param) in decl.params.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                write!(self.out, "{param}")?;
            }
            writeln!(self.out, ")")?;
        }

        for func in &module.functions {
            writeln!(self.out)?;
            self.write_function(func)?;
        }
        Ok(())
    }

    fn write_function(&mut self, func: &Function) -> fmt::Result {
        writeln!(self.out, "define {} @{}() {{", func.returns, func.name)?;
        for (i, block) in func.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            writeln!(self.out, "{}:", block.name)?;
            for &inst in &block.instructions {
                self.out.push_str("  ");
                self.write_inst(func, inst)?;
                self.out.push('\n');
            }
            self.out.push_str("  ");
            match block.terminator() {
                Some(term) => self.write_terminator(func, term)?,
                None => {
                    debug!(block = %block.name, "unterminated block");
                    self.out.push_str("unreachable");
                }
            }
            self.out.push('\n');
        }
        writeln!(self.out, "}}")
    }

    fn write_inst(&mut self, func: &Function, id: InstId) -> fmt::Result {
        let inst = func.instruction(id);
        if inst.has_result() {
            write!(self.out, "%v{} = ", func.inst_value(id).index())?;
        }
        let v = |id: ValueId| Operand(func, id);
        let t = |id: ValueId| func.value_ty(id);
        match &inst.kind {
            InstKind::Alloca(ty) => write!(self.out, "alloca {ty}"),
            InstKind::Load(ty, ptr) => write!(self.out, "load {ty}, ptr {}", v(*ptr)),
            InstKind::Store(value, ptr) => {
                write!(self.out, "store {} {}, ptr {}", t(*value), v(*value), v(*ptr))
            }
            InstKind::ElementPtr(array, base, index) => write!(
                self.out,
                "getelementptr {array}, ptr {}, i64 0, {} {}",
                v(*base),
                t(*index),
                v(*index)
            ),
            InstKind::Add(a, b)
            | InstKind::Sub(a, b)
            | InstKind::Mul(a, b)
            | InstKind::SDiv(a, b)
            | InstKind::SRem(a, b) => {
                write!(self.out, "{} {} {}, {}", inst.kind.mnemonic(), t(*a), v(*a), v(*b))
            }
            InstKind::ICmp(pred, a, b) => {
                write!(self.out, "icmp {pred} {} {}, {}", t(*a), v(*a), v(*b))
            }
            InstKind::ZExt(value, ty) | InstKind::Trunc(value, ty) => write!(
                self.out,
                "{} {} {} to {ty}",
                inst.kind.mnemonic(),
                t(*value),
                v(*value)
            ),
            InstKind::Call(callee, args) => {
                let decl = self.module.extern_fn(*callee);
                write!(self.out, "call {} @{}(", decl.returns, decl.name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    write!(self.out, "{} {}", t(*arg), v(*arg))?;
                }
                self.out.push(')');
                Ok(())
            }
        }
    }

    fn write_terminator(&mut self, func: &Function, term: &Terminator) -> fmt::Result {
        let label = |id: BlockId| &func.block(id).name;
        match term {
            Terminator::Jump(target) => write!(self.out, "br label %{}", label(*target)),
            Terminator::Branch { condition, then_block, else_block } => write!(
                self.out,
                "br i1 {}, label %{}, label %{}",
                Operand(func, *condition),
                label(*then_block),
                label(*else_block)
            ),
            Terminator::Switch { value, default, cases } => {
                let ty = func.value_ty(*value);
                write!(
                    self.out,
                    "switch {ty} {}, label %{} [",
                    Operand(func, *value),
                    label(*default)
                )?;
                for (case, target) in cases {
                    write!(
                        self.out,
                        "\n    {ty} {}, label %{}",
                        Operand(func, *case),
                        label(*target)
                    )?;
                }
                write!(self.out, "\n  ]")
            }
            Terminator::Return(Some(value)) => {
                write!(self.out, "ret {} {}", func.value_ty(*value), Operand(func, *value))
            }
            Terminator::Return(None) => write!(self.out, "ret {}", MirType::Void),
            Terminator::Unreachable => write!(self.out, "unreachable"),
        }
    }
}

/// An operand: `%vN`, or an inline immediate.
struct Operand<'a>(&'a Function, ValueId);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.value(self.1) {
            Value::Immediate(imm) => write!(f, "{imm}"),
            Value::Inst(_) => write!(f, "%v{}", self.1.index()),
        }
    }
}
