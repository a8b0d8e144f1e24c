//! Display implementations for MIR.
//!
//! Includes DOT format CFG generation for visualization.

use super::{BlockId, Function, InstId, InstKind, Module, Terminator, Value, ValueId};
use std::fmt::{self, Write};

/// Generates a DOT format CFG for a function.
pub fn function_to_dot(module: &Module, func: &Function) -> String {
    let mut dot = String::new();
    // Writing to a `String` cannot fail.
    let _ = write_dot(&mut dot, module, func);
    dot
}

fn write_dot(dot: &mut String, module: &Module, func: &Function) -> fmt::Result {
    writeln!(dot, "digraph \"{}\" {{", func.name)?;
    writeln!(dot, "    node [shape=box, fontname=\"Courier\", fontsize=10];")?;
    writeln!(dot, "    edge [fontname=\"Courier\", fontsize=9];")?;
    writeln!(dot)?;

    for (block_id, block) in func.blocks.iter_enumerated() {
        let is_entry = block_id == func.entry_block;

        let mut label = format!("{}:\\l", block.name);
        for &inst_id in &block.instructions {
            label.push_str("  ");
            fmt_inst(&mut label, module, func, inst_id)?;
            label.push_str("\\l");
        }
        if let Some(term) = &block.terminator {
            label.push_str("  ");
            fmt_terminator(&mut label, func, term)?;
            label.push_str("\\l");
        }

        let color = if is_entry { ", fillcolor=\"#e0ffe0\", style=filled" } else { "" };
        writeln!(dot, "    bb{} [label=\"{label}\"{color}];", block_id.index())?;
    }

    writeln!(dot)?;

    for (block_id, block) in func.blocks.iter_enumerated() {
        let block_idx = block_id.index();
        match &block.terminator {
            Some(Terminator::Jump(target)) => {
                writeln!(dot, "    bb{block_idx} -> bb{};", target.index())?;
            }
            Some(Terminator::Branch { then_block, else_block, .. }) => {
                writeln!(
                    dot,
                    "    bb{block_idx} -> bb{} [label=\"true\", color=\"green\"];",
                    then_block.index()
                )?;
                writeln!(
                    dot,
                    "    bb{block_idx} -> bb{} [label=\"false\", color=\"red\"];",
                    else_block.index()
                )?;
            }
            Some(Terminator::Switch { default, cases, .. }) => {
                writeln!(dot, "    bb{block_idx} -> bb{} [label=\"default\"];", default.index())?;
                for (case, target) in cases {
                    writeln!(
                        dot,
                        "    bb{block_idx} -> bb{} [label=\"{}\"];",
                        target.index(),
                        ValueFmt(func, *case)
                    )?;
                }
            }
            Some(Terminator::Return(_) | Terminator::Unreachable) | None => {}
        }
    }

    writeln!(dot, "}}")
}

/// Generates DOT format for an entire module.
pub fn module_to_dot(module: &Module) -> String {
    let mut result = String::new();
    for (func_id, func) in module.iter_functions() {
        if func_id.index() > 0 {
            result.push_str("\n\n");
        }
        result.push_str(&function_to_dot(module, func));
    }
    result
}

/// Writes the MIR listing of `func`, with every line prefixed by `indent`.
pub(super) fn fmt_function(
    f: &mut impl Write,
    module: &Module,
    func: &Function,
    indent: &str,
) -> fmt::Result {
    writeln!(f, "{indent}fn {}() -> {} {{", func.name, func.returns)?;
    for block in &func.blocks {
        writeln!(f, "{indent}{}:", block.name)?;
        for &inst_id in &block.instructions {
            write!(f, "{indent}    ")?;
            fmt_inst(f, module, func, inst_id)?;
            writeln!(f)?;
        }
        match &block.terminator {
            Some(term) => {
                write!(f, "{indent}    ")?;
                fmt_terminator(f, func, term)?;
                writeln!(f)?;
            }
            None => writeln!(f, "{indent}    <unterminated>")?,
        }
    }
    writeln!(f, "{indent}}}")
}

/// Formats a value reference: immediates inline, everything else as `vN`.
struct ValueFmt<'a>(&'a Function, ValueId);

impl fmt::Display for ValueFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.value(self.1) {
            Value::Immediate(imm) => write!(f, "{imm}"),
            Value::Inst(_) => write!(f, "v{}", self.1.index()),
        }
    }
}

fn fmt_inst(f: &mut impl Write, module: &Module, func: &Function, id: InstId) -> fmt::Result {
    let inst = func.instruction(id);
    if inst.has_result() {
        write!(f, "v{} = ", func.inst_value(id).index())?;
    }
    let v = |id: ValueId| ValueFmt(func, id);
    let mnemonic = inst.kind.mnemonic();
    match &inst.kind {
        InstKind::Alloca(ty) => write!(f, "{mnemonic} {ty}"),
        InstKind::Load(ty, ptr) => write!(f, "{mnemonic} {ty}, {}", v(*ptr)),
        InstKind::Store(value, ptr) => write!(f, "{mnemonic} {}, {}", v(*value), v(*ptr)),
        InstKind::ElementPtr(array, base, index) => {
            write!(f, "{mnemonic} {array}, {}, {}", v(*base), v(*index))
        }
        InstKind::Add(a, b)
        | InstKind::Sub(a, b)
        | InstKind::Mul(a, b)
        | InstKind::SDiv(a, b)
        | InstKind::SRem(a, b) => write!(f, "{mnemonic} {}, {}", v(*a), v(*b)),
        InstKind::ICmp(pred, a, b) => write!(f, "{mnemonic} {pred} {}, {}", v(*a), v(*b)),
        InstKind::ZExt(value, ty) | InstKind::Trunc(value, ty) => {
            write!(f, "{mnemonic} {} to {ty}", v(*value))
        }
        InstKind::Call(callee, args) => {
            write!(f, "{mnemonic} @{}(", module.extern_fn(*callee).name)?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", v(*arg))?;
            }
            write!(f, ")")
        }
    }
}

fn fmt_terminator(f: &mut impl Write, func: &Function, term: &Terminator) -> fmt::Result {
    let name = |id: BlockId| &func.block(id).name;
    let mnemonic = term.mnemonic();
    match term {
        Terminator::Jump(target) => write!(f, "{mnemonic} {}", name(*target)),
        Terminator::Branch { condition, then_block, else_block } => write!(
            f,
            "{mnemonic} {}, {}, {}",
            ValueFmt(func, *condition),
            name(*then_block),
            name(*else_block)
        ),
        Terminator::Switch { value, default, cases } => {
            write!(f, "{mnemonic} {}, default {}", ValueFmt(func, *value), name(*default))?;
            for (case, target) in cases {
                write!(f, ", {} => {}", ValueFmt(func, *case), name(*target))?;
            }
            Ok(())
        }
        Terminator::Return(Some(value)) => write!(f, "{mnemonic} {}", ValueFmt(func, *value)),
        Terminator::Return(None) | Terminator::Unreachable => f.write_str(mnemonic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mir::{ExternFunction, FunctionBuilder, ICmp, MirType};

    fn sample() -> Module {
        let mut module = Module::new("test");
        let putchar =
            module.declare(ExternFunction::new("putchar", vec![MirType::I32], MirType::I32));
        let mut func = Function::new("main", MirType::I32);
        let mut b = FunctionBuilder::new(&mut func);
        let done = b.create_block("done");
        let print = b.create_block("print");
        let slot = b.alloca(MirType::I64);
        let value = b.load(MirType::I64, slot);
        let zero = b.imm_i64(0);
        let cond = b.icmp(ICmp::Eq, value, zero);
        b.branch(cond, done, print);
        b.switch_to_block(print);
        let ch = b.trunc(value, MirType::I32);
        b.call(putchar, MirType::I32, [ch]);
        b.jump(done);
        b.switch_to_block(done);
        let status = b.imm_i32(0);
        b.ret(Some(status));
        module.add_function(func);
        module
    }

    #[test]
    fn listing() {
        let expected = "\
module test {
    declare i32 @putchar(i32)

    fn main() -> i32 {
    entry:
        v0 = alloca i64
        v1 = load i64, v0
        v3 = icmp eq v1, 0
        branch v3, done, print
    done:
        return 0
    print:
        v4 = trunc v1 to i32
        v5 = call @putchar(v4)
        jump done
    }
}
";
        assert_eq!(sample().to_string(), expected);
    }

    #[test]
    fn dot() {
        let module = sample();
        let dot = module_to_dot(&module);
        assert!(dot.starts_with("digraph \"main\" {"), "{dot}");
        assert!(dot.contains("bb0 [label=\"entry:\\l"), "{dot}");
        assert!(dot.contains("fillcolor"), "{dot}");
        assert!(dot.contains("bb0 -> bb1 [label=\"true\", color=\"green\"];"), "{dot}");
        assert!(dot.contains("bb0 -> bb2 [label=\"false\", color=\"red\"];"), "{dot}");
        assert!(dot.contains("bb2 -> bb1;"), "{dot}");
        assert!(dot.trim_end().ends_with('}'));
    }
}
