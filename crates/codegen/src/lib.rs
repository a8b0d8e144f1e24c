//! Code generation for toroidal grid programs.
//!
//! [`generate`] lowers a [`ControlTree`](toroid_flow::ControlTree) into a MIR [`Module`] with a
//! single `main` function, [`emit_llvm`] prints that module as textual LLVM IR, and the
//! [`Interpreter`] runs it directly.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(test, allow(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod mir;
pub use mir::{
    BasicBlock, BlockId, Function, FunctionBuilder, FunctionId, Immediate, InstId, InstKind,
    Instruction, MirType, Module, Terminator, Value, ValueId,
};

pub mod lower;
pub use lower::{CodegenError, generate};

pub mod codegen;
pub use codegen::emit_llvm;

mod interp;
pub use interp::{ExecError, Interpreter, RandomSource, StdRandom};
