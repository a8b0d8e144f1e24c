//! Code generation from MIR to textual LLVM IR.

mod llvm;
pub use llvm::{LlvmEmitter, emit_llvm};
