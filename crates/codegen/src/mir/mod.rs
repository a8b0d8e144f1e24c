//! Mid-level Intermediate Representation (MIR).
//!
//! MIR is an SSA-form IR that sits between the control-flow tree and LLVM IR. Its instructions map
//! one-to-one onto LLVM instructions, so the emitter is a straight printer, and it is simple
//! enough to be executed directly by the [`Interpreter`](crate::Interpreter).

use toroid_data_structures::newtype_index;

mod types;
pub use types::MirType;

mod value;
pub use value::{Immediate, Value};

mod inst;
pub use inst::{ICmp, InstKind, Instruction};

mod block;
pub use block::{BasicBlock, Terminator};

mod function;
pub use function::Function;

mod module;
pub use module::{ExternFunction, Module};

mod builder;
pub use builder::FunctionBuilder;

mod display;
pub use display::{function_to_dot, module_to_dot};

newtype_index! {
    /// A unique identifier for a value in the MIR.
    pub struct ValueId;
}

newtype_index! {
    /// A unique identifier for an instruction in the MIR.
    pub struct InstId;
}

newtype_index! {
    /// A unique identifier for a basic block in the MIR.
    pub struct BlockId;
}

newtype_index! {
    /// A unique identifier for a function in the MIR.
    pub struct FunctionId;
}

newtype_index! {
    /// A unique identifier for an external function declaration.
    pub struct ExternId;
}
