//! Control-flow tree construction.
//!
//! The instruction pointer's walk over the grid is infinite in general. [`build`] simulates it
//! from the entry state, expanding every state at most once: the first time a state is reached it
//! becomes an [`Node::Instruction`], every later time a [`Node::BackEdge`] to it. States that are
//! reached more than once are the tree's *destinations*; they are the only states that need an
//! addressable block in generated code.

#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate tracing;

mod state;
pub use state::State;

mod tree;
pub use tree::{ControlTree, Divergence, Node, NodeId};

mod build;
pub use build::build;
