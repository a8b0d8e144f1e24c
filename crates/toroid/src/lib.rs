//! Ahead-of-time compiler from Befunge-93 to LLVM IR.
//!
//! A program is reflowed into a fixed [`grid`], its reachable paths are summarized in a
//! control-flow tree by [`flow`], and [`codegen`] lowers that tree to an SSA mid-level IR which is
//! then printed as textual LLVM IR or run by the built-in interpreter.
//!
//! ```
//! use toroid::{codegen, config::{CodegenOpts, GridSize}, flow, grid::Grid};
//!
//! let grid = Grid::new("52*,@", GridSize::default());
//! let tree = flow::build(&grid);
//! let module = codegen::generate(&tree, &CodegenOpts::default()).unwrap();
//! assert!(codegen::emit_llvm(&module).contains("define i32 @main()"));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(unused_crate_dependencies)]

#[doc(inline)]
pub use toroid_codegen as codegen;
#[doc(inline)]
pub use toroid_config as config;
#[doc(inline)]
pub use toroid_data_structures as data_structures;
#[doc(inline)]
pub use toroid_flow as flow;
#[doc(inline)]
pub use toroid_grid as grid;
#[doc(inline)]
pub use toroid_interface as interface;

#[cfg(feature = "cli")]
#[doc(inline)]
pub use toroid_cli as cli;
