//! Toroid compiler configuration.
//!
//! Everything here is plain data: the command line is parsed into [`Opts`], which is then split
//! into the [`GridSize`] consumed by the grid loader and the [`CodegenOpts`] consumed by the code
//! generator.

#![cfg_attr(docsrs, feature(doc_cfg))]

use std::num::NonZeroUsize;

#[macro_use]
mod macros;

mod opts;
pub use opts::Opts;

mod utils;

/// The version of the compiler, as reported by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

str_enum! {
    /// Stack underflow policy of the generated program.
    #[derive(Default)]
    #[derive(strum::EnumIs)]
    #[strum(serialize_all = "lowercase")]
    pub enum BoundsChecking {
        /// Every pop compares the stack pointer against zero first. Popping an empty stack yields
        /// zero, and discarding from an empty stack does nothing.
        #[default]
        Checked,
        /// Pops read below the stack without checking. Faster, undefined behavior on underflow.
        Unchecked,
    }
}

str_enum! {
    /// What the compiler writes to its output.
    #[derive(Default)]
    #[derive(strum::EnumIs)]
    #[strum(serialize_all = "kebab-case")]
    pub enum EmitKind {
        /// Textual LLVM IR module.
        #[default]
        LlvmIr,
        /// The compiler's own mid-level IR listing.
        Mir,
        /// Graphviz DOT rendering of the control-flow graph.
        Dot,
        /// The control-flow tree built from the grid.
        Tree,
    }
}

/// Dimensions of the grid a program is reflowed into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    /// Number of rows.
    pub height: NonZeroUsize,
    /// Number of columns.
    pub width: NonZeroUsize,
}

impl GridSize {
    /// The default number of rows.
    pub const DEFAULT_HEIGHT: NonZeroUsize = NonZeroUsize::new(25).unwrap();
    /// The default number of columns.
    pub const DEFAULT_WIDTH: NonZeroUsize = NonZeroUsize::new(80).unwrap();

    /// The largest accepted number of rows or columns on the command line.
    pub const MAX_DIMENSION: usize = 1 << 15;

    /// Creates a new grid size.
    ///
    /// # Panics
    ///
    /// Panics if the number of cells overflows `usize`.
    pub const fn new(height: NonZeroUsize, width: NonZeroUsize) -> Self {
        match Self::try_new(height, width) {
            Some(size) => size,
            None => panic!("grid size overflowed"),
        }
    }

    /// Creates a new grid size, returning `None` if the number of cells overflows `usize`.
    pub const fn try_new(height: NonZeroUsize, width: NonZeroUsize) -> Option<Self> {
        match height.get().checked_mul(width.get()) {
            Some(_) => Some(Self { height, width }),
            None => None,
        }
    }

    /// Total number of cells.
    pub const fn cells(self) -> usize {
        self.height.get() * self.width.get()
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HEIGHT, Self::DEFAULT_WIDTH)
    }
}

/// Options consumed by the code generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenOpts {
    /// Number of `i64` slots in the operand stack.
    pub stack_capacity: NonZeroUsize,
    /// Stack underflow policy.
    pub bounds_checking: BoundsChecking,
    /// Name of the emitted module.
    pub module_name: String,
}

impl CodegenOpts {
    /// The default operand stack capacity.
    pub const DEFAULT_STACK_CAPACITY: NonZeroUsize = NonZeroUsize::new(1000).unwrap();
    /// The default module name.
    pub const DEFAULT_MODULE_NAME: &'static str = "toroid";
}

impl Default for CodegenOpts {
    fn default() -> Self {
        Self {
            stack_capacity: Self::DEFAULT_STACK_CAPACITY,
            bounds_checking: BoundsChecking::default(),
            module_name: Self::DEFAULT_MODULE_NAME.to_string(),
        }
    }
}
