//! Toroid CLI arguments.

use crate::{BoundsChecking, CodegenOpts, EmitKind, GridSize};
use clap::{ColorChoice, Parser, ValueHint};
use std::{num::NonZeroUsize, path::PathBuf};

/// Ahead-of-time compiler for two-dimensional Befunge-93 programs.
#[derive(Clone, Debug, Parser)]
#[command(name = "toroid", version = crate::VERSION, arg_required_else_help = true)]
pub struct Opts {
    /// Program to compile.
    ///
    /// `-` specifies standard input.
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: PathBuf,
    /// File to write the output to. Defaults to standard output.
    #[arg(long, short, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Number of grid rows the source is reflowed into.
    #[arg(
        help_heading = "Grid options",
        long,
        default_value_t = GridSize::DEFAULT_HEIGHT,
        value_parser = parse_dimension,
    )]
    pub height: NonZeroUsize,
    /// Number of grid columns the source is reflowed into.
    #[arg(
        help_heading = "Grid options",
        long,
        default_value_t = GridSize::DEFAULT_WIDTH,
        value_parser = parse_dimension,
    )]
    pub width: NonZeroUsize,

    /// Number of slots in the operand stack of the generated program.
    #[arg(
        help_heading = "Codegen options",
        long,
        visible_alias = "stack-capacity",
        default_value_t = CodegenOpts::DEFAULT_STACK_CAPACITY,
    )]
    pub stack_size: NonZeroUsize,
    /// Stack underflow policy of the generated program.
    #[arg(help_heading = "Codegen options", long, value_enum, default_value_t)]
    pub bounds_checking: BoundsChecking,
    /// Name of the emitted module.
    #[arg(help_heading = "Codegen options", long, default_value = CodegenOpts::DEFAULT_MODULE_NAME)]
    pub module_name: String,

    /// What to emit.
    #[arg(long, value_enum, default_value_t)]
    pub emit: EmitKind,
    /// Execute the generated program with the built-in interpreter instead of emitting it.
    #[arg(long, conflicts_with = "output")]
    pub run: bool,
    /// Maximum number of instructions the interpreter executes before giving up.
    #[arg(long, requires = "run")]
    pub fuel: Option<u64>,

    /// Coloring.
    #[arg(help_heading = "Display options", long, value_enum, default_value = "auto")]
    pub color: ColorChoice,
}

impl Opts {
    /// Returns the grid dimensions.
    pub fn grid_size(&self) -> GridSize {
        GridSize::new(self.height, self.width)
    }

    /// Returns the code generation options.
    pub fn codegen_opts(&self) -> CodegenOpts {
        CodegenOpts {
            stack_capacity: self.stack_size,
            bounds_checking: self.bounds_checking,
            module_name: self.module_name.clone(),
        }
    }

    /// Returns `true` if the program is read from standard input.
    pub fn is_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}

/// Parses a grid dimension in `1..=GridSize::MAX_DIMENSION`.
fn parse_dimension(s: &str) -> Result<NonZeroUsize, String> {
    let n: NonZeroUsize = s.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    if n.get() > GridSize::MAX_DIMENSION {
        return Err(format!("must be at most {}", GridSize::MAX_DIMENSION));
    }
    Ok(n)
}
