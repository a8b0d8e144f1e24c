//! The main entry point for the Toroid compiler.

use std::process::ExitCode;
use toroid_cli::{
    parse_args, run_compiler_args,
    utils::{LogDestination, init_logger},
};

// Re-exported by the library target.
use toroid as _;
use toroid_codegen as _;
use toroid_config as _;
use toroid_data_structures as _;
use toroid_flow as _;
use toroid_grid as _;
use toroid_interface as _;

fn main() -> ExitCode {
    init_logger(LogDestination::Stderr);
    let opts = match parse_args(std::env::args_os()) {
        Ok(opts) => opts,
        Err(e) => e.exit(),
    };
    match run_compiler_args(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
