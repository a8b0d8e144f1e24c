//! Toroid compiler CLI definitions, utils, and driver.
//!
//! The driver reads a program, reflows it into a grid, builds its control-flow tree, lowers the
//! tree to MIR, and then either emits the requested representation or runs it.

#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate tracing;

use clap::Parser as _;
use std::{
    fs,
    io::{self, Write},
    sync::Arc,
};
use toroid_codegen::{CodegenError, ExecError, Interpreter, Module};
use toroid_config::{EmitKind, Opts};
use toroid_flow::ControlTree;
use toroid_grid::Grid;
use toroid_interface::{
    DiagCtxt, Result, SourceFile,
    diagnostics::{Diag, HumanEmitter},
};

pub mod utils;

pub fn parse_args<I, T>(itr: I) -> Result<Opts, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Opts::try_parse_from(itr)
}

pub fn run_compiler_args(opts: Opts) -> Result<()> {
    let color = utils::color_choice(opts.color);
    let dcx = DiagCtxt::with_stderr_emitter(None, color);
    let read = if opts.is_stdin() { SourceFile::stdin() } else { SourceFile::read(&opts.input) };
    let source = match read {
        Ok(source) => Arc::new(source),
        Err(e) => {
            let guar = dcx.err(e.to_string());
            return dcx.print_error_count().and(Err(guar));
        }
    };
    dcx.set_emitter(Box::new(HumanEmitter::stderr(color).source(Some(source.clone()))));

    let compiler = Compiler { dcx, opts, source };
    let mut r = compiler.run_default();
    r = compiler.finish_diagnostics().and(r);
    r
}

/// A single compilation of one source file.
pub struct Compiler {
    pub dcx: DiagCtxt,
    pub opts: Opts,
    pub source: Arc<SourceFile>,
}

impl Compiler {
    /// Compiles the source and writes the result to the output file, or to stdout.
    pub fn run_default(&self) -> Result<()> {
        let bytes = self.emit()?;
        match &self.opts.output {
            Some(path) => fs::write(path, &bytes).map_err(|e| {
                self.dcx.err(format!("couldn't write {}: {e}", path.display()))
            }),
            None => io::stdout()
                .lock()
                .write_all(&bytes)
                .map_err(|e| self.dcx.err(format!("couldn't write to stdout: {e}"))),
        }
    }

    /// Runs the pipeline up to the requested output and returns its bytes.
    ///
    /// With `--run` these are the bytes the program wrote.
    #[instrument(level = "debug", skip_all)]
    pub fn emit(&self) -> Result<Vec<u8>> {
        let opts = &self.opts;
        let size = opts.grid_size();
        let too_wide = toroid_interface::source::rows(&self.source.src)
            .any(|line| line.chars().count() > size.width.get());
        if self.source.line_count() > size.height.get() || too_wide {
            let msg = format!(
                "program does not fit in a {}x{} grid; cells outside of it are ignored",
                size.width, size.height
            );
            let help = "use `--width` and `--height` to resize the grid";
            self.dcx.emit(Diag::warning(msg).help(help));
        }

        let grid = Grid::new(&self.source.src, size);
        let tree = toroid_flow::build(&grid);
        if opts.run {
            let module = self.generate(&tree)?;
            return self.interpret(&module);
        }
        let text = match opts.emit {
            EmitKind::Tree => tree.to_string(),
            EmitKind::LlvmIr => toroid_codegen::emit_llvm(&self.generate(&tree)?),
            EmitKind::Mir => self.generate(&tree)?.to_string(),
            EmitKind::Dot => toroid_codegen::mir::module_to_dot(&self.generate(&tree)?),
        };
        Ok(text.into_bytes())
    }

    fn generate(&self, tree: &ControlTree) -> Result<Module> {
        toroid_codegen::generate(tree, &self.opts.codegen_opts()).map_err(|e| {
            let mut diag = Diag::error(e.to_string()).pos_label(e.pos(), e.label());
            if let CodegenError::DisallowedInstruction { .. } = e {
                diag = diag.note("the grid is fixed at compile time");
            }
            self.dcx.emit_err(diag)
        })
    }

    fn interpret(&self, module: &Module) -> Result<Vec<u8>> {
        let mut interp = Interpreter::new(module);
        if let Some(fuel) = self.opts.fuel {
            interp = interp.with_fuel(fuel);
        }
        match interp.run() {
            Ok(status) => {
                debug!(status, steps = interp.steps(), "program exited");
                Ok(interp.into_output())
            }
            Err(e) => {
                let mut diag = Diag::error(format!("program failed: {e}"));
                if let ExecError::OutOfFuel(_) = e {
                    diag = diag.help("raise the limit with `--fuel`");
                }
                let guar = self.dcx.emit_err(diag);
                // Keep what the program printed before failing.
                let _ = io::stdout().lock().write_all(interp.output());
                Err(guar)
            }
        }
    }

    fn finish_diagnostics(&self) -> Result {
        self.dcx.print_error_count()
    }
}

#[cfg(test)]
mod tests;
