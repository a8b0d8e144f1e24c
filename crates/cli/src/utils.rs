//! Utility functions used by the Toroid CLI.

use std::io;
use toroid_interface::{ColorChoice, DiagCtxt, diagnostics::Diag};

/// Where log output goes.
#[derive(Clone, Copy, Debug, Default)]
pub enum LogDestination {
    Stdout,
    #[default]
    Stderr,
}

#[cfg(feature = "tracing")]
impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogDestination {
    type Writer = Box<dyn io::Write>;

    fn make_writer(&'a self) -> Self::Writer {
        match self {
            Self::Stdout => Box::new(io::stdout().lock()),
            Self::Stderr => Box::new(io::stderr().lock()),
        }
    }
}

/// Initialize the tracing logger.
///
/// The filter is read from `RUST_LOG`.
pub fn init_logger(dst: LogDestination) {
    #[cfg(not(feature = "tracing"))]
    {
        let _ = dst;
        if std::env::var_os("RUST_LOG").is_some() {
            let msg = "`RUST_LOG` is set, but \"tracing\" support was not enabled at compile time";
            early_dcx().emit(Diag::warning(msg));
        }
    }

    #[cfg(feature = "tracing")]
    if let Err(e) = try_init_logger(dst) {
        early_dcx().emit(Diag::warning(format!("failed to initialize the logger: {e}")));
    }
}

#[cfg(feature = "tracing")]
fn try_init_logger(dst: LogDestination) -> Result<(), String> {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::Registry::default()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(dst))
        .try_init()
        .map_err(|e| e.to_string())
}

/// A diagnostics context for messages emitted before the command line is parsed.
fn early_dcx() -> DiagCtxt {
    DiagCtxt::with_stderr_emitter(None, ColorChoice::Auto)
}

/// Converts a `clap` color choice into the one used for diagnostics.
pub fn color_choice(color: clap::ColorChoice) -> ColorChoice {
    match color {
        clap::ColorChoice::Always => ColorChoice::Always,
        clap::ColorChoice::Auto => ColorChoice::Auto,
        clap::ColorChoice::Never => ColorChoice::Never,
    }
}
