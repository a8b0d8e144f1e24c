use super::{Diag, DynEmitter, ErrorGuaranteed, HumanEmitter, Level, SilentEmitter};
use crate::SourceFile;
use anstream::ColorChoice;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A handler deals with errors and other compiler output.
pub struct DiagCtxt {
    inner: Mutex<DiagCtxtInner>,
}

struct DiagCtxtInner {
    emitter: Box<DynEmitter>,

    /// The number of errors that have been emitted.
    err_count: usize,
    /// The number of warnings that have been emitted.
    warn_count: usize,
}

impl DiagCtxt {
    /// Creates a new `DiagCtxt` with the given diagnostics emitter.
    pub fn new(emitter: Box<DynEmitter>) -> Self {
        Self { inner: Mutex::new(DiagCtxtInner { emitter, err_count: 0, warn_count: 0 }) }
    }

    /// Creates a new `DiagCtxt` with a human emitter writing to stderr.
    pub fn with_stderr_emitter(source: Option<Arc<SourceFile>>, color: ColorChoice) -> Self {
        Self::new(Box::new(HumanEmitter::stderr(color).source(source)))
    }

    /// Creates a new `DiagCtxt` with a silent emitter.
    pub fn with_silent_emitter() -> Self {
        Self::new(Box::new(SilentEmitter))
    }

    /// Replaces the emitter, keeping the counts.
    pub fn set_emitter(&self, emitter: Box<DynEmitter>) {
        self.lock().emitter = emitter;
    }

    /// Emits the given diagnostic.
    ///
    /// Returns `Some` if the diagnostic was an error.
    pub fn emit(&self, diag: Diag) -> Option<ErrorGuaranteed> {
        let mut inner = self.lock();
        inner.emitter.emit_diagnostic(&diag);
        match diag.level {
            Level::Error => {
                inner.err_count += 1;
                Some(ErrorGuaranteed::new_unchecked())
            }
            Level::Warning => {
                inner.warn_count += 1;
                None
            }
            Level::Note | Level::Help => None,
        }
    }

    /// Emits the given error diagnostic.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `diag` is not an error.
    #[track_caller]
    pub fn emit_err(&self, diag: Diag) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "`emit_err` called with a {} diagnostic", diag.level);
        self.emit(diag).unwrap_or_else(ErrorGuaranteed::new_unchecked)
    }

    /// Creates and emits an error with the given message.
    pub fn err(&self, msg: impl Into<String>) -> ErrorGuaranteed {
        self.emit_err(Diag::error(msg))
    }

    /// Returns the number of errors that have been emitted.
    #[inline]
    pub fn err_count(&self) -> usize {
        self.lock().err_count
    }

    /// Returns the number of warnings that have been emitted.
    #[inline]
    pub fn warn_count(&self) -> usize {
        self.lock().warn_count
    }

    /// Returns `Err` if any errors have been emitted.
    pub fn has_errors(&self) -> Result<(), ErrorGuaranteed> {
        if self.err_count() > 0 { Err(ErrorGuaranteed::new_unchecked()) } else { Ok(()) }
    }

    /// Emits a summary of the emitted errors and warnings, if any.
    ///
    /// Returns `Err` if any errors have been emitted.
    pub fn print_error_count(&self) -> Result<(), ErrorGuaranteed> {
        let mut inner = self.lock();
        let DiagCtxtInner { err_count, warn_count, .. } = *inner;
        if warn_count > 0 {
            let msg = format!("{warn_count} warning{} emitted", pluralize!(warn_count));
            inner.emitter.emit_diagnostic(&Diag::warning(msg));
        }
        if err_count == 0 {
            return Ok(());
        }
        let msg = format!("aborting due to {err_count} previous error{}", pluralize!(err_count));
        inner.emitter.emit_diagnostic(&Diag::error(msg));
        Err(ErrorGuaranteed::new_unchecked())
    }

    fn lock(&self) -> MutexGuard<'_, DiagCtxtInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
