//! Diagnostics implementation.

use crate::Pos;
use std::fmt;

mod context;
pub use context::DiagCtxt;

mod emitter;
pub use emitter::{DynEmitter, Emitter, HumanEmitter, InMemoryEmitter, SilentEmitter};

/// Useful type to use with [`Result`] indicate that an error has already been reported to the user,
/// so no need to continue checking.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    /// Creates a new `ErrorGuaranteed`.
    ///
    /// Use of this method is discouraged; errors should be emitted through a [`DiagCtxt`].
    #[doc(hidden)]
    #[inline]
    pub const fn new_unchecked() -> Self {
        Self(())
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an error has already been emitted")
    }
}

impl std::error::Error for ErrorGuaranteed {}

/// Diagnostic level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    /// An error in the program being compiled, which prevents compilation from finishing.
    Error,
    /// A warning about the program being compiled. Does not prevent compilation from finishing.
    Warning,
    /// A message giving additional context.
    Note,
    /// A message suggesting how to fix something.
    Help,
}

impl Level {
    /// Returns the string representation of the level.
    pub fn to_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
            Self::Help => "help",
        }
    }

    /// Returns whether this level is an error.
    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A message attached to a [`Diag`] without a position of its own.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubDiag {
    pub level: Level,
    pub msg: String,
}

/// A diagnostic, optionally pointing at one grid cell.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diag {
    pub(crate) level: Level,
    pub msg: String,
    /// The cell this diagnostic points at.
    pub pos: Option<Pos>,
    /// The label printed under the cell.
    pub label: Option<String>,
    pub children: Vec<SubDiag>,
}

impl Diag {
    /// Creates a new diagnostic.
    pub fn new(level: Level, msg: impl Into<String>) -> Self {
        Self { level, msg: msg.into(), pos: None, label: None, children: Vec::new() }
    }

    /// Creates a new error diagnostic.
    pub fn error(msg: impl Into<String>) -> Self {
        Self::new(Level::Error, msg)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(msg: impl Into<String>) -> Self {
        Self::new(Level::Warning, msg)
    }

    /// Returns the level of this diagnostic.
    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns `true` if this diagnostic is an error.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.level.is_error()
    }

    /// Points this diagnostic at `pos`.
    pub fn pos(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    /// Points this diagnostic at `pos`, with a label under the cell.
    pub fn pos_label(mut self, pos: Pos, label: impl Into<String>) -> Self {
        self.pos = Some(pos);
        self.label = Some(label.into());
        self
    }

    /// Adds a note.
    pub fn note(mut self, msg: impl Into<String>) -> Self {
        self.children.push(SubDiag { level: Level::Note, msg: msg.into() });
        self
    }

    /// Adds a help message.
    pub fn help(mut self, msg: impl Into<String>) -> Self {
        self.children.push(SubDiag { level: Level::Help, msg: msg.into() });
        self
    }
}
