//! Grid positions, source files, and diagnostics shared by every stage of the compiler.

#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate tracing;

/// Pluralize a word based on a count.
#[macro_export]
#[rustfmt::skip]
macro_rules! pluralize {
    ($x:expr) => {
        if $x == 1 { "" } else { "s" }
    };
    ("was", $x:expr) => {
        if $x == 1 { "was" } else { "were" }
    };
    ("this", $x:expr) => {
        if $x == 1 { "this" } else { "these" }
    };
}

pub mod diagnostics;
pub use diagnostics::{DiagCtxt, ErrorGuaranteed};

mod pos;
pub use pos::Pos;

pub mod source;
pub use source::{FileName, ReadError, SourceFile};

pub use anstream::ColorChoice;

/// Compiler result type.
pub type Result<T = (), E = ErrorGuaranteed> = std::result::Result<T, E>;
