//! Common data datastructures.
//!
//! Typed arena indices and the hash map flavors used throughout the compiler.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod index;
pub mod map;

pub use smallvec;
