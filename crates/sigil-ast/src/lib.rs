//! Source and target AST node types for the Sigil translator.
//!
//! This crate is data-only: it holds no translation logic. See
//! `sigil_core::dispatcher` for the tree rewriter that turns one into the
//! other.

pub mod source;
pub mod target;

pub use source::{BinarySegment, Literal, Meta, Number, SourceNode, Symbol};
pub use target::{TargetLiteral, TargetNode};
