//! The source AST consumed by the translator (§3 of the design).
//!
//! The source language is homoiconic: every construct more complex than a
//! literal or identifier is a shallow tagged triple `(tag, meta, children)`.
//! We keep that shape instead of inventing a variant per source-level
//! construct, because the dispatcher (`sigil_core::dispatcher`) is exactly
//! the thing that gives those tags meaning — baking the meaning into the
//! type would duplicate the dispatch table in two places.

use serde::{Deserialize, Serialize};

pub type Symbol = String;

/// Node-level source metadata. Optional because not every caller threads a
/// parser through; synthetic nodes (expansion output, `with_source_mut` test
/// helpers) commonly carry none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl Meta {
    pub fn at(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
            column: Some(column),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Number(Number),
    Str(String),
    Bool(bool),
    Nil,
}

/// A single binary/bitstring segment inside `<<>>`, e.g. `x::size(8)-unsigned`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinarySegment {
    pub value: SourceNode,
    pub size: Option<Box<SourceNode>>,
    pub unit: Option<u32>,
    pub signed: bool,
    pub big_endian: bool,
    pub segment_type: Option<Symbol>,
}

/// A polymorphic source tree node.
///
/// `Form` is the escape hatch: anything with a recognizable `tag` that isn't
/// one of the structural shapes above is routed through it, and the
/// dispatcher (§4.1) decides what the tag means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceNode {
    Literal(Literal),
    /// A bare atom/symbol, e.g. `:ok`.
    Atom(Symbol),
    Identifier {
        name: Symbol,
        meta: Meta,
    },
    List(Vec<SourceNode>),
    /// `{a, b}` style tuples, arbitrary arity (binary tuples are the common
    /// two-arity case called out separately in dispatch rule 4).
    Tuple(Vec<SourceNode>),
    Map(Vec<(SourceNode, SourceNode)>),
    /// `%{existing | k: v, ...}` functional map update; `base` is `None` for
    /// plain `%{...}` construction.
    MapUpdate {
        base: Option<Box<SourceNode>>,
        pairs: Vec<(SourceNode, SourceNode)>,
    },
    Struct {
        module: Symbol,
        fields: Vec<(SourceNode, SourceNode)>,
        meta: Meta,
    },
    Bitstring {
        segments: Vec<BinarySegment>,
        meta: Meta,
    },
    /// List-cons `[head | tail]`.
    Cons {
        head: Box<SourceNode>,
        tail: Box<SourceNode>,
    },
    /// A generic tagged form: `(tag, meta, children)`. Covers `def`, `case`,
    /// `fn`, `alias`, `import`, `defmodule`, `defprotocol`, `defimpl`, `|>`,
    /// `::`, `&`, `@`, binary operators, the dotted-call notation
    /// `(., meta, [mod, fun])`, and everything else.
    Form {
        tag: Symbol,
        meta: Meta,
        children: Vec<SourceNode>,
    },
}

impl SourceNode {
    pub fn form(tag: impl Into<String>, meta: Meta, children: Vec<SourceNode>) -> Self {
        SourceNode::Form {
            tag: tag.into(),
            meta,
            children,
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        SourceNode::Identifier {
            name: name.into(),
            meta: Meta::default(),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            SourceNode::Form { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn meta(&self) -> Option<&Meta> {
        match self {
            SourceNode::Form { meta, .. }
            | SourceNode::Identifier { meta, .. }
            | SourceNode::Struct { meta, .. }
            | SourceNode::Bitstring { meta, .. } => Some(meta),
            _ => None,
        }
    }
}
