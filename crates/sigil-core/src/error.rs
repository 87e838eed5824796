//! Structured errors for the translator (§7).
//!
//! Shaped after `depyler-core::error`: a `thiserror`-derived `ErrorKind` for
//! the fixed set of things that can go wrong, wrapped in a context-carrying
//! `TranslateError` that keeps `(file, line)` when the triggering AST node
//! had `Meta` attached.

use std::fmt;
use thiserror::Error;

use sigil_ast::Meta;

/// Source location information for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

impl SourceLocation {
    pub fn from_meta(meta: &Meta) -> Option<Self> {
        Some(Self {
            file: meta.file.clone()?,
            line: meta.line.unwrap_or(0),
            column: meta.column.unwrap_or(0),
        })
    }
}

/// The fixed set of ways translation can fail (§7).
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A reflective or intentionally-rejected construct (`super`,
    /// `__CALLER__`, `__ENV__`) was encountered.
    #[error("unsupported form: {0}")]
    Unsupported(String),

    /// The AST did not match any known tag at a given position.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Two modules with identical segment lists from distinct sources.
    #[error("module `{name}` declared more than once (first at {first}, again at {second})")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// Propagated verbatim from the macro-expansion collaborator.
    #[error("macro expansion failed: {0}")]
    MacroExpansionFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// A context-aware translation error.
#[derive(Debug, Error)]
pub struct TranslateError {
    pub kind: ErrorKind,
    pub location: Option<SourceLocation>,
    pub context: Vec<String>,
}

impl TranslateError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            location: None,
            context: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_meta(self, meta: &Meta) -> Self {
        match SourceLocation::from_meta(meta) {
            Some(loc) => self.with_location(loc),
            None => self,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsupported(what.into()))
    }

    pub fn shape_mismatch(what: impl Into<String>) -> Self {
        Self::new(ErrorKind::ShapeMismatch(what.into()))
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(loc) = &self.location {
            write!(f, " at {loc}")?;
        }
        if !self.context.is_empty() {
            write!(f, "\n\nContext:")?;
            for (i, ctx) in self.context.iter().enumerate() {
                write!(f, "\n  {}. {}", i + 1, ctx)?;
            }
        }
        Ok(())
    }
}

pub type TranslateResult<T> = Result<T, TranslateError>;

pub trait ResultExt<T> {
    fn with_context(self, ctx: impl Into<String>) -> TranslateResult<T>;
}

impl<T> ResultExt<T> for TranslateResult<T> {
    fn with_context(self, ctx: impl Into<String>) -> TranslateResult<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}

impl From<anyhow::Error> for TranslateError {
    fn from(err: anyhow::Error) -> Self {
        TranslateError::new(ErrorKind::Internal(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_error_carries_kind() {
        let err = TranslateError::unsupported("__CALLER__");
        assert!(matches!(err.kind, ErrorKind::Unsupported(_)));
        assert!(err.location.is_none());
    }

    #[test]
    fn location_from_meta_requires_file() {
        let meta = Meta {
            file: None,
            line: Some(3),
            column: Some(1),
        };
        assert!(SourceLocation::from_meta(&meta).is_none());
    }

    #[test]
    fn display_includes_location_and_context() {
        let meta = Meta::at("foo.ex", 10, 5);
        let err = TranslateError::shape_mismatch("malformed defmodule")
            .with_meta(&meta)
            .with_context("while translating module Foo");
        let rendered = format!("{err}");
        assert!(rendered.contains("foo.ex:10:5"));
        assert!(rendered.contains("while translating module Foo"));
    }

    #[test]
    fn name_collision_reports_both_sources() {
        let err = TranslateError::new(ErrorKind::NameCollision {
            name: "Foo.Bar".into(),
            first: "a.ex".into(),
            second: "b.ex".into(),
        });
        let rendered = format!("{err}");
        assert!(rendered.contains("a.ex"));
        assert!(rendered.contains("b.ex"));
    }
}
