//! The macro-expansion collaborator (§1 "assumed available as a black-box
//! primitive `expand(ast, env) -> ast` with a fixed point", design note
//! "Treat expansion as an injected pure function the core consults").
//!
//! The core never implements macro semantics itself; it only knows how to
//! drive a [`MacroExpander`] to a fixed point (`dispatcher::dispatch`'s rule
//! 7) and how to react to its result.

use sigil_ast::SourceNode;

use crate::env::Environment;
use crate::error::TranslateError;

/// One expansion attempt. `Ok(None)` means "not a macro, or already at a
/// fixed point" — the caller should translate `node` literally. `Ok(Some)`
/// means expansion produced a (possibly identical) AST; the dispatcher
/// recurses on it only when it differs from the input by structural
/// equality (`dispatcher::is_fixed_point`).
pub trait MacroExpander {
    fn expand_once(&self, node: &SourceNode, env: &Environment) -> Result<Option<SourceNode>, TranslateError>;
}

/// A collaborator that never expands anything — every call is treated as an
/// ordinary function call. Used where no macro table is available (e.g. a
/// single-file translation with no `defmacro`s in scope) and as the default
/// in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExpander;

impl MacroExpander for NoopExpander {
    fn expand_once(&self, _node: &SourceNode, _env: &Environment) -> Result<Option<SourceNode>, TranslateError> {
        Ok(None)
    }
}

/// Wraps a plain function as a [`MacroExpander`], for host-side tests that
/// want to stub a specific expansion without defining a type.
pub struct FnExpander<F>(pub F)
where
    F: Fn(&SourceNode, &Environment) -> Result<Option<SourceNode>, TranslateError>;

impl<F> MacroExpander for FnExpander<F>
where
    F: Fn(&SourceNode, &Environment) -> Result<Option<SourceNode>, TranslateError>,
{
    fn expand_once(&self, node: &SourceNode, env: &Environment) -> Result<Option<SourceNode>, TranslateError> {
        (self.0)(node, env)
    }
}
