//! The Translator dispatcher (§4.1) — the top-level AST-shape
//! discriminator. Everything else in this crate is a sub-translator this
//! module routes to.

use sigil_ast::target::{self, TargetNode};
use sigil_ast::{Literal, SourceNode};

use crate::env::Environment;
use crate::error::{TranslateError, TranslateResult};
use crate::kernel;
use crate::macro_expand::MacroExpander;
use crate::primitives::{lower_atom, lower_identifier, lower_list, lower_literal, lower_tuple};
use crate::registry::ModuleRegistry;

/// Reflective forms the design explicitly refuses to support (§1
/// Non-goals, §4.1 rule 6).
const UNSUPPORTED_REFLECTIVE_FORMS: &[&str] = &["super", "__CALLER__", "__ENV__"];

/// Holds the two things every sub-translator needs: the mutable Registry
/// and the macro-expansion collaborator. `sigil-core`'s design note
/// replaces the source system's ambient global Registry with this explicit,
/// passed-around value (§9 "Process-wide Registry").
pub struct Translator<'a> {
    pub registry: &'a mut ModuleRegistry,
    pub expander: &'a dyn MacroExpander,
    /// Mirrors `CompileOptions::warn_on_unresolved_identifier`; `false` by
    /// default so host-side tests that construct a `Translator` directly
    /// don't need to opt into the noise. `translate_file` wires this from
    /// the `CompilationContext` it was given.
    warn_on_unresolved_identifier: bool,
}

impl<'a> Translator<'a> {
    pub fn new(registry: &'a mut ModuleRegistry, expander: &'a dyn MacroExpander) -> Self {
        Self {
            registry,
            expander,
            warn_on_unresolved_identifier: false,
        }
    }

    pub fn with_warn_on_unresolved_identifier(mut self, warn: bool) -> Self {
        self.warn_on_unresolved_identifier = warn;
        self
    }

    /// `translate(ast, env) -> target-node` (§4.1 contract).
    pub fn translate(&mut self, node: &SourceNode, env: &Environment) -> TranslateResult<TargetNode> {
        match node {
            // Rule 1: primitive values.
            SourceNode::Literal(lit) => Ok(lower_literal(lit)),

            // Rule 2: bare atom.
            SourceNode::Atom(name) => Ok(lower_atom(name)),

            // Rule 3: ordered sequence.
            SourceNode::List(items) => {
                let elements = items.iter().map(|item| self.translate(item, env)).collect::<TranslateResult<_>>()?;
                Ok(lower_list(elements))
            }

            SourceNode::Cons { .. } => self.translate_cons(node, env),

            // Rule 4: two-arity tuple shape, and the general n-ary case.
            SourceNode::Tuple(items) => {
                let elements = items.iter().map(|item| self.translate(item, env)).collect::<TranslateResult<_>>()?;
                Ok(lower_tuple(elements))
            }

            SourceNode::Map(_) | SourceNode::MapUpdate { .. } => crate::expr::translate_map(self, node, env),
            SourceNode::Struct { .. } => crate::expr::translate_struct(self, node, env),
            SourceNode::Bitstring { .. } => crate::expr::translate_bitstring(self, node, env),

            SourceNode::Identifier { name, meta } => self.translate_identifier(name, meta, env),

            SourceNode::Form { tag, meta, children } => self.translate_form(tag, meta, children, node, env),
        }
    }

    fn translate_cons(&mut self, node: &SourceNode, env: &Environment) -> TranslateResult<TargetNode> {
        let SourceNode::Cons { head, tail } = node else {
            unreachable!()
        };
        // `[h | t]` in expression position concatenates; the target has no
        // native cons cell, so emit a prepend call into the runtime (§6
        // "list concatenation and prepend").
        let head = self.translate(head, env)?;
        let tail = self.translate(tail, env)?;
        Ok(target::call_expression(
            target::member_expression(target::identifier("Kernel"), target::identifier("list_prepend"), false),
            vec![head, tail],
        ))
    }

    fn translate_identifier(&mut self, name: &str, meta: &sigil_ast::Meta, env: &Environment) -> TranslateResult<TargetNode> {
        if UNSUPPORTED_REFLECTIVE_FORMS.contains(&name) {
            return Err(TranslateError::unsupported(name.to_string()).with_meta(meta));
        }
        // Rule 8: resolution miss is not an error (§7) — an unresolved bare
        // identifier is emitted as-is and the target runtime decides at
        // load time.
        Ok(lower_identifier(name))
    }

    fn translate_form(
        &mut self,
        tag: &str,
        meta: &sigil_ast::Meta,
        children: &[SourceNode],
        node: &SourceNode,
        env: &Environment,
    ) -> TranslateResult<TargetNode> {
        if UNSUPPORTED_REFLECTIVE_FORMS.contains(&tag) {
            return Err(TranslateError::unsupported(tag.to_string()).with_meta(meta));
        }

        match tag {
            "&" => crate::expr::translate_capture(self, children, env),
            "@" => crate::expr::translate_attribute(self, children, env),
            "%" => crate::expr::translate_struct(self, node, env),
            "%{}" => crate::expr::translate_map(self, node, env),
            "<<>>" => crate::expr::translate_bitstring(self, node, env),
            "~" => crate::expr::translate_sigil(self, children, env),

            "__aliases__" => self.translate_aliases(children, env),
            "__block__" => self.translate_block(children, env),
            "__DIR__" => Ok(target::member_expression(target::identifier("__dirname"), target::identifier(""), false)),

            "try" => crate::expr::translate_try(self, children, env),
            "receive" => crate::expr::translate_receive(self, children, env),
            "quote" => crate::expr::translate_quote(self, children, env),
            "import" => crate::module::translate_import(self, children, meta, env),
            "alias" => crate::module::translate_alias(self, children, meta, env),
            "require" => crate::module::translate_require(self, children, meta, env),
            "case" => crate::expr::translate_case(self, children, env),
            "cond" => crate::expr::translate_cond(self, children, env),
            "with" => crate::expr::translate_with(self, children, env),
            "for" => crate::expr::translate_for(self, children, env),
            "fn" => crate::expr::translate_fn(self, children, env),
            "{}" => {
                let elements = children.iter().map(|c| self.translate(c, env)).collect::<TranslateResult<_>>()?;
                Ok(lower_tuple(elements))
            }
            "=" => crate::expr::translate_assignment(self, children, env),
            "def" | "defp" => crate::function::translate_def(self, tag == "def", children, meta, env),
            "defstruct" => crate::protocol::translate_defstruct(self, children, env),
            "defexception" => crate::protocol::translate_defexception(self, children, env),
            "defmodule" => crate::module::translate_defmodule(self, children, meta, env),
            "defprotocol" => crate::protocol::translate_defprotocol(self, children, meta, env),
            "defimpl" => crate::protocol::translate_defimpl(self, children, meta, env),
            "|" => self.translate_cons(&SourceNode::Cons {
                head: Box::new(children.first().cloned().unwrap_or(SourceNode::Literal(Literal::Nil))),
                tail: Box::new(children.get(1).cloned().unwrap_or(SourceNode::Literal(Literal::Nil))),
            }, env),

            "." => self.translate_dotted_call(children, meta, env),

            _ => self.translate_generic_call(tag, meta, children, node, env),
        }
    }

    fn translate_block(&mut self, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
        // `__block__` groups a sequence of expressions; the last one is the
        // value (§4.4 "A function body's last expression is its return
        // value"). We represent it as a block statement here; callers that
        // place this in expression/clause-body position call
        // `as_expression_body` to turn the trailing expression into an
        // explicit `return`.
        let body = children.iter().map(|c| self.translate(c, env)).collect::<TranslateResult<_>>()?;
        Ok(target::block_statement(body))
    }

    fn translate_aliases(&mut self, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
        let dotted = crate::module::aliases_to_dotted_name(children)?;
        Ok(target::identifier(crate::module::resolve_module_identifier(&dotted, env)))
    }

    fn translate_dotted_call(&mut self, children: &[SourceNode], meta: &sigil_ast::Meta, env: &Environment) -> TranslateResult<TargetNode> {
        crate::expr::translate_dotted_call(self, children, meta, env)
    }

    /// Rule 7: generic call. Kernel builtins first, then one macro
    /// expansion attempt, then import-aware bare-name resolution.
    fn translate_generic_call(
        &mut self,
        name: &str,
        meta: &sigil_ast::Meta,
        children: &[SourceNode],
        node: &SourceNode,
        env: &Environment,
    ) -> TranslateResult<TargetNode> {
        let arity = children.len();
        if kernel::is_kernel_builtin(name, arity) {
            let args = children.iter().map(|c| self.translate(c, env)).collect::<TranslateResult<_>>()?;
            return Ok(kernel::lower_kernel_call(name, args));
        }

        match self.expander.expand_once(node, env)? {
            Some(expanded) if !is_fixed_point(node, &expanded) => self.translate(&expanded, env),
            _ => {
                let args = children.iter().map(|c| self.translate(c, env)).collect::<TranslateResult<_>>()?;
                let callee = if let Some(import) = env.resolve_import(name) {
                    target::member_expression(
                        target::identifier(crate::identifier::filter_identifier(&import.from_module.join("_"))),
                        target::identifier(crate::identifier::filter_identifier(name)),
                        false,
                    )
                } else {
                    // §7 "Resolution miss": not an error, the target runtime
                    // decides at load time. Optionally noisier (§6
                    // `CompileOptions::warn_on_unresolved_identifier`).
                    if self.warn_on_unresolved_identifier {
                        tracing::warn!(call = name, arity, "unresolved bare call emitted as a local identifier");
                    }
                    lower_identifier(name)
                };
                let _ = meta;
                Ok(target::call_expression(callee, args))
            }
        }
    }
}

/// §4.1's "compare the returned AST by structural equality; equality means
/// 'not a macro, translate literally.'"
pub fn is_fixed_point(original: &SourceNode, expanded: &SourceNode) -> bool {
    original == expanded
}

/// Converts a translated body into something usable as a clause/arrow
/// function's value: a plain expression passes through unchanged, and a
/// `block_statement` (from `translate_block`, i.e. a source `__block__`)
/// has its trailing expression rewritten into an explicit `return` so the
/// clause table's per-arm arrow function actually evaluates to that value
/// instead of `undefined` (§4.4 "a function body's last expression is its
/// return value"). A `__block__` in tail position is flattened into the
/// same return rather than nested, since the target has no block-as-value
/// expression form.
pub(crate) fn as_expression_body(node: TargetNode) -> TargetNode {
    match node {
        TargetNode::BlockStatement { body } => target::block_statement(terminate_with_return(body)),
        other => other,
    }
}

fn terminate_with_return(mut body: Vec<TargetNode>) -> Vec<TargetNode> {
    match body.pop() {
        Some(TargetNode::BlockStatement { body: inner }) => {
            body.extend(terminate_with_return(inner));
            body
        }
        Some(last @ TargetNode::ReturnStatement { .. }) => {
            body.push(last);
            body
        }
        Some(last) => {
            body.push(target::return_statement(Some(last)));
            body
        }
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macro_expand::NoopExpander;
    use sigil_ast::{Meta, Number};
    use std::path::PathBuf;

    fn translator(registry: &mut ModuleRegistry, expander: &NoopExpander) -> Translator<'_> {
        Translator::new(registry, expander)
    }

    #[test]
    fn integers_lower_to_number_literals() {
        let mut registry = ModuleRegistry::new(PathBuf::from("."), Environment::root());
        let expander = NoopExpander;
        let mut t = translator(&mut registry, &expander);
        let node = SourceNode::Literal(Literal::Number(Number::Int(34)));
        assert_eq!(t.translate(&node, &Environment::root()).unwrap(), target::number_literal(34.0));
    }

    #[test]
    fn reflective_forms_are_rejected() {
        let mut registry = ModuleRegistry::new(PathBuf::from("."), Environment::root());
        let expander = NoopExpander;
        let mut t = translator(&mut registry, &expander);
        let node = SourceNode::form("__CALLER__", Meta::default(), vec![]);
        let err = t.translate(&node, &Environment::root()).unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::Unsupported(_)));
    }

    #[test]
    fn unresolved_bare_call_is_emitted_as_a_local_call_not_an_error() {
        let mut registry = ModuleRegistry::new(PathBuf::from("."), Environment::root());
        let expander = NoopExpander;
        let mut t = translator(&mut registry, &expander);
        let node = SourceNode::form("mystery_fn", Meta::default(), vec![SourceNode::ident("x")]);
        let result = t.translate(&node, &Environment::root()).unwrap();
        assert!(matches!(result, TargetNode::CallExpression { .. }));
    }

    #[test]
    fn opting_into_unresolved_call_warnings_does_not_change_the_emitted_ast() {
        let mut registry = ModuleRegistry::new(PathBuf::from("."), Environment::root());
        let expander = NoopExpander;
        let node = SourceNode::form("mystery_fn", Meta::default(), vec![SourceNode::ident("x")]);

        let quiet = Translator::new(&mut registry, &expander).translate(&node, &Environment::root()).unwrap();
        let mut registry2 = ModuleRegistry::new(PathBuf::from("."), Environment::root());
        let noisy = Translator::new(&mut registry2, &expander)
            .with_warn_on_unresolved_identifier(true)
            .translate(&node, &Environment::root())
            .unwrap();
        assert_eq!(quiet, noisy);
    }

    #[test]
    fn kernel_arithmetic_routes_through_the_kernel_namespace() {
        let mut registry = ModuleRegistry::new(PathBuf::from("."), Environment::root());
        let expander = NoopExpander;
        let mut t = translator(&mut registry, &expander);
        let node = SourceNode::form(
            "+",
            Meta::default(),
            vec![
                SourceNode::Literal(Literal::Number(Number::Int(1))),
                SourceNode::Literal(Literal::Number(Number::Int(2))),
            ],
        );
        let result = t.translate(&node, &Environment::root()).unwrap();
        match result {
            TargetNode::CallExpression { callee, .. } => match *callee {
                TargetNode::MemberExpression { object, .. } => assert_eq!(*object, target::identifier("Kernel")),
                other => panic!("expected member expression, got {other:?}"),
            },
            other => panic!("expected call expression, got {other:?}"),
        }
    }
}
