//! `def`/`defp` lowering (§4.4, SPEC_FULL.md "default arguments"). A named
//! function with K source clauses and default arguments becomes a single
//! clause table, exactly like `fn` (§4.2) — the only extra step is grouping
//! sibling `def` occurrences by name and expanding `\\` defaults into one
//! synthetic clause per omitted trailing argument.

use sigil_ast::target::{self, TargetNode};
use sigil_ast::{Meta, SourceNode};

use crate::dispatcher::Translator;
use crate::env::Environment;
use crate::error::{TranslateError, TranslateResult};
use crate::pattern::{self, Clause, PatternDescriptor};

struct Signature {
    name: String,
    params: Vec<SourceNode>,
    guard: Option<SourceNode>,
}

fn lower_signature(node: &SourceNode) -> TranslateResult<Signature> {
    let (call_node, guard) = match node {
        SourceNode::Form { tag, children, .. } if tag == "when" => {
            let [call, guard] = &children[..] else {
                return Err(TranslateError::shape_mismatch("`when` guard clause takes a call and a guard expression"));
            };
            (call, Some(guard.clone()))
        }
        other => (other, None),
    };
    let SourceNode::Form { tag, children, .. } = call_node else {
        return Err(TranslateError::shape_mismatch("function signature must be a call form"));
    };
    Ok(Signature {
        name: tag.clone(),
        params: children.clone(),
        guard,
    })
}

/// Splits `\\`-tagged (default-valued) trailing parameters from plain ones.
/// The source language requires defaults to trail the parameter list; a
/// default in a non-trailing position is a shape error here rather than
/// silently accepted.
fn split_defaults(params: &[SourceNode]) -> TranslateResult<(Vec<SourceNode>, Vec<(SourceNode, SourceNode)>)> {
    let mut plain = Vec::new();
    let mut defaulted = Vec::new();
    let mut seen_default = false;
    for param in params {
        match param {
            SourceNode::Form { tag, children, .. } if tag == "\\\\" => {
                let [pattern, default] = &children[..] else {
                    return Err(TranslateError::shape_mismatch("`\\\\` takes a pattern and a default expression"));
                };
                seen_default = true;
                defaulted.push((pattern.clone(), default.clone()));
            }
            other => {
                if seen_default {
                    return Err(TranslateError::shape_mismatch("default-valued parameters must trail all plain parameters"));
                }
                plain.push(other.clone());
            }
        }
    }
    Ok((plain, defaulted))
}

/// One raw `def`/`defp` occurrence, lowered to the clause(s) it contributes
/// (more than one when it declares default arguments).
fn clauses_for_one_def(t: &mut Translator, node: &SourceNode, env: &Environment, filtered_name: &str) -> TranslateResult<Vec<Clause>> {
    let SourceNode::Form { children, meta, .. } = node else {
        return Err(TranslateError::shape_mismatch("expected a `def`/`defp` form"));
    };
    let [signature_node, body_node] = &children[..] else {
        return Err(TranslateError::shape_mismatch("`def`/`defp` takes a signature and a body").with_meta(meta));
    };
    let signature = lower_signature(signature_node)?;
    let (plain, defaulted) = split_defaults(&signature.params)?;

    let body = t.translate(body_node, env)?;
    let guard = signature.guard.as_ref().map(|g| t.translate(g, env)).transpose()?;

    let mut clauses = Vec::new();

    if defaulted.is_empty() {
        let descriptors = signature.params.iter().map(pattern::lower_pattern).collect::<TranslateResult<Vec<_>>>()?;
        clauses.push(Clause::new(descriptors, guard, body));
        return Ok(clauses);
    }

    // The full-arity clause: every parameter's own pattern (default markers
    // already stripped to their inner pattern), guard and body as written.
    let mut full_patterns = plain.iter().map(pattern::lower_pattern).collect::<TranslateResult<Vec<_>>>()?;
    for (pattern_node, _default) in &defaulted {
        full_patterns.push(pattern::lower_pattern(pattern_node)?);
    }
    clauses.push(Clause::new(full_patterns, guard, body));

    // One synthetic clause per omitted trailing argument count, each
    // forwarding to the full-arity clause with that argument's default
    // expression translated in the defining (module) scope.
    for omit_from in 0..defaulted.len() {
        let mut patterns = plain.iter().map(pattern::lower_pattern).collect::<TranslateResult<Vec<_>>>()?;
        for (pattern_node, _) in defaulted.iter().take(omit_from) {
            patterns.push(pattern::lower_pattern(pattern_node)?);
        }
        let bound_names: Vec<TargetNode> = patterns
            .iter()
            .filter_map(|p| match p {
                PatternDescriptor::Bind(name) => Some(target::identifier(name.clone())),
                _ => None,
            })
            .collect();
        let mut forward_args = bound_names;
        for (_, default_expr) in defaulted.iter().skip(omit_from) {
            forward_args.push(t.translate(default_expr, env)?);
        }
        let forwarding_body = target::call_expression(target::identifier(filtered_name.to_string()), forward_args);
        clauses.push(Clause::new(patterns, None, forwarding_body));
    }

    Ok(clauses)
}

/// A single standalone `def`/`defp`, used when it appears outside a
/// `defmodule` body's sequential grouping pass (the fallback dispatcher
/// entry point) — it cannot see sibling clauses sharing its name, so it
/// always emits a one-clause (or default-expanded) table of its own.
pub fn translate_def(t: &mut Translator, is_public: bool, children: &[SourceNode], meta: &Meta, env: &Environment) -> TranslateResult<TargetNode> {
    let node = SourceNode::form(if is_public { "def" } else { "defp" }, meta.clone(), children.to_vec());
    let signature = lower_signature(children.first().ok_or_else(|| TranslateError::shape_mismatch("`def`/`defp` requires a signature").with_meta(meta))?)?;
    let filtered_name = crate::identifier::filter_identifier(&signature.name);
    let clauses = clauses_for_one_def(t, &node, env, &filtered_name)?;
    for clause in &clauses {
        t.registry.record_function(env.module_path(), signature.name.clone(), clause.patterns.len());
    }
    Ok(target::variable_declaration(
        target::VariableKind::Const,
        filtered_name,
        Some(pattern::defmatch(&clauses)),
    ))
}

/// Groups a contiguous run of `def`/`defp` forms sharing one name (the
/// common idiomatic layout — clauses for the same function written next to
/// each other) into one clause table declaration. Returns the declared
/// name and every arity it now handles, so the caller can update the
/// registry's export list and function/macro tables.
pub fn translate_def_run(
    t: &mut Translator,
    is_public: bool,
    run: &[SourceNode],
    env: &Environment,
) -> TranslateResult<(String, TargetNode, Vec<usize>)> {
    let first_signature = lower_signature(
        match run.first() {
            Some(SourceNode::Form { children, .. }) => children.first(),
            _ => None,
        }
        .ok_or_else(|| TranslateError::shape_mismatch("empty `def` run"))?,
    )?;
    let filtered_name = crate::identifier::filter_identifier(&first_signature.name);

    let mut all_clauses = Vec::new();
    for node in run {
        all_clauses.extend(clauses_for_one_def(t, node, env, &filtered_name)?);
    }
    let arities: Vec<usize> = all_clauses.iter().map(|c| c.patterns.len()).collect();
    let _ = is_public;
    Ok((filtered_name, pattern::defmatch(&all_clauses), arities))
}

/// Reads just the declared name of a `def`/`defp` node, without lowering
/// its body — used by the grouping pass in `module.rs` to decide whether
/// the next sibling continues the current run.
pub fn peek_def_name(node: &SourceNode) -> TranslateResult<String> {
    let SourceNode::Form { children, .. } = node else {
        return Err(TranslateError::shape_mismatch("expected a `def`/`defp` form"));
    };
    let signature_node = children.first().ok_or_else(|| TranslateError::shape_mismatch("`def`/`defp` requires a signature"))?;
    Ok(lower_signature(signature_node)?.name)
}
