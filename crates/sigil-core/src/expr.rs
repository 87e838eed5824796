//! Expression translators (§4.3) — one routine per AST shape that isn't
//! primitive, a function, a module, or a protocol.

use sigil_ast::target::{self, TargetNode};
use sigil_ast::{BinarySegment, Literal, Meta, Number, SourceNode};

use crate::dispatcher::Translator;
use crate::env::Environment;
use crate::error::{TranslateError, TranslateResult};
use crate::pattern::{self, Clause};

/// `%{...}` construction and `%{m | k: v, ...}` functional update (§4.3
/// "Map construction"). Update never aliases the input: it always emits a
/// runtime call that returns a new object.
pub fn translate_map(t: &mut Translator, node: &SourceNode, env: &Environment) -> TranslateResult<TargetNode> {
    match node {
        SourceNode::Map(pairs) => {
            let properties = translate_pairs(t, pairs, env)?;
            Ok(target::object_expression(properties))
        }
        SourceNode::MapUpdate { base: None, pairs } => {
            let properties = translate_pairs(t, pairs, env)?;
            Ok(target::object_expression(properties))
        }
        SourceNode::MapUpdate { base: Some(base), pairs } => {
            let base = t.translate(base, env)?;
            let updates = target::object_expression(translate_pairs(t, pairs, env)?);
            Ok(target::call_expression(
                target::member_expression(target::identifier("Kernel"), target::identifier("map_update"), false),
                vec![base, updates],
            ))
        }
        _ => Err(TranslateError::shape_mismatch("expected a map node")),
    }
}

fn translate_pairs(t: &mut Translator, pairs: &[(SourceNode, SourceNode)], env: &Environment) -> TranslateResult<Vec<(TargetNode, TargetNode)>> {
    pairs
        .iter()
        .map(|(k, v)| Ok((t.translate(k, env)?, t.translate(v, env)?)))
        .collect()
}

/// `%Mod{fields}` — dispatches to `Mod`'s auto-generated `defstruct`
/// factory (§4.3 "Struct").
pub fn translate_struct(t: &mut Translator, node: &SourceNode, env: &Environment) -> TranslateResult<TargetNode> {
    let SourceNode::Struct { module, fields, .. } = node else {
        return Err(TranslateError::shape_mismatch("expected a struct node"));
    };
    let properties = translate_pairs(t, fields, env)?;
    // A struct's module name is itself subject to `alias` resolution —
    // `%Elephant{}` inside `Animals` resolves against the auto-alias
    // `translate_defmodule` registers for its nested modules (§4.5), and
    // is referenced by that alias's own local binding, matching whatever
    // import declaration brought it into scope.
    let module_ident = crate::module::resolve_module_identifier(module, env);
    Ok(target::call_expression(
        target::member_expression(target::identifier(module_ident), target::identifier("__struct__"), false),
        vec![target::object_expression(properties)],
    ))
}

/// `<<>>` (§4.3 "Bitstring"): an all-binary-literal segment list is an
/// interpolated string (concatenation); otherwise a bitstring constructor
/// call carrying segment metadata.
pub fn translate_bitstring(t: &mut Translator, node: &SourceNode, env: &Environment) -> TranslateResult<TargetNode> {
    let SourceNode::Bitstring { segments, .. } = node else {
        return Err(TranslateError::shape_mismatch("expected a bitstring node"));
    };
    if segments.iter().all(is_string_segment) {
        let parts = segments
            .iter()
            .map(|s| t.translate(&s.value, env))
            .collect::<TranslateResult<Vec<_>>>()?;
        return Ok(target::call_expression(
            target::member_expression(target::identifier("Kernel"), target::identifier("string_concat"), false),
            parts,
        ));
    }

    let segment_nodes = segments
        .iter()
        .map(|s| translate_binary_segment(t, s, env))
        .collect::<TranslateResult<Vec<_>>>()?;
    Ok(target::call_expression(
        target::member_expression(target::identifier("SpecialForms"), target::identifier("bitstring"), false),
        vec![target::array_expression(segment_nodes)],
    ))
}

fn is_string_segment(segment: &BinarySegment) -> bool {
    matches!(segment.value, SourceNode::Literal(Literal::Str(_)) | SourceNode::Identifier { .. })
        && segment.segment_type.as_deref().map_or(true, |t| t == "binary")
}

fn translate_binary_segment(t: &mut Translator, segment: &BinarySegment, env: &Environment) -> TranslateResult<TargetNode> {
    let value = t.translate(&segment.value, env)?;
    let size = match &segment.size {
        Some(size_node) => Some(t.translate(size_node, env)?),
        None => None,
    };
    Ok(target::object_expression(vec![
        (target::string_literal("value"), value),
        (target::string_literal("size"), size.unwrap_or_else(target::null_literal)),
        (target::string_literal("unit"), segment.unit.map_or_else(target::null_literal, |u| target::number_literal(u as f64))),
        (target::string_literal("signed"), target::bool_literal(segment.signed)),
        (target::string_literal("bigEndian"), target::bool_literal(segment.big_endian)),
        (
            target::string_literal("type"),
            segment.segment_type.clone().map_or_else(target::null_literal, target::string_literal),
        ),
    ]))
}

/// `left = right` (§4.3 "Assignment"): lower `right` first, then treat
/// `left` as a pattern binding the result.
pub fn translate_assignment(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
    let [left, right] = children else {
        return Err(TranslateError::shape_mismatch("`=` takes exactly two children"));
    };
    let right_node = t.translate(right, env)?;
    let pattern = pattern::lower_pattern(left)?;
    // A plain `Bind` is the common case and becomes an ordinary `let`/
    // reassignment; anything more structured goes through the runtime match
    // helper which both binds and returns the matched value, since `=` in
    // the source language evaluates to the right-hand value either way.
    match pattern {
        crate::pattern::PatternDescriptor::Bind(name) => Ok(target::assignment_expression(target::identifier(name), right_node)),
        other => Ok(target::call_expression(
            target::member_expression(target::identifier("Patterns"), target::identifier("bind_or_raise"), false),
            vec![pattern::pattern_to_target(&other), right_node],
        )),
    }
}

/// `case scrutinee do pattern -> body; ... end` (§4.1 rule 5, §4.2).
pub fn translate_case(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
    let (scrutinee, arms) = children
        .split_first()
        .ok_or_else(|| TranslateError::shape_mismatch("`case` requires a scrutinee and at least one clause"))?;
    let scrutinee_node = t.translate(scrutinee, env)?;
    let clauses = translate_arms(t, arms, env)?;
    Ok(pattern::make_case(scrutinee_node, &clauses))
}

/// `cond do guard1 -> body1; ... end` — no scrutinee, each arm's "pattern"
/// is really just `true` gated by the guard.
pub fn translate_cond(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
    let mut clauses = Vec::new();
    for arm in children {
        let SourceNode::Form { children: arm_children, .. } = arm else {
            return Err(TranslateError::shape_mismatch("`cond` arm must be a (guard, body) form"));
        };
        let [guard, body] = &arm_children[..] else {
            return Err(TranslateError::shape_mismatch("`cond` arm takes exactly a guard and a body"));
        };
        let guard_node = t.translate(guard, env)?;
        let body_node = t.translate(body, env)?;
        clauses.push(Clause::new(vec![crate::pattern::PatternDescriptor::Wildcard], Some(guard_node), body_node));
    }
    Ok(pattern::make_case(target::bool_literal(true), &clauses))
}

/// `with pattern <- expr, ... do body else fallback end` (SPEC_FULL.md
/// supplement). Lowered as a chain of matches against each generator,
/// falling through to `else` on the first failure — the same machinery as
/// `case`, threaded.
pub fn translate_with(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
    let (do_body, rest) = children
        .split_last()
        .ok_or_else(|| TranslateError::shape_mismatch("`with` requires a body"))?;
    let do_node = t.translate(do_body, env)?;

    let mut generators = Vec::new();
    for generator in rest {
        let SourceNode::Form { tag, children: gc, .. } = generator else {
            return Err(TranslateError::shape_mismatch("`with` generator must be a `<-` form"));
        };
        if tag != "<-" {
            return Err(TranslateError::shape_mismatch("`with` generator must use `<-`"));
        }
        let [pattern_node, expr_node] = &gc[..] else {
            return Err(TranslateError::shape_mismatch("`<-` takes a pattern and an expression"));
        };
        let pattern = pattern::lower_pattern(pattern_node)?;
        let expr = t.translate(expr_node, env)?;
        generators.push((pattern, expr));
    }

    // Thread the chain from the innermost continuation (the `do` body)
    // outward: each generator, from last to first, wraps the continuation
    // built so far as its success arm, falling through to `__with_failure__`
    // on a match miss. The result is a single nested `make_case` whose
    // outermost match is against the *first* generator's expression.
    let fallback = Clause::new(vec![crate::pattern::PatternDescriptor::Wildcard], None, target::identifier("__with_failure__"));
    let mut continuation = do_node;
    for (pattern, expr) in generators.into_iter().rev() {
        continuation = pattern::make_case(expr, &[Clause::new(vec![pattern], None, continuation), fallback.clone()]);
    }
    Ok(continuation)
}

/// `for generator(s), filter(s) do expr end` (§4.3): a fold over the
/// generator product, with filters as intermediate predicates.
pub fn translate_for(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
    let (body, clauses) = children
        .split_last()
        .ok_or_else(|| TranslateError::shape_mismatch("`for` requires a body"))?;

    let mut generators = Vec::new();
    let mut filters = Vec::new();
    for clause in clauses {
        match clause {
            SourceNode::Form { tag, children: gc, .. } if tag == "<-" => {
                let [pattern_node, iter_node] = &gc[..] else {
                    return Err(TranslateError::shape_mismatch("`<-` takes a pattern and an iterable"));
                };
                let pattern = pattern::lower_pattern(pattern_node)?;
                let iter = t.translate(iter_node, env)?;
                generators.push((pattern, iter));
            }
            other => filters.push(t.translate(other, env)?),
        }
    }

    let body_node = t.translate(body, env)?;
    let filter_array = target::array_expression(filters);
    let mut comprehension = target::object_expression(vec![
        (target::string_literal("body"), target::arrow_function(vec![], crate::dispatcher::as_expression_body(body_node))),
        (target::string_literal("filters"), filter_array),
    ]);
    for (pattern, iter) in generators.into_iter().rev() {
        comprehension = target::object_expression(vec![
            (target::string_literal("pattern"), pattern::pattern_to_target(&pattern)),
            (target::string_literal("iter"), iter),
            (target::string_literal("inner"), comprehension),
        ]);
    }
    Ok(target::call_expression(
        target::member_expression(target::identifier("Kernel"), target::identifier("for_comprehension"), false),
        vec![comprehension],
    ))
}

/// `fn pattern -> body; ... end` — an anonymous function, itself a clause
/// table (§4.2).
pub fn translate_fn(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
    let clauses = translate_arms(t, children, env)?;
    Ok(pattern::defmatch(&clauses))
}

fn translate_arms(t: &mut Translator, arms: &[SourceNode], env: &Environment) -> TranslateResult<Vec<Clause>> {
    arms.iter()
        .map(|arm| translate_single_arm(t, arm, env))
        .collect()
}

/// One `pattern [when guard] -> body` arm, or `pattern1, pattern2 -> body`
/// for multi-parameter `fn`.
fn translate_single_arm(t: &mut Translator, arm: &SourceNode, env: &Environment) -> TranslateResult<Clause> {
    let SourceNode::Form { tag, children, .. } = arm else {
        return Err(TranslateError::shape_mismatch("a clause arm must be an `->` form"));
    };
    if tag != "->" {
        return Err(TranslateError::shape_mismatch("a clause arm must use `->`"));
    }
    let (body, pattern_nodes) = children
        .split_last()
        .ok_or_else(|| TranslateError::shape_mismatch("`->` requires a body"))?;

    let (patterns, guard) = split_guard(pattern_nodes)?;
    let pattern_descriptors = patterns.iter().map(pattern::lower_pattern).collect::<TranslateResult<Vec<_>>>()?;
    let guard_node = match guard {
        Some(g) => Some(t.translate(g, env)?),
        None => None,
    };
    let body_node = t.translate(body, env)?;
    Ok(Clause::new(pattern_descriptors, guard_node, body_node))
}

fn split_guard(nodes: &[SourceNode]) -> TranslateResult<(&[SourceNode], Option<&SourceNode>)> {
    if let [SourceNode::Form { tag, children, .. }] = nodes {
        if tag == "when" {
            let (guard, patterns) = children
                .split_last()
                .ok_or_else(|| TranslateError::shape_mismatch("`when` requires a guard expression"))?;
            return Ok((patterns, Some(guard)));
        }
    }
    Ok((nodes, None))
}

/// `try do ... rescue ... catch ... after ... else ... end` (§4.3): each
/// section becomes its own handler thunk.
pub fn translate_try(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
    let mut sections = Vec::new();
    for child in children {
        let SourceNode::Form { tag, children: body, .. } = child else {
            return Err(TranslateError::shape_mismatch("`try` sections must be tagged forms"));
        };
        let handler = match tag.as_str() {
            "do" => {
                let translated = body.iter().map(|c| t.translate(c, env)).collect::<TranslateResult<_>>()?;
                target::arrow_function(vec![], crate::dispatcher::as_expression_body(target::block_statement(translated)))
            }
            "rescue" | "catch" | "else" => pattern::defmatch(&translate_arms(t, body, env)?),
            "after" => {
                let translated = body.iter().map(|c| t.translate(c, env)).collect::<TranslateResult<_>>()?;
                target::arrow_function(vec![], crate::dispatcher::as_expression_body(target::block_statement(translated)))
            }
            other => return Err(TranslateError::shape_mismatch(format!("unknown `try` section `{other}`"))),
        };
        sections.push((target::string_literal(tag.clone()), handler));
    }
    Ok(target::call_expression(
        target::member_expression(target::identifier("Kernel"), target::identifier("try_"), false),
        vec![target::object_expression(sections)],
    ))
}

/// `receive do pattern -> body; ... after timeout -> body end` (§4.3):
/// compiles to a call to the runtime's mailbox waiter.
pub fn translate_receive(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
    let mut arms = Vec::new();
    let mut timeout = None;
    for child in children {
        match child {
            SourceNode::Form { tag, children: body, .. } if tag == "after" => {
                let [duration, handler] = &body[..] else {
                    return Err(TranslateError::shape_mismatch("`after` takes a duration and a handler"));
                };
                let duration_node = t.translate(duration, env)?;
                let handler_node = t.translate(handler, env)?;
                timeout = Some(target::object_expression(vec![
                    (target::string_literal("duration"), duration_node),
                    (target::string_literal("handler"), target::arrow_function(vec![], crate::dispatcher::as_expression_body(handler_node))),
                ]));
            }
            other => arms.push(translate_single_arm(t, other, env)?),
        }
    }
    let table = pattern::defmatch(&arms);
    Ok(target::call_expression(
        target::member_expression(target::identifier("Kernel"), target::identifier("receive_"), false),
        vec![table, timeout.unwrap_or_else(target::null_literal)],
    ))
}

/// `quote do ... end` — reifies children as data; `unquote` escapes back
/// into ordinary translation (§4.3).
pub fn translate_quote(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
    let quoted_env = env.entering_quote();
    let body = children
        .iter()
        .map(|c| quote_node(t, c, &quoted_env))
        .collect::<TranslateResult<Vec<_>>>()?;
    match body.len() {
        1 => Ok(body.into_iter().next().unwrap()),
        _ => Ok(target::array_expression(body)),
    }
}

fn quote_node(t: &mut Translator, node: &SourceNode, env: &Environment) -> TranslateResult<TargetNode> {
    if let SourceNode::Form { tag, children, .. } = node {
        if tag == "unquote" {
            let [inner] = &children[..] else {
                return Err(TranslateError::shape_mismatch("`unquote` takes exactly one expression"));
            };
            // Escapes back into ordinary translation, outside the quote.
            return t.translate(inner, &env.leaving_quote());
        }
    }
    Ok(reify(node))
}

/// Turns a source node into the data structure that reconstructs it at
/// runtime — the quoting half of quote/unquote.
fn reify(node: &SourceNode) -> TargetNode {
    match node {
        SourceNode::Literal(lit) => crate::primitives::lower_literal(lit),
        SourceNode::Atom(name) => crate::primitives::lower_atom(name),
        SourceNode::Identifier { name, .. } => target::object_expression(vec![
            (target::string_literal("tag"), target::string_literal("var")),
            (target::string_literal("name"), target::string_literal(name.clone())),
        ]),
        SourceNode::List(items) => target::array_expression(items.iter().map(reify).collect()),
        SourceNode::Cons { head, tail } => target::object_expression(vec![
            (target::string_literal("tag"), target::string_literal("cons")),
            (target::string_literal("head"), reify(head)),
            (target::string_literal("tail"), reify(tail)),
        ]),
        SourceNode::Tuple(items) => target::object_expression(vec![
            (target::string_literal("tag"), target::string_literal("tuple")),
            (target::string_literal("elements"), target::array_expression(items.iter().map(reify).collect())),
        ]),
        SourceNode::Map(pairs) | SourceNode::MapUpdate { pairs, .. } => target::object_expression(vec![
            (target::string_literal("tag"), target::string_literal("map")),
            (
                target::string_literal("pairs"),
                target::array_expression(pairs.iter().map(|(k, v)| target::array_expression(vec![reify(k), reify(v)])).collect()),
            ),
        ]),
        SourceNode::Struct { module, fields, .. } => target::object_expression(vec![
            (target::string_literal("tag"), target::string_literal("struct")),
            (target::string_literal("module"), target::string_literal(module.clone())),
            (
                target::string_literal("fields"),
                target::array_expression(fields.iter().map(|(k, v)| target::array_expression(vec![reify(k), reify(v)])).collect()),
            ),
        ]),
        SourceNode::Bitstring { segments, .. } => target::object_expression(vec![
            (target::string_literal("tag"), target::string_literal("bitstring")),
            (
                target::string_literal("segments"),
                target::array_expression(segments.iter().map(|s| reify(&s.value)).collect()),
            ),
        ]),
        SourceNode::Form { tag, children, .. } => target::object_expression(vec![
            (target::string_literal("tag"), target::string_literal(tag.clone())),
            (target::string_literal("children"), target::array_expression(children.iter().map(reify).collect())),
        ]),
    }
}

/// `&f/n`, `&Mod.f/n`, `&expr` (§4.3 "Capture").
pub fn translate_capture(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
    let [inner] = children else {
        return Err(TranslateError::shape_mismatch("`&` takes exactly one operand"));
    };
    if let SourceNode::Form { tag, children: slash_children, .. } = inner {
        if tag == "/" {
            let [target_expr, arity_node] = &slash_children[..] else {
                return Err(TranslateError::shape_mismatch("`&f/n` takes a name and an arity"));
            };
            let SourceNode::Literal(Literal::Number(Number::Int(arity))) = arity_node else {
                return Err(TranslateError::shape_mismatch("capture arity must be an integer literal"));
            };
            let arity = *arity as usize;
            let params: Vec<TargetNode> = (1..=arity).map(|i| target::identifier(format!("__{i}"))).collect();
            let callee = t.translate(target_expr, env)?;
            let call = target::call_expression(callee, params.clone());
            return Ok(target::arrow_function(params, call));
        }
    }
    // `&expr` with `&1`, `&2`, ... placeholders: find the highest
    // placeholder index and wrap as an anonymous function of that arity.
    let max_placeholder = highest_placeholder(inner);
    let params: Vec<TargetNode> = (1..=max_placeholder).map(|i| target::identifier(format!("__{i}"))).collect();
    let body = substitute_placeholders(t, inner, env)?;
    Ok(target::arrow_function(params, crate::dispatcher::as_expression_body(body)))
}

fn highest_placeholder(node: &SourceNode) -> usize {
    match node {
        SourceNode::Form { tag, children, .. } if tag == "&placeholder" => {
            if let [SourceNode::Literal(Literal::Number(Number::Int(n)))] = &children[..] {
                return *n as usize;
            }
            0
        }
        SourceNode::Form { children, .. } => children.iter().map(highest_placeholder).max().unwrap_or(0),
        SourceNode::List(items) | SourceNode::Tuple(items) => items.iter().map(highest_placeholder).max().unwrap_or(0),
        _ => 0,
    }
}

fn substitute_placeholders(t: &mut Translator, node: &SourceNode, env: &Environment) -> TranslateResult<TargetNode> {
    if let SourceNode::Form { tag, children, .. } = node {
        if tag == "&placeholder" {
            if let [SourceNode::Literal(Literal::Number(Number::Int(n)))] = &children[..] {
                return Ok(target::identifier(format!("__{n}")));
            }
        }
    }
    t.translate(node, env)
}

/// `@attr value` / bare `@attr` (§4.1 rule 5). Module attributes do not
/// affect emitted functions; `@doc`/`@moduledoc` become a leading comment
/// on the following declaration (SPEC_FULL.md supplement), everything else
/// is dropped.
pub fn translate_attribute(_t: &mut Translator, children: &[SourceNode], _env: &Environment) -> TranslateResult<TargetNode> {
    match children {
        [SourceNode::Identifier { name, .. }] => Ok(target::identifier(crate::identifier::filter_identifier(name))),
        [SourceNode::Identifier { name, .. }, SourceNode::Literal(Literal::Str(doc))] if name == "doc" || name == "moduledoc" => {
            Ok(target::comment(doc.clone(), target::null_literal()))
        }
        _ => Ok(target::null_literal()),
    }
}

/// `~r//`, `~s//`, `~sigil_name//` (SPEC_FULL.md supplement).
pub fn translate_sigil(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
    let [SourceNode::Identifier { name, .. }, content, modifiers @ ..] = children else {
        return Err(TranslateError::shape_mismatch("sigil requires a name and content"));
    };
    let content_node = t.translate(content, env)?;
    let modifier_str: String = modifiers
        .iter()
        .filter_map(|m| match m {
            SourceNode::Identifier { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect();
    Ok(target::call_expression(
        target::member_expression(target::identifier("SpecialForms"), target::identifier("sigil"), false),
        vec![target::string_literal(name.clone()), content_node, target::string_literal(modifier_str)],
    ))
}

/// Dotted calls (§4.1 rule 5): `(. meta [module, function, args...])`.
/// Known-module calls (`Logger`, `Access`, `Kernel`, `JS`) are routed
/// straight through; everything else is requalified through the current
/// module's aliases/imports where possible.
pub fn translate_dotted_call(t: &mut Translator, children: &[SourceNode], meta: &Meta, env: &Environment) -> TranslateResult<TargetNode> {
    let [module_node, function_node, args @ ..] = children else {
        return Err(TranslateError::shape_mismatch("`.` call requires a module, a function name, and zero or more arguments").with_meta(meta));
    };
    let function_name = match function_node {
        SourceNode::Atom(name) | SourceNode::Identifier { name, .. } => name.clone(),
        _ => return Err(TranslateError::shape_mismatch("dotted call function position must be a name")),
    };
    let arg_nodes = args.iter().map(|a| t.translate(a, env)).collect::<TranslateResult<Vec<_>>>()?;

    let written_module = match module_node {
        SourceNode::Form { tag, children: alias_children, .. } if tag == "__aliases__" => Some(crate::module::aliases_to_dotted_name(alias_children)?),
        SourceNode::Identifier { name, .. } => Some(name.clone()),
        _ => None,
    };

    let callee = match written_module {
        Some(written) => {
            let resolved = env.resolve_alias(&written).map(str::to_string).unwrap_or_else(|| written.clone());
            if crate::kernel::is_known_runtime_module(&resolved) {
                target::member_expression(target::identifier(resolved), target::identifier(crate::identifier::filter_identifier(&function_name)), false)
            } else {
                target::member_expression(
                    target::identifier(crate::module::resolve_module_identifier(&written, env)),
                    target::identifier(crate::identifier::filter_identifier(&function_name)),
                    false,
                )
            }
        }
        None => {
            let object = t.translate(module_node, env)?;
            target::member_expression(object, target::identifier(crate::identifier::filter_identifier(&function_name)), false)
        }
    };
    Ok(target::call_expression(callee, arg_nodes))
}
