//! Pattern-matcher lowering (§4.2) — the algorithmic heart of the
//! translator. The source language dispatches function and `case` clauses
//! by matching values against patterns with optional guards; the target
//! language has none of that, so every clause becomes a
//! `(descriptor, guard, body)` triple that a small runtime matcher
//! consults in order at call time.

use indexmap::{IndexMap, IndexSet};
use sigil_ast::target::{self, TargetNode};
use sigil_ast::{BinarySegment, Literal, SourceNode};

use crate::error::{TranslateError, TranslateResult};
use crate::primitives::lower_atom;

/// One leaf or composite of a lowered pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternDescriptor {
    /// `_` — matches anything, binds nothing.
    Wildcard,
    /// A bare variable name — matches anything, binds the value.
    Bind(String),
    /// A literal or atom — matches by structural equality.
    Literal(MatchLiteral),
    /// Matches if the value has a given runtime shape, without further
    /// destructuring (used for the bare `is_list`-style pin positions that
    /// fall out of otherwise-unhandled pattern shapes).
    TypeGuard(TypeShape),
    /// A composite pattern over list/tuple/map/struct/bitstring.
    Nested(NestedPattern),
    /// `^pinned` — matches only if the value equals the *current* binding
    /// of `pinned` (an already-bound variable used as a pattern).
    Pinned(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchLiteral {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Nil,
    Atom(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    List,
    Tuple,
    Map,
    Bitstring,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NestedPattern {
    List {
        elements: Vec<PatternDescriptor>,
        /// `[h | t]` list-cons tail, if present.
        tail: Option<Box<PatternDescriptor>>,
    },
    Tuple(Vec<PatternDescriptor>),
    /// Map patterns match a subset of keys; unlisted keys are ignored.
    Map(Vec<(MatchLiteral, PatternDescriptor)>),
    Struct {
        module: String,
        fields: Vec<(String, PatternDescriptor)>,
    },
    Bitstring(Vec<BitstringPatternSegment>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BitstringPatternSegment {
    pub pattern: PatternDescriptor,
    pub size: Option<u32>,
    pub unit: Option<u32>,
    pub signed: bool,
    pub big_endian: bool,
}

/// Lowers a source pattern (an ordinary `SourceNode` used in pattern
/// position) into a [`PatternDescriptor`].
pub fn lower_pattern(node: &SourceNode) -> TranslateResult<PatternDescriptor> {
    match node {
        SourceNode::Identifier { name, .. } if name == "_" => Ok(PatternDescriptor::Wildcard),
        SourceNode::Identifier { name, .. } => Ok(PatternDescriptor::Bind(name.clone())),
        SourceNode::Literal(Literal::Number(sigil_ast::Number::Int(n))) => {
            Ok(PatternDescriptor::Literal(MatchLiteral::Int(*n)))
        }
        SourceNode::Literal(Literal::Number(sigil_ast::Number::Float(f))) => {
            Ok(PatternDescriptor::Literal(MatchLiteral::Float(*f)))
        }
        SourceNode::Literal(Literal::Str(s)) => Ok(PatternDescriptor::Literal(MatchLiteral::Str(s.clone()))),
        SourceNode::Literal(Literal::Bool(b)) => Ok(PatternDescriptor::Literal(MatchLiteral::Bool(*b))),
        SourceNode::Literal(Literal::Nil) => Ok(PatternDescriptor::Literal(MatchLiteral::Nil)),
        SourceNode::Atom(name) => Ok(PatternDescriptor::Literal(MatchLiteral::Atom(name.clone()))),
        SourceNode::List(items) => Ok(PatternDescriptor::Nested(NestedPattern::List {
            elements: items.iter().map(lower_pattern).collect::<TranslateResult<_>>()?,
            tail: None,
        })),
        SourceNode::Cons { head, tail } => {
            let head_pattern = lower_pattern(head)?;
            let (mut elements, rest_tail) = match lower_pattern(tail)? {
                PatternDescriptor::Nested(NestedPattern::List { elements, tail }) => (elements, tail),
                other => (Vec::new(), Some(Box::new(other))),
            };
            elements.insert(0, head_pattern);
            Ok(PatternDescriptor::Nested(NestedPattern::List {
                elements,
                tail: rest_tail,
            }))
        }
        SourceNode::Tuple(items) => Ok(PatternDescriptor::Nested(NestedPattern::Tuple(
            items.iter().map(lower_pattern).collect::<TranslateResult<_>>()?,
        ))),
        SourceNode::Map(pairs) | SourceNode::MapUpdate { pairs, base: None } => {
            let mut fields = Vec::new();
            for (k, v) in pairs {
                let key = lower_match_key(k)?;
                fields.push((key, lower_pattern(v)?));
            }
            Ok(PatternDescriptor::Nested(NestedPattern::Map(fields)))
        }
        SourceNode::Struct { module, fields, .. } => {
            let mut lowered = Vec::new();
            for (k, v) in fields {
                let name = match lower_match_key(k)? {
                    MatchLiteral::Atom(name) => name,
                    other => return Err(TranslateError::shape_mismatch(format!("struct field key must be an atom, got {other:?}"))),
                };
                lowered.push((name, lower_pattern(v)?));
            }
            Ok(PatternDescriptor::Nested(NestedPattern::Struct {
                module: module.clone(),
                fields: lowered,
            }))
        }
        SourceNode::Bitstring { segments, .. } => Ok(PatternDescriptor::Nested(NestedPattern::Bitstring(
            segments.iter().map(lower_bitstring_segment).collect::<TranslateResult<_>>()?,
        ))),
        SourceNode::Form { tag, children, .. } if tag == "^" => match children.first() {
            Some(SourceNode::Identifier { name, .. }) => Ok(PatternDescriptor::Pinned(name.clone())),
            _ => Err(TranslateError::shape_mismatch("`^` pin requires a bare variable")),
        },
        other => Err(TranslateError::shape_mismatch(format!(
            "not a valid pattern: {other:?}"
        ))),
    }
}

fn lower_match_key(node: &SourceNode) -> TranslateResult<MatchLiteral> {
    match lower_pattern(node)? {
        PatternDescriptor::Literal(lit) => Ok(lit),
        other => Err(TranslateError::shape_mismatch(format!(
            "map/struct keys must be literal, got {other:?}"
        ))),
    }
}

fn lower_bitstring_segment(segment: &BinarySegment) -> TranslateResult<BitstringPatternSegment> {
    Ok(BitstringPatternSegment {
        pattern: lower_pattern(&segment.value)?,
        size: match segment.size.as_deref() {
            Some(SourceNode::Literal(Literal::Number(sigil_ast::Number::Int(n)))) => Some(*n as u32),
            _ => None,
        },
        unit: segment.unit,
        signed: segment.signed,
        big_endian: segment.big_endian,
    })
}

/// A tiny value domain used only to exercise pattern matching host-side
/// (§8 "Round-trip / idempotence": "Lowering a pattern and immediately
/// matching the original value against the lowered descriptor yields
/// success with the expected bindings"). This is not part of the emitted
/// program — the runtime clause table the target code calls is built from
/// [`PatternDescriptor`] by the emitter, not interpreted by this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Nil,
    Atom(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Struct { module: String, fields: Vec<(String, Value)> },
}

pub type Bindings = IndexMap<String, Value>;

/// Structural match of `pattern` against `value`, returning the bindings on
/// success. Guard evaluation is not performed here: a guard is lowered to
/// target-language code by `expr.rs` and is meaningless to evaluate without
/// a target-language interpreter, so the clause table's guard slot is only
/// consulted by the emitted program itself.
pub fn match_value(pattern: &PatternDescriptor, value: &Value, bindings: &mut Bindings) -> bool {
    match pattern {
        PatternDescriptor::Wildcard => true,
        PatternDescriptor::Bind(name) => {
            bindings.insert(name.clone(), value.clone());
            true
        }
        PatternDescriptor::Pinned(name) => bindings.get(name) == Some(value),
        PatternDescriptor::Literal(lit) => literal_matches(lit, value),
        PatternDescriptor::TypeGuard(shape) => shape_matches(*shape, value),
        PatternDescriptor::Nested(nested) => match_nested(nested, value, bindings),
    }
}

fn literal_matches(lit: &MatchLiteral, value: &Value) -> bool {
    match (lit, value) {
        (MatchLiteral::Int(a), Value::Int(b)) => a == b,
        (MatchLiteral::Float(a), Value::Float(b)) => a == b,
        (MatchLiteral::Str(a), Value::Str(b)) => a == b,
        (MatchLiteral::Bool(a), Value::Bool(b)) => a == b,
        (MatchLiteral::Nil, Value::Nil) => true,
        (MatchLiteral::Atom(a), Value::Atom(b)) => a == b,
        _ => false,
    }
}

fn shape_matches(shape: TypeShape, value: &Value) -> bool {
    matches!(
        (shape, value),
        (TypeShape::List, Value::List(_))
            | (TypeShape::Tuple, Value::Tuple(_))
            | (TypeShape::Map, Value::Map(_))
            | (TypeShape::Bitstring, Value::Str(_))
    )
}

fn match_nested(nested: &NestedPattern, value: &Value, bindings: &mut Bindings) -> bool {
    match (nested, value) {
        (NestedPattern::List { elements, tail }, Value::List(items)) => {
            if items.len() < elements.len() {
                return false;
            }
            if tail.is_none() && items.len() != elements.len() {
                return false;
            }
            for (p, v) in elements.iter().zip(items.iter()) {
                if !match_value(p, v, bindings) {
                    return false;
                }
            }
            if let Some(tail_pattern) = tail {
                let rest = Value::List(items[elements.len()..].to_vec());
                match_value(tail_pattern, &rest, bindings)
            } else {
                true
            }
        }
        (NestedPattern::Tuple(patterns), Value::Tuple(items)) => {
            if patterns.len() != items.len() {
                return false;
            }
            patterns.iter().zip(items.iter()).all(|(p, v)| match_value(p, v, bindings))
        }
        (NestedPattern::Map(fields), Value::Map(pairs)) => fields.iter().all(|(key, pattern)| {
            pairs
                .iter()
                .find(|(k, _)| literal_matches(key, k))
                .is_some_and(|(_, v)| match_value(pattern, v, bindings))
        }),
        (NestedPattern::Struct { module, fields }, Value::Struct { module: vmod, fields: vfields }) => {
            module == vmod
                && fields.iter().all(|(name, pattern)| {
                    vfields
                        .iter()
                        .find(|(n, _)| n == name)
                        .is_some_and(|(_, v)| match_value(pattern, v, bindings))
                })
        }
        _ => false,
    }
}

/// One row of a clause table: the pattern(s) a call/`case`/`with` arm must
/// match, its optional guard, and its body — all emitted as data the
/// runtime's `Patterns.defmatch`/`Patterns.make_case` consult (§4.2, §6
/// "pattern-match clause table constructor").
#[derive(Debug, Clone)]
pub struct Clause {
    /// One descriptor per positional pattern: one entry for a `case`/`with`
    /// arm, one per parameter for a function clause.
    pub patterns: Vec<PatternDescriptor>,
    /// Bound names, in first-occurrence order across `patterns` — this is
    /// the parameter list `guard`/`body` are emitted as arrow functions
    /// over, so the runtime can invoke them positionally once it has
    /// extracted the bindings.
    pub bind_names: Vec<String>,
    /// Already-translated guard expression, `None` when the clause has no
    /// `when`.
    pub guard: Option<TargetNode>,
    /// Already-translated body expression.
    pub body: TargetNode,
}

impl Clause {
    pub fn new(patterns: Vec<PatternDescriptor>, guard: Option<TargetNode>, body: TargetNode) -> Self {
        let mut bind_names = IndexSet::new();
        for pattern in &patterns {
            collect_bind_names(pattern, &mut bind_names);
        }
        Self {
            patterns,
            bind_names: bind_names.into_iter().collect(),
            guard,
            body,
        }
    }
}

fn collect_bind_names(pattern: &PatternDescriptor, out: &mut IndexSet<String>) {
    match pattern {
        PatternDescriptor::Bind(name) => {
            out.insert(name.clone());
        }
        PatternDescriptor::Wildcard | PatternDescriptor::Pinned(_) | PatternDescriptor::Literal(_) | PatternDescriptor::TypeGuard(_) => {}
        PatternDescriptor::Nested(nested) => match nested {
            NestedPattern::List { elements, tail } => {
                for p in elements {
                    collect_bind_names(p, out);
                }
                if let Some(tail) = tail {
                    collect_bind_names(tail, out);
                }
            }
            NestedPattern::Tuple(elements) => {
                for p in elements {
                    collect_bind_names(p, out);
                }
            }
            NestedPattern::Map(fields) => {
                for (_, p) in fields {
                    collect_bind_names(p, out);
                }
            }
            NestedPattern::Struct { fields, .. } => {
                for (_, p) in fields {
                    collect_bind_names(p, out);
                }
            }
            NestedPattern::Bitstring(segments) => {
                for segment in segments {
                    collect_bind_names(&segment.pattern, out);
                }
            }
        },
    }
}

fn match_literal_to_target(lit: &MatchLiteral) -> TargetNode {
    match lit {
        MatchLiteral::Int(n) => target::number_literal(*n as f64),
        MatchLiteral::Float(f) => target::number_literal(*f),
        MatchLiteral::Str(s) => target::string_literal(s.clone()),
        MatchLiteral::Bool(b) => target::bool_literal(*b),
        MatchLiteral::Nil => target::null_literal(),
        MatchLiteral::Atom(name) => lower_atom(name),
    }
}

fn type_shape_name(shape: TypeShape) -> &'static str {
    match shape {
        TypeShape::List => "list",
        TypeShape::Tuple => "tuple",
        TypeShape::Map => "map",
        TypeShape::Bitstring => "bitstring",
    }
}

fn tagged(tag: &str, fields: Vec<(&str, TargetNode)>) -> TargetNode {
    let mut properties = vec![(target::string_literal("tag"), target::string_literal(tag))];
    properties.extend(fields.into_iter().map(|(k, v)| (target::string_literal(k), v)));
    target::object_expression(properties)
}

/// Reifies a [`PatternDescriptor`] as target-AST data, for embedding inside
/// an emitted clause table entry.
pub fn pattern_to_target(pattern: &PatternDescriptor) -> TargetNode {
    match pattern {
        PatternDescriptor::Wildcard => tagged("wildcard", vec![]),
        PatternDescriptor::Bind(name) => tagged("bind", vec![("name", target::string_literal(name.clone()))]),
        PatternDescriptor::Pinned(name) => tagged("pinned", vec![("name", target::string_literal(name.clone()))]),
        PatternDescriptor::Literal(lit) => tagged("literal", vec![("value", match_literal_to_target(lit))]),
        PatternDescriptor::TypeGuard(shape) => tagged("type", vec![("shape", target::string_literal(type_shape_name(*shape)))]),
        PatternDescriptor::Nested(nested) => nested_to_target(nested),
    }
}

fn nested_to_target(nested: &NestedPattern) -> TargetNode {
    match nested {
        NestedPattern::List { elements, tail } => tagged(
            "list",
            vec![
                ("elements", target::array_expression(elements.iter().map(pattern_to_target).collect())),
                ("tail", tail.as_ref().map_or_else(target::null_literal, |t| pattern_to_target(t))),
            ],
        ),
        NestedPattern::Tuple(elements) => tagged(
            "tuple",
            vec![("elements", target::array_expression(elements.iter().map(pattern_to_target).collect()))],
        ),
        NestedPattern::Map(fields) => tagged(
            "map",
            vec![(
                "fields",
                target::array_expression(
                    fields
                        .iter()
                        .map(|(k, v)| target::array_expression(vec![match_literal_to_target(k), pattern_to_target(v)]))
                        .collect(),
                ),
            )],
        ),
        NestedPattern::Struct { module, fields } => tagged(
            "struct",
            vec![
                ("module", target::string_literal(module.clone())),
                (
                    "fields",
                    target::array_expression(
                        fields
                            .iter()
                            .map(|(name, p)| target::array_expression(vec![target::string_literal(name.clone()), pattern_to_target(p)]))
                            .collect(),
                    ),
                ),
            ],
        ),
        NestedPattern::Bitstring(segments) => tagged(
            "bitstring",
            vec![(
                "segments",
                target::array_expression(
                    segments
                        .iter()
                        .map(|s| {
                            target::object_expression(vec![
                                (target::string_literal("pattern"), pattern_to_target(&s.pattern)),
                                (
                                    target::string_literal("size"),
                                    s.size.map_or_else(target::null_literal, |n| target::number_literal(n as f64)),
                                ),
                                (target::string_literal("signed"), target::bool_literal(s.signed)),
                                (target::string_literal("bigEndian"), target::bool_literal(s.big_endian)),
                            ])
                        })
                        .collect(),
                ),
            )],
        ),
    }
}

fn clause_to_target(clause: &Clause) -> TargetNode {
    let params: Vec<TargetNode> = clause.bind_names.iter().map(|name| target::identifier(name.clone())).collect();
    target::object_expression(vec![
        (
            target::string_literal("patterns"),
            target::array_expression(clause.patterns.iter().map(pattern_to_target).collect()),
        ),
        (
            target::string_literal("guard"),
            clause
                .guard
                .clone()
                .map_or_else(target::null_literal, |g| target::arrow_function(params.clone(), g)),
        ),
        (
            target::string_literal("body"),
            target::arrow_function(params, crate::dispatcher::as_expression_body(clause.body.clone())),
        ),
    ])
}

/// Emits a function-position clause table (§4.2: "A function of arity N
/// with K clauses emits a clause table `defmatch([clause₁, …, clauseₖ])`").
pub fn defmatch(clauses: &[Clause]) -> TargetNode {
    target::call_expression(
        target::member_expression(target::identifier("Patterns"), target::identifier("defmatch"), false),
        vec![target::array_expression(clauses.iter().map(clause_to_target).collect())],
    )
}

/// Emits an expression-position clause table keyed on `scrutinee` (§4.2:
/// "A `case` emits an expression-position equivalent").
pub fn make_case(scrutinee: TargetNode, clauses: &[Clause]) -> TargetNode {
    target::call_expression(
        target::member_expression(target::identifier("Patterns"), target::identifier("make_case"), false),
        vec![scrutinee, target::array_expression(clauses.iter().map(clause_to_target).collect())],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_ast::{Meta, Number};

    fn num(n: i64) -> SourceNode {
        SourceNode::Literal(Literal::Number(Number::Int(n)))
    }

    #[test]
    fn literal_zero_pattern_lowers_and_matches() {
        let pattern = lower_pattern(&num(0)).unwrap();
        assert_eq!(pattern, PatternDescriptor::Literal(MatchLiteral::Int(0)));
        let mut bindings = Bindings::new();
        assert!(match_value(&pattern, &Value::Int(0), &mut bindings));
        assert!(!match_value(&pattern, &Value::Int(1), &mut bindings));
    }

    #[test]
    fn bind_pattern_binds_the_matched_value() {
        let pattern = lower_pattern(&SourceNode::ident("n")).unwrap();
        let mut bindings = Bindings::new();
        assert!(match_value(&pattern, &Value::Int(42), &mut bindings));
        assert_eq!(bindings.get("n"), Some(&Value::Int(42)));
    }

    #[test]
    fn wildcard_matches_anything_and_binds_nothing() {
        let pattern = lower_pattern(&SourceNode::ident("_")).unwrap();
        let mut bindings = Bindings::new();
        assert!(match_value(&pattern, &Value::Atom("anything".into()), &mut bindings));
        assert!(bindings.is_empty());
    }

    #[test]
    fn list_cons_pattern_splits_head_and_tail() {
        let node = SourceNode::Cons {
            head: Box::new(SourceNode::ident("h")),
            tail: Box::new(SourceNode::ident("t")),
        };
        let pattern = lower_pattern(&node).unwrap();
        let mut bindings = Bindings::new();
        let value = Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(match_value(&pattern, &value, &mut bindings));
        assert_eq!(bindings.get("h"), Some(&Value::Int(1)));
        assert_eq!(bindings.get("t"), Some(&Value::List(vec![Value::Int(2), Value::Int(3)])));
    }

    #[test]
    fn tuple_pattern_requires_matching_arity() {
        let node = SourceNode::Tuple(vec![SourceNode::ident("a"), SourceNode::ident("b")]);
        let pattern = lower_pattern(&node).unwrap();
        let mut bindings = Bindings::new();
        assert!(!match_value(&pattern, &Value::Tuple(vec![Value::Int(1)]), &mut bindings));
        assert!(match_value(
            &pattern,
            &Value::Tuple(vec![Value::Int(1), Value::Int(2)]),
            &mut bindings
        ));
    }

    #[test]
    fn struct_pattern_matches_module_and_named_fields() {
        let node = SourceNode::Struct {
            module: "Elephant".into(),
            fields: vec![(SourceNode::Atom("trunk".into()), SourceNode::ident("t"))],
            meta: Meta::default(),
        };
        let pattern = lower_pattern(&node).unwrap();
        let value = Value::Struct {
            module: "Elephant".into(),
            fields: vec![("trunk".into(), Value::Bool(true))],
        };
        let mut bindings = Bindings::new();
        assert!(match_value(&pattern, &value, &mut bindings));
        assert_eq!(bindings.get("t"), Some(&Value::Bool(true)));
    }

    #[test]
    fn clause_collects_bind_names_in_first_occurrence_order() {
        let pattern = lower_pattern(&SourceNode::Tuple(vec![SourceNode::ident("a"), SourceNode::ident("b")])).unwrap();
        let clause = Clause::new(vec![pattern], None, target::null_literal());
        assert_eq!(clause.bind_names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn defmatch_emits_one_entry_per_clause() {
        let zero = Clause::new(vec![PatternDescriptor::Literal(MatchLiteral::Int(0))], None, target::string_literal("zero"));
        let n = Clause::new(vec![PatternDescriptor::Bind("n".into())], None, target::string_literal("nonzero"));
        let node = defmatch(&[zero, n]);
        match node {
            TargetNode::CallExpression { arguments, .. } => match &arguments[0] {
                TargetNode::ArrayExpression { elements } => assert_eq!(elements.len(), 2),
                other => panic!("expected array expression, got {other:?}"),
            },
            other => panic!("expected call expression, got {other:?}"),
        }
    }

    #[test]
    fn pinned_variable_matches_only_the_prior_binding() {
        let pattern = PatternDescriptor::Pinned("x".into());
        let mut bindings = Bindings::new();
        bindings.insert("x".into(), Value::Int(5));
        assert!(match_value(&pattern, &Value::Int(5), &mut bindings));
        assert!(!match_value(&pattern, &Value::Int(6), &mut bindings));
    }
}
