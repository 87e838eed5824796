//! `defstruct`, `defexception`, `defprotocol`, `defimpl` (§4.6 "Structs and
//! protocols"). A struct becomes a `__struct__` factory closing over its
//! declared defaults; a protocol is a registry entry keyed by name with one
//! `impls` slot per `defimpl ... for:` encountered (§3 invariants).

use sigil_ast::target::{self, TargetNode};
use sigil_ast::{Meta, SourceNode};

use crate::dispatcher::Translator;
use crate::env::Environment;
use crate::error::{TranslateError, TranslateResult};
use crate::module::module_name_segments;

struct StructField {
    name: String,
    default: TargetNode,
}

fn lower_fields(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<Vec<StructField>> {
    let fields_node = children.first().ok_or_else(|| TranslateError::shape_mismatch("`defstruct` requires a field list"))?;
    let SourceNode::List(items) = fields_node else {
        return Err(TranslateError::shape_mismatch("`defstruct` field list must be a list"));
    };
    items
        .iter()
        .map(|item| match item {
            SourceNode::Atom(name) => Ok(StructField {
                name: name.clone(),
                default: target::null_literal(),
            }),
            SourceNode::Tuple(pair) => match &pair[..] {
                [SourceNode::Atom(name), default_node] => Ok(StructField {
                    name: name.clone(),
                    default: t.translate(default_node, env)?,
                }),
                _ => Err(TranslateError::shape_mismatch("`defstruct` field tuple must be `{name, default}`")),
            },
            other => Err(TranslateError::shape_mismatch(format!("`defstruct` field must be an atom or a `{{name, default}}` tuple, got {other:?}"))),
        })
        .collect()
}

/// `defstruct [field, other: default, ...]` — emits a `__struct__` factory
/// closing over the module's declared defaults (§4.6 "Auto-generated
/// factory").
pub fn translate_defstruct(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
    let fields = lower_fields(t, children, env)?;
    build_struct_factory(env.current_module_name(), fields, false)
}

/// `defexception [...]` — identical to `defstruct`, with an implicit
/// `__exception__: true` marker field so the runtime's `raise`/`rescue`
/// machinery can recognize instances without a separate type tag.
pub fn translate_defexception(t: &mut Translator, children: &[SourceNode], env: &Environment) -> TranslateResult<TargetNode> {
    let fields = lower_fields(t, children, env)?;
    build_struct_factory(env.current_module_name(), fields, true)
}

fn build_struct_factory(module_name: String, mut fields: Vec<StructField>, is_exception: bool) -> TranslateResult<TargetNode> {
    if is_exception && !fields.iter().any(|f| f.name == "message") {
        fields.push(StructField {
            name: "message".into(),
            default: target::string_literal(""),
        });
    }
    let mut defaults: Vec<(TargetNode, TargetNode)> = fields.into_iter().map(|f| (target::string_literal(f.name), f.default)).collect();
    if is_exception {
        defaults.push((target::string_literal("__exception__"), target::bool_literal(true)));
    }
    let factory = target::arrow_function(
        vec![target::identifier("overrides")],
        target::call_expression(
            target::member_expression(target::identifier("Kernel"), target::identifier("struct_new"), false),
            vec![target::string_literal(module_name), target::object_expression(defaults), target::identifier("overrides")],
        ),
    );
    Ok(target::variable_declaration(target::VariableKind::Const, "__struct__", Some(factory)))
}

/// `defprotocol Name do spec end` (§4.6). Registers the protocol's spec
/// body; implementations arrive later, independently, via `defimpl`.
pub fn translate_defprotocol(t: &mut Translator, children: &[SourceNode], meta: &Meta, env: &Environment) -> TranslateResult<TargetNode> {
    let [name_node, body_node] = children else {
        return Err(TranslateError::shape_mismatch("`defprotocol` takes a name and a body").with_meta(meta));
    };
    let segments = module_name_segments(name_node)?;
    let name = segments.join(".");
    let spec = t.translate(body_node, env)?;
    t.registry.add_protocol(name.clone(), Some(spec.clone()));
    Ok(target::variable_declaration(
        target::VariableKind::Const,
        crate::identifier::filter_identifier(&name.replace('.', "_")),
        Some(target::object_expression(vec![(target::string_literal("protocol"), target::string_literal(name)), (target::string_literal("spec"), spec)])),
    ))
}

/// `defimpl Protocol, for: Type do ... end` (§4.6). The body is a run of
/// function clauses, grouped exactly like a module's `def`s, collected into
/// one object keyed by function name.
pub fn translate_defimpl(t: &mut Translator, children: &[SourceNode], meta: &Meta, env: &Environment) -> TranslateResult<TargetNode> {
    let [protocol_node, for_node, body_node] = children else {
        return Err(TranslateError::shape_mismatch("`defimpl` takes a protocol, a `for:` type, and a body").with_meta(meta));
    };
    let protocol_name = module_name_segments(protocol_node)?.join(".");
    let type_key = module_name_segments(for_node)?.join(".");

    let body_items: Vec<SourceNode> = match body_node {
        SourceNode::Form { tag, children, .. } if tag == "__block__" => children.clone(),
        other => vec![other.clone()],
    };

    let mut properties = Vec::new();
    let mut index = 0;
    while index < body_items.len() {
        match &body_items[index] {
            SourceNode::Form { tag, .. } if tag == "def" || tag == "defp" => {
                let name = crate::function::peek_def_name(&body_items[index])?;
                let mut end = index + 1;
                while end < body_items.len() {
                    match &body_items[end] {
                        SourceNode::Form { tag: next_tag, .. } if next_tag == "def" || next_tag == "defp" => {
                            if crate::function::peek_def_name(&body_items[end])? != name {
                                break;
                            }
                            end += 1;
                        }
                        _ => break,
                    }
                }
                let run = &body_items[index..end];
                let (declared_name, table, _arities) = crate::function::translate_def_run(t, true, run, env)?;
                properties.push((target::string_literal(declared_name), table));
                index = end;
            }
            other => {
                let _ = t.translate(other, env)?;
                index += 1;
            }
        }
    }

    let impl_ast = target::object_expression(properties);
    t.registry.add_protocol_impl(protocol_name, type_key, impl_ast.clone());
    Ok(impl_ast)
}
