//! The fixed table of Kernel builtins (§4.1 rule 7: "if `name` is a Kernel
//! builtin of the given arity, dispatch to Kernel lowering") and the small
//! set of known-module dotted calls that bypass alias/import resolution
//! entirely (§4.1 rule 5: `Logger`, `Access`, `Kernel`, `JS`).

use sigil_ast::target::{self, TargetNode};

/// `(name, arity)` pairs recognized as Kernel builtins regardless of import
/// state — they are always in scope, the way the source language's Kernel
/// module is auto-imported everywhere.
pub const KERNEL_BUILTINS: &[(&str, usize)] = &[
    ("+", 2),
    ("-", 2),
    ("*", 2),
    ("/", 2),
    ("==", 2),
    ("!=", 2),
    ("<", 2),
    (">", 2),
    ("<=", 2),
    (">=", 2),
    ("and", 2),
    ("or", 2),
    ("not", 1),
    ("-", 1),
    ("length", 1),
    ("hd", 1),
    ("tl", 1),
    ("elem", 2),
    ("put_elem", 3),
    ("is_list", 1),
    ("is_tuple", 1),
    ("is_map", 1),
    ("is_atom", 1),
    ("is_binary", 1),
    ("is_number", 1),
    ("is_integer", 1),
    ("is_float", 1),
    ("is_boolean", 1),
    ("is_nil", 1),
    ("inspect", 1),
    ("to_string", 1),
];

/// Module names whose dotted calls are routed straight through to the
/// matching runtime namespace instead of being resolved against the current
/// module's aliases/imports.
pub const KNOWN_RUNTIME_MODULES: &[&str] = &["Logger", "Access", "Kernel", "JS"];

pub fn is_kernel_builtin(name: &str, arity: usize) -> bool {
    KERNEL_BUILTINS.contains(&(name, arity))
}

pub fn is_known_runtime_module(name: &str) -> bool {
    KNOWN_RUNTIME_MODULES.contains(&name)
}

/// The Kernel runtime's exported name for an operator/builtin. Arithmetic
/// and comparison operators are never emitted as native target operators —
/// they go through `Kernel.*` so structural equality (`==` on tuples, maps,
/// atoms) and int/float semantics stay exactly what the source language
/// promises, independent of target-language coercion rules.
fn runtime_name(source_name: &str) -> &'static str {
    match source_name {
        "+" => "add",
        "-" => "sub",
        "*" => "mul",
        "/" => "div",
        "==" => "eq",
        "!=" => "neq",
        "<" => "lt",
        ">" => "gt",
        "<=" => "lte",
        ">=" => "gte",
        "and" => "and_",
        "or" => "or_",
        "not" => "not_",
        "length" => "length",
        "hd" => "hd",
        "tl" => "tl",
        "elem" => "elem",
        "put_elem" => "put_elem",
        "is_list" => "is_list",
        "is_tuple" => "is_tuple",
        "is_map" => "is_map",
        "is_atom" => "is_atom",
        "is_binary" => "is_binary",
        "is_number" => "is_number",
        "is_integer" => "is_integer",
        "is_float" => "is_float",
        "is_boolean" => "is_boolean",
        "is_nil" => "is_nil",
        "inspect" => "inspect",
        "to_string" => "to_string",
        other => other,
    }
}

pub fn lower_kernel_call(name: &str, args: Vec<TargetNode>) -> TargetNode {
    target::call_expression(
        target::member_expression(target::identifier("Kernel"), target::identifier(runtime_name(name)), false),
        args,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_arithmetic_and_comparison_builtins() {
        assert!(is_kernel_builtin("+", 2));
        assert!(is_kernel_builtin("==", 2));
        assert!(!is_kernel_builtin("+", 3));
        assert!(!is_kernel_builtin("frobnicate", 1));
    }

    #[test]
    fn unary_minus_and_binary_minus_are_distinct_arities() {
        assert!(is_kernel_builtin("-", 1));
        assert!(is_kernel_builtin("-", 2));
    }

    #[test]
    fn known_runtime_modules_bypass_alias_resolution() {
        assert!(is_known_runtime_module("Logger"));
        assert!(!is_known_runtime_module("MyApp.Logger"));
    }

    #[test]
    fn lowering_emits_a_kernel_namespaced_call() {
        let node = lower_kernel_call("+", vec![target::number_literal(1.0), target::number_literal(2.0)]);
        match node {
            TargetNode::CallExpression { callee, arguments } => {
                assert_eq!(arguments.len(), 2);
                match *callee {
                    TargetNode::MemberExpression { property, .. } => {
                        assert_eq!(*property, target::identifier("add"));
                    }
                    other => panic!("expected member expression callee, got {other:?}"),
                }
            }
            other => panic!("expected call expression, got {other:?}"),
        }
    }
}
