//! SPEC_FULL.md "Supplemented features": reflective forms spec.md places
//! out of scope (§1 Non-goals, §4.1 rule 6) must still raise
//! `UnsupportedError`, not silently translate or panic.

use std::path::PathBuf;

use sigil_ast::{Meta, SourceNode};
use sigil_core::dispatcher::Translator;
use sigil_core::error::ErrorKind;
use sigil_core::macro_expand::NoopExpander;
use sigil_core::registry::ModuleRegistry;
use sigil_core::Environment;

fn assert_unsupported(tag: &str) {
    let mut registry = ModuleRegistry::new(PathBuf::from("."), Environment::root());
    let expander = NoopExpander;
    let mut t = Translator::new(&mut registry, &expander);
    let node = SourceNode::form(tag, Meta::default(), vec![]);
    let err = t.translate(&node, &Environment::root()).unwrap_err();
    assert!(
        matches!(err.kind, ErrorKind::Unsupported(ref name) if name == tag),
        "expected `{tag}` to raise ErrorKind::Unsupported, got {:?}",
        err.kind
    );
}

#[test]
fn super_is_unsupported() {
    assert_unsupported("super");
}

#[test]
fn caller_is_unsupported() {
    assert_unsupported("__CALLER__");
}

#[test]
fn env_introspection_is_unsupported() {
    assert_unsupported("__ENV__");
}

#[test]
fn reflective_forms_are_rejected_as_call_arguments_too() {
    // The same rejection applies when the reflective form appears as a
    // bare identifier-position tag, not just a zero-arity call.
    let mut registry = ModuleRegistry::new(PathBuf::from("."), Environment::root());
    let expander = NoopExpander;
    let mut t = Translator::new(&mut registry, &expander);
    let node = SourceNode::form("super", Meta::default(), vec![SourceNode::ident("arg")]);
    let err = t.translate(&node, &Environment::root()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Unsupported(_)));
}
