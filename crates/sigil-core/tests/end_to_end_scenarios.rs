//! The six acceptance scenarios (§8) run end to end: construct a source
//! AST by hand, run it through `translate_file`/`Translator`, and check the
//! target shape the design pins down exactly.

use std::path::PathBuf;

use sigil_ast::target::{self, TargetNode};
use sigil_ast::{Literal, Meta, Number, SourceNode};
use sigil_core::dispatcher::Translator;
use sigil_core::macro_expand::NoopExpander;
use sigil_core::registry::ModuleRegistry;
use sigil_core::{CompilationContext, Environment};

fn aliases(segments: &[&str]) -> SourceNode {
    SourceNode::form("__aliases__", Meta::default(), segments.iter().map(|s| SourceNode::ident(*s)).collect())
}

fn block(items: Vec<SourceNode>) -> SourceNode {
    SourceNode::form("__block__", Meta::default(), items)
}

fn defmodule(name: SourceNode, body: SourceNode) -> SourceNode {
    SourceNode::form("defmodule", Meta::default(), vec![name, body])
}

fn ctx() -> CompilationContext {
    CompilationContext::new(PathBuf::from("."), Environment::root())
}

fn statements_of(body: &TargetNode) -> &[TargetNode] {
    match body {
        TargetNode::BlockStatement { body } => body,
        other => panic!("expected a block statement, got {other:?}"),
    }
}

// Scenario 1: an empty module emits `__MODULE__` and nothing else.
#[test]
fn empty_module_emits_only_module_constant() {
    let registry = sigil_core::translate_file(&ctx(), "elephant.sgl", &defmodule(aliases(&["Elephant"]), block(vec![])), &NoopExpander).unwrap();
    let record = registry.get("Elephant").expect("module Elephant was not registered");
    let statements = statements_of(record.body.as_ref().expect("module body was never recorded"));
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0],
        target::variable_declaration(target::VariableKind::Const, "__MODULE__", Some(sigil_core::primitives::lower_atom("Elephant"))),
    );
}

// Scenario 2: `alias Hello.World` becomes an import binding `World` to
// `hello/world`.
#[test]
fn alias_emits_an_import_declaration_bound_to_the_trailing_segment() {
    let alias_stmt = SourceNode::form("alias", Meta::default(), vec![aliases(&["Hello", "World"])]);
    let registry = sigil_core::translate_file(&ctx(), "a.sgl", &defmodule(aliases(&["A"]), block(vec![alias_stmt])), &NoopExpander).unwrap();
    let record = registry.get("A").expect("module A was not registered");
    let statements = statements_of(record.body.as_ref().unwrap());
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[1],
        target::import_declaration(vec![target::ImportSpecifier { imported: "World".into(), local: "World".into() }], "hello/world"),
    );
}

// Scenario 3: `alias Hello.World, as: Test` renames the local binding but
// keeps importing from the same path.
#[test]
fn aliased_rename_binds_the_chosen_local_name() {
    let alias_stmt = SourceNode::form("alias", Meta::default(), vec![aliases(&["Hello", "World"]), SourceNode::ident("Test")]);
    let registry = sigil_core::translate_file(&ctx(), "a.sgl", &defmodule(aliases(&["A"]), block(vec![alias_stmt])), &NoopExpander).unwrap();
    let record = registry.get("A").unwrap();
    let statements = statements_of(record.body.as_ref().unwrap());
    assert_eq!(
        statements[1],
        target::import_declaration(vec![target::ImportSpecifier { imported: "World".into(), local: "Test".into() }], "hello/world"),
    );
}

// Scenario 4: two `def f` clauses of arity 1 collapse into one clause-table
// declaration, not two separate functions.
#[test]
fn sibling_def_clauses_of_the_same_name_share_one_clause_table() {
    let zero_clause = SourceNode::form(
        "def",
        Meta::default(),
        vec![
            SourceNode::form("f", Meta::default(), vec![SourceNode::Literal(Literal::Number(Number::Int(0)))]),
            SourceNode::Atom("zero".into()),
        ],
    );
    let other_clause = SourceNode::form(
        "def",
        Meta::default(),
        vec![SourceNode::form("f", Meta::default(), vec![SourceNode::ident("n")]), SourceNode::Atom("nonzero".into())],
    );
    let registry = sigil_core::translate_file(
        &ctx(),
        "clauses.sgl",
        &defmodule(aliases(&["Clauses"]), block(vec![zero_clause, other_clause])),
        &NoopExpander,
    )
    .unwrap();
    let record = registry.get("Clauses").unwrap();
    let statements = statements_of(record.body.as_ref().unwrap());
    // `__MODULE__`, the `f` clause table, and its export — one declaration,
    // not two.
    assert_eq!(statements.len(), 3);
    match &statements[1] {
        TargetNode::VariableDeclaration { name, init, .. } => {
            assert_eq!(name, "f");
            match init.as_deref() {
                Some(TargetNode::CallExpression { arguments, .. }) => match &arguments[0] {
                    TargetNode::ArrayExpression { elements } => assert_eq!(elements.len(), 2),
                    other => panic!("expected a clause array, got {other:?}"),
                },
                other => panic!("expected `f`'s clause table call, got {other:?}"),
            }
        }
        other => panic!("expected `f`'s declaration, got {other:?}"),
    }
    assert_eq!(statements[2], target::export_declaration(vec!["f".into()]));
}

// Scenario 5: a dotted call into a module the design has no special
// knowledge of (`Integer`, unlike `Logger`/`Access`/`Kernel`/`JS`) still
// lowers to a plain member-expression call, passed through unchanged.
#[test]
fn unknown_module_dotted_call_passes_through_as_a_member_call() {
    let mut registry = ModuleRegistry::new(PathBuf::from("."), Environment::root());
    let expander = NoopExpander;
    let mut t = Translator::new(&mut registry, &expander);
    let node = SourceNode::form(
        ".",
        Meta::default(),
        vec![SourceNode::ident("Integer"), SourceNode::Atom("parse".into()), SourceNode::Literal(Literal::Str("34".into()))],
    );
    let result = t.translate(&node, &Environment::root()).unwrap();
    assert_eq!(
        result,
        target::call_expression(
            target::member_expression(target::identifier("Integer"), target::identifier("parse"), false),
            vec![target::string_literal("34")],
        ),
    );
}

// Scenario 6: a `defmodule` nested inside another produces two separate
// target programs — `Animals` importing `Elephant` from `animals/elephant`
// rather than inlining it — and the inner module's body is emitted before
// the enclosing one's.
#[test]
fn nested_defmodule_becomes_two_programs_linked_by_import() {
    let defstruct = SourceNode::form("defstruct", Meta::default(), vec![SourceNode::List(vec![SourceNode::Atom("trunk".into())])]);
    let elephant = defmodule(aliases(&["Elephant"]), block(vec![defstruct]));

    let make_struct = SourceNode::Struct {
        module: "Elephant".into(),
        fields: vec![(SourceNode::Atom("trunk".into()), SourceNode::Literal(Literal::Bool(true)))],
        meta: Meta::default(),
    };
    let make_fn = SourceNode::form("def", Meta::default(), vec![SourceNode::form("make", Meta::default(), vec![]), make_struct]);
    let animals = defmodule(aliases(&["Animals"]), block(vec![elephant, make_fn]));

    let registry = sigil_core::translate_file(&ctx(), "animals.sgl", &animals, &NoopExpander).unwrap();

    let order: Vec<String> = registry.emission_order().iter().map(|m| m.name.join(".")).collect();
    assert_eq!(order, vec!["Animals.Elephant".to_string(), "Animals".to_string()]);

    let elephant_record = registry.get("Animals.Elephant").expect("nested module was not registered under its full path");
    let elephant_statements = statements_of(elephant_record.body.as_ref().unwrap());
    assert_eq!(elephant_statements.len(), 2);
    assert_eq!(elephant_statements[0], target::variable_declaration(target::VariableKind::Const, "__MODULE__", Some(sigil_core::primitives::lower_atom("Animals.Elephant"))));
    match &elephant_statements[1] {
        TargetNode::VariableDeclaration { name, .. } => assert_eq!(name, "__struct__"),
        other => panic!("expected the struct factory, got {other:?}"),
    }

    let animals_record = registry.get("Animals").unwrap();
    let animals_statements = statements_of(animals_record.body.as_ref().unwrap());
    // `__MODULE__`, an import of the now-sibling `Elephant` program, `make`'s
    // clause table, and its export.
    assert_eq!(animals_statements.len(), 4);
    assert_eq!(
        animals_statements[1],
        target::import_declaration(vec![target::ImportSpecifier { imported: "Elephant".into(), local: "Elephant".into() }], "animals/elephant"),
    );

    let make_body = match &animals_statements[2] {
        TargetNode::VariableDeclaration { init, .. } => match init.as_deref() {
            Some(TargetNode::CallExpression { arguments, .. }) => match &arguments[0] {
                TargetNode::ArrayExpression { elements } => match &elements[0] {
                    TargetNode::ObjectExpression { properties } => &properties[2].1,
                    other => panic!("expected the one `make` clause, got {other:?}"),
                },
                other => panic!("expected a clause array, got {other:?}"),
            },
            other => panic!("expected `make`'s clause table call, got {other:?}"),
        },
        other => panic!("expected `make`'s declaration, got {other:?}"),
    };
    let struct_call = match make_body {
        TargetNode::ArrowFunctionExpression { body, .. } => body.as_ref(),
        other => panic!("expected the clause body arrow function, got {other:?}"),
    };
    assert_eq!(
        struct_call,
        &target::call_expression(
            target::member_expression(target::identifier("Elephant"), target::identifier("__struct__"), false),
            vec![target::object_expression(vec![(target::string_literal("trunk"), target::bool_literal(true))])],
        ),
    );
}
