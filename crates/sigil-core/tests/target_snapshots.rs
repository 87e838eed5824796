//! Snapshot coverage for representative target-AST shapes (SPEC_FULL.md
//! "Test tooling"): a module-level construct via `insta`, plus a clause-table
//! row and a protocol dispatch-table entry asserted directly.

use sigil_ast::target::{self, TargetNode};
use sigil_core::pattern::{self, Clause, PatternDescriptor};
use sigil_core::primitives::lower_atom;

// Every atom literal lowers to the same `SpecialForms.atom(...)` shape
// (§3 invariants) — this is the one construct every emitted module leans on
// for its `__MODULE__` constant, so it stands in for "module" coverage.
#[test]
fn atom_lowering_snapshot() {
    insta::assert_debug_snapshot!(lower_atom("ok"), @r#"
    CallExpression {
        callee: MemberExpression {
            object: Identifier {
                name: "SpecialForms",
            },
            property: Identifier {
                name: "atom",
            },
            computed: false,
        },
        arguments: [
            Literal(
                Str(
                    "ok",
                ),
            ),
        ],
    }
    "#);
}

// One row of a clause table (§4.2): a single wildcard clause with no guard.
#[test]
fn clause_table_row_shape() {
    let clause = Clause::new(vec![PatternDescriptor::Wildcard], None, target::string_literal("matched"));
    let table = pattern::defmatch(&[clause]);
    match table {
        TargetNode::CallExpression { callee, arguments } => {
            assert_eq!(*callee, target::member_expression(target::identifier("Patterns"), target::identifier("defmatch"), false));
            match &arguments[..] {
                [TargetNode::ArrayExpression { elements }] => match &elements[..] {
                    [TargetNode::ObjectExpression { properties }] => {
                        assert_eq!(properties[0], (target::string_literal("patterns"), target::array_expression(vec![pattern::pattern_to_target(&PatternDescriptor::Wildcard)])));
                        assert_eq!(properties[1], (target::string_literal("guard"), target::null_literal()));
                        assert_eq!(properties[2].0, target::string_literal("body"));
                    }
                    other => panic!("expected one clause row, got {other:?}"),
                },
                other => panic!("expected a single-element clause array, got {other:?}"),
            }
        }
        other => panic!("expected the clause table call, got {other:?}"),
    }
}

// A protocol's dispatch table is an object keyed by protocol name, carrying
// the declared spec (§4.6 "Structs and protocols").
#[test]
fn protocol_dispatch_table_shape() {
    let node = target::object_expression(vec![
        (target::string_literal("protocol"), target::string_literal("Show")),
        (target::string_literal("spec"), target::null_literal()),
    ]);
    match node {
        TargetNode::ObjectExpression { properties } => {
            assert_eq!(properties.len(), 2);
            assert_eq!(properties[0], (target::string_literal("protocol"), target::string_literal("Show")));
        }
        other => panic!("expected an object expression, got {other:?}"),
    }
}
