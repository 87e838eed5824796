//! Primitive builder (§2: literals, atoms, identifiers, tuples, lists) —
//! dispatch rules 1-4 and 8 of §4.1.

use sigil_ast::target::{self, TargetNode};
use sigil_ast::{Literal, Number};

use crate::identifier::filter_identifier;

pub fn lower_literal(lit: &Literal) -> TargetNode {
    match lit {
        Literal::Number(Number::Int(n)) => target::number_literal(*n as f64),
        Literal::Number(Number::Float(f)) => target::number_literal(*f),
        Literal::Str(s) => target::string_literal(s.clone()),
        Literal::Bool(b) => target::bool_literal(*b),
        Literal::Nil => target::null_literal(),
    }
}

/// §3 invariants: "Every atom literal in source maps to a unique,
/// deterministic target expression computed as
/// `SpecialForms.atom(<escaped-name>)`." Escaping here means the atom's own
/// text, quoted as a target string literal — non-ASCII atom names pass
/// through unchanged (§8 "Boundaries").
pub fn lower_atom(name: &str) -> TargetNode {
    target::call_expression(
        target::member_expression(target::identifier("SpecialForms"), target::identifier("atom"), false),
        vec![target::string_literal(name)],
    )
}

/// A bare identifier, filtered through the fixed substitution table (§6).
pub fn lower_identifier(name: &str) -> TargetNode {
    target::identifier(filter_identifier(name))
}

pub fn lower_list(elements: Vec<TargetNode>) -> TargetNode {
    target::array_expression(elements)
}

/// Tuples are not a native target shape: emit a call into the runtime's
/// tuple constructor (§6 "tuple type").
pub fn lower_tuple(elements: Vec<TargetNode>) -> TargetNode {
    target::call_expression(
        target::member_expression(target::identifier("SpecialForms"), target::identifier("tuple"), false),
        elements,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_lowers_to_a_special_forms_call_with_the_raw_name() {
        let node = lower_atom("ok");
        match node {
            TargetNode::CallExpression { arguments, .. } => {
                assert_eq!(arguments, vec![target::string_literal("ok")]);
            }
            other => panic!("expected call expression, got {other:?}"),
        }
    }

    #[test]
    fn non_ascii_atom_names_pass_through_unchanged() {
        let node = lower_atom("café");
        match node {
            TargetNode::CallExpression { arguments, .. } => {
                assert_eq!(arguments, vec![target::string_literal("café")]);
            }
            other => panic!("expected call expression, got {other:?}"),
        }
    }

    #[test]
    fn identifiers_are_filtered() {
        assert_eq!(lower_identifier("valid?"), target::identifier("valid__qmark__"));
    }

    #[test]
    fn two_identical_atoms_lower_identically() {
        assert_eq!(lower_atom("ok"), lower_atom("ok"));
    }
}
