//! Property tests for pattern lowering (§8 "Round-trip / idempotence":
//! "Lowering a pattern and immediately matching the original value against
//! the lowered descriptor yields success with the expected bindings").

use proptest::prelude::*;
use sigil_ast::{Literal, Number, SourceNode};
use sigil_core::pattern::{lower_pattern, match_value, Bindings, PatternDescriptor, Value};

fn int_literal_pattern(n: i64) -> SourceNode {
    SourceNode::Literal(Literal::Number(Number::Int(n)))
}

proptest! {
    #[test]
    fn literal_int_pattern_matches_its_own_value(n in any::<i64>()) {
        let descriptor = lower_pattern(&int_literal_pattern(n)).unwrap();
        let mut bindings = Bindings::new();
        prop_assert!(match_value(&descriptor, &Value::Int(n), &mut bindings));
        prop_assert!(bindings.is_empty());
    }

    #[test]
    fn literal_int_pattern_rejects_a_different_value(n in any::<i64>(), offset in 1i64..1000) {
        let descriptor = lower_pattern(&int_literal_pattern(n)).unwrap();
        let mut bindings = Bindings::new();
        prop_assert!(!match_value(&descriptor, &Value::Int(n.wrapping_add(offset)), &mut bindings));
    }

    #[test]
    fn bind_pattern_always_matches_and_records_the_value(n in any::<i64>(), name in "[a-z][a-z0-9_]{0,8}") {
        prop_assume!(name != "_");
        let descriptor = lower_pattern(&SourceNode::ident(name.clone())).unwrap();
        prop_assert_eq!(descriptor, PatternDescriptor::Bind(name.clone()));
        let mut bindings = Bindings::new();
        prop_assert!(match_value(&lower_pattern(&SourceNode::ident(name.clone())).unwrap(), &Value::Int(n), &mut bindings));
        prop_assert_eq!(bindings.get(&name), Some(&Value::Int(n)));
    }

    #[test]
    fn literal_string_pattern_matches_its_own_value(s in "[a-zA-Z0-9]{0,16}") {
        let descriptor = lower_pattern(&SourceNode::Literal(Literal::Str(s.clone()))).unwrap();
        let mut bindings = Bindings::new();
        prop_assert!(match_value(&descriptor, &Value::Str(s), &mut bindings));
    }
}
