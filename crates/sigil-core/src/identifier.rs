//! Filtered identifiers (§6): source names may contain characters illegal in
//! the target. The substitution is a fixed, deterministic, injective table.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static SUBSTITUTIONS: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert('?', "__qmark__");
    m.insert('!', "__emark__");
    m.insert('\'', "__squote__");
    m.insert('@', "__at__");
    m.insert('.', "__dot__");
    m
});

/// Rewrites a source identifier into one legal in the target, applying the
/// fixed substitution table to every disallowed character and leaving
/// alphanumerics and `_` untouched.
pub fn filter_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            out.push(ch);
        } else if let Some(sub) = SUBSTITUTIONS.get(&ch) {
            out.push_str(sub);
        } else {
            // Documented fallback for the "any other" case: a stable,
            // injective escape keyed on the codepoint so two distinct
            // characters never collide.
            out.push_str(&format!("__u{:x}__", ch as u32));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_substitutions_apply() {
        assert_eq!(filter_identifier("valid?"), "valid__qmark__");
        assert_eq!(filter_identifier("save!"), "save__emark__");
    }

    #[test]
    fn plain_identifiers_pass_through() {
        assert_eq!(filter_identifier("count"), "count");
        assert_eq!(filter_identifier("_private"), "_private");
    }

    #[test]
    fn fallback_is_injective_for_distinct_unknown_chars() {
        let a = filter_identifier("x\u{00e9}"); // e-acute
        let b = filter_identifier("x\u{00e8}"); // e-grave
        assert_ne!(a, b);
    }
}
