//! The `Environment` threaded through translation (§3 "Environment").
//!
//! Logically immutable per call: every "extend" operation below returns a
//! new value rather than mutating `self`, which is what lets each nested
//! scope (module, function, anonymous function, case clause) fork its own
//! view without stepping on a sibling's.

use indexmap::IndexMap;

use crate::registry::ImportedName;

/// An immutable, forkable view of where translation currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// Fully-qualified module path segments of the module currently being
    /// translated, outermost first, e.g. `["Animals", "Elephant"]`.
    module_path: Vec<String>,
    /// Local name -> canonical dotted name, as established by `alias`.
    aliases: IndexMap<String, String>,
    /// Bare names resolvable without qualification because of `import`,
    /// mapped to the module they were imported from.
    imports: IndexMap<String, ImportedName>,
    /// Macro names visible in this scope (module-local + imported).
    macros: IndexMap<String, usize>,
    /// True while lowering the body of a `quote` block; capture/translation
    /// of `unquote` re-enters ordinary translation even when this is set.
    in_quote: bool,
}

impl Environment {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn module_path(&self) -> &[String] {
        &self.module_path
    }

    pub fn current_module_name(&self) -> String {
        self.module_path.join(".")
    }

    pub fn in_quote(&self) -> bool {
        self.in_quote
    }

    /// Enter a nested module scope. Aliases and imports do not leak into
    /// inner modules in the source language's usual lexical sense, but
    /// `sigil` follows the teacher's convention of keeping the Environment a
    /// plain forkable value rather than special-casing inheritance: callers
    /// that want isolation construct a fresh `Environment` with only the
    /// path extended, which is what `module::translate_defmodule` does.
    pub fn enter_module(&self, segment: impl Into<String>) -> Self {
        let mut module_path = self.module_path.clone();
        module_path.push(segment.into());
        Self {
            module_path,
            aliases: IndexMap::new(),
            imports: IndexMap::new(),
            macros: IndexMap::new(),
            in_quote: false,
        }
    }

    pub fn with_alias(&self, local: impl Into<String>, canonical: impl Into<String>) -> Self {
        let mut aliases = self.aliases.clone();
        // "Every alias binding maps a single local name to exactly one
        // canonical name; re-aliasing replaces." (§3 invariants)
        aliases.insert(local.into(), canonical.into());
        Self {
            aliases,
            ..self.clone()
        }
    }

    pub fn resolve_alias(&self, local: &str) -> Option<&str> {
        self.aliases.get(local).map(String::as_str)
    }

    pub fn with_import(&self, name: impl Into<String>, from: ImportedName) -> Self {
        let mut imports = self.imports.clone();
        imports.insert(name.into(), from);
        Self {
            imports,
            ..self.clone()
        }
    }

    pub fn with_imports(&self, entries: impl IntoIterator<Item = (String, ImportedName)>) -> Self {
        let mut imports = self.imports.clone();
        imports.extend(entries);
        Self {
            imports,
            ..self.clone()
        }
    }

    pub fn resolve_import(&self, name: &str) -> Option<&ImportedName> {
        self.imports.get(name)
    }

    pub fn with_macro(&self, name: impl Into<String>, arity: usize) -> Self {
        let mut macros = self.macros.clone();
        macros.insert(name.into(), arity);
        Self {
            macros,
            ..self.clone()
        }
    }

    pub fn knows_macro(&self, name: &str, arity: usize) -> bool {
        self.macros.get(name) == Some(&arity)
    }

    pub fn entering_quote(&self) -> Self {
        Self {
            in_quote: true,
            ..self.clone()
        }
    }

    pub fn leaving_quote(&self) -> Self {
        Self {
            in_quote: false,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_aliasing_replaces_the_binding() {
        let env = Environment::root()
            .with_alias("World", "Hello.World")
            .with_alias("World", "Other.World");
        assert_eq!(env.resolve_alias("World"), Some("Other.World"));
    }

    #[test]
    fn entering_a_module_extends_the_path_and_resets_scope() {
        let env = Environment::root()
            .with_alias("World", "Hello.World")
            .enter_module("Animals")
            .enter_module("Elephant");
        assert_eq!(env.module_path(), &["Animals", "Elephant"]);
        assert_eq!(env.current_module_name(), "Animals.Elephant");
        assert_eq!(env.resolve_alias("World"), None);
    }

    #[test]
    fn quote_flag_is_independently_toggleable() {
        let env = Environment::root().entering_quote();
        assert!(env.in_quote());
        assert!(!env.leaving_quote().in_quote());
    }
}
