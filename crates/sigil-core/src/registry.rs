//! The Module Registry (§3 "Registry state", §4.7).
//!
//! The design spec describes this as "a single mutable container accessed
//! through a small command surface" and, in §9's design notes, suggests
//! re-architecting the source system's ambient global as an explicit
//! `CompilationContext` value. We do that here: `ModuleRegistry` is an
//! ordinary struct, owned by the driver and passed by `&mut` into whichever
//! translator needs to mutate it. There is no global; parallelism across
//! files (§5) is a matter of giving each file its own scratch registry and
//! merging by module-name key afterwards, which `merge` implements.

use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};
use sigil_ast::TargetNode;

use crate::env::Environment;
use crate::error::{ErrorKind, TranslateError, TranslateResult};
use crate::module_path::to_dotted_name;

pub type FunctionKey = (String, usize);

/// What a bare name resolves to once `process_imports` has run (§4.5
/// "Two-pass resolution").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedName {
    pub from_module: Vec<String>,
    pub is_macro: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Functions,
    Macros,
    Both,
}

/// `only: [...]` / `except: [...]` / `only: :functions` filters on an
/// `import` declaration (§4.5 "Import semantics").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    pub only: Option<Vec<FunctionKey>>,
    pub except: Option<Vec<FunctionKey>>,
    pub kind: Option<ImportKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImport {
    pub module: Vec<String>,
    pub options: ImportOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleRecord {
    pub name: Vec<String>,
    pub functions: IndexSet<FunctionKey>,
    pub macros: IndexSet<FunctionKey>,
    pub aliases: IndexSet<(String, String)>,
    pub imports: Vec<PendingImport>,
    pub resolved_imports: IndexMap<String, ImportedName>,
    pub body: Option<TargetNode>,
    /// Label (file path, usually) used only for name-collision error text.
    pub source: Option<String>,
}

impl ModuleRecord {
    fn new(name: Vec<String>, source: Option<String>) -> Self {
        Self {
            name,
            source,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProtocolRecord {
    pub name: String,
    pub spec: Option<TargetNode>,
    pub impls: IndexMap<String, TargetNode>,
}

/// Process-wide state for one compilation (§3 "Registry state").
///
/// Keyed by dotted module name so lookups are O(1) and merges are by name
/// (§5 "merges are by module-name key with last-writer-wins forbidden").
pub struct ModuleRegistry {
    root: PathBuf,
    env: Environment,
    // Keyed by dotted name for O(1) lookup; registration order here is
    // discovery order (outer before inner, since `defmodule` registers
    // itself before translating its body), which is the opposite of what
    // emission needs, so emission order is tracked separately below.
    modules: IndexMap<String, ModuleRecord>,
    protocols: IndexMap<String, ProtocolRecord>,
    // Populated by `set_body`, which a `defmodule` only calls once its own
    // body (and therefore every nested `defmodule` it contains) has
    // finished translating. That makes this sequence exactly the post-order
    // traversal SPEC_FULL.md's Open Question pins down: "all inner modules
    // before their enclosing module".
    body_order: Vec<String>,
}

impl ModuleRegistry {
    pub fn new(root: PathBuf, env: Environment) -> Self {
        Self {
            root,
            env,
            modules: IndexMap::new(),
            protocols: IndexMap::new(),
            body_order: Vec::new(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn update_env(&mut self, env: Environment) {
        self.env = env;
    }

    /// Registers a module, or fails with `NameCollision` if a module with
    /// the same segment list was already registered from a different
    /// source (§7 "Name collision").
    pub fn add_module(&mut self, name: Vec<String>, source: Option<String>) -> TranslateResult<()> {
        let key = to_dotted_name(&name);
        if let Some(existing) = self.modules.get(&key) {
            return Err(TranslateError::new(ErrorKind::NameCollision {
                name: key,
                first: existing.source.clone().unwrap_or_else(|| "<unknown>".into()),
                second: source.unwrap_or_else(|| "<unknown>".into()),
            }));
        }
        self.modules.insert(key, ModuleRecord::new(name, source));
        Ok(())
    }

    pub fn delete_module(&mut self, name: &[String]) -> Option<ModuleRecord> {
        self.modules.shift_remove(&to_dotted_name(name))
    }

    pub fn module_listed(&self, name: &[String]) -> bool {
        self.modules.contains_key(&to_dotted_name(name))
    }

    pub fn get_module(&self, name: &[String]) -> Option<&ModuleRecord> {
        self.modules.get(&to_dotted_name(name))
    }

    pub fn get_module_mut(&mut self, name: &[String]) -> Option<&mut ModuleRecord> {
        self.modules.get_mut(&to_dotted_name(name))
    }

    /// Lookup by already-dotted name, e.g. from an `__aliases__` resolution.
    pub fn get(&self, dotted_name: &str) -> Option<&ModuleRecord> {
        self.modules.get(dotted_name)
    }

    pub fn record_function(&mut self, module: &[String], name: impl Into<String>, arity: usize) {
        if let Some(m) = self.get_module_mut(module) {
            m.functions.insert((name.into(), arity));
        }
    }

    pub fn record_macro(&mut self, module: &[String], name: impl Into<String>, arity: usize) {
        if let Some(m) = self.get_module_mut(module) {
            m.macros.insert((name.into(), arity));
        }
    }

    /// Registers an alias local-to-canonical binding on a module record.
    ///
    /// Open Question (SPEC_FULL.md): the registry never validates that the
    /// canonical module is known. A forward reference or an external module
    /// is simply recorded; resolution against `modules` happens lazily,
    /// later, wherever an `__aliases__` node is actually translated.
    pub fn add_alias(&mut self, module: &[String], local: impl Into<String>, canonical: impl Into<String>) {
        if let Some(m) = self.get_module_mut(module) {
            m.aliases.insert((local.into(), canonical.into()));
        }
    }

    pub fn add_import(&mut self, module: &[String], import: PendingImport) {
        if let Some(m) = self.get_module_mut(module) {
            m.imports.push(import);
        }
    }

    pub fn set_body(&mut self, module: &[String], body: TargetNode) {
        let key = to_dotted_name(module);
        if let Some(m) = self.modules.get_mut(&key) {
            m.body = Some(body);
            self.body_order.push(key);
        }
    }

    /// Creates the protocol record if absent (§3 invariants: "For every
    /// `defimpl P, for: T` encountered, `protocols[P].impls[T]` is set,
    /// creating the protocol record if absent").
    pub fn add_protocol(&mut self, name: impl Into<String>, spec: Option<TargetNode>) {
        let name = name.into();
        let entry = self.protocols.entry(name.clone()).or_insert_with(|| ProtocolRecord {
            name: name.clone(),
            spec: None,
            impls: IndexMap::new(),
        });
        if spec.is_some() {
            entry.spec = spec;
        }
    }

    pub fn add_protocol_impl(&mut self, protocol: impl Into<String>, type_key: impl Into<String>, impl_ast: TargetNode) {
        let protocol = protocol.into();
        let entry = self.protocols.entry(protocol.clone()).or_insert_with(|| ProtocolRecord {
            name: protocol,
            spec: None,
            impls: IndexMap::new(),
        });
        entry.impls.insert(type_key.into(), impl_ast);
    }

    pub fn get_protocol(&self, name: &str) -> Option<&ProtocolRecord> {
        self.protocols.get(name)
    }

    pub fn protocols(&self) -> impl Iterator<Item = &ProtocolRecord> {
        self.protocols.values()
    }

    /// The second pass (§4.5 "Two-pass resolution"): materializes each
    /// module's pending `imports` into concrete resolved names by looking up
    /// the referenced module's functions and macros, now that every
    /// module's exports are known.
    ///
    /// An import of a module not present in the registry (an external
    /// dependency, or simply not yet compiled in this run) is left
    /// unresolved rather than treated as an error — consistent with
    /// §7 "Resolution miss" not being a translation-time error.
    pub fn process_imports(&mut self) -> TranslateResult<()> {
        let keys: Vec<String> = self.modules.keys().cloned().collect();
        for key in keys {
            let imports = self.modules[&key].imports.clone();
            let mut resolved: IndexMap<String, ImportedName> = IndexMap::new();
            for import in imports {
                let Some(target) = self.get(&to_dotted_name(&import.module)) else {
                    continue;
                };
                let wants_functions = !matches!(import.options.kind, Some(ImportKind::Macros));
                let wants_macros = !matches!(import.options.kind, Some(ImportKind::Functions));

                let mut candidates: Vec<(FunctionKey, bool)> = Vec::new();
                if wants_functions {
                    candidates.extend(target.functions.iter().cloned().map(|k| (k, false)));
                }
                if wants_macros {
                    candidates.extend(target.macros.iter().cloned().map(|k| (k, true)));
                }

                for ((name, arity), is_macro) in candidates {
                    if let Some(only) = &import.options.only {
                        if !only.contains(&(name.clone(), arity)) {
                            continue;
                        }
                    }
                    if let Some(except) = &import.options.except {
                        if except.contains(&(name.clone(), arity)) {
                            continue;
                        }
                    }
                    resolved.insert(
                        name,
                        ImportedName {
                            from_module: import.module.clone(),
                            is_macro,
                        },
                    );
                }
            }
            if let Some(m) = self.modules.get_mut(&key) {
                m.resolved_imports = resolved;
            }
        }
        Ok(())
    }

    /// Emission order: all inner modules before their enclosing module
    /// (SPEC_FULL.md Open Questions). `body_order` is exactly this: a
    /// `defmodule` only records its own body after every nested `defmodule`
    /// in it has recursively finished (registered itself and recorded its
    /// body first), so the sequence `set_body` was called in is already the
    /// post-order traversal emission needs. Modules with no recorded body
    /// (possible only for hand-constructed registries in tests) are
    /// appended last, in discovery order.
    pub fn emission_order(&self) -> Vec<&ModuleRecord> {
        let mut seen = std::collections::HashSet::new();
        let mut ordered: Vec<&ModuleRecord> = self
            .body_order
            .iter()
            .filter_map(|key| {
                if seen.insert(key.as_str()) {
                    self.modules.get(key)
                } else {
                    None
                }
            })
            .collect();
        for (key, record) in &self.modules {
            if seen.insert(key.as_str()) {
                ordered.push(record);
            }
        }
        ordered
    }

    /// A stronger ordering than `emission_order`: every module is placed
    /// after the modules it imports, so an emitter that writes files in this
    /// order never needs a forward reference. The source language allows
    /// mutually-recursive module imports (resolved at load time, not
    /// compile time), so a cycle is not an error here — it just falls back
    /// to discovery order for the modules it touches.
    pub fn dependency_order(&self) -> Vec<&ModuleRecord> {
        use petgraph::graphmap::DiGraphMap;

        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for key in self.modules.keys() {
            graph.add_node(key.as_str());
        }
        for (key, record) in &self.modules {
            for import in &record.imports {
                let target = to_dotted_name(&import.module);
                if self.modules.contains_key(&target) {
                    graph.add_edge(target.as_str(), key.as_str(), ());
                }
            }
        }

        match petgraph::algo::toposort(&graph, None) {
            Ok(order) => order
                .into_iter()
                .filter_map(|key| self.modules.get(key))
                .collect(),
            Err(_) => self.emission_order(),
        }
    }

    /// Consumes the registry at the end of compilation (§3 "Lifecycles":
    /// "destroyed at end of compilation"), handing back everything needed
    /// for emission.
    pub fn stop(self) -> (Vec<ModuleRecord>, Vec<ProtocolRecord>) {
        (
            self.modules.into_values().collect(),
            self.protocols.into_values().collect(),
        )
    }

    /// Merges a per-file scratch registry into this one (§5: "each file's
    /// translation must complete against a private scratch registry which
    /// is merged at the import-resolution pass"). Duplicate module names
    /// are a fatal `NameCollision`, never last-writer-wins.
    pub fn merge(&mut self, other: ModuleRegistry) -> TranslateResult<()> {
        for (key, record) in other.modules {
            if let Some(existing) = self.modules.get(&key) {
                return Err(TranslateError::new(ErrorKind::NameCollision {
                    name: key,
                    first: existing.source.clone().unwrap_or_else(|| "<unknown>".into()),
                    second: record.source.clone().unwrap_or_else(|| "<unknown>".into()),
                }));
            }
            self.modules.insert(key, record);
        }
        self.body_order.extend(other.body_order);
        for (name, protocol) in other.protocols {
            let entry = self.protocols.entry(name.clone()).or_insert_with(|| ProtocolRecord {
                name,
                spec: None,
                impls: IndexMap::new(),
            });
            if entry.spec.is_none() {
                entry.spec = protocol.spec;
            }
            entry.impls.extend(protocol.impls);
        }
        Ok(())
    }
}
