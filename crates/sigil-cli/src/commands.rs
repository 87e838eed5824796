//! Subcommand implementations. Thin on purpose (§1: the CLI "is also out of
//! scope" for the core) — every one of these does nothing but load input,
//! call into `sigil-core`, and write/report the result.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use sigil_core::macro_expand::NoopExpander;
use sigil_core::registry::ModuleRegistry;
use sigil_core::{module_path, CompilationContext, Environment};
use tracing::info;

use crate::config::CliConfig;
use crate::loader::load_sources;

/// Runs the whole pipeline against every source file under `input` and
/// writes one JSON target-AST file per module to `cfg.output_dir`, at the
/// path its module name maps to (§6 "Module-to-file-path mapping").
pub fn compile(input: &Path, cfg: &CliConfig) -> Result<()> {
    let sources = load_sources(input)?;
    info!(files = sources.len(), "loaded source ASTs");

    let ctx = CompilationContext::new(cfg.root.clone(), Environment::root()).with_options(cfg.options.clone());
    let expander = NoopExpander;

    let mut root_registry = ModuleRegistry::new(cfg.root.clone(), Environment::root());
    for file in &sources {
        let scratch = sigil_core::translate_file(&ctx, &file.label, &file.ast, &expander)
            .with_context(|| format!("translating {}", file.label))?;
        root_registry.merge(scratch).with_context(|| format!("merging module(s) from {}", file.label))?;
    }
    root_registry.process_imports()?;

    fs::create_dir_all(&cfg.output_dir).with_context(|| format!("creating output directory {}", cfg.output_dir.display()))?;

    let mut written = 0usize;
    for record in root_registry.dependency_order() {
        let Some(body) = &record.body else { continue };
        let rel_path = module_path::to_import_path(&record.name);
        let out_path = cfg.output_dir.join(format!("{rel_path}.json"));
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(body).with_context(|| format!("serializing module {}", module_path::to_dotted_name(&record.name)))?;
        fs::write(&out_path, json).with_context(|| format!("writing {}", out_path.display()))?;
        if cfg.verbose {
            println!("{} {} -> {}", "compiled".green(), module_path::to_dotted_name(&record.name), out_path.display());
        }
        written += 1;
    }

    let protocol_count = root_registry.protocols().count();
    if protocol_count > 0 {
        let protocols_path = cfg.output_dir.join("__protocols__.json");
        let dump: Vec<_> = root_registry
            .protocols()
            .map(|p| serde_json::json!({ "name": p.name, "spec": p.spec, "impls": p.impls }))
            .collect();
        fs::write(&protocols_path, serde_json::to_string_pretty(&dump)?).with_context(|| format!("writing {}", protocols_path.display()))?;
    }

    println!("{} {written} module(s) written to {}", "done:".bold(), cfg.output_dir.display());
    Ok(())
}

/// Runs translation without writing anything — reports success/failure and
/// the module names that would be emitted. Useful as a fast pre-merge gate.
pub fn check(input: &Path, cfg: &CliConfig) -> Result<()> {
    let sources = load_sources(input)?;
    let ctx = CompilationContext::new(cfg.root.clone(), Environment::root()).with_options(cfg.options.clone());
    let expander = NoopExpander;

    let mut root_registry = ModuleRegistry::new(cfg.root.clone(), Environment::root());
    for file in &sources {
        let scratch = sigil_core::translate_file(&ctx, &file.label, &file.ast, &expander)
            .with_context(|| format!("translating {}", file.label))?;
        root_registry.merge(scratch).with_context(|| format!("merging module(s) from {}", file.label))?;
    }
    root_registry.process_imports()?;

    for record in root_registry.dependency_order() {
        println!("{} {}", "module".cyan(), module_path::to_dotted_name(&record.name));
    }
    println!("{}", "ok".green().bold());
    Ok(())
}
