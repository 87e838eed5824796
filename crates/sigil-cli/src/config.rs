//! Driver-level configuration (§6: "CLI and environment variables ... not
//! part of the core"). Nothing in here changes what a correct translation
//! means; it only controls how the driver finds input, where it writes
//! output, and how noisy it is about it.

use std::path::PathBuf;

use sigil_core::CompileOptions;

/// One assembled run of the driver, built from parsed CLI flags.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Compilation root (§3 Registry state "root": the filesystem root for
    /// emitted imports). Import paths in emitted `ImportDeclaration`s are
    /// written relative to this, per §6's module-to-file-path mapping.
    pub root: PathBuf,
    /// Where translated target ASTs are written, one file per module.
    pub output_dir: PathBuf,
    pub options: CompileOptions,
    pub verbose: bool,
}

impl CliConfig {
    pub fn new(root: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            root,
            output_dir,
            options: CompileOptions::default(),
            verbose: false,
        }
    }
}
