//! `sigil` — thin driver binary for the translator (§1, §6 "CLI and
//! environment variables: not part of the core"). Loads JSON-encoded
//! source ASTs, runs the `sigil-core` pipeline, and writes the resulting
//! target ASTs back out as JSON. Carries no translation logic of its own.

mod commands;
mod config;
mod loader;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "sigil")]
#[command(about = "Translates a homoiconic source AST into a module-based target AST")]
#[command(version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate source ASTs and write target ASTs to a directory.
    Compile {
        /// A `.json` source-AST file, or a directory walked recursively for them.
        input: PathBuf,
        /// Directory target ASTs are written to, one file per module.
        #[arg(short, long, default_value = "out")]
        output: PathBuf,
        /// Compilation root used for import-path resolution (defaults to `input`'s parent).
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Translate without writing output; reports the modules that would be emitted.
    Check {
        input: PathBuf,
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Compile { input, output, root } => {
            let root = root.clone().or_else(|| input.parent().map(PathBuf::from)).unwrap_or_else(|| PathBuf::from("."));
            let mut cfg = CliConfig::new(root, output.clone());
            cfg.verbose = cli.verbose;
            commands::compile(input, &cfg)
        }
        Commands::Check { input, root } => {
            let root = root.clone().or_else(|| input.parent().map(PathBuf::from)).unwrap_or_else(|| PathBuf::from("."));
            let mut cfg = CliConfig::new(root, PathBuf::from("."));
            cfg.verbose = cli.verbose;
            commands::check(input, &cfg)
        }
    };

    if let Err(err) = &result {
        eprintln!("{} {err:#}", "error:".red().bold());
    }
    result
}
