//! Reads the filesystem-walker's output (§1 "out of scope ... assumed to
//! hand us an AST"): a directory or single file of JSON-encoded source
//! ASTs, one [`SourceNode`] per `.json` file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sigil_ast::SourceNode;
use walkdir::WalkDir;

/// One source file's label (used for name-collision error text and the
/// `Meta::file` a driver could stamp on, though parsing is someone else's
/// job) paired with its already-parsed root AST.
pub struct SourceFile {
    pub label: String,
    pub ast: SourceNode,
}

/// Collects every `.json` file under `input` (single file or directory,
/// walked recursively, entries sorted so output order is deterministic
/// across runs) and parses each as a [`SourceNode`].
pub fn load_sources(input: &Path) -> Result<Vec<SourceFile>> {
    let mut paths: Vec<PathBuf> = if input.is_dir() {
        WalkDir::new(input)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect()
    } else {
        vec![input.to_path_buf()]
    };
    paths.sort();

    if paths.is_empty() {
        anyhow::bail!("no `.json` source AST files found under {}", input.display());
    }

    paths
        .into_iter()
        .map(|path| {
            let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            let ast: SourceNode = serde_json::from_str(&text).with_context(|| format!("parsing source AST from {}", path.display()))?;
            let label = path.strip_prefix(input).unwrap_or(&path).to_string_lossy().into_owned();
            Ok(SourceFile { label, ast })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        let mut f = fs::File::create(&path).unwrap();
        write!(f, r#"{{"Literal":"Nil"}}"#).unwrap();
        let sources = load_sources(&path).unwrap();
        assert_eq!(sources.len(), 1);
    }

    #[test]
    fn walks_a_directory_and_sorts_by_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), r#"{"Literal":"Nil"}"#).unwrap();
        fs::write(dir.path().join("a.json"), r#"{"Literal":"Nil"}"#).unwrap();
        let sources = load_sources(dir.path()).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].label, "a.json");
        assert_eq!(sources[1].label, "b.json");
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_sources(dir.path()).is_err());
    }
}
