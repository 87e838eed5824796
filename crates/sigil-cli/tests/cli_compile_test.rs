//! End-to-end smoke tests for the `sigil` binary, exercising §8 Scenario 1
//! (empty module) through the actual CLI rather than the library API.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn empty_module_ast(name: &str) -> serde_json::Value {
    serde_json::json!({
        "Form": {
            "tag": "defmodule",
            "meta": { "file": null, "line": null, "column": null },
            "children": [
                {
                    "Form": {
                        "tag": "__aliases__",
                        "meta": { "file": null, "line": null, "column": null },
                        "children": [{ "Identifier": { "name": name, "meta": { "file": null, "line": null, "column": null } } }]
                    }
                },
                {
                    "Form": {
                        "tag": "__block__",
                        "meta": { "file": null, "line": null, "column": null },
                        "children": []
                    }
                }
            ]
        }
    })
}

#[test]
fn compile_writes_one_target_file_per_module() {
    let temp = TempDir::new().unwrap();
    let input_dir = temp.path().join("src");
    fs::create_dir_all(&input_dir).unwrap();
    fs::write(input_dir.join("elephant.json"), serde_json::to_string(&empty_module_ast("Elephant")).unwrap()).unwrap();

    let output_dir = temp.path().join("out");

    Command::cargo_bin("sigil")
        .unwrap()
        .args(["compile", input_dir.to_str().unwrap(), "--output", output_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 module(s) written"));

    let written = fs::read_to_string(output_dir.join("elephant.json")).unwrap();
    assert!(written.contains("__MODULE__"));
}

#[test]
fn check_reports_module_names_without_writing_output() {
    let temp = TempDir::new().unwrap();
    let input_dir = temp.path().join("src");
    fs::create_dir_all(&input_dir).unwrap();
    fs::write(input_dir.join("a.json"), serde_json::to_string(&empty_module_ast("A")).unwrap()).unwrap();

    Command::cargo_bin("sigil")
        .unwrap()
        .args(["check", input_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("A"));
}

#[test]
fn empty_input_directory_is_a_reported_error() {
    let temp = TempDir::new().unwrap();
    let input_dir = temp.path().join("src");
    fs::create_dir_all(&input_dir).unwrap();

    Command::cargo_bin("sigil")
        .unwrap()
        .args(["compile", input_dir.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no `.json`"));
}
