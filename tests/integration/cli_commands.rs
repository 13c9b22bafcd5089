//! CLI integration tests: run the `fingerprint` binary end to end.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(store: &Path, cwd: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_fingerprint");
    Command::new(bin)
        .current_dir(cwd)
        .env("XDG_CONFIG_HOME", cwd.join("xdg"))
        .env("NO_COLOR", "1")
        .env_remove("FINGERPRINT_LOG")
        .arg("--store")
        .arg(store)
        .args(args)
        .output()
        .expect("failed to run fingerprint binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_snapshot_and_compare_flow() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("project");
    let store = temp.path().join("records");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a.txt"), "hello").unwrap();
    fs::write(root.join("b.txt"), "world").unwrap();
    let root_arg = root.to_str().unwrap();

    let out = run(&store, temp.path(), &["snapshot", root_arg]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout(&out).starts_with("Hashes written to "));
    assert!(stdout(&out).contains("hashes_project_"));

    let out = run(&store, temp.path(), &["compare", root_arg]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "Not enough hash files to compare.");

    fs::remove_file(root.join("b.txt")).unwrap();
    fs::write(root.join("a.txt"), "HELLO").unwrap();
    fs::write(root.join("c.txt"), "new").unwrap();
    let out = run(&store, temp.path(), &["snapshot", root_arg]);
    assert!(out.status.success());

    let out = run(&store, temp.path(), &["compare", root_arg]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.starts_with("Comparing: hashes_project_"));
    assert!(text.contains("Added files:\n  + c.txt"));
    assert!(text.contains("Removed files:\n  - b.txt"));
    assert!(text.contains("Modified files:\n  * a.txt"));
}

#[test]
fn test_compare_json_and_no_changes() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("stable");
    let store = temp.path().join("records");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("x"), "x").unwrap();
    let root_arg = root.to_str().unwrap();

    run(&store, temp.path(), &["snapshot", root_arg]);
    run(&store, temp.path(), &["snapshot", root_arg]);

    let out = run(&store, temp.path(), &["compare", root_arg]);
    assert!(stdout(&out).trim_end().ends_with("No changes detected."));

    let out = run(&store, temp.path(), &["compare", root_arg, "--format", "json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["status"], "compared");
    assert_eq!(json["unchanged_count"], 1);
}

#[test]
fn test_digest_command_output() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("hello.txt");
    fs::write(&file, "hello").unwrap();
    let store = temp.path().join("records");

    let out = run(&store, temp.path(), &["digest", file.to_str().unwrap(), "--algo", "sha256"]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out).trim(),
        format!(
            "sha256({}) = 2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
            file.display()
        )
    );
    assert!(!store.exists(), "digest must not write records");
}

#[test]
fn test_unsupported_algorithm_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    let store = temp.path().join("records");

    let out = run(&store, temp.path(), &["snapshot", ".", "--algo", "sha1"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Unsupported algorithm: sha1"));
    assert!(!store.exists());
}

#[test]
fn test_missing_root_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    let store = temp.path().join("records");
    let missing = temp.path().join("nope");

    let out = run(&store, temp.path(), &["snapshot", missing.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("elevated privileges"));
    assert!(!store.exists());
}

#[test]
fn test_corrupt_history_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("data");
    let store = temp.path().join("records");
    fs::create_dir_all(&root).unwrap();
    let root_arg = root.to_str().unwrap();

    run(&store, temp.path(), &["snapshot", root_arg]);
    run(&store, temp.path(), &["snapshot", root_arg]);
    for entry in fs::read_dir(&store).unwrap() {
        fs::write(entry.unwrap().path(), "not json").unwrap();
    }

    let out = run(&store, temp.path(), &["compare", root_arg]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Not enough history"));
}

#[test]
fn test_history_lists_records() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("books");
    let store = temp.path().join("records");
    fs::create_dir_all(&root).unwrap();
    let root_arg = root.to_str().unwrap();

    run(&store, temp.path(), &["snapshot", root_arg]);
    run(&store, temp.path(), &["snapshot", root_arg]);

    let out = run(&store, temp.path(), &["history", root_arg, "--format", "json"]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["root"], "books");

    let out = run(&store, temp.path(), &["history", root_arg, "--limit", "1"]);
    assert!(stdout(&out).contains("hashes_books_"));
}

#[test]
fn test_workspace_config_sets_records_dir() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("data");
    fs::create_dir_all(&root).unwrap();
    fs::write(
        temp.path().join("fingerprint.toml"),
        "[storage]\nrecords_dir = \"from-config\"\n[snapshot]\nalgorithm = \"md5\"\n",
    )
    .unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_fingerprint"))
        .current_dir(temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join("xdg"))
        .args(["snapshot", root.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let records: Vec<_> = fs::read_dir(temp.path().join("from-config"))
        .unwrap()
        .collect();
    assert_eq!(records.len(), 1);
    let record = records[0].as_ref().unwrap().path();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(record).unwrap()).unwrap();
    assert!(json.as_object().unwrap().is_empty());
}

#[test]
fn test_default_records_dir_inside_root_is_not_fingerprinted() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("site");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("index.html"), "<html>").unwrap();

    let run_here = |args: &[&str]| {
        Command::new(env!("CARGO_BIN_EXE_fingerprint"))
            .current_dir(&root)
            .env("XDG_CONFIG_HOME", temp.path().join("xdg"))
            .env("NO_COLOR", "1")
            .env_remove("FINGERPRINT_LOG")
            .args(args)
            .output()
            .unwrap()
    };

    assert!(run_here(&["snapshot", "."]).status.success());
    assert!(run_here(&["snapshot", "."]).status.success());
    assert_eq!(fs::read_dir(root.join("hashes")).unwrap().count(), 2);

    let out = run_here(&["compare", "."]);
    assert!(out.status.success());
    assert!(stdout(&out).trim_end().ends_with("No changes detected."));
}

#[test]
fn test_unknown_format_is_rejected() {
    let temp = TempDir::new().unwrap();
    let store = temp.path().join("records");

    let out = run(&store, temp.path(), &["compare", ".", "--format", "jsn"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("jsn"));
}
