//! CLI tests for `statesmith init`, `new`, `patch` and `exists`.
//!
//! Spawns the binary against a temp project and checks exit codes and the
//! files left on disk.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use statesmith::exit_codes;
use statesmith::io::config::CONFIG_FILE;
use statesmith::io::init::{InitOptions, init_project};

fn statesmith(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_statesmith"))
        .arg("--project")
        .arg(root)
        .args(args)
        .output()
        .expect("run statesmith")
}

fn init(root: &Path) {
    init_project(root, &root.join(CONFIG_FILE), &InitOptions::default()).expect("init");
}

#[test]
fn init_then_new_writes_manager_and_states() {
    let temp = tempfile::tempdir().expect("tempdir");

    let out = statesmith(temp.path(), &["init"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    assert!(temp.path().join(CONFIG_FILE).is_file());

    let out = statesmith(temp.path(), &["new", "Player", "-s", "Idle", "-s", "Run"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    let manager = fs::read_to_string(temp.path().join("Player/Player.cs")).expect("manager");
    assert!(manager.contains("TransitionToIdle"));
    assert!(manager.contains("TransitionToRun"));
    assert!(temp.path().join("Player/Idle.cs").is_file());
    assert!(temp.path().join("Player/Run.cs").is_file());
}

#[test]
fn init_twice_without_force_fails() {
    let temp = tempfile::tempdir().expect("tempdir");
    init(temp.path());

    let out = statesmith(temp.path(), &["init"]);
    assert_eq!(out.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&out.stderr).contains("already exists"));

    let out = statesmith(temp.path(), &["init", "--force"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
}

#[test]
fn new_without_templates_is_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");

    let out = statesmith(temp.path(), &["new", "Player", "-s", "Idle"]);

    assert_eq!(out.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&out.stderr).contains("template not found"));
    assert!(!temp.path().join("Player").exists());
}

#[test]
fn patch_reports_success_then_already_present() {
    let temp = tempfile::tempdir().expect("tempdir");
    init(temp.path());
    let out = statesmith(temp.path(), &["new", "Player", "-s", "Idle"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));

    let out = statesmith(temp.path(), &["patch", "Player/Player.cs", "Jump"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&out.stdout).contains("added TransitionToJump"));
    let patched = fs::read_to_string(temp.path().join("Player/Player.cs")).expect("read");

    let out = statesmith(temp.path(), &["patch", "Player/Player.cs", "Jump", "--json"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&out.stdout).contains("already_exists"));
    assert_eq!(
        fs::read_to_string(temp.path().join("Player/Player.cs")).expect("read"),
        patched
    );
}

#[test]
fn patch_missing_manager_exits_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    init(temp.path());

    let out = statesmith(temp.path(), &["patch", "Nope/Nope.cs", "Jump"]);

    assert_eq!(out.status.code(), Some(exit_codes::NOT_FOUND));
    assert!(!temp.path().join("Nope").exists());
}

#[test]
fn exists_reflects_project_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    init(temp.path());
    fs::create_dir_all(temp.path().join("Assets")).expect("mkdir");
    fs::write(temp.path().join("Assets/Idle.cs"), "").expect("write");

    let out = statesmith(temp.path(), &["exists", "Idle"]);
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "true");

    let out = statesmith(temp.path(), &["exists", "Run"]);
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "false");
}

#[test]
fn rerunning_new_keeps_patched_manager_unless_forced() {
    let temp = tempfile::tempdir().expect("tempdir");
    init(temp.path());
    let manager = temp.path().join("Player/Player.cs");

    statesmith(temp.path(), &["new", "Player", "-s", "Idle"]);
    statesmith(temp.path(), &["patch", "Player/Player.cs", "Jump"]);

    let out = statesmith(temp.path(), &["new", "Player", "-s", "Idle"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&out.stderr).contains("skipped state manager"));
    assert!(fs::read_to_string(&manager).expect("read").contains("TransitionToJump"));

    let out = statesmith(temp.path(), &["new", "Player", "-s", "Idle", "--force"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    assert!(!fs::read_to_string(&manager).expect("read").contains("TransitionToJump"));
}
