//! Runs the `gix-pre-receive` binary the way a git server runs a `pre-receive` hook.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;

const SNAPSHOT: &str = r#"
[project]
    name = demo
    admin = alice
[branch "main"]
    incoming = closed
    outgoing = closed
[branch "release"]
    verdict = rejected
    reason = release branch is locked
[branch "review"]
    verdict = undetermined
    reason = review needs two approvals
[branch "busy"]
    outgoing = open
"#;

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("fixture can be written");
    path
}

fn run_hook(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_gix-pre-receive"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary can be spawned");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("payload can be written");
    child.wait_with_output().expect("binary runs to completion")
}

fn run_with_snapshot(actor: Option<&str>, stdin: &str) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_file(dir.path(), "snapshot", SNAPSHOT);
    let mut args = vec!["--snapshot", snapshot.to_str().unwrap(), "--repository", "demo"];
    if let Some(actor) = actor {
        args.extend(["--actor", actor]);
    }
    run_hook(&args, stdin)
}

#[test]
fn accepted_push_exits_successfully_without_output() {
    let out = run_with_snapshot(
        Some("bob"),
        "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1 b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2 refs/heads/main\n",
    );
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "");
}

#[test]
fn locked_release_branch_deletion_is_rejected() {
    let out = run_with_snapshot(
        Some("bob"),
        "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1 0000000000000000000000000000000000000000 refs/heads/release\n",
    );
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.lines().any(|l| l == "*  release branch is locked"), "{stdout}");
}

#[test]
fn mixed_push_reports_every_failing_ref_in_order() {
    let payload = concat!(
        "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1 b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2 refs/heads/review\n",
        "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1 b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2 refs/gitop/acl\n",
        "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1 b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2 refs/heads/busy\n",
        "0000000000000000000000000000000000000000 b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2 refs/heads/fresh\n",
    );
    let out = run_with_snapshot(Some("bob"), payload);
    assert_eq!(out.status.code(), Some(1));

    let stdout = String::from_utf8(out.stdout).unwrap();
    let messages: Vec<_> = stdout.lines().filter(|l| l.starts_with("*  ")).collect();
    assert_eq!(
        messages,
        [
            "*  review needs two approvals",
            "*  ",
            "*  ----------------------------------------------------",
            "*  You may submit a pull request instead.",
            "*  Only project administrators can update control refs.",
            "*  There are unclosed pull requests originating from this branch.",
            "*  Please close them before continue.",
        ]
    );
}

#[test]
fn admin_may_update_control_refs() {
    let out = run_with_snapshot(
        Some("alice"),
        "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1 b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2 refs/gitop/acl\n",
    );
    assert!(out.status.success());
}

#[test]
fn config_file_moves_the_control_namespace() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_file(dir.path(), "snapshot", SNAPSHOT);
    let config = write_file(dir.path(), "config", "[gatekeeper]\n\tcontrolRefPrefix = refs/meta/\n");
    let out = run_hook(
        &[
            "--snapshot",
            snapshot.to_str().unwrap(),
            "--repository",
            "demo",
            "--actor",
            "bob",
            "--config",
            config.to_str().unwrap(),
        ],
        "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1 b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2 refs/gitop/acl\n\
         a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1 b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2 refs/meta/acl\n",
    );
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.matches("Only project administrators").count(), 1);
}

#[test]
fn malformed_payload_fails_without_a_report() {
    let out = run_with_snapshot(Some("bob"), "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1 refs/heads/main\n");
    assert!(!out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "");
    assert!(String::from_utf8(out.stderr).unwrap().contains("malformed ref update"));
}
