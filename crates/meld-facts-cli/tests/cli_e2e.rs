use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn meld_facts_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_meld-facts"))
}

fn run(args: &[&str]) -> Output {
    Command::new(meld_facts_bin())
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("run meld-facts")
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(meld_facts_bin())
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn meld-facts");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait meld-facts")
}

fn write_dump(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, text).expect("write dump");
    path.display().to_string()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

const COLORED: &str = "\
0
edge(@1).
color(1).
1
edge(@0).
edge(@2).
color(2).
2
color(1).
";

#[test]
fn summary_counts_nodes_facts_and_predicates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_dump(dir.path(), "db.txt", COLORED);

    let out = run(&["summary", &path]);
    assert!(out.status.success(), "stderr={}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Nodes: 3"), "stdout={text}");
    assert!(text.contains("Facts: 6"), "stdout={text}");
    assert!(text.contains("edge: 3"), "stdout={text}");
    assert!(text.contains("Digest: fnv1a64:"), "stdout={text}");
}

#[test]
fn dump_is_canonical_and_respects_only() {
    let out = run_with_stdin(&["dump", "--only", "color"], "4\n  color( +3 ) \nedge(@1)\n");
    assert!(out.status.success(), "stderr={}", stderr(&out));
    assert_eq!(stdout(&out), "4\ncolor(3).\n");
}

#[test]
fn dump_json_is_valid_json() {
    let out = run_with_stdin(&["dump", "--json", "-"], "1\nf(@2, 0.5).\n");
    assert!(out.status.success(), "stderr={}", stderr(&out));
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("json");
    assert_eq!(json[0]["node"], 1);
    assert_eq!(json[0]["facts"][0]["args"][1]["value"], 0.5);
}

#[test]
fn check_coloring_accepts_and_rejects() {
    let dir = tempfile::tempdir().expect("tempdir");

    let ok = write_dump(dir.path(), "ok.txt", COLORED);
    let out = run(&["check-coloring", &ok]);
    assert!(out.status.success(), "stderr={}", stderr(&out));
    assert!(stdout(&out).contains("ALL OK"));

    let bad = write_dump(dir.path(), "bad.txt", &COLORED.replace("color(2)", "color(1)"));
    let out = run(&["check-coloring", &bad]);
    assert!(!out.status.success());
    assert!(
        stderr(&out).contains("node 1 has same color as 0"),
        "stderr={}",
        stderr(&out)
    );
}

#[test]
fn total_sums_requested_argument() {
    let out = run_with_stdin(
        &["total", "count", "2"],
        "1\ncount(@1, 4).\n2\ncount(@2, 6).\nother(1, 100).\n",
    );
    assert!(out.status.success(), "stderr={}", stderr(&out));
    assert_eq!(stdout(&out).trim(), "10");
}

#[test]
fn parse_errors_exit_nonzero_with_line_number() {
    let out = run_with_stdin(&["summary"], "edge(@1).\n");
    assert!(!out.status.success());
    assert!(
        stderr(&out).contains("line 1: fact `edge(@1).` appears before any node marker"),
        "stderr={}",
        stderr(&out)
    );
}

#[test]
fn missing_file_is_reported() {
    let out = run(&["summary", "/nonexistent/meld/db.txt"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("failed to read"));
}

#[test]
fn generated_chain_is_parseable_under_a_marker() {
    let out = run(&["generate", "chain", "4", "--weight", "2"]);
    assert!(out.status.success(), "stderr={}", stderr(&out));
    let text = stdout(&out);
    assert_eq!(
        text,
        "!edge(@0,@1,2).\n!edge(@1,@2,2).\n!edge(@2,@3,2).\n"
    );

    let wrapped = format!("0\n{text}");
    let out = run_with_stdin(&["total", "!edge", "3"], &wrapped);
    assert!(out.status.success(), "stderr={}", stderr(&out));
    assert_eq!(stdout(&out).trim(), "6");
}

#[test]
fn generated_grid_has_coordinates() {
    let out = run(&["generate", "grid", "3", "2"]);
    assert!(out.status.success(), "stderr={}", stderr(&out));
    let text = stdout(&out);
    assert_eq!(text.lines().filter(|l| l.starts_with("!coord(")).count(), 6);
    // 3x2 grid: 7 links, written in both directions.
    assert_eq!(text.lines().filter(|l| l.starts_with("!edge(")).count(), 14);
}
