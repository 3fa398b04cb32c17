use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn parse_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_meld_parse_facts"))
}

fn run_on(text: &str) -> Output {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dump.txt");
    fs::write(&path, text).expect("write dump");
    Command::new(parse_bin())
        .arg(&path)
        .output()
        .expect("run meld_parse_facts")
}

#[test]
fn prints_summary_line_for_valid_dump() {
    let out = run_on("3\nedge(@1,@2).\ncolor(1).\n4\n");
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.starts_with("ok: nodes=2 facts=2 digest=fnv1a64:"),
        "stdout={stdout}"
    );
}

#[test]
fn parse_failure_exits_with_status_one() {
    let out = run_on("1\nbroken(1\n");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("line 2"), "stderr={stderr}");
}

#[test]
fn missing_argument_exits_with_status_two() {
    let out = Command::new(parse_bin()).output().expect("run meld_parse_facts");
    assert_eq!(out.status.code(), Some(2));
}
