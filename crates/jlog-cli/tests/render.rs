use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

const SAMPLE_SUMMARY: &str = "\
qpvuntsm 0abc1234 lines=2 working-copy
kmkuslsw 9f8e7d6c lines=2
zsxnyzoo 5e4d3c2b lines=2
ywnkulko 1a2b3c4d lines=3
zzzzzzzz 00000000 lines=1
";

#[test]
fn test_render_reads_stdin() {
    let dir = tempdir().unwrap();
    let log = std::fs::read(fixture("sample_log.ansi")).unwrap();

    cargo_bin_cmd!("jlog")
        .env("JLOG_HOME", dir.path())
        .arg("render")
        .write_stdin(log)
        .assert()
        .success()
        .stdout(SAMPLE_SUMMARY);
}

#[test]
fn test_render_reads_file() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("jlog")
        .env("JLOG_HOME", dir.path())
        .arg("render")
        .arg("--file")
        .arg(fixture("sample_log.ansi"))
        .assert()
        .success()
        .stdout(SAMPLE_SUMMARY);
}

#[test]
fn test_render_without_revisions() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("jlog")
        .env("JLOG_HOME", dir.path())
        .arg("render")
        .write_stdin("Error: no jj repo in \".\"\n")
        .assert()
        .success()
        .stdout("no matching revisions\n");
}

#[test]
fn test_render_missing_file_fails() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("jlog")
        .env("JLOG_HOME", dir.path())
        .args(["render", "--file"])
        .arg(dir.path().join("missing.ansi"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.ansi"));
}

#[test]
fn test_zero_batch_size_rejected() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("jlog")
        .env("JLOG_HOME", dir.path())
        .args(["--batch-size", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--batch-size must be at least 1"));
}

#[test]
fn test_revision_list_requires_terminal() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("jlog")
        .env("JLOG_HOME", dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a terminal"));
}
