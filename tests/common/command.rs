use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const FIXED_DATE: &str = "2023-01-01 12:00:00 +0000"; // %Y-%m-%d %H:%M:%S %z

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

/// Repository with one commit tracking `1.txt` ("one") and `a/2.txt` ("two")
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));

    run_gitlet_command(repository_dir.path(), &["add", "1.txt", "a/2.txt"])
        .assert()
        .success();

    gitlet_commit(repository_dir.path(), "Initial files")
        .assert()
        .success();

    repository_dir
}

pub fn run_gitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitlet").expect("Failed to find gitlet binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.env_remove("GITLET_DATE");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn gitlet_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_gitlet_command(dir, &["commit", "-m", message]);
    cmd.env("GITLET_DATE", FIXED_DATE);
    cmd
}

/// Stage `files` and commit them at the fixed date
pub fn commit_files(dir: &Path, files: &[(&str, &str)], message: &str) {
    for (name, content) in files {
        write_file(FileSpec::new(dir.join(name), content.to_string()));
        run_gitlet_command(dir, &["add", name]).assert().success();
    }

    gitlet_commit(dir, message).assert().success();
}

pub fn gitlet_stdout(dir: &Path, args: &[&str]) -> String {
    let output = run_gitlet_command(dir, args)
        .output()
        .expect("Failed to run gitlet");
    assert!(
        output.status.success(),
        "gitlet {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("stdout is not utf-8")
}

/// Ids of the current branch's history, newest first
pub fn log_ids(dir: &Path) -> Vec<String> {
    gitlet_stdout(dir, &["log"])
        .lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .map(str::to_string)
        .collect()
}

pub fn head_id(dir: &Path) -> String {
    log_ids(dir)
        .into_iter()
        .next()
        .expect("log printed no commit")
}
