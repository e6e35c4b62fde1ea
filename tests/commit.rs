use assert_fs::TempDir;
use assert_fs::prelude::*;
use common::command::{
    gitlet_commit, gitlet_stdout, init_repository_dir, log_ids, repository_dir,
    run_gitlet_command,
};
use common::file::{FileSpec, generate_file, write_file};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn commit_extends_the_history(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let before = log_ids(dir);

    generate_file(dir, "3.txt");
    run_gitlet_command(dir, &["add", "3.txt"]).assert().success();
    gitlet_commit(dir, "Add third file")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[master [0-9a-f]{7}\] Add third file\n$")?);

    let after = log_ids(dir);
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(&after[1..], &before[..]);

    let log = gitlet_stdout(dir, &["log"]);
    assert!(log.starts_with(&format!(
        "===\ncommit {}\nDate: Sun Jan 01 12:00:00 2023 +0000\nAdd third file\n\n",
        after[0]
    )));
    assert!(log.ends_with("initial commit\n\n"));

    Ok(())
}

#[rstest]
fn commit_requires_staged_changes(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let before = log_ids(dir);

    gitlet_commit(dir, "Nothing here")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No changes added to the commit."));

    assert_eq!(log_ids(dir), before);

    Ok(())
}

#[rstest]
#[case("")]
#[case("   ")]
fn commit_requires_a_message(
    init_repository_dir: TempDir,
    #[case] message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    generate_file(dir, "3.txt");
    run_gitlet_command(dir, &["add", "3.txt"]).assert().success();

    gitlet_commit(dir, message)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a commit message."));

    // the staged file survives the failed commit
    gitlet_commit(dir, "Now with a message").assert().success();

    Ok(())
}

#[rstest]
fn adding_content_identical_to_head_stages_nothing(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("1.txt"), "changed".to_string()));
    run_gitlet_command(dir, &["add", "1.txt"]).assert().success();

    // restore the committed content and add again
    write_file(FileSpec::new(dir.join("1.txt"), "one".to_string()));
    run_gitlet_command(dir, &["add", "1.txt"]).assert().success();

    gitlet_commit(dir, "No-op")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No changes added to the commit."));

    Ok(())
}

#[rstest]
fn adding_a_missing_file_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_gitlet_command(init_repository_dir.path(), &["add", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File does not exist: nope.txt"));

    Ok(())
}

#[rstest]
#[case("../outside.txt")]
#[case(".gitlet/HEAD")]
fn adding_paths_outside_the_working_tree_fails(
    init_repository_dir: TempDir,
    #[case] path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    run_gitlet_command(init_repository_dir.path(), &["add", path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect operands"));

    Ok(())
}

#[rstest]
fn later_commits_snapshot_the_latest_staged_content(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("1.txt"), "first edit".to_string()));
    run_gitlet_command(dir, &["add", "1.txt"]).assert().success();
    write_file(FileSpec::new(dir.join("1.txt"), "second edit".to_string()));
    run_gitlet_command(dir, &["add", "./1.txt"]).assert().success();
    gitlet_commit(dir, "Edit").assert().success();

    write_file(FileSpec::new(dir.join("1.txt"), "scratch".to_string()));
    run_gitlet_command(dir, &["checkout", "--", "1.txt"])
        .assert()
        .success();

    init_repository_dir.child("1.txt").assert("second edit");

    Ok(())
}

#[rstest]
fn commit_in_nested_directories(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_gitlet_command(dir, &["init"]).assert().success();

    write_file(FileSpec::new(dir.join("x/y/z.txt"), "deep".to_string()));
    run_gitlet_command(dir, &["add", "x/y/z.txt"]).assert().success();
    gitlet_commit(dir, "Deep file").assert().success();

    std::fs::remove_dir_all(dir.join("x"))?;
    run_gitlet_command(dir, &["checkout", "--", "x/y/z.txt"])
        .assert()
        .success();

    repository_dir.child("x/y/z.txt").assert("deep");

    Ok(())
}
