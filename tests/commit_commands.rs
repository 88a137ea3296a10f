use assert_fs::fixture::{FileWriteStr, PathChild};
use devus::areas::database::Database;
use devus::artifacts::objects::commit::Commit;
use devus::artifacts::objects::object_id::ObjectId;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;

mod common;

fn load_commit(dir: &std::path::Path, oid: &str) -> Commit {
    let database = Database::new(dir.join(".git/objects").into_boxed_path());
    let oid = ObjectId::try_parse(oid.to_string()).expect("HEAD is not a digest");
    Commit::from_object_store(&database, &oid).expect("Failed to parse commit")
}

#[test]
fn commit_without_a_repository_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    common::run_gitus(dir.path(), &["commit", "The Message", "The Author"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no repository"));

    Ok(())
}

#[test]
fn commit_with_an_empty_index_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::run_gitus(dir.path(), &["init"]).assert().success();

    common::run_gitus(dir.path(), &["commit", "The Message", "The Author"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no staged files"));

    Ok(())
}

#[test]
fn first_commit_clears_the_index_and_round_trips_its_fields()
-> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::run_gitus(dir.path(), &["init"]).assert().success();

    dir.child("letters.txt").write_str("hello\n")?;
    common::run_gitus(dir.path(), &["add", "letters.txt"])
        .assert()
        .success();

    common::run_gitus(dir.path(), &["commit", "The Message", "The Author"])
        .assert()
        .success();

    // index emptied, HEAD set to a digest
    assert_eq!(std::fs::read(dir.path().join(".git/index"))?.len(), 0);
    let head = common::read_head(dir.path());
    common::assert_is_digest(&head);

    // the stored commit carries the fields back out
    let commit = load_commit(dir.path(), &head);
    assert_eq!(commit.message(), "The Message");
    assert_eq!(commit.author(), "The Author");
    assert!(!commit.time().is_empty());
    assert_eq!(commit.parent(), None);

    Ok(())
}

#[test]
fn second_commit_links_to_the_first() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::run_gitus(dir.path(), &["init"]).assert().success();

    dir.child("letters.txt").write_str("hello\n")?;
    common::run_gitus(dir.path(), &["add", "letters.txt"])
        .assert()
        .success();
    common::gitus_commit(dir.path(), "first").assert().success();
    let first_head = common::read_head(dir.path());

    dir.child("numbers.txt").write_str("123\n")?;
    common::run_gitus(dir.path(), &["add", "numbers.txt"])
        .assert()
        .success();
    common::gitus_commit(dir.path(), "second").assert().success();
    let second_head = common::read_head(dir.path());

    assert_ne!(first_head, second_head);
    let second = load_commit(dir.path(), &second_head);
    assert_eq!(second.parent().map(|p| p.to_string()), Some(first_head));

    Ok(())
}

#[test]
fn committing_twice_without_new_staged_files_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::run_gitus(dir.path(), &["init"]).assert().success();

    dir.child("letters.txt").write_str("hello\n")?;
    common::run_gitus(dir.path(), &["add", "letters.txt"])
        .assert()
        .success();
    common::gitus_commit(dir.path(), "first").assert().success();

    common::gitus_commit(dir.path(), "again")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no staged files"));

    Ok(())
}

#[test]
fn commit_without_message_or_author_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    common::run_gitus(dir.path(), &["init"]).assert().success();

    common::run_gitus(dir.path(), &["commit", "only a message"])
        .assert()
        .failure();

    Ok(())
}
